//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Backend selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    /// Volcengine Ark
    Ark,
    /// OpenAI-compatible endpoint (SF_* variables)
    #[value(name = "openai")]
    OpenAi,
}

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Relay chat completions from a text-generation backend")]
#[command(long_about = r#"
chat-relay forwards chat requests to a text-generation backend and relays
the answer, either as one message or as a live stream of fragments.

  serve   HTTP server: POST /chat (SSE streaming by default), GET /health
  ask     One-shot question through the built-in counselor template

Configuration is loaded from (in priority order):
1. Environment         RELAY_*, ARK_*, SF_* (and a .env file)
2. --config <path>     Explicit config file
3. ./chat-relay.toml   Project-level config
4. ~/.config/chat-relay/config.toml   Global config

Example:
  chat-relay serve --listen 127.0.0.1:2345
  chat-relay ask --stream "How do I cope with on-call stress?"
  chat-relay --provider openai ask --history history.json "And after that?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend to use (overrides `providers.default`)
    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderChoice>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment still applies)
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP relay server
    Serve(ServeArgs),
    /// Ask one question through the counselor template
    Ask(AskArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.listen`)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Print the answer as it is generated
    #[arg(short, long)]
    pub stream: bool,

    /// Persona the assistant plays
    #[arg(long, default_value = "心理健康顾问")]
    pub role: String,

    /// Tone of the answer
    #[arg(long, default_value = "温暖和鼓励")]
    pub style: String,

    /// JSON file with earlier turns: [{"role": "user", "content": "..."}, ...]
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print the formatted prompt before asking
    #[arg(long)]
    pub show_prompt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_defaults() {
        let cli = Cli::parse_from(["chat-relay", "ask", "How do I rest?"]);
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.question, "How do I rest?");
        assert!(!args.stream);
        assert_eq!(args.role, "心理健康顾问");
        assert_eq!(args.style, "温暖和鼓励");
        assert!(args.history.is_none());
        assert_eq!(cli.provider, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "chat-relay",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--provider",
            "openai",
            "-vv",
        ]);
        assert_eq!(cli.provider, Some(ProviderChoice::OpenAi));
        assert_eq!(cli.verbose, 2);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.listen.as_deref(), Some("127.0.0.1:9000"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Cli::try_parse_from(["chat-relay", "--provider", "bedrock", "serve"]).is_err());
    }
}
