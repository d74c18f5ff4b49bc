//! CLI entrypoint for chat-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use relay_application::{
    ConversationLogger, NoConversationLogger, RunChatUseCase, RunPromptUseCase,
};
use relay_domain::prompt::CHAT_HISTORY;
use relay_domain::{GenerationParams, Message, PromptTemplate, RelayState, TemplateVariables};
use relay_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, ProviderKind, build_chat_model,
};
use relay_presentation::{
    AppState, AskArgs, Cli, Command, ConsoleFormatter, ConsoleFrameSink, ProviderChoice,
    ServeArgs,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Values already in the environment win over .env
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // stderr keeps streamed answers on stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(provider = %config.providers.default, "Starting chat-relay");

    // === Dependency Injection ===
    let model = build_chat_model(&config.providers)
        .with_context(|| format!("cannot initialise provider '{}'", config.providers.default))?;
    let conversation_logger = conversation_logger(&config)?;

    match cli.command {
        Command::Serve(args) => serve(args, &config, model, conversation_logger).await,
        Command::Ask(args) => {
            let use_case =
                RunPromptUseCase::new(model).with_conversation_logger(conversation_logger);
            ask(args, &use_case).await
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("failed to load configuration: {}", e))?;

    if let Some(choice) = cli.provider {
        config.providers.default = match choice {
            ProviderChoice::Ark => ProviderKind::Ark,
            ProviderChoice::OpenAi => ProviderKind::OpenAi,
        };
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn conversation_logger(config: &FileConfig) -> Result<Arc<dyn ConversationLogger>> {
    match &config.logging.conversation_log {
        Some(path) => {
            let logger = JsonlConversationLogger::open(path).with_context(|| {
                format!("cannot open conversation log {}", path.display())
            })?;
            info!("Conversation log: {}", logger.path().display());
            Ok(Arc::new(logger))
        }
        None => Ok(Arc::new(NoConversationLogger)),
    }
}

async fn serve(
    args: ServeArgs,
    config: &FileConfig,
    model: Arc<dyn relay_application::ChatModel>,
    conversation_logger: Arc<dyn ConversationLogger>,
) -> Result<()> {
    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());
    let listener = TcpListener::bind(&listen)
        .await
        .with_context(|| format!("cannot bind {}", listen))?;

    let chat = RunChatUseCase::new(model).with_conversation_logger(conversation_logger);
    relay_presentation::serve(listener, AppState::new(chat), async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down");
        }
    })
    .await?;

    Ok(())
}

async fn ask(args: AskArgs, use_case: &RunPromptUseCase) -> Result<()> {
    let template = PromptTemplate::counselor();
    info!(placeholders = ?template.placeholders()?, "Using counselor template");

    let mut variables = TemplateVariables::new()
        .text("role", args.role)
        .text("style", args.style)
        .text("question", args.question);
    if let Some(path) = &args.history {
        variables = variables.messages(CHAT_HISTORY, read_history(path)?);
    }

    if args.show_prompt {
        let messages = template.format(&variables)?;
        println!("{}", ConsoleFormatter::format_prompt(&messages));
    }

    let params = GenerationParams {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    if args.stream {
        let mut sink = ConsoleFrameSink::stdout();
        let outcome = use_case
            .stream_to(&template, &variables, &params, &mut sink, &cancel)
            .await?;
        match outcome.state {
            RelayState::Completed => Ok(()),
            RelayState::Failed => bail!(
                "stream failed: {}",
                outcome.error.unwrap_or_else(|| "unknown error".to_string())
            ),
            state => {
                warn!(%state, fragments = outcome.fragments, "Stream interrupted");
                bail!("interrupted")
            }
        }
    } else {
        let answer = use_case
            .execute(&template, &variables, &params, &cancel)
            .await?;
        print!("{}", ConsoleFormatter::format_answer(&answer));
        Ok(())
    }
}

fn read_history(path: &Path) -> Result<Vec<Message>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read history file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("history file {} is not a JSON message list", path.display()))
}
