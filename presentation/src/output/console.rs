//! Console output for the `ask` command

use async_trait::async_trait;
use colored::Colorize;
use relay_application::ports::frame_sink::{FrameSink, SinkError};
use relay_domain::{Frame, Message, Role};
use std::io::Write;

/// Formats prompts and answers for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render the formatted prompt, one block per message
    pub fn format_prompt(messages: &[Message]) -> String {
        let mut output = Self::header("Prompt");
        for message in messages {
            output.push_str(&format!(
                "\n{}\n{}\n",
                Self::role_label(message.role()),
                Self::indent(message.content(), "  ")
            ));
        }
        output
    }

    /// Render a complete answer
    pub fn format_answer(message: &Message) -> String {
        format!("{}\n{}\n", Self::header("Answer"), message.content())
    }

    fn role_label(role: Role) -> String {
        let label = format!("── {} ──", role);
        match role {
            Role::System => label.magenta().bold().to_string(),
            Role::User => label.cyan().bold().to_string(),
            Role::Assistant => label.yellow().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// [`FrameSink`] that prints fragments as they arrive.
///
/// Content frames are written without separators so the answer reads as
/// continuous text; `[DONE]` ends the line and an error frame is printed
/// in red. A write failure (closed pipe) reports the sink as closed.
pub struct ConsoleFrameSink<W: Write + Send> {
    out: W,
    pending: Option<Frame>,
}

impl ConsoleFrameSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleFrameSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, pending: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        match frame {
            Frame::Data(text) => write!(self.out, "{}", text),
            Frame::Done => writeln!(self.out),
            Frame::Error(message) => {
                writeln!(self.out, "\n{} {}", "error:".red().bold(), message.red())
            }
        }
    }
}

#[async_trait]
impl<W: Write + Send> FrameSink for ConsoleFrameSink<W> {
    async fn emit(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.pending = Some(frame);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        if let Some(frame) = self.pending.take() {
            self.write_frame(&frame).map_err(|_| SinkError::Closed)?;
        }
        self.out.flush().map_err(|_| SinkError::Closed)
    }
}
