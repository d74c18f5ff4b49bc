//! Outbound event frames.

/// Payload of the success sentinel frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Event label for content fragments and the sentinel.
pub const DATA_EVENT: &str = "data";

/// Event label for the terminal failure frame.
pub const ERROR_EVENT: &str = "error";

/// One discrete unit of the outbound event protocol.
///
/// On the wire every frame is an event label plus a text payload:
///
/// | Frame         | event   | payload       |
/// |---------------|---------|---------------|
/// | `Data(text)`  | `data`  | `text`        |
/// | `Done`        | `data`  | `[DONE]`      |
/// | `Error(text)` | `error` | `text`        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(String),
    Done,
    Error(String),
}

impl Frame {
    pub fn event(&self) -> &'static str {
        match self {
            Frame::Data(_) | Frame::Done => DATA_EVENT,
            Frame::Error(_) => ERROR_EVENT,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            Frame::Data(text) | Frame::Error(text) => text,
            Frame::Done => DONE_SENTINEL,
        }
    }

    /// `Done` and `Error` close the stream; nothing may follow them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Frame::Done | Frame::Error(_))
    }
}
