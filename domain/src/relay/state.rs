//! Relay lifecycle state machine.
//!
//! ```text
//! Idle ──StreamOpened──▶ Streaming ──Fragment──▶ Streaming
//!  │                        │
//!  └──SetupFailed──▶ Failed ◀──UpstreamFailed──┤
//!                           ├──EndOfStream──▶ Completed
//!                           └──SinkClosed / Cancelled──▶ Abandoned
//! ```
//!
//! Terminal states absorb every further event.

use std::fmt;

/// Where a relay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayState {
    Idle,
    Streaming,
    Completed,
    Failed,
    Abandoned,
}

/// Inputs that drive [`RelayState::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEvent {
    StreamOpened,
    SetupFailed,
    Fragment,
    EndOfStream,
    UpstreamFailed,
    SinkClosed,
    Cancelled,
}

impl RelayState {
    /// Apply `event`, returning the next state.
    ///
    /// Events that make no sense for the current state leave it unchanged.
    pub fn on(self, event: RelayEvent) -> RelayState {
        use RelayEvent as E;
        use RelayState as S;

        match (self, event) {
            (S::Idle, E::StreamOpened) => S::Streaming,
            (S::Idle, E::SetupFailed) => S::Failed,
            (S::Idle, E::Cancelled) => S::Abandoned,
            (S::Streaming, E::Fragment) => S::Streaming,
            (S::Streaming, E::EndOfStream) => S::Completed,
            (S::Streaming, E::UpstreamFailed) => S::Failed,
            (S::Streaming, E::SinkClosed | E::Cancelled) => S::Abandoned,
            (state, _) => state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RelayState::Completed | RelayState::Failed | RelayState::Abandoned
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Idle => "idle",
            RelayState::Streaming => "streaming",
            RelayState::Completed => "completed",
            RelayState::Failed => "failed",
            RelayState::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
