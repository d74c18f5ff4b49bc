//! Relay vocabulary: outbound frames and the lifecycle state machine.

pub mod frame;
pub mod state;

pub use frame::{DATA_EVENT, DONE_SENTINEL, ERROR_EVENT, Frame};
pub use state::{RelayEvent, RelayState};
