//! HTTP surface: `POST /chat` and `GET /health`.

pub mod error;
pub mod handlers;
pub mod request;
pub mod router;
pub mod sse;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use router::{AppState, router, serve};
