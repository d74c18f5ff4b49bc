//! Router and server entry point.

use super::handlers;
use axum::Router;
use axum::routing::{get, post};
use relay_application::RunChatUseCase;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<RunChatUseCase>,
}

impl AppState {
    pub fn new(chat: RunChatUseCase) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, provider = state.chat.provider(), "Listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
