//! Route handlers.

use super::error::ApiError;
use super::request::ChatBody;
use super::router::AppState;
use super::sse::relay_response;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use relay_application::ChatReply;
use tokio_util::sync::CancellationToken;

/// `POST /chat`
///
/// Validation and JSON errors answer 400 before the model is called. A
/// streaming request answers 200 with an SSE body once the upstream stream
/// is open; a setup failure answers 502 and no frames.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let cancel = CancellationToken::new();
    match state.chat.dispatch(body.into(), &cancel).await? {
        ChatReply::Complete(message) => Ok(Json(message).into_response()),
        ChatReply::Stream(session) => Ok(relay_response(state.chat.clone(), session, cancel)),
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.chat.provider(),
    }))
}
