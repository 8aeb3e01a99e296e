//! API endpoints for sending messages and reading history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::reject;
use crate::broker::channel;
use crate::protocol::message::{MessageListResponse, SendMessageRequest, SendMessageResponse};
use crate::web::AppState;

/// Default page size when the caller does not ask for one.
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Send a message from an agent.
///
/// Returns 202: the message was accepted for delivery, not delivered.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), StatusCode> {
    // The sender must be registered.
    state.registry.get(&id).await.map_err(reject)?;

    if req.to.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let message = state.broker.send(&id, req).await.map_err(reject)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SendMessageResponse {
            channel: channel::resolve(&message.to),
            message_id: message.id,
            created_at: message.created_at,
        }),
    ))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Get an agent's message history, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MessageListResponse>, StatusCode> {
    state.registry.get(&id).await.map_err(reject)?;

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let messages = state.broker.history(&id, limit).await.map_err(reject)?;
    let count = messages.len();

    Ok(Json(MessageListResponse { messages, count }))
}
