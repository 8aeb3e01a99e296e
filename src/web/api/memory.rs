//! API endpoints proxying the agent-memory service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use super::reject;
use crate::protocol::memory::{MemoryKind, MemoryRecord, StoreMemoryRequest, StoreMemoryResponse};
use crate::web::AppState;

/// Short-term memory stored without an explicit TTL expires after this.
const DEFAULT_SHORT_TERM_TTL: Duration = Duration::from_secs(60 * 60);

/// Store a memory record for an agent.
pub async fn store_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StoreMemoryRequest>,
) -> Result<(StatusCode, Json<StoreMemoryResponse>), StatusCode> {
    state.registry.get(&id).await.map_err(reject)?;

    if req.key.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match req.kind {
        MemoryKind::ShortTerm => {
            let ttl = if req.ttl_seconds == 0 {
                DEFAULT_SHORT_TERM_TTL
            } else {
                Duration::from_secs(req.ttl_seconds)
            };
            state
                .memory
                .store_short_term(&id, &req.key, req.value, ttl)
                .await
                .map_err(reject)?;
        }
        MemoryKind::LongTerm => {
            state
                .memory
                .store_long_term(&id, &req.key, req.value)
                .await
                .map_err(reject)?;
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(StoreMemoryResponse {
            key: req.key,
            stored_at: Utc::now(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct MemoryQuery {
    pub key: String,
    /// "short_term" or "long_term"; defaults to long-term.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn parse_kind(kind: Option<&str>) -> Result<MemoryKind, StatusCode> {
    match kind {
        Some("short_term") => Ok(MemoryKind::ShortTerm),
        Some("long_term") | None => Ok(MemoryKind::LongTerm),
        Some(_) => Err(StatusCode::BAD_REQUEST),
    }
}

/// Retrieve a memory record for an agent.
pub async fn get_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MemoryQuery>,
) -> Result<Json<MemoryRecord>, StatusCode> {
    state.registry.get(&id).await.map_err(reject)?;

    let kind = parse_kind(query.kind.as_deref())?;
    let record = state
        .memory
        .get(kind, &id, &query.key)
        .await
        .map_err(reject)?;

    Ok(Json(record))
}

/// Delete a memory record for an agent.
pub async fn delete_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MemoryQuery>,
) -> Result<StatusCode, StatusCode> {
    state.registry.get(&id).await.map_err(reject)?;

    let kind = parse_kind(query.kind.as_deref())?;
    state
        .memory
        .delete(kind, &id, &query.key)
        .await
        .map_err(reject)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(Some("short_term")), Ok(MemoryKind::ShortTerm));
        assert_eq!(parse_kind(Some("long_term")), Ok(MemoryKind::LongTerm));
        assert_eq!(parse_kind(None), Ok(MemoryKind::LongTerm));
        assert_eq!(parse_kind(Some("bogus")), Err(StatusCode::BAD_REQUEST));
    }
}
