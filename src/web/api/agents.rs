//! API endpoints for the agent registry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::reject;
use crate::protocol::agent::{
    Agent, AgentListResponse, RegisterAgentRequest, RegisterAgentResponse, UpdateAgentRequest,
};
use crate::web::AppState;

/// Register a new agent.
pub async fn register_agent(
    State(state): State<AppState>,
    Json(req): Json<RegisterAgentRequest>,
) -> Result<(StatusCode, Json<RegisterAgentResponse>), StatusCode> {
    if req.name.is_empty() || req.kind.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let agent = state.registry.register(req).await.map_err(reject)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterAgentResponse {
            id: agent.id,
            status: agent.status,
        }),
    ))
}

/// List all registered agents.
pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<AgentListResponse>, StatusCode> {
    let agents = state.registry.list().await.map_err(reject)?;
    let count = agents.len();

    Ok(Json(AgentListResponse { agents, count }))
}

/// Get a single agent.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, StatusCode> {
    let agent = state.registry.get(&id).await.map_err(reject)?;
    Ok(Json(agent))
}

/// Update an agent.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAgentRequest>,
) -> Result<Json<Agent>, StatusCode> {
    let agent = state.registry.update(&id, req).await.map_err(reject)?;
    Ok(Json(agent))
}

/// Unregister an agent.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.registry.unregister(&id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record an agent heartbeat.
pub async fn heartbeat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.registry.heartbeat(&id).await.map_err(reject)?;
    Ok(StatusCode::OK)
}
