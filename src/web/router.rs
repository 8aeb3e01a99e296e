//! Route definitions for the web server.

use axum::{
    routing::{get, post},
    Router,
};

use super::api;
use super::AppState;

/// Create the API router.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // Agents
        .route(
            "/agents",
            get(api::agents::list_agents).post(api::agents::register_agent),
        )
        .route(
            "/agents/:id",
            get(api::agents::get_agent)
                .put(api::agents::update_agent)
                .delete(api::agents::delete_agent),
        )
        .route("/agents/:id/heartbeat", post(api::agents::heartbeat))
        // Messages
        .route(
            "/agents/:id/messages",
            post(api::messages::send_message).get(api::messages::list_messages),
        )
        // Memory
        .route(
            "/agents/:id/memory",
            post(api::memory::store_memory)
                .get(api::memory::get_memory)
                .delete(api::memory::delete_memory),
        )
}

/// Create the full app router.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", create_api_router())
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        .with_state(state)
}
