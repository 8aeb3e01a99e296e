//! Health and readiness endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::web::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub services: HashMap<String, String>,
}

/// Liveness: always 200, reports per-service health in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut services = HashMap::new();
    let mut status = "healthy";

    match state.store.ping().await {
        Ok(()) => {
            services.insert("store".to_string(), "healthy".to_string());
        }
        Err(e) => {
            status = "degraded";
            services.insert("store".to_string(), format!("unhealthy: {}", e));
        }
    }

    match state.bus.ping().await {
        Ok(()) => {
            services.insert("transport".to_string(), "healthy".to_string());
        }
        Err(e) => {
            status = "degraded";
            services.insert("transport".to_string(), format!("unhealthy: {}", e));
        }
    }

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        services,
    })
}

/// Readiness: 503 until the backing services answer.
pub async fn ready(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    if state.store.ping().await.is_err() || state.bus.ping().await.is_err() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok("OK")
}
