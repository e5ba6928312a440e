use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub llm: String,
    pub notifications: String,
    pub destinations: usize,
}

/// Health check endpoint - public
///
/// The provider being down degrades the service but does not make it
/// unhealthy: validation, rendering and autocomplete still work.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let llm_result = state.llm_client.health_check().await;
    if let Err(e) = &llm_result {
        tracing::warn!(error = %e, "LLM provider health check failed");
    }

    let status = if llm_result.is_ok() { "healthy" } else { "degraded" };
    let notifications = if state.notifier.is_configured() {
        "configured"
    } else {
        "disabled"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                llm: if llm_result.is_ok() { "ok" } else { "error" }.to_string(),
                notifications: notifications.to_string(),
                destinations: state.catalog.len(),
            },
        }),
    )
}
