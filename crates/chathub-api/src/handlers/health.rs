//! Health check handler.

use axum::Json;
use axum::extract::State;

use chathub_core::traits::KeyValueStore;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache = match state.cache.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "unreachable",
        Err(e) => {
            tracing::warn!(error = %e, "Revocation store health check failed");
            "unreachable"
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if cache == "connected" { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: cache.to_string(),
    }))
}
