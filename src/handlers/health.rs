use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;

/// GET /health - pings the store
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => ApiResponse::with_status(
            json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.message
            }),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
    }
}
