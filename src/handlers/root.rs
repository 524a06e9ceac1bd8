use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::StoreHandle;

pub const SERVICE_NAME: &str = "prize-history-server";

/// GET / - Static liveness payload
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

/// GET /health - Liveness plus a store round trip
pub async fn health(Extension(StoreHandle(store)): Extension<StoreHandle>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": SERVICE_NAME,
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": SERVICE_NAME,
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
