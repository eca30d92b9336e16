use axum::Json;
use chrono::Utc;

/// Handler for `GET /api/health`. Used by the desktop client to probe the
/// API before opening a library.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "API is running",
        "timestamp": Utc::now(),
    }))
}
