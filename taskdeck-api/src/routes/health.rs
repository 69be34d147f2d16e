/// Health check endpoint

use axum::Json;
use serde_json::{json, Value};

/// GET /health
///
/// Liveness probe. Unauthenticated, does not touch the database.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": taskdeck_shared::VERSION,
    }))
}
