//! Liveness check.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Answers `{"status": "ok"}` while the process is serving.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
