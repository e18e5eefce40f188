//! Liveness endpoint
//!
//! `GET /` answers as long as the server is accepting requests.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness handler
pub async fn handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "FoundersLens API is running",
        }),
    )
}
