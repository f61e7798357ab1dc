use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::routes::{success, Envelope};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health
pub async fn health_handler() -> Json<Envelope<HealthResponse>> {
    success(HealthResponse {
        message: "CV Generator API is running",
        timestamp: Utc::now(),
    })
}
