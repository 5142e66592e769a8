//! Health check endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{SharedCropState, SharedDiseaseState, Uptime};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub models_loaded: usize,
}

impl HealthResponse {
    fn new(service: &str, uptime: &Uptime, models_loaded: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: uptime.started_at,
            uptime_seconds: uptime.seconds(),
            models_loaded,
        }
    }
}

/// GET /health - crop recommendation service
pub async fn crop_health(State(state): State<SharedCropState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        "crop_recommendation",
        &state.uptime,
        state.models_loaded(),
    ))
}

/// GET /health - sugarcane disease service
pub async fn disease_health(State(state): State<SharedDiseaseState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        "sugarcane_disease",
        &state.uptime,
        state.models_loaded(),
    ))
}
