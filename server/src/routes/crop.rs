//! Crop recommendation endpoint

use axum::body::Bytes;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use agri_inference::crop::CropRequest;

use super::{run_blocking, ApiError};
use crate::state::SharedCropState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CropResponse {
    #[serde(rename = "Recommended Crop")]
    pub recommended_crop: String,
}

/// POST /crop_recommendation - recommend a crop from field features
///
/// The body is parsed by hand so that any content type is accepted and
/// malformed JSON comes back as a JSON error.
pub async fn crop_recommendation(
    State(state): State<SharedCropState>,
    body: Bytes,
) -> Result<Json<CropResponse>, ApiError> {
    state.recommender.ensure_ready()?;

    let request = CropRequest::from_json(&body)?;
    debug!("Received data: {:?}", request);

    let worker = state.clone();
    let recommendation = run_blocking(move || worker.recommender.recommend(&request)).await?;
    info!("Recommended crop: {}", recommendation.label());

    Ok(Json(CropResponse {
        recommended_crop: recommendation.label().to_string(),
    }))
}
