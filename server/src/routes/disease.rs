//! Sugarcane disease prediction endpoint

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use agri_inference::disease::DiseasePrediction;

use super::{run_blocking, ApiError};
use crate::state::SharedDiseaseState;

/// Multipart field names accepted for the uploaded image
pub const UPLOAD_FIELDS: [&str; 2] = ["file", "image"];

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub prediction: DiseasePrediction,
    pub models_loaded: usize,
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<Bytes>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let wanted = field
            .name()
            .map(|name| UPLOAD_FIELDS.contains(&name))
            .unwrap_or(false);
        if wanted {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(Some(data));
        }
    }
    Ok(None)
}

/// POST /predict - classify an uploaded leaf image
pub async fn predict(
    State(state): State<SharedDiseaseState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let data = read_upload(multipart)
        .await?
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ApiError::bad_request("No image uploaded (expected field 'file')"))?;

    let worker = state.clone();
    let prediction = run_blocking(move || worker.predictor.predict_bytes(&data)).await?;
    info!(
        "Predicted {} (class {}) via {}",
        prediction.label.unwrap_or("Unknown"),
        prediction.class_index,
        prediction.source
    );

    Ok(Json(PredictResponse {
        prediction,
        models_loaded: state.models_loaded(),
    }))
}
