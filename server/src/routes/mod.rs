//! API route handlers

pub mod crop;
pub mod disease;
pub mod health;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use agri_inference::AgriError;

/// Error returned by every handler, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<AgriError> for ApiError {
    fn from(err: AgriError) -> Self {
        if err.is_client_error() {
            warn!("Rejected request: {}", err);
            Self::bad_request(err.to_string())
        } else {
            error!("Request failed: {}", err);
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Run CPU-bound inference off the async workers
///
/// A panic inside `f` surfaces as a 500 instead of tearing down the connection.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> agri_inference::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!("Inference task failed: {}", e);
            Err(ApiError::internal(format!("Inference task failed: {}", e)))
        }
    }
}
