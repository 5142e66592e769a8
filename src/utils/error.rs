//! Error Handling Module
//!
//! Defines the error type shared by the crop and disease services.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for agricultural inference operations
#[derive(Error, Debug)]
pub enum AgriError {
    /// Error loading or decoding an image file
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Error decoding an in-memory image
    #[error("Image error: {0}")]
    Image(String),

    /// A model artifact exists but could not be loaded
    #[error("Failed to load model at '{0}': {1}")]
    ModelLoad(PathBuf, String),

    /// No model artifact is available to serve the request
    #[error("{0}")]
    ModelUnavailable(String),

    /// Error while running a loaded model
    #[error("Inference error: {0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AgriError {
    /// Whether the error was caused by the caller's payload rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AgriError::InvalidInput(_) | AgriError::Serialization(_) | AgriError::Image(_)
        )
    }
}

impl From<serde_json::Error> for AgriError {
    fn from(err: serde_json::Error) -> Self {
        AgriError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for AgriError {
    fn from(err: image::ImageError) -> Self {
        AgriError::Image(err.to_string())
    }
}

/// Convenience Result type for agricultural inference operations
pub type Result<T> = std::result::Result<T, AgriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgriError::Inference("test error".to_string());
        assert_eq!(format!("{}", err), "Inference error: test error");
    }

    #[test]
    fn test_model_unavailable_is_verbatim() {
        let err = AgriError::ModelUnavailable("Model not loaded.".to_string());
        assert_eq!(err.to_string(), "Model not loaded.");
    }

    #[test]
    fn test_image_load_error() {
        let path = PathBuf::from("/path/to/leaf.jpg");
        let err = AgriError::ImageLoad(path, "file not found".to_string());
        assert!(format!("{}", err).contains("leaf.jpg"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AgriError::InvalidInput("bad".into()).is_client_error());
        assert!(!AgriError::Inference("boom".into()).is_client_error());
        assert!(!AgriError::ModelUnavailable("none".into()).is_client_error());
    }
}
