//! # Agricultural Inference
//!
//! Inference library behind two field services:
//!
//! - **Crop recommendation**: maps soil measurements and categorical field
//!   history to a recommended crop through a pre-trained tabular classifier.
//! - **Sugarcane disease**: maps a leaf image to one of five disease classes
//!   through an ensemble of pre-trained image classifiers, with a random demo
//!   mode and a deterministic color heuristic when no model is available.
//!
//! ## Modules
//!
//! - `crop`: request parsing, category tables, and the recommender
//! - `disease`: preprocessing, ensemble averaging, heuristic, and predictor
//! - `model`: classifier traits and the ONNX (tract) artifact loaders
//! - `config`: service configuration and environment toggles
//! - `utils`: logging, error types, and helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agri_inference::crop::{CropRecommender, CropRequest};
//!
//! let recommender = CropRecommender::load("crop_rotation_recommendation_model.onnx".as_ref());
//! let request = CropRequest::from_json(br#"{"Previous Crop": "Wheat", "Soil Type": "Loamy"}"#)?;
//! println!("{}", recommender.recommend(&request)?.label());
//! ```

pub mod config;
pub mod crop;
pub mod disease;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{CropServiceConfig, DiseaseServiceConfig};
pub use crop::{CropRecommender, CropRequest, FeatureVector, Recommendation};
pub use disease::{DiseaseClass, DiseasePrediction, DiseasePredictor, PredictionSource};
pub use model::{ImageClassifier, ImageTensor, TabularClassifier};
pub use utils::error::{AgriError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
