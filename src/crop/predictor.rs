//! Crop Recommender
//!
//! Wraps the (optional) crop classifier loaded at startup. A missing or
//! corrupt artifact does not stop the service; every request then fails
//! fast with [`AgriError::ModelUnavailable`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::mapping::crop_label;
use super::{CropRequest, FeatureVector, NUM_FEATURES};
use crate::model::{OnnxTabularModel, TabularClassifier};
use crate::utils::error::{AgriError, Result};

/// Label returned when the model predicts a class outside the crop table
pub const NO_PREDICTION: &str = "No prediction available";

/// Outcome of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// The predicted class maps to a known crop
    Crop(&'static str),
    /// The model answered with a class that has no label
    NoPrediction { class_index: i64 },
}

impl Recommendation {
    /// Text for the `Recommended Crop` response field
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Crop(name) => name,
            Recommendation::NoPrediction { .. } => NO_PREDICTION,
        }
    }
}

/// Crop recommendation service state, immutable after construction
pub struct CropRecommender {
    model: Option<Box<dyn TabularClassifier>>,
    model_path: PathBuf,
}

impl CropRecommender {
    /// Recommender backed by an already-loaded classifier
    pub fn new(model: Box<dyn TabularClassifier>) -> Self {
        let model_path = PathBuf::from(model.name());
        Self {
            model: Some(model),
            model_path,
        }
    }

    /// Recommender with no model; every request reports the missing artifact
    pub fn unavailable(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model: None,
            model_path: model_path.into(),
        }
    }

    /// Load the ONNX artifact at `path`, degrading to [`CropRecommender::unavailable`]
    pub fn load(path: &Path) -> Self {
        match OnnxTabularModel::load(path, NUM_FEATURES) {
            Ok(model) => {
                info!("Loaded crop model from {:?}", path);
                Self {
                    model: Some(Box::new(model)),
                    model_path: path.to_path_buf(),
                }
            }
            Err(e) => {
                warn!("Failed to load crop model: {}", e);
                Self::unavailable(path)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn model(&self) -> Result<&dyn TabularClassifier> {
        self.model.as_deref().ok_or_else(|| {
            AgriError::ModelUnavailable(format!(
                "Model not loaded. Ensure {} exists.",
                self.model_path.display()
            ))
        })
    }

    /// Fail with [`AgriError::ModelUnavailable`] when no model was loaded
    pub fn ensure_ready(&self) -> Result<()> {
        self.model().map(|_| ())
    }

    /// Recommend a crop for one request
    pub fn recommend(&self, request: &CropRequest) -> Result<Recommendation> {
        let model = self.model()?;

        let features = FeatureVector::from_request(request);
        debug!("Feature row: {:?}", features);

        let class_index = model.predict(&features.to_row())?;
        debug!("Prediction: {}", class_index);

        Ok(match crop_label(class_index) {
            Some(name) => Recommendation::Crop(name),
            None => Recommendation::NoPrediction { class_index },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Returns a fixed class and remembers the last row it saw
    struct FixedClassifier {
        class: i64,
        seen: Arc<Mutex<Option<Vec<f32>>>>,
    }

    impl FixedClassifier {
        fn boxed(class: i64) -> Box<dyn TabularClassifier> {
            Box::new(Self {
                class,
                seen: Arc::new(Mutex::new(None)),
            })
        }
    }

    impl TabularClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, features: &[f32]) -> Result<i64> {
            *self.seen.lock().unwrap() = Some(features.to_vec());
            Ok(self.class)
        }
    }

    struct FailingClassifier;

    impl TabularClassifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _features: &[f32]) -> Result<i64> {
            Err(AgriError::Inference("input contains NaN".to_string()))
        }
    }

    fn sample_request() -> CropRequest {
        CropRequest {
            previous_crop: Some("Maize".to_string()),
            soil_type: Some("Sandy".to_string()),
            moisture_level: Some(30.0),
            nitrogen: Some(50.0),
            phosphorus: Some(20.0),
            potassium: Some(10.0),
        }
    }

    #[test]
    fn test_known_class_maps_to_crop() {
        let recommender = CropRecommender::new(FixedClassifier::boxed(2));
        let recommendation = recommender.recommend(&sample_request()).unwrap();
        assert_eq!(recommendation, Recommendation::Crop("Rice"));
        assert_eq!(recommendation.label(), "Rice");
    }

    #[test]
    fn test_unknown_class_is_soft_no_prediction() {
        for class in [0, 9, -1] {
            let recommender = CropRecommender::new(FixedClassifier::boxed(class));
            let recommendation = recommender.recommend(&sample_request()).unwrap();
            assert_eq!(recommendation.label(), "No prediction available");
            assert_eq!(recommendation, Recommendation::NoPrediction { class_index: class });
        }
    }

    #[test]
    fn test_row_passed_in_column_order() {
        let seen = Arc::new(Mutex::new(None));
        let recommender = CropRecommender::new(Box::new(FixedClassifier {
            class: 1,
            seen: Arc::clone(&seen),
        }));

        recommender.recommend(&sample_request()).unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(vec![4.0, 3.0, 30.0, 50.0, 20.0, 10.0])
        );
    }

    #[test]
    fn test_missing_model_fails_fast() {
        let recommender = CropRecommender::unavailable("crop_rotation_recommendation_model.onnx");
        assert!(!recommender.is_ready());
        assert!(recommender.ensure_ready().is_err());

        let err = recommender.recommend(&sample_request()).unwrap_err();
        assert!(matches!(err, AgriError::ModelUnavailable(_)));
        assert!(err.to_string().starts_with("Model not loaded."));
        assert!(err.to_string().contains("crop_rotation_recommendation_model.onnx"));
    }

    #[test]
    fn test_load_missing_artifact_degrades() {
        let recommender = CropRecommender::load(Path::new("no/such/model.onnx"));
        assert!(!recommender.is_ready());
        assert_eq!(recommender.model_path(), Path::new("no/such/model.onnx"));
    }

    #[test]
    fn test_load_onnx_artifact() {
        // Fixture graph answers with the index of the largest feature
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/largest_feature.onnx");
        let recommender = CropRecommender::load(&path);
        assert!(recommender.is_ready());

        // Row is [4, 3, 30, 50, 20, 10]; nitrogen sits at index 3
        let recommendation = recommender.recommend(&sample_request()).unwrap();
        assert_eq!(recommendation, Recommendation::Crop("Millets"));
    }

    #[test]
    fn test_model_errors_propagate() {
        let recommender = CropRecommender::new(Box::new(FailingClassifier));
        let err = recommender.recommend(&CropRequest::default()).unwrap_err();
        assert!(matches!(err, AgriError::Inference(_)));
    }
}
