//! Disease Predictor
//!
//! Chooses how a request is answered:
//! - at least one model loaded: ensemble average
//! - no model, demo mode on: uniformly random class
//! - no model, demo mode off: color heuristic

use std::path::Path;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::ensemble::Ensemble;
use super::heuristic::{classify_bytes, heuristic_predict};
use super::preprocess::{load_image_tensor, preprocess_image};
use super::{class_name, DiseaseClass, NUM_CLASSES};
use crate::config::DiseaseServiceConfig;
use crate::model::ImageTensor;
use crate::utils::error::Result;

/// Which path produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Ensemble,
    Demo,
    Heuristic,
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionSource::Ensemble => write!(f, "ensemble"),
            PredictionSource::Demo => write!(f, "demo"),
            PredictionSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Result of a single disease prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseasePrediction {
    /// Predicted class index
    pub class_index: usize,

    /// Class label, `None` if a model emitted more classes than are known
    pub label: Option<&'static str>,

    pub source: PredictionSource,

    /// Averaged probabilities; only the ensemble path produces them
    pub probabilities: Option<Vec<f32>>,
}

impl DiseasePrediction {
    fn new(class_index: usize, source: PredictionSource, probabilities: Option<Vec<f32>>) -> Self {
        Self {
            class_index,
            label: class_name(class_index),
            source,
            probabilities,
        }
    }
}

/// Disease service state, immutable after startup
pub struct DiseasePredictor {
    ensemble: Ensemble,
    demo_mode: bool,
}

impl DiseasePredictor {
    pub fn new(ensemble: Ensemble, demo_mode: bool) -> Self {
        Self {
            ensemble,
            demo_mode,
        }
    }

    /// Load every candidate under the configured models directory
    pub fn load(config: &DiseaseServiceConfig) -> Self {
        Self::new(Ensemble::load(&config.candidate_paths()), config.demo_mode)
    }

    pub fn models_loaded(&self) -> usize {
        self.ensemble.len()
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    /// Class index only
    pub fn predict_class(&self, path: &Path) -> Result<usize> {
        self.predict_path(path).map(|p| p.class_index)
    }

    /// Predict from an image file
    pub fn predict_path(&self, path: &Path) -> Result<DiseasePrediction> {
        self.predict_with(|| load_image_tensor(path), || heuristic_predict(path))
    }

    /// Predict from encoded image bytes (an upload)
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<DiseasePrediction> {
        self.predict_with(
            || preprocess_image(&image::load_from_memory(bytes)?),
            || classify_bytes(bytes),
        )
    }

    fn predict_with<T, H>(&self, tensor: T, heuristic: H) -> Result<DiseasePrediction>
    where
        T: FnOnce() -> Result<ImageTensor>,
        H: FnOnce() -> DiseaseClass,
    {
        let prediction = if !self.ensemble.is_empty() {
            let input = tensor()?;
            let output = self.ensemble.predict(&input)?;
            DiseasePrediction::new(
                output.class_index,
                PredictionSource::Ensemble,
                Some(output.probabilities),
            )
        } else if self.demo_mode {
            let class_index = rand::thread_rng().gen_range(0..NUM_CLASSES);
            DiseasePrediction::new(class_index, PredictionSource::Demo, None)
        } else {
            DiseasePrediction::new(heuristic().index(), PredictionSource::Heuristic, None)
        };

        debug!(
            "Disease prediction: class {} via {}",
            prediction.class_index, prediction.source
        );
        Ok(prediction)
    }
}
