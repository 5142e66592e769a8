//! Sugarcane disease prediction
//!
//! This module provides:
//! - Image preprocessing into the tensor shape the ensemble members expect
//! - Ensemble averaging over up to four independently loaded models
//! - A deterministic color heuristic used when no model could be loaded
//! - The predictor that picks between ensemble, demo mode and heuristic
//!
//! ## Classes
//!
//! | index | label   |
//! |-------|---------|
//! | 0     | Healthy |
//! | 1     | Mosaic  |
//! | 2     | RedRot  |
//! | 3     | Rust    |
//! | 4     | Yellow  |

pub mod ensemble;
pub mod heuristic;
pub mod predictor;
pub mod preprocess;

pub use ensemble::{average_probabilities, Ensemble, EnsembleOutput};
pub use heuristic::{classify_means, heuristic_predict, ChannelMeans};
pub use predictor::{DiseasePrediction, DiseasePredictor, PredictionSource};
pub use preprocess::{load_image_tensor, preprocess_image};

use serde::{Deserialize, Serialize};

/// Number of disease classes
pub const NUM_CLASSES: usize = 5;

/// Label names indexed by class
pub const CLASS_NAMES: [&str; NUM_CLASSES] = ["Healthy", "Mosaic", "RedRot", "Rust", "Yellow"];

/// Candidate model artifacts, relative to the models directory, in load order
pub const MODEL_CANDIDATES: [&str; 4] = [
    "model2_84percentacc.onnx",
    "82_test_acc.onnx",
    "mobilenet_model.onnx",
    "inceptionv3_80.onnx",
];

/// Sugarcane disease class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseClass {
    Healthy,
    Mosaic,
    RedRot,
    Rust,
    Yellow,
}

impl DiseaseClass {
    pub const ALL: [DiseaseClass; NUM_CLASSES] = [
        DiseaseClass::Healthy,
        DiseaseClass::Mosaic,
        DiseaseClass::RedRot,
        DiseaseClass::Rust,
        DiseaseClass::Yellow,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        CLASS_NAMES[self.index()]
    }
}

impl std::fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Get the class name for a given label index
pub fn class_name(index: usize) -> Option<&'static str> {
    CLASS_NAMES.get(index).copied()
}
