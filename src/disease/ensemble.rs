//! Model ensemble
//!
//! Every candidate artifact is loaded on its own; a missing or broken file
//! only drops that member. At prediction time all members see the same
//! tensor and their raw probability vectors are averaged elementwise. The
//! class is the arg-max of the average, never a vote over per-model
//! arg-maxes.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::NUM_CLASSES;
use crate::model::{ImageClassifier, ImageTensor, OnnxImageModel};
use crate::utils::argmax;
use crate::utils::error::{AgriError, Result};

/// Averaged ensemble output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleOutput {
    /// Index of the largest averaged probability
    pub class_index: usize,
    /// Elementwise mean of the member outputs
    pub probabilities: Vec<f32>,
}

/// Elementwise arithmetic mean of equally sized probability vectors
pub fn average_probabilities(outputs: &[Vec<f32>]) -> Result<Vec<f32>> {
    let first = outputs
        .first()
        .ok_or_else(|| AgriError::Inference("no model outputs to average".to_string()))?;

    let len = first.len();
    if let Some(bad) = outputs.iter().find(|o| o.len() != len) {
        return Err(AgriError::Inference(format!(
            "ensemble members disagree on output size ({} vs {})",
            len,
            bad.len()
        )));
    }

    let count = outputs.len() as f32;
    let mut mean = vec![0.0f32; len];
    for output in outputs {
        for (acc, &p) in mean.iter_mut().zip(output.iter()) {
            *acc += p;
        }
    }
    for acc in mean.iter_mut() {
        *acc /= count;
    }

    Ok(mean)
}

/// Zero to four image classifiers, immutable once loaded
#[derive(Default)]
pub struct Ensemble {
    members: Vec<Box<dyn ImageClassifier>>,
}

impl Ensemble {
    pub fn new(members: Vec<Box<dyn ImageClassifier>>) -> Self {
        Self { members }
    }

    /// Try every candidate path; failures are logged and skipped
    pub fn load(candidates: &[PathBuf]) -> Self {
        let mut members: Vec<Box<dyn ImageClassifier>> = Vec::new();

        for path in candidates {
            if !path.exists() {
                debug!("Disease model {:?} not present, skipping", path);
                continue;
            }
            match OnnxImageModel::load(path) {
                Ok(model) => {
                    info!("Loaded disease model {:?}", path);
                    members.push(Box::new(model));
                }
                Err(e) => warn!("Skipping disease model: {}", e),
            }
        }

        info!("{} of {} disease models loaded", members.len(), candidates.len());
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name().to_string()).collect()
    }

    /// Run every member on `input`, average, then take the arg-max
    pub fn predict(&self, input: &ImageTensor) -> Result<EnsembleOutput> {
        let outputs = self
            .members
            .iter()
            .map(|member| {
                let output = member.predict(input)?;
                debug!("{} -> {:?}", member.name(), output);
                Ok(output)
            })
            .collect::<Result<Vec<_>>>()?;

        let probabilities = average_probabilities(&outputs)?;
        if probabilities.len() != NUM_CLASSES {
            return Err(AgriError::Inference(format!(
                "expected {} class probabilities, models produced {}",
                NUM_CLASSES,
                probabilities.len()
            )));
        }
        let class_index = argmax(&probabilities).ok_or_else(|| {
            AgriError::Inference("averaged output has no finite values".to_string())
        })?;

        Ok(EnsembleOutput {
            class_index,
            probabilities,
        })
    }
}
