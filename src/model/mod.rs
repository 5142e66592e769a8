//! Model module: classifier seams and the ONNX-backed implementations
//!
//! Artifacts are opaque pre-trained graphs. The services only ever talk to
//! them through the two traits below, so anything that can produce a class
//! index from a feature row, or a probability vector from an image tensor,
//! can stand in for an artifact (tests use small in-memory classifiers).

pub mod onnx;

pub use onnx::{OnnxImageModel, OnnxTabularModel};

use crate::utils::error::{AgriError, Result};

/// Input shape expected by the disease image models: NHWC with batch 1
pub const IMAGE_INPUT_SHAPE: [usize; 4] = [1, 224, 224, 3];

/// A classifier over a single tabular row
pub trait TabularClassifier: Send + Sync {
    /// Human-readable name, usually the artifact file name
    fn name(&self) -> &str;

    /// Predict one integer class for a row of features
    fn predict(&self, features: &[f32]) -> Result<i64>;
}

/// A classifier over a preprocessed image batch
pub trait ImageClassifier: Send + Sync {
    /// Human-readable name, usually the artifact file name
    fn name(&self) -> &str;

    /// Raw output probability vector for the (single-image) batch
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;
}

/// A dense f32 image batch in NHWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    /// Wrap raw NHWC data, checking that it fills the shape exactly
    pub fn new(shape: [usize; 4], data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(AgriError::InvalidInput(format!(
                "tensor data has {} values, shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_tensor_shape_check() {
        assert!(ImageTensor::new([1, 2, 2, 3], vec![0.0; 12]).is_ok());
        assert!(matches!(
            ImageTensor::new([1, 2, 2, 3], vec![0.0; 11]),
            Err(AgriError::InvalidInput(_))
        ));
    }
}
