//! ONNX artifacts executed in-process with tract
//!
//! Both loaders fix the input fact up front so tract can fully optimize the
//! graph once at startup; after that a plan is read-only and shared across
//! requests.

use std::path::Path;

use tract_onnx::prelude::*;
use tracing::debug;

use super::{ImageClassifier, ImageTensor, TabularClassifier, IMAGE_INPUT_SHAPE};
use crate::utils::error::{AgriError, Result};

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Build an optimized runnable plan for a model with one fixed-shape f32 input
fn load_plan(path: &Path, input_shape: &[usize]) -> Result<OnnxPlan> {
    if !path.exists() {
        return Err(AgriError::ModelLoad(
            path.to_path_buf(),
            "file not found".to_string(),
        ));
    }

    tract_onnx::onnx()
        .model_for_path(path)
        .and_then(|model| model.with_input_fact(0, f32::fact(input_shape.to_vec()).into()))
        .and_then(|model| model.into_optimized())
        .and_then(|model| model.into_runnable())
        .map_err(|e| AgriError::ModelLoad(path.to_path_buf(), e.to_string()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Image classifier artifact (`[1, 224, 224, 3]` in, class probabilities out)
pub struct OnnxImageModel {
    name: String,
    plan: OnnxPlan,
}

impl OnnxImageModel {
    pub fn load(path: &Path) -> Result<Self> {
        let plan = load_plan(path, &IMAGE_INPUT_SHAPE)?;
        debug!("Loaded image model {:?}", path);
        Ok(Self {
            name: file_label(path),
            plan,
        })
    }
}

impl ImageClassifier for OnnxImageModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
        let tensor = Tensor::from_shape(&input.shape(), input.data())
            .map_err(|e| AgriError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| AgriError::Inference(format!("{}: {}", self.name, e)))?;

        let first = outputs
            .first()
            .ok_or_else(|| AgriError::Inference(format!("{} produced no output", self.name)))?;
        let probabilities = first
            .cast_to::<f32>()
            .and_then(|t| t.as_slice::<f32>().map(|s| s.to_vec()))
            .map_err(|e| AgriError::Inference(format!("{}: {}", self.name, e)))?;

        Ok(probabilities)
    }
}

/// Tabular classifier artifact (`[1, n_features]` in, predicted label first out)
pub struct OnnxTabularModel {
    name: String,
    num_features: usize,
    plan: OnnxPlan,
}

impl OnnxTabularModel {
    pub fn load(path: &Path, num_features: usize) -> Result<Self> {
        let plan = load_plan(path, &[1, num_features])?;
        debug!("Loaded tabular model {:?} ({} features)", path, num_features);
        Ok(Self {
            name: file_label(path),
            num_features,
            plan,
        })
    }
}

impl TabularClassifier for OnnxTabularModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<i64> {
        if features.len() != self.num_features {
            return Err(AgriError::InvalidInput(format!(
                "{} expects {} features, got {}",
                self.name,
                self.num_features,
                features.len()
            )));
        }

        let tensor = Tensor::from_shape(&[1, self.num_features], features)
            .map_err(|e| AgriError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| AgriError::Inference(format!("{}: {}", self.name, e)))?;

        let label = outputs
            .first()
            .ok_or_else(|| AgriError::Inference(format!("{} produced no output", self.name)))?;

        // Label dtype depends on the exporter (int64 for most, sometimes float)
        let value = label
            .cast_to::<i64>()
            .and_then(|t| t.as_slice::<i64>().map(|s| s.first().copied()))
            .map_err(|e| AgriError::Inference(format!("{}: {}", self.name, e)))?;

        value.ok_or_else(|| AgriError::Inference(format!("{} returned an empty label", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn uniform_image(r: f32, g: f32, b: f32) -> ImageTensor {
        let pixels = IMAGE_INPUT_SHAPE.iter().product::<usize>() / 3;
        let data = std::iter::repeat([r, g, b]).take(pixels).flatten().collect();
        ImageTensor::new(IMAGE_INPUT_SHAPE, data).unwrap()
    }

    #[test]
    fn test_image_model_runs_fixture() {
        // Graph: per-channel mean followed by two constant scores
        let model = OnnxImageModel::load(&fixture("channel_means.onnx")).unwrap();
        assert_eq!(model.name(), "channel_means.onnx");

        let output = model.predict(&uniform_image(0.2, 0.4, 0.6)).unwrap();
        let expected = [0.2, 0.4, 0.6, 0.25, 0.5];
        assert_eq!(output.len(), expected.len());
        for (got, want) in output.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-5, "{got} vs {want}");
        }
    }

    #[test]
    fn test_tabular_model_runs_fixture() {
        // Graph: label is the index of the largest feature
        let model = OnnxTabularModel::load(&fixture("largest_feature.onnx"), 6).unwrap();

        assert_eq!(model.predict(&[3.0, 1.0, 45.2, 80.0, 40.0, 35.0]).unwrap(), 3);
        assert_eq!(model.predict(&[9.0, 1.0, 0.5, 2.0, 1.0, 0.1]).unwrap(), 0);
    }

    #[test]
    fn test_tabular_model_checks_feature_count() {
        let model = OnnxTabularModel::load(&fixture("largest_feature.onnx"), 6).unwrap();
        assert!(matches!(
            model.predict(&[1.0, 2.0, 3.0]),
            Err(AgriError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_image_model_reports_path() {
        let path = Path::new("models/does_not_exist.onnx");
        let err = OnnxImageModel::load(path).err().expect("load should fail");
        assert!(matches!(err, AgriError::ModelLoad(ref p, _) if p == path));
    }

    #[test]
    fn test_corrupt_tabular_model_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.onnx");
        std::fs::write(&path, b"definitely not protobuf").unwrap();

        let err = OnnxTabularModel::load(&path, 6).err().expect("load should fail");
        assert!(matches!(err, AgriError::ModelLoad(_, _)));
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("models/mobilenet_model.onnx")), "mobilenet_model.onnx");
    }
}
