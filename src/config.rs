//! Service configuration
//!
//! Defaults match the deployed services; the binaries layer CLI flags and
//! environment variables (`PORT`, `HOST`, ...) on top.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::disease::MODEL_CANDIDATES;
use crate::utils::error::{AgriError, Result};

/// Default bind address for both services
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the crop recommendation service
pub const CROP_DEFAULT_PORT: u16 = 5005;

/// Default port of the disease service
pub const DISEASE_DEFAULT_PORT: u16 = 5006;

/// Default crop model artifact
pub const CROP_MODEL_FILE: &str = "crop_rotation_recommendation_model.onnx";

/// Default directory holding the disease model candidates
pub const DISEASE_MODELS_DIR: &str = "models";

/// Environment toggle for random demo predictions
pub const DEMO_MODE_ENV: &str = "SUGARCANE_DEMO_MODE";

fn socket_addr(host: &str, port: u16) -> Result<SocketAddr> {
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| AgriError::Config(format!("invalid bind address {}:{}: {}", host, port, e)))
}

/// Crop recommendation service configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropServiceConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path to the crop classifier artifact
    pub model_path: PathBuf,
}

impl Default for CropServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: CROP_DEFAULT_PORT,
            model_path: PathBuf::from(CROP_MODEL_FILE),
        }
    }
}

impl CropServiceConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        socket_addr(&self.host, self.port)
    }
}

/// Sugarcane disease service configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseaseServiceConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory containing the candidate model artifacts
    pub models_dir: PathBuf,
    /// Answer with random classes when no model loaded
    pub demo_mode: bool,
}

impl Default for DiseaseServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DISEASE_DEFAULT_PORT,
            models_dir: PathBuf::from(DISEASE_MODELS_DIR),
            demo_mode: false,
        }
    }
}

impl DiseaseServiceConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        socket_addr(&self.host, self.port)
    }

    /// Candidate artifact paths in load order
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        MODEL_CANDIDATES
            .iter()
            .map(|name| self.models_dir.join(name))
            .collect()
    }
}

/// Demo mode is on only for the exact value `1` (surrounding whitespace ignored)
pub fn demo_mode_enabled(value: Option<&str>) -> bool {
    value.map(|v| v.trim() == "1").unwrap_or(false)
}

/// Read the demo toggle from `SUGARCANE_DEMO_MODE`
pub fn demo_mode_from_env() -> bool {
    demo_mode_enabled(std::env::var(DEMO_MODE_ENV).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_defaults() {
        let config = CropServiceConfig::default();
        assert_eq!(config.port, 5005);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:5005".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bad_host_is_config_error() {
        let config = CropServiceConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.socket_addr(), Err(AgriError::Config(_))));
    }

    #[test]
    fn test_disease_candidates_in_order() {
        let config = DiseaseServiceConfig::default();
        let paths = config.candidate_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], PathBuf::from("models/model2_84percentacc.onnx"));
        assert_eq!(paths[3], PathBuf::from("models/inceptionv3_80.onnx"));
    }

    #[test]
    fn test_demo_mode_values() {
        assert!(demo_mode_enabled(Some("1")));
        assert!(demo_mode_enabled(Some(" 1\n")));
        for value in ["0", "true", "yes", "", "11"] {
            assert!(!demo_mode_enabled(Some(value)), "{value:?}");
        }
        assert!(!demo_mode_enabled(None));
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_value(DiseaseServiceConfig::default()).unwrap();
        assert_eq!(json["models_dir"], "models");
        assert_eq!(json["demo_mode"], false);
    }
}
