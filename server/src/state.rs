//! Application state for the inference services
//!
//! Both services hold their predictor behind an `Arc`; nothing is mutated
//! after startup, so handlers share it without locking.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use agri_inference::config::{CropServiceConfig, DiseaseServiceConfig};
use agri_inference::crop::CropRecommender;
use agri_inference::disease::DiseasePredictor;

/// Startup timestamps shared by both services
#[derive(Clone, Debug)]
pub struct Uptime {
    started: Instant,
    pub started_at: DateTime<Utc>,
}

impl Uptime {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

/// Crop recommendation service state
pub struct CropState {
    pub recommender: CropRecommender,
    pub config: CropServiceConfig,
    pub uptime: Uptime,
}

impl CropState {
    pub fn new(recommender: CropRecommender, config: CropServiceConfig) -> Self {
        Self {
            recommender,
            config,
            uptime: Uptime::start(),
        }
    }

    /// Load the model named in `config`; a missing artifact leaves the service degraded
    pub fn load(config: CropServiceConfig) -> Self {
        let recommender = CropRecommender::load(&config.model_path);
        Self::new(recommender, config)
    }

    pub fn models_loaded(&self) -> usize {
        usize::from(self.recommender.is_ready())
    }
}

/// Sugarcane disease service state
pub struct DiseaseState {
    pub predictor: DiseasePredictor,
    pub config: DiseaseServiceConfig,
    pub uptime: Uptime,
}

impl DiseaseState {
    pub fn new(predictor: DiseasePredictor, config: DiseaseServiceConfig) -> Self {
        Self {
            predictor,
            config,
            uptime: Uptime::start(),
        }
    }

    pub fn load(config: DiseaseServiceConfig) -> Self {
        let predictor = DiseasePredictor::load(&config);
        Self::new(predictor, config)
    }

    pub fn models_loaded(&self) -> usize {
        self.predictor.models_loaded()
    }
}

pub type SharedCropState = Arc<CropState>;
pub type SharedDiseaseState = Arc<DiseaseState>;
