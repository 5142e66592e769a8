//! Agricultural Inference CLI
//!
//! Runs the crop recommender and the sugarcane disease predictor locally,
//! without the HTTP services. Useful for checking exported artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use agri_inference::config::{
    demo_mode_from_env, DiseaseServiceConfig, CROP_MODEL_FILE, DISEASE_MODELS_DIR,
};
use agri_inference::crop::{CropRecommender, CropRequest, Recommendation};
use agri_inference::disease::heuristic::{classify_means, ChannelMeans};
use agri_inference::disease::{DiseasePredictor, PredictionSource};
use agri_inference::utils::format_millis;
use agri_inference::utils::logging::{init_logging, LogConfig};

/// Crop recommendation and sugarcane disease inference
#[derive(Parser, Debug)]
#[command(name = "agri-inference")]
#[command(version)]
#[command(about = "Crop recommendation and sugarcane disease inference", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recommend a crop from field features
    Recommend {
        /// Path to the crop model artifact
        #[arg(short, long, env = "CROP_MODEL_PATH", default_value = CROP_MODEL_FILE)]
        model: PathBuf,

        /// Read the request from a JSON file instead of flags
        #[arg(long)]
        json: Option<PathBuf>,

        /// Previous crop (e.g. Wheat)
        #[arg(long)]
        previous_crop: Option<String>,

        /// Soil type (e.g. Loamy)
        #[arg(long)]
        soil_type: Option<String>,

        /// Moisture level
        #[arg(long)]
        moisture: Option<f64>,

        /// Nitrogen (N)
        #[arg(long)]
        nitrogen: Option<f64>,

        /// Phosphorus (P)
        #[arg(long)]
        phosphorus: Option<f64>,

        /// Potassium (K)
        #[arg(long)]
        potassium: Option<f64>,
    },

    /// Predict the disease class of a sugarcane leaf image
    Diagnose {
        /// Path to the input image
        #[arg(short, long)]
        image: PathBuf,

        /// Directory with the candidate model artifacts
        #[arg(long, env = "SUGARCANE_MODELS_DIR", default_value = DISEASE_MODELS_DIR)]
        models_dir: PathBuf,

        /// Random predictions when no model is available
        #[arg(long, default_value = "false")]
        demo: bool,
    },

    /// Show the color statistics and heuristic class of an image
    Heuristic {
        /// Path to the input image
        #[arg(short, long)]
        image: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config =
        LogConfig::from_flags(cli.verbose, cli.log_level.as_deref(), LogConfig::default());

    let _ = init_logging(&log_config);

    match cli.command {
        Commands::Recommend {
            model,
            json,
            previous_crop,
            soil_type,
            moisture,
            nitrogen,
            phosphorus,
            potassium,
        } => {
            let request = match json {
                Some(path) => {
                    let body = std::fs::read(&path)
                        .with_context(|| format!("Failed to read {:?}", path))?;
                    CropRequest::from_json(&body)?
                }
                None => CropRequest {
                    previous_crop,
                    soil_type,
                    moisture_level: moisture,
                    nitrogen,
                    phosphorus,
                    potassium,
                },
            };
            cmd_recommend(&model, &request)?;
        }

        Commands::Diagnose {
            image,
            models_dir,
            demo,
        } => {
            let config = DiseaseServiceConfig {
                models_dir,
                demo_mode: demo || demo_mode_from_env(),
                ..Default::default()
            };
            cmd_diagnose(&image, &config)?;
        }

        Commands::Heuristic { image } => {
            cmd_heuristic(&image)?;
        }
    }

    Ok(())
}

fn cmd_recommend(model: &Path, request: &CropRequest) -> Result<()> {
    info!("Loading crop model from {:?}", model);
    let recommender = CropRecommender::load(model);

    let start = std::time::Instant::now();
    let recommendation = recommender.recommend(request)?;
    let elapsed = start.elapsed();

    match recommendation {
        Recommendation::Crop(name) => {
            println!("{} {}", "Recommended Crop:".green().bold(), name);
        }
        Recommendation::NoPrediction { class_index } => {
            println!(
                "{} {} (model returned class {})",
                "Recommended Crop:".yellow().bold(),
                recommendation.label(),
                class_index
            );
        }
    }
    println!("Inference time: {}", format_millis(elapsed));

    Ok(())
}

fn cmd_diagnose(image: &Path, config: &DiseaseServiceConfig) -> Result<()> {
    let predictor = DiseasePredictor::load(config);

    if predictor.models_loaded() == 0 {
        let fallback = if predictor.demo_mode() { "demo mode" } else { "color heuristic" };
        println!(
            "{} no disease models found in {:?}, using {}",
            "Note:".yellow(),
            config.models_dir,
            fallback
        );
    }

    let start = std::time::Instant::now();
    let prediction = predictor.predict_path(image)?;
    let elapsed = start.elapsed();

    println!(
        "{} {} (class {})",
        "Prediction:".green().bold(),
        prediction.label.unwrap_or("Unknown"),
        prediction.class_index
    );
    println!("Source: {}", prediction.source);

    if prediction.source == PredictionSource::Ensemble {
        println!("Models: {}", predictor.ensemble().member_names().join(", "));
    }
    if let Some(probabilities) = &prediction.probabilities {
        println!("\nAveraged probabilities:");
        for (i, p) in probabilities.iter().enumerate() {
            let name = agri_inference::disease::class_name(i).unwrap_or("Unknown");
            println!("  {}. {:<8} {:.2}%", i, name, p * 100.0);
        }
    }
    println!("Inference time: {}", format_millis(elapsed));

    Ok(())
}

fn cmd_heuristic(path: &Path) -> Result<()> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(e) => {
            println!(
                "{} could not read {:?} ({}); heuristic answers Healthy (class 0)",
                "Warning:".yellow(),
                path,
                e
            );
            return Ok(());
        }
    };

    let means = ChannelMeans::of_image(&decoded);
    let class = classify_means(&means);

    println!("Channel means:");
    println!("  {} {:.1}", "R".red(), means.red);
    println!("  {} {:.1}", "G".green(), means.green);
    println!("  {} {:.1}", "B".blue(), means.blue);
    println!("Brightness: {:.1}", means.brightness());
    println!(
        "{} {} (class {})",
        "Heuristic:".green().bold(),
        class,
        class.index()
    );

    Ok(())
}
