//! Crop Rotation Recommendation API
//!
//! Serves `POST /crop_recommendation` and `GET /health`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use agri_inference::config::{CropServiceConfig, CROP_DEFAULT_PORT, CROP_MODEL_FILE, DEFAULT_HOST};
use agri_inference::utils::logging::{init_logging, LogConfig};
use agri_inference_server::crop_router;
use agri_inference_server::state::CropState;

/// Crop Rotation Recommendation API
#[derive(Parser, Debug)]
#[command(name = "crop-rotation-api")]
#[command(version)]
#[command(about = "HTTP API recommending the next crop from soil measurements")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = CROP_DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Path to the crop model artifact
    #[arg(long, env = "CROP_MODEL_PATH", default_value = CROP_MODEL_FILE)]
    model: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config =
        LogConfig::from_flags(cli.verbose, cli.log_level.as_deref(), LogConfig::production());
    init_logging(&log_config).map_err(anyhow::Error::msg)?;

    let config = CropServiceConfig {
        host: cli.host,
        port: cli.port,
        model_path: cli.model,
    };

    info!("Crop Rotation API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Log level:  {}", log_config.level);
    info!("  Model path: {:?}", config.model_path);

    let addr = config.socket_addr()?;
    let state = CropState::load(config);
    if !state.recommender.is_ready() {
        warn!("Serving without a model; recommendations will return 500 until it is provided");
    }

    let app = crop_router(Arc::new(state));

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
