//! Sugarcane Disease Prediction API
//!
//! Serves `POST /predict` and `GET /health`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use agri_inference::config::{
    demo_mode_from_env, DiseaseServiceConfig, DEFAULT_HOST, DISEASE_DEFAULT_PORT,
    DISEASE_MODELS_DIR,
};
use agri_inference::utils::logging::{init_logging, LogConfig};
use agri_inference_server::disease_router;
use agri_inference_server::state::DiseaseState;

/// Sugarcane Disease Prediction API
#[derive(Parser, Debug)]
#[command(name = "sugarcane-disease-api")]
#[command(version)]
#[command(about = "HTTP API classifying sugarcane leaf images")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DISEASE_DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Directory with the candidate model artifacts
    #[arg(long, env = "SUGARCANE_MODELS_DIR", default_value = DISEASE_MODELS_DIR)]
    models_dir: PathBuf,

    /// Random predictions when no model is available (also SUGARCANE_DEMO_MODE=1)
    #[arg(long, default_value = "false")]
    demo: bool,

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

    let config = DiseaseServiceConfig {
        host: cli.host,
        port: cli.port,
        models_dir: cli.models_dir,
        demo_mode: cli.demo || demo_mode_from_env(),
    };

    info!("Sugarcane Disease API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Log level:  {}", log_config.level);
    info!("  Models dir: {:?}", config.models_dir);
    info!("  Demo mode:  {}", config.demo_mode);

    let addr = config.socket_addr()?;
    let state = DiseaseState::load(config);
    if state.models_loaded() == 0 {
        let fallback = if state.predictor.demo_mode() {
            "random demo predictions"
        } else {
            "the color heuristic"
        };
        warn!("No disease models loaded; answering with {}", fallback);
    }

    let app = disease_router(Arc::new(state));

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
