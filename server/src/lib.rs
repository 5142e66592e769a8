//! HTTP services for crop recommendation and sugarcane disease prediction
//!
//! Each service is its own binary; the routers live here so they can be
//! exercised without binding a socket.

pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::{SharedCropState, SharedDiseaseState};

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router for the crop recommendation service
pub fn crop_router(state: SharedCropState) -> Router {
    Router::new()
        .route("/health", get(routes::health::crop_health))
        .route(
            "/crop_recommendation",
            post(routes::crop::crop_recommendation),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Router for the sugarcane disease service
pub fn disease_router(state: SharedDiseaseState) -> Router {
    Router::new()
        .route("/health", get(routes::health::disease_health))
        .route("/predict", post(routes::disease::predict))
        .layer(DefaultBodyLimit::max(routes::disease::MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
