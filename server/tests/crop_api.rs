//! End-to-end tests of the crop recommendation router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use agri_inference::config::CropServiceConfig;
use agri_inference::crop::CropRecommender;
use agri_inference::{AgriError, Result, TabularClassifier};
use agri_inference_server::crop_router;
use agri_inference_server::state::CropState;

/// Answers with a fixed class, or with an error for empty fields
struct FixedClassifier(i64);

impl TabularClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, features: &[f32]) -> Result<i64> {
        if features.len() != 6 {
            return Err(AgriError::InvalidInput("expected 6 features".into()));
        }
        Ok(self.0)
    }
}

struct BrokenClassifier;

impl TabularClassifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &[f32]) -> Result<i64> {
        Err(AgriError::Inference("graph execution failed".into()))
    }
}

fn app(recommender: CropRecommender) -> Router {
    crop_router(Arc::new(CropState::new(
        recommender,
        CropServiceConfig::default(),
    )))
}

async fn post(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/crop_recommendation")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn sample() -> String {
    json!({
        "Previous Crop": "Wheat",
        "Soil Type": "Loamy",
        "Moisture Level": 45.2,
        "Nitrogen (N)": 80,
        "Phosphorus (P)": 40,
        "Potassium (K)": 35
    })
    .to_string()
}

#[tokio::test]
async fn recommends_known_crop() {
    let app = app(CropRecommender::new(Box::new(FixedClassifier(2))));
    let (status, body) = post(app, sample()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Recommended Crop": "Rice" }));
}

#[tokio::test]
async fn unknown_class_is_no_prediction() {
    let app = app(CropRecommender::new(Box::new(FixedClassifier(42))));
    let (status, body) = post(app, sample()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Recommended Crop"], "No prediction available");
}

#[tokio::test]
async fn unknown_categories_still_predict() {
    let app = app(CropRecommender::new(Box::new(FixedClassifier(1))));
    let body = json!({ "Previous Crop": "Banana", "Soil Type": "Volcanic" }).to_string();
    let (status, body) = post(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Recommended Crop"], "Wheat");
}

#[tokio::test]
async fn missing_model_is_server_error() {
    let app = app(CropRecommender::unavailable("crop_rotation_recommendation_model.onnx"));
    let (status, body) = post(app, sample()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Model not loaded."), "{message}");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app(CropRecommender::new(Box::new(FixedClassifier(1))));
    let (status, body) = post(app, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let app = app(CropRecommender::new(Box::new(FixedClassifier(1))));
    let (status, _) = post(app, "[1, 2, 3]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inference_failure_is_server_error() {
    let app = app(CropRecommender::new(Box::new(BrokenClassifier)));
    let (status, body) = post(app, sample()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("graph execution failed"));
}

#[tokio::test]
async fn health_reports_model_state() {
    let app = app(CropRecommender::unavailable("missing.onnx"));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "crop_recommendation");
    assert_eq!(body["models_loaded"], 0);
}
