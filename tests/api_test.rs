//! HTTP route tests, driven in-process without binding a socket

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wdbc_scorer::api::{create_router, AppState};
use wdbc_scorer::{PredictionTelemetry, ServerConfig};

fn app_with(config: ServerConfig) -> (Router, Arc<PredictionTelemetry>) {
    let telemetry = Arc::new(PredictionTelemetry::new());
    let state = Arc::new(AppState::new(telemetry.clone(), config));
    (create_router(state), telemetry)
}

fn app() -> (Router, Arc<PredictionTelemetry>) {
    app_with(ServerConfig::default())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let (status, body) = send(app, "GET", "/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_predict_reference_scenario() {
    let (app, telemetry) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict",
        Some(json!({
            "mean_radius": 14.5,
            "texture": 19.3,
            "smoothness": 0.1,
            "compactness": 0.12
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["label"], "malignant");
    assert_eq!(data["display_label"], "Malignant (educational)");
    assert_eq!(data["confidence_percent"], 53);
    assert_eq!(data["alert"], true);
    assert_eq!(data["features"]["texture"], 19.3);
    assert!(data.get("breakdown").is_none());
    assert!(data["disclaimer"].as_str().unwrap().contains("educational"));

    assert_eq!(telemetry.get_stats().malignant, 1);
}

#[tokio::test]
async fn test_predict_with_breakdown_and_camel_case() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict",
        Some(json!({
            "meanRadius": 14.0,
            "texture": 19.0,
            "smoothness": 0.1,
            "compactness": 0.1,
            "explain": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["label"], "benign");
    assert_eq!(data["confidence_percent"], 45);
    assert_eq!(data["alert"], false);
    let logit = data["breakdown"]["logit"].as_f64().unwrap();
    assert!((logit + 0.2).abs() < 1e-12);
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let (app, telemetry) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict",
        Some(json!({ "mean_radius": "big", "texture": 19.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
    assert_eq!(telemetry.get_stats().rejected, 1);
}

#[tokio::test]
async fn test_form_predict_accepts_raw_text() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict/form",
        Some(json!({
            "mean_radius": " 14.5 ",
            "texture": "19.3",
            "smoothness": "0.1",
            "compactness": "0.12"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["confidence_percent"], 53);
}

#[tokio::test]
async fn test_form_predict_incomplete() {
    let (app, telemetry) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict/form",
        Some(json!({
            "mean_radius": "14.5",
            "texture": "abc",
            "smoothness": "0.1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error = &body["error"];
    assert_eq!(error["code"], "INPUT_NOT_NUMERIC");

    let fields: Vec<&str> = error["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["texture", "compactness"]);
    assert_eq!(error["fields"][1]["code"], "INPUT_MISSING");

    let stats = telemetry.get_stats();
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.total_predictions, 0);
}

#[tokio::test]
async fn test_batch_predict() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict/batch",
        Some(json!({
            "items": [
                { "mean_radius": 14.5, "texture": 19.3, "smoothness": 0.1, "compactness": 0.12 },
                { "mean_radius": 8.0, "texture": 12.0, "smoothness": 0.06, "compactness": 0.03 },
                { "mean_radius": 17.99, "texture": 10.38, "smoothness": 0.1184, "compactness": 0.2776 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_requested"], 3);
    assert_eq!(data["total_processed"], 3);
    assert_eq!(data["total_malignant"], 2);
    assert_eq!(data["total_benign"], 1);
    assert_eq!(data["total_failed"], 0);
    assert_eq!(data["results"][1]["prediction"]["label"], "benign");
}

#[tokio::test]
async fn test_batch_over_limit() {
    let config = ServerConfig {
        max_batch: 2,
        ..ServerConfig::default()
    };
    let (app, _) = app_with(config);
    let item = json!({ "mean_radius": 14.0, "texture": 19.0, "smoothness": 0.1, "compactness": 0.1 });
    let (status, body) = send(
        app,
        "POST",
        "/v1/predict/batch",
        Some(json!({ "items": [item.clone(), item.clone(), item] })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "API_BATCH_TOO_LARGE");
}

#[tokio::test]
async fn test_empty_batch_is_bad_request() {
    let (app, _) = app();
    let (status, body) = send(app, "POST", "/v1/predict/batch", Some(json!({ "items": [] }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_fields_metadata() {
    let (app, _) = app();
    let (status, body) = send(app, "GET", "/v1/fields", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["fields"].as_array().unwrap().len(), 4);
    assert_eq!(data["fields"][0]["key"], "mean_radius");
    assert_eq!(data["fields"][0]["reference_max"], 28.0);
    assert_eq!(data["model"]["bias"], -0.2);
    assert_eq!(data["model"]["mean_radius"]["weight"], 0.9);
    assert!(data["hint"].as_str().unwrap().starts_with("Example ranges"));
}

#[tokio::test]
async fn test_stats_reflect_predictions() {
    let (app, _) = app();
    let predict_body = json!({ "mean_radius": 14.0, "texture": 19.0, "smoothness": 0.1, "compactness": 0.1 });

    let (status, _) = send(app.clone(), "POST", "/v1/predict", Some(predict_body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, "GET", "/v1/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_predictions"], 1);
    assert_eq!(body["data"]["benign"], 1);
    assert_eq!(body["data"]["malignant_ratio"], 0.0);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = app();
    let (status, body) = send(app, "GET", "/v1/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "API_NOT_FOUND");
}

#[tokio::test]
async fn test_request_id_header() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers().get("X-Request-Id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_rate_limit_comes_from_server_config() {
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let (app, _) = app_with(config);

    let get = |ip: &'static str| {
        Request::builder()
            .uri("/v1/fields")
            .header("x-real-ip", ip)
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(get("10.0.0.7")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(get("10.0.0.7")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    // Logging wraps the limiter, so rejected requests still get an id
    assert!(second.headers().contains_key("X-Request-Id"));
    let bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "API_RATE_LIMITED");

    // Another client keeps its own window
    let other = app.oneshot(get("10.0.0.8")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_batch_counts_as_rejection() {
    let (app, telemetry) = app();
    let (status, body) = send(app, "POST", "/v1/predict/batch", Some(json!({ "items": "none" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
    assert_eq!(telemetry.get_stats().rejected, 1);
}
