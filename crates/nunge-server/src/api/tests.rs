use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    Router,
};
use http_body_util::BodyExt;
use nunge_core::descriptor::ImageOutcome;
use nunge_core::fetcher::ImageFetcher;
use nunge_core::transport::mock::MockTransport;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::routes::{join_batch, parse_download_request};
use super::{router, AppError, AppState};

fn app(dir: &std::path::Path, transport: Arc<MockTransport>) -> Router {
    router(AppState {
        fetcher: ImageFetcher::new(dir, transport),
    })
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn non_array_images_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Arc::new(MockTransport::new()));

    let (status, body) =
        post_json(app, "/api/download-images", r#"{"images":"not-an-array"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request format" }));
}

#[tokio::test]
async fn malformed_bodies_are_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    for raw in ["not json", "{}", r#"{"images":[{"url":1}]}"#, "[]"] {
        let app = app(dir.path(), Arc::new(MockTransport::new()));
        let (status, body) = post_json(app, "/api/download-images", raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(body["error"], "Invalid request format");
    }
}

#[tokio::test]
async fn localizes_200_and_falls_back_on_404() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .respond("https://x/a.png", 200, b"png")
            .respond("https://x/b.png", 404, b""),
    );
    let app = app(dir.path(), transport);

    let (status, body) = post_json(
        app,
        "/api/download-images",
        r#"{"images":[{"url":"https://x/a.png","filename":"a.png"},{"url":"https://x/b.png","filename":"b.png"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imagePaths": ["/blog/a.png", "https://x/b.png"] }));
    assert!(dir.path().join("a.png").exists());
}

#[tokio::test]
async fn empty_images_array_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Arc::new(MockTransport::new()));

    let (status, body) = post_json(app, "/api/download-images", r#"{"images":[]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imagePaths": [] }));
}

#[tokio::test]
async fn detailed_endpoint_reports_sources() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .respond("https://x/a.png", 200, b"png")
            .fail("https://x/b.png", "connection reset"),
    );
    let app = app(dir.path(), transport);

    let (status, body) = post_json(
        app,
        "/api/download-images/detailed",
        r#"{"images":[{"url":"https://x/a.png","filename":"a.png"},{"url":"https://x/b.png","filename":"b.png"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let images = body["images"].as_array().unwrap();
    assert_eq!(images[0], json!({ "path": "/blog/a.png", "source": "local" }));
    assert_eq!(images[1]["path"], "https://x/b.png");
    assert_eq!(images[1]["source"], "fallback");
    assert!(images[1]["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn panicking_transfer_still_answers_200_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .panic_after("https://x/a.png", b"partial")
            .respond("https://x/b.png", 200, b"png"),
    );
    let app = app(dir.path(), transport);

    let (status, body) = post_json(
        app,
        "/api/download-images",
        r#"{"images":[{"url":"https://x/a.png","filename":"a.png"},{"url":"https://x/b.png","filename":"b.png"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imagePaths": ["https://x/a.png", "/blog/b.png"] }));
    assert!(!dir.path().join("a.png").exists());
}

async fn exploding_batch() -> Vec<ImageOutcome> {
    panic!("batch orchestration blew up")
}

#[tokio::test]
async fn panicked_batch_is_internal_error() {
    let err = join_batch(tokio::spawn(exploding_batch())).await.unwrap_err();
    assert!(matches!(err, AppError::ProcessingFailed(_)));

    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Failed to process images" }));
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let res = app(dir.path(), Arc::new(MockTransport::new()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn parse_accepts_extra_fields() {
    let images = parse_download_request(
        br#"{"images":[{"url":"https://x/a.png","filename":"a.png","alt":"hero"}],"slug":"post-1"}"#,
    )
    .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].filename, "a.png");
}

#[test]
fn parse_rejects_object_images() {
    let err = parse_download_request(br#"{"images":{"url":"u","filename":"f"}}"#).unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}
