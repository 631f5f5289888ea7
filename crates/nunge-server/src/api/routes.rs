use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use nunge_core::descriptor::{ImageDescriptor, ImageOutcome};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{AppError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadImagesResponse {
    pub image_paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DetailedImagesResponse {
    pub images: Vec<ImageOutcome>,
}

/// Parse `{ "images": [ { "url", "filename" }, ... ] }`. Anything else,
/// including malformed JSON, is an invalid request.
pub fn parse_download_request(body: &[u8]) -> Result<Vec<ImageDescriptor>, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidRequest(format!("body is not JSON: {e}")))?;
    let images = match value.get("images") {
        Some(images @ Value::Array(_)) => images.clone(),
        Some(_) => return Err(AppError::InvalidRequest("`images` is not an array".into())),
        None => return Err(AppError::InvalidRequest("missing `images`".into())),
    };
    serde_json::from_value(images)
        .map_err(|e| AppError::InvalidRequest(format!("bad image descriptor: {e}")))
}

/// Runs the batch on its own task so a panic inside it becomes a 500
/// instead of tearing down the connection.
async fn run_batch(state: &AppState, images: Vec<ImageDescriptor>) -> Result<Vec<ImageOutcome>, AppError> {
    let fetcher = state.fetcher.clone();
    join_batch(tokio::spawn(async move { fetcher.fetch_batch_detailed(&images).await })).await
}

pub(super) async fn join_batch(
    task: JoinHandle<Vec<ImageOutcome>>,
) -> Result<Vec<ImageOutcome>, AppError> {
    task.await.map_err(|e| AppError::ProcessingFailed(e.to_string()))
}

pub async fn download_images_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let images = parse_download_request(&body)?;
    tracing::debug!(count = images.len(), "download-images request");
    let outcomes = run_batch(&state, images).await?;
    let image_paths = outcomes.into_iter().map(|o| o.path).collect();
    Ok((StatusCode::OK, Json(DownloadImagesResponse { image_paths })))
}

pub async fn download_images_detailed_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let images = parse_download_request(&body)?;
    let images = run_batch(&state, images).await?;
    Ok((StatusCode::OK, Json(DetailedImagesResponse { images })))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
