//! HTTP boundary around the image fetcher.
//!
//! `POST /api/download-images` takes `{ images: ImageDescriptor[] }` and
//! answers `{ imagePaths: [...] }` in input order. Static serving of the
//! public directory is left to whatever fronts this service.

mod error;
mod routes;
#[cfg(test)]
mod tests;

pub use error::AppError;

use axum::{
    routing::{get, post},
    Router,
};
use nunge_core::fetcher::ImageFetcher;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub fetcher: ImageFetcher,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/download-images", post(routes::download_images_handler))
        .route(
            "/api/download-images/detailed",
            post(routes::download_images_detailed_handler),
        )
        .route("/health", get(routes::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
