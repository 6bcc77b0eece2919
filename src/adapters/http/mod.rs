//! HTTP surface: the upload endpoint, a health probe and, for the local
//! object store, the published files themselves.

mod error;
mod upload;

pub use error::ErrorResponse;

use crate::application::IngestService;
use crate::ports::{MediaToolkit, ObjectStore, TokenValidator, VideoRepository};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Allowance on top of the file limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub struct AppState<M, S, R> {
    pub ingest: Arc<IngestService<M, S, R>>,
    pub tokens: Arc<dyn TokenValidator>,
}

impl<M, S, R> AppState<M, S, R> {
    pub fn new(ingest: IngestService<M, S, R>, tokens: impl TokenValidator + 'static) -> Self {
        Self {
            ingest: Arc::new(ingest),
            tokens: Arc::new(tokens),
        }
    }
}

impl<M, S, R> Clone for AppState<M, S, R> {
    fn clone(&self) -> Self {
        Self {
            ingest: Arc::clone(&self.ingest),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

pub fn router<M, S, R>(state: AppState<M, S, R>, assets_dir: Option<PathBuf>) -> Router
where
    M: MediaToolkit + 'static,
    S: ObjectStore + 'static,
    R: VideoRepository + 'static,
{
    let body_limit = state
        .ingest
        .config()
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let mut app = Router::new()
        .route(
            "/api/video_upload/:video_id",
            post(upload::upload_video::<M, S, R>),
        )
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
        .route("/healthz", get(healthz));

    if let Some(dir) = assets_dir {
        tracing::info!("Serving published assets from {:?}", dir);
        app = app.nest_service("/assets", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
