//! Ingest server: wires the configured adapters into the HTTP surface.

#[cfg(feature = "aws")]
use clipstow::adapters::aws::S3Adapter;
use clipstow::adapters::ffmpeg::FfmpegToolkit;
use clipstow::adapters::http::{self, AppState};
use clipstow::adapters::jwt::JwtValidator;
#[cfg(feature = "redis")]
use clipstow::adapters::local::RedisPool;
use clipstow::adapters::local::{FsAdapter, MemoryRepository};
use clipstow::config::{AppConfig, RecordStore, StorageBackend};
use clipstow::ports::{ObjectStore, VideoRepository};
use clipstow::IngestService;
use std::fmt::Display;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clipstow=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(format!("Invalid configuration: {e}")),
    };

    if let Err(e) = tokio::fs::create_dir_all(&config.ingest.temp_dir).await {
        fail(format!(
            "Failed to create temp dir {:?}: {e}",
            config.ingest.temp_dir
        ));
    }

    match config.storage.clone() {
        #[cfg(feature = "aws")]
        StorageBackend::S3(s3) => {
            tracing::info!(bucket = %s3.bucket, region = %s3.region, "Publishing to S3");
            let store = S3Adapter::connect(&s3, config.public_base_url.clone()).await;
            with_repository(config, store, None).await;
        }
        #[cfg(not(feature = "aws"))]
        StorageBackend::S3(_) => fail("STORAGE_BACKEND=s3 requires the `aws` feature"),
        StorageBackend::Local { root } => {
            if let Err(e) = tokio::fs::create_dir_all(&root).await {
                fail(format!("Failed to create storage dir {root:?}: {e}"));
            }
            let base_url = config
                .public_base_url
                .clone()
                .unwrap_or_else(|| format!("http://{}:{}/assets", config.addr, config.port));
            tracing::info!(root = ?root, %base_url, "Publishing to local disk");
            let store = FsAdapter::new(root.clone(), base_url);
            with_repository(config, store, Some(root)).await;
        }
    }
}

async fn with_repository<S>(config: AppConfig, store: S, assets_dir: Option<PathBuf>)
where
    S: ObjectStore + 'static,
{
    match config.record_store.clone() {
        #[cfg(feature = "redis")]
        RecordStore::Redis { url } => match RedisPool::new(&url) {
            Ok(pool) => serve(config, store, pool, assets_dir).await,
            Err(e) => fail(format!("Failed to create Redis pool: {e}")),
        },
        #[cfg(not(feature = "redis"))]
        RecordStore::Redis { .. } => fail("RECORD_STORE=redis requires the `redis` feature"),
        RecordStore::Memory => {
            tracing::warn!("Video records are held in memory and lost on restart");
            serve(config, store, MemoryRepository::new(), assets_dir).await;
        }
    }
}

async fn serve<S, R>(config: AppConfig, store: S, repo: R, assets_dir: Option<PathBuf>)
where
    S: ObjectStore + 'static,
    R: VideoRepository + 'static,
{
    let ingest = IngestService::new(
        FfmpegToolkit::new(config.tools.clone()),
        store,
        repo,
        config.ingest.clone(),
    );
    let state = AppState::new(ingest, JwtValidator::new(&config.jwt_secret));
    let app = http::router(state, assets_dir);

    let listener = match tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
    {
        Ok(listener) => listener,
        Err(e) => fail(format!("Failed to bind TCP listener: {e}")),
    };
    tracing::info!("Listening at {}:{}", config.addr, config.port);

    if let Err(e) = axum::serve(listener, app).await {
        fail(format!("Server error: {e}"));
    }
}

fn fail(message: impl Display) -> ! {
    tracing::error!("{}", message);
    std::process::exit(1);
}
