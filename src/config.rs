//! Configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Largest accepted upload: 1 GiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1 << 30;

const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} env var required")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3(S3Config),
    Local { root: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint (MinIO etc.), addressed path-style
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordStore {
    Redis { url: String },
    Memory,
}

/// External tool locations and limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolConfig {
    pub ffprobe_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    /// Wall-clock limit per tool run. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from("ffprobe"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout: Some(Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS)),
        }
    }
}

/// Settings handed to the ingest pipeline at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestConfig {
    /// Directory for staged uploads and remuxed output
    pub temp_dir: PathBuf,
    pub max_upload_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            temp_dir: env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// HS256 secret used to validate bearer tokens
    pub jwt_secret: String,
    pub storage: StorageBackend,
    /// Overrides the URL prefix of stored objects, e.g. a CDN domain
    pub public_base_url: Option<String>,
    pub record_store: RecordStore,
    pub tools: ToolConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|value| !value.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("s3") {
            "s3" => StorageBackend::S3(S3Config {
                bucket: require("S3_BUCKET")?,
                region: get("S3_REGION").unwrap_or_else(|| String::from("us-east-1")),
                endpoint: get("S3_ENDPOINT"),
            }),
            "local" => StorageBackend::Local {
                root: PathBuf::from(
                    get("LOCAL_STORAGE_DIR").unwrap_or_else(|| String::from("./assets")),
                ),
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let record_store = match get("RECORD_STORE").as_deref().unwrap_or("redis") {
            "redis" => RecordStore::Redis {
                url: get("REDIS_URL").unwrap_or_else(|| String::from("redis://127.0.0.1/")),
            },
            "memory" => RecordStore::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "RECORD_STORE",
                    value: other.to_string(),
                })
            }
        };

        let timeout_secs = parse_u64(&get, "TOOL_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS);
        let tools = ToolConfig {
            ffprobe_path: PathBuf::from(get("FFPROBE_PATH").unwrap_or_else(|| String::from("ffprobe"))),
            ffmpeg_path: PathBuf::from(get("FFMPEG_PATH").unwrap_or_else(|| String::from("ffmpeg"))),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        let ingest = IngestConfig {
            temp_dir: get("TEMP_DIR").map(PathBuf::from).unwrap_or_else(env::temp_dir),
            max_upload_bytes: parse_u64(&get, "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        Ok(Self {
            addr: get("ADDR").unwrap_or_else(|| String::from("127.0.0.1")),
            port: get("PORT").unwrap_or_else(|| String::from("8091")),
            jwt_secret: require("JWT_SECRET")?,
            storage,
            public_base_url: get("PUBLIC_BASE_URL"),
            record_store,
            tools,
            ingest,
        })
    }
}

fn parse_u64<G>(get: &G, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    G: Fn(&'static str) -> Option<String>,
{
    get(name)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
