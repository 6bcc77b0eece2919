//! Clipstow - video ingest service
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (shape classification, staged files, storage keys)
//! - ports/: Trait definitions (media toolkit, object store, record store, tokens)
//! - adapters/: Concrete implementations (ffmpeg, S3, filesystem, Redis, HTTP)
//! - application/: Upload receiver and ingest pipeline
//! - config: Environment configuration
//!
//! # Features
//! - `aws`: S3 object store
//! - `redis`: Redis-backed video records

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use application::IngestService;
pub use config::AppConfig;
pub use error::IngestError;
