//! Adapters - Concrete implementations of ports.

#[cfg(feature = "aws")]
pub mod aws;

pub mod ffmpeg;
pub mod http;
pub mod jwt;
pub mod local;
