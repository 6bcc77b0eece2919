use crate::config::S3Config;
use crate::ports::storage::{ObjectStore, StorageError};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use std::time::Instant;

/// S3Adapter implements ObjectStore for AWS S3 and S3-compatible services.
///
/// Retries are the client's concern: the SDK is configured with an adaptive
/// retry policy and the adapter itself never re-sends.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    public_base_url: Option<String>,
}

impl S3Adapter {
    pub fn new(client: Client, config: &S3Config, public_base_url: Option<String>) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            public_base_url,
        }
    }

    /// Build a client from the ambient AWS credentials chain.
    pub async fn connect(config: &S3Config, public_base_url: Option<String>) -> Self {
        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(config.region.clone()));
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_retry_mode(RetryMode::Adaptive);

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()), config, public_base_url)
    }
}

#[async_trait]
impl ObjectStore for S3Adapter {
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::Read {
                path: local_path.display().to_string(),
                source: std::io::Error::other(e),
            })?;
        let start = Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint.as_deref(),
            self.public_base_url.as_deref(),
            key,
        )
    }
}

/// `{public_base_url}/{key}` if set, else `{endpoint}/{bucket}/{key}` for
/// S3-compatible endpoints, else the virtual-hosted AWS URL.
fn object_url(
    bucket: &str,
    region: &str,
    endpoint: Option<&str>,
    public_base_url: Option<&str>,
    key: &str,
) -> String {
    match (public_base_url, endpoint) {
        (Some(base), _) => format!("{}/{}", base.trim_end_matches('/'), key),
        (None, Some(endpoint)) => {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
        }
        (None, None) => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_adapter() -> S3Adapter {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        S3Adapter::new(
            Client::from_conf(config),
            &S3Config {
                bucket: "tubes".into(),
                region: "us-east-1".into(),
                endpoint: None,
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_unreadable_source_is_a_read_error() {
        let store = offline_adapter();
        let err = store
            .put_file(
                Path::new("/nonexistent/upload.mp4.processing"),
                "landscape/abc.mp4",
                "video/mp4",
            )
            .await
            .unwrap_err();
        match err {
            StorageError::Read { path, source } => {
                assert_eq!(path, "/nonexistent/upload.mp4.processing");
                assert_eq!(source.kind(), std::io::ErrorKind::Other);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_aws_url() {
        assert_eq!(
            object_url("tubes", "us-east-2", None, None, "landscape/abc.mp4"),
            "https://tubes.s3.us-east-2.amazonaws.com/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_endpoint_url_is_path_style() {
        assert_eq!(
            object_url(
                "tubes",
                "us-east-1",
                Some("http://localhost:9000/"),
                None,
                "portrait/abc.mp4"
            ),
            "http://localhost:9000/tubes/portrait/abc.mp4"
        );
    }

    #[test]
    fn test_public_base_url_wins() {
        assert_eq!(
            object_url(
                "tubes",
                "us-east-1",
                Some("http://localhost:9000"),
                Some("https://d111111abcdef8.cloudfront.net/"),
                "other/abc.mp4"
            ),
            "https://d111111abcdef8.cloudfront.net/other/abc.mp4"
        );
    }
}
