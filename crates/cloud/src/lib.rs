//! Object-storage abstraction.
//!
//! File bytes (project cover images, assistant knowledge files) live in an
//! S3-compatible bucket hosted by the backend-as-a-service provider. The
//! [`StorageProvider`] trait keeps handlers independent of the concrete SDK.

use async_trait::async_trait;

/// Errors from the object-storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The SDK request failed (network, auth, bucket policy, ...).
    #[error("Storage request failed: {0}")]
    Request(String),
}

/// Minimal object-store operations the platform needs.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Store an object under `key`, replacing any existing object.
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError>;

    /// Delete the object under `key`. Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL where the object can be fetched by browsers.
    fn public_url(&self, key: &str) -> String;
}

/// Configuration for the S3-compatible provider.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Endpoint override for hosted-BaaS buckets (e.g. a Supabase or MinIO
    /// S3 endpoint). `None` means real AWS.
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Base URL prefixed to keys in [`StorageProvider::public_url`]. Falls
    /// back to the virtual-hosted AWS URL when unset.
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `S3_BUCKET` is not set, signalling that file
    /// storage is not configured.
    ///
    /// | Variable               | Required | Default     |
    /// |------------------------|----------|-------------|
    /// | `S3_BUCKET`            | yes      | --          |
    /// | `S3_REGION`            | no       | `us-east-1` |
    /// | `S3_ENDPOINT`          | no       | --          |
    /// | `S3_ACCESS_KEY_ID`     | yes      | --          |
    /// | `S3_SECRET_ACCESS_KEY` | yes      | --          |
    /// | `S3_PUBLIC_BASE_URL`   | no       | --          |
    ///
    /// # Panics
    ///
    /// Panics if the bucket is set but the credentials are missing -- a
    /// half-configured store should fail at startup, not at first upload.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok()?;
        Some(Self {
            bucket,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID")
                .expect("S3_ACCESS_KEY_ID must be set when S3_BUCKET is"),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY")
                .expect("S3_SECRET_ACCESS_KEY must be set when S3_BUCKET is"),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
        })
    }
}

/// [`StorageProvider`] backed by `aws-sdk-s3`.
pub struct S3Provider {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3Provider {
    /// Build the SDK client from configuration.
    pub async fn new(config: S3Config) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "atelier-env",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        // Path-style addressing: BaaS S3 endpoints generally do not support
        // virtual-hosted bucket subdomains.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket,
            region: config.region,
            public_base_url: config.public_base_url,
        }
    }
}

#[async_trait]
impl StorageProvider for S3Provider {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        tracing::debug!(key, "Object stored");
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        tracing::debug!(key, "Object deleted");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}
