//! Object store writes.
//!
//! Objects are written with a single `PutObject`; there is no multipart upload
//! and no retry. The returned locator assumes the bucket is publicly readable.

use crate::config::StorageSettings;
use crate::error::PublishError;
use crate::types::StoredObject;
use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::time::Instant;

#[async_trait]
pub trait ObjectPublisher: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing object.
    async fn publish(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, PublishError>;
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Cloudflare R2 bucket reached through the S3 API.
#[derive(Clone, Debug)]
pub struct R2Publisher {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl R2Publisher {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id.clone(),
            settings.access_key_secret.clone(),
            None,
            None,
            "media-relay",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint_url.clone())
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: settings.bucket.clone(),
            public_base_url: settings.public_base_url.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectPublisher for R2Publisher {
    async fn publish(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, PublishError> {
        let size = bytes.len();
        let start = Instant::now();

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes));
        if !content_type.is_empty() {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| PublishError::Store {
            key: key.to_string(),
            reason: DisplayErrorContext(&e).to_string(),
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "R2 upload successful"
        );

        Ok(StoredObject {
            key: key.to_string(),
            public_url: public_url(&self.public_base_url, key),
        })
    }
}
