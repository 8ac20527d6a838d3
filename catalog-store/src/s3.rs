//! S3 object storage backend

use crate::error::{StoreError, StoreResult};
use crate::object_storage::ObjectStorage;
use crate::paths;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

/// Configuration for the S3 backend
#[derive(Clone, PartialEq, Eq)]
pub struct S3Config {
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

/// S3-backed object storage for project assets
pub struct S3ObjectStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStorage {
    pub fn new(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "marketplace-env",
        );
        let sdk_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(sdk_config),
            bucket: config.bucket,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn list_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| {
                    StoreError::ObjectStorage(format!(
                        "Listing {} failed: {}",
                        prefix,
                        DisplayErrorContext(&e)
                    ))
                })?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        log::debug!("Listed {} objects under {}", keys.len(), prefix);
        Ok(keys)
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> StoreResult<()> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                StoreError::ObjectStorage(format!(
                    "Upload of {} failed: {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        log::debug!("Uploaded {} ({} bytes)", key, size);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        paths::public_url(&self.bucket, key)
    }
}
