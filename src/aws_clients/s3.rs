use crate::error::AppError;
use crate::metadata::ObjectMetadata;
use crate::services::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::DateTime as SmithyDateTime;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AppError> {
        log::trace!("HeadObject s3://{}/{}", bucket, key);
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::ObjectStore {
                code: e.code().unwrap_or("Unknown").to_string(),
                message: e.message().map(String::from).unwrap_or_else(|| e.to_string()),
            })?;

        Ok(ObjectMetadata {
            last_modified: output.last_modified().and_then(to_chrono),
            tags: output.metadata().cloned().unwrap_or_default(),
        })
    }
}

fn to_chrono(time: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
