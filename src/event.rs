use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const OBJECT_CREATED: &str = "ObjectCreated";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Notification {
    #[serde(default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    pub event_time: String,
    pub event_name: String,
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadEvent {
    pub bucket: String,
    pub key: String,
    pub event_time: String,
    pub event_name: String,
}

impl S3Notification {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidEvent(format!("unreadable notification: {}", e)))
    }

    // Only the first record of a batch is processed.
    pub fn first_upload(&self) -> Result<UploadEvent, AppError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| AppError::InvalidEvent("notification has no records".into()))?;

        Ok(UploadEvent {
            bucket: record.s3.bucket.name.clone(),
            key: decode_object_key(&record.s3.object.key),
            event_time: record.event_time.clone(),
            event_name: record.event_name.clone(),
        })
    }
}

impl UploadEvent {
    pub fn is_object_created(&self) -> bool {
        self.event_name
            .trim_start_matches("s3:")
            .starts_with(OBJECT_CREATED)
    }

    pub fn extension(&self) -> Option<String> {
        self.key
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }

    pub fn event_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.event_time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

// Keys arrive form-encoded: `+` for space, `%XX` for everything else. Literal `&` and `=`
// are escaped first so the whole key decodes as a single name.
pub fn decode_object_key(raw: &str) -> String {
    let escaped = raw.replace('&', "%26").replace('=', "%3D");
    url::form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(name, _)| name.into_owned())
        .unwrap_or_default()
}
