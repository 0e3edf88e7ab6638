use crate::config::AppConfig;
use crate::error::AppError;
use crate::event::{S3Notification, UploadEvent};
use crate::indexer;
use crate::metadata::{merge_labels, LabelDocument, ObjectMetadata};
use crate::search::Searcher;
use crate::services::{LabelDetector, ObjectStore};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, PartialEq)]
pub enum Step<T> {
    Proceed(T),
    Disallowed(String),
    ExternalFailure(String),
}

#[derive(Debug, PartialEq)]
pub enum IngestReport {
    Indexed(LabelDocument),
    NotIndexed(LabelDocument),
    Skipped(String),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub status_code: u16,
    pub body: String,
}

impl IngestResponse {
    fn ok() -> Self {
        Self {
            status_code: 200,
            body: "OK".into(),
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            status_code: 500,
            body: msg.into(),
        }
    }
}

pub struct Ingestor {
    object_store: Arc<dyn ObjectStore>,
    labeler: Arc<dyn LabelDetector>,
    searcher: Arc<dyn Searcher>,
    allowed_extensions: HashSet<String>,
    max_labels: i32,
    index_documents: bool,
}

impl Ingestor {
    pub fn new(
        config: &AppConfig,
        object_store: Arc<dyn ObjectStore>,
        labeler: Arc<dyn LabelDetector>,
        searcher: Arc<dyn Searcher>,
    ) -> Self {
        Self {
            object_store,
            labeler,
            searcher,
            allowed_extensions: config.allowed_extensions.clone(),
            max_labels: config.max_labels,
            index_documents: config.index_documents,
        }
    }

    pub async fn respond(&self, body: &[u8]) -> IngestResponse {
        let result = match S3Notification::from_slice(body) {
            Ok(notification) => self.handle(&notification).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                log::debug!("Ingestion finished: {:?}", report);
                IngestResponse::ok()
            }
            Err(e) => {
                log::error!("Unhandled ingestion error: {}", e);
                IngestResponse::error("Unhandled error")
            }
        }
    }

    pub async fn handle(&self, notification: &S3Notification) -> Result<IngestReport, AppError> {
        let event = notification.first_upload()?;
        log::info!(
            "Received {} for s3://{}/{} at {}",
            event.event_name,
            event.bucket,
            event.key,
            event.event_time
        );

        if let Step::Disallowed(reason) = check_event_type(&event) {
            log::warn!("Ignoring event: {}", reason);
            return Ok(IngestReport::Skipped(reason));
        }

        if let Step::Disallowed(reason) = check_extension(&event, &self.allowed_extensions) {
            log::info!("Skipping non-image file: {}", reason);
            return Ok(IngestReport::Skipped(reason));
        }

        log::info!("Processing image: s3://{}/{}", event.bucket, event.key);

        let metadata = match fetch_metadata(self.object_store.as_ref(), &event).await {
            Step::Proceed(metadata) => metadata,
            Step::Disallowed(reason) | Step::ExternalFailure(reason) => {
                log::error!("Failed to retrieve object metadata, skipping processing: {}", reason);
                return Ok(IngestReport::Skipped(reason));
            }
        };

        let custom_labels = metadata.custom_labels();
        if !custom_labels.is_empty() {
            log::info!("Custom labels: {:?}", custom_labels);
        }

        let detected_labels =
            match detect_labels(self.labeler.as_ref(), &event, self.max_labels).await {
                Step::Proceed(labels) => labels,
                Step::Disallowed(reason) | Step::ExternalFailure(reason) => {
                    log::error!("Label detection failed for {}: {}", event.key, reason);
                    Vec::new()
                }
            };

        let created = metadata
            .last_modified
            .or_else(|| event.event_timestamp())
            .unwrap_or_else(Utc::now);
        let document = LabelDocument::new(
            &event.bucket,
            &event.key,
            created,
            merge_labels(detected_labels, custom_labels),
        );
        log::info!("Final combined label document constructed: {:?}", document);

        if !self.index_documents {
            log::debug!("Index writes disabled; not persisting {}", document.object_key);
            return Ok(IngestReport::NotIndexed(document));
        }

        match indexer::persist(self.searcher.as_ref(), &document).await {
            Step::Proceed(()) => Ok(IngestReport::Indexed(document)),
            Step::Disallowed(reason) | Step::ExternalFailure(reason) => {
                log::error!("{}", reason);
                Ok(IngestReport::NotIndexed(document))
            }
        }
    }
}

fn check_event_type(event: &UploadEvent) -> Step<()> {
    if event.is_object_created() {
        Step::Proceed(())
    } else {
        Step::Disallowed(format!("event type {}", event.event_name))
    }
}

fn check_extension(event: &UploadEvent, allowed: &HashSet<String>) -> Step<()> {
    match event.extension() {
        Some(ext) if allowed.contains(&ext) => Step::Proceed(()),
        _ => Step::Disallowed(format!("extension not allowed for {}", event.key)),
    }
}

async fn fetch_metadata(store: &dyn ObjectStore, event: &UploadEvent) -> Step<ObjectMetadata> {
    match store.head_object(&event.bucket, &event.key).await {
        Ok(metadata) => Step::Proceed(metadata),
        Err(e) => Step::ExternalFailure(e.to_string()),
    }
}

async fn detect_labels(
    labeler: &dyn LabelDetector,
    event: &UploadEvent,
    max_labels: i32,
) -> Step<Vec<String>> {
    match labeler.detect_labels(&event.bucket, &event.key, max_labels).await {
        Ok(labels) => {
            log::info!("Detected labels: {:?}", labels);
            Step::Proceed(labels)
        }
        Err(e) => Step::ExternalFailure(e.to_string()),
    }
}
