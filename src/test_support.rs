use crate::config::AppConfig;
use crate::error::AppError;
use crate::event::S3Notification;
use crate::metadata::{LabelDocument, ObjectMetadata};
use crate::search::Searcher;
use crate::services::{LabelDetector, ObjectStore, SlotResolver, SlotSet};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn test_config() -> AppConfig {
    let builder = Config::builder()
        .set_override("opensearch_host", "localhost:9200")
        .unwrap()
        .set_override("opensearch_index", "photos")
        .unwrap()
        .set_override("lex_bot_id", "BOT123")
        .unwrap()
        .set_override("lex_bot_alias_id", "ALIAS456")
        .unwrap();
    AppConfig::from_builder(builder).unwrap()
}

pub fn notification_body(event_name: &str, key: &str) -> String {
    json!({
        "Records": [{
            "eventTime": "2025-02-01T10:00:00.000Z",
            "eventName": event_name,
            "s3": {
                "bucket": { "name": "photos-b2" },
                "object": { "key": key }
            }
        }]
    })
    .to_string()
}

pub fn notification(event_name: &str, key: &str) -> S3Notification {
    S3Notification::from_slice(notification_body(event_name, key).as_bytes()).unwrap()
}

pub struct MockObjectStore {
    result: Result<ObjectMetadata, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockObjectStore {
    pub fn with_custom_labels(raw: &str) -> Self {
        let mut tags = HashMap::new();
        tags.insert("customlabels".to_string(), raw.to_string());
        Self::new(Ok(ObjectMetadata {
            last_modified: Some(Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap()),
            tags,
        }))
    }

    pub fn without_last_modified() -> Self {
        Self::new(Ok(ObjectMetadata::default()))
    }

    pub fn failing(code: &str) -> Self {
        Self::new(Err(code.to_string()))
    }

    fn new(result: Result<ObjectMetadata, String>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.result.clone().map_err(|code| AppError::ObjectStore {
            code,
            message: "head object failed".into(),
        })
    }
}

pub struct MockLabelDetector {
    labels: Option<Vec<String>>,
    calls: Mutex<Vec<(String, String, i32)>>,
}

impl MockLabelDetector {
    pub fn with_labels(labels: &[&str]) -> Self {
        Self {
            labels: Some(labels.iter().map(|l| l.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            labels: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, i32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LabelDetector for MockLabelDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<String>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), max_labels));
        self.labels
            .clone()
            .ok_or_else(|| AppError::Labeling("InvalidImageFormatException".into()))
    }
}

pub struct MockSlotResolver {
    slots: Option<SlotSet>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSlotResolver {
    pub fn with_slots(slots: &[(&str, Option<&str>)]) -> Self {
        Self {
            slots: Some(
                slots
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.map(String::from)))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            slots: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlotResolver for MockSlotResolver {
    async fn resolve_slots(&self, text: &str, session_id: &str) -> Result<SlotSet, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), session_id.to_string()));
        self.slots
            .clone()
            .ok_or_else(|| AppError::Language("ThrottlingException".into()))
    }
}

pub struct MockSearcher {
    response: Result<Value, String>,
    fail_writes: bool,
    indexed: Mutex<Vec<LabelDocument>>,
    queries: Mutex<Vec<Value>>,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::with_response(json!({ "hits": { "hits": [] } }))
    }
}

impl MockSearcher {
    pub fn with_response(response: Value) -> Self {
        Self {
            response: Ok(response),
            fail_writes: false,
            indexed: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_hits(hits: &[(&str, &str)]) -> Self {
        let hits: Vec<Value> = hits
            .iter()
            .map(|(bucket, key)| json!({ "_source": { "bucket": bucket, "objectKey": key } }))
            .collect();
        Self::with_response(json!({ "hits": { "hits": hits } }))
    }

    pub fn malformed(body: &str) -> Self {
        Self {
            response: Err(body.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn indexed(&self) -> Vec<LabelDocument> {
        self.indexed.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<Value> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Searcher for MockSearcher {
    async fn ensure_index_exists(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn index_document(&self, document: &LabelDocument) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::SearchRejected {
                status: 403,
                body: "{\"message\":\"forbidden\"}".into(),
            });
        }
        self.indexed.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn search(&self, query: Value) -> Result<Value, AppError> {
        self.queries.lock().unwrap().push(query);
        self.response
            .clone()
            .map_err(AppError::MalformedSearchResponse)
    }
}
