// src/metadata.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CUSTOM_LABELS_TAG: &str = "customlabels";

#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub last_modified: Option<DateTime<Utc>>,
    pub tags: HashMap<String, String>,
}

impl ObjectMetadata {
    pub fn custom_labels(&self) -> Vec<String> {
        self.tags
            .get(CUSTOM_LABELS_TAG)
            .map(|raw| parse_custom_labels(raw))
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelDocument {
    pub object_key: String,
    pub bucket: String,
    pub created_timestamp: String,
    pub labels: Vec<String>,
}

impl LabelDocument {
    pub fn new(
        bucket: &str,
        object_key: &str,
        created: DateTime<Utc>,
        labels: Vec<String>,
    ) -> Self {
        Self {
            object_key: object_key.to_string(),
            bucket: bucket.to_string(),
            created_timestamp: created.to_rfc3339(),
            labels,
        }
    }
}

pub fn parse_custom_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

pub fn merge_labels(detected: Vec<String>, custom: Vec<String>) -> Vec<String> {
    let mut labels = detected;
    labels.extend(custom);
    labels
}
