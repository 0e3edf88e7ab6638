use crate::error::AppError;
use crate::metadata::ObjectMetadata;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Slot name to interpreted value; `None` for slots the language service left unfilled.
pub type SlotSet = BTreeMap<String, Option<String>>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AppError>;
}

#[async_trait]
pub trait LabelDetector: Send + Sync {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait SlotResolver: Send + Sync {
    async fn resolve_slots(&self, text: &str, session_id: &str) -> Result<SlotSet, AppError>;
}
