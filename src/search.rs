use crate::error::AppError;
use crate::metadata::LabelDocument;
use async_trait::async_trait;
use serde_json::{json, Value};

#[async_trait]
pub trait Searcher: Send + Sync {
    async fn ensure_index_exists(&self) -> Result<(), AppError>;
    async fn index_document(&self, document: &LabelDocument) -> Result<(), AppError>;
    async fn search(&self, query: Value) -> Result<Value, AppError>;
}

pub fn build_label_query(keywords: &[String]) -> Value {
    let should: Vec<Value> = keywords
        .iter()
        .map(|keyword| json!({ "match": { "labels": keyword } }))
        .collect();

    json!({
        "query": {
            "bool": {
                "should": should
            }
        }
    })
}

pub fn hit_locations(response: &Value) -> Vec<(String, String)> {
    let mut locations = Vec::new();
    if let Some(hits) = response["hits"]["hits"].as_array() {
        for hit in hits {
            let source = &hit["_source"];
            match (source["bucket"].as_str(), source["objectKey"].as_str()) {
                (Some(bucket), Some(key)) => locations.push((bucket.to_string(), key.to_string())),
                _ => log::warn!("Skipping hit without bucket/objectKey: {:?}", hit["_id"]),
            }
        }
    }
    locations
}
