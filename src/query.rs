use crate::config::AppConfig;
use crate::error::AppError;
use crate::search::{build_label_query, hit_locations, Searcher};
use crate::services::{SlotResolver, SlotSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

pub const NO_QUERY_MESSAGE: &str = "No search text provided.";
pub const NO_KEYWORDS_MESSAGE: &str = "No keywords recognized in search text.";

pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "*"),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
];

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchBody {
    pub message: String,
    pub results: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub struct QueryResponse {
    pub status_code: u16,
    pub body: SearchBody,
}

impl QueryResponse {
    fn new(status_code: u16, message: impl Into<String>, results: Vec<String>) -> Self {
        Self {
            status_code,
            body: SearchBody {
                message: message.into(),
                results,
            },
        }
    }
}

pub struct QueryHandler {
    resolver: Arc<dyn SlotResolver>,
    searcher: Arc<dyn Searcher>,
    region: String,
}

impl QueryHandler {
    pub fn new(
        config: &AppConfig,
        resolver: Arc<dyn SlotResolver>,
        searcher: Arc<dyn Searcher>,
    ) -> Self {
        Self {
            resolver,
            searcher,
            region: config.public_url_region.clone(),
        }
    }

    pub async fn handle(&self, query_text: Option<&str>) -> Result<QueryResponse, AppError> {
        log::info!("Search request: {:?}", query_text);

        let text = match query_text.map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(QueryResponse::new(400, NO_QUERY_MESSAGE, Vec::new())),
        };

        // A fresh session per request; nothing carries over between searches.
        let session_id = Uuid::new_v4().to_string();
        let slots = self.resolver.resolve_slots(text, &session_id).await?;
        log::debug!("Slots: {:?}", slots);

        let keywords = extract_keywords(&slots);
        log::info!("Keywords interpreted: {:?}", keywords);
        if keywords.is_empty() {
            return Ok(QueryResponse::new(200, NO_KEYWORDS_MESSAGE, Vec::new()));
        }

        let response = self.searcher.search(build_label_query(&keywords)).await?;
        let results = hit_locations(&response)
            .into_iter()
            .map(|(bucket, key)| public_url(&bucket, &self.region, &key))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Found {} images for keywords {:?}", results.len(), keywords);

        Ok(QueryResponse::new(
            200,
            format!("Searching for keywords: {:?}", keywords),
            results,
        ))
    }
}

pub fn extract_keywords(slots: &SlotSet) -> Vec<String> {
    slots.values().flatten().cloned().collect()
}

/// `https://{bucket}.s3.{region}.amazonaws.com/{key}` with each key segment percent-encoded.
pub fn public_url(bucket: &str, region: &str, key: &str) -> Result<String, AppError> {
    let mut url = Url::parse(&format!("https://{}.s3.{}.amazonaws.com/", bucket, region))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| AppError::Generic(format!("cannot build object URL for {}", key)))?;
        segments.pop_if_empty().extend(key.split('/'));
    }
    Ok(url.to_string())
}
