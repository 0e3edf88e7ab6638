use crate::config::AppConfig;
use crate::error::AppError;
use crate::metadata::LabelDocument;
use crate::search::Searcher;
use async_trait::async_trait;
use aws_config::SdkConfig;
use opensearch::{
    auth::Credentials,
    http::{
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use url::Url;

const SIGNING_SERVICE: &str = "es";

pub struct OpenSearchSearcher {
    client: OpenSearch,
    index: String,
    max_retries: u32,
}

impl OpenSearchSearcher {
    pub fn new(config: &AppConfig, sdk_config: &SdkConfig) -> Result<Self, AppError> {
        let endpoint = config.opensearch_url();
        log::debug!("Creating OpenSearch client for URL: {}", endpoint);
        let url = Url::parse(&endpoint)?;
        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.search_timeout());

        match (sdk_config.credentials_provider(), sdk_config.region()) {
            (Some(provider), Some(region)) => {
                builder = builder
                    .auth(Credentials::AwsSigV4(provider, region.clone()))
                    .service_name(SIGNING_SERVICE);
            }
            _ => log::warn!("No AWS credentials or region resolved; search requests will be unsigned."),
        }

        let transport = builder.build()?;
        let client = OpenSearch::new(transport);
        log::trace!("OpenSearch client created successfully.");
        Ok(Self {
            client,
            index: config.opensearch_index.clone(),
            max_retries: config.search_max_retries,
        })
    }

    fn should_retry(&self, err: &opensearch::Error, attempt: u32) -> bool {
        if retry_allowed(err.is_timeout(), attempt, self.max_retries) {
            log::warn!(
                "OpenSearch request timed out (attempt {} of {}), retrying.",
                attempt + 1,
                self.max_retries + 1
            );
            true
        } else {
            false
        }
    }
}

fn retry_allowed(timed_out: bool, attempt: u32, max_retries: u32) -> bool {
    timed_out && attempt < max_retries
}

fn read_write_body(status: StatusCode, text: String) -> Result<String, AppError> {
    if status.is_success() {
        Ok(text)
    } else {
        Err(AppError::SearchRejected {
            status: status.as_u16(),
            body: text,
        })
    }
}

// A body that is not JSON is an error whatever the status.
fn read_search_body(status: StatusCode, text: String) -> Result<Value, AppError> {
    let body: Value = serde_json::from_str(&text)
        .map_err(|_| AppError::MalformedSearchResponse(text.clone()))?;
    read_write_body(status, text)?;
    Ok(body)
}

#[async_trait]
impl Searcher for OpenSearchSearcher {
    async fn ensure_index_exists(&self) -> Result<(), AppError> {
        log::debug!("Checking if OpenSearch index '{}' exists.", self.index);
        let index_exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await?
            .status_code()
            .is_success();

        if !index_exists {
            log::info!("OpenSearch index '{}' does not exist. Creating it.", self.index);
            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(&self.index))
                .body(json!({
                    "mappings": {
                        "properties": {
                            "objectKey": { "type": "keyword" },
                            "bucket": { "type": "keyword" },
                            "createdTimestamp": { "type": "date" },
                            "labels": { "type": "text" }
                        }
                    }
                }))
                .send()
                .await?;

            let status = response.status_code();
            read_write_body(status, response.text().await?)?;
            log::info!("OpenSearch index '{}' created successfully.", self.index);
        } else {
            log::debug!("OpenSearch index '{}' already exists.", self.index);
        }

        Ok(())
    }

    async fn index_document(&self, document: &LabelDocument) -> Result<(), AppError> {
        log::debug!("Indexing label document for object: {}", document.object_key);

        let mut attempt = 0;
        let response = loop {
            let result = self
                .client
                .index(IndexParts::Index(&self.index))
                .refresh(Refresh::True)
                .body(document)
                .send()
                .await;
            match result {
                Ok(response) => break response,
                Err(e) if self.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let status = response.status_code();
        let body = read_write_body(status, response.text().await?)?;
        log::info!("Indexed into OpenSearch: {}", body);
        Ok(())
    }

    async fn search(&self, query: Value) -> Result<Value, AppError> {
        log::debug!("Searching OpenSearch index '{}' with query: {}", self.index, query);
        let index = [self.index.as_str()];

        let mut attempt = 0;
        let response = loop {
            let result = self
                .client
                .search(SearchParts::Index(&index))
                .body(query.clone())
                .send()
                .await;
            match result {
                Ok(response) => break response,
                Err(e) if self.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let status = response.status_code();
        let body = read_search_body(status, response.text().await?)?;
        log::trace!("OpenSearch response: {:?}", body);
        Ok(body)
    }
}
