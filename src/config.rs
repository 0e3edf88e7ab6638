use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub opensearch_host: String,
    pub opensearch_index: String,
    pub lex_bot_id: String,
    pub lex_bot_alias_id: String,
    pub lex_locale_id: String,
    pub max_labels: i32,
    pub allowed_extensions: HashSet<String>,
    pub public_url_region: String,
    pub search_timeout_secs: u64,
    pub search_max_retries: u32,
    pub index_documents: bool,
    pub web_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_extensions"),
            );

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let s = builder
            .set_default("lex_locale_id", "en_US")?
            .set_default("max_labels", 10)?
            .set_default("allowed_extensions", DEFAULT_EXTENSIONS.to_vec())?
            .set_default("public_url_region", "us-east-1")?
            .set_default("search_timeout_secs", 10)?
            .set_default("search_max_retries", 3)?
            .set_default("index_documents", true)?
            .set_default("web_port", 8080)?
            .set_default("log_level", "info")?
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.allowed_extensions = config
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("opensearch_host", &self.opensearch_host),
            ("opensearch_index", &self.opensearch_index),
            ("lex_bot_id", &self.lex_bot_id),
            ("lex_bot_alias_id", &self.lex_bot_alias_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} must not be empty", key)));
            }
        }

        if !(1..=1000).contains(&self.max_labels) {
            return Err(ConfigError::Message(format!(
                "max_labels must be between 1 and 1000, got {}",
                self.max_labels
            )));
        }

        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::Message(
                "allowed_extensions must name at least one extension".into(),
            ));
        }

        Ok(())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn opensearch_url(&self) -> String {
        if self.opensearch_host.contains("://") {
            self.opensearch_host.clone()
        } else {
            format!("https://{}", self.opensearch_host)
        }
    }
}
