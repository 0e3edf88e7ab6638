mod aws_clients;
mod config;
mod error;
mod event;
mod indexer;
mod metadata;
mod processor;
mod query;
mod search;
mod search_clients;
mod services;
mod web_server;

#[cfg(test)]
mod test_support;

use crate::aws_clients::{
    lex::LexSlotResolver, rekognition::RekognitionLabelDetector, s3::S3ObjectStore,
};
use crate::config::AppConfig;
use crate::processor::Ingestor;
use crate::query::{QueryHandler, RESPONSE_HEADERS};
use crate::search::Searcher;
use crate::search_clients::opensearch::OpenSearchSearcher;
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Photo labeling and natural-language photo search")]
struct Args {
    /// Port for the web server (overrides web_port)
    #[arg(long)]
    port: Option<u16>,

    /// Log level filter (overrides log_level)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `GET /search` and `POST /events` (default)
    Serve,
    /// Run the ingestion handler once over a bucket notification file
    Ingest { event: PathBuf },
    /// Run the search handler once for the given text
    Search { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::new().context("loading configuration")?;
    if let Some(port) = args.port {
        config.web_port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting photo-tagger");

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    // One search client for the lifetime of the process, shared by both handlers.
    let searcher: Arc<dyn Searcher> = Arc::new(OpenSearchSearcher::new(&config, &sdk_config)?);
    let ingestor = Ingestor::new(
        &config,
        Arc::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config))),
        Arc::new(RekognitionLabelDetector::new(aws_sdk_rekognition::Client::new(
            &sdk_config,
        ))),
        searcher.clone(),
    );
    let query_handler = QueryHandler::new(
        &config,
        Arc::new(LexSlotResolver::new(
            aws_sdk_lexruntimev2::Client::new(&sdk_config),
            &config,
        )),
        searcher.clone(),
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = searcher.ensure_index_exists().await {
                log::error!("Could not prepare search index: {}", e);
            }
            if let Err(e) =
                web_server::start_web_server(config.web_port, ingestor, query_handler).await
            {
                log::error!("Web server error: {}", e);
            }
        }
        Command::Ingest { event } => {
            let body = std::fs::read(&event)
                .with_context(|| format!("reading notification {}", event.display()))?;
            let response = ingestor.respond(&body).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Search { text } => {
            let response = query_handler.handle(Some(text.as_str())).await?;
            let headers: serde_json::Map<String, serde_json::Value> = RESPONSE_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
                .collect();
            let output = serde_json::json!({
                "statusCode": response.status_code,
                "headers": headers,
                "body": serde_json::to_string(&response.body)?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    info!("photo-tagger finished");

    Ok(())
}
