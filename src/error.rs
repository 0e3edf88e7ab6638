use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use opensearch::Error as OpenSearchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("OpenSearch error: {0}")]
    OpenSearch(#[from] OpenSearchError),

    #[error("OpenSearch client build error: {0}")]
    OpenSearchBuild(#[from] opensearch::http::transport::BuildError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Object store error ({code}): {message}")]
    ObjectStore { code: String, message: String },

    #[error("Labeling error: {0}")]
    Labeling(String),

    #[error("Language service error: {0}")]
    Language(String),

    #[error("Search index returned a malformed response: {0}")]
    MalformedSearchResponse(String),

    #[error("Search index rejected the request ({status}): {body}")]
    SearchRejected { status: u16, body: String },

    #[error("Generic error: {0}")]
    Generic(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
            }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::OpenSearch(_) => StatusCode::BAD_GATEWAY,
            AppError::OpenSearchBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            AppError::ObjectStore { .. } => StatusCode::BAD_GATEWAY,
            AppError::Labeling(_) => StatusCode::BAD_GATEWAY,
            AppError::Language(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedSearchResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::SearchRejected { .. } => StatusCode::BAD_GATEWAY,
            AppError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
