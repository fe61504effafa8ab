use axum::http::Uri;
use service::{errors::ServiceError, ApiResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

/// JSON 404 for paths no route matches, shaped like every other failure.
pub async fn fallback(uri: Uri) -> ApiResponse {
    ApiResponse::from_error(&ServiceError::NotFound(format!("no route for {}", uri.path())))
}
