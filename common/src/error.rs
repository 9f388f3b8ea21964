use thiserror::Error;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("Object storage error: {0}")]
    Storage(#[from] object_store::Error),
    #[error("Setup error: {0}")]
    Setup(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Operation already in progress: {0}")]
    Busy(String),
    #[error("Ingestion processing error: {0}")]
    Processing(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
