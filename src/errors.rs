use std::path::PathBuf;
use thiserror::Error;

use crate::providers::GeneratorError;

/// Errors that can occur in the techdesk application
#[derive(Error, Debug)]
pub enum TechdeskError {
    /// Error loading or saving configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Required API keys are not set in the environment
    #[error("Required API keys not found: {0}")]
    MissingApiKeys(String),

    /// Error reading or writing a data file
    #[error("File error for {path}: {message}")]
    FileError { path: PathBuf, message: String },

    /// Error serializing or deserializing data
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error from the text-generation backend
    #[error("Generator error: {0}")]
    GeneratorError(#[from] GeneratorError),

    /// Error from the news search backend
    #[error("News API error: {0}")]
    NewsApiError(String),

    /// Error reading terminal input
    #[error("Input error: {0}")]
    InputError(String),
}

pub type Result<T> = std::result::Result<T, TechdeskError>;
