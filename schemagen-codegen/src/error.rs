//! Error types for schemagen-codegen

use thiserror::Error;

/// Result type alias for schemagen-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that terminate a generation run
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Missing or malformed run parameters; raised before any I/O
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested provider is unknown or has no registered connector
    #[error("Provider '{provider}' could not be loaded: {message}")]
    ProviderLoad { provider: String, message: String },

    /// The metadata connection could not be opened in time
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// Query, timeout or catalog-shape failure while reading
    #[error("Failed to read schema: {0}")]
    SchemaRead(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    pub(crate) fn provider_load(provider: &str, message: impl Into<String>) -> Self {
        CodegenError::ProviderLoad {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::Configuration(err.to_string())
    }
}

impl From<schemagen::Error> for CodegenError {
    fn from(err: schemagen::Error) -> Self {
        CodegenError::SchemaRead(err.to_string())
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
