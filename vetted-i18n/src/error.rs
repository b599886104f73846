//! Error types for i18n operations

use thiserror::Error;

/// Errors that can occur while loading or selecting locales.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Invalid locale tag
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Failed to parse message file
    #[error("Failed to parse message file: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
