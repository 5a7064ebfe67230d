//! Error types for Nocturne

use thiserror::Error;

/// The main error type for Nocturne operations.
///
/// The engine's call surface itself never fails (unknown surfaces and
/// missing contexts are tolerated silently); these errors cover the
/// configuration, IO, and image-output boundary around it.
#[derive(Debug, Error)]
pub enum NocturneError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    EncodeError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for Nocturne operations
pub type Result<T> = std::result::Result<T, NocturneError>;

impl From<toml::de::Error> for NocturneError {
    fn from(err: toml::de::Error) -> Self {
        NocturneError::TomlParseError(err.to_string())
    }
}
