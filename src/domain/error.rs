//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 7s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an accent color is not a `#RRGGBB` or `#AARRGGBB` hex string
#[derive(Debug, Clone, Error)]
#[error("Invalid color: \"{input}\". Expected #RRGGBB or #AARRGGBB")]
pub struct ColorParseError {
    pub input: String,
}

/// Error when encoding or decoding a scheduled notification payload
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    #[error("Failed to encode scheduled notification: {0}")]
    Encode(String),

    #[error("Failed to decode scheduled notification: {0}")]
    Decode(String),

    #[error("Unsupported payload version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
