//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A setting parsed but is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// A required environment variable was not set.
    ///
    /// Only raised for the provider API key, and only outside mock mode.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Specified path does not exist on the filesystem (or is not a file).
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },
}
