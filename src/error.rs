//! Error types for the portfolio service
//!
//! Covers configuration, upstream (GitHub) and serialization failures.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for portfolio operations
pub type Result<T> = std::result::Result<T, PortfolioError>;

/// Error type for portfolio operations
#[derive(Error, Debug)]
pub enum PortfolioError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream API answered with a non-2xx status
    #[error("GitHub API error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream response could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Server bind/serve errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors (transport, timeouts, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl PortfolioError {
    /// Short label used for metrics and structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PortfolioError::Config(_) => "config",
            PortfolioError::Upstream { .. } => "upstream_status",
            PortfolioError::Parse(_) => "parse",
            PortfolioError::Server(_) => "server",
            PortfolioError::Io(_) => "io",
            PortfolioError::Json(_) => "json",
            PortfolioError::Yaml(_) => "yaml",
            PortfolioError::Http(e) if e.is_timeout() => "timeout",
            PortfolioError::Http(e) if e.is_connect() => "connect",
            PortfolioError::Http(_) => "http",
            PortfolioError::Other(_) => "other",
        }
    }
}
