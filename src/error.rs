//! Error types for hosttech-ddns.

use thiserror::Error;

/// Result type alias for hosttech-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP transport error.
    #[error("Network error: {0}")]
    Network(String),

    /// The zone API answered with an unexpected status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// No zone matched the lookup key.
    #[error("No zone found for {0}")]
    ZoneNotFound(String),

    /// IP detection error.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// The provider accepted an update but echoed back different content.
    #[error("Update verification failed: {field} sent {sent:?}, observed {observed:?}")]
    VerificationMismatch {
        field: &'static str,
        sent: String,
        observed: String,
    },

    /// The provider response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest includes the URL, never headers, so the token stays out of logs
        DdnsError::Network(e.to_string())
    }
}

impl From<toml::de::Error> for DdnsError {
    fn from(e: toml::de::Error) -> Self {
        DdnsError::Config(e.to_string())
    }
}
