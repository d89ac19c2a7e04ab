//! Error types for Albumcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlbumcastError>;

#[derive(Error, Debug)]
pub enum AlbumcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AlbumcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AlbumcastError::InvalidInput(_) => 3,
            AlbumcastError::Platform(PlatformError::NotConfigured(_)) => 2,
            AlbumcastError::Platform(_) => 1,
            AlbumcastError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failures surfaced by provider adapters and the orchestrator.
///
/// These never cross the adapter boundary as errors: `Provider::publish`
/// converts every variant into a failed `ShareResult` so that one platform's
/// fault cannot abort its siblings.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Unsupported platform: {0}")]
    Unsupported(String),
}

impl PlatformError {
    /// Map a reqwest transport error, keeping timeouts distinguishable.
    pub fn from_http(err: reqwest::Error, context: &str) -> Self {
        if err.is_timeout() {
            PlatformError::Timeout(format!("{}: {}", context, err))
        } else {
            PlatformError::Network(format!("{}: {}", context, err))
        }
    }
}
