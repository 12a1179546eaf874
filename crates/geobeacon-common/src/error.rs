//! Error types for Geobeacon

use thiserror::Error;

/// Main error type for beacon operations
///
/// Probe, Submit and Channel failures are all handled where they occur:
/// logged, and the affected cycle skipped or the channel reconnected. None
/// of them terminate the process. Only configuration errors at startup are
/// fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Location probe error: {0}")]
    Probe(String),

    #[error("Report submission error: {0}")]
    Submit(String),

    #[error("Report rejected with status {0}")]
    SubmitStatus(u16),

    #[error("Push channel error: {0}")]
    Channel(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;
