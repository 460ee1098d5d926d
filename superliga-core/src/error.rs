//! Error types for superliga-core.

use thiserror::Error;

/// Errors that can occur while syncing competition calendars.
#[derive(Error, Debug)]
pub enum SuperligaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid competition record: {0}")]
    InvalidCompetition(String),

    #[error("Invalid match record: {0}")]
    InvalidMatch(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No competitions found for {0}")]
    NoCompetitions(i32),
}

/// Result type alias for superliga operations.
pub type SuperligaResult<T> = Result<T, SuperligaError>;
