//! Error types for player analytics

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while analysing players and trades
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Unknown player identifier
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// Player exists but has no stat lines in the window
    #[error("No stats available for player: {0}")]
    NoStats(String),

    /// Rejected input (e.g. an empty side of a trade)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure reported by the data-access collaborator
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors while reading or writing configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new data source error
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
