//! Error types for taskplan.

use thiserror::Error;

/// Errors that can occur in taskplan operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event '{id}' has an unparsable timestamp: {value}")]
    InvalidTimestamp { id: String, value: String },

    #[error("Event '{0}' has no title")]
    MissingTitle(String),

    #[error("Event '{0}' has no start date or time")]
    MissingStart(String),

    #[error("Task title must not be empty")]
    InvalidTitle,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Records that are merely incomplete (no title, no start) are skipped
    /// silently when decoding a batch.
    pub fn is_partial_record(&self) -> bool {
        matches!(self, Error::MissingTitle(_) | Error::MissingStart(_))
    }

    /// Rejected caller input, as opposed to provider or record failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidTitle | Error::InvalidDate(_) | Error::InvalidTime(_)
        )
    }

    /// A stored event that cannot be read back as a task.
    pub fn is_unreadable_record(&self) -> bool {
        self.is_partial_record() || matches!(self, Error::InvalidTimestamp { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias for taskplan operations.
pub type Result<T> = std::result::Result<T, Error>;
