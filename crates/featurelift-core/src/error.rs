//! Error types for FeatureLift
//!
//! All errors that the job client can surface are defined here. We use the
//! `thiserror` crate to keep the definitions concise and strongly typed.
//!
//! The taxonomy follows the failure boundaries of the client:
//! - precondition checks that run before anything is submitted,
//! - lookups against external collaborators (registry, job service),
//! - transport failures talking to the control plane,
//! - staging failures while materializing entity data.
//!
//! Errors raised by collaborators pass through unchanged; the client never
//! retries or downgrades them.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors surfaced by the FeatureLift client
#[derive(Error, Debug)]
pub enum Error {
    /// A caller or metadata contract was violated before submission
    ///
    /// Raised before any staging or network call is attempted, e.g. a batch
    /// source without a created-timestamp column, or an entity dataset
    /// missing its event-timestamp column.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Feature table was not found in the metadata registry
    #[error("Feature table '{0}' not found")]
    TableNotFound(String),

    /// No job with the given id is known to the backend
    #[error("Job '{0}' not found")]
    JobNotFound(String),

    /// Feature reference string did not parse as `table:feature`
    #[error("Invalid feature reference '{0}' (expected 'table:feature')")]
    InvalidFeatureRef(String),

    /// Transport-level failure talking to the job service
    ///
    /// Surfaced verbatim; the client never falls back from remote to local
    /// mode on a transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An operation did not complete within its time budget
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Entity data could not be staged
    ///
    /// Job submission is not attempted when staging fails.
    #[error("Staging error: {0}")]
    Staging(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

// Helper constructors to make error creation more ergonomic

impl Error {
    /// Creates a Precondition error from a string
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Creates a Transport error from a string
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a Staging error from a string
    pub fn staging(msg: impl Into<String>) -> Self {
        Self::Staging(msg.into())
    }

    /// Creates a Config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
