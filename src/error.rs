//! Error types for cur-mean.
//!
//! Defines the error enum shared by every pipeline phase. Each variant
//! aborts the remaining phases when it reaches the orchestrator.

use thiserror::Error;

/// Main error type for cur-mean operations.
#[derive(Error, Debug)]
pub enum CurError {
    /// The "start query execution" call failed or returned no identifier.
    #[error("Submission error: {0}")]
    Submission(String),

    /// Fetching the execution status failed while polling.
    #[error("Poll error: {0}")]
    PollFetch(String),

    /// The query reached the FAILED state. Carries the service-provided reason.
    #[error("Query encountered an error: {0}")]
    Execution(String),

    /// The poller used up its attempt budget while the query was still running.
    #[error("Query still running after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    /// Fetching the result set failed.
    #[error("Result fetch error: {0}")]
    ResultFetch(String),

    /// The result cell could not be turned into a number (strict mode only).
    #[error("Result extraction error: {0}")]
    ResultExtraction(String),

    /// Configuration errors (invalid config file, bad flag values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (broken invariants).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CurError {
    /// Creates a submission error with the given message.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates a poll fetch error with the given message.
    pub fn poll_fetch(msg: impl Into<String>) -> Self {
        Self::PollFetch(msg.into())
    }

    /// Creates an execution error carrying the service reason.
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution(reason.into())
    }

    /// Creates a result fetch error with the given message.
    pub fn result_fetch(msg: impl Into<String>) -> Self {
        Self::ResultFetch(msg.into())
    }

    /// Creates a result extraction error with the given message.
    pub fn result_extraction(msg: impl Into<String>) -> Self {
        Self::ResultExtraction(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Submission(_) => "Submission Error",
            Self::PollFetch(_) => "Poll Error",
            Self::Execution(_) => "Execution Error",
            Self::PollTimeout { .. } => "Poll Timeout",
            Self::ResultFetch(_) => "Result Fetch Error",
            Self::ResultExtraction(_) => "Result Extraction Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CurError.
pub type Result<T> = std::result::Result<T, CurError>;
