//! Error types for the Bibliotopic library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`BibliotopicError`] enum. Soft failures that the boundary is expected to
//! absorb (an unknown set operation, a query that matches nothing) are not
//! errors and never show up here.
//!
//! # Examples
//!
//! ```
//! use bibliotopic::error::{BibliotopicError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BibliotopicError::not_found("group 42"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Bibliotopic operations.
#[derive(Error, Debug)]
pub enum BibliotopicError {
    /// I/O errors (store files, visualization output, corpus input)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Corpus construction errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Topic model training or inference errors
    #[error("Model error: {0}")]
    Model(String),

    /// The corpus has no document with any surviving term.
    #[error("Corpus too small to model: {0}")]
    CorpusTooSmall(String),

    /// Another topic discovery run holds the pipeline lock.
    #[error("Pipeline busy: {0}")]
    PipelineBusy(String),

    /// A paper, group or topic is missing from the record store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query-related errors
    #[error("Query error: {0}")]
    Query(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rejected configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BibliotopicError.
pub type Result<T> = std::result::Result<T, BibliotopicError>;

impl BibliotopicError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Corpus(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Model(msg.into())
    }

    /// Create a new corpus-too-small error.
    pub fn corpus_too_small<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::CorpusTooSmall(msg.into())
    }

    /// Create a new pipeline-busy error.
    pub fn pipeline_busy<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::PipelineBusy(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::NotFound(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Query(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Storage(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        BibliotopicError::Other(msg.into())
    }

    /// Whether this error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BibliotopicError::NotFound(_))
    }
}
