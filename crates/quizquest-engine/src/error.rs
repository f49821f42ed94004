//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup and the playthrough.

use quizquest_types::ErrorKind;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: quizquest_core::ConfigError,
    },

    /// The content catalog failed validation.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: quizquest_content::ContentError,
    },

    /// The ledger could not be built or refused an update.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: quizquest_ledger::LedgerError,
    },

    /// The progress store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: quizquest_db::DbError,
    },

    /// The playthrough could not make progress.
    #[error("playthrough error: {message}")]
    Playthrough {
        /// Description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Coarse classification of the wrapped failure.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::InvalidInput,
            Self::Content { source } => source.kind(),
            Self::Ledger { source } => source.kind(),
            Self::Store { source } => source.kind(),
            Self::Playthrough { .. } => ErrorKind::Internal,
        }
    }
}
