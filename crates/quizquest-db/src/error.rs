//! Error types for the progress store.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and the ledger's own failures with the player the
//! operation was for.

use quizquest_ledger::LedgerError;
use quizquest_types::{ErrorKind, PlayerId};

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The player has no progress record yet. Route them to onboarding.
    #[error("no progress record for player {0}")]
    ProgressNotFound(PlayerId),

    /// A progress record already exists for the player.
    #[error("player {0} already has a progress record")]
    AlreadyExists(PlayerId),

    /// The record changed since it was read.
    #[error("progress for player {owner} is at version {actual}, expected {expected}")]
    ConcurrencyConflict {
        /// The player whose record was being updated.
        owner: PlayerId,
        /// Version the caller read.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// A stored value does not fit the progress record's types.
    #[error("stored value out of range: {0}")]
    OutOfRange(String),

    /// The ledger refused the update.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Coarse classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProgressNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::InvalidInput,
            Self::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
            Self::Ledger(e) => e.kind(),
            Self::Postgres(_) | Self::Migration(_) | Self::OutOfRange(_) | Self::Config(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether re-reading the record and retrying may succeed.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
