//! The progress store contract.

use std::future::Future;

use quizquest_types::{PlayerId, PlayerProgress};

use crate::error::DbError;

/// Durable storage for player progress records, keyed by owner.
///
/// Every record carries a `version`. [`ProgressStore::update`] is a
/// conditional write: it only succeeds when the stored version equals
/// `expected_version`, and the saved record comes back with the version
/// bumped by one. Callers always write the full record produced by the
/// ledger, never partial field deltas.
pub trait ProgressStore: Send + Sync {
    /// Fetch the record for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ProgressNotFound`] if the player has no record.
    fn get(&self, owner: PlayerId) -> impl Future<Output = Result<PlayerProgress, DbError>> + Send;

    /// Insert a new record. The stored version starts at zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::AlreadyExists`] if the owner already has a record.
    fn create(
        &self,
        initial: PlayerProgress,
    ) -> impl Future<Output = Result<PlayerProgress, DbError>> + Send;

    /// Replace the record for `progress.owner` if it is still at
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ProgressNotFound`] if there is no record and
    /// [`DbError::ConcurrencyConflict`] if another writer got there first.
    fn update(
        &self,
        expected_version: u64,
        progress: PlayerProgress,
    ) -> impl Future<Output = Result<PlayerProgress, DbError>> + Send;
}
