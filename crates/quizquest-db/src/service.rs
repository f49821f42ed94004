//! Store-backed progression operations.
//!
//! [`CompletionService`] runs the read-modify-write cycle the ledger leaves
//! to its caller: fetch the current snapshot, transform it through the
//! [`ProgressionLedger`], and write it back with a conditional update. On a
//! concurrency conflict the whole cycle restarts from a fresh snapshot, up
//! to `max_retries` times. Any other error is returned immediately.

use chrono::NaiveDate;
use tracing::warn;

use quizquest_ledger::{CompletionOutcome, ProgressionLedger};
use quizquest_types::{LevelId, MapView, PlayerId, PlayerProgress, ProfileSummary};

use crate::error::DbError;
use crate::store::ProgressStore;

/// Applies player actions against a [`ProgressStore`].
#[derive(Debug)]
pub struct CompletionService<S> {
    store: S,
    ledger: ProgressionLedger,
    max_retries: u32,
}

impl<S: ProgressStore> CompletionService<S> {
    /// Wrap a store and a ledger.
    pub const fn new(store: S, ledger: ProgressionLedger, max_retries: u32) -> Self {
        Self {
            store,
            ledger,
            max_retries,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The ledger every update goes through.
    pub const fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    /// Create the record for a player who just picked an avatar.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Ledger`] for an unknown avatar or bad username and
    /// [`DbError::AlreadyExists`] if the player already has a record.
    pub async fn register(
        &self,
        owner: PlayerId,
        avatar_id: u32,
        username: &str,
    ) -> Result<PlayerProgress, DbError> {
        let initial = self.ledger.create_progress(owner, avatar_id, username)?;
        self.store.create(initial).await
    }

    /// Apply a level completion and persist it.
    ///
    /// The returned outcome carries the record as stored, with its new
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ProgressNotFound`] if the player has no record,
    /// [`DbError::Ledger`] if the ledger rejects the completion, and
    /// [`DbError::ConcurrencyConflict`] once the retry budget is spent.
    pub async fn complete_level(
        &self,
        owner: PlayerId,
        level_id: &LevelId,
        answers: &[bool],
        today: NaiveDate,
    ) -> Result<CompletionOutcome, DbError> {
        let (saved, mut outcome) = self
            .modify(owner, "complete_level", |snapshot| {
                let outcome =
                    self.ledger
                        .apply_level_completion(snapshot, level_id, answers, today)?;
                Ok((outcome.progress.clone(), outcome))
            })
            .await?;
        outcome.progress = saved;
        Ok(outcome)
    }

    /// Change a player's avatar and/or username.
    ///
    /// # Errors
    ///
    /// Same as [`Self::complete_level`].
    pub async fn edit_profile(
        &self,
        owner: PlayerId,
        avatar_id: Option<u32>,
        username: Option<&str>,
    ) -> Result<PlayerProgress, DbError> {
        let (saved, ()) = self
            .modify(owner, "edit_profile", |snapshot| {
                Ok((self.ledger.edit_profile(snapshot, avatar_id, username)?, ()))
            })
            .await?;
        Ok(saved)
    }

    /// Profile page data for a player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ProgressNotFound`] if the player has no record.
    pub async fn profile(&self, owner: PlayerId) -> Result<ProfileSummary, DbError> {
        let progress = self.store.get(owner).await?;
        Ok(self.ledger.profile_summary(&progress)?)
    }

    /// Adventure map for a player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ProgressNotFound`] if the player has no record.
    pub async fn map(&self, owner: PlayerId) -> Result<MapView, DbError> {
        let progress = self.store.get(owner).await?;
        Ok(self.ledger.map_view(&progress))
    }

    /// Read, transform and conditionally write one record, retrying the
    /// whole cycle on conflict.
    async fn modify<T, F>(
        &self,
        owner: PlayerId,
        operation: &'static str,
        mut apply: F,
    ) -> Result<(PlayerProgress, T), DbError>
    where
        F: FnMut(&PlayerProgress) -> Result<(PlayerProgress, T), DbError>,
    {
        let mut retries: u32 = 0;
        loop {
            let snapshot = self.store.get(owner).await?;
            let (candidate, extra) = apply(&snapshot)?;
            match self.store.update(snapshot.version, candidate).await {
                Ok(saved) => return Ok((saved, extra)),
                Err(e) if e.is_conflict() && retries < self.max_retries => {
                    retries = retries.saturating_add(1);
                    warn!(
                        owner = %owner,
                        operation,
                        retry = retries,
                        max_retries = self.max_retries,
                        "progress conflict, retrying with a fresh snapshot"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
