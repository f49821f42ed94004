//! In-process progress store.
//!
//! Backs tests and the demo playthrough. Records live in a map behind a
//! `tokio` read-write lock; the version check and the write happen under
//! one write guard, so the conditional update is atomic.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use quizquest_types::{PlayerId, PlayerProgress};

use crate::error::DbError;
use crate::store::ProgressStore;

/// Progress records held in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: RwLock<BTreeMap<PlayerId, PlayerProgress>>,
}

impl MemoryProgressStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl ProgressStore for MemoryProgressStore {
    async fn get(&self, owner: PlayerId) -> Result<PlayerProgress, DbError> {
        self.records
            .read()
            .await
            .get(&owner)
            .cloned()
            .ok_or(DbError::ProgressNotFound(owner))
    }

    async fn create(&self, initial: PlayerProgress) -> Result<PlayerProgress, DbError> {
        let mut records = self.records.write().await;
        if records.contains_key(&initial.owner) {
            return Err(DbError::AlreadyExists(initial.owner));
        }
        let stored = PlayerProgress {
            version: 0,
            ..initial
        };
        records.insert(stored.owner, stored.clone());
        debug!(owner = %stored.owner, "progress record stored");
        Ok(stored)
    }

    async fn update(
        &self,
        expected_version: u64,
        progress: PlayerProgress,
    ) -> Result<PlayerProgress, DbError> {
        let mut records = self.records.write().await;
        let owner = progress.owner;
        let current = records
            .get_mut(&owner)
            .ok_or(DbError::ProgressNotFound(owner))?;

        if current.version != expected_version {
            warn!(
                owner = %owner,
                expected = expected_version,
                actual = current.version,
                "progress update conflict"
            );
            return Err(DbError::ConcurrencyConflict {
                owner,
                expected: expected_version,
                actual: current.version,
            });
        }

        *current = PlayerProgress {
            version: expected_version.saturating_add(1),
            ..progress
        };
        debug!(owner = %owner, version = current.version, "progress record updated");
        Ok(current.clone())
    }
}
