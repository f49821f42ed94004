//! Store-backed progression against the in-memory store.
//!
//! Covers the optimistic concurrency path: a writer that loses the race
//! re-reads and retries, and the retry budget is honored.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDate;
use quizquest_content::create_starting_catalog;
use quizquest_core::ProgressionConfig;
use quizquest_db::{CompletionService, DbError, MemoryProgressStore, ProgressStore};
use quizquest_ledger::ProgressionLedger;
use quizquest_types::{ErrorKind, LevelId, PlayerId, PlayerProgress};

// =============================================================================
// Helpers
// =============================================================================

fn ledger() -> ProgressionLedger {
    let catalog = Arc::new(create_starting_catalog().unwrap());
    ProgressionLedger::from_config(catalog, &ProgressionConfig::default()).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Memory store that lets another "session" write first on the next
/// `conflicts` updates, by bumping the stored record just before the
/// caller's conditional write lands.
struct RacingStore {
    inner: MemoryProgressStore,
    conflicts: AtomicU32,
    updates: AtomicU32,
}

impl RacingStore {
    fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryProgressStore::new(),
            conflicts: AtomicU32::new(conflicts),
            updates: AtomicU32::new(0),
        }
    }
}

impl ProgressStore for RacingStore {
    async fn get(&self, owner: PlayerId) -> Result<PlayerProgress, DbError> {
        self.inner.get(owner).await
    }

    async fn create(&self, initial: PlayerProgress) -> Result<PlayerProgress, DbError> {
        self.inner.create(initial).await
    }

    async fn update(
        &self,
        expected_version: u64,
        progress: PlayerProgress,
    ) -> Result<PlayerProgress, DbError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            // The other session re-saves the current record unchanged.
            let current = self.inner.get(progress.owner).await?;
            self.inner.update(current.version, current).await?;
        }
        self.inner.update(expected_version, progress).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn register_complete_and_read_back() {
    let service = CompletionService::new(MemoryProgressStore::new(), ledger(), 3);
    let owner = PlayerId::new();
    service.register(owner, 2, "  Noa  ").await.unwrap();

    let outcome = service
        .complete_level(owner, &LevelId::from("l1_1"), &[true; 4], today())
        .await
        .unwrap();
    assert_eq!(outcome.progress.version, 1);
    assert_eq!(outcome.progress.xp, 50);

    let stored = service.store().get(owner).await.unwrap();
    assert_eq!(stored, outcome.progress);
    assert_eq!(stored.username, "Noa");

    let profile = service.profile(owner).await.unwrap();
    assert_eq!(profile.xp, 50);
    assert_eq!(profile.earned_badges.len(), 2);

    let map = service.map(owner).await.unwrap();
    assert_eq!(map.worlds[0].completed_count, 1);
}

#[tokio::test]
async fn unknown_player_routes_to_onboarding() {
    let service = CompletionService::new(MemoryProgressStore::new(), ledger(), 3);
    let result = service
        .complete_level(PlayerId::new(), &LevelId::from("l1_1"), &[true; 4], today())
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn conflict_is_retried_with_fresh_snapshot() {
    let service = CompletionService::new(RacingStore::new(2), ledger(), 3);
    let owner = PlayerId::new();
    service.register(owner, 0, "Racer").await.unwrap();

    let outcome = service
        .complete_level(owner, &LevelId::from("l1_1"), &[true; 4], today())
        .await
        .unwrap();

    // Two racing writes plus our final successful one.
    assert_eq!(outcome.progress.version, 3);
    assert_eq!(outcome.progress.xp, 50);
    assert_eq!(service.store().updates.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_budget_is_honored() {
    let service = CompletionService::new(RacingStore::new(5), ledger(), 2);
    let owner = PlayerId::new();
    service.register(owner, 0, "Racer").await.unwrap();

    let result = service
        .complete_level(owner, &LevelId::from("l1_1"), &[true; 4], today())
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DbError::ConcurrencyConflict { .. }));
    assert_eq!(err.kind(), ErrorKind::ConcurrencyConflict);
    // First attempt plus two retries.
    assert_eq!(service.store().updates.load(Ordering::SeqCst), 3);
    assert_eq!(service.store().get(owner).await.unwrap().xp, 0);
}

#[tokio::test]
async fn invalid_input_is_not_retried() {
    let service = CompletionService::new(RacingStore::new(0), ledger(), 3);
    let owner = PlayerId::new();
    service.register(owner, 0, "Racer").await.unwrap();

    let result = service
        .complete_level(owner, &LevelId::from("l1_1"), &[true], today())
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(service.store().updates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_sessions_lose_no_xp() {
    let service = CompletionService::new(MemoryProgressStore::new(), ledger(), 10);
    let owner = PlayerId::new();
    service.register(owner, 0, "Twins").await.unwrap();

    let first = LevelId::from("l1_1");
    let second = LevelId::from("l1_2");
    let (a, b) = tokio::join!(
        service.complete_level(owner, &first, &[true; 4], today()),
        service.complete_level(owner, &second, &[true; 5], today()),
    );
    a.unwrap();
    b.unwrap();

    let stored = service.store().get(owner).await.unwrap();
    assert_eq!(stored.xp, 50 + 60);
    assert_eq!(stored.completed_levels.len(), 2);
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn edit_profile_keeps_progress() {
    let service = CompletionService::new(MemoryProgressStore::new(), ledger(), 3);
    let owner = PlayerId::new();
    service.register(owner, 0, "Noa").await.unwrap();
    service
        .complete_level(owner, &LevelId::from("l1_1"), &[true; 4], today())
        .await
        .unwrap();

    let edited = service
        .edit_profile(owner, Some(6), Some("Maya"))
        .await
        .unwrap();
    assert_eq!(edited.avatar_id, 6);
    assert_eq!(edited.username, "Maya");
    assert_eq!(edited.xp, 50);
    assert_eq!(edited.version, 2);

    let bad = service.edit_profile(owner, Some(404), None).await;
    assert_eq!(bad.unwrap_err().kind(), ErrorKind::NotFound);
}
