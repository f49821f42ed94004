//! Progression ledger for QuizQuest.
//!
//! The ledger is the only component that produces new [`PlayerProgress`]
//! values. Each operation is a pure transformation of the snapshot it is
//! given: it holds no state between calls and performs no I/O. Persisting
//! the returned record (and handling concurrent writers) is the caller's
//! job.
//!
//! # Architecture
//!
//! - [`ledger`] -- [`ProgressionLedger`] and level completion
//! - [`profile`] -- Record creation, profile edits, profile and map views
//! - [`invariants`] -- Transition checks run on every produced record
//!
//! # Atomicity
//!
//! A completion updates XP, completed levels, badges, the derived player
//! level and the last-played date as one value. Every produced record is
//! checked against the previous one with
//! [`invariants::verify_transition`]; a record that fails is never
//! returned, so an update is either fully applied or not at all.

pub mod invariants;
pub mod ledger;
pub mod profile;

pub use invariants::{InvariantViolation, TransitionCheck, verify_record, verify_transition};
pub use ledger::ProgressionLedger;
pub use profile::{DEFAULT_USERNAME, MAX_USERNAME_CHARS, normalize_username};

use quizquest_content::ContentError;
use quizquest_core::CoreError;
use quizquest_types::{Badge, ErrorKind, LevelScore, PlayerProgress};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when applying a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Scoring, configuration or profile validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A level, world, badge or avatar could not be resolved.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The produced record would break a progress invariant. Nothing was
    /// applied.
    #[error("progress invariant violated: {}", summarize(.violations))]
    InvariantViolated {
        /// Every violation found.
        violations: Vec<InvariantViolation>,
    },
}

impl LedgerError {
    /// Coarse classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Core(e) => e.kind(),
            Self::Content(e) => e.kind(),
            Self::InvariantViolated { .. } => ErrorKind::Internal,
        }
    }
}

fn summarize(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Completion outcome
// ---------------------------------------------------------------------------

/// Everything the completion screen needs after a level is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    /// The fully updated record, ready to persist.
    pub progress: PlayerProgress,
    /// Score of the attempt.
    pub score: LevelScore,
    /// XP actually added after the replay policy.
    pub xp_credited: u64,
    /// Newly earned badges as display records, in rule order.
    pub new_badges: Vec<Badge>,
    /// Whether the level had been completed before.
    pub replay: bool,
    /// Player level before the completion.
    pub previous_level: u64,
    /// Player level after the completion.
    pub new_level: u64,
}

impl CompletionOutcome {
    /// Whether the completion raised the player level.
    pub const fn levelled_up(&self) -> bool {
        self.new_level > self.previous_level
    }
}
