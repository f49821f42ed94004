//! Progress invariant verification.
//!
//! For any record the ledger produces, relative to the record it was
//! derived from:
//!
//! ```text
//! after.xp >= before.xp
//! before.completed_levels ⊆ after.completed_levels
//! before.badges ⊆ after.badges
//! after.badges ⊆ catalog badges, after.completed_levels ⊆ catalog levels
//! after.player_level == curve(after.xp)
//! after.id == before.id, after.owner == before.owner
//! ```
//!
//! Sets cannot hold duplicates by construction. The ledger builds every
//! record so that these hold; the check guards against corrupt snapshots
//! and future bugs.

use std::fmt;

use quizquest_content::ContentCatalog;
use quizquest_core::LevelCurve;
use quizquest_types::{BadgeId, LevelId, PlayerProgress};

/// Result of checking one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionCheck {
    /// Every invariant holds.
    Valid,
    /// One or more invariants are broken.
    Violated(Vec<InvariantViolation>),
}

impl TransitionCheck {
    /// Whether every invariant holds.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// XP went down.
    XpDecreased {
        /// XP before.
        before: u64,
        /// XP after.
        after: u64,
    },
    /// A completed level disappeared.
    CompletedLevelRemoved(LevelId),
    /// An owned badge disappeared.
    BadgeRemoved(BadgeId),
    /// The record owns a badge the catalog does not know.
    UnknownBadge(BadgeId),
    /// The record lists a completed level the catalog does not know.
    UnknownLevel(LevelId),
    /// The stored player level disagrees with the curve.
    LevelMismatch {
        /// Level stored on the record.
        stored: u64,
        /// Level derived from the record's XP.
        derived: u64,
    },
    /// The record changed hands or identity.
    IdentityChanged,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XpDecreased { before, after } => {
                write!(f, "xp decreased from {before} to {after}")
            }
            Self::CompletedLevelRemoved(id) => write!(f, "completed level {id} removed"),
            Self::BadgeRemoved(id) => write!(f, "badge {id} removed"),
            Self::UnknownBadge(id) => write!(f, "unknown badge {id}"),
            Self::UnknownLevel(id) => write!(f, "unknown level {id}"),
            Self::LevelMismatch { stored, derived } => {
                write!(f, "stored player level {stored} but xp gives {derived}")
            }
            Self::IdentityChanged => write!(f, "record id or owner changed"),
        }
    }
}

/// Check a standalone record against the catalog and curve.
pub fn verify_record(
    progress: &PlayerProgress,
    catalog: &ContentCatalog,
    curve: &LevelCurve,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    violations.extend(
        progress
            .badges
            .iter()
            .filter(|id| !catalog.has_badge(id))
            .cloned()
            .map(InvariantViolation::UnknownBadge),
    );
    violations.extend(
        progress
            .completed_levels
            .iter()
            .filter(|id| catalog.level(id).is_err())
            .cloned()
            .map(InvariantViolation::UnknownLevel),
    );

    let derived = curve.player_level(progress.xp);
    if progress.player_level != derived {
        violations.push(InvariantViolation::LevelMismatch {
            stored: progress.player_level,
            derived,
        });
    }

    violations
}

/// Check that `after` is a legal successor of `before`.
pub fn verify_transition(
    before: &PlayerProgress,
    after: &PlayerProgress,
    catalog: &ContentCatalog,
    curve: &LevelCurve,
) -> TransitionCheck {
    let mut violations = Vec::new();

    if after.id != before.id || after.owner != before.owner {
        violations.push(InvariantViolation::IdentityChanged);
    }
    if after.xp < before.xp {
        violations.push(InvariantViolation::XpDecreased {
            before: before.xp,
            after: after.xp,
        });
    }
    violations.extend(
        before
            .completed_levels
            .difference(&after.completed_levels)
            .cloned()
            .map(InvariantViolation::CompletedLevelRemoved),
    );
    violations.extend(
        before
            .badges
            .difference(&after.badges)
            .cloned()
            .map(InvariantViolation::BadgeRemoved),
    );
    violations.extend(verify_record(after, catalog, curve));

    if violations.is_empty() {
        TransitionCheck::Valid
    } else {
        TransitionCheck::Violated(violations)
    }
}
