//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::WorldId;

// ---------------------------------------------------------------------------
// Badge rules
// ---------------------------------------------------------------------------

/// A named award predicate attached to a badge.
///
/// Rules are evaluated once per level completion against the state before
/// the completion and the candidate state after it. A rule never fires for
/// a badge the player already owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BadgeRule {
    /// Fires on any completion, regardless of score.
    FirstCompletion,
    /// Fires when the completed level was answered without a mistake.
    PerfectScore,
    /// Fires when candidate XP reaches `value`.
    XpThreshold {
        /// Minimum candidate XP.
        value: u64,
    },
    /// Fires when every level of `world_id` is in the candidate set and the
    /// completed level belongs to that world.
    WorldComplete {
        /// The world that must be fully completed.
        world_id: WorldId,
    },
}

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

/// Playability of a single level on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LevelState {
    /// The world is locked or the previous level is not completed.
    Locked,
    /// The level can be started and has not been completed yet.
    Playable,
    /// The level is completed. Completed levels stay replayable.
    Completed,
}

impl LevelState {
    /// Whether a player may start this level.
    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Playable | Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Coarse error classification shared by every crate in the workspace.
///
/// Lets callers route failures without matching on each crate's error enum:
/// `NotFound` for a level sends the player back to the map, `NotFound` for a
/// progress record sends them to onboarding, `ConcurrencyConflict` means
/// re-fetch and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ErrorKind {
    /// An identifier could not be resolved.
    NotFound,
    /// Caller-supplied input is malformed.
    InvalidInput,
    /// An optimistic update lost a race with another writer.
    ConcurrencyConflict,
    /// Anything else (storage failure, broken invariant, bad config).
    Internal,
}

impl ErrorKind {
    /// Stable label for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::ConcurrencyConflict => "concurrency_conflict",
            Self::Internal => "internal",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn badge_rule_uses_kind_tag() {
        let rule = BadgeRule::XpThreshold { value: 500 };
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"kind":"xp_threshold","value":500}"#);
    }

    #[test]
    fn world_rule_roundtrip() {
        let json = r#"{"kind":"world_complete","world_id":"w2"}"#;
        let rule: BadgeRule = serde_json::from_str(json).unwrap();
        assert_eq!(
            rule,
            BadgeRule::WorldComplete {
                world_id: WorldId::from("w2")
            }
        );
    }

    #[test]
    fn completed_levels_stay_playable() {
        assert!(LevelState::Completed.is_playable());
        assert!(LevelState::Playable.is_playable());
        assert!(!LevelState::Locked.is_playable());
    }
}
