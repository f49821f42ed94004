//! Badge rule engine.
//!
//! An ordered list of named predicates, each keyed by the badge it awards.
//! The engine runs once per level completion against the state before the
//! completion and the candidate state after it, and returns the badges that
//! are newly earned. It never mutates a progress record; the ledger applies
//! the delta.
//!
//! Standard order:
//!
//! 1. `first_step` on any completion
//! 2. `perfect` when the completed level scored 100%
//! 3. `xp_100` when candidate XP reaches 100
//! 4. `xp_500` when candidate XP reaches 500
//! 5. `world_<N>_done` per world (1-based catalog position) once every level
//!    of that world is completed

use std::collections::BTreeSet;

use quizquest_content::{ContentCatalog, ContentError};
use quizquest_types::{
    Badge, BadgeId, BadgeRule, Level, LevelId, LevelScore, PlayerProgress, World,
};
use tracing::debug;

use crate::unlock::world_complete;

// ---------------------------------------------------------------------------
// Standard badge keys and thresholds
// ---------------------------------------------------------------------------

/// Awarded on the first completion of any level.
pub const FIRST_STEP: &str = "first_step";

/// Awarded for a level answered without a mistake.
pub const PERFECT: &str = "perfect";

/// Awarded at [`XP_100_THRESHOLD`] XP.
pub const XP_100: &str = "xp_100";

/// Awarded at [`XP_500_THRESHOLD`] XP.
pub const XP_500: &str = "xp_500";

/// XP needed for [`XP_100`].
pub const XP_100_THRESHOLD: u64 = 100;

/// XP needed for [`XP_500`].
pub const XP_500_THRESHOLD: u64 = 500;

/// Badge key for completing the world at 1-based catalog `position`.
pub fn world_done_badge(position: usize) -> BadgeId {
    BadgeId::new(format!("world_{position}_done"))
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// A rule paired with the badge it awards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRule {
    /// Badge awarded when the rule fires.
    pub badge: BadgeId,
    /// The award predicate.
    pub rule: BadgeRule,
}

impl NamedRule {
    /// Pair a badge key with a rule.
    pub fn new(badge: impl Into<BadgeId>, rule: BadgeRule) -> Self {
        Self {
            badge: badge.into(),
            rule,
        }
    }
}

/// Everything a rule may look at for one completion.
#[derive(Debug, Clone, Copy)]
pub struct BadgeContext<'a> {
    /// Progress before the completion is applied.
    pub before: &'a PlayerProgress,
    /// XP after the completion is applied.
    pub candidate_xp: u64,
    /// Completed levels after the completion is applied.
    pub candidate_completed: &'a BTreeSet<LevelId>,
    /// The level just completed.
    pub level: &'a Level,
    /// The world owning `level`.
    pub world: &'a World,
    /// Score of this attempt.
    pub score: &'a LevelScore,
}

/// Validated, ordered badge rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeRuleSet {
    rules: Vec<NamedRule>,
}

impl BadgeRuleSet {
    /// The standard rule set for `catalog`: one `world_<N>_done` rule per
    /// world after the four fixed rules.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::BadgeNotFound`] if the catalog lacks one of
    /// the standard badges.
    pub fn standard(catalog: &ContentCatalog) -> Result<Self, ContentError> {
        let mut rules = vec![
            NamedRule::new(FIRST_STEP, BadgeRule::FirstCompletion),
            NamedRule::new(PERFECT, BadgeRule::PerfectScore),
            NamedRule::new(
                XP_100,
                BadgeRule::XpThreshold {
                    value: XP_100_THRESHOLD,
                },
            ),
            NamedRule::new(
                XP_500,
                BadgeRule::XpThreshold {
                    value: XP_500_THRESHOLD,
                },
            ),
        ];
        rules.extend(catalog.worlds().iter().enumerate().map(|(index, world)| {
            NamedRule {
                badge: world_done_badge(index.saturating_add(1)),
                rule: BadgeRule::WorldComplete {
                    world_id: world.id.clone(),
                },
            }
        }));
        Self::with_rules(catalog, rules)
    }

    /// A custom rule set, evaluated in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::BadgeNotFound`] or
    /// [`ContentError::WorldNotFound`] for references the catalog cannot
    /// resolve, and [`ContentError::DuplicateBadge`] if two rules award the
    /// same badge.
    pub fn with_rules(catalog: &ContentCatalog, rules: Vec<NamedRule>) -> Result<Self, ContentError> {
        let mut seen = BTreeSet::new();
        for named in &rules {
            catalog.badge(&named.badge)?;
            if let BadgeRule::WorldComplete { world_id } = &named.rule {
                catalog.world(world_id)?;
            }
            if !seen.insert(named.badge.clone()) {
                return Err(ContentError::DuplicateBadge(named.badge.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[NamedRule] {
        &self.rules
    }

    /// Badges newly earned by this completion, in rule order.
    ///
    /// Badges already owned before the completion are never returned.
    pub fn evaluate(&self, ctx: &BadgeContext<'_>) -> Vec<BadgeId> {
        let mut earned = Vec::new();
        for named in &self.rules {
            if ctx.before.owns_badge(&named.badge) {
                continue;
            }
            if rule_fires(&named.rule, ctx) {
                debug!(
                    badge = %named.badge,
                    rule = rule_name(&named.rule),
                    level = %ctx.level.id,
                    "badge rule fired"
                );
                earned.push(named.badge.clone());
            }
        }
        earned
    }
}

/// Resolve badge keys to display records.
///
/// # Errors
///
/// Returns [`ContentError::BadgeNotFound`] for a key missing from the
/// catalog.
pub fn resolve_badges(catalog: &ContentCatalog, ids: &[BadgeId]) -> Result<Vec<Badge>, ContentError> {
    ids.iter()
        .map(|id| catalog.badge(id).cloned())
        .collect()
}

fn rule_fires(rule: &BadgeRule, ctx: &BadgeContext<'_>) -> bool {
    match rule {
        BadgeRule::FirstCompletion => true,
        BadgeRule::PerfectScore => ctx.score.perfect,
        BadgeRule::XpThreshold { value } => ctx.candidate_xp >= *value,
        BadgeRule::WorldComplete { world_id } => {
            ctx.world.id == *world_id && world_complete(ctx.world, ctx.candidate_completed)
        }
    }
}

const fn rule_name(rule: &BadgeRule) -> &'static str {
    match rule {
        BadgeRule::FirstCompletion => "first_completion",
        BadgeRule::PerfectScore => "perfect_score",
        BadgeRule::XpThreshold { .. } => "xp_threshold",
        BadgeRule::WorldComplete { .. } => "world_complete",
    }
}
