//! The [`ProgressionLedger`] and its level completion transform.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use quizquest_content::ContentCatalog;
use quizquest_core::{
    BadgeContext, BadgeRuleSet, LevelCurve, ProgressionConfig, ReplayPolicy, credited_xp,
    resolve_badges, score_level,
};
use quizquest_types::{LevelId, PlayerProgress};

use crate::invariants::{TransitionCheck, verify_transition};
use crate::{CompletionOutcome, LedgerError};

/// Applies progression events to player records.
///
/// Holds only immutable configuration: the catalog, the level curve, the
/// badge rules and the replay policy. Cheap to clone and share.
#[derive(Debug, Clone)]
pub struct ProgressionLedger {
    catalog: Arc<ContentCatalog>,
    curve: LevelCurve,
    rules: BadgeRuleSet,
    replay_policy: ReplayPolicy,
}

impl ProgressionLedger {
    /// Build a ledger from its parts.
    pub const fn new(
        catalog: Arc<ContentCatalog>,
        curve: LevelCurve,
        rules: BadgeRuleSet,
        replay_policy: ReplayPolicy,
    ) -> Self {
        Self {
            catalog,
            curve,
            rules,
            replay_policy,
        }
    }

    /// Build a ledger with the standard badge rules and the configured
    /// curve and replay policy.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Core`] for an invalid curve and
    /// [`LedgerError::Content`] if the catalog lacks a standard badge.
    pub fn from_config(
        catalog: Arc<ContentCatalog>,
        config: &ProgressionConfig,
    ) -> Result<Self, LedgerError> {
        let curve = LevelCurve::new(&config.curve)?;
        let rules = BadgeRuleSet::standard(&catalog)?;
        Ok(Self::new(catalog, curve, rules, config.rewards.replay_policy))
    }

    /// The catalog this ledger resolves against.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// The level curve.
    pub const fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// The badge rules.
    pub const fn rules(&self) -> &BadgeRuleSet {
        &self.rules
    }

    /// The replay policy.
    pub const fn replay_policy(&self) -> ReplayPolicy {
        self.replay_policy
    }

    /// Apply one level completion to a freshly read snapshot.
    ///
    /// Scores the answers, credits XP under the replay policy, marks the
    /// level completed, runs the badge rules against the before and
    /// candidate state, rederives the player level and stamps `today` as
    /// the last-played date. The returned record keeps the snapshot's
    /// `version`; bumping it is the store's job.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Content`] if the level or its world is unknown.
    /// - [`LedgerError::Core`] if `answers` does not have one entry per
    ///   question.
    /// - [`LedgerError::InvariantViolated`] if the produced record would
    ///   break a progress invariant (for example when the snapshot itself
    ///   is corrupt).
    pub fn apply_level_completion(
        &self,
        progress: &PlayerProgress,
        level_id: &LevelId,
        answers: &[bool],
        today: NaiveDate,
    ) -> Result<CompletionOutcome, LedgerError> {
        let level = self.catalog.level(level_id)?;
        let world = self.catalog.world_of(level_id)?;
        let score = score_level(level, answers)?;

        let replay = progress.has_completed(level_id);
        let xp_credited = credited_xp(&score, replay, self.replay_policy);
        let candidate_xp = progress.xp.saturating_add(xp_credited);
        let mut candidate_completed = progress.completed_levels.clone();
        candidate_completed.insert(level_id.clone());

        let earned = self.rules.evaluate(&BadgeContext {
            before: progress,
            candidate_xp,
            candidate_completed: &candidate_completed,
            level,
            world,
            score: &score,
        });
        let new_badges = resolve_badges(&self.catalog, &earned)?;

        let previous_level = self.curve.player_level(progress.xp);
        let new_level = self.curve.player_level(candidate_xp);

        let mut badges = progress.badges.clone();
        badges.extend(earned);

        let updated = PlayerProgress {
            xp: candidate_xp,
            player_level: new_level,
            completed_levels: candidate_completed,
            badges,
            last_played: Some(today),
            ..progress.clone()
        };

        if let TransitionCheck::Violated(violations) =
            verify_transition(progress, &updated, &self.catalog, &self.curve)
        {
            warn!(
                owner = %progress.owner,
                level = %level_id,
                violations = violations.len(),
                "refusing level completion that breaks progress invariants"
            );
            return Err(LedgerError::InvariantViolated { violations });
        }

        info!(
            owner = %progress.owner,
            level = %level_id,
            correct = score.correct_count,
            total = score.total_count,
            xp_credited,
            xp = updated.xp,
            replay,
            new_badges = new_badges.len(),
            "level completion applied"
        );
        if new_level > previous_level {
            info!(
                owner = %progress.owner,
                from = previous_level,
                to = new_level,
                "player levelled up"
            );
        }
        for badge in &new_badges {
            info!(owner = %progress.owner, badge = %badge.id, "badge earned");
        }

        Ok(CompletionOutcome {
            progress: updated,
            score,
            xp_credited,
            new_badges,
            replay,
            previous_level,
            new_level,
        })
    }
}
