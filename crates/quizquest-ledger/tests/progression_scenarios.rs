//! End-to-end progression scenarios for the ledger.
//!
//! Each test drives [`ProgressionLedger::apply_level_completion`] over a
//! sequence of sequential snapshots, the way a store-backed caller would.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use chrono::NaiveDate;
use quizquest_content::{CatalogParts, ContentCatalog, create_starting_catalog};
use quizquest_core::{BadgeRuleSet, LevelCurve, ReplayPolicy};
use quizquest_ledger::{CompletionOutcome, ProgressionLedger};
use quizquest_types::{
    Avatar, Badge, BadgeId, Level, LevelId, PlayerId, PlayerProgress, Question, World, WorldId,
};
use rust_decimal::Decimal;

// =============================================================================
// Fixtures
// =============================================================================

fn question(n: usize) -> Question {
    Question {
        prompt: format!("Question {n}"),
        options: vec!["right".to_owned(), "wrong".to_owned()],
        correct_index: 0,
        hint: None,
    }
}

fn level(id: &str, world: &str, questions: usize, xp_reward: u64) -> Level {
    Level {
        id: LevelId::from(id),
        world_id: WorldId::from(world),
        name: id.to_uppercase(),
        xp_reward,
        questions: (0..questions).map(question).collect(),
    }
}

fn badge(id: &str) -> Badge {
    Badge {
        id: BadgeId::from(id),
        name: id.to_owned(),
        description: String::new(),
        emoji: "🏅".to_owned(),
    }
}

/// Two small worlds with the rewards the scenarios need.
fn scenario_catalog() -> ContentCatalog {
    let levels = vec![
        level("a", "w1", 4, 100),
        level("b", "w1", 5, 50),
        level("c", "w2", 2, 40),
        level("empty", "w2", 0, 80),
    ];
    let worlds = vec![
        World {
            id: WorldId::from("w1"),
            name: "First".to_owned(),
            emoji: "1️⃣".to_owned(),
            description: String::new(),
            levels: vec![LevelId::from("a"), LevelId::from("b")],
        },
        World {
            id: WorldId::from("w2"),
            name: "Second".to_owned(),
            emoji: "2️⃣".to_owned(),
            description: String::new(),
            levels: vec![LevelId::from("c"), LevelId::from("empty")],
        },
    ];
    let badges = [
        "first_step",
        "perfect",
        "xp_100",
        "xp_500",
        "world_1_done",
        "world_2_done",
    ]
    .into_iter()
    .map(badge)
    .collect();
    let avatars = vec![Avatar {
        id: 0,
        emoji: "🦊".to_owned(),
        name: "Fox".to_owned(),
    }];

    ContentCatalog::from_parts(CatalogParts {
        worlds,
        levels,
        badges,
        avatars,
    })
    .expect("scenario catalog is valid")
}

fn ledger_for(catalog: ContentCatalog, policy: ReplayPolicy) -> ProgressionLedger {
    let rules = BadgeRuleSet::standard(&catalog).expect("standard badges present");
    ProgressionLedger::new(Arc::new(catalog), LevelCurve::standard(), rules, policy)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 2).unwrap()
}

fn fresh(ledger: &ProgressionLedger) -> PlayerProgress {
    ledger
        .create_progress(PlayerId::new(), 0, "Scenario")
        .unwrap()
}

fn complete(
    ledger: &ProgressionLedger,
    progress: &PlayerProgress,
    level: &str,
    answers: &[bool],
) -> CompletionOutcome {
    ledger
        .apply_level_completion(progress, &LevelId::from(level), answers, today())
        .unwrap()
}

fn badge_keys(outcome: &CompletionOutcome) -> Vec<String> {
    outcome
        .new_badges
        .iter()
        .map(|b| b.id.to_string())
        .collect()
}

// =============================================================================
// Named scenarios
// =============================================================================

#[test]
fn scenario_a_perfect_first_completion() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let outcome = complete(&ledger, &fresh(&ledger), "a", &[true; 4]);

    assert_eq!(outcome.score.xp_earned, 100);
    assert!(outcome.score.perfect);
    assert_eq!(outcome.score.stars, 3);
    assert_eq!(badge_keys(&outcome), vec!["first_step", "perfect", "xp_100"]);
    assert_eq!(outcome.progress.player_level, 2);
    assert!(outcome.levelled_up());
}

#[test]
fn scenario_b_partial_score_rounds() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let outcome = complete(&ledger, &fresh(&ledger), "b", &[true, false, true, false, true]);

    assert_eq!(outcome.score.percentage, Decimal::new(6, 1));
    assert_eq!(outcome.score.xp_earned, 30);
    assert!(!outcome.score.perfect);
    assert_eq!(outcome.progress.xp, 30);
}

#[test]
fn scenario_c_xp_500_without_xp_100_again() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let mut before = fresh(&ledger);
    before.xp = 470;
    before.player_level = ledger.curve().player_level(470);
    before.completed_levels.insert(LevelId::from("a"));
    before.completed_levels.insert(LevelId::from("b"));
    before.badges.insert(BadgeId::from("first_step"));
    before.badges.insert(BadgeId::from("xp_100"));

    let outcome = complete(&ledger, &before, "c", &[true, true]);

    assert_eq!(outcome.xp_credited, 40);
    assert_eq!(outcome.progress.xp, 510);
    assert!(badge_keys(&outcome).contains(&"xp_500".to_owned()));
    assert!(!badge_keys(&outcome).contains(&"xp_100".to_owned()));
}

#[test]
fn scenario_d_world_completion_badge() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let first = complete(&ledger, &fresh(&ledger), "a", &[true, true, true, false]);
    assert!(!badge_keys(&first).contains(&"world_1_done".to_owned()));

    let second = complete(&ledger, &first.progress, "b", &[false; 5]);
    assert_eq!(badge_keys(&second), vec!["world_1_done"]);
}

#[test]
fn empty_level_scores_zero_but_completes() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let outcome = complete(&ledger, &fresh(&ledger), "empty", &[]);

    assert_eq!(outcome.score.percentage, Decimal::ZERO);
    assert_eq!(outcome.xp_credited, 0);
    assert!(!outcome.score.perfect);
    assert!(outcome.progress.has_completed(&LevelId::from("empty")));
    assert_eq!(badge_keys(&outcome), vec!["first_step"]);
}

// =============================================================================
// Properties over sequences
// =============================================================================

#[test]
fn full_playthrough_is_monotonic() {
    let catalog = create_starting_catalog().unwrap();
    let order: Vec<(LevelId, usize)> = catalog
        .worlds()
        .iter()
        .flat_map(|w| w.levels.iter())
        .map(|id| (id.clone(), catalog.level(id).unwrap().question_count()))
        .collect();
    let ledger = ledger_for(catalog, ReplayPolicy::Full);

    let mut progress = fresh(&ledger);
    // Play every level, replaying every third one.
    for (step, (level_id, questions)) in order.iter().enumerate() {
        let rounds = if step % 3 == 0 { 2 } else { 1 };
        for round in 0..rounds {
            let answers: Vec<bool> = (0..*questions).map(|q| (q + step + round) % 4 != 0).collect();
            let outcome = ledger
                .apply_level_completion(&progress, level_id, &answers, today())
                .unwrap();
            let next = outcome.progress;

            assert!(next.xp >= progress.xp);
            assert!(next.completed_levels.is_superset(&progress.completed_levels));
            assert!(next.badges.is_superset(&progress.badges));
            assert_eq!(next.player_level, ledger.curve().player_level(next.xp));
            assert!(next.player_level >= progress.player_level);
            for badge in &outcome.new_badges {
                assert!(!progress.badges.contains(&badge.id));
            }
            progress = next;
        }
    }

    assert_eq!(progress.completed_levels.len(), 12);
    for n in 1..=4 {
        assert!(progress.owns_badge(&BadgeId::new(format!("world_{n}_done"))));
    }
}

#[test]
fn owned_badges_are_never_reawarded() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let first = complete(&ledger, &fresh(&ledger), "a", &[true; 4]);
    let second = complete(&ledger, &first.progress, "a", &[true; 4]);

    assert!(second.replay);
    assert!(second.new_badges.is_empty());
    assert_eq!(second.progress.badges, first.progress.badges);
    assert_eq!(second.progress.completed_levels, first.progress.completed_levels);
}

#[test]
fn replay_policies_scale_replay_xp() {
    let cases = [
        (ReplayPolicy::Full, 200),
        (ReplayPolicy::NoReward, 100),
        (ReplayPolicy::Reduced { percent: 25 }, 125),
    ];
    for (policy, expected_xp) in cases {
        let ledger = ledger_for(scenario_catalog(), policy);
        let first = complete(&ledger, &fresh(&ledger), "a", &[true; 4]);
        let second = complete(&ledger, &first.progress, "a", &[true; 4]);
        assert_eq!(second.progress.xp, expected_xp, "policy {policy:?}");
    }
}

#[test]
fn progress_record_round_trips_through_json() {
    let ledger = ledger_for(scenario_catalog(), ReplayPolicy::Full);
    let outcome = complete(&ledger, &fresh(&ledger), "a", &[true; 4]);

    let json = serde_json::to_string(&outcome.progress).unwrap();
    let back: PlayerProgress = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome.progress);
}
