//! Level evaluator: scores one level attempt.
//!
//! Input is one boolean per question ("the player picked the correct
//! option") plus the level's XP reward. The evaluator is stateless and never
//! touches a progress record.
//!
//! # Rounding
//!
//! `xp_earned = round(xp_reward * correct / total)` with ties rounded half
//! up (equivalently, away from zero: every value here is non-negative). The
//! product is computed in exact integer arithmetic, so `50 * 3/5` is exactly
//! `30` and `5 * 1/2` is exactly `3`. The displayed `percentage` is a
//! [`Decimal`] and is never used to derive XP.

use quizquest_types::{Level, LevelScore};
use rust_decimal::Decimal;

use crate::config::ReplayPolicy;
use crate::error::CoreError;

/// Whole-number percent at or above which a run earns two stars.
const TWO_STAR_PERCENT: u32 = 75;

/// Whole-number percent at or above which a run earns one star.
const ONE_STAR_PERCENT: u32 = 50;

/// Score a level attempt after checking that every question was answered.
///
/// # Errors
///
/// Returns [`CoreError::AnswerCountMismatch`] if `answers` does not have
/// exactly one entry per question.
pub fn score_level(level: &Level, answers: &[bool]) -> Result<LevelScore, CoreError> {
    let expected = level.question_count();
    if answers.len() != expected {
        return Err(CoreError::AnswerCountMismatch {
            level: level.id.clone(),
            expected,
            actual: answers.len(),
        });
    }
    Ok(evaluate(level.xp_reward, answers))
}

/// Score a sequence of answer correctness signals against an XP reward.
///
/// An empty sequence scores zero percent and zero XP.
pub fn evaluate(xp_reward: u64, answers: &[bool]) -> LevelScore {
    let total = answers.len();
    let correct = answers.iter().filter(|answer| **answer).count();

    let percentage = ratio(correct, total);
    let xp_earned = rounded_share(xp_reward, correct, total);
    let perfect = total > 0 && correct == total;
    let percent = whole_percent(correct, total);

    LevelScore {
        correct_count: saturating_u32(correct),
        total_count: saturating_u32(total),
        percentage,
        xp_earned,
        perfect,
        stars: stars_for(percent),
    }
}

/// The score as a whole-number percent, rounded half up (`2/3` is `67`).
pub fn percent_display(score: &LevelScore) -> u32 {
    whole_percent(
        usize::try_from(score.correct_count).unwrap_or(usize::MAX),
        usize::try_from(score.total_count).unwrap_or(usize::MAX),
    )
}

/// XP actually credited for a completion under the replay policy.
///
/// First completions always earn the full scored XP.
pub fn credited_xp(score: &LevelScore, is_replay: bool, policy: ReplayPolicy) -> u64 {
    if !is_replay {
        return score.xp_earned;
    }
    match policy {
        ReplayPolicy::Full => score.xp_earned,
        ReplayPolicy::NoReward => 0,
        ReplayPolicy::Reduced { percent } => rounded_share(
            score.xp_earned,
            usize::try_from(percent.min(100)).unwrap_or(100),
            100,
        ),
    }
}

/// Star rating from a whole-number percent: 3 at 100, 2 at 75+, 1 at 50+.
const fn stars_for(percent: u32) -> u8 {
    if percent >= 100 {
        3
    } else if percent >= TWO_STAR_PERCENT {
        2
    } else if percent >= ONE_STAR_PERCENT {
        1
    } else {
        0
    }
}

/// `numerator / denominator` as a [`Decimal`], zero for an empty level.
fn ratio(numerator: usize, denominator: usize) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .unwrap_or(Decimal::ZERO)
}

/// `round(amount * numerator / denominator)`, ties rounded up.
///
/// Uses `floor((2 * amount * numerator + denominator) / (2 * denominator))`
/// in `u128`, which cannot overflow for `u64` amounts and `usize` counts
/// that fit in `u64`.
fn rounded_share(amount: u64, numerator: usize, denominator: usize) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let amount = u128::from(amount);
    let numerator = u128::try_from(numerator).unwrap_or(u128::MAX);
    let denominator = u128::try_from(denominator).unwrap_or(u128::MAX);

    let share = amount
        .checked_mul(numerator)
        .and_then(|v| v.checked_mul(2))
        .and_then(|v| v.checked_add(denominator))
        .zip(denominator.checked_mul(2))
        .and_then(|(n, d)| n.checked_div(d));

    share
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(u64::MAX)
}

/// `correct / total` as a whole-number percent, rounded half up.
fn whole_percent(correct: usize, total: usize) -> u32 {
    u32::try_from(rounded_share(100, correct, total)).unwrap_or(u32::MAX)
}

/// Narrow a count to `u32`, saturating.
fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
