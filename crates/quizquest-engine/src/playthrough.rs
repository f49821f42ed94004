//! Scripted playthrough.
//!
//! Registers a demo player, then repeatedly opens the map and plays the
//! first playable level until every level is completed. Choices are drawn
//! from a seeded RNG so a run is reproducible: each question gets its
//! correct option with probability `accuracy_percent`, otherwise one of the
//! wrong ones. The first level is replayed once at the end to exercise the
//! replay policy.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use quizquest_core::{PlaythroughConfig, percent_display};
use quizquest_db::{CompletionService, ProgressStore};
use quizquest_types::{LevelId, LevelState, MapView, PlayerId, ProfileSummary, Question};

use crate::error::EngineError;

/// What a finished playthrough achieved.
#[derive(Debug, Clone)]
pub struct PlaythroughReport {
    /// The demo player.
    pub owner: PlayerId,
    /// Completions applied, replays included.
    pub completions: u32,
    /// Final profile.
    pub profile: ProfileSummary,
}

/// Play every level of the catalog in unlock order.
///
/// # Errors
///
/// Returns [`EngineError::Store`] if registration or a completion fails and
/// [`EngineError::Playthrough`] if the map offers no playable level before
/// every level is completed.
pub async fn run_playthrough<S: ProgressStore>(
    service: &CompletionService<S>,
    config: &PlaythroughConfig,
    today: NaiveDate,
) -> Result<PlaythroughReport, EngineError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let owner = PlayerId::new();
    let created = service
        .register(owner, config.avatar_id, &config.username)
        .await?;
    info!(owner = %owner, username = %created.username, "demo player registered");

    let total_levels = service.ledger().catalog().total_levels();
    let mut completions: u32 = 0;
    let mut first_played: Option<LevelId> = None;

    for _ in 0..total_levels {
        let map = service.map(owner).await?;
        let Some(level_id) = next_playable(&map) else {
            return Err(EngineError::Playthrough {
                message: "no playable level left before finishing the catalog".to_owned(),
            });
        };
        play(service, owner, &level_id, config, &mut rng, today).await?;
        completions = completions.saturating_add(1);
        first_played.get_or_insert(level_id);
    }

    if let Some(level_id) = first_played {
        let map = service.map(owner).await?;
        if !level_state(&map, &level_id).is_some_and(LevelState::is_playable) {
            return Err(EngineError::Playthrough {
                message: format!("level {level_id} is not open for a replay"),
            });
        }
        play(service, owner, &level_id, config, &mut rng, today).await?;
        completions = completions.saturating_add(1);
    }

    let profile = service.profile(owner).await?;
    Ok(PlaythroughReport {
        owner,
        completions,
        profile,
    })
}

/// The first level on the map that is playable and not yet completed.
fn next_playable(map: &MapView) -> Option<LevelId> {
    map.worlds
        .iter()
        .flat_map(|world| world.levels.iter())
        .find(|level| level.state == LevelState::Playable)
        .map(|level| level.level_id.clone())
}

/// Map state of `level_id`, if the map lists it.
fn level_state(map: &MapView, level_id: &LevelId) -> Option<LevelState> {
    map.worlds
        .iter()
        .flat_map(|world| world.levels.iter())
        .find(|level| level.level_id == *level_id)
        .map(|level| level.state)
}

async fn play<S: ProgressStore>(
    service: &CompletionService<S>,
    owner: PlayerId,
    level_id: &LevelId,
    config: &PlaythroughConfig,
    rng: &mut StdRng,
    today: NaiveDate,
) -> Result<(), EngineError> {
    let level = service.ledger().catalog().level(level_id)?;
    let answers = scripted_answers(rng, &level.questions, config.accuracy_percent);

    let outcome = service
        .complete_level(owner, level_id, &answers, today)
        .await?;
    info!(
        level = %level_id,
        percent = percent_display(&outcome.score),
        stars = outcome.score.stars,
        xp_credited = outcome.xp_credited,
        xp = outcome.progress.xp,
        player_level = outcome.new_level,
        replay = outcome.replay,
        "level played"
    );
    for badge in &outcome.new_badges {
        info!(badge = %badge.name, emoji = %badge.emoji, "badge unlocked");
    }
    Ok(())
}

/// Pick one option per question and report whether each pick is correct.
fn scripted_answers(
    rng: &mut impl Rng,
    questions: &[Question],
    accuracy_percent: u32,
) -> Vec<bool> {
    questions
        .iter()
        .map(|question| question.is_correct(pick_option(rng, question, accuracy_percent)))
        .collect()
}

/// The correct option with `accuracy_percent` chance, else a wrong one.
///
/// A question with a single option can only be answered correctly.
fn pick_option(rng: &mut impl Rng, question: &Question, accuracy_percent: u32) -> u32 {
    let options = u32::try_from(question.options.len()).unwrap_or(u32::MAX);
    if options < 2 || rng.random_range(0..100_u32) < accuracy_percent {
        return question.correct_index;
    }
    let offset = rng.random_range(1..options);
    question
        .correct_index
        .checked_add(offset)
        .and_then(|choice| choice.checked_rem(options))
        .unwrap_or(question.correct_index)
}
