//! Unlock policy: which worlds and levels a player may open.
//!
//! World `0` is always open. World `k > 0` opens once every level of world
//! `k - 1` is completed. Within an open world, a level is playable when it
//! is the first level or its predecessor is completed. Completed levels
//! stay playable so they can be replayed.
//!
//! Both predicates are pure functions of catalog structure and the
//! completion set, cheap enough to call on every map render.

use std::collections::BTreeSet;

use quizquest_content::{ContentCatalog, ContentError};
use quizquest_types::{LevelId, LevelState, LevelView, MapView, World, WorldView};

/// Read-only gate over a content catalog.
#[derive(Debug, Clone, Copy)]
pub struct UnlockPolicy<'a> {
    catalog: &'a ContentCatalog,
}

impl<'a> UnlockPolicy<'a> {
    /// Gate the given catalog.
    pub const fn new(catalog: &'a ContentCatalog) -> Self {
        Self { catalog }
    }

    /// Whether the world at `world_index` is open.
    ///
    /// Returns `false` for an index past the last world.
    pub fn is_world_unlocked(&self, world_index: usize, completed: &BTreeSet<LevelId>) -> bool {
        if world_index >= self.catalog.world_count() {
            return false;
        }
        let Some(previous_index) = world_index.checked_sub(1) else {
            return true;
        };
        self.catalog
            .world_at(previous_index)
            .is_ok_and(|previous| world_complete(previous, completed))
    }

    /// Whether the level at (`world_index`, `level_index`) may be played.
    ///
    /// Returns `false` for positions outside the catalog.
    pub fn is_level_playable(
        &self,
        world_index: usize,
        level_index: usize,
        completed: &BTreeSet<LevelId>,
    ) -> bool {
        let Ok(world) = self.catalog.world_at(world_index) else {
            return false;
        };
        let Some(level_id) = world.levels.get(level_index) else {
            return false;
        };
        if completed.contains(level_id) {
            return true;
        }
        if !self.is_world_unlocked(world_index, completed) {
            return false;
        }
        match level_index.checked_sub(1) {
            None => true,
            Some(previous) => world
                .levels
                .get(previous)
                .is_some_and(|id| completed.contains(id)),
        }
    }

    /// [`Self::is_level_playable`] addressed by level key.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::LevelNotFound`] if the level is not in the
    /// catalog.
    pub fn is_level_playable_by_id(
        &self,
        level_id: &LevelId,
        completed: &BTreeSet<LevelId>,
    ) -> Result<bool, ContentError> {
        let location = self.catalog.locate_level(level_id)?;
        Ok(self.is_level_playable(location.world_index, location.level_index, completed))
    }

    /// Map state of one level.
    pub fn level_state(
        &self,
        world_index: usize,
        level_index: usize,
        completed: &BTreeSet<LevelId>,
    ) -> LevelState {
        let is_completed = self
            .catalog
            .world_at(world_index)
            .ok()
            .and_then(|world| world.levels.get(level_index))
            .is_some_and(|id| completed.contains(id));

        if is_completed {
            LevelState::Completed
        } else if self.is_level_playable(world_index, level_index, completed) {
            LevelState::Playable
        } else {
            LevelState::Locked
        }
    }

    /// The whole adventure map for a completion set.
    pub fn map_view(&self, completed: &BTreeSet<LevelId>) -> MapView {
        let worlds = self
            .catalog
            .worlds()
            .iter()
            .enumerate()
            .map(|(world_index, world)| self.world_view(world_index, world, completed))
            .collect();
        MapView { worlds }
    }

    fn world_view(
        &self,
        world_index: usize,
        world: &World,
        completed: &BTreeSet<LevelId>,
    ) -> WorldView {
        let levels: Vec<LevelView> = world
            .levels
            .iter()
            .enumerate()
            .map(|(level_index, level_id)| LevelView {
                level_id: level_id.clone(),
                name: self
                    .catalog
                    .level(level_id)
                    .map(|level| level.name.clone())
                    .unwrap_or_default(),
                state: self.level_state(world_index, level_index, completed),
            })
            .collect();

        let completed_count = world
            .levels
            .iter()
            .filter(|id| completed.contains(*id))
            .count();

        WorldView {
            world_id: world.id.clone(),
            name: world.name.clone(),
            unlocked: self.is_world_unlocked(world_index, completed),
            completed_count: u32::try_from(completed_count).unwrap_or(u32::MAX),
            total_count: u32::try_from(world.levels.len()).unwrap_or(u32::MAX),
            all_done: world_complete(world, completed),
            levels,
        }
    }
}

/// Whether every level of `world` is in `completed`.
///
/// A world with no levels counts as complete.
pub fn world_complete(world: &World, completed: &BTreeSet<LevelId>) -> bool {
    world.levels.iter().all(|id| completed.contains(id))
}
