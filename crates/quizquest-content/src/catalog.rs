//! The content catalog: worlds, levels, questions, badges, and avatars.
//!
//! The [`ContentCatalog`] is an immutable value built once (from compiled-in
//! data or a JSON document fetched at startup) and passed by reference to
//! every component that needs it. It is never a global.
//!
//! Internally, levels are indexed by key and each level's position
//! (`world_index`, `level_index`) is precomputed so the unlock policy can
//! answer "which level comes before this one" without scanning.

use std::collections::{BTreeMap, BTreeSet};

use quizquest_types::{Avatar, Badge, BadgeId, Level, LevelId, World, WorldId};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Position of a level within the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelLocation {
    /// Position of the owning world in catalog order.
    pub world_index: usize,
    /// Position of the level within its world.
    pub level_index: usize,
}

/// Raw catalog content before validation.
///
/// This is the document shape accepted by [`ContentCatalog::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogParts {
    /// Worlds in display order.
    pub worlds: Vec<World>,
    /// Every level, in any order. Worlds define play order.
    pub levels: Vec<Level>,
    /// Badges in display order.
    pub badges: Vec<Badge>,
    /// Selectable avatars in display order.
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

/// Validated, read-only content catalog.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    /// Worlds in display order.
    worlds: Vec<World>,
    /// World positions by key.
    world_positions: BTreeMap<WorldId, usize>,
    /// All levels indexed by key.
    levels: BTreeMap<LevelId, Level>,
    /// Precomputed catalog position of every level.
    locations: BTreeMap<LevelId, LevelLocation>,
    /// Badges in display order.
    badges: Vec<Badge>,
    /// Avatars in display order.
    avatars: Vec<Avatar>,
}

impl ContentCatalog {
    /// Validate raw content and build a catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] when keys collide, a world lists an
    /// unknown level or a level of another world, a level is not listed by
    /// any world, or a question's correct index is out of range.
    pub fn from_parts(parts: CatalogParts) -> Result<Self, ContentError> {
        let CatalogParts {
            worlds,
            levels: level_list,
            badges,
            avatars,
        } = parts;

        let mut badge_ids = BTreeSet::new();
        for badge in &badges {
            if !badge_ids.insert(badge.id.clone()) {
                return Err(ContentError::DuplicateBadge(badge.id.clone()));
            }
        }

        let mut avatar_ids = BTreeSet::new();
        for avatar in &avatars {
            if !avatar_ids.insert(avatar.id) {
                return Err(ContentError::DuplicateAvatar(avatar.id));
            }
        }

        let mut levels = BTreeMap::new();
        for level in level_list {
            validate_questions(&level)?;
            if levels.contains_key(&level.id) {
                return Err(ContentError::DuplicateLevel(level.id));
            }
            levels.insert(level.id.clone(), level);
        }

        let mut world_positions = BTreeMap::new();
        let mut locations = BTreeMap::new();
        for (world_index, world) in worlds.iter().enumerate() {
            if world_positions.insert(world.id.clone(), world_index).is_some() {
                return Err(ContentError::DuplicateWorld(world.id.clone()));
            }
            for (level_index, level_id) in world.levels.iter().enumerate() {
                let level = levels
                    .get(level_id)
                    .ok_or_else(|| ContentError::LevelNotFound(level_id.clone()))?;
                if level.world_id != world.id {
                    return Err(ContentError::LevelWorldMismatch {
                        level: level_id.clone(),
                        listed_by: world.id.clone(),
                        declared: level.world_id.clone(),
                    });
                }
                let location = LevelLocation {
                    world_index,
                    level_index,
                };
                if locations.insert(level_id.clone(), location).is_some() {
                    return Err(ContentError::DuplicateLevel(level_id.clone()));
                }
            }
        }

        if let Some(orphan) = levels.keys().find(|id| !locations.contains_key(*id)) {
            return Err(ContentError::OrphanLevel(orphan.clone()));
        }

        tracing::debug!(
            worlds = worlds.len(),
            levels = levels.len(),
            badges = badges.len(),
            avatars = avatars.len(),
            "Content catalog validated"
        );

        Ok(Self {
            worlds,
            world_positions,
            levels,
            locations,
            badges,
            avatars,
        })
    }

    /// Parse and validate a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLoadError::Json`] for malformed JSON and
    /// [`CatalogLoadError::Content`] for content that fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let parts: CatalogParts = serde_json::from_str(json)?;
        Ok(Self::from_parts(parts)?)
    }

    // -------------------------------------------------------------------
    // Worlds
    // -------------------------------------------------------------------

    /// All worlds in display order.
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// Number of worlds.
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Resolve a world by key.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::WorldNotFound`] for an unknown key.
    pub fn world(&self, id: &WorldId) -> Result<&World, ContentError> {
        self.world_index(id)
            .and_then(|index| self.world_at(index))
    }

    /// Resolve a world by catalog position.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::WorldIndexOutOfRange`] past the last world.
    pub fn world_at(&self, index: usize) -> Result<&World, ContentError> {
        self.worlds
            .get(index)
            .ok_or(ContentError::WorldIndexOutOfRange {
                index,
                count: self.worlds.len(),
            })
    }

    /// Catalog position of a world.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::WorldNotFound`] for an unknown key.
    pub fn world_index(&self, id: &WorldId) -> Result<usize, ContentError> {
        self.world_positions
            .get(id)
            .copied()
            .ok_or_else(|| ContentError::WorldNotFound(id.clone()))
    }

    /// The levels of a world, in play order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::WorldNotFound`] for an unknown key.
    pub fn levels_in_world(&self, id: &WorldId) -> Result<Vec<&Level>, ContentError> {
        let world = self.world(id)?;
        world.levels.iter().map(|level_id| self.level(level_id)).collect()
    }

    // -------------------------------------------------------------------
    // Levels
    // -------------------------------------------------------------------

    /// Resolve a level by key.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::LevelNotFound`] for an unknown key.
    pub fn level(&self, id: &LevelId) -> Result<&Level, ContentError> {
        self.levels
            .get(id)
            .ok_or_else(|| ContentError::LevelNotFound(id.clone()))
    }

    /// Where a level sits: owning world position and position within it.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::LevelNotFound`] for an unknown key.
    pub fn locate_level(&self, id: &LevelId) -> Result<LevelLocation, ContentError> {
        self.locations
            .get(id)
            .copied()
            .ok_or_else(|| ContentError::LevelNotFound(id.clone()))
    }

    /// The level's owning world.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::LevelNotFound`] for an unknown level.
    pub fn world_of(&self, id: &LevelId) -> Result<&World, ContentError> {
        let location = self.locate_level(id)?;
        self.world_at(location.world_index)
    }

    /// Resolve the level at a catalog position.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` kind error if either position is out of range.
    pub fn level_at(&self, world_index: usize, level_index: usize) -> Result<&Level, ContentError> {
        let world = self.world_at(world_index)?;
        let level_id = world
            .levels
            .get(level_index)
            .ok_or_else(|| ContentError::LevelIndexOutOfRange {
                world: world.id.clone(),
                index: level_index,
                count: world.levels.len(),
            })?;
        self.level(level_id)
    }

    /// Total number of levels across all worlds.
    pub fn total_levels(&self) -> usize {
        self.levels.len()
    }

    // -------------------------------------------------------------------
    // Badges and avatars
    // -------------------------------------------------------------------

    /// Resolve a badge by key.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::BadgeNotFound`] for an unknown key.
    pub fn badge(&self, id: &BadgeId) -> Result<&Badge, ContentError> {
        self.badges
            .iter()
            .find(|badge| &badge.id == id)
            .ok_or_else(|| ContentError::BadgeNotFound(id.clone()))
    }

    /// Whether a badge key exists.
    pub fn has_badge(&self, id: &BadgeId) -> bool {
        self.badges.iter().any(|badge| &badge.id == id)
    }

    /// All badges in display order.
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    /// Resolve an avatar by index.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::AvatarNotFound`] for an unknown index.
    pub fn avatar(&self, id: u32) -> Result<&Avatar, ContentError> {
        self.avatars
            .iter()
            .find(|avatar| avatar.id == id)
            .ok_or(ContentError::AvatarNotFound(id))
    }

    /// All avatars in display order.
    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }
}

/// Errors from [`ContentCatalog::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    /// The document is not valid catalog JSON.
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but the content is inconsistent.
    #[error("invalid catalog content: {0}")]
    Content(#[from] ContentError),
}

/// Check that every question's correct index points at one of its options.
fn validate_questions(level: &Level) -> Result<(), ContentError> {
    for (position, question) in level.questions.iter().enumerate() {
        if question.correct_option().is_none() {
            return Err(ContentError::InvalidQuestion {
                level: level.id.clone(),
                question: position,
                correct_index: question.correct_index,
                option_count: question.options.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quizquest_types::Question;

    use super::*;
    use crate::error::ContentError;

    fn level(id: &str, world: &str) -> Level {
        Level {
            id: LevelId::from(id),
            world_id: WorldId::from(world),
            name: id.to_uppercase(),
            xp_reward: 40,
            questions: vec![Question {
                prompt: "?".to_owned(),
                options: vec!["a".to_owned(), "b".to_owned()],
                correct_index: 0,
                hint: None,
            }],
        }
    }

    fn world(id: &str, levels: &[&str]) -> World {
        World {
            id: WorldId::from(id),
            name: id.to_uppercase(),
            emoji: String::new(),
            description: String::new(),
            levels: levels.iter().map(|l| LevelId::from(*l)).collect(),
        }
    }

    fn parts() -> CatalogParts {
        CatalogParts {
            worlds: vec![world("w1", &["a1", "a2"]), world("w2", &["b1"])],
            levels: vec![level("b1", "w2"), level("a2", "w1"), level("a1", "w1")],
            badges: vec![Badge {
                id: BadgeId::from("first_step"),
                name: "First Step".to_owned(),
                description: String::new(),
                emoji: String::new(),
            }],
            avatars: vec![],
        }
    }

    #[test]
    fn locates_levels_by_world_order() {
        let catalog = ContentCatalog::from_parts(parts()).unwrap();

        let loc = catalog.locate_level(&LevelId::from("a2")).ok();
        assert_eq!(
            loc,
            Some(LevelLocation {
                world_index: 0,
                level_index: 1
            })
        );
        let loc = catalog.locate_level(&LevelId::from("b1")).ok();
        assert_eq!(
            loc,
            Some(LevelLocation {
                world_index: 1,
                level_index: 0
            })
        );
        assert_eq!(catalog.total_levels(), 3);
        assert_eq!(
            catalog.world_of(&LevelId::from("b1")).map(|w| w.id.clone()).ok(),
            Some(WorldId::from("w2"))
        );
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let catalog = ContentCatalog::from_parts(parts()).unwrap();
        assert!(matches!(
            catalog.level(&LevelId::from("zz")),
            Err(ContentError::LevelNotFound(_))
        ));
        assert!(matches!(
            catalog.world(&WorldId::from("w9")),
            Err(ContentError::WorldNotFound(_))
        ));
        assert!(matches!(
            catalog.badge(&BadgeId::from("nope")),
            Err(ContentError::BadgeNotFound(_))
        ));
        assert!(matches!(
            catalog.level_at(0, 5),
            Err(ContentError::LevelIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_level_listed_by_wrong_world() {
        let mut p = parts();
        p.worlds = vec![world("w1", &["a1", "a2", "b1"]), world("w2", &[])];
        assert!(matches!(
            ContentCatalog::from_parts(p),
            Err(ContentError::LevelWorldMismatch { .. })
        ));
    }

    #[test]
    fn rejects_orphan_level() {
        let mut p = parts();
        p.worlds = vec![world("w1", &["a1", "a2"])];
        assert!(matches!(
            ContentCatalog::from_parts(p),
            Err(ContentError::OrphanLevel(_))
        ));
    }

    #[test]
    fn rejects_duplicate_world() {
        let mut p = parts();
        p.worlds.push(world("w1", &[]));
        assert!(matches!(
            ContentCatalog::from_parts(p),
            Err(ContentError::DuplicateWorld(_))
        ));
    }

    #[test]
    fn rejects_bad_correct_index() {
        let mut p = parts();
        let mut broken = level("a1", "w1");
        if let Some(q) = broken.questions.first_mut() {
            q.correct_index = 2;
        }
        p.levels = vec![broken, level("a2", "w1"), level("b1", "w2")];
        assert!(matches!(
            ContentCatalog::from_parts(p),
            Err(ContentError::InvalidQuestion { .. })
        ));
    }

    #[test]
    fn loads_from_json() {
        let json = serde_json::to_string(&parts()).unwrap();
        let catalog = ContentCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.total_levels(), 3);
        assert!(ContentCatalog::from_json("{").is_err());
    }
}
