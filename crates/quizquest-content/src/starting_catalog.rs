//! Built-in starting catalog: four worlds of three levels each, the
//! standard badge set, and the selectable avatars.
//!
//! Badge keys here must stay in sync with the standard rule set in
//! `quizquest-core` (`first_step`, `perfect`, `xp_100`, `xp_500`,
//! `world_<N>_done`).

use quizquest_types::{Avatar, Badge, BadgeId, Level, LevelId, Question, World, WorldId};

use crate::catalog::{CatalogParts, ContentCatalog};
use crate::error::ContentError;

/// Helper to build a [`Question`].
fn q(prompt: &str, options: &[&str], correct_index: u32, hint: Option<&str>) -> Question {
    Question {
        prompt: prompt.to_owned(),
        options: options.iter().map(|o| (*o).to_owned()).collect(),
        correct_index,
        hint: hint.map(str::to_owned),
    }
}

/// Helper to build a [`Level`].
fn level(id: &str, world: &str, name: &str, xp_reward: u64, questions: Vec<Question>) -> Level {
    Level {
        id: LevelId::from(id),
        world_id: WorldId::from(world),
        name: name.to_owned(),
        xp_reward,
        questions,
    }
}

/// Helper to build a [`World`] listing the given levels in order.
fn world(id: &str, name: &str, emoji: &str, description: &str, levels: &[&Level]) -> World {
    World {
        id: WorldId::from(id),
        name: name.to_owned(),
        emoji: emoji.to_owned(),
        description: description.to_owned(),
        levels: levels.iter().map(|l| l.id.clone()).collect(),
    }
}

/// Helper to build a [`Badge`].
fn badge(id: &str, name: &str, description: &str, emoji: &str) -> Badge {
    Badge {
        id: BadgeId::from(id),
        name: name.to_owned(),
        description: description.to_owned(),
        emoji: emoji.to_owned(),
    }
}

/// Helper to build an [`Avatar`].
fn avatar(id: u32, emoji: &str, name: &str) -> Avatar {
    Avatar {
        id,
        emoji: emoji.to_owned(),
        name: name.to_owned(),
    }
}

/// Raw content of the built-in catalog.
#[allow(clippy::too_many_lines)]
pub fn starting_parts() -> CatalogParts {
    // --- World 1: Number Forest ---
    let l1_1 = level("l1_1", "w1", "Counting Trees", 50, vec![
        q("How many legs does a spider have?", &["6", "8", "10", "4"], 1, Some("More than an insect.")),
        q("What is 7 + 5?", &["11", "12", "13", "14"], 1, None),
        q("Which number is even?", &["3", "9", "14", "21"], 2, None),
        q("What comes after 99?", &["100", "990", "909", "101"], 0, None),
    ]);
    let l1_2 = level("l1_2", "w1", "Owl Subtraction", 60, vec![
        q("What is 15 - 8?", &["6", "7", "8", "9"], 1, None),
        q("You have 10 acorns and give away 4. How many are left?", &["4", "5", "6", "14"], 2, None),
        q("What is 20 - 20?", &["0", "1", "20", "40"], 0, Some("Nothing is left.")),
        q("Which is smaller: 41 or 14?", &["41", "14", "They are equal"], 1, None),
        q("What is 100 - 1?", &["98", "99", "101", "90"], 1, None),
    ]);
    let l1_3 = level("l1_3", "w1", "Times Table Grove", 80, vec![
        q("What is 3 x 4?", &["7", "12", "14", "9"], 1, None),
        q("What is 6 x 6?", &["36", "12", "30", "42"], 0, None),
        q("What is 9 x 0?", &["9", "1", "0", "90"], 2, Some("Anything times zero...")),
        q("What is 5 x 8?", &["45", "35", "40", "13"], 2, None),
    ]);

    // --- World 2: Science Sea ---
    let l2_1 = level("l2_1", "w2", "Ocean Life", 60, vec![
        q("Which animal is a mammal?", &["Shark", "Dolphin", "Tuna", "Octopus"], 1, Some("It breathes air.")),
        q("How many arms does an octopus have?", &["6", "8", "10", "12"], 1, None),
        q("What do fish use to breathe underwater?", &["Lungs", "Gills", "Fins", "Scales"], 1, None),
    ]);
    let l2_2 = level("l2_2", "w2", "Water Cycle", 70, vec![
        q("What is it called when water turns into vapor?", &["Freezing", "Melting", "Evaporation", "Condensation"], 2, None),
        q("At what temperature does water freeze (Celsius)?", &["0", "10", "32", "100"], 0, None),
        q("Clouds are made of...", &["Smoke", "Tiny water droplets", "Cotton", "Dust only"], 1, None),
        q("Rain, snow and hail are all kinds of...", &["Precipitation", "Erosion", "Gravity"], 0, None),
    ]);
    let l2_3 = level("l2_3", "w2", "Deep Dive", 90, vec![
        q("What is the largest ocean on Earth?", &["Atlantic", "Indian", "Arctic", "Pacific"], 3, None),
        q("Which part of the Earth is mostly water?", &["Less than a quarter", "About half", "About 70 percent"], 2, None),
        q("What makes sea water salty?", &["Fish", "Dissolved minerals", "Sand", "Sunlight"], 1, Some("Rivers carry it from rocks.")),
        q("Which animal is the largest alive today?", &["Elephant", "Blue whale", "Giant squid", "Whale shark"], 1, None),
    ]);

    // --- World 3: Word Valley ---
    let l3_1 = level("l3_1", "w3", "Letter Hunt", 70, vec![
        q("Which word starts with a vowel?", &["Tree", "Apple", "Moon", "Sun"], 1, None),
        q("How many letters are in the English alphabet?", &["24", "25", "26", "28"], 2, None),
        q("Which letter comes after M?", &["L", "N", "O", "P"], 1, None),
    ]);
    let l3_2 = level("l3_2", "w3", "Opposites Bridge", 80, vec![
        q("What is the opposite of hot?", &["Warm", "Cold", "Wet", "Bright"], 1, None),
        q("What is the opposite of up?", &["Down", "Over", "Side", "Top"], 0, None),
        q("What is the opposite of early?", &["Soon", "Late", "Fast", "Now"], 1, None),
        q("What is the opposite of full?", &["Heavy", "Empty", "Closed", "Big"], 1, None),
    ]);
    let l3_3 = level("l3_3", "w3", "Rhyme Mountain", 100, vec![
        q("Which word rhymes with cat?", &["Dog", "Hat", "Cup", "Car"], 1, None),
        q("Which word rhymes with moon?", &["Spoon", "Star", "Sun", "Mine"], 0, None),
        q("Which word rhymes with tree?", &["Bee", "Leaf", "Root", "Bark"], 0, Some("It buzzes.")),
        q("Which word rhymes with light?", &["Lamp", "Night", "Dark", "Late"], 1, None),
    ]);

    // --- World 4: Space Station ---
    let l4_1 = level("l4_1", "w4", "Planet Parade", 80, vec![
        q("Which planet is closest to the Sun?", &["Venus", "Earth", "Mercury", "Mars"], 2, None),
        q("Which planet is known as the Red Planet?", &["Mars", "Jupiter", "Saturn", "Neptune"], 0, None),
        q("How many planets are in our solar system?", &["7", "8", "9", "10"], 1, None),
    ]);
    let l4_2 = level("l4_2", "w4", "Star Map", 100, vec![
        q("What is the Sun?", &["A planet", "A star", "A moon", "A comet"], 1, None),
        q("What do we call a group of stars that forms a picture?", &["Galaxy", "Constellation", "Orbit", "Crater"], 1, None),
        q("What pulls things toward the ground?", &["Magnetism", "Wind", "Gravity", "Light"], 2, None),
        q("Which planet has the most famous rings?", &["Saturn", "Mars", "Venus", "Mercury"], 0, None),
    ]);
    let l4_3 = level("l4_3", "w4", "Moon Landing", 120, vec![
        q("In what year did people first walk on the Moon?", &["1959", "1969", "1979", "1989"], 1, None),
        q("Why does the Moon shine?", &["It burns", "It reflects sunlight", "It has lamps", "It is a star"], 1, Some("Think of a mirror.")),
        q("How long does the Moon take to orbit the Earth?", &["About a day", "About a week", "About a month", "About a year"], 2, None),
        q("What is a person who travels to space called?", &["Astronaut", "Astronomer", "Pilot", "Sailor"], 0, None),
    ]);

    let worlds = vec![
        world("w1", "Number Forest", "🌳", "Counting, adding and taking away", &[&l1_1, &l1_2, &l1_3]),
        world("w2", "Science Sea", "🌊", "Creatures and currents of the ocean", &[&l2_1, &l2_2, &l2_3]),
        world("w3", "Word Valley", "📚", "Letters, opposites and rhymes", &[&l3_1, &l3_2, &l3_3]),
        world("w4", "Space Station", "🚀", "Planets, stars and the Moon", &[&l4_1, &l4_2, &l4_3]),
    ];

    let levels = vec![
        l1_1, l1_2, l1_3, l2_1, l2_2, l2_3, l3_1, l3_2, l3_3, l4_1, l4_2, l4_3,
    ];

    let badges = vec![
        badge("first_step", "First Step", "Complete your first level", "👣"),
        badge("perfect", "Perfectionist", "Answer every question in a level correctly", "💯"),
        badge("xp_100", "Rising Star", "Collect 100 XP", "⭐"),
        badge("xp_500", "Superstar", "Collect 500 XP", "🌟"),
        badge("world_1_done", "Forest Ranger", "Complete every level of Number Forest", "🌳"),
        badge("world_2_done", "Deep Diver", "Complete every level of Science Sea", "🐬"),
        badge("world_3_done", "Word Wizard", "Complete every level of Word Valley", "🧙"),
        badge("world_4_done", "Space Cadet", "Complete every level of Space Station", "👩‍🚀"),
    ];

    let avatars = vec![
        avatar(0, "🦁", "Lion"),
        avatar(1, "🐼", "Panda"),
        avatar(2, "🦊", "Fox"),
        avatar(3, "🐸", "Frog"),
        avatar(4, "🦄", "Unicorn"),
        avatar(5, "🐙", "Octopus"),
        avatar(6, "🐯", "Tiger"),
        avatar(7, "🐧", "Penguin"),
    ];

    CatalogParts {
        worlds,
        levels,
        badges,
        avatars,
    }
}

/// Build and validate the built-in catalog.
///
/// # Errors
///
/// Returns [`ContentError`] if the hard-coded data is inconsistent (should
/// not happen; covered by tests).
pub fn create_starting_catalog() -> Result<ContentCatalog, ContentError> {
    ContentCatalog::from_parts(starting_parts())
}
