//! Fighter data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fighter (used in matches and battle logs).
pub type FighterId = Uuid;

/// Combat statistics for a fighter.
///
/// Stats never change during a match: the combat resolver tracks each
/// fighter's current health in match-local counters and never writes back.
/// `health` is the value a match starts from; it may be below `max_health`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub health: i32,
    pub max_health: i32,
    pub strength: i32,
    pub agility: i32,
    pub defense: i32,
    pub luck: i32,
    #[serde(default)]
    pub magic: Option<i32>,
    #[serde(default)]
    pub ranged: Option<i32>,
    #[serde(default)]
    pub intelligence: Option<i32>,
}

impl FighterStats {
    /// Create stats at full health with no optional attributes.
    pub fn new(health: i32, strength: i32, agility: i32, defense: i32, luck: i32) -> Self {
        Self {
            health,
            max_health: health,
            strength,
            agility,
            defense,
            luck,
            magic: None,
            ranged: None,
            intelligence: None,
        }
    }
}

/// A fighter in the tournament. Produced by external stat generation; the
/// engine only consumes finished values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
    pub stats: FighterStats,
    /// Flavor abilities used by commentary generation; not consulted by combat.
    #[serde(default)]
    pub unique_abilities: Vec<String>,
}

impl Fighter {
    /// Create a new fighter with the given name and stats.
    pub fn new(name: impl Into<String>, stats: FighterStats) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stats,
            unique_abilities: Vec::new(),
        }
    }
}
