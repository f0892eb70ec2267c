//! Match, battle log, and Bracket structures for the single-elimination tree.

use crate::models::fighter::{Fighter, FighterId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Execution state of a match. "In progress" is transient controller state
/// and is never persisted on the match itself.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// One per-round record in a match's battle log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    pub round: u32,
    /// Fighter with initiative this round.
    pub attacker: FighterId,
    pub defender: FighterId,
    /// Damage dealt by the attacker to the defender this round.
    pub attacker_damage: i32,
    /// Counter damage dealt back by the defender.
    pub defender_damage: i32,
    /// Attacker's health after both damages landed.
    pub attacker_health: i32,
    pub defender_health: i32,
    /// Filled in by external commentary generation; the resolver leaves None.
    #[serde(default)]
    pub commentary: Option<String>,
}

/// A single pairing in the bracket.
///
/// A fighter side is `None` while the upstream match feeding it is
/// unresolved. Both sides holding the same fighter id marks a bye: the
/// fighter advances without a simulated match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// Round this match belongs to (1-based).
    pub round: u32,
    /// Position within the round (0-based); drives advancement targets.
    pub match_number: u32,
    pub fighter_a: Option<Fighter>,
    pub fighter_b: Option<Fighter>,
    pub status: MatchStatus,
    /// None until the match is completed.
    pub winner: Option<Fighter>,
    pub battle_log: Vec<BattleLogEntry>,
}

impl BracketMatch {
    pub fn new(
        round: u32,
        match_number: u32,
        fighter_a: Option<Fighter>,
        fighter_b: Option<Fighter>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            match_number,
            fighter_a,
            fighter_b,
            status: MatchStatus::Pending,
            winner: None,
            battle_log: Vec::new(),
        }
    }

    /// True when both sides hold the same fighter (automatic advancement).
    pub fn is_bye(&self) -> bool {
        match (&self.fighter_a, &self.fighter_b) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        }
    }

    /// Eligible for execution: still pending with both fighters defined.
    pub fn is_ready(&self) -> bool {
        self.status == MatchStatus::Pending
            && self.fighter_a.is_some()
            && self.fighter_b.is_some()
    }
}

/// All matches belonging to one tournament round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Round number (1-based).
    pub round: u32,
    pub matches: Vec<BracketMatch>,
}
