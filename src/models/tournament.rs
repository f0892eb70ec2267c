//! Tournament and TournamentStatus.

use crate::models::bracket::{Bracket, BracketMatch, MatchId};
use crate::models::fighter::{Fighter, FighterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations. All of these are
/// invariant violations on the caller's side, not expected branches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A tournament needs at least one fighter.
    NoFighters,
    /// No match with this id exists in the bracket tree.
    MatchNotFound(MatchId),
    /// Result applied to a match that is not pending.
    MatchNotPending(MatchId),
    /// Result applied to a match whose fighters are not yet defined.
    MatchMissingFighters(MatchId),
    /// Outcome carried no winner (draws are not accepted by the bracket).
    MatchNotDecided,
    /// Outcome winner is not one of the match's fighters.
    WinnerNotInMatch(FighterId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NoFighters => write!(f, "Need at least one fighter"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::MatchNotPending(id) => write!(f, "Match {} is not pending", id),
            TournamentError::MatchMissingFighters(id) => {
                write!(f, "Match {} does not have both fighters yet", id)
            }
            TournamentError::MatchNotDecided => write!(f, "Match outcome has no winner"),
            TournamentError::WinnerNotInMatch(id) => {
                write!(f, "Fighter {} is not in this match", id)
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Brackets built; no match executed yet.
    #[default]
    Setup,
    /// At least one match result applied; matches remain.
    InProgress,
    /// The final round's match has a winner.
    Completed,
}

/// Full tournament state: fighters, bracket tree, and derived progress.
///
/// The bracket shape and `total_rounds` are fixed at creation. Afterwards
/// only match contents change (fighters filled in from prior winners,
/// status/winner/battle_log set on completion); `status`, `current_round`,
/// and `winner` are derived from the brackets after every applied result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    /// Round currently holding executable matches (1-based; 0 when there are
    /// no rounds at all).
    pub current_round: u32,
    /// ceil(log2(fighter count)); 0 for a single-fighter tournament.
    pub total_rounds: u32,
    pub fighters: Vec<Fighter>,
    /// Ordered by round, one bracket per round.
    pub brackets: Vec<Bracket>,
    /// Set only when status is Completed.
    pub winner: Option<Fighter>,
    /// Informational; not used by engine logic.
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Look up a match anywhere in the bracket tree.
    pub fn find_match(&self, match_id: MatchId) -> Option<&BracketMatch> {
        self.brackets
            .iter()
            .flat_map(|b| b.matches.iter())
            .find(|m| m.id == match_id)
    }

    /// Position of a match as (round index, match index), both 0-based.
    pub fn locate_match(&self, match_id: MatchId) -> Option<(usize, usize)> {
        self.brackets.iter().enumerate().find_map(|(ri, b)| {
            b.matches
                .iter()
                .position(|m| m.id == match_id)
                .map(|mi| (ri, mi))
        })
    }

    /// The final round's single match, if any rounds exist.
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.brackets.last().and_then(|b| b.matches.first())
    }
}
