//! Data structures: fighters, matches, brackets, and tournaments.

mod bracket;
mod fighter;
mod tournament;

pub use bracket::{BattleLogEntry, Bracket, BracketMatch, MatchId, MatchStatus};
pub use fighter::{Fighter, FighterId, FighterStats};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentStatus};
