//! Arena fighter tournament: library with models, bracket engine, combat
//! resolution, and the match execution controller.

pub mod logic;
pub mod models;

pub use logic::{
    advance_winner, apply_match_result, build_brackets, create_tournament, next_pending_match,
    resolve_match, total_rounds_for, AutomationReport, CancelHandle, ControllerError,
    ControllerState, ExecuteOutcome, LocalResolver, MatchController, MatchOutcome, MatchResolver,
    RandomSource, ResolveError, StopReason, ThreadRngSource, DEFAULT_MATCH_DELAY, MAX_ROUNDS,
};
pub use models::{
    BattleLogEntry, Bracket, BracketMatch, Fighter, FighterId, FighterStats, MatchId, MatchStatus,
    Tournament, TournamentError, TournamentId, TournamentStatus,
};
