//! Tournament engine logic: bracket building, winner advancement, combat
//! resolution, and match execution.

mod advance;
mod builder;
mod combat;
mod controller;
mod engine;

pub use advance::advance_winner;
pub use builder::{build_brackets, total_rounds_for};
pub use combat::{resolve_match, MatchOutcome, RandomSource, ThreadRngSource, MAX_ROUNDS};
pub use controller::{
    AutomationReport, CancelHandle, ControllerError, ControllerState, ExecuteOutcome,
    LocalResolver, MatchController, MatchResolver, ResolveError, StopReason, DEFAULT_MATCH_DELAY,
};
pub use engine::{apply_match_result, create_tournament, next_pending_match};
