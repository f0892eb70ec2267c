//! Match execution controller: single-step and automated, cancellable runs.

use crate::logic::combat::{resolve_match, MatchOutcome, RandomSource, ThreadRngSource};
use crate::logic::engine;
use crate::models::{BracketMatch, Fighter, Tournament, TournamentError, TournamentStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay between automated matches unless overridden.
pub const DEFAULT_MATCH_DELAY: Duration = Duration::from_secs(1);

/// Boundary for match resolution, so execution can run in-process or go
/// through a remote endpoint. Every call advances a fresh simulation.
pub trait MatchResolver {
    fn resolve(
        &mut self,
        fighter_a: &Fighter,
        fighter_b: &Fighter,
    ) -> Result<MatchOutcome, ResolveError>;
}

/// A resolver call failed for a reason other than tournament completion
/// (timeout, transport error, malformed response).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolveError {
    Unavailable(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Unavailable(reason) => write!(f, "Match resolver failed: {}", reason),
        }
    }
}

/// Resolver that runs the combat simulation in-process.
#[derive(Clone, Debug)]
pub struct LocalResolver<R: RandomSource> {
    rng: R,
}

impl<R: RandomSource> LocalResolver<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for LocalResolver<ThreadRngSource> {
    fn default() -> Self {
        Self::new(ThreadRngSource)
    }
}

impl<R: RandomSource> MatchResolver for LocalResolver<R> {
    fn resolve(
        &mut self,
        fighter_a: &Fighter,
        fighter_b: &Fighter,
    ) -> Result<MatchOutcome, ResolveError> {
        Ok(resolve_match(fighter_a, fighter_b, &mut self.rng))
    }
}

/// Controller phases. Executing and Automating are transient; the controller
/// always returns to Idle when a call finishes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControllerState {
    Idle,
    Executing,
    Automating,
    Cancelled,
}

/// Result of a single `execute_next` step. The two empty variants are
/// completion signals, not failures: they are how callers detect that the
/// tournament is done.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecuteOutcome {
    /// A match was resolved and applied; carries the completed match.
    Executed(BracketMatch),
    NoPendingMatches,
    AlreadyCompleted,
}

/// Errors surfaced by the controller. Automation halts on the first one and
/// leaves the tournament in its last valid state for manual retry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControllerError {
    /// A step was requested while another one is in flight.
    Busy,
    Resolver(ResolveError),
    Tournament(TournamentError),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::Busy => write!(f, "Controller is already executing"),
            ControllerError::Resolver(e) => write!(f, "{}", e),
            ControllerError::Tournament(e) => write!(f, "{}", e),
        }
    }
}

/// Why an automation run stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    Completed,
    NoPendingMatches,
    Cancelled,
}

/// Summary of one automation run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AutomationReport {
    pub matches_executed: u32,
    pub stopped: StopReason,
}

/// Handle for requesting cancellation of a running automation loop.
/// Cooperative: the flag is checked between matches, never mid-match.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// Drives a tournament's matches one at a time, either single-step or as an
/// unattended loop. One controller serves one tournament at a time; callers
/// are responsible for not racing two controllers on the same value.
pub struct MatchController<R: MatchResolver> {
    resolver: R,
    state: ControllerState,
    cancel_flag: Arc<AtomicBool>,
    match_delay: Duration,
}

impl<R: MatchResolver> MatchController<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            state: ControllerState::Idle,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            match_delay: DEFAULT_MATCH_DELAY,
        }
    }

    /// Override the inter-match delay used by `automate`.
    pub fn with_match_delay(mut self, delay: Duration) -> Self {
        self.match_delay = delay;
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Handle that cancels a running `automate` loop. Cancelling while not
    /// automating has no effect: the flag is cleared when a run starts.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancel_flag),
        }
    }

    /// Execute the next eligible match, if any. Rejected with `Busy` while
    /// another step or an automation run is in flight. Completion signals
    /// come back as `Ok` and never mutate the tournament.
    pub fn execute_next(
        &mut self,
        tournament: &mut Tournament,
    ) -> Result<ExecuteOutcome, ControllerError> {
        if self.state != ControllerState::Idle {
            return Err(ControllerError::Busy);
        }
        self.state = ControllerState::Executing;
        let outcome = self.step(tournament);
        self.state = ControllerState::Idle;
        outcome
    }

    fn step(&mut self, tournament: &mut Tournament) -> Result<ExecuteOutcome, ControllerError> {
        if tournament.status == TournamentStatus::Completed {
            return Ok(ExecuteOutcome::AlreadyCompleted);
        }
        let next = match engine::next_pending_match(tournament) {
            Some(m) => m,
            None => return Ok(ExecuteOutcome::NoPendingMatches),
        };
        let (fighter_a, fighter_b) = match (&next.fighter_a, &next.fighter_b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ControllerError::Tournament(
                    TournamentError::MatchMissingFighters(next.id),
                ))
            }
        };

        let outcome = self
            .resolver
            .resolve(fighter_a, fighter_b)
            .map_err(ControllerError::Resolver)?;
        engine::apply_match_result(tournament, next.id, outcome)
            .map_err(ControllerError::Tournament)?;

        let executed = tournament
            .find_match(next.id)
            .cloned()
            .ok_or(ControllerError::Tournament(TournamentError::MatchNotFound(
                next.id,
            )))?;
        log::info!(
            "Executed round {} match {} of tournament {} (winner: {})",
            executed.round,
            executed.match_number,
            tournament.id,
            executed
                .winner
                .as_ref()
                .map(|w| w.name.as_str())
                .unwrap_or("?"),
        );
        Ok(ExecuteOutcome::Executed(executed))
    }

    /// Run matches back to back until the tournament completes, no eligible
    /// match remains, or cancellation is requested. The cancel flag is
    /// checked at every iteration boundary; an in-flight match is never
    /// interrupted. The first resolver or engine error halts the run.
    pub async fn automate(
        &mut self,
        tournament: &mut Tournament,
    ) -> Result<AutomationReport, ControllerError> {
        if self.state != ControllerState::Idle {
            return Err(ControllerError::Busy);
        }
        // Stale cancel requests from before this run do not apply.
        self.cancel_flag.store(false, Ordering::SeqCst);
        self.state = ControllerState::Automating;

        let mut matches_executed = 0u32;
        let result = loop {
            if self.cancel_flag.load(Ordering::SeqCst) {
                self.state = ControllerState::Cancelled;
                log::info!(
                    "Automation cancelled for tournament {} after {} match(es)",
                    tournament.id,
                    matches_executed
                );
                break Ok(AutomationReport {
                    matches_executed,
                    stopped: StopReason::Cancelled,
                });
            }
            match self.step(tournament) {
                Ok(ExecuteOutcome::Executed(_)) => {
                    matches_executed += 1;
                    if tournament.status == TournamentStatus::Completed {
                        break Ok(AutomationReport {
                            matches_executed,
                            stopped: StopReason::Completed,
                        });
                    }
                    tokio::time::sleep(self.match_delay).await;
                }
                Ok(ExecuteOutcome::NoPendingMatches) => {
                    break Ok(AutomationReport {
                        matches_executed,
                        stopped: StopReason::NoPendingMatches,
                    });
                }
                Ok(ExecuteOutcome::AlreadyCompleted) => {
                    break Ok(AutomationReport {
                        matches_executed,
                        stopped: StopReason::Completed,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Automation halted for tournament {} after {} match(es): {}",
                        tournament.id,
                        matches_executed,
                        e
                    );
                    break Err(e);
                }
            }
        };
        self.state = ControllerState::Idle;
        result
    }
}
