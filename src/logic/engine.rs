//! Tournament engine: creation, next-match lookup, and result application.

use crate::logic::advance::advance_winner;
use crate::logic::builder;
use crate::logic::combat::MatchOutcome;
use crate::models::{
    BracketMatch, Fighter, MatchId, MatchStatus, Tournament, TournamentError, TournamentStatus,
};
use chrono::Utc;
use uuid::Uuid;

/// Create a tournament: build the bracket tree and auto-resolve byes.
///
/// A single-fighter roster yields a zero-round tournament that is already
/// completed with that fighter as winner. Everything else starts in Setup;
/// the first applied result moves it to InProgress.
pub fn create_tournament(
    name: impl Into<String>,
    fighters: Vec<Fighter>,
) -> Result<Tournament, TournamentError> {
    if fighters.is_empty() {
        return Err(TournamentError::NoFighters);
    }
    let total_rounds = builder::total_rounds_for(fighters.len());
    let mut tournament = Tournament {
        id: Uuid::new_v4(),
        name: name.into(),
        status: TournamentStatus::Setup,
        current_round: if total_rounds == 0 { 0 } else { 1 },
        total_rounds,
        fighters,
        brackets: Vec::new(),
        winner: None,
        created_at: Utc::now(),
    };

    if total_rounds == 0 {
        tournament.status = TournamentStatus::Completed;
        tournament.winner = Some(tournament.fighters[0].clone());
        return Ok(tournament);
    }

    tournament.brackets = builder::build_brackets(&tournament.fighters);
    builder::resolve_byes(&mut tournament)?;
    Ok(tournament)
}

/// First pending match with both fighters defined, scanning rounds in order.
/// Returns None when the tournament is finished (nothing can be blocked
/// forever: upstream matches always resolve before downstream ones).
pub fn next_pending_match(tournament: &Tournament) -> Option<BracketMatch> {
    tournament
        .brackets
        .iter()
        .flat_map(|b| b.matches.iter())
        .find(|m| m.is_ready())
        .cloned()
}

/// Record a resolved outcome: mark the match completed, store the winner and
/// battle log, push the winner into the next round, and refresh the derived
/// tournament fields.
///
/// Rejections here are caller invariant violations: results may only be
/// applied to matches obtained from `next_pending_match`, and the outcome
/// must name one of the match's fighters as winner.
pub fn apply_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    outcome: MatchOutcome,
) -> Result<(), TournamentError> {
    let (round_index, match_index) = tournament
        .locate_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let m = &tournament.brackets[round_index].matches[match_index];
    if m.status != MatchStatus::Pending {
        return Err(TournamentError::MatchNotPending(match_id));
    }
    let (fighter_a, fighter_b) = match (&m.fighter_a, &m.fighter_b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TournamentError::MatchMissingFighters(match_id)),
    };
    let winner = outcome.winner.ok_or(TournamentError::MatchNotDecided)?;
    if winner.id != fighter_a.id && winner.id != fighter_b.id {
        return Err(TournamentError::WinnerNotInMatch(winner.id));
    }

    let m = &mut tournament.brackets[round_index].matches[match_index];
    m.status = MatchStatus::Completed;
    m.winner = Some(winner);
    m.battle_log = outcome.battle_log;

    advance_winner(tournament, round_index, match_index)?;
    refresh(tournament);
    Ok(())
}

/// Recompute derived fields after a result: the tournament is completed
/// exactly when the final round's match has a winner; otherwise it is in
/// progress and `current_round` is the highest round holding an executable
/// match.
fn refresh(tournament: &mut Tournament) {
    if let Some(winner) = tournament.final_match().and_then(|m| m.winner.clone()) {
        tournament.status = TournamentStatus::Completed;
        tournament.winner = Some(winner);
        tournament.current_round = tournament.total_rounds;
        return;
    }
    tournament.status = TournamentStatus::InProgress;
    if let Some(round) = tournament
        .brackets
        .iter()
        .filter(|b| b.matches.iter().any(|m| m.is_ready()))
        .map(|b| b.round)
        .max()
    {
        tournament.current_round = round;
    }
}
