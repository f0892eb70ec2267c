//! Winner propagation into the next round.

use crate::models::{MatchStatus, Tournament, TournamentError};

/// Place the winner of the completed match at (round `round_index`, position
/// `match_index`) into the next round: destination match index is `i / 2`,
/// side A when `i` is even, side B when `i` is odd.
///
/// A destination side whose feeder match does not exist (non-power-of-two
/// rosters) can never be filled; such a destination becomes a bye as soon as
/// its one real feeder resolves, and advancement cascades upward.
pub fn advance_winner(
    tournament: &mut Tournament,
    round_index: usize,
    match_index: usize,
) -> Result<(), TournamentError> {
    let source = &tournament.brackets[round_index].matches[match_index];
    let winner = source
        .winner
        .clone()
        .ok_or(TournamentError::MatchNotDecided)?;

    if round_index + 1 >= tournament.brackets.len() {
        // Final round: nothing downstream to feed.
        return Ok(());
    }

    let feeder_count = tournament.brackets[round_index].matches.len();
    let dest_index = match_index / 2;
    let sibling = match_index ^ 1;
    let sibling_exists = sibling < feeder_count;

    let dest = &mut tournament.brackets[round_index + 1].matches[dest_index];
    if match_index % 2 == 0 {
        dest.fighter_a = Some(winner.clone());
    } else {
        dest.fighter_b = Some(winner.clone());
    }

    if !sibling_exists {
        // Unpaired slot: the winner byes through to the round after.
        dest.fighter_a = Some(winner.clone());
        dest.fighter_b = Some(winner.clone());
        dest.status = MatchStatus::Completed;
        dest.winner = Some(winner);
        advance_winner(tournament, round_index + 1, dest_index)?;
    }

    Ok(())
}
