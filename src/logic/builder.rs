//! Bracket construction: first-round pairing, byes, placeholder rounds.

use crate::logic::advance::advance_winner;
use crate::models::{Bracket, BracketMatch, Fighter, MatchStatus, Tournament, TournamentError};

/// Total rounds for `fighter_count` entrants: ceil(log2(n)); 0 when n <= 1.
pub fn total_rounds_for(fighter_count: usize) -> u32 {
    if fighter_count <= 1 {
        0
    } else {
        usize::BITS - (fighter_count - 1).leading_zeros()
    }
}

/// Build the full bracket tree for the given fighters in list order.
///
/// Round 1 pairs fighters (0,1), (2,3), ...; an odd roster puts the unpaired
/// fighter into a bye match (same fighter on both sides). Every later round
/// gets ceil(previous / 2) matches with both sides undefined, to be filled by
/// winner advancement.
pub fn build_brackets(fighters: &[Fighter]) -> Vec<Bracket> {
    let total_rounds = total_rounds_for(fighters.len());
    let mut brackets = Vec::with_capacity(total_rounds as usize);
    if total_rounds == 0 {
        return brackets;
    }

    let mut first_round = Vec::new();
    for (i, pair) in fighters.chunks(2).enumerate() {
        let fighter_a = Some(pair[0].clone());
        // Unpaired last fighter: bye, signalled by the same fighter on both sides.
        let fighter_b = Some(pair.get(1).unwrap_or(&pair[0]).clone());
        first_round.push(BracketMatch::new(1, i as u32, fighter_a, fighter_b));
    }
    let mut match_count = first_round.len();
    brackets.push(Bracket {
        round: 1,
        matches: first_round,
    });

    for round in 2..=total_rounds {
        match_count = match_count.div_ceil(2);
        let matches = (0..match_count)
            .map(|i| BracketMatch::new(round, i as u32, None, None))
            .collect();
        brackets.push(Bracket { round, matches });
    }

    brackets
}

/// Auto-complete round-1 bye matches and push their winners into round 2.
/// A bye resolves with winner = the unpaired fighter and an empty battle
/// log; no combat is simulated.
pub fn resolve_byes(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.brackets.is_empty() {
        return Ok(());
    }
    for i in 0..tournament.brackets[0].matches.len() {
        let m = &mut tournament.brackets[0].matches[i];
        if m.status == MatchStatus::Pending && m.is_bye() {
            m.status = MatchStatus::Completed;
            m.winner = m.fighter_a.clone();
            advance_winner(tournament, 0, i)?;
        }
    }
    Ok(())
}
