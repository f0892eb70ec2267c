//! Integration tests for bracket construction, advancement, and completion.

use arena_tournament_web::{
    apply_match_result, create_tournament, next_pending_match, total_rounds_for, Fighter,
    FighterStats, MatchOutcome, MatchStatus, Tournament, TournamentError, TournamentStatus,
};

fn fighter(name: &str) -> Fighter {
    Fighter::new(name, FighterStats::new(100, 10, 10, 5, 5))
}

fn roster(n: usize) -> Vec<Fighter> {
    (0..n).map(|i| fighter(&format!("F{i}"))).collect()
}

fn tournament(n: usize) -> Tournament {
    create_tournament("Test Cup", roster(n)).unwrap()
}

/// Apply a result with the given winner and no battle log.
fn win(t: &mut Tournament, match_id: uuid::Uuid, winner: &Fighter) {
    apply_match_result(
        t,
        match_id,
        MatchOutcome {
            winner: Some(winner.clone()),
            battle_log: Vec::new(),
        },
    )
    .unwrap();
}

#[test]
fn create_rejects_empty_roster() {
    assert_eq!(
        create_tournament("Empty", Vec::new()),
        Err(TournamentError::NoFighters)
    );
}

#[test]
fn bracket_shape_for_various_roster_sizes() {
    for n in 1..=9usize {
        let t = tournament(n);
        let expected_rounds = (n as f64).log2().ceil() as u32;
        assert_eq!(t.total_rounds, expected_rounds, "rounds for n={n}");
        assert_eq!(total_rounds_for(n), expected_rounds);
        assert_eq!(t.brackets.len() as u32, expected_rounds);

        if n > 1 {
            assert_eq!(t.brackets[0].matches.len(), n.div_ceil(2), "round 1 for n={n}");
            for k in 1..t.brackets.len() {
                let prev = t.brackets[k - 1].matches.len();
                assert_eq!(
                    t.brackets[k].matches.len(),
                    prev.div_ceil(2),
                    "round {} for n={n}",
                    k + 1
                );
            }
            assert_eq!(t.brackets.last().unwrap().matches.len(), 1);
        }
    }
}

#[test]
fn single_fighter_tournament_is_created_completed() {
    let t = tournament(1);
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.total_rounds, 0);
    assert_eq!(t.current_round, 0);
    assert!(t.brackets.is_empty());
    assert_eq!(t.winner.as_ref().unwrap().name, "F0");
    assert!(next_pending_match(&t).is_none());
}

#[test]
fn odd_roster_bye_auto_resolves_with_empty_log() {
    let t = tournament(3);
    // Round 1: (F0,F1) real, (F2,F2) bye already resolved at build time.
    let bye = &t.brackets[0].matches[1];
    assert!(bye.is_bye());
    assert_eq!(bye.status, MatchStatus::Completed);
    assert_eq!(bye.winner.as_ref().unwrap().name, "F2");
    assert!(bye.battle_log.is_empty());

    // The bye winner is already waiting in the final on side B (odd feeder index).
    let final_match = t.final_match().unwrap();
    assert!(final_match.fighter_a.is_none());
    assert_eq!(final_match.fighter_b.as_ref().unwrap().name, "F2");

    // The only executable match is the real round-1 pairing.
    let next = next_pending_match(&t).unwrap();
    assert_eq!(next.round, 1);
    assert_eq!(next.match_number, 0);

    // Byes never change tournament status before a real result.
    assert_eq!(t.status, TournamentStatus::Setup);
}

#[test]
fn winners_advance_to_slot_matching_feeder_parity() {
    let mut t = tournament(4);
    let (m0, m1) = (
        t.brackets[0].matches[0].clone(),
        t.brackets[0].matches[1].clone(),
    );
    let w0 = m0.fighter_a.clone().unwrap(); // even index -> side A
    let w1 = m1.fighter_b.clone().unwrap(); // odd index -> side B

    win(&mut t, m0.id, &w0);
    assert_eq!(t.status, TournamentStatus::InProgress);
    let final_match = t.final_match().unwrap();
    assert_eq!(final_match.fighter_a.as_ref().unwrap().id, w0.id);
    assert!(final_match.fighter_b.is_none());
    assert!(!final_match.is_ready());

    win(&mut t, m1.id, &w1);
    let final_match = t.final_match().unwrap();
    assert_eq!(final_match.fighter_b.as_ref().unwrap().id, w1.id);
    assert!(final_match.is_ready());
    assert_eq!(t.current_round, 2);
}

#[test]
fn completion_exactly_when_final_match_has_winner() {
    let mut t = tournament(2);
    assert_eq!(t.status, TournamentStatus::Setup);
    assert!(t.winner.is_none());

    let final_match = t.final_match().unwrap().clone();
    let w = final_match.fighter_a.clone().unwrap();
    win(&mut t, final_match.id, &w);

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_ref().unwrap().id, w.id);
    assert_eq!(t.current_round, t.total_rounds);
    assert!(next_pending_match(&t).is_none());
}

#[test]
fn unpaired_second_round_slot_byes_through() {
    // 6 fighters: round 1 has 3 matches, round 2 has 2 but only 3 feeders.
    // The winner of round-1 match 2 has no sibling feeder and must bye
    // through round 2 straight into the final.
    let mut t = tournament(6);
    let m2 = t.brackets[0].matches[2].clone();
    let w2 = m2.fighter_a.clone().unwrap();
    win(&mut t, m2.id, &w2);

    let r2m1 = &t.brackets[1].matches[1];
    assert!(r2m1.is_bye());
    assert_eq!(r2m1.status, MatchStatus::Completed);
    assert_eq!(r2m1.winner.as_ref().unwrap().id, w2.id);
    assert!(r2m1.battle_log.is_empty());
    assert_eq!(t.final_match().unwrap().fighter_b.as_ref().unwrap().id, w2.id);
}

#[test]
fn five_fighter_bye_cascades_to_final_at_build_time() {
    // n=5: F4 is the round-1 bye; its round-2 slot also has no sibling
    // feeder, so F4 is already seeded into the final when the tournament is
    // created.
    let t = tournament(5);
    assert_eq!(t.total_rounds, 3);
    assert_eq!(
        t.final_match().unwrap().fighter_b.as_ref().unwrap().name,
        "F4"
    );
    assert_eq!(t.status, TournamentStatus::Setup);
}

#[test]
fn every_roster_size_plays_out_to_completion() {
    for n in 2..=9usize {
        let mut t = tournament(n);
        let mut resolved = 0;
        while let Some(next) = next_pending_match(&t) {
            let w = next.fighter_a.clone().unwrap();
            win(&mut t, next.id, &w);
            resolved += 1;
            assert!(resolved <= n, "too many matches for n={n}");
        }
        assert_eq!(t.status, TournamentStatus::Completed, "n={n}");
        assert!(t.winner.is_some(), "n={n}");
    }
}

#[test]
fn fighters_appear_in_at_most_one_match_per_round() {
    let mut t = tournament(8);
    while let Some(next) = next_pending_match(&t) {
        let w = next.fighter_b.clone().unwrap();
        win(&mut t, next.id, &w);
    }
    for bracket in &t.brackets {
        let mut seen = std::collections::HashSet::new();
        for m in &bracket.matches {
            if m.is_bye() {
                assert!(seen.insert(m.fighter_a.as_ref().unwrap().id));
                continue;
            }
            for f in [&m.fighter_a, &m.fighter_b].into_iter().flatten() {
                assert!(seen.insert(f.id), "duplicate fighter in round {}", bracket.round);
            }
        }
    }
}

#[test]
fn apply_result_rejects_invariant_violations() {
    let mut t = tournament(4);
    let m0 = t.brackets[0].matches[0].clone();
    let w = m0.fighter_a.clone().unwrap();
    let outsider = fighter("Outsider");

    // Winner must be one of the match's fighters.
    assert_eq!(
        apply_match_result(
            &mut t,
            m0.id,
            MatchOutcome {
                winner: Some(outsider.clone()),
                battle_log: Vec::new()
            }
        ),
        Err(TournamentError::WinnerNotInMatch(outsider.id))
    );

    // A drawn outcome is never accepted by the bracket.
    assert_eq!(
        apply_match_result(
            &mut t,
            m0.id,
            MatchOutcome {
                winner: None,
                battle_log: Vec::new()
            }
        ),
        Err(TournamentError::MatchNotDecided)
    );

    // Unknown match id.
    let bogus = uuid::Uuid::new_v4();
    assert_eq!(
        apply_match_result(
            &mut t,
            bogus,
            MatchOutcome {
                winner: Some(w.clone()),
                battle_log: Vec::new()
            }
        ),
        Err(TournamentError::MatchNotFound(bogus))
    );

    // A match with an undefined side is not executable.
    let final_id = t.final_match().unwrap().id;
    assert_eq!(
        apply_match_result(
            &mut t,
            final_id,
            MatchOutcome {
                winner: Some(w.clone()),
                battle_log: Vec::new()
            }
        ),
        Err(TournamentError::MatchMissingFighters(final_id))
    );

    // Re-applying to a completed match is rejected.
    win(&mut t, m0.id, &w);
    assert_eq!(
        apply_match_result(
            &mut t,
            m0.id,
            MatchOutcome {
                winner: Some(w),
                battle_log: Vec::new()
            }
        ),
        Err(TournamentError::MatchNotPending(m0.id))
    );
}
