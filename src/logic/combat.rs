//! Combat resolution: simulate a match between two fighters round by round.

use crate::models::{BattleLogEntry, Fighter};
use rand::Rng;

/// Maximum simulated rounds before a match goes to the tie-break.
pub const MAX_ROUNDS: u32 = 6;

/// Source of random integers, injectable so tests can script exact rolls.
pub trait RandomSource {
    /// Uniform random integer in [min, max], both inclusive.
    fn next_int(&mut self, min: i32, max: i32) -> i32;
}

/// Default source backed by the thread-local RNG (non-seeded).
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_int(&mut self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Result of resolving one match: the winner and the per-round battle log.
///
/// `resolve_match` always produces a winner (the tie-break cannot end even),
/// but the winner stays optional because external resolvers behind the same
/// contract may report a draw, which the engine rejects.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchOutcome {
    pub winner: Option<Fighter>,
    pub battle_log: Vec<BattleLogEntry>,
}

/// Simulate a full match to a winner.
///
/// Each round both fighters act; initiative alternates by round parity (odd
/// rounds: fighter A first). Damage is d20 + strength against the opponent's
/// defense, floored at zero, with a luck/40 chance for the target to dodge.
/// Both damages land simultaneously and health never drops below zero. The
/// match ends on a knockout or after `MAX_ROUNDS` rounds.
///
/// Exactly four random draws happen per round, in a fixed order (attacker
/// roll, defender roll, defender dodge check, attacker dodge check), so
/// scripted sources replay exactly.
pub fn resolve_match(
    fighter_a: &Fighter,
    fighter_b: &Fighter,
    rng: &mut dyn RandomSource,
) -> MatchOutcome {
    let mut health_a = fighter_a.stats.health.max(0);
    let mut health_b = fighter_b.stats.health.max(0);
    let mut battle_log = Vec::new();

    for round in 1..=MAX_ROUNDS {
        let a_first = round % 2 == 1;
        let (attacker, defender) = if a_first {
            (fighter_a, fighter_b)
        } else {
            (fighter_b, fighter_a)
        };

        let attacker_roll = rng.next_int(1, 20) + attacker.stats.strength;
        let defender_roll = rng.next_int(1, 20) + defender.stats.strength;

        let mut attacker_damage = (attacker_roll - defender.stats.defense).max(0);
        let mut defender_damage = (defender_roll - attacker.stats.defense).max(0);

        // Each side dodges incoming damage with probability luck / 40.
        if rng.next_int(1, 40) <= defender.stats.luck {
            attacker_damage = 0;
        }
        if rng.next_int(1, 40) <= attacker.stats.luck {
            defender_damage = 0;
        }

        let (damage_to_a, damage_to_b) = if a_first {
            (defender_damage, attacker_damage)
        } else {
            (attacker_damage, defender_damage)
        };
        health_a = (health_a - damage_to_a).max(0);
        health_b = (health_b - damage_to_b).max(0);

        let (attacker_health, defender_health) = if a_first {
            (health_a, health_b)
        } else {
            (health_b, health_a)
        };
        battle_log.push(BattleLogEntry {
            round,
            attacker: attacker.id,
            defender: defender.id,
            attacker_damage,
            defender_damage,
            attacker_health,
            defender_health,
            commentary: None,
        });

        if health_a == 0 || health_b == 0 {
            break;
        }
    }

    let winner = decide_winner(fighter_a, fighter_b, health_a, health_b, rng);
    MatchOutcome {
        winner: Some(winner.clone()),
        battle_log,
    }
}

/// Pick the winner from the end-of-match health totals.
///
/// A knockout decides outright. Otherwise (round cap reached, or a double
/// knockout) the higher remaining-health fraction wins; exactly equal
/// fractions go to a single d20 + agility roll-off, and a tied roll-off to a
/// coin flip. The tie-break adds no battle log entries.
fn decide_winner<'a>(
    fighter_a: &'a Fighter,
    fighter_b: &'a Fighter,
    health_a: i32,
    health_b: i32,
    rng: &mut dyn RandomSource,
) -> &'a Fighter {
    match (health_a == 0, health_b == 0) {
        (true, false) => return fighter_b,
        (false, true) => return fighter_a,
        _ => {}
    }

    let fraction_a = health_a as f64 / fighter_a.stats.max_health.max(1) as f64;
    let fraction_b = health_b as f64 / fighter_b.stats.max_health.max(1) as f64;
    if fraction_a > fraction_b {
        return fighter_a;
    }
    if fraction_b > fraction_a {
        return fighter_b;
    }

    let roll_a = rng.next_int(1, 20) + fighter_a.stats.agility;
    let roll_b = rng.next_int(1, 20) + fighter_b.stats.agility;
    if roll_a > roll_b {
        fighter_a
    } else if roll_b > roll_a {
        fighter_b
    } else if rng.next_int(0, 1) == 0 {
        fighter_a
    } else {
        fighter_b
    }
}
