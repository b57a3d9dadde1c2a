//! Multi-round schedule generation with played rounds kept fixed.
//!
//! A round is preserved verbatim if its number is below the regeneration
//! cutoff or if it is completed, whatever its number. Every other round up to
//! the configured count is generated afresh, seeing all preserved rounds plus
//! the rounds generated earlier in the same pass as its history.

use std::path::Path;

use rand::Rng;
use tracing::{debug, info};

use crate::config::{Policy, SessionConfig};
use crate::error::SessionError;
use crate::round::generate_round_matchups;
use crate::types::{Player, Round};

fn is_preserved(round: &Round, from_round: u32) -> bool {
    round.number < from_round || round.is_completed()
}

/// Build rounds `1..=config.rounds`, regenerating everything from `from_round`
/// onward that has not been completed.
///
/// Completed rounds numbered beyond `config.rounds` are carried along as well,
/// since results that were played are never discarded.
pub fn generate_schedule<R: Rng + ?Sized>(
    players: &[Player],
    config: &SessionConfig,
    existing: &[Round],
    from_round: u32,
    rng: &mut R,
) -> Vec<Round> {
    let mut schedule: Vec<Round> = existing
        .iter()
        .filter(|r| is_preserved(r, from_round))
        .filter(|r| r.number <= config.rounds || r.is_completed())
        .cloned()
        .collect();
    schedule.sort_by_key(|r| r.number);
    schedule.dedup_by_key(|r| r.number);
    let preserved = schedule.len();

    for number in 1..=config.rounds {
        if schedule.iter().any(|r| r.number == number) {
            continue;
        }
        let round =
            generate_round_matchups(players, config, &schedule, number, rng).into_round(number);
        debug!(
            round = number,
            matches = round.matches.len(),
            sitting_out = round.sitting_out.len(),
            "regenerated round"
        );
        let at = schedule.partition_point(|r| r.number < number);
        schedule.insert(at, round);
    }

    info!(
        rounds = schedule.len(),
        preserved,
        regenerated = schedule.len() - preserved,
        from_round,
        policy = config.policy.name(),
        "schedule generated"
    );
    schedule
}

/// Regenerate the not-yet-played future after a roster or configuration change.
pub fn regenerate_schedule<R: Rng + ?Sized>(
    players: &[Player],
    config: &SessionConfig,
    existing: &[Round],
    current_round: u32,
    rng: &mut R,
) -> Vec<Round> {
    generate_schedule(players, config, existing, current_round, rng)
}

/// Whether a ranked round's pairings cannot be known yet.
///
/// Seeding depends on results, so any ranked round after the first is
/// indeterminate until the round before it is fully completed.
pub fn is_round_indeterminate(policy: Policy, round_number: u32, schedule: &[Round]) -> bool {
    if !policy.seeds_round(round_number) {
        return false;
    }
    !schedule
        .iter()
        .find(|r| r.number == round_number - 1)
        .is_some_and(Round::is_completed)
}

/// The round currently being played: the first one that is not completed.
pub fn current_round(schedule: &[Round]) -> Option<u32> {
    schedule
        .iter()
        .find(|r| !r.is_completed())
        .map(|r| r.number)
}

pub fn load_schedule(path: &Path) -> Result<Vec<Round>, SessionError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
    let mut rounds: Vec<Round> = serde_json::from_str(&contents)?;
    rounds.sort_by_key(|r| r.number);
    Ok(rounds)
}

pub fn save_schedule(path: &Path, schedule: &[Round]) -> Result<(), SessionError> {
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(path, json).map_err(|e| SessionError::io(path, e))
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod schedule_tests;
