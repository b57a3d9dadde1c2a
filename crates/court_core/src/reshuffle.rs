//! Replacing a single court's match on demand.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::history::History;
use crate::round::match_from_split;
use crate::types::{Match, Player, PlayerId, Round};

/// Build a fresh match for `court` from the first four candidates.
///
/// The caller filters `candidate_pool` down to players free this round. Ids
/// that are not on the roster are skipped. Returns `None` when fewer than four
/// candidates remain.
pub fn reshuffle_match<R: Rng + ?Sized>(
    players: &[Player],
    config: &SessionConfig,
    candidate_pool: &[PlayerId],
    court: u32,
    prior_rounds: &[Round],
    rng: &mut R,
) -> Option<Match> {
    let mut four: Vec<&Player> = Vec::with_capacity(4);
    for id in candidate_pool {
        match players.iter().find(|p| &p.id == id) {
            Some(player) if !four.iter().any(|p| p.id == player.id) => four.push(player),
            Some(_) => {}
            None => warn!(player = %id, "reshuffle candidate is not on the roster"),
        }
        if four.len() == 4 {
            break;
        }
    }
    if four.len() < 4 {
        debug!(court, candidates = four.len(), "not enough candidates to reshuffle");
        return None;
    }

    let history = History::from_rounds(players, prior_rounds);
    let split = config
        .policy
        .pair_four([four[0], four[1], four[2], four[3]], &history, &config.weights);
    debug!(court, score = split.score, "reshuffled court");
    Some(match_from_split(court, &split, rng))
}

#[cfg(test)]
#[path = "reshuffle_tests.rs"]
mod reshuffle_tests;
