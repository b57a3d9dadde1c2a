//! Aggregated pairing history over previously scheduled rounds.
//!
//! Every lookup is order independent: a pair is keyed by its two ids in sorted
//! order and a matchup by all four ids sorted, so `(a, b)` and `(b, a)` share a
//! counter and a foursome is recognised regardless of how it was split.

use std::collections::{HashMap, HashSet};

use crate::types::{Player, PlayerId, Round};

pub type PairKey = (PlayerId, PlayerId);
pub type MatchupKey = [PlayerId; 4];

pub fn pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub fn matchup_key(ids: [&str; 4]) -> MatchupKey {
    let mut sorted = ids;
    sorted.sort_unstable();
    sorted.map(str::to_string)
}

/// Counts derived from prior rounds, used for scoring splits and picking who sits.
#[derive(Debug, Clone, Default)]
pub struct History {
    partners: HashMap<PairKey, u32>,
    opponents: HashMap<PairKey, u32>,
    matchups: HashSet<MatchupKey>,
    sit_outs: HashMap<PlayerId, u32>,
    /// Appearances in matches that are scheduled but not yet completed
    scheduled_games: HashMap<PlayerId, u32>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the lookups from the roster (for persisted sit-out counts) and the
    /// rounds treated as prior context.
    ///
    /// The roster's `games_played` and `sit_out_count` are taken to already
    /// include every completed round (see [`crate::standings::apply_round`]), so
    /// only unfinished matches and rounds add to them here. Pairing counters
    /// cover every round.
    pub fn from_rounds(players: &[Player], rounds: &[Round]) -> Self {
        let mut history = Self::new();

        for player in players {
            history
                .sit_outs
                .insert(player.id.clone(), player.sit_out_count);
        }

        for round in rounds {
            for m in &round.matches {
                let [a1, a2] = &m.team_a;
                let [b1, b2] = &m.team_b;

                *history.partners.entry(pair_key(a1, a2)).or_insert(0) += 1;
                *history.partners.entry(pair_key(b1, b2)).or_insert(0) += 1;

                for a in &m.team_a {
                    for b in &m.team_b {
                        *history.opponents.entry(pair_key(a, b)).or_insert(0) += 1;
                    }
                }

                history
                    .matchups
                    .insert(matchup_key([a1.as_str(), a2.as_str(), b1.as_str(), b2.as_str()]));

                if !m.is_completed() {
                    for id in m.players() {
                        *history.scheduled_games.entry(id.clone()).or_insert(0) += 1;
                    }
                }
            }

            if !round.is_completed() {
                for id in &round.sitting_out {
                    *history.sit_outs.entry(id.clone()).or_insert(0) += 1;
                }
            }
        }

        history
    }

    pub fn partner_count(&self, a: &str, b: &str) -> u32 {
        self.partners.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn opponent_count(&self, a: &str, b: &str) -> u32 {
        self.opponents.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Whether these four players have shared a court before, in any split.
    pub fn has_matchup(&self, ids: [&str; 4]) -> bool {
        self.matchups.contains(&matchup_key(ids))
    }

    pub fn sit_out_count(&self, id: &str) -> u32 {
        self.sit_outs.get(id).copied().unwrap_or(0)
    }

    pub fn scheduled_games(&self, id: &str) -> u32 {
        self.scheduled_games.get(id).copied().unwrap_or(0)
    }

    /// Persisted games plus games already scheduled in the context rounds.
    pub fn effective_games(&self, player: &Player) -> u32 {
        player.games_played + self.scheduled_games(&player.id)
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
