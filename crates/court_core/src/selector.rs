//! Deciding who plays and who sits out in a round.
//!
//! Players are ordered by fairness: fewest games first, then most sit-outs,
//! then a random tie-break. When rest rules are enabled, a rest tier is put in
//! front of that ordering so that must-play players come first and must-rest
//! players come last.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::RestRules;
use crate::history::History;
use crate::types::{Gender, Player, PlayerId, Round};

/// Result of splitting a pool into players and resters.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    /// In fairness order; earlier entries had the stronger claim to a court
    pub playing: Vec<&'a Player>,
    pub sitting_out: Vec<&'a Player>,
}

/// Recent resting pattern of each player, relative to the round being planned.
#[derive(Debug, Clone, Default)]
pub struct RestState {
    rules: RestRules,
    sat_out_last: HashSet<PlayerId>,
    streaks: HashMap<PlayerId, u32>,
}

impl RestState {
    pub fn from_rounds(rules: RestRules, rounds: &[Round], round_number: u32) -> Self {
        let mut state = Self {
            rules,
            ..Default::default()
        };
        if !rules.is_active() || round_number <= 1 {
            return state;
        }

        let mut prior: Vec<&Round> = rounds.iter().filter(|r| r.number < round_number).collect();
        prior.sort_by_key(|r| Reverse(r.number));

        let mut expected = round_number - 1;
        let mut streaking: Option<HashSet<PlayerId>> = None;
        for round in prior {
            if round.number != expected {
                break;
            }
            if round.number == round_number - 1 {
                state.sat_out_last.extend(round.sitting_out.iter().cloned());
            }

            let playing: HashSet<PlayerId> = round.playing().cloned().collect();
            let still = match streaking {
                None => playing,
                Some(prev) => prev.intersection(&playing).cloned().collect(),
            };
            if still.is_empty() {
                break;
            }
            for id in &still {
                *state.streaks.entry(id.clone()).or_insert(0) += 1;
            }
            streaking = Some(still);

            expected -= 1;
            if expected == 0 {
                break;
            }
        }

        state
    }

    /// Consecutive rounds the player has just played, counting back from the previous round.
    pub fn streak(&self, id: &str) -> u32 {
        self.streaks.get(id).copied().unwrap_or(0)
    }

    pub fn sat_out_last(&self, id: &str) -> bool {
        self.sat_out_last.contains(id)
    }

    /// 0 = must play, 1 = normal, 2 = must rest.
    fn tier(&self, id: &str) -> u8 {
        if self.rules.no_consecutive_sit_outs && self.sat_out_last(id) {
            return 0;
        }
        match self.rules.max_consecutive_games {
            Some(limit) if self.streak(id) >= limit => 2,
            _ => 1,
        }
    }
}

/// Order a pool so that the players with the best claim to a court come first.
pub fn fairness_order<'a, R: Rng + ?Sized>(
    pool: &[&'a Player],
    history: &History,
    rest: &RestState,
    rng: &mut R,
) -> Vec<&'a Player> {
    let mut ordered = pool.to_vec();
    // Shuffle first so the stable sort leaves full ties in random order
    ordered.shuffle(rng);
    ordered.sort_by_key(|p| {
        (
            rest.tier(&p.id),
            history.effective_games(p),
            Reverse(history.sit_out_count(&p.id)),
        )
    });
    ordered
}

/// Fill `courts × 4` slots in fairness order; everyone else sits out.
pub fn select_unconstrained<'a, R: Rng + ?Sized>(
    pool: &[&'a Player],
    courts: u32,
    history: &History,
    rest: &RestState,
    rng: &mut R,
) -> Selection<'a> {
    let mut ordered = fairness_order(pool, history, rest, rng);
    let capacity = courts as usize * 4;
    if ordered.len() <= capacity {
        return Selection {
            playing: ordered,
            sitting_out: Vec::new(),
        };
    }
    let sitting_out = ordered.split_off(capacity);
    Selection {
        playing: ordered,
        sitting_out,
    }
}

/// Take `courts × 2` from each gender pool independently.
///
/// Players without a gender marker cannot be placed in a mixed team and sit out.
pub fn select_by_gender<'a, R: Rng + ?Sized>(
    pool: &[&'a Player],
    courts: u32,
    history: &History,
    rest: &RestState,
    rng: &mut R,
) -> Selection<'a> {
    let per_gender = courts as usize * 2;
    let mut selection = Selection::default();

    for gender in [Gender::Male, Gender::Female] {
        let group: Vec<&Player> = pool
            .iter()
            .copied()
            .filter(|p| p.gender == Some(gender))
            .collect();
        let mut ordered = fairness_order(&group, history, rest, rng);
        let rest_of_group = ordered.split_off(per_gender.min(ordered.len()));
        selection.playing.extend(ordered);
        selection.sitting_out.extend(rest_of_group);
    }

    selection
        .sitting_out
        .extend(pool.iter().copied().filter(|p| p.gender.is_none()));
    selection
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod selector_tests;
