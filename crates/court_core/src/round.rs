//! Building one round: who plays, who shares a court, and the teams on it.
//!
//! For the diversity and skill policies the selected players are cut into
//! consecutive groups of four, one per court, and every group is paired. The
//! first attempt keeps the selection order; later attempts reshuffle, and the
//! attempt with the lowest total score is kept. It is a bounded randomized
//! search, so heavy repeat penalties are avoided in practice but optimality is
//! not guaranteed.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn};
use uuid::Builder;

use crate::config::{Policy, ScoringWeights, SessionConfig};
use crate::history::History;
use crate::pairing::{by_standings, Split};
use crate::selector::RestState;
use crate::types::{Gender, Match, Player, PlayerId, Round};

/// The matches and resters produced for one round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundOutcome {
    pub matches: Vec<Match>,
    pub sitting_out: Vec<PlayerId>,
}

impl RoundOutcome {
    fn everyone_sits(active: &[&Player]) -> Self {
        Self {
            matches: Vec::new(),
            sitting_out: active.iter().map(|p| p.id.clone()).collect(),
        }
    }

    pub fn into_round(self, number: u32) -> Round {
        Round::new(number, self.matches, self.sitting_out)
    }
}

/// Courts filled by one grouping attempt.
#[derive(Debug, Clone)]
struct CourtPlan<'a> {
    splits: Vec<Split<'a>>,
    total: u32,
}

impl<'a> CourtPlan<'a> {
    fn new(splits: Vec<Split<'a>>) -> Self {
        let total = splits.iter().map(|s| s.score).sum();
        Self { splits, total }
    }

    fn placed(&self) -> HashSet<&'a str> {
        self.splits
            .iter()
            .flat_map(|s| s.players())
            .map(|p| p.id.as_str())
            .collect()
    }
}

fn keep_lowest<'a>(best: &mut Option<CourtPlan<'a>>, plan: CourtPlan<'a>) {
    if best.as_ref().map_or(true, |b| plan.total < b.total) {
        *best = Some(plan);
    }
}

fn group_of_four<'a>(group: &[&'a Player]) -> [&'a Player; 4] {
    [group[0], group[1], group[2], group[3]]
}

pub(crate) fn new_match_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

pub(crate) fn match_from_split<R: Rng + ?Sized>(court: u32, split: &Split<'_>, rng: &mut R) -> Match {
    Match::new(
        new_match_id(rng),
        court,
        [split.team_a[0].id.clone(), split.team_a[1].id.clone()],
        [split.team_b[0].id.clone(), split.team_b[1].id.clone()],
    )
}

/// Generate the matches for `round_number`.
///
/// Fails closed: with fewer than four available players, or fewer than four
/// selected to play, no matches are produced and every available player sits.
pub fn generate_round_matchups<R: Rng + ?Sized>(
    players: &[Player],
    config: &SessionConfig,
    prior_rounds: &[Round],
    round_number: u32,
    rng: &mut R,
) -> RoundOutcome {
    let active: Vec<&Player> = players
        .iter()
        .filter(|p| p.is_available(round_number))
        .collect();
    if active.len() < 4 {
        debug!(
            round = round_number,
            active = active.len(),
            "not enough players for a match"
        );
        return RoundOutcome::everyone_sits(&active);
    }

    let history = History::from_rounds(players, prior_rounds);
    let rest = RestState::from_rounds(config.rest, prior_rounds, round_number);
    let selection = config
        .policy
        .select_players(&active, config.courts, &history, &rest, rng);
    if selection.playing.len() < 4 {
        debug!(
            round = round_number,
            selected = selection.playing.len(),
            "selection too small for a match"
        );
        return RoundOutcome::everyone_sits(&active);
    }

    let weights = &config.weights;
    let plan = match config.policy {
        Policy::Gender => plan_mixed(&selection.playing, config, &history, rng),
        policy if policy.seeds_round(round_number) => {
            plan_by_standings(&selection.playing, config.courts, &history, weights)
        }
        Policy::Ranked => {
            search_groupings(&selection.playing, Policy::Diversity, config, &history, rng)
        }
        policy => search_groupings(&selection.playing, policy, config, &history, rng),
    };

    let placed = plan.placed();
    let sitting_out: Vec<PlayerId> = active
        .iter()
        .filter(|p| !placed.contains(p.id.as_str()))
        .map(|p| p.id.clone())
        .collect();
    let matches: Vec<Match> = plan
        .splits
        .iter()
        .zip(1u32..)
        .map(|(split, court)| match_from_split(court, split, rng))
        .collect();

    debug!(
        round = round_number,
        policy = config.policy.name(),
        courts = matches.len(),
        sitting_out = sitting_out.len(),
        score = plan.total,
        "generated round"
    );
    RoundOutcome {
        matches,
        sitting_out,
    }
}

/// Largest multiple of four that fits on the courts, in selection order.
fn courts_worth<'s, 'a>(playing: &'s [&'a Player], courts: u32) -> &'s [&'a Player] {
    let keep = playing.len().min(courts as usize * 4) / 4 * 4;
    &playing[..keep]
}

/// Multi-attempt grouping search for the diversity and skill pairings.
fn search_groupings<'a, R: Rng + ?Sized>(
    playing: &[&'a Player],
    pairing: Policy,
    config: &SessionConfig,
    history: &History,
    rng: &mut R,
) -> CourtPlan<'a> {
    let mut order = courts_worth(playing, config.courts).to_vec();
    let attempts = config.search.attempts(pairing, order.len());
    let mut best: Option<CourtPlan<'a>> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            order.shuffle(rng);
        }
        let splits = order
            .chunks_exact(4)
            .map(|group| pairing.pair_four(group_of_four(group), history, &config.weights))
            .collect();
        let plan = CourtPlan::new(splits);
        trace!(attempt, total = plan.total, "grouping attempt");
        keep_lowest(&mut best, plan);

        if best.as_ref().is_some_and(|b| b.total == 0) {
            break;
        }
    }

    best.unwrap_or_else(|| CourtPlan::new(Vec::new()))
}

/// Ranked rounds after the first: rank the whole pool once and seed each court.
fn plan_by_standings<'a>(
    playing: &[&'a Player],
    courts: u32,
    history: &History,
    weights: &ScoringWeights,
) -> CourtPlan<'a> {
    let mut ranked = courts_worth(playing, courts).to_vec();
    ranked.sort_by(|a, b| by_standings(a, b));
    let splits = ranked
        .chunks_exact(4)
        .map(|group| Policy::Ranked.pair_four(group_of_four(group), history, weights))
        .collect();
    CourtPlan::new(splits)
}

/// Two men and two women per court while both lists last, then a best-effort
/// mixed-or-not group from whatever remains.
fn fill_mixed_courts<'a>(
    males: &[&'a Player],
    females: &[&'a Player],
    courts: u32,
    history: &History,
    weights: &ScoringWeights,
) -> CourtPlan<'a> {
    let courts = courts as usize;
    let mut splits = Vec::with_capacity(courts);
    let (mut m, mut f) = (0, 0);

    while splits.len() < courts && males.len() - m >= 2 && females.len() - f >= 2 {
        let four = [males[m], males[m + 1], females[f], females[f + 1]];
        splits.push(Policy::Gender.pair_four(four, history, weights));
        m += 2;
        f += 2;
    }

    let tail: Vec<&Player> = males[m..].iter().chain(&females[f..]).copied().collect();
    let open = (courts - splits.len()).min(tail.len() / 4);
    if open > 0 {
        warn!(courts = open, "not enough of one gender; filling remaining courts unmixed");
    }
    for group in tail.chunks_exact(4).take(open) {
        splits.push(Policy::Gender.pair_four(group_of_four(group), history, weights));
    }

    CourtPlan::new(splits)
}

fn plan_mixed<'a, R: Rng + ?Sized>(
    playing: &[&'a Player],
    config: &SessionConfig,
    history: &History,
    rng: &mut R,
) -> CourtPlan<'a> {
    let of = |gender: Gender| -> Vec<&'a Player> {
        playing
            .iter()
            .copied()
            .filter(|p| p.gender == Some(gender))
            .collect()
    };
    let (mut males, mut females) = (of(Gender::Male), of(Gender::Female));
    let attempts = config.search.attempts(Policy::Gender, playing.len());
    let mut best: Option<CourtPlan<'a>> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            males.shuffle(rng);
            females.shuffle(rng);
        }
        let plan = fill_mixed_courts(&males, &females, config.courts, history, &config.weights);
        trace!(attempt, total = plan.total, "mixed grouping attempt");
        keep_lowest(&mut best, plan);

        if best.as_ref().is_some_and(|b| b.total == 0) {
            break;
        }
    }

    best.unwrap_or_else(|| CourtPlan::new(Vec::new()))
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod round_tests;
