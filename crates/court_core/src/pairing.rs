//! Choosing the 2v2 split for four players sharing a court.
//!
//! Four players A, B, C, D can be split three ways: AB|CD, AC|BD and AD|BC.
//! Each candidate is scored against the history and the lowest score wins,
//! with ties going to the earlier candidate in that order.

use std::cmp::Ordering;

use crate::config::ScoringWeights;
use crate::history::History;
use crate::types::{Gender, Player};

pub type Team<'a> = [&'a Player; 2];

/// A chosen split together with the score it was picked on.
#[derive(Debug, Clone, Copy)]
pub struct Split<'a> {
    pub team_a: Team<'a>,
    pub team_b: Team<'a>,
    pub score: u32,
}

impl<'a> Split<'a> {
    pub fn players(&self) -> [&'a Player; 4] {
        [self.team_a[0], self.team_a[1], self.team_b[0], self.team_b[1]]
    }
}

/// The three distinct splits of four players, in canonical order.
pub fn candidate_splits<'a>(four: [&'a Player; 4]) -> [(Team<'a>, Team<'a>); 3] {
    let [a, b, c, d] = four;
    [([a, b], [c, d]), ([a, c], [b, d]), ([a, d], [b, c])]
}

/// Repeat penalties: partnerships, oppositions and an already-seen foursome.
pub fn diversity_score(
    team_a: &Team<'_>,
    team_b: &Team<'_>,
    history: &History,
    weights: &ScoringWeights,
) -> u32 {
    let mut score = weights.partner * history.partner_count(&team_a[0].id, &team_a[1].id)
        + weights.partner * history.partner_count(&team_b[0].id, &team_b[1].id);

    for a in team_a {
        for b in team_b {
            score += weights.opponent * history.opponent_count(&a.id, &b.id);
        }
    }

    let four = [
        team_a[0].id.as_str(),
        team_a[1].id.as_str(),
        team_b[0].id.as_str(),
        team_b[1].id.as_str(),
    ];
    if history.has_matchup(four) {
        score += weights.repeat_matchup;
    }
    score
}

pub fn skill_gap(team_a: &Team<'_>, team_b: &Team<'_>) -> u32 {
    let sum = |t: &Team<'_>| t[0].skill as i32 + t[1].skill as i32;
    (sum(team_a) - sum(team_b)).unsigned_abs()
}

/// Diversity score plus a light penalty on uneven teams, so skill only settles near-ties.
pub fn skill_balanced_score(
    team_a: &Team<'_>,
    team_b: &Team<'_>,
    history: &History,
    weights: &ScoringWeights,
) -> u32 {
    diversity_score(team_a, team_b, history, weights)
        + weights.skill_balance * skill_gap(team_a, team_b)
}

fn consider<'a>(best: &mut Option<Split<'a>>, team_a: Team<'a>, team_b: Team<'a>, score: u32) {
    if best.as_ref().map_or(true, |b| score < b.score) {
        *best = Some(Split {
            team_a,
            team_b,
            score,
        });
    }
}

fn lowest<'a, F>(four: [&'a Player; 4], mut score: F) -> Split<'a>
where
    F: FnMut(&Team<'a>, &Team<'a>) -> u32,
{
    let [first, second, third] = candidate_splits(four);
    let mut best = Split {
        team_a: first.0,
        team_b: first.1,
        score: score(&first.0, &first.1),
    };
    for (team_a, team_b) in [second, third] {
        let s = score(&team_a, &team_b);
        if s < best.score {
            best = Split {
                team_a,
                team_b,
                score: s,
            };
        }
    }
    best
}

/// Best of the three splits under the plain diversity score.
pub fn best_split<'a>(four: [&'a Player; 4], history: &History, weights: &ScoringWeights) -> Split<'a> {
    lowest(four, |x, y| diversity_score(x, y, history, weights))
}

/// Best of the three splits with the skill-balance term added.
pub fn best_skill_split<'a>(
    four: [&'a Player; 4],
    history: &History,
    weights: &ScoringWeights,
) -> Split<'a> {
    lowest(four, |x, y| skill_balanced_score(x, y, history, weights))
}

fn is_mixed(team: &Team<'_>) -> bool {
    matches!(
        (team[0].gender, team[1].gender),
        (Some(g1), Some(g2)) if g1 == g2.other()
    )
}

/// Whether four players are exactly two men and two women.
pub fn is_gender_balanced(four: &[&Player; 4]) -> bool {
    let males = four.iter().filter(|p| p.gender == Some(Gender::Male)).count();
    let females = four.iter().filter(|p| p.gender == Some(Gender::Female)).count();
    males == 2 && females == 2
}

/// Best split where each team has one man and one woman.
///
/// Returns `None` when the four are not two of each; callers fall back to
/// [`best_split`].
pub fn best_mixed_split<'a>(
    four: [&'a Player; 4],
    history: &History,
    weights: &ScoringWeights,
) -> Option<Split<'a>> {
    if !is_gender_balanced(&four) {
        return None;
    }
    let mut best = None;
    for (team_a, team_b) in candidate_splits(four) {
        if is_mixed(&team_a) && is_mixed(&team_b) {
            let s = diversity_score(&team_a, &team_b, history, weights);
            consider(&mut best, team_a, team_b, s);
        }
    }
    best
}

/// Standings order: points descending, then wins descending, then id.
pub fn by_standings(a: &Player, b: &Player) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.id.cmp(&b.id))
}

/// Top plays with bottom: rank 1 and 4 against rank 2 and 3. No search.
pub fn seeded_split<'a>(four: [&'a Player; 4], history: &History, weights: &ScoringWeights) -> Split<'a> {
    let mut ranked = four;
    ranked.sort_by(|a, b| by_standings(a, b));
    let [first, second, third, fourth] = ranked;
    let team_a = [first, fourth];
    let team_b = [second, third];
    let score = diversity_score(&team_a, &team_b, history, weights);
    Split {
        team_a,
        team_b,
        score,
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
