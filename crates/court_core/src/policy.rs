//! Per-policy dispatch for selection, pairing and scoring.

use rand::Rng;

use crate::config::{Policy, ScoringWeights};
use crate::history::History;
use crate::pairing::{
    best_mixed_split, best_skill_split, best_split, diversity_score, seeded_split,
    skill_balanced_score, Split, Team,
};
use crate::selector::{select_by_gender, select_unconstrained, RestState, Selection};
use crate::types::Player;

impl Policy {
    /// Split the available pool into players and resters for one round.
    pub fn select_players<'a, R: Rng + ?Sized>(
        self,
        pool: &[&'a Player],
        courts: u32,
        history: &History,
        rest: &RestState,
        rng: &mut R,
    ) -> Selection<'a> {
        match self {
            Policy::Gender => select_by_gender(pool, courts, history, rest, rng),
            Policy::Diversity | Policy::Ranked | Policy::Skill => {
                select_unconstrained(pool, courts, history, rest, rng)
            }
        }
    }

    /// Score one candidate split. Lower is better.
    pub fn score_split(
        self,
        team_a: &Team<'_>,
        team_b: &Team<'_>,
        history: &History,
        weights: &ScoringWeights,
    ) -> u32 {
        match self {
            Policy::Skill => skill_balanced_score(team_a, team_b, history, weights),
            Policy::Diversity | Policy::Ranked | Policy::Gender => {
                diversity_score(team_a, team_b, history, weights)
            }
        }
    }

    /// Choose teams for four players sharing a court.
    pub fn pair_four<'a>(
        self,
        four: [&'a Player; 4],
        history: &History,
        weights: &ScoringWeights,
    ) -> Split<'a> {
        match self {
            Policy::Diversity => best_split(four, history, weights),
            Policy::Skill => best_skill_split(four, history, weights),
            Policy::Ranked => seeded_split(four, history, weights),
            Policy::Gender => best_mixed_split(four, history, weights)
                .unwrap_or_else(|| best_split(four, history, weights)),
        }
    }

    /// Ranked sessions seed from standings once there are results to seed from.
    pub fn seeds_round(self, round_number: u32) -> bool {
        self == Policy::Ranked && round_number > 1
    }
}
