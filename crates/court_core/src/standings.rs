//! Per-player results derived from played rounds.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Match, Player, PlayerId, Round};

/// What a schedule's completed rounds add up to for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub id: PlayerId,
    pub name: String,
    pub games_played: u32,
    pub sit_outs: u32,
    pub wins: u32,
    pub losses: u32,
    /// Sum of own-team scores
    pub points: u32,
}

impl PlayerTally {
    fn for_player(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            ..Default::default()
        }
    }

    /// Win percentage over decided games (0.0 when none were played)
    pub fn win_rate(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            return 0.0;
        }
        self.wins as f64 / decided as f64
    }
}

fn record_match(tallies: &mut HashMap<&str, PlayerTally>, m: &Match) {
    let Some(score) = m.score.filter(|_| m.is_completed()) else {
        return;
    };
    let sides = [
        (&m.team_a, score.team_a, score.team_b),
        (&m.team_b, score.team_b, score.team_a),
    ];
    for (team, own, other) in sides {
        for id in team {
            if let Some(t) = tallies.get_mut(id.as_str()) {
                t.games_played += 1;
                t.points += own;
                match own.cmp(&other) {
                    Ordering::Greater => t.wins += 1,
                    Ordering::Less => t.losses += 1,
                    Ordering::Equal => {}
                }
            }
        }
    }
}

/// Tally completed matches and sit-outs of completed rounds, in roster order.
pub fn tally(players: &[Player], schedule: &[Round]) -> Vec<PlayerTally> {
    let mut tallies: HashMap<&str, PlayerTally> = players
        .iter()
        .map(|p| (p.id.as_str(), PlayerTally::for_player(p)))
        .collect();

    for round in schedule {
        for m in &round.matches {
            record_match(&mut tallies, m);
        }
        if round.is_completed() {
            for id in &round.sitting_out {
                if let Some(t) = tallies.get_mut(id.as_str()) {
                    t.sit_outs += 1;
                }
            }
        }
    }

    players
        .iter()
        .filter_map(|p| tallies.remove(p.id.as_str()))
        .collect()
}

/// Leaderboard order: points, then wins, then name.
pub fn standings(mut tallies: Vec<PlayerTally>) -> Vec<PlayerTally> {
    tallies.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    tallies
}

/// New player records with one completed round's results added on top.
///
/// Rounds that are not completed leave the records unchanged. Records folded
/// this way are what [`History::from_rounds`](crate::history::History::from_rounds)
/// expects: it no longer counts games or sit-outs from completed rounds.
/// [`fold_completed`] applies every completed round of a schedule at once.
pub fn apply_round(players: &[Player], round: &Round) -> Vec<Player> {
    if !round.is_completed() {
        return players.to_vec();
    }
    let delta: HashMap<PlayerId, PlayerTally> = tally(players, std::slice::from_ref(round))
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect();
    players
        .iter()
        .map(|player| match delta.get(&player.id) {
            Some(d) => Player {
                games_played: player.games_played + d.games_played,
                sit_out_count: player.sit_out_count + d.sit_outs,
                wins: player.wins + d.wins,
                losses: player.losses + d.losses,
                points: player.points + d.points,
                ..player.clone()
            },
            None => player.clone(),
        })
        .collect()
}

/// Player records with every completed round of `schedule` applied, in round order.
pub fn fold_completed(players: &[Player], schedule: &[Round]) -> Vec<Player> {
    schedule
        .iter()
        .filter(|r| r.is_completed())
        .fold(players.to_vec(), |acc, round| apply_round(&acc, round))
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
