//! Roster, match and round records exchanged with the session layer.

use serde::{Deserialize, Serialize};

pub type PlayerId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn other(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    Paused,
    Removed,
}

/// A roster entry. Owned by the caller; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Ordinal skill rating, 1 (beginner) to 5 (strongest)
    #[serde(default = "default_skill")]
    pub skill: u8,
    /// Only consulted by the gender-balanced policy
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub status: PlayerStatus,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub sit_out_count: u32,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    /// Round number at which the player arrived (late arrivals skip earlier rounds)
    #[serde(default = "default_joined_round")]
    pub joined_round: u32,
}

fn default_skill() -> u8 {
    3
}

fn default_joined_round() -> u32 {
    1
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill: default_skill(),
            gender: None,
            status: PlayerStatus::Active,
            games_played: 0,
            sit_out_count: 0,
            points: 0,
            wins: 0,
            losses: 0,
            joined_round: default_joined_round(),
        }
    }

    pub fn with_skill(mut self, skill: u8) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Whether the player is in the pool for the given round.
    pub fn is_available(&self, round_number: u32) -> bool {
        self.status == PlayerStatus::Active && self.joined_round <= round_number
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team_a: u32,
    pub team_b: u32,
}

/// One court's 2v2 game within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    /// 1-based court number
    pub court: u32,
    pub team_a: [PlayerId; 2],
    pub team_b: [PlayerId; 2],
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub score: Option<Score>,
}

impl Match {
    pub fn new(id: String, court: u32, team_a: [PlayerId; 2], team_b: [PlayerId; 2]) -> Self {
        Self {
            id,
            court,
            team_a,
            team_b,
            status: MatchStatus::Upcoming,
            score: None,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players().any(|p| p == id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Move an upcoming match onto the court. Returns false if it already started.
    pub fn start(&mut self) -> bool {
        if self.status != MatchStatus::Upcoming {
            return false;
        }
        self.status = MatchStatus::InProgress;
        true
    }

    /// Record the final score. A completed match keeps the score it was closed with.
    pub fn complete(&mut self, score: Score) -> bool {
        if self.status == MatchStatus::Completed {
            return false;
        }
        self.status = MatchStatus::Completed;
        self.score = Some(score);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number, unique within a schedule
    pub number: u32,
    pub matches: Vec<Match>,
    pub sitting_out: Vec<PlayerId>,
}

impl Round {
    pub fn new(number: u32, matches: Vec<Match>, sitting_out: Vec<PlayerId>) -> Self {
        Self {
            number,
            matches,
            sitting_out,
        }
    }

    /// A round is completed once it has matches and every one of them is finished.
    pub fn is_completed(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(Match::is_completed)
    }

    pub fn match_on_court(&self, court: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.court == court)
    }

    /// Ids of everyone assigned to a court this round.
    pub fn playing(&self) -> impl Iterator<Item = &PlayerId> {
        self.matches.iter().flat_map(Match::players)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
