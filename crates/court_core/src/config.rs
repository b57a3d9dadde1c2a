//! Session configuration and the TOML session file.
//!
//! A session file carries everything the CLI needs to plan a session:
//!
//! ```toml
//! [session]
//! courts = 2
//! rounds = 6
//! policy = "skill"
//! seed = 7
//!
//! [rest]
//! no_consecutive_sit_outs = true
//!
//! [[players]]
//! id = "ana"
//! name = "Ana"
//! skill = 4
//! gender = "female"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::types::Player;

/// The matching strategy for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Free-for-all: maximize partner and opponent variety
    #[default]
    Diversity,
    /// Standings-seeded from round 2 on: top plays with bottom
    Ranked,
    /// Mixed doubles: one man and one woman per team
    Gender,
    /// Diversity with a small penalty for uneven team skill
    Skill,
}

impl Policy {
    pub fn name(self) -> &'static str {
        match self {
            Policy::Diversity => "diversity",
            Policy::Ranked => "ranked",
            Policy::Gender => "gender",
            Policy::Skill => "skill",
        }
    }
}

impl std::str::FromStr for Policy {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diversity" | "random" | "free" => Ok(Policy::Diversity),
            "ranked" | "standings" => Ok(Policy::Ranked),
            "gender" | "mixed" => Ok(Policy::Gender),
            "skill" | "balanced" => Ok(Policy::Skill),
            other => Err(SessionError::InvalidConfig(format!(
                "unknown policy `{other}`"
            ))),
        }
    }
}

/// Penalty constants used when scoring a 2v2 split. Lower totals are better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Per previous partnership of a same-team pair
    pub partner: u32,
    /// Per previous meeting of a cross-team pair
    pub opponent: u32,
    /// Flat penalty when the same four already shared a court
    pub repeat_matchup: u32,
    /// Per point of team skill difference (skill policy only)
    pub skill_balance: u32,
}

impl ScoringWeights {
    /// Repeat matchups are effectively forbidden unless nothing else is possible.
    pub const fn standard() -> Self {
        Self {
            partner: 10,
            opponent: 5,
            repeat_matchup: 1000,
            skill_balance: 2,
        }
    }

    /// Earlier tuning where a repeated foursome is only mildly discouraged.
    pub const fn legacy() -> Self {
        Self {
            partner: 10,
            opponent: 5,
            repeat_matchup: 8,
            skill_balance: 2,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPreset {
    #[default]
    Standard,
    Legacy,
}

impl WeightPreset {
    pub fn weights(self) -> ScoringWeights {
        match self {
            WeightPreset::Standard => ScoringWeights::standard(),
            WeightPreset::Legacy => ScoringWeights::legacy(),
        }
    }
}

/// Bounds on how many grouping attempts the round search makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub plain_min: usize,
    pub plain_max: usize,
    pub skill_min: usize,
    pub skill_max: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            plain_min: 5,
            plain_max: 20,
            skill_min: 10,
            skill_max: 30,
        }
    }
}

impl SearchBudget {
    /// Attempts for a pool of `pool` players; grows with the pool inside the bounds.
    pub fn attempts(&self, policy: Policy, pool: usize) -> usize {
        match policy {
            Policy::Skill => (pool * 3 / 4).clamp(self.skill_min, self.skill_max),
            _ => (pool / 2).clamp(self.plain_min, self.plain_max),
        }
        .max(1)
    }
}

/// Optional constraints on resting patterns. Both are off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestRules {
    /// A player who sat out last round plays this round when capacity allows
    pub no_consecutive_sit_outs: bool,
    /// A player who just played this many rounds in a row rests if possible
    pub max_consecutive_games: Option<u32>,
}

impl RestRules {
    pub fn is_active(&self) -> bool {
        self.no_consecutive_sit_outs || self.max_consecutive_games.is_some()
    }
}

/// Everything the engine needs besides the roster and the rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub courts: u32,
    pub rounds: u32,
    pub policy: Policy,
    pub weights: ScoringWeights,
    pub rest: RestRules,
    pub search: SearchBudget,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            courts: 2,
            rounds: 8,
            policy: Policy::Diversity,
            weights: ScoringWeights::standard(),
            rest: RestRules::default(),
            search: SearchBudget::default(),
        }
    }
}

impl SessionConfig {
    pub fn new(courts: u32, rounds: u32, policy: Policy) -> Self {
        Self {
            courts,
            rounds,
            policy,
            ..Default::default()
        }
    }

    /// Players that fit on all courts at once
    pub fn capacity(&self) -> usize {
        self.courts as usize * 4
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.courts == 0 {
            return Err(SessionError::InvalidConfig(
                "at least one court is required".to_string(),
            ));
        }
        if self.rounds == 0 {
            return Err(SessionError::InvalidConfig(
                "at least one round is required".to_string(),
            ));
        }
        if self.rest.max_consecutive_games == Some(0) {
            return Err(SessionError::InvalidConfig(
                "max_consecutive_games must be at least 1".to_string(),
            ));
        }
        let s = &self.search;
        if s.plain_min == 0 || s.plain_min > s.plain_max || s.skill_min == 0 || s.skill_min > s.skill_max {
            return Err(SessionError::InvalidConfig(format!(
                "search bounds must satisfy 1 <= min <= max (plain {}..{}, skill {}..{})",
                s.plain_min, s.plain_max, s.skill_min, s.skill_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    pub courts: u32,
    pub rounds: u32,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub weights: WeightPreset,
}

/// Per-constant overrides applied on top of the chosen preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightOverrides {
    pub partner: Option<u32>,
    pub opponent: Option<u32>,
    pub repeat_matchup: Option<u32>,
    pub skill_balance: Option<u32>,
}

impl WeightOverrides {
    fn apply(&self, mut weights: ScoringWeights) -> ScoringWeights {
        if let Some(v) = self.partner {
            weights.partner = v;
        }
        if let Some(v) = self.opponent {
            weights.opponent = v;
        }
        if let Some(v) = self.repeat_matchup {
            weights.repeat_matchup = v;
        }
        if let Some(v) = self.skill_balance {
            weights.skill_balance = v;
        }
        weights
    }
}

/// On-disk session description: configuration plus roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub session: SessionSection,
    #[serde(default)]
    pub weights: WeightOverrides,
    #[serde(default)]
    pub rest: RestRules,
    #[serde(default)]
    pub search: SearchBudget,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl SessionFile {
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        let file = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            players = file.players.len(),
            "loaded session file"
        );
        Ok(file)
    }

    /// Parse and validate a session file body.
    pub fn from_toml_str(contents: &str) -> Result<Self, SessionError> {
        let file: SessionFile = toml::from_str(contents)?;
        file.validate()?;
        Ok(file)
    }

    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            courts: self.session.courts,
            rounds: self.session.rounds,
            policy: self.session.policy,
            weights: self.weights.apply(self.session.weights.weights()),
            rest: self.rest,
            search: self.search,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.config().validate()?;

        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(player.id.as_str()) {
                return Err(SessionError::DuplicatePlayer(player.id.clone()));
            }
            if !(1..=5).contains(&player.skill) {
                return Err(SessionError::InvalidConfig(format!(
                    "player `{}` has skill {} (expected 1-5)",
                    player.id, player.skill
                )));
            }
            if player.joined_round == 0 {
                return Err(SessionError::InvalidConfig(format!(
                    "player `{}` has joined_round 0 (rounds start at 1)",
                    player.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
