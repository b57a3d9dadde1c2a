//! Round and matchup scheduling for social doubles sessions.
//!
//! Given a roster, a number of courts and a pairing policy, the engine decides
//! who plays and who sits out each round, groups players into foursomes and
//! splits each foursome into two teams. All randomness comes from a
//! caller-supplied `rand::Rng`, so a seeded generator reproduces a schedule
//! exactly.

pub mod config;
pub mod error;
pub mod history;
pub mod pairing;
pub mod policy;
pub mod report;
pub mod reshuffle;
pub mod round;
pub mod schedule;
pub mod selector;
pub mod standings;
pub mod types;
pub mod validation;

pub use config::*;
pub use error::SessionError;
pub use history::History;
pub use report::ScheduleReport;
pub use reshuffle::reshuffle_match;
pub use round::{generate_round_matchups, RoundOutcome};
pub use schedule::*;
pub use standings::{apply_round, fold_completed, standings, tally, PlayerTally};
pub use types::*;
pub use validation::validate_gender_balance;
