//! Pre-flight checks a caller runs before starting a session.

use crate::types::{Gender, Player, PlayerStatus};

/// Minimum active players of each gender for mixed doubles.
pub const MIN_PER_GENDER: usize = 2;

/// Check that a gender-balanced session can be started.
///
/// Returns a message suitable for showing to the organiser as-is when fewer
/// than two active men or two active women are on the roster.
pub fn validate_gender_balance(players: &[Player]) -> Option<String> {
    let count = |gender: Gender| {
        players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active && p.gender == Some(gender))
            .count()
    };
    let males = count(Gender::Male);
    let females = count(Gender::Female);

    if males >= MIN_PER_GENDER && females >= MIN_PER_GENDER {
        return None;
    }
    Some(format!(
        "Mixed doubles needs at least {MIN_PER_GENDER} active male and {MIN_PER_GENDER} active \
         female players (currently {males} male, {females} female)."
    ))
}
