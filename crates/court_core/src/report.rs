//! Text summary of how well a schedule spreads partners and opponents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::history::{matchup_key, pair_key};
use crate::types::{Player, PlayerId, Round};

/// A pairing or foursome that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub players: Vec<PlayerId>,
    pub count: u32,
}

/// Repetition and sit-out counts for a whole schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub rounds: usize,
    pub matches: usize,
    pub repeated_partners: Vec<Repeat>,
    pub repeated_opponents: Vec<Repeat>,
    pub repeated_matchups: Vec<Repeat>,
    /// (name, rounds sat out) in roster order
    pub sit_outs: Vec<(String, u32)>,
}

fn repeats<K: Into<Vec<PlayerId>>>(counts: BTreeMap<K, u32>) -> Vec<Repeat> {
    let mut list: Vec<Repeat> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| Repeat {
            players: key.into(),
            count,
        })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count));
    list
}

impl ScheduleReport {
    pub fn from_schedule(players: &[Player], schedule: &[Round]) -> Self {
        let mut partners = BTreeMap::new();
        let mut opponents = BTreeMap::new();
        let mut matchups = BTreeMap::new();
        let mut sat: BTreeMap<&str, u32> = BTreeMap::new();
        let mut matches = 0;

        for round in schedule {
            for m in &round.matches {
                matches += 1;
                for team in [&m.team_a, &m.team_b] {
                    let (a, b) = pair_key(&team[0], &team[1]);
                    *partners.entry([a, b]).or_insert(0) += 1;
                }
                for a in &m.team_a {
                    for b in &m.team_b {
                        let (x, y) = pair_key(a, b);
                        *opponents.entry([x, y]).or_insert(0) += 1;
                    }
                }
                let [a1, a2] = &m.team_a;
                let [b1, b2] = &m.team_b;
                let key = matchup_key([a1.as_str(), a2.as_str(), b1.as_str(), b2.as_str()]);
                *matchups.entry(key).or_insert(0) += 1;
            }
            for id in &round.sitting_out {
                *sat.entry(id.as_str()).or_insert(0) += 1;
            }
        }

        Self {
            rounds: schedule.len(),
            matches,
            repeated_partners: repeats(partners),
            repeated_opponents: repeats(opponents),
            repeated_matchups: repeats(matchups),
            sit_outs: players
                .iter()
                .map(|p| (p.name.clone(), sat.get(p.id.as_str()).copied().unwrap_or(0)))
                .collect(),
        }
    }

    /// Render the report as plain text.
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "=== Schedule: {} rounds, {} matches ===\n\n",
            self.rounds, self.matches
        ));

        let sections = [
            ("Repeated partners", &self.repeated_partners),
            ("Repeated opponents", &self.repeated_opponents),
            ("Repeated matchups", &self.repeated_matchups),
        ];
        for (title, list) in sections {
            report.push_str(&format!("{title}: {}\n", list.len()));
            for repeat in list {
                report.push_str(&format!(
                    "  {:<40} x{}\n",
                    repeat.players.join(" / "),
                    repeat.count
                ));
            }
            report.push('\n');
        }

        report.push_str("Sit-outs:\n");
        report.push_str(&format!("{:<20} {:>5}\n", "Player", "Rounds"));
        report.push_str(&"-".repeat(26));
        report.push('\n');
        for (name, count) in &self.sit_outs {
            report.push_str(&format!("{name:<20} {count:>5}\n"));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Match;

    fn round(number: u32, a: [&str; 2], b: [&str; 2], out: &[&str]) -> Round {
        Round::new(
            number,
            vec![Match::new(
                format!("m{number}"),
                1,
                a.map(str::to_string),
                b.map(str::to_string),
            )],
            out.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn roster() -> Vec<Player> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| Player::new(*id, id.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_fresh_schedule_has_no_repeats() {
        let schedule = vec![
            round(1, ["a", "b"], ["c", "d"], &["e"]),
            round(2, ["a", "c"], ["b", "e"], &["d"]),
        ];

        let report = ScheduleReport::from_schedule(&roster(), &schedule);

        assert_eq!(report.rounds, 2);
        assert_eq!(report.matches, 2);
        assert!(report.repeated_partners.is_empty());
        assert!(report.repeated_matchups.is_empty());
        // a and d faced each other in round 1 only; b and c in both rounds
        assert_eq!(
            report.repeated_opponents,
            vec![Repeat {
                players: vec!["b".into(), "c".into()],
                count: 2
            }]
        );
        assert_eq!(report.sit_outs[3], ("D".to_string(), 1));
    }

    #[test]
    fn test_same_foursome_is_a_repeated_matchup() {
        let schedule = vec![
            round(1, ["a", "b"], ["c", "d"], &["e"]),
            round(2, ["b", "a"], ["d", "c"], &["e"]),
        ];

        let report = ScheduleReport::from_schedule(&roster(), &schedule);

        assert_eq!(report.repeated_partners.len(), 2);
        assert_eq!(report.repeated_matchups.len(), 1);
        assert_eq!(report.repeated_matchups[0].count, 2);
        assert_eq!(report.sit_outs[4], ("E".to_string(), 2));

        let text = report.generate_report();
        assert!(text.contains("Repeated matchups: 1"));
        assert!(text.contains("a / b / c / d"));
    }
}
