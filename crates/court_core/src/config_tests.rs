use super::*;

const SAMPLE: &str = r#"
[session]
courts = 2
rounds = 6
policy = "skill"
seed = 7
weights = "legacy"

[weights]
opponent = 6

[rest]
no_consecutive_sit_outs = true

[[players]]
id = "ana"
name = "Ana"
skill = 4
gender = "female"

[[players]]
id = "ben"
name = "Ben"
gender = "male"
joined_round = 3
"#;

#[test]
fn test_session_file_parses_and_applies_overrides() {
    let file = SessionFile::from_toml_str(SAMPLE).unwrap();
    let config = file.config();

    assert_eq!(config.courts, 2);
    assert_eq!(config.rounds, 6);
    assert_eq!(config.policy, Policy::Skill);
    assert_eq!(file.session.seed, Some(7));
    assert_eq!(config.weights.repeat_matchup, 8);
    assert_eq!(config.weights.opponent, 6);
    assert!(config.rest.no_consecutive_sit_outs);
    assert_eq!(config.rest.max_consecutive_games, None);
    assert_eq!(config.search, SearchBudget::default());

    assert_eq!(file.players.len(), 2);
    assert_eq!(file.players[1].skill, 3);
    assert_eq!(file.players[1].joined_round, 3);
}

#[test]
fn test_duplicate_player_ids_are_rejected() {
    let body = r#"
[session]
courts = 1
rounds = 1

[[players]]
id = "a"
name = "A"

[[players]]
id = "a"
name = "Also A"
"#;
    let err = SessionFile::from_toml_str(body).unwrap_err();
    assert!(matches!(err, SessionError::DuplicatePlayer(id) if id == "a"));
}

#[test]
fn test_zero_courts_is_invalid() {
    let config = SessionConfig::new(0, 4, Policy::Diversity);
    assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
}

#[test]
fn test_skill_out_of_range_is_invalid() {
    let body = r#"
[session]
courts = 1
rounds = 1

[[players]]
id = "a"
name = "A"
skill = 9
"#;
    assert!(SessionFile::from_toml_str(body).is_err());
}

#[test]
fn test_attempt_budget_scales_within_bounds() {
    let budget = SearchBudget::default();
    assert_eq!(budget.attempts(Policy::Diversity, 4), 5);
    assert_eq!(budget.attempts(Policy::Diversity, 24), 12);
    assert_eq!(budget.attempts(Policy::Diversity, 80), 20);
    assert_eq!(budget.attempts(Policy::Skill, 4), 10);
    assert_eq!(budget.attempts(Policy::Skill, 24), 18);
    assert_eq!(budget.attempts(Policy::Skill, 80), 30);
}

#[test]
fn test_policy_parses_aliases() {
    assert_eq!("mixed".parse::<Policy>().unwrap(), Policy::Gender);
    assert_eq!("Ranked".parse::<Policy>().unwrap(), Policy::Ranked);
    assert!("chaos".parse::<Policy>().is_err());
}
