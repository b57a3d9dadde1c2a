use super::*;
use crate::pairing::candidate_splits;
use crate::types::{PlayerStatus, Score};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
        .collect()
}

fn mixed_roster(males: usize, females: usize) -> Vec<Player> {
    let mut players = Vec::new();
    for i in 0..males {
        players.push(Player::new(format!("m{i}"), format!("Man {i}")).with_gender(Gender::Male));
    }
    for i in 0..females {
        players.push(Player::new(format!("f{i}"), format!("Woman {i}")).with_gender(Gender::Female));
    }
    players
}

fn assert_partition(players: &[Player], outcome: &RoundOutcome, round_number: u32) {
    let mut seen = HashSet::new();
    for m in &outcome.matches {
        let ids: HashSet<&PlayerId> = m.players().collect();
        assert_eq!(ids.len(), 4, "match {m:?} repeats a player");
        for id in m.players() {
            assert!(seen.insert(id.clone()), "{id} plays twice");
        }
    }
    for id in &outcome.sitting_out {
        assert!(seen.insert(id.clone()), "{id} both plays and sits");
    }
    let active: HashSet<PlayerId> = players
        .iter()
        .filter(|p| p.is_available(round_number))
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(seen, active);
}

fn by_id<'a>(players: &'a [Player], id: &str) -> &'a Player {
    players.iter().find(|p| p.id == id).unwrap()
}

#[test]
fn test_nine_players_two_courts() {
    let players = roster(9);
    let config = SessionConfig::new(2, 4, Policy::Diversity);
    let mut rng = StdRng::seed_from_u64(42);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.sitting_out.len(), 1);
    assert_eq!(outcome.matches[0].court, 1);
    assert_eq!(outcome.matches[1].court, 2);
    assert_partition(&players, &outcome, 1);
}

#[test]
fn test_most_played_player_sits() {
    let mut players = roster(9);
    players[4].games_played = 3;
    for (i, p) in players.iter_mut().enumerate() {
        if i != 4 {
            p.games_played = 2;
        }
    }
    let config = SessionConfig::new(2, 4, Policy::Diversity);
    let mut rng = StdRng::seed_from_u64(7);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    assert_eq!(outcome.sitting_out, vec!["p4".to_string()]);
}

#[test]
fn test_too_few_players_fail_closed() {
    let players = roster(3);
    let config = SessionConfig::new(1, 1, Policy::Diversity);
    let mut rng = StdRng::seed_from_u64(1);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.sitting_out.len(), 3);
}

#[test]
fn test_inactive_and_late_players_are_left_out() {
    let mut players = roster(6);
    players[0].status = PlayerStatus::Paused;
    players[1].status = PlayerStatus::Removed;
    players[2].joined_round = 2;
    let config = SessionConfig::new(2, 2, Policy::Diversity);
    let mut rng = StdRng::seed_from_u64(5);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    // Only three available in round 1
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.sitting_out, vec!["p3", "p4", "p5"]);

    let outcome = generate_round_matchups(&players, &config, &[], 2, &mut rng);
    assert_eq!(outcome.matches.len(), 1);
    assert_partition(&players, &outcome, 2);
}

#[test]
fn test_short_group_is_dropped_not_padded() {
    let players = roster(7);
    let config = SessionConfig::new(2, 1, Policy::Diversity);
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.sitting_out.len(), 3);
    assert_partition(&players, &outcome, 1);
}

#[test]
fn test_same_seed_same_round() {
    let players = roster(14);
    let config = SessionConfig::new(3, 4, Policy::Skill);

    let first = generate_round_matchups(&players, &config, &[], 1, &mut StdRng::seed_from_u64(99));
    let second = generate_round_matchups(&players, &config, &[], 1, &mut StdRng::seed_from_u64(99));

    assert_eq!(first, second);
}

#[test]
fn test_every_court_uses_its_best_split() {
    let mut players = roster(12);
    for (i, p) in players.iter_mut().enumerate() {
        p.skill = (i % 5) as u8 + 1;
    }
    let mut rng = StdRng::seed_from_u64(17);

    for policy in [Policy::Diversity, Policy::Skill] {
        let config = SessionConfig::new(3, 4, policy);
        let mut prior = Vec::new();
        for n in 1..=4 {
            let outcome = generate_round_matchups(&players, &config, &prior, n, &mut rng);
            let history = History::from_rounds(&players, &prior);
            for m in &outcome.matches {
                let team_a = [by_id(&players, &m.team_a[0]), by_id(&players, &m.team_a[1])];
                let team_b = [by_id(&players, &m.team_b[0]), by_id(&players, &m.team_b[1])];
                let chosen = policy.score_split(&team_a, &team_b, &history, &config.weights);
                let four = [team_a[0], team_a[1], team_b[0], team_b[1]];
                for (x, y) in candidate_splits(four) {
                    assert!(chosen <= policy.score_split(&x, &y, &history, &config.weights));
                }
            }
            prior.push(outcome.into_round(n));
        }
    }
}

#[test]
fn test_search_avoids_repeating_a_foursome() {
    let players = roster(8);
    let config = SessionConfig::new(2, 2, Policy::Diversity);
    let first = Round::new(
        1,
        vec![
            Match::new(
                "a".into(),
                1,
                ["p0".into(), "p1".into()],
                ["p2".into(), "p3".into()],
            ),
            Match::new(
                "b".into(),
                2,
                ["p4".into(), "p5".into()],
                ["p6".into(), "p7".into()],
            ),
        ],
        Vec::new(),
    );
    let prior = vec![first];
    let history = History::from_rounds(&players, &prior);
    let mut rng = StdRng::seed_from_u64(2024);

    let outcome = generate_round_matchups(&players, &config, &prior, 2, &mut rng);

    for m in &outcome.matches {
        let ids: Vec<&str> = m.players().map(String::as_str).collect();
        assert!(!history.has_matchup([ids[0], ids[1], ids[2], ids[3]]));
    }
}

#[test]
fn test_ranked_round_two_seeds_by_standings() {
    let mut players = roster(4);
    for (p, points) in players.iter_mut().zip([15, 30, 20, 25]) {
        p.points = points;
    }
    let config = SessionConfig::new(1, 3, Policy::Ranked);
    let mut rng = StdRng::seed_from_u64(8);

    let outcome = generate_round_matchups(&players, &config, &[], 2, &mut rng);

    let m = &outcome.matches[0];
    assert_eq!(m.team_a, ["p1".to_string(), "p0".to_string()]);
    assert_eq!(m.team_b, ["p3".to_string(), "p2".to_string()]);
}

#[test]
fn test_ranked_courts_follow_rank_order() {
    let mut players = roster(8);
    for (i, p) in players.iter_mut().enumerate() {
        p.points = 100 - i as u32 * 10;
    }
    let config = SessionConfig::new(2, 3, Policy::Ranked);
    let mut rng = StdRng::seed_from_u64(8);

    let outcome = generate_round_matchups(&players, &config, &[], 3, &mut rng);

    let court1: HashSet<&str> = outcome.matches[0].players().map(String::as_str).collect();
    assert_eq!(court1, HashSet::from(["p0", "p1", "p2", "p3"]));
    assert_eq!(outcome.matches[1].team_a, ["p4".to_string(), "p7".to_string()]);
}

#[test]
fn test_gender_rounds_are_mixed() {
    let players = mixed_roster(5, 4);
    let config = SessionConfig::new(2, 4, Policy::Gender);
    let mut rng = StdRng::seed_from_u64(12);
    let mut prior = Vec::new();

    for n in 1..=4 {
        let outcome = generate_round_matchups(&players, &config, &prior, n, &mut rng);
        assert_eq!(outcome.matches.len(), 2);
        assert_partition(&players, &outcome, n);
        for m in &outcome.matches {
            for team in [&m.team_a, &m.team_b] {
                let g0 = by_id(&players, &team[0]).gender;
                let g1 = by_id(&players, &team[1]).gender;
                assert_ne!(g0, g1);
            }
        }
        prior.push(outcome.into_round(n));
    }
}

#[test]
fn test_gender_tail_falls_back_to_unmixed_court() {
    let players = mixed_roster(6, 2);
    let config = SessionConfig::new(3, 1, Policy::Gender);
    let mut rng = StdRng::seed_from_u64(4);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    // One mixed court uses both women; the remaining four men still get a court.
    assert_eq!(outcome.matches.len(), 2);
    assert!(outcome.sitting_out.is_empty());
    assert_partition(&players, &outcome, 1);
    let unmixed = &outcome.matches[1];
    assert!(unmixed.players().all(|id| id.starts_with('m')));
}

#[test]
fn test_gender_leftovers_that_cannot_fill_a_court_sit() {
    let players = mixed_roster(6, 2);
    let config = SessionConfig::new(2, 1, Policy::Gender);
    let mut rng = StdRng::seed_from_u64(4);

    let outcome = generate_round_matchups(&players, &config, &[], 1, &mut rng);

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.sitting_out.len(), 4);
    assert_partition(&players, &outcome, 1);
}

#[test]
fn test_completed_history_counts_toward_rest_rules() {
    let players = roster(5);
    let mut config = SessionConfig::new(1, 3, Policy::Diversity);
    config.rest.no_consecutive_sit_outs = true;
    let mut rng = StdRng::seed_from_u64(31);
    let mut prior: Vec<Round> = Vec::new();

    for n in 1..=3 {
        let outcome = generate_round_matchups(&players, &config, &prior, n, &mut rng);
        if let Some(last) = prior.last() {
            for id in &last.sitting_out {
                assert!(!outcome.sitting_out.contains(id), "{id} sat out twice in a row");
            }
        }
        let mut round = outcome.into_round(n);
        for m in round.matches.iter_mut() {
            m.complete(Score { team_a: 21, team_b: 19 });
        }
        prior.push(round);
    }
}
