//! Session planner CLI
//!
//! Plan rounds for a doubles session from a TOML roster, reshuffle a court,
//! and print standings or a schedule report.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use court_core::{
    current_round, fold_completed, generate_schedule, is_round_indeterminate, load_schedule,
    regenerate_schedule, reshuffle_match, save_schedule, standings, tally,
    validate_gender_balance, MatchStatus, Player, PlayerId, Policy, Round, ScheduleReport,
    SessionError, SessionFile,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SCHEDULE: &str = "schedule.json";

fn print_usage() {
    println!("courtplan - doubles session planner");
    println!();
    println!("Usage:");
    println!("  courtplan schedule <session.toml> [--seed N] [--out FILE]");
    println!("  courtplan regenerate <session.toml> <schedule.json> [--from N] [--seed N] [--out FILE]");
    println!("  courtplan reshuffle <session.toml> <schedule.json> --round N --court C [--seed N] [--out FILE]");
    println!("  courtplan validate <session.toml>");
    println!("  courtplan standings <session.toml> <schedule.json>");
    println!("  courtplan report <session.toml> <schedule.json>");
    println!();
    println!("Policies (session.policy):");
    println!("  diversity   - rotate partners and opponents");
    println!("  skill       - diversity with balanced team skill");
    println!("  ranked      - seed courts from standings after round 1");
    println!("  gender      - mixed doubles, one man and one woman per team");
    println!();
    println!("Schedules are written to {DEFAULT_SCHEDULE} unless --out is given;");
    println!("regenerate and reshuffle update the input schedule in place.");
    println!("Set RUST_LOG=debug for search details.");
}

#[derive(Debug, Default, PartialEq)]
struct Flags {
    positional: Vec<String>,
    seed: Option<u64>,
    out: Option<PathBuf>,
    from: Option<u32>,
    round: Option<u32>,
    court: Option<u32>,
}

fn number<T>(flag: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value for {flag}: `{value}`"))
}

fn parse_flags(args: &[String]) -> Result<Flags> {
    let mut flags = Flags::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if !arg.starts_with("--") {
            flags.positional.push(arg.to_string());
            i += 1;
            continue;
        }
        let value = args
            .get(i + 1)
            .with_context(|| format!("{arg} requires a value"))?;
        match arg {
            "--seed" => flags.seed = Some(number(arg, value)?),
            "--out" => flags.out = Some(PathBuf::from(value)),
            "--from" => flags.from = Some(number(arg, value)?),
            "--round" => flags.round = Some(number(arg, value)?),
            "--court" => flags.court = Some(number(arg, value)?),
            _ => bail!("unknown option {arg}"),
        }
        i += 2;
    }

    Ok(flags)
}

impl Flags {
    fn path(&self, index: usize, what: &str) -> Result<&Path> {
        self.positional
            .get(index)
            .map(Path::new)
            .ok_or_else(|| anyhow!("missing {what} argument"))
    }
}

fn load_session(path: &Path) -> Result<SessionFile> {
    SessionFile::load(path).with_context(|| format!("failed to load session {}", path.display()))
}

fn load_rounds(path: &Path) -> Result<Vec<Round>> {
    load_schedule(path).with_context(|| format!("failed to load schedule {}", path.display()))
}

fn session_rng(flags: &Flags, session: &SessionFile) -> StdRng {
    match flags.seed.or(session.session.seed) {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Mixed doubles cannot start without two of each gender.
fn check_gender(session: &SessionFile) -> Result<()> {
    if session.session.policy != Policy::Gender {
        return Ok(());
    }
    match validate_gender_balance(&session.players) {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

fn name_of<'a>(players: &'a [Player], id: &'a str) -> &'a str {
    players
        .iter()
        .find(|p| p.id == id)
        .map_or(id, |p| p.name.as_str())
}

fn print_schedule(players: &[Player], policy: Policy, schedule: &[Round]) {
    for round in schedule {
        print!("Round {}", round.number);
        if is_round_indeterminate(policy, round.number, schedule) {
            print!(" (provisional until round {} is completed)", round.number - 1);
        }
        println!();

        for m in &round.matches {
            let team = |ids: &[PlayerId; 2]| {
                format!("{} & {}", name_of(players, &ids[0]), name_of(players, &ids[1]))
            };
            let state = match (m.status, m.score) {
                (MatchStatus::Completed, Some(score)) => {
                    format!("{}-{}", score.team_a, score.team_b)
                }
                (MatchStatus::InProgress, _) => "in progress".to_string(),
                _ => String::new(),
            };
            println!(
                "  Court {}: {:<30} vs {:<30} {}",
                m.court,
                team(&m.team_a),
                team(&m.team_b),
                state
            );
        }
        if !round.sitting_out.is_empty() {
            let names: Vec<&str> = round
                .sitting_out
                .iter()
                .map(|id| name_of(players, id))
                .collect();
            println!("  Sitting out: {}", names.join(", "));
        }
    }
}

fn write_schedule(path: &Path, players: &[Player], policy: Policy, schedule: &[Round]) -> Result<()> {
    print_schedule(players, policy, schedule);
    save_schedule(path, schedule)
        .with_context(|| format!("failed to save schedule {}", path.display()))?;
    info!(path = %path.display(), rounds = schedule.len(), "schedule saved");
    Ok(())
}

fn run_schedule(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    check_gender(&session)?;

    let config = session.config();
    let mut rng = session_rng(&flags, &session);
    let schedule = generate_schedule(&session.players, &config, &[], 1, &mut rng);

    let out = flags
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULE));
    write_schedule(&out, &session.players, config.policy, &schedule)
}

fn run_regenerate(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    let schedule_path = flags.path(1, "schedule file")?;
    check_gender(&session)?;

    let existing = load_rounds(schedule_path)?;
    let from = flags
        .from
        .or_else(|| current_round(&existing))
        .unwrap_or(1);

    // Ranked seeding and fairness read results of the rounds already played
    let players = fold_completed(&session.players, &existing);
    let config = session.config();
    let mut rng = session_rng(&flags, &session);
    let schedule = regenerate_schedule(&players, &config, &existing, from, &mut rng);

    let out = flags.out.as_deref().unwrap_or(schedule_path);
    write_schedule(out, &session.players, config.policy, &schedule)
}

/// Replace the match on `court` in `round_number` with a fresh one drawn from
/// its four players and that round's resters.
fn reshuffle_court<R: Rng + ?Sized>(
    session: &SessionFile,
    schedule: &mut [Round],
    round_number: u32,
    court: u32,
    rng: &mut R,
) -> Result<()> {
    let index = schedule
        .iter()
        .position(|r| r.number == round_number)
        .ok_or(SessionError::UnknownRound(round_number))?;
    let (prior, rest) = schedule.split_at_mut(index);
    let round = &mut rest[0];

    let slot = round
        .matches
        .iter()
        .position(|m| m.court == court)
        .with_context(|| format!("round {round_number} has no match on court {court}"))?;
    if round.matches[slot].status != MatchStatus::Upcoming {
        bail!("court {court} in round {round_number} has already started");
    }

    let mut free: Vec<PlayerId> = round.matches[slot]
        .players()
        .chain(&round.sitting_out)
        .cloned()
        .collect();
    free.shuffle(rng);

    let players = fold_completed(&session.players, prior);
    let fresh = reshuffle_match(&players, &session.config(), &free, court, prior, rng)
        .with_context(|| format!("not enough free players to reshuffle court {court}"))?;

    let mut sitting_out = round.sitting_out.clone();
    sitting_out.extend(round.matches[slot].players().cloned());
    sitting_out.retain(|id| !fresh.contains(id));
    round.sitting_out = sitting_out;
    round.matches[slot] = fresh;
    Ok(())
}

fn run_reshuffle(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    let schedule_path = flags.path(1, "schedule file")?;
    let round_number = flags.round.context("reshuffle requires --round")?;
    let court = flags.court.context("reshuffle requires --court")?;

    let mut schedule = load_rounds(schedule_path)?;
    let mut rng = session_rng(&flags, &session);
    reshuffle_court(&session, &mut schedule, round_number, court, &mut rng)?;

    let out = flags.out.as_deref().unwrap_or(schedule_path);
    write_schedule(out, &session.players, session.session.policy, &schedule)
}

fn run_validate(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    check_gender(&session)?;

    let config = session.config();
    println!(
        "Session OK: {} players, {} courts, {} rounds, {} policy",
        session.players.len(),
        config.courts,
        config.rounds,
        config.policy.name()
    );
    Ok(())
}

fn run_standings(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    let schedule = load_rounds(flags.path(1, "schedule file")?)?;

    let table = standings(tally(&session.players, &schedule));

    println!(
        "{:<4} {:<20} {:>6} {:>4} {:>4} {:>6} {:>5}",
        "#", "Player", "Points", "W", "L", "Played", "Sat"
    );
    println!("{}", "-".repeat(55));
    for (rank, row) in table.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>6} {:>4} {:>4} {:>6} {:>5}",
            rank + 1,
            row.name,
            row.points,
            row.wins,
            row.losses,
            row.games_played,
            row.sit_outs
        );
    }
    Ok(())
}

fn run_report(args: &[String]) -> Result<()> {
    let flags = parse_flags(args)?;
    let session = load_session(flags.path(0, "session file")?)?;
    let schedule = load_rounds(flags.path(1, "schedule file")?)?;

    println!(
        "{}",
        ScheduleReport::from_schedule(&session.players, &schedule).generate_report()
    );
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "schedule" => run_schedule(rest),
        "regenerate" => run_regenerate(rest),
        "reshuffle" => run_reshuffle(rest),
        "validate" => run_validate(rest),
        "standings" => run_standings(rest),
        "report" => run_report(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command `{other}`")
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
