//! Command line entry point: load two rosters, run the battle, print the log and statistics.

use anyhow::{Context, Result};
use clap::Parser;
use pokemon_battle::{
    parse_battle_file, parse_ron_setup, run_battle_with_limit, AttackRecord, BattleEvent, BattleState,
    BattleStatistics, DEFAULT_ROUND_LIMIT,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Simulate a battle between two Pokemon trainers
#[derive(Parser)]
#[command(name = "pokemon-battle", version, about)]
struct Cli {
    /// Roster file holding both trainers and their Pokemon
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Roster format (defaults to RON for `.ron` files, text otherwise)
    #[arg(short, long, value_enum)]
    format: Option<RosterFormat>,

    /// Also write the event log and attack records as JSON
    #[arg(long, value_name = "PATH")]
    events_json: Option<PathBuf>,

    /// Skip the statistics report
    #[arg(long)]
    no_stats: bool,

    /// Only print the result
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every attack to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Give up when the battle has not ended after this many rounds
    #[arg(long, value_name = "N", default_value_t = DEFAULT_ROUND_LIMIT)]
    max_rounds: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RosterFormat {
    /// Blank-line separated trainer blocks
    Text,
    /// A RON `BattleSetup`
    Ron,
}

impl RosterFormat {
    fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => RosterFormat::Ron,
            _ => RosterFormat::Text,
        }
    }
}

#[derive(Serialize)]
struct BattleExport<'a> {
    events: &'a [BattleEvent],
    observations: &'a [AttackRecord],
    winner: Option<&'a str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read roster file: {}", cli.file.display()))?;
    let format = cli.format.unwrap_or_else(|| RosterFormat::detect(&cli.file));
    let (player1, player2) = match format {
        RosterFormat::Text => parse_battle_file(&text),
        RosterFormat::Ron => parse_ron_setup(&text),
    }
    .with_context(|| format!("Failed to parse roster file: {}", cli.file.display()))?;

    let mut battle_state = BattleState::new(player1, player2);
    let event_bus = run_battle_with_limit(&mut battle_state, cli.max_rounds)?;

    if !cli.quiet {
        event_bus.print_formatted(&battle_state);
        println!();
    }

    let winner = battle_state
        .winner()
        .map(|index| battle_state.players[index].player_name.as_str());
    match winner {
        Some(name) => println!("Winner: {}", name),
        None => println!("The battle ended in a draw"),
    }

    if !cli.no_stats {
        println!();
        print!("{}", BattleStatistics::from_records(&battle_state.observations));
    }

    if let Some(path) = &cli.events_json {
        let export = BattleExport {
            events: event_bus.events(),
            observations: &battle_state.observations,
            winner,
        };
        let json = serde_json::to_string_pretty(&export).context("Failed to serialize battle log")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write battle log: {}", path.display()))?;
        tracing::info!("battle log written to {}", path.display());
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` takes precedence over the verbosity flags.
fn setup_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
