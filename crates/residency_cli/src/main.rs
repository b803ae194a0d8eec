//! Residency scheduler CLI
//!
//! Generates, prints and plays residency seasons for the 18-club league.
//!
//! ## Environment
//! - `RUST_LOG`: log level (default: warn)
//! - `RESIDENCY_CONFIG_PATH`: scheduler config JSON used when `--config` is absent

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use residency_core::report::{render_league, render_schedule, render_standings};
use residency_core::{
    default_league, AllocationStrategy, GameSimulator, League, RosterGenerator, RosterParams,
    ScheduleError, SchedulerConfig, SeasonSchedule, SeasonScheduler,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "residency")]
#[command(about = "Residency-block season scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a season schedule
    Schedule {
        /// Target games per team
        #[arg(long, default_value_t = 115)]
        games_per_team: u32,

        /// Rng seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Scheduler config JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Allocation strategy (overrides the config file)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Write the schedule as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print every game, not just block headers
        #[arg(long, default_value = "false")]
        verbose: bool,
    },

    /// List the league grouped by union and region
    League {
        /// Fill rosters with generated players using this seed
        #[arg(long)]
        roster_seed: Option<u64>,
    },

    /// Generate a season and play it with the at-bat simulator
    Simulate {
        #[arg(long, default_value_t = 115)]
        games_per_team: u32,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Balanced,
    Legacy,
}

impl From<StrategyArg> for AllocationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Balanced => AllocationStrategy::Balanced,
            StrategyArg::Legacy => AllocationStrategy::Legacy,
        }
    }
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::WARN),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule {
            games_per_team,
            seed,
            config,
            strategy,
            json,
            verbose,
        } => {
            let mut config = load_config(config.as_deref(), seed)?;
            if let Some(strategy) = strategy {
                config = config.with_strategy(strategy.into());
            }
            let league = default_league();
            let schedule = generate(&config, &league, games_per_team)?;

            print!("{}", render_schedule(&schedule, &league, games_per_team, verbose));

            if let Some(path) = json {
                let body = serde_json::to_string_pretty(&schedule)?;
                fs::write(&path, body)
                    .with_context(|| format!("Failed to write schedule JSON: {}", path.display()))?;
                println!("\nSchedule written to {}", path.display());
            }
        }

        Commands::League { roster_seed } => {
            let mut league = default_league();
            if let Some(seed) = roster_seed {
                let generator = RosterGenerator::new(RosterParams::default()).map_err(anyhow::Error::msg)?;
                generator.fill_league(&mut league, seed);
            }
            print!("{}", render_league(&league));
        }

        Commands::Simulate {
            games_per_team,
            seed,
            config,
        } => {
            let config = load_config(config.as_deref(), seed)?;
            let mut league = default_league();
            let generator = RosterGenerator::new(RosterParams::default()).map_err(anyhow::Error::msg)?;
            generator.fill_league(&mut league, config.seed);

            let schedule = generate(&config, &league, games_per_team)?;
            let results = GameSimulator::default().simulate_season(&schedule, &league, config.seed);
            info!(games = results.games.len(), "season played");

            println!(
                "Played {} games across {} residency blocks\n",
                results.games.len(),
                schedule.blocks.len()
            );
            print!("{}", render_standings(&results, &league));
        }
    }

    Ok(())
}

/// `--config`, else `RESIDENCY_CONFIG_PATH`, else defaults; `--seed` wins over all.
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SchedulerConfig> {
    let config = match path {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SchedulerConfig::load_from_env()?.unwrap_or_default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Too few teams is reported and yields an empty schedule.
fn generate(config: &SchedulerConfig, league: &League, games_per_team: u32) -> Result<SeasonSchedule> {
    match SeasonScheduler::new(config.clone()).generate_season_schedule(&league.teams, games_per_team) {
        Ok(schedule) => Ok(schedule),
        Err(err @ ScheduleError::InsufficientTeams { .. }) => {
            warn!(error = %err, "no season generated");
            eprintln!("{err}");
            Ok(SeasonSchedule::empty())
        }
        Err(err) => Err(err.into()),
    }
}
