//! # residency_core - Residency Season Scheduler
//!
//! Assigns the clubs of a two-union baseball league to multi-team residency
//! blocks and emits the match list for each block, covering a whole season.
//!
//! ## Features
//! - Host-bats-second residency series and alternating-first-bat crossroads series
//! - One enlarged apex residency per season
//! - Balanced allocation that closes the loop on each team's game count
//! - 100% deterministic (same seed = same schedule)
//! - JSON API for embedding

pub mod api;
pub mod config;
pub mod error;
pub mod league;
pub mod models;
pub mod report;
pub mod roster;
pub mod scheduler;
pub mod sim;

pub use api::{generate_season_json, ScheduleRequest, ScheduleResponse};
pub use config::{AllocationStrategy, SchedulerConfig};
pub use error::{ConfigError, Result, ScheduleError};
pub use league::{default_league, League};
pub use models::{
    Game, GameType, Player, Region, ResidencyBlock, SeasonSchedule, SkippedHost, Team, TeamId,
    Union,
};
pub use roster::{RosterGenerator, RosterParams};
pub use scheduler::{
    build_apex_residency_block, build_residency_block, generate_season_schedule, generate_series,
    ApexHostPolicy, ApexHostSelection, BattingOrder, ScheduleCursor, SeasonScheduler, SeriesSpec,
};
pub use sim::{GameSimulator, SeasonResults, SimParams};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
