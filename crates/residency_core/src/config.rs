//! # Scheduler Configuration
//!
//! Every tunable of the season scheduler lives in [`SchedulerConfig`]. All
//! fields carry serde defaults, so a partial JSON document (or `{}`) is a
//! valid configuration.
//!
//! ```rust,ignore
//! let config = SchedulerConfig::load("configs/short_season.json")?;
//! let schedule = SeasonScheduler::new(config).generate_season_schedule(&teams, 115)?;
//! ```
//!
//! `RESIDENCY_CONFIG_PATH` points [`SchedulerConfig::load_from_env`] at a file.

use crate::error::ConfigError;
use crate::scheduler::policy::ApexHostSelection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "RESIDENCY_CONFIG_PATH";

/// Upper bound for `apex.target_games`; padding emits one game per step.
pub const MAX_APEX_TARGET_GAMES: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seed for the single rng threaded through a season run
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub block: BlockParams,
    #[serde(default)]
    pub apex: ApexParams,
    #[serde(default)]
    pub allocation: AllocationParams,
    #[serde(default)]
    pub pacing: PacingParams,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            block: BlockParams::default(),
            apex: ApexParams::default(),
            allocation: AllocationParams::default(),
            pacing: PacingParams::default(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

// ========== Regular Residency Blocks ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Games in each host-vs-visitor series (default: 3)
    #[serde(default = "default_host_series_length")]
    pub host_series_length: u32,
    /// Games in each visitor-vs-visitor crossroads series (default: 5).
    /// Must be odd so the alternating rule yields a clean split.
    #[serde(default = "default_crossroads_series_length")]
    pub crossroads_series_length: u32,
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            host_series_length: default_host_series_length(),
            crossroads_series_length: default_crossroads_series_length(),
        }
    }
}

fn default_host_series_length() -> u32 {
    3
}
fn default_crossroads_series_length() -> u32 {
    5
}

// ========== Apex Residency ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApexParams {
    /// Minimum games in the apex block, reached by padding (default: 10)
    #[serde(default = "default_apex_target_games")]
    pub target_games: u32,
    #[serde(default = "default_apex_max_visitors")]
    pub max_visitors: usize,
    /// Upper bound on host-vs-visitor games per visitor (default: 2)
    #[serde(default = "default_apex_host_games_cap")]
    pub host_games_cap: u32,
    #[serde(default = "default_apex_pair_series_length")]
    pub pair_series_length: u32,
    #[serde(default)]
    pub host_selection: ApexHostSelection,
}

impl Default for ApexParams {
    fn default() -> Self {
        Self {
            target_games: default_apex_target_games(),
            max_visitors: default_apex_max_visitors(),
            host_games_cap: default_apex_host_games_cap(),
            pair_series_length: default_apex_pair_series_length(),
            host_selection: ApexHostSelection::default(),
        }
    }
}

fn default_apex_target_games() -> u32 {
    10
}
fn default_apex_max_visitors() -> usize {
    4
}
fn default_apex_host_games_cap() -> u32 {
    2
}
fn default_apex_pair_series_length() -> u32 {
    3
}

// ========== Regular Allocation ==========

/// How regular residency blocks are handed out after the apex block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Pick the teams furthest below target for every new block.
    #[default]
    Balanced,
    /// One block per host in input order, random visitors, stop at teams/2 blocks.
    /// The tally is informational only.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationParams {
    #[serde(default)]
    pub strategy: AllocationStrategy,
    /// A team still needs games while its tally is at least this far below target (default: 4)
    #[serde(default = "default_need_threshold")]
    pub need_threshold: u32,
    /// Accepted distance from target for a balanced season (default: 12)
    #[serde(default = "default_tally_tolerance")]
    pub tally_tolerance: u32,
    /// Hard stop for the balanced loop (default: 512)
    #[serde(default = "default_max_regular_blocks")]
    pub max_regular_blocks: u32,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            strategy: AllocationStrategy::default(),
            need_threshold: default_need_threshold(),
            tally_tolerance: default_tally_tolerance(),
            max_regular_blocks: default_max_regular_blocks(),
        }
    }
}

fn default_need_threshold() -> u32 {
    4
}
fn default_tally_tolerance() -> u32 {
    12
}
fn default_max_regular_blocks() -> u32 {
    512
}

// ========== Label Pacing ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingParams {
    /// Games played on one schedule day inside a block (default: 2)
    #[serde(default = "default_games_per_day")]
    pub games_per_day: u32,
    /// Idle days between consecutive blocks (default: 1)
    #[serde(default = "default_rest_days")]
    pub rest_days_between_blocks: u32,
}

impl Default for PacingParams {
    fn default() -> Self {
        Self {
            games_per_day: default_games_per_day(),
            rest_days_between_blocks: default_rest_days(),
        }
    }
}

fn default_games_per_day() -> u32 {
    2
}
fn default_rest_days() -> u32 {
    1
}

impl SchedulerConfig {
    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file named by `RESIDENCY_CONFIG_PATH`. Unset or blank yields `None`.
    pub fn load_from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        Self::load(path)
            .map(Some)
            .map_err(|e| ConfigError::Io(format!("{CONFIG_PATH_ENV}='{path}': {e}")))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strategy(mut self, strategy: AllocationStrategy) -> Self {
        self.allocation.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block.host_series_length == 0 {
            return Err(ConfigError::Validation("block.host_series_length must be > 0".into()));
        }
        if self.block.crossroads_series_length % 2 == 0 {
            return Err(ConfigError::Validation(format!(
                "block.crossroads_series_length must be odd, got {}",
                self.block.crossroads_series_length
            )));
        }
        if self.apex.pair_series_length % 2 == 0 {
            return Err(ConfigError::Validation(format!(
                "apex.pair_series_length must be odd, got {}",
                self.apex.pair_series_length
            )));
        }
        if self.apex.target_games > MAX_APEX_TARGET_GAMES {
            return Err(ConfigError::Validation(format!(
                "apex.target_games must be <= {}, got {}",
                MAX_APEX_TARGET_GAMES, self.apex.target_games
            )));
        }
        if self.apex.max_visitors < 2 {
            return Err(ConfigError::Validation(format!(
                "apex.max_visitors must be >= 2, got {}",
                self.apex.max_visitors
            )));
        }
        if self.pacing.games_per_day == 0 {
            return Err(ConfigError::Validation("pacing.games_per_day must be > 0".into()));
        }
        if self.allocation.max_regular_blocks == 0 {
            return Err(ConfigError::Validation("allocation.max_regular_blocks must be > 0".into()));
        }
        Ok(())
    }
}
