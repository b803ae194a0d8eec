//! JSON API for season schedule generation
//!
//! String in, string out, for embedding hosts. Scheduling failures come
//! back inside the response (`success: false` with an empty schedule);
//! only unreadable requests are returned as `Err`.

use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::league::{default_league, League};
use crate::models::{SeasonSchedule, Team};
use crate::scheduler::SeasonScheduler;
use crate::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub schema_version: u8,
    /// Overrides `config.seed` when present
    #[serde(default)]
    pub seed: Option<u64>,
    pub games_per_team: u32,
    /// Omitted: the default 18-team league
    #[serde(default)]
    pub teams: Option<Vec<Team>>,
    #[serde(default)]
    pub config: Option<SchedulerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&ScheduleError> for ApiError {
    fn from(err: &ScheduleError) -> Self {
        Self { code: err.code().to_string(), message: err.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schema_version: u8,
    pub success: bool,
    pub games_per_team: u32,
    pub schedule: SeasonSchedule,
    pub error: Option<ApiError>,
}

impl ScheduleResponse {
    fn failed(games_per_team: u32, error: ApiError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            success: false,
            games_per_team,
            schedule: SeasonSchedule::empty(),
            error: Some(error),
        }
    }
}

pub fn handle_schedule_request(request: ScheduleRequest) -> ScheduleResponse {
    let target = request.games_per_team;

    if request.schema_version != SCHEMA_VERSION {
        return ScheduleResponse::failed(
            target,
            ApiError {
                code: "UNSUPPORTED_SCHEMA".to_string(),
                message: format!(
                    "schema_version {} not supported, expected {}",
                    request.schema_version, SCHEMA_VERSION
                ),
            },
        );
    }

    let league = match request.teams {
        Some(teams) => match League::new(teams) {
            Ok(league) => league,
            Err(message) => {
                warn!(reason = %message, "rejected team list");
                return ScheduleResponse::failed(
                    target,
                    ApiError { code: "INVALID_TEAMS".to_string(), message },
                );
            }
        },
        None => default_league(),
    };

    let mut config = request.config.unwrap_or_default();
    if let Some(seed) = request.seed {
        config.seed = seed;
    }

    match SeasonScheduler::new(config).generate_season_schedule(&league.teams, target) {
        Ok(schedule) => {
            info!(blocks = schedule.blocks.len(), "schedule request served");
            ScheduleResponse {
                schema_version: SCHEMA_VERSION,
                success: true,
                games_per_team: target,
                schedule,
                error: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "schedule request failed");
            ScheduleResponse::failed(target, ApiError::from(&err))
        }
    }
}

/// Parses a [`ScheduleRequest`], runs the scheduler, serializes the response.
pub fn generate_season_json(request_json: &str) -> Result<String> {
    let request: ScheduleRequest = serde_json::from_str(request_json)?;
    let response = handle_schedule_request(request);
    Ok(serde_json::to_string(&response)?)
}
