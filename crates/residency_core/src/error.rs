use thiserror::Error;

use crate::models::TeamId;

/// Errors raised while building series, residency blocks or a full season.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Insufficient teams: found {found}, need at least {required}")]
    InsufficientTeams { found: usize, required: usize },

    #[error("Insufficient visitors for host {host}: found {found} eligible, need at least 2")]
    InsufficientVisitors { host: TeamId, found: usize },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(String),
}

impl ScheduleError {
    /// Recoverable errors skip one host; the season keeps going.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScheduleError::InsufficientVisitors { .. } => true,
            ScheduleError::InvalidSeries(_) => true,
            ScheduleError::InsufficientTeams { .. } => false,
            ScheduleError::Config(_) => false,
            ScheduleError::Json(_) => false,
        }
    }

    /// Stable machine-readable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InsufficientTeams { .. } => "INSUFFICIENT_TEAMS",
            ScheduleError::InsufficientVisitors { .. } => "INSUFFICIENT_VISITORS",
            ScheduleError::InvalidSeries(_) => "INVALID_SERIES",
            ScheduleError::Config(_) => "INVALID_CONFIG",
            ScheduleError::Json(_) => "INVALID_JSON",
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Json(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ScheduleError::InsufficientVisitors { host: TeamId(1), found: 1 }.is_recoverable());
        assert!(ScheduleError::InvalidSeries("zero length".to_string()).is_recoverable());
        assert!(!ScheduleError::InsufficientTeams { found: 2, required: 3 }.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = ScheduleError::InsufficientTeams { found: 2, required: 3 };
        assert_eq!(err.to_string(), "Insufficient teams: found 2, need at least 3");

        let err = ScheduleError::InsufficientVisitors { host: TeamId(7), found: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient visitors for host #7: found 1 eligible, need at least 2"
        );
    }
}
