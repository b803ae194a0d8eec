use crate::models::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Chooses the apex residency host for a season.
///
/// Any `Fn(&[Team]) -> Option<TeamId>` is a policy, so callers can plug in
/// a fairness rule without touching the scheduler.
pub trait ApexHostPolicy {
    fn select_host(&self, teams: &[Team]) -> Option<TeamId>;
}

impl<F> ApexHostPolicy for F
where
    F: Fn(&[Team]) -> Option<TeamId>,
{
    fn select_host(&self, teams: &[Team]) -> Option<TeamId> {
        self(teams)
    }
}

/// Built-in policies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ApexHostSelection {
    /// First team in input order.
    #[default]
    FirstTeam,
    /// Team at `season_index % teams.len()`, so consecutive seasons rotate.
    RotateBySeason { season_index: u32 },
}

impl ApexHostPolicy for ApexHostSelection {
    fn select_host(&self, teams: &[Team]) -> Option<TeamId> {
        if teams.is_empty() {
            return None;
        }
        match self {
            ApexHostSelection::FirstTeam => Some(teams[0].id),
            ApexHostSelection::RotateBySeason { season_index } => {
                Some(teams[*season_index as usize % teams.len()].id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn teams() -> Vec<Team> {
        vec![
            Team::new(10, "Maine", "Lumberjack Spirit", Region::Keystone),
            Team::new(20, "Miami", "Manatee Calm", Region::Tidewater),
            Team::new(30, "Seattle", "Rainier Resolve", Region::CascadeTerritory),
        ]
    }

    #[test]
    fn test_first_team() {
        assert_eq!(ApexHostSelection::FirstTeam.select_host(&teams()), Some(TeamId(10)));
        assert_eq!(ApexHostSelection::FirstTeam.select_host(&[]), None);
    }

    #[test]
    fn test_rotation_wraps() {
        let teams = teams();
        let host = |i| ApexHostSelection::RotateBySeason { season_index: i }.select_host(&teams);
        assert_eq!(host(0), Some(TeamId(10)));
        assert_eq!(host(1), Some(TeamId(20)));
        assert_eq!(host(4), Some(TeamId(20)));
    }

    #[test]
    fn test_closure_policy() {
        let last = |teams: &[Team]| teams.last().map(|t| t.id);
        assert_eq!(last.select_host(&teams()), Some(TeamId(30)));
    }

    #[test]
    fn test_selection_wire_format() {
        let json = serde_json::to_string(&ApexHostSelection::RotateBySeason { season_index: 2 }).unwrap();
        assert_eq!(json, r#"{"policy":"rotate_by_season","season_index":2}"#);
        let parsed: ApexHostSelection = serde_json::from_str(r#"{"policy":"first_team"}"#).unwrap();
        assert_eq!(parsed, ApexHostSelection::FirstTeam);
    }
}
