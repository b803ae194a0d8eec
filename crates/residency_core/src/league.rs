//! League registry: the 18 member clubs, grouped by union and region.
//!
//! Clubs have no official names yet; each is identified by city and a
//! mascot / fan theme.

use crate::models::{Player, Region, Team, TeamId, Union};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub teams: Vec<Team>,
}

impl League {
    /// Validates every team and rejects duplicate ids.
    pub fn new(teams: Vec<Team>) -> Result<Self, String> {
        for (i, team) in teams.iter().enumerate() {
            team.validate()?;
            if teams[..i].iter().any(|t| t.id == team.id) {
                return Err(format!("Duplicate team id {}", team.id));
            }
        }
        Ok(Self { teams })
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn by_id(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// City label for `id`, or the id itself when unknown.
    pub fn city_of(&self, id: TeamId) -> String {
        self.by_id(id).map(|t| t.city.clone()).unwrap_or_else(|| id.to_string())
    }

    pub fn teams_in_region(&self, region: Region) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.region == region).collect()
    }

    pub fn teams_in_union(&self, union: Union) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.union == union).collect()
    }

    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }
}

/// The full 18-club league, 9 per union. Four clubs carry their featured
/// players; the rest start with empty rosters.
pub fn default_league() -> League {
    let mut teams = vec![
        // Atlantic Union
        Team::new(1, "Maine", "Lumberjack Spirit", Region::Keystone),
        Team::new(2, "New York", "Metropolitan Pulse", Region::Keystone),
        Team::new(3, "Philadelphia", "Founder's Legacy", Region::Keystone),
        Team::new(4, "Pittsburgh", "Iron Will", Region::Keystone),
        Team::new(5, "Atlanta", "Peach Power", Region::Tidewater),
        Team::new(6, "Miami", "Manatee Calm", Region::Tidewater),
        Team::new(7, "Charlotte", "Aviator's Edge", Region::Tidewater),
        Team::new(8, "Cleveland", "Guardian Might", Region::Confluence),
        Team::new(9, "Detroit", "Automaker Drive", Region::Confluence),
        // Pacific Union
        Team::new(10, "Los Angeles", "Star Power", Region::GoldenPennant),
        Team::new(11, "San Diego", "Surf Spirit", Region::GoldenPennant),
        Team::new(12, "San Francisco", "Seal Strength", Region::GoldenPennant),
        Team::new(13, "Seattle", "Rainier Resolve", Region::CascadeTerritory),
        Team::new(14, "Austin", "Armadillo Resilience", Region::SunstoneDivision),
        Team::new(15, "Dallas", "Lonestar Pride", Region::SunstoneDivision),
        Team::new(16, "Denver", "Summit Aspirations", Region::SunstoneDivision),
        Team::new(17, "St. Louis", "Archer Accuracy", Region::HeartlandCore),
        Team::new(18, "Kansas City", "Monarch Nobility", Region::HeartlandCore),
    ];

    for team in teams.iter_mut() {
        team.roster = featured_players(team.id);
    }

    League { teams }
}

fn featured_players(team: TeamId) -> Vec<Player> {
    match team.0 {
        1 => vec![
            Player::new(1, "Babe Blue", "P", 95.0, 30_000_000.0, 45_000_000.0, true),
            Player::new(2, "Paul Bunyan", "1B", 88.0, 12_000_000.0, 15_000_000.0, false),
            Player::new(3, "Sawyer McTree", "OF", 80.0, 5_000_000.0, 6_000_000.0, false),
        ],
        2 => vec![
            Player::new(4, "Empire Ace", "P", 92.0, 25_000_000.0, 35_000_000.0, true),
            Player::new(5, "Broadway Bomber", "CF", 87.0, 11_000_000.0, 14_000_000.0, false),
        ],
        10 => vec![
            Player::new(6, "Hollywood Heat", "P", 98.0, 40_000_000.0, 60_000_000.0, true),
            Player::new(7, "Sunset Striker", "SS", 90.0, 18_000_000.0, 22_000_000.0, false),
        ],
        8 => vec![
            Player::new(8, "Lakefront Lefty", "P", 85.0, 9_000_000.0, 10_000_000.0, false),
            Player::new(9, "Rustbelt Slugger", "DH", 90.0, 15_000_000.0, 20_000_000.0, true),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_league_shape() {
        let league = default_league();
        assert_eq!(league.len(), 18);
        assert_eq!(league.teams_in_union(Union::Atlantic).len(), 9);
        assert_eq!(league.teams_in_union(Union::Pacific).len(), 9);
        assert_eq!(league.teams_in_region(Region::Keystone).len(), 4);
        assert_eq!(league.teams_in_region(Region::CascadeTerritory).len(), 1);
        assert!(League::new(league.teams.clone()).is_ok());
    }

    #[test]
    fn test_every_region_populated() {
        let league = default_league();
        for region in Region::ALL {
            assert!(!league.teams_in_region(region).is_empty(), "{:?} empty", region);
        }
    }

    #[test]
    fn test_featured_rosters() {
        let league = default_league();
        let maine = league.by_id(TeamId(1)).unwrap();
        assert_eq!(maine.roster.len(), 3);
        assert_eq!(maine.star_count(), 1);
        assert!(league.by_id(TeamId(18)).unwrap().roster.is_empty());
        assert_eq!(league.city_of(TeamId(10)), "Los Angeles");
        assert_eq!(league.city_of(TeamId(99)), "#99");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let teams = vec![
            Team::new(1, "Maine", "Lumberjack Spirit", Region::Keystone),
            Team::new(1, "Miami", "Manatee Calm", Region::Tidewater),
        ];
        assert!(League::new(teams).is_err());
    }
}
