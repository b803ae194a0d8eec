use super::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Game category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    RegularSeason,
    /// Visitor vs visitor inside a residency, alternating first bat.
    Crossroads,
    ApexResidency,
    Playoff,
    AllStar,
}

impl GameType {
    pub fn label(&self) -> &'static str {
        match self {
            GameType::RegularSeason => "Regular Season",
            GameType::Crossroads => "Crossroads",
            GameType::ApexResidency => "Apex Residency",
            GameType::Playoff => "Playoff",
            GameType::AllStar => "All-Star",
        }
    }
}

/// A single scheduled game.
///
/// `second_bat` is the designated home team for batting purposes. It is
/// independent of `stadium`, which is always the residency host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub first_bat: TeamId,
    pub second_bat: TeamId,
    pub stadium: TeamId,
    pub label: String,
    pub game_type: GameType,
}

impl Game {
    pub fn involves(&self, team: TeamId) -> bool {
        self.first_bat == team || self.second_bat == team
    }

    pub fn designated_home(&self) -> TeamId {
        self.second_bat
    }

    /// The participant that is not `team`, if `team` plays in this game.
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.first_bat == team {
            Some(self.second_bat)
        } else if self.second_bat == team {
            Some(self.first_bat)
        } else {
            None
        }
    }
}

/// One host team receiving two or more visiting residents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidencyBlock {
    pub host: TeamId,
    pub visitors: Vec<TeamId>,
    pub start_label: String,
    pub end_label: String,
    #[serde(default)]
    pub is_apex: bool,
    pub games: Vec<Game>,
}

impl ResidencyBlock {
    /// Games where the host takes part.
    pub fn host_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(move |g| g.involves(self.host))
    }

    /// Games between two visiting residents.
    pub fn visitor_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(move |g| !g.involves(self.host))
    }

    pub fn participants(&self) -> impl Iterator<Item = TeamId> + '_ {
        std::iter::once(self.host).chain(self.visitors.iter().copied())
    }

    /// Structural checks every block must satisfy once built.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.visitors.len() < 2 {
            return Err(format!("block hosted by {} has {} visitors", self.host, self.visitors.len()));
        }
        for (i, v) in self.visitors.iter().enumerate() {
            if *v == self.host {
                return Err(format!("host {} listed as its own visitor", self.host));
            }
            if self.visitors[..i].contains(v) {
                return Err(format!("visitor {} listed twice", v));
            }
        }
        for game in &self.games {
            if game.stadium != self.host {
                return Err(format!(
                    "game {} played at {} inside block hosted by {}",
                    game.label, game.stadium, self.host
                ));
            }
            if game.first_bat == self.host {
                return Err(format!("host {} bats first in game {}", self.host, game.label));
            }
            let known = |t: TeamId| t == self.host || self.visitors.contains(&t);
            if !known(game.first_bat) || !known(game.second_bat) {
                return Err(format!("game {} involves a team outside the block", game.label));
            }
        }
        Ok(())
    }
}

/// A host skipped during allocation and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedHost {
    pub host: TeamId,
    pub reason: String,
}

/// The full season: apex block(s) first, then regular blocks in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSchedule {
    pub blocks: Vec<ResidencyBlock>,
    /// Games played per team, either batting slot.
    pub tally: BTreeMap<TeamId, u32>,
    #[serde(default)]
    pub skipped_hosts: Vec<SkippedHost>,
}

impl SeasonSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.blocks.iter().flat_map(|b| b.games.iter())
    }

    pub fn total_games(&self) -> usize {
        self.blocks.iter().map(|b| b.games.len()).sum()
    }

    pub fn apex_blocks(&self) -> impl Iterator<Item = &ResidencyBlock> {
        self.blocks.iter().filter(|b| b.is_apex)
    }

    pub fn regular_blocks(&self) -> impl Iterator<Item = &ResidencyBlock> {
        self.blocks.iter().filter(|b| !b.is_apex)
    }

    pub fn games_for(&self, team: TeamId) -> u32 {
        self.tally.get(&team).copied().unwrap_or(0)
    }

    /// Per-team game counts over `blocks`. Every team in `teams` gets an
    /// entry, including those that never play.
    pub fn compute_tally(teams: &[Team], blocks: &[ResidencyBlock]) -> BTreeMap<TeamId, u32> {
        let mut tally: BTreeMap<TeamId, u32> = teams.iter().map(|t| (t.id, 0)).collect();
        for game in blocks.iter().flat_map(|b| b.games.iter()) {
            *tally.entry(game.first_bat).or_insert(0) += 1;
            *tally.entry(game.second_bat).or_insert(0) += 1;
        }
        tally
    }

    /// Largest absolute distance between any team's tally and `target`.
    pub fn max_deviation(&self, target: u32) -> u32 {
        self.tally.values().map(|&n| n.abs_diff(target)).max().unwrap_or(0)
    }

    /// Population variance of tallies around `target`.
    pub fn variance_from_target(&self, target: u32) -> f64 {
        if self.tally.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .tally
            .values()
            .map(|&n| {
                let d = n as f64 - target as f64;
                d * d
            })
            .sum();
        sum / self.tally.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(first: u32, second: u32, stadium: u32) -> Game {
        Game {
            first_bat: TeamId(first),
            second_bat: TeamId(second),
            stadium: TeamId(stadium),
            label: "Day 001 G1".to_string(),
            game_type: GameType::RegularSeason,
        }
    }

    fn block(games: Vec<Game>) -> ResidencyBlock {
        ResidencyBlock {
            host: TeamId(1),
            visitors: vec![TeamId(2), TeamId(3)],
            start_label: "Day 001".to_string(),
            end_label: "Day 001".to_string(),
            is_apex: false,
            games,
        }
    }

    #[test]
    fn test_game_type_wire_names() {
        assert_eq!(serde_json::to_string(&GameType::ApexResidency).unwrap(), "\"APEX_RESIDENCY\"");
        assert_eq!(serde_json::to_string(&GameType::RegularSeason).unwrap(), "\"REGULAR_SEASON\"");
        assert_eq!(serde_json::to_string(&GameType::AllStar).unwrap(), "\"ALL_STAR\"");
    }

    #[test]
    fn test_invariants_catch_foreign_stadium() {
        assert!(block(vec![game(2, 1, 1)]).check_invariants().is_ok());
        assert!(block(vec![game(2, 3, 2)]).check_invariants().is_err());
    }

    #[test]
    fn test_invariants_catch_host_batting_first() {
        assert!(block(vec![game(1, 2, 1)]).check_invariants().is_err());
    }

    #[test]
    fn test_tally_counts_both_slots() {
        let teams = vec![
            Team::new(1, "A", "a", crate::models::Region::Keystone),
            Team::new(2, "B", "b", crate::models::Region::Keystone),
            Team::new(3, "C", "c", crate::models::Region::Keystone),
            Team::new(4, "D", "d", crate::models::Region::Keystone),
        ];
        let blocks = vec![block(vec![game(2, 1, 1), game(3, 1, 1), game(2, 3, 1)])];
        let tally = SeasonSchedule::compute_tally(&teams, &blocks);

        assert_eq!(tally[&TeamId(1)], 2);
        assert_eq!(tally[&TeamId(2)], 2);
        assert_eq!(tally[&TeamId(3)], 2);
        assert_eq!(tally[&TeamId(4)], 0);
    }
}
