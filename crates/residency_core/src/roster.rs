//! Seeded roster generation.
//!
//! Skill is drawn from a normal distribution and clamped to 0-100; salary
//! and market value scale with skill. Players at or above the star threshold
//! are flagged as stars.

use crate::league::League;
use crate::models::Player;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

const FIRST_NAMES: &[&str] = &[
    "Ace", "Buck", "Casey", "Dusty", "Eli", "Flint", "Gus", "Hank", "Ike", "Jett", "Kit", "Lefty",
    "Moe", "Nash", "Ozzie", "Pip", "Rowdy", "Sly", "Tex", "Woody",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Barlow", "Crane", "Doyle", "Ellery", "Finch", "Gale", "Hollis", "Irwin", "Jessup",
    "Kell", "Lark", "Mercer", "Noble", "Orton", "Pike", "Quill", "Royce", "Sterling", "Tate",
];

/// Nine pitchers, two catchers, one of each other slot.
const POSITIONS: &[&str] = &[
    "P", "P", "P", "P", "P", "P", "P", "P", "P", "C", "C", "1B", "2B", "3B", "SS", "LF", "CF", "RF",
    "DH",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterParams {
    #[serde(default = "default_roster_size")]
    pub roster_size: usize,
    #[serde(default = "default_skill_mean")]
    pub skill_mean: f64,
    #[serde(default = "default_skill_std_dev")]
    pub skill_std_dev: f64,
    #[serde(default = "default_star_threshold")]
    pub star_threshold: f64,
    /// Salary of a 0-skill player
    #[serde(default = "default_base_salary")]
    pub base_salary: f64,
    /// Additional salary per skill point
    #[serde(default = "default_salary_per_skill")]
    pub salary_per_skill: f64,
}

impl Default for RosterParams {
    fn default() -> Self {
        Self {
            roster_size: default_roster_size(),
            skill_mean: default_skill_mean(),
            skill_std_dev: default_skill_std_dev(),
            star_threshold: default_star_threshold(),
            base_salary: default_base_salary(),
            salary_per_skill: default_salary_per_skill(),
        }
    }
}

fn default_roster_size() -> usize {
    POSITIONS.len()
}
fn default_skill_mean() -> f64 {
    65.0
}
fn default_skill_std_dev() -> f64 {
    12.0
}
fn default_star_threshold() -> f64 {
    90.0
}
fn default_base_salary() -> f64 {
    500_000.0
}
fn default_salary_per_skill() -> f64 {
    250_000.0
}

pub struct RosterGenerator {
    params: RosterParams,
    skill: Normal<f64>,
}

impl RosterGenerator {
    pub fn new(params: RosterParams) -> Result<Self, String> {
        let skill = Normal::new(params.skill_mean, params.skill_std_dev)
            .map_err(|e| format!("Invalid skill distribution: {e}"))?;
        Ok(Self { params, skill })
    }

    pub fn params(&self) -> &RosterParams {
        &self.params
    }

    pub fn generate_player<R: Rng + ?Sized>(&self, rng: &mut R, id: u32, position: &str) -> Player {
        let skill_rating = self.skill.sample(rng).clamp(0.0, 100.0);
        let salary = self.params.base_salary + skill_rating * self.params.salary_per_skill;
        // Market premium grows with skill: 1.0x at 0, 1.5x at 100
        let market_value = salary * (1.0 + skill_rating / 200.0);
        let name = format!(
            "{} {}",
            FIRST_NAMES.choose(rng).copied().unwrap_or("Rookie"),
            LAST_NAMES.choose(rng).copied().unwrap_or("Prospect")
        );

        Player {
            id,
            name,
            position: position.to_string(),
            skill_rating,
            salary,
            market_value,
            is_star: skill_rating >= self.params.star_threshold,
        }
    }

    /// `count` players with consecutive ids from `first_id`, positions cycled.
    pub fn generate_roster<R: Rng + ?Sized>(&self, rng: &mut R, first_id: u32, count: usize) -> Vec<Player> {
        (0..count)
            .map(|i| self.generate_player(rng, first_id + i as u32, POSITIONS[i % POSITIONS.len()]))
            .collect()
    }

    /// Tops every roster up to `roster_size`. Existing players are kept and
    /// new ids continue after the largest id already in the league.
    pub fn fill_league(&self, league: &mut League, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut next_id = league
            .teams
            .iter()
            .flat_map(|t| t.roster.iter().map(|p| p.id))
            .max()
            .map_or(1, |max| max + 1);

        for team in league.teams.iter_mut() {
            let missing = self.params.roster_size.saturating_sub(team.roster.len());
            let generated = self.generate_roster(&mut rng, next_id, missing);
            next_id += missing as u32;
            team.roster.extend(generated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::default_league;

    #[test]
    fn test_generated_player_ranges() {
        let generator = RosterGenerator::new(RosterParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for player in generator.generate_roster(&mut rng, 1, 200) {
            assert!((0.0..=100.0).contains(&player.skill_rating));
            assert!(player.salary >= 500_000.0);
            assert!(player.market_value >= player.salary);
            assert_eq!(player.is_star, player.skill_rating >= 90.0);
        }
    }

    #[test]
    fn test_fill_league_keeps_featured_players() {
        let generator = RosterGenerator::new(RosterParams::default()).unwrap();
        let mut league = default_league();
        generator.fill_league(&mut league, 42);

        for team in &league.teams {
            assert_eq!(team.roster.len(), POSITIONS.len());
            assert!(team.validate().is_ok());
        }
        assert_eq!(league.teams[0].roster[0].name, "Babe Blue");

        let mut ids: Vec<u32> = league.teams.iter().flat_map(|t| t.roster.iter().map(|p| p.id)).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_fill_league_is_deterministic() {
        let generator = RosterGenerator::new(RosterParams::default()).unwrap();
        let mut a = default_league();
        let mut b = default_league();
        generator.fill_league(&mut a, 8);
        generator.fill_league(&mut b, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_distribution() {
        let params = RosterParams { skill_std_dev: -1.0, ..RosterParams::default() };
        assert!(RosterGenerator::new(params).is_err());
    }
}
