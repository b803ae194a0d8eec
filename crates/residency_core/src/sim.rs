//! Simplified at-bat simulator used to play a generated season.
//!
//! Each plate appearance compares a uniform roll against the batter's skill
//! scaled by `contact_factor`. A hit is worth 1-4 bases and pushes runners
//! around; anything else is an out. Deterministic for a given seed.

use crate::league::League;
use crate::models::{Game, Player, SeasonSchedule, Team, TeamId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Hit chance = skill * contact_factor / 100. Must stay below 1.0 so a
    /// 100-skill batter can still make an out.
    #[serde(default = "default_contact_factor")]
    pub contact_factor: f64,
    /// Skill used for teams with an empty roster
    #[serde(default = "default_replacement_skill")]
    pub replacement_skill: f64,
    #[serde(default = "default_regulation_innings")]
    pub regulation_innings: u32,
    /// Tied games stop after this many innings
    #[serde(default = "default_max_innings")]
    pub max_innings: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            contact_factor: default_contact_factor(),
            replacement_skill: default_replacement_skill(),
            regulation_innings: default_regulation_innings(),
            max_innings: default_max_innings(),
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.contact_factor) {
            return Err(format!("contact_factor must be in [0.0, 1.0), got {}", self.contact_factor));
        }
        if !self.replacement_skill.is_finite() {
            return Err(format!("replacement_skill must be finite, got {}", self.replacement_skill));
        }
        if self.regulation_innings == 0 {
            return Err("regulation_innings must be > 0".to_string());
        }
        if self.max_innings < self.regulation_innings {
            return Err(format!(
                "max_innings ({}) must be >= regulation_innings ({})",
                self.max_innings, self.regulation_innings
            ));
        }
        Ok(())
    }
}

fn default_contact_factor() -> f64 {
    0.4
}
fn default_replacement_skill() -> f64 {
    50.0
}
fn default_regulation_innings() -> u32 {
    9
}
fn default_max_innings() -> u32 {
    12
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub label: String,
    pub first_bat: TeamId,
    pub second_bat: TeamId,
    pub first_bat_runs: u32,
    pub second_bat_runs: u32,
    pub innings: u32,
}

impl GameResult {
    pub fn winner(&self) -> Option<TeamId> {
        match self.first_bat_runs.cmp(&self.second_bat_runs) {
            std::cmp::Ordering::Greater => Some(self.first_bat),
            std::cmp::Ordering::Less => Some(self.second_bat),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub runs_for: u32,
    pub runs_against: u32,
}

impl TeamRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_pct(&self) -> f64 {
        if self.games() == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / self.games() as f64
    }

    pub fn run_differential(&self) -> i64 {
        self.runs_for as i64 - self.runs_against as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonResults {
    pub games: Vec<GameResult>,
    pub records: BTreeMap<TeamId, TeamRecord>,
}

impl SeasonResults {
    /// Teams ordered by win percentage, then run differential, then id.
    pub fn standings(&self) -> Vec<(TeamId, TeamRecord)> {
        let mut rows: Vec<(TeamId, TeamRecord)> = self.records.iter().map(|(id, r)| (*id, *r)).collect();
        rows.sort_by(|a, b| {
            b.1.win_pct()
                .total_cmp(&a.1.win_pct())
                .then(b.1.run_differential().cmp(&a.1.run_differential()))
                .then(a.0.cmp(&b.0))
        });
        rows
    }
}

pub struct GameSimulator {
    params: SimParams,
}

impl GameSimulator {
    pub fn new(params: SimParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self { params })
    }

    /// One plate appearance: 0 for an out, otherwise bases gained (1-4).
    pub fn at_bat<R: Rng + ?Sized>(&self, rng: &mut R, skill: f64) -> u32 {
        let threshold = skill.clamp(0.0, 100.0) * self.params.contact_factor;
        if rng.gen_range(0.0..100.0) < threshold {
            rng.gen_range(1..=4)
        } else {
            0
        }
    }

    /// Runs scored in one half inning; `lineup_pos` carries over between innings.
    fn half_inning<R: Rng + ?Sized>(&self, rng: &mut R, lineup: &[f64], lineup_pos: &mut usize) -> u32 {
        let mut outs = 0;
        let mut runs = 0;
        // bit 0 = first base, bit 1 = second, bit 2 = third
        let mut bases: u8 = 0;

        while outs < 3 {
            let skill = lineup[*lineup_pos % lineup.len()];
            *lineup_pos += 1;

            match self.at_bat(rng, skill) {
                0 => outs += 1,
                hit => {
                    // Batter enters as bit 0, then everyone advances `hit` bases
                    let advanced = (u16::from(bases) << 1 | 1) << (hit - 1);
                    runs += (advanced >> 3).count_ones();
                    bases = (advanced & 0b111) as u8;
                }
            }
        }
        runs
    }

    fn lineup(&self, team: Option<&Team>) -> Vec<f64> {
        let skills: Vec<f64> = team
            .map(|t| t.roster.iter().filter(|p| p.position != "P").map(|p: &Player| p.skill_rating).collect())
            .unwrap_or_default();
        if skills.is_empty() {
            vec![self.params.replacement_skill]
        } else {
            skills
        }
    }

    pub fn play_game<R: Rng + ?Sized>(&self, rng: &mut R, game: &Game, league: &League) -> GameResult {
        let away = self.lineup(league.by_id(game.first_bat));
        let home = self.lineup(league.by_id(game.second_bat));
        let (mut away_pos, mut home_pos) = (0usize, 0usize);
        let (mut away_runs, mut home_runs) = (0u32, 0u32);
        let mut inning = 0;

        loop {
            inning += 1;
            away_runs += self.half_inning(rng, &away, &mut away_pos);

            // Home team skips the bottom of the final inning when already ahead
            let walk_off_possible = !(inning >= self.params.regulation_innings && home_runs > away_runs);
            if walk_off_possible {
                home_runs += self.half_inning(rng, &home, &mut home_pos);
            }

            if inning >= self.params.regulation_innings
                && (home_runs != away_runs || inning >= self.params.max_innings)
            {
                break;
            }
        }

        GameResult {
            label: game.label.clone(),
            first_bat: game.first_bat,
            second_bat: game.second_bat,
            first_bat_runs: away_runs,
            second_bat_runs: home_runs,
            innings: inning,
        }
    }

    /// Plays every game in schedule order with an rng seeded from `seed`.
    pub fn simulate_season(&self, schedule: &SeasonSchedule, league: &League, seed: u64) -> SeasonResults {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut results = SeasonResults {
            games: Vec::with_capacity(schedule.total_games()),
            records: league.teams.iter().map(|t| (t.id, TeamRecord::default())).collect(),
        };

        for game in schedule.games() {
            let result = self.play_game(&mut rng, game, league);

            let (first, second) = (result.first_bat, result.second_bat);
            let (first_runs, second_runs) = (result.first_bat_runs, result.second_bat_runs);
            let winner = result.winner();
            for (team, scored, allowed) in [(first, first_runs, second_runs), (second, second_runs, first_runs)] {
                let record = results.records.entry(team).or_default();
                record.runs_for += scored;
                record.runs_against += allowed;
                match winner {
                    Some(w) if w == team => record.wins += 1,
                    Some(_) => record.losses += 1,
                    None => record.ties += 1,
                }
            }
            results.games.push(result);
        }

        debug!(games = results.games.len(), "simulated season");
        results
    }
}

impl Default for GameSimulator {
    fn default() -> Self {
        Self { params: SimParams::default() }
    }
}
