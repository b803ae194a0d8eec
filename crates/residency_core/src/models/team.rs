use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable team identifier. Ordering is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Top-level league division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Union {
    Atlantic,
    Pacific,
}

impl Union {
    pub const ALL: [Union; 2] = [Union::Atlantic, Union::Pacific];

    pub fn name(&self) -> &'static str {
        match self {
            Union::Atlantic => "Atlantic Union",
            Union::Pacific => "Pacific Union",
        }
    }

    pub fn regions(&self) -> &'static [Region] {
        match self {
            Union::Atlantic => &[Region::Keystone, Region::Tidewater, Region::Confluence],
            Union::Pacific => &[
                Region::GoldenPennant,
                Region::CascadeTerritory,
                Region::SunstoneDivision,
                Region::HeartlandCore,
            ],
        }
    }
}

/// Sub-grouping of teams. Each region belongs to exactly one union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    // Atlantic
    Keystone,
    Tidewater,
    Confluence,
    // Pacific
    GoldenPennant,
    CascadeTerritory,
    SunstoneDivision,
    HeartlandCore,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Keystone,
        Region::Tidewater,
        Region::Confluence,
        Region::GoldenPennant,
        Region::CascadeTerritory,
        Region::SunstoneDivision,
        Region::HeartlandCore,
    ];

    pub fn union(&self) -> Union {
        match self {
            Region::Keystone | Region::Tidewater | Region::Confluence => Union::Atlantic,
            Region::GoldenPennant
            | Region::CascadeTerritory
            | Region::SunstoneDivision
            | Region::HeartlandCore => Union::Pacific,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Keystone => "Keystone",
            Region::Tidewater => "Tidewater",
            Region::Confluence => "The Confluence",
            Region::GoldenPennant => "Golden Pennant",
            Region::CascadeTerritory => "Cascade Territory",
            Region::SunstoneDivision => "Sunstone Division",
            Region::HeartlandCore => "Heartland Core",
        }
    }
}

/// Roster entry. Pure data; the scheduler never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Position tag, e.g. "P", "C", "1B", "CF".
    pub position: String,
    /// Overall skill, 0.0-100.0
    pub skill_rating: f64,
    pub salary: f64,
    pub market_value: f64,
    #[serde(default)]
    pub is_star: bool,
}

impl Player {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        position: impl Into<String>,
        skill_rating: f64,
        salary: f64,
        market_value: f64,
        is_star: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            skill_rating,
            salary,
            market_value,
            is_star,
        }
    }
}

/// League member club. Read-only to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub city: String,
    /// Mascot or fan theme; clubs carry no official name yet.
    pub theme: String,
    pub union: Union,
    pub region: Region,
    #[serde(default)]
    pub roster: Vec<Player>,
}

impl Team {
    /// Builds a team with an empty roster. The union is derived from the region.
    pub fn new(id: u32, city: impl Into<String>, theme: impl Into<String>, region: Region) -> Self {
        Self {
            id: TeamId(id),
            city: city.into(),
            theme: theme.into(),
            union: region.union(),
            region,
            roster: Vec::new(),
        }
    }

    pub fn with_roster(mut self, roster: Vec<Player>) -> Self {
        self.roster = roster;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.region.union() != self.union {
            return Err(format!(
                "Team {} ({}) is in region {} which belongs to {}, not {}",
                self.id,
                self.city,
                self.region.name(),
                self.region.union().name(),
                self.union.name()
            ));
        }
        for player in &self.roster {
            if !(0.0..=100.0).contains(&player.skill_rating) {
                return Err(format!(
                    "Player {} on team {} has skill {} outside 0-100",
                    player.name, self.id, player.skill_rating
                ));
            }
        }
        Ok(())
    }

    /// Mean roster skill, or `None` for an empty roster.
    pub fn average_skill(&self) -> Option<f64> {
        if self.roster.is_empty() {
            return None;
        }
        let sum: f64 = self.roster.iter().map(|p| p.skill_rating).sum();
        Some(sum / self.roster.len() as f64)
    }

    pub fn star_count(&self) -> usize {
        self.roster.iter().filter(|p| p.is_star).count()
    }

    pub fn payroll(&self) -> f64 {
        self.roster.iter().map(|p| p.salary).sum()
    }
}
