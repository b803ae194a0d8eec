pub mod schedule;
pub mod team;

pub use schedule::{Game, GameType, ResidencyBlock, SeasonSchedule, SkippedHost};
pub use team::{Player, Region, Team, TeamId, Union};
