// Residency season scheduling: series -> blocks -> season

pub mod apex;
pub mod block;
pub mod cursor;
pub mod policy;
pub mod season;
pub mod series;

pub use apex::{build_apex_residency_block, select_apex_visitors};
pub use block::build_residency_block;
pub use cursor::ScheduleCursor;
pub use policy::{ApexHostPolicy, ApexHostSelection};
pub use season::{generate_season_schedule, SeasonScheduler, MIN_TEAMS};
pub use series::{alternating_order, generate_series, BattingOrder, SeriesSpec};
