//! Series generation between two teams.
//!
//! A series is a fixed run of games between the same two clubs at one
//! stadium. Who bats second (the designated home team for batting) follows
//! one of three rules:
//!
//! - [`BattingOrder::HostSecond`]: the stadium team bats second every game.
//! - [`BattingOrder::Alternating`]: one coin flip decides game 1, then the
//!   first-bat slot flips every game. An odd length leaves one team with one
//!   extra first-bat game (5 games split 3-2).
//! - [`BattingOrder::DesignatedHome`]: a fixed participant bats second.

use super::cursor::ScheduleCursor;
use crate::error::{Result, ScheduleError};
use crate::models::{Game, GameType, TeamId};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattingOrder {
    HostSecond,
    Alternating,
    DesignatedHome(TeamId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub stadium: TeamId,
    pub length: u32,
    pub order: BattingOrder,
    pub game_type: GameType,
}

impl SeriesSpec {
    /// Host-vs-visitor series: `host` owns the stadium and bats second.
    pub fn host_second(visitor: TeamId, host: TeamId, length: u32, game_type: GameType) -> Self {
        Self {
            team_a: visitor,
            team_b: host,
            stadium: host,
            length,
            order: BattingOrder::HostSecond,
            game_type,
        }
    }

    /// Alternating series between two residents at `stadium`.
    pub fn alternating(
        team_a: TeamId,
        team_b: TeamId,
        stadium: TeamId,
        length: u32,
        game_type: GameType,
    ) -> Self {
        Self { team_a, team_b, stadium, length, order: BattingOrder::Alternating, game_type }
    }

    fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(ScheduleError::InvalidSeries(format!(
                "series {} vs {} has zero length",
                self.team_a, self.team_b
            )));
        }
        if self.team_a == self.team_b {
            return Err(ScheduleError::InvalidSeries(format!(
                "team {} cannot play a series against itself",
                self.team_a
            )));
        }
        let home = match self.order {
            BattingOrder::HostSecond => Some(self.stadium),
            BattingOrder::DesignatedHome(team) => Some(team),
            BattingOrder::Alternating => None,
        };
        if let Some(home) = home {
            if home != self.team_a && home != self.team_b {
                return Err(ScheduleError::InvalidSeries(format!(
                    "home team {} is not part of series {} vs {}",
                    home, self.team_a, self.team_b
                )));
            }
        }
        Ok(())
    }
}

/// (first_bat, second_bat) for each game of an alternating series.
///
/// Game `i` has `team_a` batting first when `(i is even) == team_a_first_in_game1`.
pub fn alternating_order(
    team_a: TeamId,
    team_b: TeamId,
    length: u32,
    team_a_first_in_game1: bool,
) -> Vec<(TeamId, TeamId)> {
    (0..length)
        .map(|i| {
            if (i % 2 == 0) == team_a_first_in_game1 {
                (team_a, team_b)
            } else {
                (team_b, team_a)
            }
        })
        .collect()
}

/// Builds the games of one series. Only [`BattingOrder::Alternating`]
/// consumes randomness: exactly one draw at series start.
pub fn generate_series<R: Rng + ?Sized>(
    rng: &mut R,
    cursor: &mut ScheduleCursor,
    spec: &SeriesSpec,
) -> Result<Vec<Game>> {
    spec.validate()?;

    let pairs = match spec.order {
        BattingOrder::Alternating => {
            let team_a_first = rng.gen_bool(0.5);
            alternating_order(spec.team_a, spec.team_b, spec.length, team_a_first)
        }
        BattingOrder::HostSecond => fixed_home(spec, spec.stadium),
        BattingOrder::DesignatedHome(home) => fixed_home(spec, home),
    };

    Ok(pairs
        .into_iter()
        .map(|(first_bat, second_bat)| Game {
            first_bat,
            second_bat,
            stadium: spec.stadium,
            label: cursor.next_game_label(),
            game_type: spec.game_type,
        })
        .collect())
}

fn fixed_home(spec: &SeriesSpec, home: TeamId) -> Vec<(TeamId, TeamId)> {
    let away = if home == spec.team_a { spec.team_b } else { spec.team_a };
    vec![(away, home); spec.length as usize]
}
