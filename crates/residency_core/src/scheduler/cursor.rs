use crate::config::PacingParams;

/// Scheduling cursor that hands out sequence labels.
///
/// Days are plain ordinals; there is no calendar behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCursor {
    day: u32,
    games_today: u32,
    games_per_day: u32,
    rest_days: u32,
}

impl ScheduleCursor {
    pub fn new(pacing: &PacingParams) -> Self {
        Self {
            day: 1,
            games_today: 0,
            games_per_day: pacing.games_per_day.max(1),
            rest_days: pacing.rest_days_between_blocks,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn day_label(&self) -> String {
        format!("Day {:03}", self.day)
    }

    /// Label for the next game slot, then moves past it.
    pub fn next_game_label(&mut self) -> String {
        if self.games_today == self.games_per_day {
            self.day += 1;
            self.games_today = 0;
        }
        self.games_today += 1;
        format!("{} G{}", self.day_label(), self.games_today)
    }

    /// Label of the last day that received a game.
    pub fn last_used_day_label(&self) -> String {
        self.day_label()
    }

    /// Closes the current block: the next block starts after the rest days.
    pub fn close_block(&mut self) {
        let used_today = u32::from(self.games_today > 0);
        self.day += used_today + self.rest_days;
        self.games_today = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roll_over_days() {
        let mut cursor = ScheduleCursor::new(&PacingParams {
            games_per_day: 2,
            rest_days_between_blocks: 1,
        });

        assert_eq!(cursor.next_game_label(), "Day 001 G1");
        assert_eq!(cursor.next_game_label(), "Day 001 G2");
        assert_eq!(cursor.next_game_label(), "Day 002 G1");
        assert_eq!(cursor.last_used_day_label(), "Day 002");

        cursor.close_block();
        // Day 3 is rest, next block opens on day 4
        assert_eq!(cursor.day_label(), "Day 004");
        assert_eq!(cursor.next_game_label(), "Day 004 G1");
    }

    #[test]
    fn test_close_without_games_only_rests() {
        let mut cursor = ScheduleCursor::new(&PacingParams {
            games_per_day: 1,
            rest_days_between_blocks: 2,
        });
        cursor.close_block();
        assert_eq!(cursor.day(), 3);
    }
}
