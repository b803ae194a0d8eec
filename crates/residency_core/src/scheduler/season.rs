//! # Season Orchestrator
//!
//! Assembles a full season: one apex residency first, then regular residency
//! blocks until the allocation strategy is satisfied.
//!
//! ## Balanced allocation
//!
//! After every block the per-team tally is updated. The next block takes the
//! three teams with the lowest tally (ties broken by a seeded shuffle); the
//! one with the highest tally among them hosts, because the host plays fewer
//! games than a visitor. Allocation ends once no team is `need_threshold` or
//! more games short of the target.
//!
//! ## Determinism
//!
//! A single rng is threaded through every builder. Same teams, target and
//! config (seed included) give the same schedule.

use super::apex::build_apex_residency_block;
use super::block::build_residency_block;
use super::cursor::ScheduleCursor;
use super::policy::{ApexHostPolicy, ApexHostSelection};
use crate::config::{AllocationParams, AllocationStrategy, SchedulerConfig};
use crate::error::{Result, ScheduleError};
use crate::models::{ResidencyBlock, SeasonSchedule, SkippedHost, Team, TeamId};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One host plus two visitors.
pub const MIN_TEAMS: usize = 3;

pub struct SeasonScheduler<P = ApexHostSelection> {
    config: SchedulerConfig,
    policy: P,
}

impl SeasonScheduler<ApexHostSelection> {
    /// Scheduler using the apex host policy named in `config`.
    pub fn new(config: SchedulerConfig) -> Self {
        let policy = config.apex.host_selection;
        Self { config, policy }
    }
}

impl Default for SeasonScheduler<ApexHostSelection> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<P: ApexHostPolicy> SeasonScheduler<P> {
    /// Replaces the apex host policy.
    pub fn with_policy<Q: ApexHostPolicy>(self, policy: Q) -> SeasonScheduler<Q> {
        SeasonScheduler { config: self.config, policy }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generates a season with a fresh rng seeded from the config.
    pub fn generate_season_schedule(&self, teams: &[Team], games_per_team: u32) -> Result<SeasonSchedule> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.generate_season_schedule_with_rng(&mut rng, teams, games_per_team)
    }

    /// Generates a season drawing all randomness from `rng`.
    pub fn generate_season_schedule_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        teams: &[Team],
        games_per_team: u32,
    ) -> Result<SeasonSchedule> {
        self.config.validate()?;

        let mut ids: Vec<TeamId> = Vec::with_capacity(teams.len());
        for team in teams {
            if !ids.contains(&team.id) {
                ids.push(team.id);
            }
        }
        if ids.len() < MIN_TEAMS {
            warn!(found = ids.len(), "not enough teams for a residency season");
            return Err(ScheduleError::InsufficientTeams { found: ids.len(), required: MIN_TEAMS });
        }

        let mut cursor = ScheduleCursor::new(&self.config.pacing);
        let mut season = SeasonBuilder::new(teams);

        // Step 1: apex residency
        let apex_host = self.policy.select_host(teams).filter(|h| ids.contains(h));
        match apex_host {
            Some(host) => {
                let built = build_apex_residency_block(
                    rng,
                    &mut cursor,
                    host,
                    &ids,
                    self.config.apex.target_games,
                    &self.config.apex,
                );
                season.record(host, built)?;
            }
            None => warn!("apex host policy selected no team in the league; skipping apex residency"),
        }

        // Step 2: regular residencies
        match self.config.allocation.strategy {
            AllocationStrategy::Balanced => {
                self.allocate_balanced(rng, &mut cursor, &mut season, &ids, games_per_team)?
            }
            AllocationStrategy::Legacy => {
                self.allocate_legacy(rng, &mut cursor, &mut season, &ids, apex_host)?
            }
        }

        let schedule = season.finish(teams);
        info!(
            blocks = schedule.blocks.len(),
            games = schedule.total_games(),
            skipped = schedule.skipped_hosts.len(),
            max_deviation = schedule.max_deviation(games_per_team),
            "generated season schedule"
        );
        Ok(schedule)
    }

    fn allocate_balanced<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        cursor: &mut ScheduleCursor,
        season: &mut SeasonBuilder,
        ids: &[TeamId],
        target: u32,
    ) -> Result<()> {
        let block = &self.config.block;
        balanced_allocation(
            rng,
            cursor,
            season,
            ids,
            target,
            &self.config.allocation,
            |rng, cursor, host, visitors| build_residency_block(rng, cursor, host, visitors, block),
        )
    }

    fn allocate_legacy<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        cursor: &mut ScheduleCursor,
        season: &mut SeasonBuilder,
        ids: &[TeamId],
        apex_host: Option<TeamId>,
    ) -> Result<()> {
        let limit = ids.len() / 2;
        let mut regular = 0usize;

        for &host in ids.iter().filter(|id| Some(**id) != apex_host) {
            if regular >= limit {
                break;
            }

            let mut candidates: Vec<TeamId> = ids.iter().copied().filter(|t| *t != host).collect();
            candidates.shuffle(rng);
            candidates.truncate(2);

            let built = build_residency_block(rng, cursor, host, &candidates, &self.config.block);
            if season.record(host, built)? {
                regular += 1;
            }
        }
        Ok(())
    }
}

/// Closed-loop allocation: the three lowest-tally teams form each new block.
///
/// A recoverable build failure skips that host and reshuffles; allocation
/// gives up after `ids.len()` failures in a row.
fn balanced_allocation<R, F>(
    rng: &mut R,
    cursor: &mut ScheduleCursor,
    season: &mut SeasonBuilder,
    ids: &[TeamId],
    target: u32,
    params: &AllocationParams,
    mut build: F,
) -> Result<()>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R, &mut ScheduleCursor, TeamId, &[TeamId]) -> Result<ResidencyBlock>,
{
    let mut order: Vec<TeamId> = ids.to_vec();
    let mut failures_in_row = 0usize;

    for _ in 0..params.max_regular_blocks {
        order.shuffle(rng);
        order.sort_by_key(|id| season.tally_of(*id));

        let neediest = order[0];
        if season.tally_of(neediest) + params.need_threshold > target {
            return Ok(());
        }

        // Highest tally of the three hosts: a host plays fewer games than a visitor.
        let host = order[2];
        let visitors = [order[0], order[1]];
        let built = build(rng, cursor, host, &visitors);
        if season.record(host, built)? {
            failures_in_row = 0;
        } else {
            failures_in_row += 1;
            if failures_in_row >= ids.len() {
                warn!(failures = failures_in_row, "balanced allocation stopped after repeated block failures");
                return Ok(());
            }
        }
    }

    warn!(
        max_regular_blocks = params.max_regular_blocks,
        "balanced allocation hit the block limit before every team reached target"
    );
    Ok(())
}

/// Convenience wrapper: `SeasonScheduler::new(config).generate_season_schedule(..)`.
pub fn generate_season_schedule(
    teams: &[Team],
    games_per_team: u32,
    config: &SchedulerConfig,
) -> Result<SeasonSchedule> {
    SeasonScheduler::new(config.clone()).generate_season_schedule(teams, games_per_team)
}

/// Accumulates blocks, live tallies and skipped hosts during allocation.
struct SeasonBuilder {
    blocks: Vec<ResidencyBlock>,
    tally: BTreeMap<TeamId, u32>,
    skipped: Vec<SkippedHost>,
}

impl SeasonBuilder {
    fn new(teams: &[Team]) -> Self {
        Self {
            blocks: Vec::new(),
            tally: teams.iter().map(|t| (t.id, 0)).collect(),
            skipped: Vec::new(),
        }
    }

    fn tally_of(&self, team: TeamId) -> u32 {
        self.tally.get(&team).copied().unwrap_or(0)
    }

    /// Appends a built block, or logs and records a recoverable failure.
    /// Returns whether a block was appended.
    fn record(&mut self, host: TeamId, built: Result<ResidencyBlock>) -> Result<bool> {
        match built {
            Ok(block) => {
                for game in &block.games {
                    *self.tally.entry(game.first_bat).or_insert(0) += 1;
                    *self.tally.entry(game.second_bat).or_insert(0) += 1;
                }
                debug!(host = host.0, block = self.blocks.len(), "appended residency block");
                self.blocks.push(block);
                Ok(true)
            }
            Err(err) if err.is_recoverable() => {
                warn!(host = host.0, error = %err, "skipping residency host");
                self.skipped.push(SkippedHost { host, reason: err.to_string() });
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn finish(self, teams: &[Team]) -> SeasonSchedule {
        let tally = SeasonSchedule::compute_tally(teams, &self.blocks);
        debug_assert_eq!(tally, self.tally);
        SeasonSchedule { blocks: self.blocks, tally, skipped_hosts: self.skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockParams, PacingParams};
    use crate::league::default_league;
    use crate::models::{GameType, Region};

    fn small_league(n: u32) -> Vec<Team> {
        (1..=n).map(|i| Team::new(i, format!("City {i}"), format!("Theme {i}"), Region::Keystone)).collect()
    }

    #[test]
    fn test_fewer_than_three_teams() {
        let scheduler = SeasonScheduler::new(SchedulerConfig::default());
        let err = scheduler.generate_season_schedule(&small_league(2), 115).unwrap_err();
        assert_eq!(err, ScheduleError::InsufficientTeams { found: 2, required: 3 });
        assert!(!err.is_recoverable());

        assert!(scheduler.generate_season_schedule(&[], 115).is_err());
    }

    #[test]
    fn test_duplicate_teams_do_not_count_twice() {
        let mut teams = small_league(2);
        teams.push(teams[0].clone());
        assert!(matches!(
            SeasonScheduler::new(SchedulerConfig::default()).generate_season_schedule(&teams, 115),
            Err(ScheduleError::InsufficientTeams { found: 2, .. })
        ));
    }

    #[test]
    fn test_apex_block_comes_first() {
        let teams = default_league().teams;
        let schedule = SeasonScheduler::new(SchedulerConfig::default()).generate_season_schedule(&teams, 115).unwrap();

        assert!(schedule.blocks[0].is_apex);
        assert_eq!(schedule.blocks[0].host, teams[0].id);
        assert_eq!(schedule.apex_blocks().count(), 1);
        assert!(schedule.blocks[0].games.iter().all(|g| g.game_type == GameType::ApexResidency));
    }

    #[test]
    fn test_every_block_holds_invariants() {
        let teams = default_league().teams;
        let schedule = SeasonScheduler::new(SchedulerConfig::default()).generate_season_schedule(&teams, 115).unwrap();
        for block in &schedule.blocks {
            block.check_invariants().unwrap();
        }
        assert!(schedule.skipped_hosts.is_empty());
    }

    #[test]
    fn test_balanced_tally_converges() {
        let teams = default_league().teams;
        let config = SchedulerConfig::default();
        let schedule = SeasonScheduler::new(config.clone()).generate_season_schedule(&teams, 115).unwrap();

        let tolerance = config.allocation.tally_tolerance;
        for team in &teams {
            let games = schedule.games_for(team.id);
            assert!(games + config.allocation.need_threshold > 115, "{} short: {}", team.id, games);
            assert!(games.abs_diff(115) <= tolerance, "{} off target: {}", team.id, games);
        }
    }

    #[test]
    fn test_balanced_small_league_reaches_floor() {
        let schedule = SeasonScheduler::new(SchedulerConfig::default()).generate_season_schedule(&small_league(5), 60).unwrap();
        for (_, games) in &schedule.tally {
            assert!(*games > 60 - 4);
        }
    }

    #[test]
    fn test_legacy_block_count() {
        let teams = small_league(4);
        let config = SchedulerConfig::default().with_strategy(AllocationStrategy::Legacy);
        let schedule = SeasonScheduler::new(config).generate_season_schedule(&teams, 115).unwrap();

        // apex + teams / 2
        assert_eq!(schedule.blocks.len(), 1 + 2);
        assert_eq!(schedule.regular_blocks().count(), 2);
        // Legacy hosts follow input order, skipping the apex host
        assert_eq!(schedule.blocks[1].host, TeamId(2));
        assert_eq!(schedule.blocks[2].host, TeamId(3));
        for block in schedule.regular_blocks() {
            assert_eq!(block.games.len(), 11);
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let teams = default_league().teams;
        let scheduler = SeasonScheduler::new(SchedulerConfig::default().with_seed(7));
        let first = scheduler.generate_season_schedule(&teams, 115).unwrap();
        let second = scheduler.generate_season_schedule(&teams, 115).unwrap();

        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }

    #[test]
    fn test_different_seed_different_schedule() {
        let teams = default_league().teams;
        let a = SeasonScheduler::new(SchedulerConfig::default().with_seed(1))
            .generate_season_schedule(&teams, 115)
            .unwrap();
        let b = SeasonScheduler::new(SchedulerConfig::default().with_seed(2))
            .generate_season_schedule(&teams, 115)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_injected_rng_matches_seeded_call() {
        let teams = default_league().teams;
        let scheduler = SeasonScheduler::new(SchedulerConfig::default().with_seed(11));
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let injected = scheduler.generate_season_schedule_with_rng(&mut rng, &teams, 115).unwrap();
        assert_eq!(injected, scheduler.generate_season_schedule(&teams, 115).unwrap());
    }

    #[test]
    fn test_custom_policy() {
        let teams = small_league(6);
        let scheduler = SeasonScheduler::new(SchedulerConfig::default()).with_policy(|teams: &[Team]| teams.last().map(|t| t.id));
        let schedule = scheduler.generate_season_schedule(&teams, 40).unwrap();
        assert_eq!(schedule.blocks[0].host, TeamId(6));
    }

    #[test]
    fn test_policy_outside_league_skips_apex() {
        let teams = small_league(4);
        let scheduler = SeasonScheduler::new(SchedulerConfig::default()).with_policy(|_: &[Team]| Some(TeamId(99)));
        let schedule = scheduler.generate_season_schedule(&teams, 30).unwrap();
        assert_eq!(schedule.apex_blocks().count(), 0);
        assert!(!schedule.is_empty());
    }

    #[test]
    fn test_balanced_moves_past_failed_block() {
        let teams = small_league(5);
        let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let params = AllocationParams::default();
        let block_params = BlockParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cursor = ScheduleCursor::new(&PacingParams::default());
        let mut season = SeasonBuilder::new(&teams);
        let mut calls = 0;

        balanced_allocation(&mut rng, &mut cursor, &mut season, &ids, 40, &params, |rng, cursor, host, visitors| {
            calls += 1;
            if calls == 1 {
                return Err(ScheduleError::InsufficientVisitors { host, found: 1 });
            }
            build_residency_block(rng, cursor, host, visitors, &block_params)
        })
        .unwrap();

        let schedule = season.finish(&teams);
        assert_eq!(schedule.skipped_hosts.len(), 1);
        assert!(!schedule.blocks.is_empty());
        for games in schedule.tally.values() {
            assert!(games + params.need_threshold > 40);
        }
    }

    #[test]
    fn test_balanced_gives_up_after_repeated_failures() {
        let teams = small_league(4);
        let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cursor = ScheduleCursor::new(&PacingParams::default());
        let mut season = SeasonBuilder::new(&teams);

        balanced_allocation(
            &mut rng,
            &mut cursor,
            &mut season,
            &ids,
            40,
            &AllocationParams::default(),
            |_: &mut ChaCha8Rng, _: &mut ScheduleCursor, host: TeamId, _: &[TeamId]| {
                Err(ScheduleError::InvalidSeries(format!("no series for {host}")))
            },
        )
        .unwrap();

        let schedule = season.finish(&teams);
        assert!(schedule.blocks.is_empty());
        assert_eq!(schedule.skipped_hosts.len(), ids.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SchedulerConfig::default();
        config.block.crossroads_series_length = 4;
        let err = SeasonScheduler::new(config).generate_season_schedule(&small_league(4), 30).unwrap_err();
        assert!(matches!(err, ScheduleError::Config(_)));
    }
}
