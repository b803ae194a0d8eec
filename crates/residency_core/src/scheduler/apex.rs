//! Apex residency: one enlarged, relaxed-rule block per season.
//!
//! Up to `max_visitors` residents are drawn at random from the candidate
//! pool. Host series are short (capped per visitor), every visitor pair
//! plays a short alternating series, and single padding games between the
//! first two visitors top the block up to the target game count. Every game
//! is tagged [`GameType::ApexResidency`].

use super::cursor::ScheduleCursor;
use super::series::{generate_series, BattingOrder, SeriesSpec};
use crate::config::ApexParams;
use crate::error::{Result, ScheduleError};
use crate::models::{Game, GameType, ResidencyBlock, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Shuffles the eligible pool (host and duplicates removed) and keeps up to
/// `max_visitors`.
pub fn select_apex_visitors<R: Rng + ?Sized>(
    rng: &mut R,
    host: TeamId,
    candidate_pool: &[TeamId],
    max_visitors: usize,
) -> Result<Vec<TeamId>> {
    let mut eligible: Vec<TeamId> = Vec::with_capacity(candidate_pool.len());
    for &team in candidate_pool {
        if team != host && !eligible.contains(&team) {
            eligible.push(team);
        }
    }

    eligible.shuffle(rng);
    eligible.truncate(max_visitors);

    if eligible.len() < 2 {
        return Err(ScheduleError::InsufficientVisitors { host, found: eligible.len() });
    }
    Ok(eligible)
}

pub fn build_apex_residency_block<R: Rng + ?Sized>(
    rng: &mut R,
    cursor: &mut ScheduleCursor,
    host: TeamId,
    candidate_pool: &[TeamId],
    target_game_count: u32,
    params: &ApexParams,
) -> Result<ResidencyBlock> {
    let visitors = select_apex_visitors(rng, host, candidate_pool, params.max_visitors)?;

    let start_label = cursor.day_label();
    let mut games: Vec<Game> = Vec::new();

    let per_visitor = params.host_games_cap.min(target_game_count / visitors.len() as u32);
    if per_visitor > 0 {
        for &visitor in &visitors {
            games.extend(generate_series(
                rng,
                cursor,
                &SeriesSpec::host_second(visitor, host, per_visitor, GameType::ApexResidency),
            )?);
        }
    }

    for (i, &a) in visitors.iter().enumerate() {
        for &b in &visitors[i + 1..] {
            games.extend(generate_series(
                rng,
                cursor,
                &SeriesSpec::alternating(a, b, host, params.pair_series_length, GameType::ApexResidency),
            )?);
        }
    }

    // Pad with single games between the first two visitors; larger id bats second.
    let (first, second) = (visitors[0], visitors[1]);
    let padding = SeriesSpec {
        team_a: first,
        team_b: second,
        stadium: host,
        length: 1,
        order: BattingOrder::DesignatedHome(first.max(second)),
        game_type: GameType::ApexResidency,
    };
    while (games.len() as u32) < target_game_count {
        games.extend(generate_series(rng, cursor, &padding)?);
    }

    let end_label = cursor.last_used_day_label();
    cursor.close_block();

    debug!(
        host = host.0,
        visitors = visitors.len(),
        games = games.len(),
        target = target_game_count,
        "built apex residency block"
    );

    Ok(ResidencyBlock {
        host,
        visitors,
        start_label,
        end_label,
        is_apex: true,
        games,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacingParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ids(n: u32) -> Vec<TeamId> {
        (1..=n).map(TeamId).collect()
    }

    fn build(pool: &[TeamId], target: u32, params: &ApexParams) -> Result<ResidencyBlock> {
        let mut rng = ChaCha8Rng::seed_from_u64(2025);
        let mut cursor = ScheduleCursor::new(&PacingParams::default());
        build_apex_residency_block(&mut rng, &mut cursor, TeamId(1), pool, target, params)
    }

    #[test]
    fn test_apex_block_five_team_pool() {
        let block = build(&ids(5), 10, &ApexParams::default()).unwrap();

        assert!(block.is_apex);
        assert_eq!(block.visitors.len(), 4);
        assert!(block.games.len() >= 10);
        assert!(block.games.iter().all(|g| g.game_type == GameType::ApexResidency));
        assert!(block.check_invariants().is_ok());

        // 4 visitors: 2 host games each + 6 pairs x 3
        assert_eq!(block.games.len(), 4 * 2 + 6 * 3);
    }

    #[test]
    fn test_apex_padding_reaches_target() {
        // Pool of 3: two visitors -> 2*2 host games + one 3-game pair = 7, pad to 12
        let block = build(&ids(3), 12, &ApexParams::default()).unwrap();
        assert_eq!(block.visitors.len(), 2);
        assert_eq!(block.games.len(), 12);

        let bigger = block.visitors[0].max(block.visitors[1]);
        let smaller = block.visitors[0].min(block.visitors[1]);
        let padding = &block.games[7..];
        assert_eq!(padding.len(), 5);
        assert!(padding.iter().all(|g| g.second_bat == bigger && g.first_bat == smaller));
    }

    #[test]
    fn test_apex_host_games_capped_by_target_share() {
        // target 3 over 2 visitors -> min(2, 1) = 1 host game each
        let block = build(&ids(3), 3, &ApexParams::default()).unwrap();
        let host_games = block.host_games().count();
        assert_eq!(host_games, 2);
        assert!(block.host_games().all(|g| g.second_bat == TeamId(1)));
    }

    #[test]
    fn test_apex_zero_host_share_skips_host_series() {
        // target 1 over 2 visitors -> 0 host games
        let block = build(&ids(3), 1, &ApexParams::default()).unwrap();
        assert_eq!(block.host_games().count(), 0);
        assert_eq!(block.games.len(), 3);
    }

    #[test]
    fn test_apex_pool_excludes_host_and_duplicates() {
        let pool = vec![TeamId(1), TeamId(2), TeamId(2), TeamId(1)];
        assert!(matches!(
            build(&pool, 10, &ApexParams::default()),
            Err(ScheduleError::InsufficientVisitors { found: 1, .. })
        ));
    }

    #[test]
    fn test_visitor_selection_is_seed_stable() {
        let pool = ids(18);
        let pick = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select_apex_visitors(&mut rng, TeamId(1), &pool, 4).unwrap()
        };
        assert_eq!(pick(9), pick(9));
        assert!(!pick(9).contains(&TeamId(1)));
    }
}
