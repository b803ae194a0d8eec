use super::cursor::ScheduleCursor;
use super::series::{generate_series, SeriesSpec};
use crate::config::BlockParams;
use crate::error::{Result, ScheduleError};
use crate::models::{GameType, ResidencyBlock, TeamId};
use rand::Rng;
use tracing::debug;

/// Rejects fewer than two visitors, duplicates, and a host listed as visitor.
pub(crate) fn validate_visitors(host: TeamId, visitors: &[TeamId]) -> Result<()> {
    let mut eligible: Vec<TeamId> = Vec::with_capacity(visitors.len());
    for v in visitors {
        if *v != host && !eligible.contains(v) {
            eligible.push(*v);
        }
    }
    if visitors.len() < 2 || eligible.len() != visitors.len() {
        return Err(ScheduleError::InsufficientVisitors { host, found: eligible.len() });
    }
    Ok(())
}

/// Builds one regular residency block.
///
/// Every visitor plays a host-bats-second series against the host, then
/// every unordered visitor pair plays an alternating crossroads series at the
/// host's stadium. Labels come from `cursor`, which is closed afterwards.
pub fn build_residency_block<R: Rng + ?Sized>(
    rng: &mut R,
    cursor: &mut ScheduleCursor,
    host: TeamId,
    visitors: &[TeamId],
    params: &BlockParams,
) -> Result<ResidencyBlock> {
    validate_visitors(host, visitors)?;

    let start_label = cursor.day_label();
    let mut games = Vec::new();

    for &visitor in visitors {
        games.extend(generate_series(
            rng,
            cursor,
            &SeriesSpec::host_second(visitor, host, params.host_series_length, GameType::RegularSeason),
        )?);
    }

    for (i, &a) in visitors.iter().enumerate() {
        for &b in &visitors[i + 1..] {
            games.extend(generate_series(
                rng,
                cursor,
                &SeriesSpec::alternating(a, b, host, params.crossroads_series_length, GameType::Crossroads),
            )?);
        }
    }

    let end_label = cursor.last_used_day_label();
    cursor.close_block();

    debug!(
        host = host.0,
        visitors = visitors.len(),
        games = games.len(),
        "built residency block {}..{}",
        start_label,
        end_label
    );

    Ok(ResidencyBlock {
        host,
        visitors: visitors.to_vec(),
        start_label,
        end_label,
        is_apex: false,
        games,
    })
}
