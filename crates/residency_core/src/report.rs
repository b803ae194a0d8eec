// Human-readable schedule and standings rendering
use crate::league::League;
use crate::models::{ResidencyBlock, SeasonSchedule, Union};
use crate::sim::SeasonResults;
use std::fmt::Write;

/// One block: header line plus, when `with_games`, one line per game.
pub fn render_block(block: &ResidencyBlock, league: &League, with_games: bool) -> String {
    let mut out = String::new();
    let visitors: Vec<String> = block.visitors.iter().map(|v| league.city_of(*v)).collect();
    let kind = if block.is_apex { "Apex Residency" } else { "Residency Block" };

    let _ = writeln!(
        out,
        "{}: Host - {}, Visitors - {} ({} to {}, {} games)",
        kind,
        league.city_of(block.host),
        visitors.join(", "),
        block.start_label,
        block.end_label,
        block.games.len()
    );

    if with_games {
        for game in &block.games {
            let _ = writeln!(
                out,
                "    - {} | {} @ {} (Designated Home: {}, Type: {})",
                game.label,
                league.city_of(game.first_bat),
                league.city_of(game.second_bat),
                league.city_of(game.designated_home()),
                game.game_type.label()
            );
        }
    }
    out
}

pub fn render_schedule(schedule: &SeasonSchedule, league: &League, target: u32, with_games: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Season Schedule Summary ---");
    let _ = writeln!(
        out,
        "{} residency blocks, {} games, target {} games per team",
        schedule.blocks.len(),
        schedule.total_games(),
        target
    );

    for block in &schedule.blocks {
        out.push('\n');
        out.push_str(&render_block(block, league, with_games));
    }

    if !schedule.skipped_hosts.is_empty() {
        let _ = writeln!(out, "\nSkipped hosts:");
        for skipped in &schedule.skipped_hosts {
            let _ = writeln!(out, "  {}: {}", league.city_of(skipped.host), skipped.reason);
        }
    }

    let _ = writeln!(out, "\nGames per team:");
    for (team, games) in &schedule.tally {
        let diff = *games as i64 - target as i64;
        let _ = writeln!(out, "  {:<15} {:>4} ({:+})", league.city_of(*team), games, diff);
    }
    let _ = writeln!(
        out,
        "Max deviation: {}, variance: {:.2}",
        schedule.max_deviation(target),
        schedule.variance_from_target(target)
    );
    out
}

pub fn render_league(league: &League) -> String {
    let mut out = String::new();
    for union in Union::ALL {
        let _ = writeln!(out, "{} ({} teams)", union.name(), league.teams_in_union(union).len());
        for region in union.regions() {
            let _ = writeln!(out, "  {}", region.name());
            for team in league.teams_in_region(*region) {
                let skill = team.average_skill().map_or("-".to_string(), |s| format!("{s:.1}"));
                let _ = writeln!(
                    out,
                    "    {:>3} {:<15} {:<22} roster {:>2}, avg skill {}",
                    team.id.0,
                    team.city,
                    team.theme,
                    team.roster.len(),
                    skill
                );
            }
        }
    }
    out
}

pub fn render_standings(results: &SeasonResults, league: &League) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4} {:<15} {:>4} {:>4} {:>3} {:>6} {:>6}", "#", "Team", "W", "L", "T", "PCT", "DIFF");
    for (rank, (team, record)) in results.standings().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<15} {:>4} {:>4} {:>3} {:>6.3} {:>+6}",
            rank + 1,
            league.city_of(*team),
            record.wins,
            record.losses,
            record.ties,
            record.win_pct(),
            record.run_differential()
        );
    }
    out
}
