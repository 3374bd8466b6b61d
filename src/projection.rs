//! Per-game and slate-wide projection. Live games contribute the runs
//! still expected on top of what has been scored; games yet to start
//! contribute their full pregame consensus; finals contribute nothing
//! beyond the runs already counted.

use crate::odds_fetch::OddsEvent;
use crate::state::{GamePhase, GameProjection, GameRecord, SlateCounts, SlateProjection};
use crate::teams::TeamDirectory;
use crate::totals::collect_game_totals;

fn game_consensus(
    directory: &TeamDirectory,
    events: &[OddsEvent],
    record: &GameRecord,
) -> Option<f64> {
    let home = record.home?;
    let away = record.away?;
    collect_game_totals(directory, events, home, away)
}

fn fmt_total(total: Option<f64>) -> String {
    match total {
        Some(total) => format!("{total:.1}"),
        None => "—".to_string(),
    }
}

pub fn project_game(
    directory: &TeamDirectory,
    record: &GameRecord,
    pregame: &[OddsEvent],
    live: &[OddsEvent],
) -> GameProjection {
    let (contribution, note) = match record.phase {
        GamePhase::Final => (0.0, "Final".to_string()),
        GamePhase::Live => {
            // Estimators in fallback order: the live market, then the
            // pregame market. Both unknown leaves only actual runs.
            let estimates = [
                game_consensus(directory, live, record),
                game_consensus(directory, pregame, record),
            ];
            let total = estimates.into_iter().flatten().next();
            let remaining = (total.unwrap_or(0.0) - record.actual_runs as f64).max(0.0);
            (
                remaining,
                format!(
                    "Live total≈ {} | remaining≈ {remaining:.1}",
                    fmt_total(total)
                ),
            )
        }
        GamePhase::NotStarted => {
            let total = game_consensus(directory, pregame, record);
            (
                total.unwrap_or(0.0),
                format!("Pregame total≈ {}", fmt_total(total)),
            )
        }
    };

    GameProjection {
        game_pk: record.game_pk,
        contribution,
        note,
    }
}

pub fn project_slate(
    directory: &TeamDirectory,
    records: &[GameRecord],
    pregame: &[OddsEvent],
    live: &[OddsEvent],
) -> SlateProjection {
    let mut counts = SlateCounts::default();
    let mut runs_scored = 0u32;
    let mut projected_extra = 0.0;
    let mut games = Vec::with_capacity(records.len());

    for record in records {
        match record.phase {
            GamePhase::Final => counts.final_games += 1,
            GamePhase::Live => counts.live += 1,
            GamePhase::NotStarted => counts.not_started += 1,
        }
        runs_scored += record.actual_runs;

        let projection = project_game(directory, record, pregame, live);
        projected_extra += projection.contribution;
        games.push(projection);
    }

    SlateProjection {
        runs_scored,
        projected_total: runs_scored as f64 + projected_extra,
        counts,
        games,
    }
}
