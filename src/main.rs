use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures_util::future::join_all;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use runslate::odds_fetch::{self, OddsConfig, OddsEvent};
use runslate::projection::project_slate;
use runslate::schedule_fetch::{self, LinescoreSnapshot, ScheduleGame, StatsConfig};
use runslate::state::{GamePhase, GameRecord, SlateProjection};
use runslate::teams::TeamDirectory;

const DEFAULT_POLL_SECS: u64 = 60;
const DEFAULT_SLATE_UTC_OFFSET_HOURS: i64 = -7;

#[derive(Debug, Clone)]
struct CycleConfig {
    odds: OddsConfig,
    stats: StatsConfig,
    poll: Duration,
    date_override: Option<NaiveDate>,
    utc_offset_hours: i64,
}

impl CycleConfig {
    fn from_env() -> Result<Self> {
        let odds = OddsConfig::from_env()?;
        let stats = StatsConfig::from_env();
        let poll = Duration::from_secs(
            env::var("SLATE_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(DEFAULT_POLL_SECS)
                .max(10),
        );
        let date_override = opt_date_env("SLATE_DATE");
        let utc_offset_hours = env::var("SLATE_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|val| val.parse::<i64>().ok())
            .unwrap_or(DEFAULT_SLATE_UTC_OFFSET_HOURS)
            .clamp(-12, 14);
        Ok(Self {
            odds,
            stats,
            poll,
            date_override,
            utc_offset_hours,
        })
    }
}

fn opt_date_env(key: &str) -> Option<NaiveDate> {
    env::var(key)
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
}

#[derive(Debug)]
struct SlateReport {
    date: NaiveDate,
    next_slate: bool,
    records: Vec<GameRecord>,
    slate: SlateProjection,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = CycleConfig::from_env()?;
    let directory = TeamDirectory::standard();
    info!(
        "refreshing every {}s (newline on stdin forces a refresh)",
        config.poll.as_secs()
    );

    let mut interval = tokio::time::interval(config.poll);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            line = stdin_lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(_)) => {
                        info!("manual refresh requested");
                        interval.reset();
                    }
                    // stdin closed: keep running on the timer alone.
                    _ => {
                        stdin_open = false;
                        continue;
                    }
                }
            }
        }

        match run_cycle(&config, &directory).await {
            Ok(report) => print_report(&report),
            Err(err) => error!("slate data unavailable: {err:#}"),
        }
    }
}

/// One full refresh cycle. Schedule failure aborts the cycle; odds and
/// per-game live-feed failures degrade (empty odds, zero runs) with a
/// warning. All accumulation state is local to the call.
async fn run_cycle(config: &CycleConfig, directory: &TeamDirectory) -> Result<SlateReport> {
    let mut date = config
        .date_override
        .unwrap_or_else(|| schedule_fetch::slate_date(config.utc_offset_hours));
    let mut next_slate = false;

    let mut games = schedule_fetch::fetch_schedule(&config.stats, date)
        .await
        .context("schedule fetch failed")?;
    if games.is_empty() && config.date_override.is_none() {
        if let Some(tomorrow) = date.succ_opt() {
            warn!("no games scheduled for {date}, trying {tomorrow}");
            games = schedule_fetch::fetch_schedule(&config.stats, tomorrow)
                .await
                .context("schedule fetch failed")?;
            date = tomorrow;
            next_slate = true;
        }
    }

    let (pregame, live) = tokio::join!(
        odds_fetch::fetch_pregame_odds(&config.odds),
        odds_fetch::fetch_live_odds(&config.odds),
    );
    let pregame = events_or_empty(pregame, "pregame");
    let live = events_or_empty(live, "live");
    debug!(
        "{} pregame events, {} live events",
        pregame.len(),
        live.len()
    );

    let linescores = join_all(
        games
            .iter()
            .map(|game| schedule_fetch::fetch_linescore(&config.stats, game.game_pk)),
    )
    .await;

    let mut records = Vec::with_capacity(games.len());
    for (game, linescore) in games.into_iter().zip(linescores) {
        records.push(build_record(directory, game, linescore));
    }

    let slate = project_slate(directory, &records, &pregame, &live);
    Ok(SlateReport {
        date,
        next_slate,
        records,
        slate,
    })
}

fn events_or_empty(result: Result<Vec<OddsEvent>>, source: &str) -> Vec<OddsEvent> {
    match result {
        Ok(events) => events,
        Err(err) => {
            warn!("{source} odds fetch failed: {err:#}");
            Vec::new()
        }
    }
}

fn build_record(
    directory: &TeamDirectory,
    game: ScheduleGame,
    linescore: Result<LinescoreSnapshot>,
) -> GameRecord {
    let linescore = match linescore {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("live feed failed for game {}: {err:#}", game.game_pk);
            LinescoreSnapshot::default()
        }
    };

    let home_name = game.teams.home.team.name;
    let away_name = game.teams.away.team.name;
    let home = directory.resolve(&home_name);
    let away = directory.resolve(&away_name);
    if home.is_none() {
        warn!("unrecognised home team '{home_name}' for game {}", game.game_pk);
    }
    if away.is_none() {
        warn!("unrecognised away team '{away_name}' for game {}", game.game_pk);
    }

    let home_pitcher = game
        .teams
        .home
        .probable_pitcher
        .as_ref()
        .and_then(schedule_fetch::parse_pitcher);
    let away_pitcher = game
        .teams
        .away
        .probable_pitcher
        .as_ref()
        .and_then(schedule_fetch::parse_pitcher);

    let detailed_state = if game.status.detailed_state.is_empty() {
        linescore.detailed_state.clone()
    } else {
        game.status.detailed_state.clone()
    };

    GameRecord {
        game_pk: game.game_pk,
        home_name,
        away_name,
        home,
        away,
        phase: GamePhase::from_abstract_state(&game.status.abstract_game_state),
        detailed_state,
        actual_runs: linescore.total_runs,
        inning: linescore.inning,
        is_top: linescore.is_top,
        home_pitcher,
        away_pitcher,
    }
}

fn print_report(report: &SlateReport) {
    let slate = &report.slate;
    let suffix = if report.next_slate {
        " (showing next slate)"
    } else {
        ""
    };

    println!();
    println!("MLB slate for {}{suffix}", report.date);
    println!(
        "runs scored: {}  |  projected total: {:.1}",
        slate.runs_scored, slate.projected_total
    );
    println!(
        "final: {}  live: {}  not started: {}",
        slate.counts.final_games, slate.counts.live, slate.counts.not_started
    );

    for (record, projection) in report.records.iter().zip(&slate.games) {
        println!(
            "  {} @ {}  [{}]  {}",
            record.away_name,
            record.home_name,
            record.phase_label(),
            projection.note
        );
        let away_sp = record
            .away_pitcher
            .as_ref()
            .map(|p| p.summary())
            .unwrap_or_else(|| "TBD".to_string());
        let home_sp = record
            .home_pitcher
            .as_ref()
            .map(|p| p.summary())
            .unwrap_or_else(|| "TBD".to_string());
        println!("    away SP: {away_sp}  |  home SP: {home_sp}");
    }

    if report.records.is_empty() {
        println!("  no games found for the selected date");
    }
}
