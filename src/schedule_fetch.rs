//! MLB statsapi client: the daily schedule (with probable-pitcher
//! season stats) and the per-game live feed. The schedule shape is
//! stable enough for typed structs; the live feed is deep and volatile,
//! so relevant fields are picked out of a `serde_json::Value`.

use std::env;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::{body_snippet, http_client};
use crate::state::PitcherLine;

pub const DEFAULT_STATS_BASE_URL: &str = "https://statsapi.mlb.com/api";

const SPORT_ID: &str = "1";
const SCHEDULE_HYDRATE: &str = "probablePitcher(note,name,stats(type=season,group=pitching))";

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub base_url: String,
}

impl StatsConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("STATS_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATS_BASE_URL.to_string());
        Self { base_url }
    }
}

/// "Today" for slate purposes, shifted by a fixed offset from UTC so
/// the slate rolls over on US Pacific mornings rather than at UTC
/// midnight. The empty-slate fallback in the refresh cycle absorbs the
/// DST edge this approximation leaves open.
pub fn slate_date(utc_offset_hours: i64) -> NaiveDate {
    (Utc::now() + ChronoDuration::hours(utc_offset_hours)).date_naive()
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<ScheduleGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleGame {
    #[serde(rename = "gamePk")]
    pub game_pk: u64,
    #[serde(default)]
    pub status: ScheduleStatus,
    pub teams: ScheduleTeams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleStatus {
    #[serde(rename = "abstractGameState", default)]
    pub abstract_game_state: String,
    #[serde(rename = "detailedState", default)]
    pub detailed_state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleTeams {
    pub home: ScheduleSide,
    pub away: ScheduleSide,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSide {
    pub team: ScheduleTeamName,
    #[serde(rename = "probablePitcher", default)]
    pub probable_pitcher: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleTeamName {
    pub name: String,
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<ScheduleGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let response: ScheduleResponse =
        serde_json::from_str(trimmed).context("invalid schedule json")?;
    Ok(response
        .dates
        .into_iter()
        .next()
        .map(|date| date.games)
        .unwrap_or_default())
}

pub async fn fetch_schedule(cfg: &StatsConfig, date: NaiveDate) -> Result<Vec<ScheduleGame>> {
    let url = format!("{}/v1/schedule", cfg.base_url);
    let date_param = date.format("%Y-%m-%d").to_string();

    let client = http_client()?;
    let resp = client
        .get(&url)
        .query(&[
            ("sportId", SPORT_ID),
            ("date", date_param.as_str()),
            ("hydrate", SCHEDULE_HYDRATE),
        ])
        .send()
        .await
        .context("schedule request failed")?;
    let status = resp.status();
    let body = resp.text().await.context("failed reading schedule body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "schedule http {}: {}",
            status,
            body_snippet(&body)
        ));
    }

    parse_schedule_json(&body)
}

/// Probable pitcher with season pitching stats, picked out of the
/// hydrated schedule payload. Absent or unexpected nodes degrade to
/// missing fields, never to an error.
pub fn parse_pitcher(value: &Value) -> Option<PitcherLine> {
    let name = value.get("fullName")?.as_str()?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let mut era = None;
    let mut wins = None;
    let mut losses = None;
    if let Some(groups) = value.get("stats").and_then(|v| v.as_array()) {
        for group in groups {
            let is_pitching = group
                .get("group")
                .and_then(|g| g.get("displayName"))
                .and_then(|v| v.as_str())
                == Some("pitching");
            let is_season = group
                .get("type")
                .and_then(|t| t.get("displayName"))
                .and_then(|v| v.as_str())
                == Some("season");
            if !(is_pitching && is_season) {
                continue;
            }
            let Some(stats) = group.get("stats") else {
                continue;
            };
            era = stats.get("era").and_then(stat_to_string);
            wins = stats.get("wins").and_then(|v| v.as_u64()).map(|v| v as u32);
            losses = stats
                .get("losses")
                .and_then(|v| v.as_u64())
                .map(|v| v as u32);
            break;
        }
    }

    Some(PitcherLine {
        name,
        era,
        wins,
        losses,
    })
}

fn stat_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Snapshot of a game's live feed: combined runs plus enough status to
/// label the game. Defaults are zero/empty so a failed or pregame feed
/// reads as "no runs yet".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinescoreSnapshot {
    pub total_runs: u32,
    pub detailed_state: String,
    pub inning: Option<u8>,
    pub is_top: Option<bool>,
}

pub fn parse_feed_json(raw: &str) -> Result<LinescoreSnapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LinescoreSnapshot::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid live feed json")?;

    let linescore = root.get("liveData").and_then(|v| v.get("linescore"));
    let side_runs = |side: &str| -> u64 {
        linescore
            .and_then(|ls| ls.get("teams"))
            .and_then(|teams| teams.get(side))
            .and_then(|team| team.get("runs"))
            .and_then(|runs| runs.as_u64())
            .unwrap_or(0)
    };
    let total_runs = (side_runs("home") + side_runs("away")) as u32;

    let status = root.get("gameData").and_then(|v| v.get("status"));
    let detailed_state = status
        .and_then(|s| s.get("detailedState"))
        .and_then(|v| v.as_str())
        .or_else(|| {
            status
                .and_then(|s| s.get("abstractGameState"))
                .and_then(|v| v.as_str())
        })
        .unwrap_or_default()
        .to_string();

    let inning = linescore
        .and_then(|ls| ls.get("currentInning"))
        .and_then(|v| v.as_u64())
        .map(|v| v.min(u8::MAX as u64) as u8);
    let is_top = linescore
        .and_then(|ls| ls.get("isTopInning"))
        .and_then(|v| v.as_bool());

    Ok(LinescoreSnapshot {
        total_runs,
        detailed_state,
        inning,
        is_top,
    })
}

pub async fn fetch_linescore(cfg: &StatsConfig, game_pk: u64) -> Result<LinescoreSnapshot> {
    let url = format!("{}/v1.1/game/{game_pk}/feed/live", cfg.base_url);

    let client = http_client()?;
    let resp = client
        .get(&url)
        .send()
        .await
        .context("live feed request failed")?;
    let status = resp.status();
    let body = resp.text().await.context("failed reading live feed body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "live feed http {}: {}",
            status,
            body_snippet(&body)
        ));
    }

    parse_feed_json(&body)
}
