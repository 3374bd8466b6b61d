//! Client for the odds provider (the-odds-api v4). The provider
//! credential and the fixed query parameters are injected here; nothing
//! downstream of this module ever sees the key.

use std::env;

use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::http_client::{USER_AGENT_VALUE, body_snippet, http_client};

pub const DEFAULT_ODDS_BASE_URL: &str = "https://api.the-odds-api.com/v4";

const SPORT_KEY: &str = "baseball_mlb";
const REGIONS: &str = "us";
const PREGAME_MARKETS: &str = "totals,alternate_totals";
const LIVE_MARKETS: &str = "totals";
const ODDS_FORMAT: &str = "american";
const DATE_FORMAT: &str = "iso";

#[derive(Debug, Clone)]
pub struct OddsConfig {
    pub base_url: String,
    pub api_key: String,
}

impl OddsConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("ODDS_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("ODDS_API_KEY is not set")?;
        let base_url = env::var("ODDS_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ODDS_BASE_URL.to_string());
        Ok(Self { base_url, api_key })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsEvent {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsBookmaker {
    #[serde(default)]
    pub markets: Vec<OddsMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsOutcome {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub point: Option<f64>,
}

pub fn parse_odds_json(raw: &str) -> Result<Vec<OddsEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid odds json")
}

pub async fn fetch_pregame_odds(cfg: &OddsConfig) -> Result<Vec<OddsEvent>> {
    fetch_odds(cfg, PREGAME_MARKETS, false).await
}

pub async fn fetch_live_odds(cfg: &OddsConfig) -> Result<Vec<OddsEvent>> {
    fetch_odds(cfg, LIVE_MARKETS, true).await
}

async fn fetch_odds(cfg: &OddsConfig, markets: &str, live: bool) -> Result<Vec<OddsEvent>> {
    let url = format!("{}/sports/{SPORT_KEY}/odds", cfg.base_url);
    let mut query = vec![
        ("apiKey", cfg.api_key.as_str()),
        ("regions", REGIONS),
        ("markets", markets),
        ("oddsFormat", ODDS_FORMAT),
        ("dateFormat", DATE_FORMAT),
    ];
    if live {
        query.push(("live", "true"));
    }

    let client = http_client()?;
    let resp = client
        .get(&url)
        .query(&query)
        .header(USER_AGENT, USER_AGENT_VALUE)
        .send()
        .await
        .context("odds request failed")?;
    let status = resp.status();
    let body = resp.text().await.context("failed reading odds body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "odds http {}: {}",
            status,
            body_snippet(&body)
        ));
    }

    parse_odds_json(&body)
}

#[cfg(test)]
mod tests {
    use super::parse_odds_json;

    #[test]
    fn empty_and_null_bodies_parse_as_no_events() {
        assert!(parse_odds_json("").expect("empty should parse").is_empty());
        assert!(
            parse_odds_json("null")
                .expect("null should parse")
                .is_empty()
        );
    }

    #[test]
    fn outcome_without_point_or_price_parses() {
        let raw = r#"[{
            "home_team": "Atlanta Braves",
            "away_team": "New York Mets",
            "bookmakers": [{"markets": [{"key": "totals", "outcomes": [{"name": "Over"}]}]}]
        }]"#;
        let events = parse_odds_json(raw).expect("tolerant parse");
        let outcome = &events[0].bookmakers[0].markets[0].outcomes[0];
        assert_eq!(outcome.name, "Over");
        assert!(outcome.price.is_none());
        assert!(outcome.point.is_none());
    }
}
