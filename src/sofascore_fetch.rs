use std::thread;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::parse_status;
use crate::config::FetchSettings;
use crate::http_client::client_for;
use crate::model::{LineupPayload, LineupPlayer, ScheduleEntry};
use crate::scan::MatchSource;

/// SofaScore public JSON API. Tries each base URL in order and retries each
/// one a few times before giving up on a request.
pub struct SofascoreSource {
    client: Client,
    settings: FetchSettings,
}

impl SofascoreSource {
    pub fn new(settings: FetchSettings) -> Result<Self> {
        let client = client_for(&settings)?;
        Ok(Self { client, settings })
    }

    fn fetch_parsed<T>(&self, path: &str, parse: impl Fn(&str) -> Result<T>) -> Result<T> {
        fetch_with_fallback(&self.settings, path, |url| self.fetch_once(url), parse)
    }

    fn fetch_once(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let resp = self.client.get(url).send().context("request failed")?;
        let status = resp.status();
        if !status.is_success() {
            return Err(HttpStatus(status).into());
        }
        resp.text().context("failed reading body")
    }
}

impl MatchSource for SofascoreSource {
    fn fetch_schedule(&mut self, date: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let path = format!("/sport/football/scheduled-events/{date}");
        self.fetch_parsed(&path, parse_schedule_json)
    }

    fn fetch_lineup(&mut self, match_id: u64) -> Result<LineupPayload> {
        let path = format!("/event/{match_id}/lineups");
        self.fetch_parsed(&path, parse_lineup_json)
    }
}

/// Walks `settings.base_urls` in order, giving each up to `attempts` tries
/// with linear backoff. A 404 is final for its base URL; a body that fails to
/// parse is retried like a transport error.
fn fetch_with_fallback<T>(
    settings: &FetchSettings,
    path: &str,
    mut fetch: impl FnMut(&str) -> Result<String>,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<T> {
    if settings.base_urls.is_empty() {
        return Err(anyhow!("no api base urls configured"));
    }
    let attempts = settings.attempts.max(1);
    let mut last_err = None;
    for base in &settings.base_urls {
        let url = format!("{}{path}", base.trim_end_matches('/'));
        for attempt in 1..=attempts {
            match fetch(&url).and_then(|body| parse(&body)) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let not_found = is_not_found(&err);
                    warn!(%url, attempt, error = %err, "request failed");
                    last_err = Some(err);
                    if not_found {
                        break;
                    }
                    if attempt < attempts {
                        thread::sleep(settings.backoff * attempt);
                    }
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("request not attempted")))
        .with_context(|| format!("all endpoints failed for {path}"))
}

#[derive(Debug)]
struct HttpStatus(StatusCode);

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "http {}", self.0)
    }
}

impl std::error::Error for HttpStatus {}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<HttpStatus>()
        .is_some_and(|s| s.0 == StatusCode::NOT_FOUND)
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<ScheduleEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    let Some(events) = root.get("events").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(events.len());
    for ev in events {
        let Some(id) = ev.get("id").and_then(value_to_u64) else {
            continue;
        };
        let unique = ev
            .get("tournament")
            .and_then(|t| t.get("uniqueTournament"));
        let competition_id = unique.and_then(|u| u.get("id")).and_then(value_to_u64);
        let competition_slug = unique
            .and_then(|u| u.get("slug"))
            .and_then(|v| v.as_str())
            .or_else(|| {
                ev.get("tournament")
                    .and_then(|t| t.get("slug"))
                    .and_then(|v| v.as_str())
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let status = ev.get("status");
        let status = parse_status(
            status.and_then(|s| s.get("type")).and_then(|v| v.as_str()),
            status.and_then(|s| s.get("code")).and_then(value_to_u64),
        );
        out.push(ScheduleEntry {
            id,
            competition_id,
            competition_slug,
            status,
            home_team: team_name(ev.get("homeTeam")),
            away_team: team_name(ev.get("awayTeam")),
            start_timestamp: ev.get("startTimestamp").and_then(|v| v.as_i64()),
        });
    }
    Ok(out)
}

pub fn parse_lineup_json(raw: &str) -> Result<LineupPayload> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LineupPayload::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid lineup json")?;
    if !root.is_object() {
        return Err(anyhow!("lineup payload is not an object"));
    }
    Ok(LineupPayload {
        home: parse_side(root.get("home")),
        away: parse_side(root.get("away")),
    })
}

fn parse_side(side: Option<&Value>) -> Vec<LineupPlayer> {
    let Some(players) = side
        .and_then(|s| s.get("players"))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };
    players
        .iter()
        .map(|entry| {
            let player = entry.get("player");
            let stats = entry.get("statistics");
            LineupPlayer {
                player_id: player.and_then(|p| p.get("id")).and_then(value_to_u64),
                name: player
                    .and_then(|p| p.get("name"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                position: entry
                    .get("position")
                    .or_else(|| player.and_then(|p| p.get("position")))
                    .and_then(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                rating: stats.and_then(|s| s.get("rating")).and_then(value_to_f64),
                minutes_played: stats
                    .and_then(|s| s.get("minutesPlayed"))
                    .and_then(value_to_f64),
            }
        })
        .collect()
}

fn team_name(value: Option<&Value>) -> String {
    value
        .and_then(|t| t.get("name").or_else(|| t.get("shortName")))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
