use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::classify::CompetitionTarget;
use crate::dates::{DateRange, parse_date};
use crate::error::ConfigError;
use crate::model::PositionGroup;
use crate::rankings::RankingRules;

pub const DEFAULT_FROM: &str = "2025-09-01";
pub const DEFAULT_TO: &str = "2026-01-01";
pub const DEFAULT_LEAGUE: &str = "super-lig";

pub const SOFASCORE_BASE_URLS: &[&str] = &[
    "https://api.sofascore.com/api/v1",
    "https://www.sofascore.com/api/v1",
];

#[derive(Debug, Clone, Copy)]
pub struct Competition {
    pub name: &'static str,
    pub id: u64,
    pub slugs: &'static [&'static str],
}

pub const COMPETITIONS: &[Competition] = &[
    Competition {
        name: "Süper Lig",
        id: 52,
        slugs: &["super-lig", "trendyol-super-lig", "superlig"],
    },
    Competition {
        name: "Premier League",
        id: 17,
        slugs: &["premier-league", "epl"],
    },
    Competition {
        name: "LaLiga",
        id: 8,
        slugs: &["laliga", "la-liga"],
    },
    Competition {
        name: "Serie A",
        id: 23,
        slugs: &["serie-a"],
    },
    Competition {
        name: "Bundesliga",
        id: 35,
        slugs: &["bundesliga"],
    },
    Competition {
        name: "Ligue 1",
        id: 34,
        slugs: &["ligue-1", "ligue1"],
    },
];

/// Looks a competition up by display name, slug alias or numeric id.
pub fn find_competition(key: &str) -> Option<&'static Competition> {
    let wanted = key.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    COMPETITIONS.iter().find(|c| {
        c.name.to_lowercase() == wanted
            || c.slugs.iter().any(|s| *s == wanted)
            || c.id.to_string() == wanted
    })
}

pub fn competition_target(key: &str) -> Result<CompetitionTarget, ConfigError> {
    let Some(comp) = find_competition(key) else {
        let known = COMPETITIONS
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ConfigError::UnknownCompetition {
            key: key.to_string(),
            known,
        });
    };
    Ok(CompetitionTarget::new(comp.name, &[comp.id], comp.slugs))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    Direct,
    Proxy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub connection: ConnectionMode,
    pub base_urls: Vec<String>,
    pub attempts: u32,
    pub backoff: Duration,
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connection: ConnectionMode::Direct,
            base_urls: SOFASCORE_BASE_URLS.iter().map(|s| s.to_string()).collect(),
            attempts: 3,
            backoff: Duration::from_millis(750),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target: CompetitionTarget,
    pub range: DateRange,
    pub rules: RankingRules,
    pub fetch: FetchSettings,
    pub export_path: Option<PathBuf>,
}

const ARG_KEYS: &[(&str, &str)] = &[
    ("league", "RATINGS_LEAGUE"),
    ("from", "RATINGS_FROM"),
    ("to", "RATINGS_TO"),
    ("export", "RATINGS_EXPORT"),
    ("connection", "RATINGS_CONNECTION"),
    ("proxy", "RATINGS_PROXY_URL"),
];

const MIN_KEYS: [(PositionGroup, &str); 4] = [
    (PositionGroup::Goalkeeper, "RATINGS_MIN_GK"),
    (PositionGroup::Defender, "RATINGS_MIN_DEF"),
    (PositionGroup::Midfielder, "RATINGS_MIN_MID"),
    (PositionGroup::Forward, "RATINGS_MIN_FWD"),
];

const TOP_KEYS: [(PositionGroup, &str); 4] = [
    (PositionGroup::Goalkeeper, "RATINGS_TOP_GK"),
    (PositionGroup::Defender, "RATINGS_TOP_DEF"),
    (PositionGroup::Midfielder, "RATINGS_TOP_MID"),
    (PositionGroup::Forward, "RATINGS_TOP_FWD"),
];

impl ScanConfig {
    /// Process environment plus `--key=value` / `--key value` overrides.
    pub fn load(args: &[String]) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), args)
    }

    pub fn from_lookup(
        env: impl Fn(&str) -> Option<String>,
        args: &[String],
    ) -> Result<Self, ConfigError> {
        let overrides = parse_args(args);
        let get = |key: &str| -> Option<String> {
            overrides
                .get(key)
                .cloned()
                .or_else(|| env(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let league = get("RATINGS_LEAGUE").unwrap_or_else(|| DEFAULT_LEAGUE.to_string());
        let mut target = competition_target(&league)?;
        if let Some(ids) = get("RATINGS_LEAGUE_IDS") {
            for raw in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                target.add_id(parse_number("RATINGS_LEAGUE_IDS", raw)?);
            }
        }
        if let Some(slugs) = get("RATINGS_LEAGUE_SLUGS") {
            for slug in slugs.split(',') {
                target.add_slug(slug);
            }
        }

        let start = parse_date("RATINGS_FROM", &get("RATINGS_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()))?;
        let end = parse_date("RATINGS_TO", &get("RATINGS_TO").unwrap_or_else(|| DEFAULT_TO.to_string()))?;
        let range = DateRange::checked(start, end)?;

        let mut rules = RankingRules::default();
        for (group, key) in MIN_KEYS {
            if let Some(raw) = get(key) {
                rules.min_minutes.set(group, parse_number(key, &raw)?);
            }
        }
        for (group, key) in TOP_KEYS {
            if let Some(raw) = get(key) {
                rules.limits.set(group, parse_number(key, &raw)?);
            }
        }

        let mut fetch = FetchSettings::default();
        let proxy = get("RATINGS_PROXY_URL");
        fetch.connection = match get("RATINGS_CONNECTION").map(|m| m.to_lowercase()).as_deref() {
            None | Some("direct") => ConnectionMode::Direct,
            Some("proxy") => ConnectionMode::Proxy(proxy.ok_or(ConfigError::MissingProxyUrl)?),
            Some(other) => return Err(ConfigError::UnknownConnectionMode(other.to_string())),
        };
        if let Some(raw) = get("RATINGS_RETRIES") {
            fetch.attempts = parse_number::<u32>("RATINGS_RETRIES", &raw)?.max(1);
        }
        if let Some(raw) = get("RATINGS_BACKOFF_MS") {
            fetch.backoff = Duration::from_millis(parse_number("RATINGS_BACKOFF_MS", &raw)?);
        }
        if let Some(raw) = get("RATINGS_TIMEOUT_SECS") {
            fetch.timeout = Duration::from_secs(parse_number::<u64>("RATINGS_TIMEOUT_SECS", &raw)?.max(1));
        }

        Ok(Self {
            target,
            range,
            rules,
            fetch,
            export_path: get("RATINGS_EXPORT").map(PathBuf::from),
        })
    }
}

fn parse_args(args: &[String]) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (idx, arg) in args.iter().enumerate() {
        let Some(flag) = arg.strip_prefix("--") else {
            continue;
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, value.to_string()),
            None => {
                let Some(next) = args.get(idx + 1).filter(|n| !n.starts_with("--")) else {
                    continue;
                };
                (flag, next.clone())
            }
        };
        if let Some((_, env_key)) = ARG_KEYS.iter().find(|(arg_name, _)| *arg_name == name) {
            out.insert(env_key.to_string(), value);
        }
    }
    out
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_both_forms() {
        let args = vec![
            "--league=laliga".to_string(),
            "--from".to_string(),
            "2025-10-01".to_string(),
            "--bogus=1".to_string(),
        ];
        let parsed = parse_args(&args);
        assert_eq!(parsed.get("RATINGS_LEAGUE").map(String::as_str), Some("laliga"));
        assert_eq!(parsed.get("RATINGS_FROM").map(String::as_str), Some("2025-10-01"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn find_by_any_key() {
        assert_eq!(find_competition("Premier League").map(|c| c.id), Some(17));
        assert_eq!(find_competition("trendyol-super-lig").map(|c| c.id), Some(52));
        assert_eq!(find_competition("35").map(|c| c.id), Some(35));
        assert!(find_competition("mls").is_none());
    }
}
