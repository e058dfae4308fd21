use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;

use lineup_ratings::config::{ConnectionMode, ScanConfig};
use lineup_ratings::error::ConfigError;
use lineup_ratings::model::PositionGroup;

fn load(vars: &[(&str, &str)], args: &[&str]) -> Result<ScanConfig, ConfigError> {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    ScanConfig::from_lookup(|key| env.get(key).cloned(), &args)
}

#[test]
fn defaults_target_super_lig() {
    let config = load(&[], &[]).expect("defaults are valid");
    assert_eq!(config.target.name, "Süper Lig");
    assert!(config.target.ids.contains(&52));
    assert!(config.target.slugs.contains("trendyol-super-lig"));
    assert_eq!(config.range.start, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert_eq!(config.range.end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert_eq!(config.rules.min_minutes.get(PositionGroup::Forward), 600);
    assert_eq!(config.rules.limits.get(PositionGroup::Goalkeeper), 5);
    assert_eq!(config.fetch.connection, ConnectionMode::Direct);
    assert_eq!(config.fetch.base_urls.len(), 2);
    assert!(config.export_path.is_none());
}

#[test]
fn args_override_environment() {
    let config = load(
        &[("RATINGS_LEAGUE", "laliga"), ("RATINGS_FROM", "2025-08-01")],
        &["--league=Premier League", "--from", "2025-10-01", "--to=2025-10-07"],
    )
    .expect("valid config");
    assert_eq!(config.target.name, "Premier League");
    assert_eq!(config.range.len(), 7);
}

#[test]
fn thresholds_limits_and_extra_aliases() {
    let config = load(
        &[
            ("RATINGS_MIN_MID", "450"),
            ("RATINGS_TOP_FWD", "3"),
            ("RATINGS_LEAGUE_IDS", "98, 99"),
            ("RATINGS_LEAGUE_SLUGS", "Turkish-Super-League"),
            ("RATINGS_RETRIES", "0"),
            ("RATINGS_BACKOFF_MS", "10"),
        ],
        &[],
    )
    .expect("valid config");
    assert_eq!(config.rules.min_minutes.get(PositionGroup::Midfielder), 450);
    assert_eq!(config.rules.min_minutes.get(PositionGroup::Defender), 900);
    assert_eq!(config.rules.limits.get(PositionGroup::Forward), 3);
    assert!(config.target.ids.contains(&98) && config.target.ids.contains(&99));
    assert!(config.target.slugs.contains("turkish-super-league"));
    assert_eq!(config.fetch.attempts, 1);
    assert_eq!(config.fetch.backoff, Duration::from_millis(10));
}

#[test]
fn unknown_competition_is_rejected() {
    let err = load(&[("RATINGS_LEAGUE", "Eredivisie")], &[]).unwrap_err();
    match err {
        ConfigError::UnknownCompetition { key, known } => {
            assert_eq!(key, "Eredivisie");
            assert!(known.contains("Bundesliga"));
        }
        other => panic!("expected unknown competition, got {other:?}"),
    }
}

#[test]
fn inverted_or_bad_dates_are_rejected() {
    assert!(matches!(
        load(&[], &["--from=2026-02-01", "--to=2026-01-01"]),
        Err(ConfigError::InvalidRange { .. })
    ));
    assert!(matches!(
        load(&[("RATINGS_TO", "yesterday")], &[]),
        Err(ConfigError::InvalidDate { field: "RATINGS_TO", .. })
    ));
}

#[test]
fn connection_modes() {
    let config = load(
        &[
            ("RATINGS_CONNECTION", "PROXY"),
            ("RATINGS_PROXY_URL", "http://127.0.0.1:8080"),
        ],
        &[],
    )
    .expect("valid proxy config");
    assert_eq!(
        config.fetch.connection,
        ConnectionMode::Proxy("http://127.0.0.1:8080".to_string())
    );

    assert_eq!(
        load(&[("RATINGS_CONNECTION", "proxy")], &[]).unwrap_err(),
        ConfigError::MissingProxyUrl
    );
    assert!(matches!(
        load(&[("RATINGS_CONNECTION", "tor")], &[]),
        Err(ConfigError::UnknownConnectionMode(_))
    ));
    assert!(matches!(
        load(&[("RATINGS_TOP_GK", "five")], &[]),
        Err(ConfigError::InvalidNumber { field: "RATINGS_TOP_GK", .. })
    ));
}
