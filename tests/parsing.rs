use std::fs;
use std::path::PathBuf;

use lineup_ratings::classify::CompetitionTarget;
use lineup_ratings::model::MatchStatus;
use lineup_ratings::sofascore_fetch::{parse_lineup_json, parse_schedule_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scheduled_events_fixture() {
    let raw = read_fixture("scheduled_events.json");
    let events = parse_schedule_json(&raw).expect("fixture should parse");

    // The entry without an id is dropped.
    assert_eq!(events.len(), 5);
    assert_eq!(events[0].id, 12001);
    assert_eq!(events[0].competition_id, Some(52));
    assert_eq!(events[0].competition_slug.as_deref(), Some("trendyol-super-lig"));
    assert_eq!(events[0].status, MatchStatus::Finished);
    assert_eq!(events[0].home_team, "Galatasaray");
    assert_eq!(events[0].away_team, "Fenerbahçe");
    assert_eq!(events[0].start_timestamp, Some(1757779200));

    assert_eq!(events[1].status, MatchStatus::InProgress);
    assert_eq!(events[2].status, MatchStatus::NotStarted);

    let slug_only = events.iter().find(|e| e.id == 14001).expect("string id parses");
    assert_eq!(slug_only.competition_id, None);
    assert_eq!(slug_only.competition_slug.as_deref(), Some("super-lig"));
    assert_eq!(slug_only.status, MatchStatus::Finished);
}

#[test]
fn target_matches_by_id_or_slug() {
    let raw = read_fixture("scheduled_events.json");
    let events = parse_schedule_json(&raw).expect("fixture should parse");
    let target = CompetitionTarget::new("Süper Lig", &[52], &["super-lig", "trendyol-super-lig"]);

    let ids: Vec<u64> = events
        .iter()
        .filter(|e| target.matches(e))
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![12001, 12002, 12003, 14001]);

    let id_only = CompetitionTarget::new("by id", &[52], &[]);
    assert!(!id_only.matches(events.iter().find(|e| e.id == 14001).unwrap()));
    let slug_only = CompetitionTarget::new("by slug", &[], &["SUPER-LIG"]);
    assert!(slug_only.matches(events.iter().find(|e| e.id == 14001).unwrap()));
}

#[test]
fn parses_lineups_fixture() {
    let raw = read_fixture("lineups.json");
    let lineup = parse_lineup_json(&raw).expect("fixture should parse");
    assert_eq!(lineup.home.len(), 4);
    assert_eq!(lineup.away.len(), 3);

    let keeper = &lineup.home[0];
    assert_eq!(keeper.player_id, Some(900001));
    assert_eq!(keeper.name.as_deref(), Some("Fernando Muslera"));
    assert_eq!(keeper.position.as_deref(), Some("G"));
    assert_eq!(keeper.rating, Some(7.4));
    assert_eq!(keeper.minutes_played, Some(90.0));

    // Numeric strings are accepted.
    assert_eq!(lineup.home[1].rating, Some(6.9));
    assert_eq!(lineup.home[1].minutes_played, Some(90.0));

    assert_eq!(lineup.home[3].rating, None);
    assert_eq!(lineup.away[0].position, None);
    assert_eq!(lineup.away[1].name, None);
    assert_eq!(lineup.away[2].minutes_played, None);
}

#[test]
fn null_payloads_are_empty() {
    assert!(parse_schedule_json("null").expect("null should parse").is_empty());
    assert!(parse_schedule_json("{}").expect("object should parse").is_empty());
    let lineup = parse_lineup_json("null").expect("null should parse");
    assert!(lineup.home.is_empty() && lineup.away.is_empty());
}

#[test]
fn malformed_payloads_fail() {
    assert!(parse_schedule_json("{\"events\": [").is_err());
    assert!(parse_lineup_json("<html>blocked</html>").is_err());
    assert!(parse_lineup_json("[1,2]").is_err());
}
