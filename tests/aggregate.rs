use lineup_ratings::aggregate::{Aggregator, EntryOutcome, PlayerKey};
use lineup_ratings::model::{LineupPayload, LineupPlayer};

fn player(id: Option<u64>, name: &str, pos: Option<&str>, rating: Option<f64>, minutes: Option<f64>) -> LineupPlayer {
    LineupPlayer {
        player_id: id,
        name: Some(name.to_string()),
        position: pos.map(str::to_string),
        rating,
        minutes_played: minutes,
    }
}

#[test]
fn reprocessing_a_match_changes_nothing() {
    let mut agg = Aggregator::new();
    let p = player(Some(1), "Icardi", Some("F"), Some(7.2), Some(90.0));

    assert_eq!(agg.add_entry(10, "Galatasaray", &p), EntryOutcome::Applied);
    let before = agg.get(&PlayerKey::Id(1)).unwrap().clone();

    let replay = player(Some(1), "Icardi", Some("M"), Some(9.9), Some(45.0));
    assert_eq!(agg.add_entry(10, "Other FC", &replay), EntryOutcome::Duplicate);

    let after = agg.get(&PlayerKey::Id(1)).unwrap();
    assert_eq!(after.ratings, before.ratings);
    assert_eq!(after.total_minutes, before.total_minutes);
    assert_eq!(after.seen_match_ids.len(), 1);
    assert_eq!(after.team, "Galatasaray");
    assert_eq!(after.raw_position, "F");
}

#[test]
fn ratings_and_seen_ids_stay_in_step() {
    let mut agg = Aggregator::new();
    let p = player(Some(1), "Icardi", Some("F"), Some(7.0), Some(90.0));
    for match_id in [1, 2, 2, 3, 1, 4] {
        agg.add_entry(match_id, "Galatasaray", &p);
    }
    let rec = agg.get(&PlayerKey::Id(1)).unwrap();
    assert_eq!(rec.ratings.len(), 4);
    assert_eq!(rec.seen_match_ids.len(), 4);
    assert_eq!(rec.match_count(), 4);
    assert_eq!(rec.total_minutes, 360);
}

#[test]
fn minutes_are_clamped_before_summing() {
    let mut agg = Aggregator::new();
    agg.add_entry(1, "T", &player(None, "A", Some("M"), Some(7.0), Some(-5.0)));
    agg.add_entry(2, "T", &player(None, "A", Some("M"), Some(7.0), Some(999.0)));
    agg.add_entry(3, "T", &player(None, "A", Some("M"), Some(7.0), Some(45.0)));
    agg.add_entry(4, "T", &player(None, "A", Some("M"), Some(7.0), None));
    let rec = agg.get(&PlayerKey::Name("A".to_string())).unwrap();
    assert_eq!(rec.total_minutes, 130 + 45);
    assert_eq!(rec.match_count(), 4);
}

#[test]
fn missing_rating_or_name_is_skipped_not_zero() {
    let mut agg = Aggregator::new();
    let unrated = player(Some(5), "Bench", Some("D"), None, Some(0.0));
    assert_eq!(agg.add_entry(1, "T", &unrated), EntryOutcome::Incomplete);
    let nameless = LineupPlayer {
        rating: Some(7.0),
        ..LineupPlayer::default()
    };
    assert_eq!(agg.add_entry(1, "T", &nameless), EntryOutcome::Incomplete);
    assert!(agg.is_empty());

    // A later rated appearance still counts as the first.
    let rated = player(Some(5), "Bench", None, Some(6.8), Some(20.0));
    assert_eq!(agg.add_entry(2, "T", &rated), EntryOutcome::Applied);
    let rec = agg.get(&PlayerKey::Id(5)).unwrap();
    assert_eq!(rec.ratings, vec![6.8]);
    assert_eq!(rec.raw_position, "");
}

#[test]
fn position_and_team_follow_latest_known_values() {
    let mut agg = Aggregator::new();
    agg.add_entry(1, "Fenerbahçe", &player(Some(9), "Tadić", None, Some(7.0), Some(90.0)));
    assert_eq!(agg.get(&PlayerKey::Id(9)).unwrap().raw_position, "");

    agg.add_entry(2, "Fenerbahçe", &player(Some(9), "Tadić", Some("M"), Some(7.0), Some(90.0)));
    agg.add_entry(3, "Başakşehir", &player(Some(9), "Tadić", Some(""), Some(7.0), Some(90.0)));
    let rec = agg.get(&PlayerKey::Id(9)).unwrap();
    assert_eq!(rec.raw_position, "M");
    assert_eq!(rec.team, "Başakşehir");
}

#[test]
fn same_name_different_ids_are_separate_players() {
    let mut agg = Aggregator::new();
    agg.add_entry(1, "A", &player(Some(1), "Mehmet Yılmaz", Some("D"), Some(7.0), Some(90.0)));
    agg.add_entry(1, "B", &player(Some(2), "Mehmet Yılmaz", Some("F"), Some(6.0), Some(90.0)));
    assert_eq!(agg.len(), 2);
}

#[test]
fn apply_lineup_assigns_sides_and_counts() {
    let lineup = LineupPayload {
        home: vec![
            player(Some(1), "Home Keeper", Some("G"), Some(7.0), Some(90.0)),
            player(Some(2), "Home Sub", Some("F"), None, None),
        ],
        away: vec![player(Some(3), "Away Striker", Some("F"), Some(8.0), Some(90.0))],
    };
    let mut agg = Aggregator::new();
    let outcome = agg.apply_lineup(77, "Home FC", "Away FC", &lineup);
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.incomplete, 1);
    assert_eq!(outcome.duplicates, 0);
    assert_eq!(agg.get(&PlayerKey::Id(1)).unwrap().team, "Home FC");
    assert_eq!(agg.get(&PlayerKey::Id(3)).unwrap().team, "Away FC");

    let again = agg.apply_lineup(77, "Home FC", "Away FC", &lineup);
    assert_eq!(again.applied, 0);
    assert_eq!(again.duplicates, 2);
}
