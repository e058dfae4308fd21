use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lineup_ratings::aggregate::Aggregator;
use lineup_ratings::model::{LineupPayload, LineupPlayer};
use lineup_ratings::rankings::{RankingRules, compute_rankings};
use lineup_ratings::sofascore_fetch::{parse_lineup_json, parse_schedule_json};

const POSITIONS: [&str; 4] = ["G", "D", "M", "F"];

fn sample_lineup(match_id: u64) -> LineupPayload {
    let side = |offset: u64| -> Vec<LineupPlayer> {
        (0..14u64)
            .map(|idx| {
                let id = (match_id % 18) * 100 + offset + idx;
                LineupPlayer {
                    player_id: Some(id),
                    name: Some(format!("Player {id}")),
                    position: Some(POSITIONS[(idx % 4) as usize].to_string()),
                    rating: (idx < 13).then_some(6.0 + (id % 30) as f64 / 10.0),
                    minutes_played: Some(if idx < 11 { 90.0 } else { 20.0 }),
                }
            })
            .collect()
    };
    LineupPayload {
        home: side(0),
        away: side(50),
    }
}

fn bench_season_aggregate(c: &mut Criterion) {
    let lineups: Vec<(u64, LineupPayload)> = (1..=306u64).map(|id| (id, sample_lineup(id))).collect();

    c.bench_function("season_aggregate", |b| {
        b.iter(|| {
            let mut agg = Aggregator::new();
            for (id, lineup) in &lineups {
                agg.apply_lineup(*id, "Home", "Away", black_box(lineup));
            }
            black_box(agg.len());
        })
    });
}

fn bench_rankings_compute(c: &mut Criterion) {
    let mut agg = Aggregator::new();
    for id in 1..=306u64 {
        agg.apply_lineup(id, "Home", "Away", &sample_lineup(id));
    }
    let rules = RankingRules::default();

    c.bench_function("rankings_compute", |b| {
        b.iter(|| {
            let (entries, tables) = compute_rankings(black_box(&agg), &rules);
            black_box((entries.len(), tables.total_rows()));
        })
    });
}

fn bench_schedule_parse(c: &mut Criterion) {
    c.bench_function("schedule_parse", |b| {
        b.iter(|| {
            let rows = parse_schedule_json(black_box(SCHEDULE_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_lineup_parse(c: &mut Criterion) {
    c.bench_function("lineup_parse", |b| {
        b.iter(|| {
            let lineup = parse_lineup_json(black_box(LINEUPS_JSON)).unwrap();
            black_box(lineup.home.len() + lineup.away.len());
        })
    });
}

criterion_group!(
    perf,
    bench_season_aggregate,
    bench_rankings_compute,
    bench_schedule_parse,
    bench_lineup_parse
);
criterion_main!(perf);

static SCHEDULE_JSON: &str = include_str!("../tests/fixtures/scheduled_events.json");
static LINEUPS_JSON: &str = include_str!("../tests/fixtures/lineups.json");
