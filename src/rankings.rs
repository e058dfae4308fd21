use serde::Serialize;

use crate::aggregate::{Aggregator, PlayerRecord};
use crate::model::{PerGroup, PositionGroup};

/// First letter of the label decides the group; anything unrecognised,
/// including an empty label, lands in Forward.
pub fn group_position(raw: &str) -> PositionGroup {
    match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('G') => PositionGroup::Goalkeeper,
        Some('D') => PositionGroup::Defender,
        Some('M') => PositionGroup::Midfielder,
        _ => PositionGroup::Forward,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingRules {
    pub min_minutes: PerGroup<u32>,
    pub limits: PerGroup<usize>,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            min_minutes: PerGroup {
                goalkeeper: 900,
                defender: 900,
                midfielder: 900,
                forward: 600,
            },
            limits: PerGroup {
                goalkeeper: 5,
                defender: 20,
                midfielder: 20,
                forward: 15,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalEntry {
    pub name: String,
    pub team: String,
    pub raw_position: String,
    pub group: PositionGroup,
    pub average_rating: f64,
    pub total_minutes: u32,
    pub match_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub raw_position: String,
    pub average_rating: f64,
    pub total_minutes: u32,
    pub match_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedTables {
    pub goalkeepers: Vec<RankedRow>,
    pub defenders: Vec<RankedRow>,
    pub midfielders: Vec<RankedRow>,
    pub forwards: Vec<RankedRow>,
}

impl RankedTables {
    pub fn group(&self, group: PositionGroup) -> &[RankedRow] {
        match group {
            PositionGroup::Goalkeeper => &self.goalkeepers,
            PositionGroup::Defender => &self.defenders,
            PositionGroup::Midfielder => &self.midfielders,
            PositionGroup::Forward => &self.forwards,
        }
    }

    fn group_mut(&mut self, group: PositionGroup) -> &mut Vec<RankedRow> {
        match group {
            PositionGroup::Goalkeeper => &mut self.goalkeepers,
            PositionGroup::Defender => &mut self.defenders,
            PositionGroup::Midfielder => &mut self.midfielders,
            PositionGroup::Forward => &mut self.forwards,
        }
    }

    pub fn total_rows(&self) -> usize {
        PositionGroup::ALL.iter().map(|g| self.group(*g).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

pub fn final_entry(record: &PlayerRecord, min_minutes: &PerGroup<u32>) -> Option<FinalEntry> {
    let average_rating = record.average_rating()?;
    let group = group_position(&record.raw_position);
    if record.total_minutes < min_minutes.get(group) {
        return None;
    }
    Some(FinalEntry {
        name: record.name.clone(),
        team: record.team.clone(),
        raw_position: record.raw_position.clone(),
        group,
        average_rating,
        total_minutes: record.total_minutes,
        match_count: record.match_count(),
    })
}

/// Surviving players, best average first. The sort is stable so equal
/// averages keep discovery order.
pub fn build_final_entries(players: &Aggregator, min_minutes: &PerGroup<u32>) -> Vec<FinalEntry> {
    let mut entries: Vec<FinalEntry> = players
        .records()
        .iter()
        .filter_map(|r| final_entry(r, min_minutes))
        .collect();
    sort_entries(&mut entries);
    entries
}

pub fn sort_entries(entries: &mut [FinalEntry]) {
    entries.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
}

pub fn rank_tables(sorted: &[FinalEntry], limits: &PerGroup<usize>) -> RankedTables {
    let mut tables = RankedTables::default();
    for entry in sorted {
        let rows = tables.group_mut(entry.group);
        if rows.len() >= limits.get(entry.group) {
            continue;
        }
        rows.push(RankedRow {
            rank: rows.len() + 1,
            name: entry.name.clone(),
            team: entry.team.clone(),
            raw_position: entry.raw_position.clone(),
            average_rating: round2(entry.average_rating),
            total_minutes: entry.total_minutes,
            match_count: entry.match_count,
        });
    }
    tables
}

pub fn compute_rankings(players: &Aggregator, rules: &RankingRules) -> (Vec<FinalEntry>, RankedTables) {
    let entries = build_final_entries(players, &rules.min_minutes);
    let tables = rank_tables(&entries, &rules.limits);
    (entries, tables)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
