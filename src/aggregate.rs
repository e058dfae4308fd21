use std::collections::{HashMap, HashSet};

use crate::model::{LineupPayload, LineupPlayer};

/// Per-match minutes above this are treated as bad upstream data.
pub const MAX_MATCH_MINUTES: u32 = 130;

/// Stable identity for a player across matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerKey {
    Id(u64),
    Name(String),
}

impl PlayerKey {
    pub fn for_player(player_id: Option<u64>, name: &str) -> Self {
        match player_id {
            Some(id) => PlayerKey::Id(id),
            None => PlayerKey::Name(name.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub key: PlayerKey,
    pub name: String,
    pub team: String,
    pub raw_position: String,
    pub ratings: Vec<f64>,
    pub total_minutes: u32,
    pub seen_match_ids: HashSet<u64>,
}

impl PlayerRecord {
    fn new(key: PlayerKey, name: &str) -> Self {
        Self {
            key,
            name: name.to_string(),
            team: String::new(),
            raw_position: String::new(),
            ratings: Vec::new(),
            total_minutes: 0,
            seen_match_ids: HashSet::new(),
        }
    }

    pub fn match_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        Some(self.ratings.iter().sum::<f64>() / self.ratings.len() as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Applied,
    Duplicate,
    /// No name or no rating.
    Incomplete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineupOutcome {
    pub applied: usize,
    pub duplicates: usize,
    pub incomplete: usize,
}

impl LineupOutcome {
    fn count(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Applied => self.applied += 1,
            EntryOutcome::Duplicate => self.duplicates += 1,
            EntryOutcome::Incomplete => self.incomplete += 1,
        }
    }
}

/// Per-player statistics for one scan. Records live in discovery order so
/// that ranking ties resolve the same way on every run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    records: Vec<PlayerRecord>,
    index: HashMap<PlayerKey, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn get(&self, key: &PlayerKey) -> Option<&PlayerRecord> {
        self.index.get(key).map(|&idx| &self.records[idx])
    }

    pub fn apply_lineup(
        &mut self,
        match_id: u64,
        home_team: &str,
        away_team: &str,
        lineup: &LineupPayload,
    ) -> LineupOutcome {
        let mut outcome = LineupOutcome::default();
        for player in &lineup.home {
            outcome.count(self.add_entry(match_id, home_team, player));
        }
        for player in &lineup.away {
            outcome.count(self.add_entry(match_id, away_team, player));
        }
        outcome
    }

    /// Either every field of the record is updated for this match or none is.
    pub fn add_entry(&mut self, match_id: u64, team: &str, player: &LineupPlayer) -> EntryOutcome {
        let Some(name) = player.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return EntryOutcome::Incomplete;
        };
        let Some(rating) = player.rating.filter(|r| r.is_finite()) else {
            return EntryOutcome::Incomplete;
        };

        let key = PlayerKey::for_player(player.player_id, name);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.records.push(PlayerRecord::new(key.clone(), name));
                self.index.insert(key, self.records.len() - 1);
                self.records.len() - 1
            }
        };
        let record = &mut self.records[idx];

        if !record.seen_match_ids.insert(match_id) {
            return EntryOutcome::Duplicate;
        }
        record.ratings.push(rating);
        record.total_minutes += clamp_minutes(player.minutes_played);
        record.team = team.to_string();
        if let Some(pos) = player.position.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            record.raw_position = pos.to_string();
        }
        EntryOutcome::Applied
    }
}

/// Missing or non-numeric minutes count as zero.
pub fn clamp_minutes(raw: Option<f64>) -> u32 {
    let Some(raw) = raw.filter(|m| m.is_finite()) else {
        return 0;
    };
    raw.trunc().clamp(0.0, MAX_MATCH_MINUTES as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_minutes(Some(-5.0)), 0);
        assert_eq!(clamp_minutes(Some(999.0)), 130);
        assert_eq!(clamp_minutes(Some(45.0)), 45);
        assert_eq!(clamp_minutes(Some(89.9)), 89);
        assert_eq!(clamp_minutes(Some(f64::NAN)), 0);
        assert_eq!(clamp_minutes(None), 0);
    }

    #[test]
    fn key_prefers_id() {
        assert_eq!(PlayerKey::for_player(Some(7), "A"), PlayerKey::Id(7));
        assert_eq!(
            PlayerKey::for_player(None, "A"),
            PlayerKey::Name("A".to_string())
        );
    }
}
