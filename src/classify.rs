use std::collections::HashSet;

use crate::model::{MatchStatus, ScheduleEntry};

/// Which competition a run analyzes. An entry belongs to it when either its
/// id or its slug is known; the upstream id scheme is not stable enough to
/// require both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitionTarget {
    pub name: String,
    pub ids: HashSet<u64>,
    pub slugs: HashSet<String>,
}

impl CompetitionTarget {
    pub fn new(name: impl Into<String>, ids: &[u64], slugs: &[&str]) -> Self {
        Self {
            name: name.into(),
            ids: ids.iter().copied().collect(),
            slugs: slugs.iter().map(|s| s.trim().to_lowercase()).collect(),
        }
    }

    pub fn add_id(&mut self, id: u64) {
        self.ids.insert(id);
    }

    pub fn add_slug(&mut self, slug: &str) {
        let slug = slug.trim().to_lowercase();
        if !slug.is_empty() {
            self.slugs.insert(slug);
        }
    }

    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        let by_id = entry
            .competition_id
            .is_some_and(|id| self.ids.contains(&id));
        let by_slug = entry
            .competition_slug
            .as_deref()
            .is_some_and(|slug| self.slugs.contains(&slug.trim().to_lowercase()));
        by_id || by_slug
    }
}

/// Only matches that have kicked off carry ratings and minutes.
pub fn is_played(status: MatchStatus) -> bool {
    matches!(status, MatchStatus::Finished | MatchStatus::InProgress)
}

pub fn parse_status(kind: Option<&str>, code: Option<u64>) -> MatchStatus {
    if let Some(kind) = kind {
        let lowered = kind.trim().to_lowercase();
        match lowered.as_str() {
            "finished" => return MatchStatus::Finished,
            "inprogress" | "in_progress" | "live" => return MatchStatus::InProgress,
            "notstarted" | "not_started" => return MatchStatus::NotStarted,
            "postponed" | "delayed" => return MatchStatus::Postponed,
            "canceled" | "cancelled" | "abandoned" => return MatchStatus::Cancelled,
            _ => {}
        }
    }
    match code {
        Some(0) => MatchStatus::NotStarted,
        Some(100 | 110 | 120) => MatchStatus::Finished,
        Some(6 | 7 | 31 | 32 | 33 | 34 | 40 | 41 | 42 | 50) => MatchStatus::InProgress,
        Some(60) => MatchStatus::Postponed,
        Some(70 | 80 | 90) => MatchStatus::Cancelled,
        _ => MatchStatus::Unknown,
    }
}
