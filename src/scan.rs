use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::classify::{CompetitionTarget, is_played};
use crate::dates::DateRange;
use crate::model::{LineupPayload, ScheduleEntry};
use crate::rankings::{RankedTables, RankingRules, compute_rankings};

/// Kept per-request failures; anything beyond is only counted.
pub const MAX_ISSUES: usize = 200;

/// Where schedules and lineups come from. Retries and endpoint fallback are
/// the implementation's business; the scan sees one result per call.
pub trait MatchSource {
    fn fetch_schedule(&mut self, date: NaiveDate) -> Result<Vec<ScheduleEntry>>;
    fn fetch_lineup(&mut self, match_id: u64) -> Result<LineupPayload>;
}

/// Progress sink for long scans. Frontends implement what they need.
pub trait ScanObserver {
    fn on_start(&mut self, _total_dates: usize) {}

    /// `index` is zero-based.
    fn on_date(&mut self, _index: usize, _total: usize, _date: NaiveDate) {}

    fn on_log(&mut self, _msg: &str) {}

    fn on_issue(&mut self, _issue: &FetchIssue) {}
}

pub struct NullObserver;
impl ScanObserver for NullObserver {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IssueScope {
    Schedule(NaiveDate),
    Lineup(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchIssue {
    pub scope: IssueScope,
    pub message: String,
}

impl fmt::Display for FetchIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            IssueScope::Schedule(date) => write!(f, "schedule {date}: {}", self.message),
            IssueScope::Lineup(id) => write!(f, "lineup {id}: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounters {
    pub dates_scanned: usize,
    pub schedules_fetched: usize,
    pub entries_scanned: usize,
    pub target_matches: usize,
    pub skipped_unplayed: usize,
    pub duplicate_events: usize,
    pub matches_inspected: usize,
    pub lineups_aggregated: usize,
    pub players_tracked: usize,
    pub players_ranked: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Ranked,
    NoData,
    /// Every schedule request failed.
    Unreachable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub competition: String,
    pub tables: RankedTables,
    pub counters: ScanCounters,
    pub issues: Vec<FetchIssue>,
    pub dropped_issues: usize,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn outcome(&self) -> ScanOutcome {
        if !self.is_empty() {
            ScanOutcome::Ranked
        } else if self.counters.dates_scanned > 0 && self.counters.schedules_fetched == 0 {
            ScanOutcome::Unreachable
        } else {
            ScanOutcome::NoData
        }
    }
}

/// One sequential pass: every date fully processed before the next.
pub struct Scan<'a> {
    target: &'a CompetitionTarget,
    players: Aggregator,
    /// Matches whose lineup was aggregated. A failed fetch stays out so a
    /// re-listing on a later date gets another try.
    seen_events: HashSet<u64>,
    counters: ScanCounters,
    issues: Vec<FetchIssue>,
    dropped_issues: usize,
}

impl<'a> Scan<'a> {
    pub fn new(target: &'a CompetitionTarget) -> Self {
        Self {
            target,
            players: Aggregator::new(),
            seen_events: HashSet::new(),
            counters: ScanCounters::default(),
            issues: Vec::new(),
            dropped_issues: 0,
        }
    }

    pub fn players(&self) -> &Aggregator {
        &self.players
    }

    pub fn counters(&self) -> &ScanCounters {
        &self.counters
    }

    pub fn scan_date(
        &mut self,
        date: NaiveDate,
        source: &mut dyn MatchSource,
        observer: &mut dyn ScanObserver,
    ) {
        self.counters.dates_scanned += 1;
        let entries = match source.fetch_schedule(date) {
            Ok(entries) => entries,
            Err(err) => {
                self.record_issue(IssueScope::Schedule(date), &err, observer);
                return;
            }
        };
        self.counters.schedules_fetched += 1;
        self.counters.entries_scanned += entries.len();

        for entry in &entries {
            if !self.target.matches(entry) {
                continue;
            }
            self.counters.target_matches += 1;
            if !is_played(entry.status) {
                self.counters.skipped_unplayed += 1;
                continue;
            }
            if self.seen_events.contains(&entry.id) {
                self.counters.duplicate_events += 1;
                debug!(match_id = entry.id, "event already scanned");
                continue;
            }
            if self.inspect_match(entry, source, observer) {
                self.seen_events.insert(entry.id);
            }
        }
    }

    fn inspect_match(
        &mut self,
        entry: &ScheduleEntry,
        source: &mut dyn MatchSource,
        observer: &mut dyn ScanObserver,
    ) -> bool {
        self.counters.matches_inspected += 1;
        let lineup = match source.fetch_lineup(entry.id) {
            Ok(lineup) => lineup,
            Err(err) => {
                self.record_issue(IssueScope::Lineup(entry.id), &err, observer);
                return false;
            }
        };
        let outcome = self
            .players
            .apply_lineup(entry.id, &entry.home_team, &entry.away_team, &lineup);
        self.counters.lineups_aggregated += 1;
        debug!(
            match_id = entry.id,
            applied = outcome.applied,
            duplicates = outcome.duplicates,
            incomplete = outcome.incomplete,
            "lineup aggregated"
        );
        observer.on_log(&format!(
            "{} - {}: {} players rated",
            entry.home_team, entry.away_team, outcome.applied
        ));
        true
    }

    fn record_issue(
        &mut self,
        scope: IssueScope,
        err: &anyhow::Error,
        observer: &mut dyn ScanObserver,
    ) {
        let issue = FetchIssue {
            scope,
            message: format!("{err:#}"),
        };
        warn!(%issue, "fetch skipped");
        observer.on_issue(&issue);
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(issue);
        } else {
            self.dropped_issues += 1;
        }
    }

    pub fn finish(mut self, rules: &RankingRules) -> ScanReport {
        let (entries, tables) = compute_rankings(&self.players, rules);
        self.counters.players_tracked = self.players.len();
        self.counters.players_ranked = entries.len();
        ScanReport {
            competition: self.target.name.clone(),
            tables,
            counters: self.counters,
            issues: self.issues,
            dropped_issues: self.dropped_issues,
        }
    }
}

pub fn run_scan(
    target: &CompetitionTarget,
    range: DateRange,
    rules: &RankingRules,
    source: &mut dyn MatchSource,
    observer: &mut dyn ScanObserver,
) -> ScanReport {
    let total = range.len();
    info!(competition = %target.name, from = %range.start, to = %range.end, days = total, "scan started");
    observer.on_start(total);

    let mut scan = Scan::new(target);
    for (index, date) in range.iter().enumerate() {
        observer.on_date(index, total, date);
        scan.scan_date(date, source, observer);
    }

    let report = scan.finish(rules);
    info!(
        matches = report.counters.matches_inspected,
        entries = report.counters.entries_scanned,
        ranked = report.counters.players_ranked,
        issues = report.issues.len() + report.dropped_issues,
        "scan finished"
    );
    report
}
