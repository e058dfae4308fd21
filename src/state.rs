use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::model::PositionGroup;
use crate::rankings::RankedRow;
use crate::scan::{FetchIssue, ScanCounters, ScanReport};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Running,
    Done,
    /// The worker could not start scanning; no further scans will run.
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub current: usize,
    pub total: usize,
    pub date: Option<NaiveDate>,
}

impl ScanProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportState {
    None,
    Running { path: String },
    Done { path: String, rows: usize },
    Failed { path: String, error: String },
}

pub struct AppState {
    pub competition: String,
    pub phase: ScanPhase,
    pub progress: ScanProgress,
    pub issue_count: usize,
    pub report: Option<ScanReport>,
    pub failure: Option<String>,
    pub group: PositionGroup,
    pub scroll: usize,
    pub logs: VecDeque<String>,
    pub export: ExportState,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            competition: String::new(),
            phase: ScanPhase::Idle,
            progress: ScanProgress::default(),
            issue_count: 0,
            report: None,
            failure: None,
            group: PositionGroup::Goalkeeper,
            scroll: 0,
            logs: VecDeque::new(),
            export: ExportState::None,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn counters(&self) -> ScanCounters {
        self.report
            .as_ref()
            .map(|r| r.counters)
            .unwrap_or_default()
    }

    pub fn current_rows(&self) -> &[RankedRow] {
        match &self.report {
            Some(report) => report.tables.group(self.group),
            None => &[],
        }
    }

    pub fn cycle_group_next(&mut self) {
        self.group = PositionGroup::ALL[(self.group.index() + 1) % PositionGroup::ALL.len()];
        self.scroll = 0;
    }

    pub fn cycle_group_prev(&mut self) {
        let len = PositionGroup::ALL.len();
        self.group = PositionGroup::ALL[(self.group.index() + len - 1) % len];
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        let max = self.current_rows().len().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    ScanStarted {
        competition: String,
        total_dates: usize,
    },
    Progress {
        current: usize,
        total: usize,
        date: NaiveDate,
    },
    Issue(FetchIssue),
    ScanFinished(Box<ScanReport>),
    ScanFailed {
        error: String,
    },
    ExportStarted {
        path: String,
    },
    ExportFinished {
        path: String,
        rows: usize,
    },
    ExportFailed {
        path: String,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Rescan,
    Export { path: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::ScanStarted {
            competition,
            total_dates,
        } => {
            state.competition = competition;
            state.phase = ScanPhase::Running;
            state.progress = ScanProgress {
                current: 0,
                total: total_dates,
                date: None,
            };
            state.issue_count = 0;
            state.report = None;
            state.failure = None;
            state.scroll = 0;
            state.push_log(format!("[INFO] Scanning {total_dates} days"));
        }
        Delta::Progress {
            current,
            total,
            date,
        } => {
            state.progress = ScanProgress {
                current,
                total,
                date: Some(date),
            };
        }
        Delta::Issue(issue) => {
            state.issue_count += 1;
            state.push_log(format!("[WARN] {issue}"));
        }
        Delta::ScanFinished(report) => {
            state.phase = ScanPhase::Done;
            state.progress.current = state.progress.total;
            let c = report.counters;
            state.push_log(format!(
                "[INFO] Done: {} matches, {} players ranked, {} errors",
                c.matches_inspected,
                c.players_ranked,
                report.issues.len() + report.dropped_issues
            ));
            state.report = Some(*report);
            state.scroll = 0;
        }
        Delta::ScanFailed { error } => {
            state.phase = ScanPhase::Failed;
            state.push_log(format!("[WARN] Scan failed: {error}"));
            state.failure = Some(error);
        }
        Delta::ExportStarted { path } => {
            state.push_log(format!("[INFO] Exporting to {path}"));
            state.export = ExportState::Running { path };
        }
        Delta::ExportFinished { path, rows } => {
            state.push_log(format!("[INFO] Exported {rows} rows to {path}"));
            state.export = ExportState::Done { path, rows };
        }
        Delta::ExportFailed { path, error } => {
            state.push_log(format!("[WARN] Export failed: {error}"));
            state.export = ExportState::Failed { path, error };
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
