use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::NaiveDate;

use crate::config::ScanConfig;
use crate::export::export_report;
use crate::scan::{FetchIssue, MatchSource, ScanObserver, ScanReport, run_scan};
use crate::sofascore_fetch::SofascoreSource;
use crate::state::{Delta, ProviderCommand};

/// Forwards scan progress to the dashboard.
pub struct ChannelObserver {
    tx: Sender<Delta>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<Delta>) -> Self {
        Self { tx }
    }
}

impl ScanObserver for ChannelObserver {
    fn on_date(&mut self, index: usize, total: usize, date: NaiveDate) {
        let _ = self.tx.send(Delta::Progress {
            current: index + 1,
            total,
            date,
        });
    }

    fn on_log(&mut self, msg: &str) {
        let _ = self.tx.send(Delta::Log(format!("[INFO] {msg}")));
    }

    fn on_issue(&mut self, issue: &FetchIssue) {
        let _ = self.tx.send(Delta::Issue(issue.clone()));
    }
}

/// Runs scans on a background thread and answers dashboard commands. Exits
/// when the command channel closes.
pub fn spawn_scan_worker(config: ScanConfig, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut source = match SofascoreSource::new(config.fetch.clone()) {
            Ok(source) => source,
            Err(err) => {
                let _ = tx.send(Delta::ScanFailed {
                    error: format!("HTTP client error: {err:#}"),
                });
                return;
            }
        };

        let mut last = scan_once(&config, &mut source, &tx);
        if let Some(path) = config.export_path.as_deref() {
            export_to(path, &last, &tx);
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Rescan => {
                    last = scan_once(&config, &mut source, &tx);
                }
                ProviderCommand::Export { path } => export_to(Path::new(&path), &last, &tx),
            }
        }
    });
}

pub fn scan_once(config: &ScanConfig, source: &mut dyn MatchSource, tx: &Sender<Delta>) -> ScanReport {
    let _ = tx.send(Delta::ScanStarted {
        competition: config.target.name.clone(),
        total_dates: config.range.len(),
    });
    let mut observer = ChannelObserver::new(tx.clone());
    let report = run_scan(&config.target, config.range, &config.rules, source, &mut observer);
    let _ = tx.send(Delta::ScanFinished(Box::new(report.clone())));
    report
}

fn export_to(path: &Path, report: &ScanReport, tx: &Sender<Delta>) {
    let shown = path.display().to_string();
    let _ = tx.send(Delta::ExportStarted {
        path: shown.clone(),
    });
    match export_report(path, report) {
        Ok(summary) => {
            let _ = tx.send(Delta::ExportFinished {
                path: shown,
                rows: summary.rows,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::ExportFailed {
                path: shown,
                error: format!("{err:#}"),
            });
        }
    }
}
