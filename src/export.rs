use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::model::{PositionGroup, group_label};
use crate::rankings::RankedRow;
use crate::scan::ScanReport;

pub struct ExportSummary {
    pub sheets: usize,
    pub rows: usize,
}

/// One sheet per position group plus a run summary.
pub fn export_report(path: &Path, report: &ScanReport) -> Result<ExportSummary> {
    let mut workbook = Workbook::new();
    let mut rows_written = 0usize;

    for group in PositionGroup::ALL {
        let rows = report.tables.group(group);
        let mut sheet_rows = vec![header_row()];
        sheet_rows.extend(rows.iter().map(ranked_row));
        rows_written += rows.len();

        let sheet = workbook.add_worksheet();
        sheet.set_name(group_label(group))?;
        write_rows(sheet, &sheet_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Run")?;
        write_rows(sheet, &summary_rows(report))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportSummary {
        sheets: PositionGroup::ALL.len() + 1,
        rows: rows_written,
    })
}

fn header_row() -> Vec<String> {
    ["Rank", "Player", "Team", "Position", "Avg Rating", "Minutes", "Matches"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn ranked_row(row: &RankedRow) -> Vec<String> {
    vec![
        row.rank.to_string(),
        row.name.clone(),
        row.team.clone(),
        row.raw_position.clone(),
        format!("{:.2}", row.average_rating),
        row.total_minutes.to_string(),
        row.match_count.to_string(),
    ]
}

fn summary_rows(report: &ScanReport) -> Vec<Vec<String>> {
    let c = &report.counters;
    let mut rows = vec![
        pair("Competition", report.competition.clone()),
        pair("Dates scanned", c.dates_scanned.to_string()),
        pair("Schedules fetched", c.schedules_fetched.to_string()),
        pair("Schedule entries", c.entries_scanned.to_string()),
        pair("Target matches", c.target_matches.to_string()),
        pair("Skipped (not played)", c.skipped_unplayed.to_string()),
        pair("Duplicate events", c.duplicate_events.to_string()),
        pair("Matches inspected", c.matches_inspected.to_string()),
        pair("Lineups aggregated", c.lineups_aggregated.to_string()),
        pair("Players tracked", c.players_tracked.to_string()),
        pair("Players ranked", c.players_ranked.to_string()),
        pair("Errors", (report.issues.len() + report.dropped_issues).to_string()),
    ];
    rows.extend(report.issues.iter().map(|i| pair("Error", i.to_string())));
    rows
}

fn pair(label: &str, value: String) -> Vec<String> {
    vec![label.to_string(), value]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
