use std::fmt::Write;

use crate::model::{PositionGroup, group_label};
use crate::rankings::RankedRow;
use crate::scan::{ScanOutcome, ScanReport};

const WIDTH: usize = 100;
const NAME_COLS: usize = 27;
const TEAM_COLS: usize = 23;

/// Fixed-width text table for one group.
pub fn render_table(title: &str, rows: &[RankedRow]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title:^width$}", width = WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<3}{:<28}{:<24}{:<8}{:>10}{:>10}{:>8}",
        "#", "PLAYER", "TEAM", "POS", "RATING", "MINUTES", "MATCHES"
    );
    let _ = writeln!(out, "{}", "-".repeat(WIDTH));
    if rows.is_empty() {
        let _ = writeln!(out, "   (no players above the minutes threshold)");
    }
    for row in rows {
        let _ = writeln!(
            out,
            "{:<3}{:<28}{:<24}{:<8}{:>10.2}{:>10}{:>8}",
            row.rank,
            truncate(&row.name, NAME_COLS),
            truncate(&row.team, TEAM_COLS),
            truncate(&row.raw_position, 7),
            row.average_rating,
            row.total_minutes,
            row.match_count
        );
    }
    out
}

pub fn render_report(report: &ScanReport) -> String {
    let mut out = String::new();
    let c = &report.counters;
    let _ = writeln!(out, "{} - player ratings", report.competition);
    let _ = writeln!(
        out,
        "Dates scanned: {} | Schedule entries: {} | Matches analyzed: {} | Ranked players: {}",
        c.dates_scanned, c.entries_scanned, c.matches_inspected, c.players_ranked
    );

    match report.outcome() {
        ScanOutcome::Ranked => {
            for group in PositionGroup::ALL {
                out.push('\n');
                out.push_str(&render_table(
                    &format!("TOP {}", group_label(group).to_uppercase()),
                    report.tables.group(group),
                ));
            }
        }
        ScanOutcome::NoData => {
            let _ = writeln!(
                out,
                "\nNo players matched: {} target matches found, {} lineups aggregated.",
                c.target_matches, c.lineups_aggregated
            );
        }
        ScanOutcome::Unreachable => {
            let _ = writeln!(out, "\nAPI unreachable: every schedule request failed.");
        }
    }

    let total_issues = report.issues.len() + report.dropped_issues;
    if total_issues > 0 {
        let _ = writeln!(out, "\nErrors: {total_issues}");
        for issue in report.issues.iter().take(8) {
            let _ = writeln!(out, " - {issue}");
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
