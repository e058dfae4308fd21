use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use lineup_ratings::config::ScanConfig;
use lineup_ratings::export::export_report;
use lineup_ratings::report::render_report;
use lineup_ratings::scan::{NullObserver, ScanOutcome, run_scan};
use lineup_ratings::sofascore_fetch::SofascoreSource;

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    match run() {
        Ok(ScanOutcome::Unreachable) => ExitCode::from(3),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ScanOutcome> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ScanConfig::load(&args)?;
    let json = args.iter().any(|a| a == "--json");

    let mut source = SofascoreSource::new(config.fetch.clone())?;
    let report = run_scan(
        &config.target,
        config.range,
        &config.rules,
        &mut source,
        &mut NullObserver,
    );

    if json {
        let body = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{body}");
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(path) = config.export_path.as_deref() {
        let summary = export_report(path, &report)?;
        eprintln!(
            "Exported {} rows across {} sheets to {}",
            summary.rows,
            summary.sheets,
            path.display()
        );
    }

    Ok(report.outcome())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
