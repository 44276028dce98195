//! `ux-scorecard` — classify analytics snapshots by storefront platform and score UX friction.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialize logging.
//! 2. Load config ([`load_config`]).
//! 3. Discover and parse snapshot files, through a [`SnapshotCache`].
//! 4. Optionally fold to the newest record per country (`--latest`).
//! 5. Classify, score and aggregate into a [`Report`].
//! 6. Render the requested report.
//! 7. Exit `0`, or `1` when no snapshot data was found.

mod cli;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use cli::{Cli, ReportFormat};
use ux_scorecard::config::{load_config, Config};
use ux_scorecard::logging;
use ux_scorecard::models::{Platform, RawCountryPayload};
use ux_scorecard::report::{self, Filters, Report};
use ux_scorecard::snapshot::{self, cache::SnapshotCache, merge::latest_per_country};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(logging::level_for(cli.verbose, cli.quiet)) {
        eprintln!("logger already initialized: {}", e);
    }

    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());
    let data_dir = if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.clone()
    };

    let config = load_config(&data_dir, cli.config.as_deref())?;

    let filters = Filters {
        platforms: cli.platforms.iter().map(Into::<Platform>::into).collect(),
        countries: cli.countries.clone(),
        audit: cli.audit,
    };

    let mut cache = SnapshotCache::new(config.cache.ttl());
    let mut known_files: Vec<PathBuf> = Vec::new();

    loop {
        let files = snapshot_files(&path);
        if files != known_files {
            if !known_files.is_empty() {
                info!("snapshot set changed, invalidating cache");
            }
            cache.invalidate();
            known_files = files.clone();
        }

        let found = run_once(&cli, &path, &files, &config, &filters, &mut cache)?;

        match cli.watch {
            Some(secs) => std::thread::sleep(Duration::from_secs(secs.max(1))),
            None if !found => {
                eprintln!("No snapshot data found in {}", path.display());
                std::process::exit(1);
            }
            None => break,
        }
    }

    Ok(())
}

fn snapshot_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        snapshot::discover(path)
    }
}

/// Load, score and render once. Returns `false` when there was nothing to report on.
fn run_once(
    cli: &Cli,
    path: &Path,
    files: &[PathBuf],
    config: &Config,
    filters: &Filters,
    cache: &mut SnapshotCache,
) -> Result<bool> {
    let snapshots = snapshot::load_all(files, cache, cli.quiet);

    let mut records: Vec<RawCountryPayload> = snapshots
        .into_iter()
        .flat_map(|s| s.records)
        .collect();

    if records.is_empty() {
        warn!("no country records in {} file(s)", files.len());
        return Ok(false);
    }

    if cli.latest {
        records = latest_per_country(records);
        info!("kept newest record for {} countries", records.len());
    }

    let scorecard = Report::build(&records, config, filters);

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&scorecard, path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&scorecard).context("serializing report")?;
            println!("{}", json);
        }
    }

    Ok(true)
}
