//! Loading of dated snapshot files written by the harvester.
//!
//! A snapshot is a JSON object keyed by country name. Each value is a
//! [`RawCountryPayload`]; the object key is authoritative for the country.
//!
//! - [`cache`] — explicit TTL cache of parsed snapshots, owned by the caller.
//! - [`merge`] — newest-wins fold of many snapshots into one state per country.

pub mod cache;
pub mod merge;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::models::RawCountryPayload;
use cache::SnapshotCache;

const FILE_PREFIX: &str = "clarity_";
const FILE_SUFFIX: &str = ".json";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot {0} is not a JSON object keyed by country")]
    Shape(PathBuf),
}

/// Parsed contents of one snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub path: PathBuf,
    pub records: Vec<RawCountryPayload>,
}

/// Parse an ISO-8601 capture timestamp, tolerating a trailing `Z`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    naive
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.naive_utc()))
}

/// Parse snapshot JSON text. Country entries that do not fit the payload shape are skipped.
pub fn parse_snapshot(path: &Path, content: &str) -> Result<Snapshot, SnapshotError> {
    let json: Value = serde_json::from_str(content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let countries = json
        .as_object()
        .ok_or_else(|| SnapshotError::Shape(path.to_path_buf()))?;

    let mut records = Vec::with_capacity(countries.len());
    for (country, entry) in countries {
        match serde_json::from_value::<RawCountryPayload>(entry.clone()) {
            Ok(mut payload) => {
                payload.country = country.clone();
                records.push(payload);
            }
            Err(e) => warn!("{}: skipping {}: {}", path.display(), country, e),
        }
    }

    Ok(Snapshot {
        path: path.to_path_buf(),
        records,
    })
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(path, &content)
}

/// Find `clarity_*.json` files in `dir` and `dir/data`, sorted by path.
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = [dir.to_path_buf(), dir.join("data")]
        .iter()
        .filter_map(|d| std::fs::read_dir(d).ok())
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_snapshot_name(p))
        .collect();
    files.sort();
    files
}

fn is_snapshot_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX))
        .unwrap_or(false)
}

/// Load every file in `paths`, serving unchanged ones from `cache`.
///
/// Files that cannot be read or parsed are logged and skipped.
pub fn load_all(paths: &[PathBuf], cache: &mut SnapshotCache, quiet: bool) -> Vec<Snapshot> {
    let pb = if !quiet && paths.len() > 1 {
        let pb = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let mut snapshots = Vec::with_capacity(paths.len());
    let mut parsed = 0usize;

    for path in paths {
        if let Some(snapshot) = cache.get(path) {
            debug!("cache hit: {}", path.display());
            snapshots.push(snapshot.clone());
        } else {
            match read_snapshot(path) {
                Ok(snapshot) => {
                    parsed += 1;
                    cache.insert(path.clone(), snapshot.clone());
                    snapshots.push(snapshot);
                }
                Err(e) => warn!("{}", e),
            }
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!(
        "loaded {} snapshot(s), {} parsed, {} from cache",
        snapshots.len(),
        parsed,
        snapshots.len() - parsed
    );
    snapshots
}
