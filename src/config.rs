use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Platform;

/// Root configuration structure, deserialized from `.ux-scorecard/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Controls which records reach the business-facing report.
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Platforms dropped from comparisons unless `--audit` is given.
    /// Defaults to `["Support", "Unknown"]`.
    #[serde(default = "default_excluded")]
    pub exclude_platforms: Vec<Platform>,
    /// Number of rows in the top pages table.
    #[serde(default = "default_top_pages")]
    pub top_pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Seconds a parsed snapshot stays cached in `--watch` mode.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_excluded() -> Vec<Platform> {
    vec![Platform::Support, Platform::Unknown]
}

fn default_top_pages() -> usize {
    20
}

fn default_ttl_secs() -> u64 {
    3600
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            exclude_platforms: default_excluded(),
            top_pages: default_top_pages(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Whether records of `platform` belong in the report. Audit views keep everything.
    pub fn includes(&self, platform: Platform, audit: bool) -> bool {
        audit || !self.report.exclude_platforms.contains(&platform)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<data_dir>/.ux-scorecard/config.toml`
/// 3. `~/.config/ux-scorecard/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(data_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = data_dir.join(".ux-scorecard").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("ux-scorecard").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
