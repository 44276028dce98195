//! Aggregation of classified, scored records into report tables, plus renderers.
//!
//! - [`terminal`] — colored summary box and comfy-table market tables; respects `--verbose` / `--quiet`.
//!
//! JSON output serializes [`Report`] directly.

pub mod terminal;

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::models::{ClassifiedRecord, CompositeScores, MarketRow, Platform, RawCountryPayload, RawMetrics};
use crate::payload::{as_count, metric_block, popular_pages, TECH_CATEGORIES};
use crate::snapshot::parse_timestamp;

/// Row selection applied on top of the configured platform exclusions.
#[derive(Debug, Default, Clone)]
pub struct Filters {
    /// Keep only these platforms; empty keeps all.
    pub platforms: Vec<Platform>,
    /// Keep only these countries (case-insensitive); empty keeps all.
    pub countries: Vec<String>,
    /// Keep excluded platforms such as Support and Unknown.
    pub audit: bool,
}

impl Filters {
    fn keeps(&self, config: &Config, country: &str, platform: Platform) -> bool {
        config.includes(platform, self.audit)
            && (self.platforms.is_empty() || self.platforms.contains(&platform))
            && (self.countries.is_empty()
                || self.countries.iter().any(|c| c.eq_ignore_ascii_case(country)))
    }
}

/// Averages over every row of one market.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub market: String,
    pub country: String,
    pub platform: Platform,
    pub rows: usize,
    pub sessions: u64,
    pub scores: CompositeScores,
}

/// Mean friction of NextGen versus Webshop rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformGap {
    pub nextgen_friction: f64,
    pub webshop_friction: f64,
    /// `webshop - nextgen`; positive means NextGen has less friction.
    pub nextgen_advantage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageVisits {
    pub platform: Platform,
    pub url: String,
    pub visits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechUsage {
    pub category: String,
    pub name: String,
    pub sessions: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<MarketRow>,
    pub markets: Vec<MarketSummary>,
    pub platform_gap: Option<PlatformGap>,
    pub top_pages: Vec<PageVisits>,
    pub tech: Vec<TechUsage>,
}

/// Classify and score one payload.
pub fn score_record(payload: &RawCountryPayload) -> MarketRow {
    let record = ClassifiedRecord::new(payload);
    let raw = RawMetrics::from_payload(payload);
    let scores = CompositeScores::compute(&raw);
    debug!("{} -> {} (rule {})", payload.country, record.platform, record.rule);

    MarketRow {
        date: parse_timestamp(&payload.timestamp).map(|ts| ts.date()),
        country: payload.country.clone(),
        platform: record.platform,
        market: record.market,
        rule: record.rule,
        raw,
        scores,
    }
}

impl Report {
    pub fn build(records: &[RawCountryPayload], config: &Config, filters: &Filters) -> Self {
        let mut rows = Vec::new();
        let mut pages: BTreeMap<(Platform, String), u64> = BTreeMap::new();
        let mut tech: BTreeMap<(String, String), u64> = BTreeMap::new();

        for payload in records {
            let row = score_record(payload);
            if !filters.keeps(config, &row.country, row.platform) {
                continue;
            }

            for (url, visits) in popular_pages(payload) {
                let total = pages.entry((row.platform, url.to_string())).or_insert(0);
                *total = total.saturating_add(visits);
            }
            for category in TECH_CATEGORIES {
                let Some(block) = metric_block(payload, category) else {
                    continue;
                };
                for entry in &block.information {
                    if let Some(name) = entry.get("name").and_then(Value::as_str) {
                        let sessions = entry.get("sessionsCount").map(as_count).unwrap_or(0);
                        let total = tech
                            .entry((category.to_string(), name.to_string()))
                            .or_insert(0);
                        *total = total.saturating_add(sessions);
                    }
                }
            }

            rows.push(row);
        }

        let mut top_pages: Vec<PageVisits> = pages
            .into_iter()
            .map(|((platform, url), visits)| PageVisits { platform, url, visits })
            .collect();
        top_pages.sort_by(|a, b| b.visits.cmp(&a.visits));
        top_pages.truncate(config.report.top_pages);

        let tech = tech
            .into_iter()
            .map(|((category, name), sessions)| TechUsage {
                category,
                name,
                sessions,
            })
            .collect();

        Report {
            markets: summarize_markets(&rows),
            platform_gap: platform_gap(&rows),
            rows,
            top_pages,
            tech,
        }
    }

    /// Mean friction across all rows, `None` without rows.
    pub fn mean_friction(&self) -> Option<f64> {
        mean(self.rows.iter().map(|r| r.scores.friction))
    }
}

/// Sum of `sessions` over `rows`, saturating on oversized counts.
pub fn total_sessions<'a>(rows: impl IntoIterator<Item = &'a MarketRow>) -> u64 {
    rows.into_iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.raw.sessions))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Group rows by market key, most frustrated market first.
pub fn summarize_markets(rows: &[MarketRow]) -> Vec<MarketSummary> {
    let mut groups: BTreeMap<&str, Vec<&MarketRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.market.as_str()).or_default().push(row);
    }

    let mut markets: Vec<MarketSummary> = groups
        .into_values()
        .map(|group| {
            let n = group.len() as f64;
            let avg = |f: fn(&CompositeScores) -> f64| group.iter().map(|r| f(&r.scores)).sum::<f64>() / n;
            MarketSummary {
                market: group[0].market.clone(),
                country: group[0].country.clone(),
                platform: group[0].platform,
                rows: group.len(),
                sessions: total_sessions(group.iter().copied()),
                scores: CompositeScores {
                    friction: avg(|s| s.friction),
                    frustration: avg(|s| s.frustration),
                    conversion_risk: avg(|s| s.conversion_risk),
                    tech_health: avg(|s| s.tech_health),
                    engagement: avg(|s| s.engagement),
                    localization_quality: avg(|s| s.localization_quality),
                    silent_killer: avg(|s| s.silent_killer),
                },
            }
        })
        .collect();

    markets.sort_by(|a, b| {
        b.scores
            .frustration
            .total_cmp(&a.scores.frustration)
            .then_with(|| a.market.cmp(&b.market))
    });
    markets
}

/// NextGen vs Webshop friction, when both platforms have rows.
pub fn platform_gap(rows: &[MarketRow]) -> Option<PlatformGap> {
    let friction_of = |platform: Platform| {
        mean(
            rows.iter()
                .filter(|r| r.platform == platform)
                .map(|r| r.scores.friction),
        )
    };
    let nextgen_friction = friction_of(Platform::NextGen)?;
    let webshop_friction = friction_of(Platform::Webshop)?;
    Some(PlatformGap {
        nextgen_friction,
        webshop_friction,
        nextgen_advantage: webshop_friction - nextgen_friction,
    })
}
