use std::collections::BTreeMap;

use crate::models::{CompositeScores, RawMetrics};
use crate::scoring::page_mix::silent_killer;

/// Scroll depth assumed by [`conversion_risk`] when the block is missing.
pub const NEUTRAL_SCROLL_DEPTH: f64 = 50.0;

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// `dead * 0.7 + rage * 0.3`. Higher is worse.
pub fn friction(raw: &RawMetrics) -> f64 {
    clamp_score(raw.dead_clicks * 0.7 + raw.rage_clicks * 0.3)
}

/// Weighted blend of every frustration signal, capped at 100. Higher is worse.
pub fn frustration(raw: &RawMetrics) -> f64 {
    clamp_score(
        raw.rage_clicks * 0.35
            + raw.dead_clicks * 0.25
            + raw.script_errors * 0.20
            + raw.error_clicks * 0.15
            + raw.quickback * 0.05,
    )
}

/// Likelihood that a session abandons before converting, capped at 100. Higher is worse.
pub fn conversion_risk(raw: &RawMetrics) -> f64 {
    let scroll = raw.scroll_depth.unwrap_or(NEUTRAL_SCROLL_DEPTH);
    clamp_score(
        raw.quickback * 0.40
            + raw.dead_clicks * 0.30
            + raw.error_clicks * 0.20
            + (100.0 - scroll) * 0.10,
    )
}

/// `100 - (script * 0.6 + error_clicks * 0.4)`, floored at 0. Higher is better.
pub fn tech_health(raw: &RawMetrics) -> f64 {
    clamp_score(100.0 - (raw.script_errors * 0.60 + raw.error_clicks * 0.40))
}

/// `scroll - rage * 0.5`, floored at 0. Missing scroll depth counts as 0 here. Higher is better.
pub fn engagement(raw: &RawMetrics) -> f64 {
    clamp_score(raw.scroll_depth.unwrap_or(0.0) - raw.rage_clicks * 0.5)
}

/// Penalises the errors most often caused by bad translations or local templates. Higher is better.
pub fn localization_quality(raw: &RawMetrics) -> f64 {
    clamp_score(100.0 - (raw.script_errors * 0.30 + raw.dead_clicks * 0.50 + raw.rage_clicks * 0.20))
}

impl CompositeScores {
    pub fn compute(raw: &RawMetrics) -> Self {
        CompositeScores {
            friction: friction(raw),
            frustration: frustration(raw),
            conversion_risk: conversion_risk(raw),
            tech_health: tech_health(raw),
            engagement: engagement(raw),
            localization_quality: localization_quality(raw),
            silent_killer: silent_killer(raw),
        }
    }

    /// Scores keyed by name, for consumers that want a plain mapping.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("friction", self.friction),
            ("frustration", self.frustration),
            ("conversion_risk", self.conversion_risk),
            ("tech_health", self.tech_health),
            ("engagement", self.engagement),
            ("localization_quality", self.localization_quality),
            ("silent_killer", self.silent_killer),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn saturated() -> RawMetrics {
        RawMetrics {
            sessions: 10,
            dead_clicks: 100.0,
            rage_clicks: 100.0,
            script_errors: 100.0,
            error_clicks: 100.0,
            quickback: 100.0,
            scroll_depth: Some(0.0),
            transactional_share: 1.0,
        }
    }

    #[test]
    fn test_friction() {
        let raw = RawMetrics {
            dead_clicks: 20.0,
            rage_clicks: 10.0,
            ..Default::default()
        };
        assert!(approx(friction(&raw), 17.0));
    }

    #[test]
    fn test_caps_at_100() {
        let raw = saturated();
        assert!(approx(frustration(&raw), 100.0));
        assert!(approx(conversion_risk(&raw), 100.0));
        assert!(approx(friction(&raw), 100.0));

        // Source percentages occasionally overshoot 100.
        let overshoot = RawMetrics {
            dead_clicks: 140.0,
            rage_clicks: 140.0,
            script_errors: 140.0,
            error_clicks: 140.0,
            quickback: 140.0,
            ..Default::default()
        };
        assert!(approx(frustration(&overshoot), 100.0));
        assert!(approx(conversion_risk(&overshoot), 100.0));
    }

    #[test]
    fn test_floors_at_0() {
        let raw = saturated();
        assert!(approx(tech_health(&raw), 0.0));
        assert!(approx(engagement(&raw), 0.0));
        assert!(approx(localization_quality(&raw), 0.0));
    }

    #[test]
    fn test_tech_health() {
        let raw = RawMetrics {
            dead_clicks: 5.0,
            script_errors: 2.0,
            ..Default::default()
        };
        assert!(approx(tech_health(&raw), 98.8));
    }

    #[test]
    fn test_conversion_risk_neutral_scroll() {
        let raw = RawMetrics::default();
        assert!(approx(conversion_risk(&raw), 5.0));

        let scrolled = RawMetrics {
            scroll_depth: Some(80.0),
            quickback: 10.0,
            ..Default::default()
        };
        assert!(approx(conversion_risk(&scrolled), 4.0 + 2.0));
    }

    #[test]
    fn test_all_missing_inputs() {
        let scores = CompositeScores::compute(&RawMetrics::default());
        assert!(approx(scores.friction, 0.0));
        assert!(approx(scores.frustration, 0.0));
        assert!(approx(scores.conversion_risk, 5.0));
        assert!(approx(scores.tech_health, 100.0));
        assert!(approx(scores.engagement, 0.0));
        assert!(approx(scores.localization_quality, 100.0));
        assert!(approx(scores.silent_killer, 0.0));
    }

    #[test]
    fn test_engagement() {
        let raw = RawMetrics {
            scroll_depth: Some(60.0),
            rage_clicks: 10.0,
            ..Default::default()
        };
        assert!(approx(engagement(&raw), 55.0));
    }

    #[test]
    fn test_to_map_and_idempotence() {
        let raw = RawMetrics {
            dead_clicks: 12.0,
            rage_clicks: 3.0,
            script_errors: 1.5,
            scroll_depth: Some(44.0),
            ..Default::default()
        };
        let a = CompositeScores::compute(&raw);
        let b = CompositeScores::compute(&raw);
        assert_eq!(a, b);

        let map = a.to_map();
        assert_eq!(map.len(), 7);
        assert_eq!(map["friction"], a.friction);
        assert_eq!(map["tech_health"], a.tech_health);
    }
}
