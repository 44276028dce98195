//! Null-safe field extraction over [`RawCountryPayload`] metric blocks.
//!
//! Nothing in here fails: a missing block, an empty `information` list or a
//! value that is not numeric all come back as `None`, and callers pick the
//! default that makes sense for them.

use serde_json::Value;

use crate::models::{MetricBlock, RawCountryPayload, RawMetrics};
use crate::scoring::page_mix::transactional_share;

pub const DEAD_CLICKS: &str = "DeadClickCount";
pub const RAGE_CLICKS: &str = "RageClickCount";
pub const SCRIPT_ERRORS: &str = "ScriptErrorCount";
pub const ERROR_CLICKS: &str = "ErrorClickCount";
pub const QUICKBACK: &str = "QuickbackClick";
pub const SCROLL_DEPTH: &str = "ScrollDepth";
pub const POPULAR_PAGES: &str = "PopularPages";
pub const REFERRER_URL: &str = "ReferrerUrl";

/// Blocks whose entries are `{name, sessionsCount}` breakdowns.
pub const TECH_CATEGORIES: [&str; 3] = ["Browser", "Device", "OS"];

const PERCENTAGE_KEY: &str = "sessionsWithMetricPercentage";

/// First block named `metric_name`, if any.
pub fn metric_block<'a>(payload: &'a RawCountryPayload, metric_name: &str) -> Option<&'a MetricBlock> {
    payload.metrics.iter().find(|m| m.metric_name == metric_name)
}

/// Value at `key` in the first `information` entry of `metric_name`.
pub fn metric_value<'a>(payload: &'a RawCountryPayload, metric_name: &str, key: &str) -> Option<&'a Value> {
    metric_block(payload, metric_name)?
        .information
        .first()?
        .get(key)
}

/// Numeric view of [`metric_value`]. Numeric strings are accepted; anything else is absent.
pub fn metric_number(payload: &RawCountryPayload, metric_name: &str, key: &str) -> Option<f64> {
    metric_value(payload, metric_name, key).and_then(as_number)
}

/// `sessionsWithMetricPercentage` of `metric_name`, or `0.0`.
pub fn percentage(payload: &RawCountryPayload, metric_name: &str) -> f64 {
    metric_number(payload, metric_name, PERCENTAGE_KEY).unwrap_or(0.0)
}

/// Coerce a JSON value to a finite number.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Non-negative integer view of a JSON value, truncating fractions.
pub fn as_count(value: &Value) -> u64 {
    as_number(value)
        .filter(|n| *n > 0.0)
        .map(|n| n as u64)
        .unwrap_or(0)
}

/// String values of `key` across every entry of `metric_name`, skipping nulls.
pub fn entry_strings<'a>(payload: &'a RawCountryPayload, metric_name: &str, key: &str) -> Vec<&'a str> {
    metric_block(payload, metric_name)
        .map(|block| {
            block
                .information
                .iter()
                .filter_map(|entry| entry.get(key).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// `(url, visits)` pairs from the PopularPages block.
pub fn popular_pages(payload: &RawCountryPayload) -> Vec<(&str, u64)> {
    metric_block(payload, POPULAR_PAGES)
        .map(|block| {
            block
                .information
                .iter()
                .filter_map(|entry| {
                    let url = entry.get("url").and_then(Value::as_str)?;
                    let visits = entry.get("visitsCount").map(as_count).unwrap_or(0);
                    Some((url, visits))
                })
                .collect()
        })
        .unwrap_or_default()
}

impl RawMetrics {
    /// Pull every field the composites need, defaulting anything missing.
    pub fn from_payload(payload: &RawCountryPayload) -> Self {
        RawMetrics {
            sessions: metric_value(payload, DEAD_CLICKS, "sessionsCount")
                .map(as_count)
                .unwrap_or(0),
            dead_clicks: percentage(payload, DEAD_CLICKS),
            rage_clicks: percentage(payload, RAGE_CLICKS),
            script_errors: percentage(payload, SCRIPT_ERRORS),
            error_clicks: percentage(payload, ERROR_CLICKS),
            quickback: percentage(payload, QUICKBACK),
            scroll_depth: metric_number(payload, SCROLL_DEPTH, "averageScrollDepth"),
            transactional_share: transactional_share(&popular_pages(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(metrics: Value) -> RawCountryPayload {
        serde_json::from_value(json!({
            "country": "France",
            "timestamp": "2025-01-10T23:00:00Z",
            "metrics": metrics,
        }))
        .unwrap()
    }

    #[test]
    fn test_metric_value_first_entry() {
        let p = payload(json!([
            { "metricName": "DeadClickCount", "information": [
                { "sessionsCount": "120", "sessionsWithMetricPercentage": 20 },
                { "sessionsCount": "999", "sessionsWithMetricPercentage": 99 }
            ]}
        ]));
        assert_eq!(metric_number(&p, DEAD_CLICKS, PERCENTAGE_KEY), Some(20.0));
        assert_eq!(metric_number(&p, DEAD_CLICKS, "sessionsCount"), Some(120.0));
    }

    #[test]
    fn test_duplicate_block_first_wins() {
        let p = payload(json!([
            { "metricName": "RageClickCount", "information": [{ "sessionsWithMetricPercentage": 4 }] },
            { "metricName": "RageClickCount", "information": [{ "sessionsWithMetricPercentage": 40 }] }
        ]));
        assert_eq!(percentage(&p, RAGE_CLICKS), 4.0);
    }

    #[test]
    fn test_missing_block_and_empty_information() {
        let p = payload(json!([
            { "metricName": "ScriptErrorCount", "information": [] },
            { "metricName": "ErrorClickCount", "information": null }
        ]));
        assert_eq!(metric_value(&p, SCRIPT_ERRORS, PERCENTAGE_KEY), None);
        assert_eq!(percentage(&p, SCRIPT_ERRORS), 0.0);
        assert_eq!(percentage(&p, ERROR_CLICKS), 0.0);
        assert_eq!(percentage(&p, DEAD_CLICKS), 0.0);
    }

    #[test]
    fn test_malformed_values_fail_closed() {
        let p = payload(json!([
            { "metricName": "DeadClickCount", "information": [{ "sessionsWithMetricPercentage": "n/a" }] },
            { "metricName": "RageClickCount", "information": [{ "sessionsWithMetricPercentage": { "x": 1 } }] },
            { "metricName": "QuickbackClick", "information": [{ "sessionsWithMetricPercentage": " 7.5 " }] }
        ]));
        assert_eq!(percentage(&p, DEAD_CLICKS), 0.0);
        assert_eq!(percentage(&p, RAGE_CLICKS), 0.0);
        assert_eq!(percentage(&p, QUICKBACK), 7.5);
    }

    #[test]
    fn test_raw_metrics_defaults() {
        let raw = RawMetrics::from_payload(&payload(json!([])));
        assert_eq!(raw, RawMetrics::default());
        assert_eq!(raw.scroll_depth, None);
    }

    #[test]
    fn test_popular_pages_and_entry_strings() {
        let p = payload(json!([
            { "metricName": "PopularPages", "information": [
                { "url": "https://shop.lyreco.pl/cart", "visitsCount": "30" },
                { "url": "https://shop.lyreco.pl/", "visitsCount": 70 },
                { "visitsCount": 5 }
            ]},
            { "metricName": "ReferrerUrl", "information": [
                { "name": "https://www.google.com/", "sessionsCount": 3 },
                { "name": null, "sessionsCount": 9 }
            ]}
        ]));
        assert_eq!(
            popular_pages(&p),
            vec![("https://shop.lyreco.pl/cart", 30), ("https://shop.lyreco.pl/", 70)]
        );
        assert_eq!(entry_strings(&p, REFERRER_URL, "name"), vec!["https://www.google.com/"]);
    }

    #[test]
    fn test_webshop_key_alias() {
        let p: RawCountryPayload = serde_json::from_value(json!({
            "country": "Spain",
            "timestamp": "2025-01-10T23:00:00",
            "webshop": [
                { "metricName": "ScrollDepth", "information": [{ "averageScrollDepth": 61.2 }] }
            ],
            "nextgen": {},
            "merged": false
        }))
        .unwrap();
        assert_eq!(metric_number(&p, SCROLL_DEPTH, "averageScrollDepth"), Some(61.2));
    }
}
