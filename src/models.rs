use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named metric block of a country payload, e.g. `DeadClickCount` or `PopularPages`.
///
/// The shape of each `information` entry depends on `metric_name`, so entries
/// are kept as raw JSON and read through [`crate::payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBlock {
    #[serde(rename = "metricName")]
    pub metric_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub information: Vec<Value>,
}

/// Unlabeled per-country record ingested for one reporting day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCountryPayload {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timestamp: String,
    /// The harvester writes this list under `webshop`.
    #[serde(default, alias = "webshop", deserialize_with = "null_as_empty")]
    pub metrics: Vec<MetricBlock>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Storefront variant a country payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    NextGen,
    Webshop,
    Netshop,
    Support,
    Other,
    Unknown,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::NextGen => write!(f, "NextGen"),
            Platform::Webshop => write!(f, "Webshop"),
            Platform::Netshop => write!(f, "Netshop"),
            Platform::Support => write!(f, "Support"),
            Platform::Other => write!(f, "Other"),
            Platform::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A payload together with its platform label and market key.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord<'a> {
    pub payload: &'a RawCountryPayload,
    pub platform: Platform,
    /// `"{country} ({platform})"`, unique within one snapshot.
    pub market: String,
    /// Name of the classifier rule that produced `platform`.
    pub rule: &'static str,
}

/// Raw percentage/count fields pulled from a payload before scoring.
///
/// Percentages are on a 0–100 scale. `scroll_depth` stays `None` when the
/// `ScrollDepth` block is missing so each composite can pick its own fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawMetrics {
    pub sessions: u64,
    pub dead_clicks: f64,
    pub rage_clicks: f64,
    pub script_errors: f64,
    pub error_clicks: f64,
    pub quickback: f64,
    pub scroll_depth: Option<f64>,
    /// Share of PopularPages visits that landed on cart/checkout/login pages (0.0–1.0).
    pub transactional_share: f64,
}

/// Derived scores, each clamped to `[0, 100]`.
///
/// Friction, frustration, conversion risk and silent killer read higher-is-worse;
/// tech health, engagement and localization quality read higher-is-better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CompositeScores {
    pub friction: f64,
    pub frustration: f64,
    pub conversion_risk: f64,
    pub tech_health: f64,
    pub engagement: f64,
    pub localization_quality: f64,
    pub silent_killer: f64,
}

/// One row of the tidy table handed to rendering.
#[derive(Debug, Clone, Serialize)]
pub struct MarketRow {
    pub date: Option<NaiveDate>,
    pub country: String,
    pub platform: Platform,
    pub market: String,
    /// Name of the classifier rule that produced `platform`.
    pub rule: &'static str,
    pub raw: RawMetrics,
    pub scores: CompositeScores,
}
