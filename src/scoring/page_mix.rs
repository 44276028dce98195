use crate::models::RawMetrics;

/// URL fragments that mark a page as part of the buying funnel.
pub const TRANSACTIONAL_KEYWORDS: &[&str] = &[
    "cart",
    "checkout",
    "pay",
    "basket",
    "login",
    "wslogin",
    "validate",
    "validation",
];

/// How strongly funnel-heavy traffic amplifies the base error score.
pub const AMPLIFICATION: f64 = 3.0;

pub fn is_transactional(url: &str) -> bool {
    let url = url.to_lowercase();
    TRANSACTIONAL_KEYWORDS.iter().any(|k| url.contains(k))
}

/// Fraction of visits (0.0–1.0) that hit transactional pages. `0.0` with no visits.
pub fn transactional_share(pages: &[(&str, u64)]) -> f64 {
    let total = pages
        .iter()
        .fold(0u64, |acc, (_, visits)| acc.saturating_add(*visits));
    if total == 0 {
        return 0.0;
    }
    let transactional = pages
        .iter()
        .filter(|(url, _)| is_transactional(url))
        .fold(0u64, |acc, (_, visits)| acc.saturating_add(*visits));
    (transactional as f64 / total as f64).clamp(0.0, 1.0)
}

/// `(dead * 0.7 + error_clicks * 0.3) * (1 + share * AMPLIFICATION)`, capped at 100.
pub fn silent_killer(raw: &RawMetrics) -> f64 {
    let base = raw.dead_clicks * 0.7 + raw.error_clicks * 0.3;
    let share = raw.transactional_share.clamp(0.0, 1.0);
    (base * (1.0 + share * AMPLIFICATION)).clamp(0.0, 100.0)
}
