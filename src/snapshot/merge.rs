use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::parse_timestamp;
use crate::models::RawCountryPayload;

/// Fold records from many snapshots into the newest record per country.
///
/// The result does not depend on input order: ties on timestamp go to the
/// record with more metric blocks, then to the larger serialized form.
/// Unparsable timestamps rank below every parsable one. Output is sorted by country.
pub fn latest_per_country<I>(records: I) -> Vec<RawCountryPayload>
where
    I: IntoIterator<Item = RawCountryPayload>,
{
    records
        .into_iter()
        .fold(BTreeMap::<String, RawCountryPayload>::new(), |mut latest, record| {
            let replace = latest
                .get(&record.country)
                .map_or(true, |current| recency(current, &record) == Ordering::Less);
            if replace {
                latest.insert(record.country.clone(), record);
            }
            latest
        })
        .into_values()
        .collect()
}

fn captured_at(record: &RawCountryPayload) -> Option<NaiveDateTime> {
    parse_timestamp(&record.timestamp)
}

fn recency(a: &RawCountryPayload, b: &RawCountryPayload) -> Ordering {
    captured_at(a)
        .cmp(&captured_at(b))
        .then_with(|| a.metrics.len().cmp(&b.metrics.len()))
        .then_with(|| {
            let a = serde_json::to_string(a).unwrap_or_default();
            let b = serde_json::to_string(b).unwrap_or_default();
            a.cmp(&b)
        })
}
