use crate::models::RawCountryPayload;
use crate::payload::{entry_strings, POPULAR_PAGES, REFERRER_URL};

/// Lowercase, whitespace-joined URL evidence for one payload.
///
/// Sources: every PopularPages `url`, then every non-null ReferrerUrl `name`.
/// An empty string means no evidence was collected.
pub fn collect(payload: &RawCountryPayload) -> String {
    let pages = entry_strings(payload, POPULAR_PAGES, "url");
    let referrers = entry_strings(payload, REFERRER_URL, "name");

    pages
        .into_iter()
        .chain(referrers)
        .map(str::trim)
        // Blank URLs are not evidence: a payload with only blank entries is Unknown, not Other.
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
