use crate::models::{ClassifiedRecord, Platform, RawCountryPayload};
use crate::platform::evidence;

/// Countries that always run the Nordic Netshop storefront.
const NETSHOP_COUNTRIES: &[&str] = &["Sweden", "Norway"];

const NETSHOP_MARKERS: &[&str] = &[".se/", ".no/", "lyreco.se", "lyreco.no"];
const NEXTGEN_MARKERS: &[&str] = &["shop.lyreco"];
const WEBSHOP_MARKERS: &[&str] = &["webshop", "lyreco.com/webshop"];
const SUPPORT_MARKERS: &[&str] = &["support.lyreco", "help.lyreco"];

/// Predicate half of a classification rule.
#[derive(Debug)]
pub enum Matcher {
    /// Country name equals one of these (ASCII case-insensitive).
    CountryIn(&'static [&'static str]),
    /// Evidence blob contains any of these substrings.
    EvidenceContains(&'static [&'static str]),
    /// Nothing was collected from PopularPages or ReferrerUrl.
    NoEvidence,
    /// Any nested matcher matches.
    AnyOf(&'static [Matcher]),
    /// Matches everything; terminates the table.
    Always,
}

impl Matcher {
    fn matches(&self, country: &str, evidence: &str) -> bool {
        match self {
            Matcher::CountryIn(countries) => countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(country.trim())),
            Matcher::EvidenceContains(markers) => markers.iter().any(|m| evidence.contains(m)),
            Matcher::NoEvidence => evidence.is_empty(),
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(country, evidence)),
            Matcher::Always => true,
        }
    }
}

/// One row of the rule table: `matcher` firing assigns `platform`.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub platform: Platform,
    pub matcher: Matcher,
}

/// Classification rules in priority order; the first match wins.
///
/// Geography comes before every URL rule, so Sweden and Norway resolve to
/// Netshop even when their evidence points at `shop.lyreco`. That may hide a
/// NextGen rollout in those countries; the precedence is kept as-is until the
/// business decides otherwise.
pub static RULES: &[Rule] = &[
    Rule {
        name: "netshop",
        platform: Platform::Netshop,
        matcher: Matcher::AnyOf(&[
            Matcher::CountryIn(NETSHOP_COUNTRIES),
            Matcher::EvidenceContains(NETSHOP_MARKERS),
        ]),
    },
    Rule {
        name: "nextgen-host",
        platform: Platform::NextGen,
        matcher: Matcher::EvidenceContains(NEXTGEN_MARKERS),
    },
    Rule {
        name: "webshop-path",
        platform: Platform::Webshop,
        matcher: Matcher::EvidenceContains(WEBSHOP_MARKERS),
    },
    Rule {
        name: "support-host",
        platform: Platform::Support,
        matcher: Matcher::EvidenceContains(SUPPORT_MARKERS),
    },
    Rule {
        name: "no-evidence",
        platform: Platform::Unknown,
        matcher: Matcher::NoEvidence,
    },
    Rule {
        name: "fallback",
        platform: Platform::Other,
        matcher: Matcher::Always,
    },
];

/// Classify a country payload into a platform.
pub fn classify(country: &str, payload: &RawCountryPayload) -> Platform {
    classify_explained(country, payload).platform
}

/// Like [`classify`], but also returns the rule that fired.
pub fn classify_explained(country: &str, payload: &RawCountryPayload) -> &'static Rule {
    let evidence = evidence::collect(payload);
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(country, &evidence))
        // the table ends with `Always`
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// `"{country} ({platform})"`
pub fn market_key(country: &str, platform: Platform) -> String {
    format!("{} ({})", country, platform)
}

impl<'a> ClassifiedRecord<'a> {
    /// Classify `payload` under its own `country` field.
    pub fn new(payload: &'a RawCountryPayload) -> Self {
        let rule = classify_explained(&payload.country, payload);
        ClassifiedRecord {
            payload,
            platform: rule.platform,
            market: market_key(&payload.country, rule.platform),
            rule: rule.name,
        }
    }
}
