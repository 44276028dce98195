//! Storefront platform detection from URL evidence.
//!
//! - [`evidence`] — collects PopularPages/ReferrerUrl strings into one lowercase blob.
//! - [`classifier`] — ordered rule table mapping `(country, evidence)` to a
//!   [`Platform`](crate::models::Platform).

pub mod classifier;
pub mod evidence;
