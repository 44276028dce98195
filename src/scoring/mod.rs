//! Composite UX scores derived from raw percentage fields.
//!
//! - [`composite`] — one function per score, plus [`CompositeScores::compute`](crate::models::CompositeScores::compute).
//! - [`page_mix`] — transactional page share and the page-mix amplified "silent killer" score.

pub mod composite;
pub mod page_mix;
