//! Platform classification and UX score normalization for per-country web-analytics snapshots.
//!
//! Raw payload → [`platform::classifier::classify`] → [`scoring`] composites →
//! [`report::Report`] tables for rendering.

pub mod config;
pub mod logging;
pub mod models;
pub mod payload;
pub mod platform;
pub mod report;
pub mod scoring;
pub mod snapshot;
