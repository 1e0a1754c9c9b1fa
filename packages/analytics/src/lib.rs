#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and ranking engine for crash incident records.
//!
//! [`aggregate::aggregate`] turns a record collection into an immutable
//! [`AggregateSnapshot`](crash_stats_analytics_models::AggregateSnapshot)
//! in a single pass. The [`ranking`] and [`ordering`] modules sort any
//! table in the snapshot, and [`views`] combines tables into the shapes
//! presentation layers display (timelines, rankings, grids).
//!
//! Nothing here performs I/O or holds global state: every function is a
//! pure computation over its arguments.

pub mod aggregate;
pub mod normalize;
pub mod ordering;
pub mod ranking;
pub mod views;

pub use aggregate::{Aggregator, aggregate, aggregate_with};
pub use normalize::NormalizerConfig;

use thiserror::Error;

/// Errors that can occur when building views over a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// A percentage was requested against a zero total.
    #[error("Cannot compute a percentage of a zero total")]
    ZeroTotal,

    /// A timeline location could not be parsed.
    #[error("Invalid timeline location '{value}': expected 'all', 'state:<name>', or 'city:<name>'")]
    InvalidLocation {
        /// The rejected input.
        value: String,
    },
}
