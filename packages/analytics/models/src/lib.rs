#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate types produced by the crash aggregation engine.
//!
//! [`FrequencyTable`] and [`CorrelationTable`] are the building blocks of
//! [`AggregateSnapshot`], the read-only bundle every downstream view is
//! computed from. The remaining types are the shapes those views return.

use std::collections::{BTreeMap, BTreeSet};

use crash_stats_crash_models::{AgeBucket, Dimension};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category label to count mapping.
///
/// Iteration follows key order, which is deterministic but carries no
/// ranking meaning; ranking is applied at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FrequencyTable<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to the count for `key`.
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Adds `amount` to the count for `key`.
    pub fn add(&mut self, key: K, amount: u64) {
        *self.counts.entry(key).or_insert(0) += amount;
    }

    /// Returns the count for `key`, treating a missing key as zero.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` has been counted at least once.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates `(key, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Iterates keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// Folds `other` into `self` by pointwise addition.
    pub fn merge(&mut self, other: Self) {
        for (key, count) in other.counts {
            self.add(key, count);
        }
    }
}

impl<K: Ord> FromIterator<(K, u64)> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, count) in iter {
            table.add(key, count);
        }
        table
    }
}

/// Two-level mapping: primary label to a nested [`FrequencyTable`] keyed by
/// a secondary label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "P: Serialize, S: Serialize",
    deserialize = "P: Ord + Deserialize<'de>, S: Ord + Deserialize<'de>"
))]
pub struct CorrelationTable<P: Ord, S: Ord> {
    rows: BTreeMap<P, FrequencyTable<S>>,
}

impl<P: Ord, S: Ord> Default for CorrelationTable<P, S> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<P: Ord, S: Ord> CorrelationTable<P, S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to the `(primary, secondary)` cell.
    pub fn increment(&mut self, primary: P, secondary: S) {
        self.rows.entry(primary).or_default().increment(secondary);
    }

    /// Returns the nested table for `primary`, if any record carried it.
    #[must_use]
    pub fn slice<Q>(&self, primary: &Q) -> Option<&FrequencyTable<S>>
    where
        P: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.get(primary)
    }

    /// Returns the `(primary, secondary)` cell, treating any missing level
    /// as zero.
    #[must_use]
    pub fn get<QP, QS>(&self, primary: &QP, secondary: &QS) -> u64
    where
        P: std::borrow::Borrow<QP>,
        S: std::borrow::Borrow<QS>,
        QP: Ord + ?Sized,
        QS: Ord + ?Sized,
    {
        self.rows.get(primary).map_or(0, |row| row.get(secondary))
    }

    /// Number of distinct primary keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates `(primary, nested table)` pairs in primary key order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &FrequencyTable<S>)> {
        self.rows.iter()
    }

    /// Folds `other` into `self` cell by cell.
    pub fn merge(&mut self, other: Self) {
        for (primary, row) in other.rows {
            self.rows.entry(primary).or_default().merge(row);
        }
    }
}

/// Every frequency and correlation table computed from one full pass over
/// a record collection.
///
/// A snapshot is built once by the aggregation engine and only read
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    /// Distinct crash identities seen.
    pub unique_incidents: BTreeSet<String>,
    /// Number of person-level records processed.
    pub total_records: u64,
    pub by_year: FrequencyTable<u16>,
    pub by_state: FrequencyTable<String>,
    pub by_month: FrequencyTable<String>,
    pub by_day_of_week: FrequencyTable<String>,
    pub by_hour: FrequencyTable<String>,
    pub by_gender: FrequencyTable<String>,
    pub by_age: FrequencyTable<AgeBucket>,
    pub by_weather: FrequencyTable<String>,
    pub by_light_condition: FrequencyTable<String>,
    pub by_road_type: FrequencyTable<String>,
    pub by_person_type: FrequencyTable<String>,
    pub by_rural_urban: FrequencyTable<String>,
    /// Sentinel-filtered: "not applicable" cities are never counted.
    pub by_city: FrequencyTable<String>,
    /// Sentinel-filtered, with county code suffixes stripped.
    pub by_county: FrequencyTable<String>,
    /// Month to weather.
    pub weather_by_month: CorrelationTable<String, String>,
    /// Year to month.
    pub month_by_year: CorrelationTable<u16, String>,
    /// State to year.
    pub year_by_state: CorrelationTable<String, u16>,
    /// City to year, sentinel-filtered like `by_city`.
    pub year_by_city: CorrelationTable<String, u16>,
    /// Weather to light condition.
    pub light_by_weather: CorrelationTable<String, String>,
    /// Records that lacked a usable value, per dimension. Place dimensions
    /// also count sentinel-filtered values here.
    pub missing: FrequencyTable<Dimension>,
}

impl AggregateSnapshot {
    /// Number of distinct crash events.
    #[must_use]
    pub fn distinct_incidents(&self) -> usize {
        self.unique_incidents.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// Count for one year of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub year: u16,
    pub count: u64,
}

/// Direction of change between the first and last point of a timeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    /// More than 5% growth
    Increasing,
    /// More than 5% decline
    Decreasing,
    /// Within ±5%
    Stable,
}

/// Summary of how a timeline changed from its first to its last year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// Absolute percent change, first year to last year.
    pub percent_change: f64,
}

/// A labelled count, as returned by ranking views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

impl LabelCount {
    #[must_use]
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Safest and riskiest cities after noise thresholding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRankings {
    /// Fewest recorded crashes first.
    pub safest: Vec<LabelCount>,
    /// Most recorded crashes first.
    pub riskiest: Vec<LabelCount>,
}

/// One row of a two-dimensional view grid. Cells appear in column order
/// and a missing cell is reported as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub label: String,
    pub cells: Vec<LabelCount>,
}

/// Headline figures shown above the detailed views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub distinct_crashes: u64,
    pub total_victims: u64,
    pub top_state: Option<LabelCount>,
    pub top_weather: Option<LabelCount>,
    /// Busiest month; ties go to the earlier month.
    pub top_month: Option<LabelCount>,
    /// Busiest hour range; ties go to the earlier hour.
    pub top_hour: Option<LabelCount>,
    /// Busiest weekday; ties go to the earlier day, Sunday first.
    pub top_day: Option<LabelCount>,
    pub top_person_type: Option<LabelCount>,
    pub top_road_type: Option<LabelCount>,
    /// Every rural/urban class, most common first.
    pub rural_urban: Vec<LabelCount>,
}
