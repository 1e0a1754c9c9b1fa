//! Display-ready views built from an [`AggregateSnapshot`].
//!
//! These are policies layered on top of the engine's tables: minimum-count
//! thresholds, "missing means zero" reads of correlation slices, and the
//! row/column layouts charts expect. None of them touch raw records.

use std::str::FromStr;

use crash_stats_analytics_models::{
    AggregateSnapshot, CityRankings, FrequencyTable, GridRow, LabelCount, QuickStats,
    TimeSeriesPoint, TrendAnalysis, TrendDirection,
};

use crate::AnalyticsError;
use crate::ordering::{MONTHS, canonical_order, day_of_week_rank, hour_rank, month_rank};
use crate::ranking::{peak, sort_by_value, top_n};

/// Cities with fewer recorded crashes are left out of rankings.
pub const DEFAULT_MIN_CITY_COUNT: u64 = 5;

/// Length of each ranked city list.
pub const DEFAULT_RANKING_LIMIT: usize = 50;

/// Percent change beyond which a timeline counts as increasing or
/// decreasing.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

fn label_counts<K: ToString>(entries: Vec<(K, u64)>) -> Vec<LabelCount> {
    entries
        .into_iter()
        .map(|(label, count)| LabelCount::new(label.to_string(), count))
        .collect()
}

/// Ranks cities with at least `min_count` crashes, safest and riskiest
/// first, each list capped at `limit`.
#[must_use]
pub fn city_rankings(cities: &FrequencyTable<String>, min_count: u64, limit: usize) -> CityRankings {
    let eligible: FrequencyTable<String> = cities
        .iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(city, count)| (city.clone(), count))
        .collect();

    let mut safest = sort_by_value(&eligible, true);
    safest.truncate(limit);
    let mut riskiest = sort_by_value(&eligible, false);
    riskiest.truncate(limit);

    CityRankings {
        safest: label_counts(safest),
        riskiest: label_counts(riskiest),
    }
}

/// Cities whose name contains `term`, ignoring case, fewest crashes first.
///
/// A blank search term matches nothing.
#[must_use]
pub fn search_cities(cities: &FrequencyTable<String>, term: &str) -> Vec<LabelCount> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let matches: FrequencyTable<String> = cities
        .iter()
        .filter(|(city, _)| city.to_lowercase().contains(&term))
        .map(|(city, count)| (city.clone(), count))
        .collect();

    label_counts(sort_by_value(&matches, true))
}

/// Which slice of the data a timeline follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineLocation {
    /// Every record.
    All,
    /// Records from one state.
    State(String),
    /// Records from one (non-sentinel) city.
    City(String),
}

impl FromStr for TimelineLocation {
    type Err = AnalyticsError;

    /// Parses `all`, `state:<name>` or `city:<name>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyticsError::InvalidLocation {
            value: s.to_string(),
        };

        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let (kind, name) = s.split_once(':').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(Self::State(name.to_string())),
            "city" => Ok(Self::City(name.to_string())),
            _ => Err(invalid()),
        }
    }
}

/// Crash counts per year for `location`, one point for every year in the
/// snapshot, oldest first. Years with no crashes at the location are zero.
#[must_use]
pub fn timeline(snapshot: &AggregateSnapshot, location: &TimelineLocation) -> Vec<TimeSeriesPoint> {
    snapshot
        .by_year
        .iter()
        .map(|(&year, total)| {
            let count = match location {
                TimelineLocation::All => total,
                TimelineLocation::State(state) => snapshot.year_by_state.get(state.as_str(), &year),
                TimelineLocation::City(city) => snapshot.year_by_city.get(city.as_str(), &year),
            };
            TimeSeriesPoint { year, count }
        })
        .collect()
}

/// Compares the first and last points of a timeline.
///
/// A series that starts at zero and grows is reported as a 100% increase.
#[must_use]
pub fn trend(points: &[TimeSeriesPoint]) -> TrendAnalysis {
    let stable = TrendAnalysis {
        direction: TrendDirection::Stable,
        percent_change: 0.0,
    };

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return stable;
    };
    if points.len() < 2 {
        return stable;
    }

    #[allow(clippy::cast_precision_loss)]
    let change = if first.count > 0 {
        (last.count as f64 - first.count as f64) / first.count as f64 * 100.0
    } else if last.count > 0 {
        100.0
    } else {
        0.0
    };

    let direction = if change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    TrendAnalysis {
        direction,
        percent_change: change.abs(),
    }
}

/// One row per calendar month, one cell per year, from the year × month
/// correlation.
#[must_use]
pub fn monthly_trend(snapshot: &AggregateSnapshot) -> Vec<GridRow> {
    MONTHS
        .iter()
        .map(|&month| GridRow {
            label: month.to_string(),
            cells: snapshot
                .by_year
                .keys()
                .map(|year| LabelCount::new(year.to_string(), snapshot.month_by_year.get(year, month)))
                .collect(),
        })
        .collect()
}

/// One row per calendar month, one cell for each of the `top` most common
/// weather conditions overall.
#[must_use]
pub fn weather_by_month(snapshot: &AggregateSnapshot, top: usize) -> Vec<GridRow> {
    let conditions = top_n(&snapshot.by_weather, top);

    MONTHS
        .iter()
        .map(|&month| GridRow {
            label: month.to_string(),
            cells: conditions
                .iter()
                .map(|(weather, _)| {
                    LabelCount::new(
                        weather.clone(),
                        snapshot.weather_by_month.get(month, weather.as_str()),
                    )
                })
                .collect(),
        })
        .collect()
}

/// One row for each of the `top` most common weather conditions, one cell
/// per light condition (most common overall first).
#[must_use]
pub fn weather_by_light(snapshot: &AggregateSnapshot, top: usize) -> Vec<GridRow> {
    let lights = sort_by_value(&snapshot.by_light_condition, false);

    top_n(&snapshot.by_weather, top)
        .into_iter()
        .map(|(weather, _)| GridRow {
            cells: lights
                .iter()
                .map(|(light, _)| {
                    LabelCount::new(
                        light.clone(),
                        snapshot.light_by_weather.get(weather.as_str(), light.as_str()),
                    )
                })
                .collect(),
            label: weather,
        })
        .collect()
}

/// Highest-count entry of a temporal table. Entries are visited in
/// calendar order and the first maximum wins.
fn calendar_peak(
    table: &FrequencyTable<String>,
    rank: impl Fn(&str) -> i32,
) -> Option<LabelCount> {
    canonical_order(table, rank)
        .into_iter()
        .fold(None, |best: Option<(String, u64)>, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, count)| LabelCount::new(label, count))
}

/// Headline figures for the snapshot.
///
/// Month, day and hour peaks break ties by calendar order; the other
/// peaks break ties by label.
#[must_use]
pub fn quick_stats(snapshot: &AggregateSnapshot) -> QuickStats {
    let top = |table: &FrequencyTable<String>| {
        peak(table).map(|(label, count)| LabelCount::new(label, count))
    };

    QuickStats {
        distinct_crashes: snapshot.distinct_incidents() as u64,
        total_victims: snapshot.total_records,
        top_state: top(&snapshot.by_state),
        top_weather: top(&snapshot.by_weather),
        top_month: calendar_peak(&snapshot.by_month, month_rank),
        top_hour: calendar_peak(&snapshot.by_hour, hour_rank),
        top_day: calendar_peak(&snapshot.by_day_of_week, day_of_week_rank),
        top_person_type: top(&snapshot.by_person_type),
        top_road_type: top(&snapshot.by_road_type),
        rural_urban: label_counts(sort_by_value(&snapshot.by_rural_urban, false)),
    }
}
