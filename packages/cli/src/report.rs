//! Assembles the `summary` report from a snapshot.

use crash_stats_analytics::ordering::{canonical_order, day_of_week_rank, hour_rank, month_rank};
use crash_stats_analytics::ranking::{sort_by_value, top_n, try_percentage, without_labels};
use crash_stats_analytics::views::quick_stats;
use crash_stats_analytics_models::{AggregateSnapshot, FrequencyTable, QuickStats};
use crash_stats_crash_models::AgeBucket;
use crash_stats_ingest::config::ViewConfig;
use serde::Serialize;

/// A labelled count with its share of the table it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub label: String,
    pub count: u64,
    /// One-decimal percentage, or `None` when the table is empty.
    pub percentage: Option<String>,
}

/// Everything printed by `crash_stats summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub quick_stats: QuickStats,
    pub by_year: Vec<Share>,
    pub by_month: Vec<Share>,
    pub by_day_of_week: Vec<Share>,
    pub by_hour: Vec<Share>,
    pub by_gender: Vec<Share>,
    pub by_age: Vec<Share>,
    pub by_person_type: Vec<Share>,
    pub top_weather: Vec<Share>,
    pub top_light_conditions: Vec<Share>,
    pub top_road_types: Vec<Share>,
    pub top_counties: Vec<Share>,
}

fn shares<K: ToString>(entries: Vec<(K, u64)>, total: u64) -> Vec<Share> {
    entries
        .into_iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percentage: try_percentage(count, total).ok(),
        })
        .collect()
}

fn ranked(table: &FrequencyTable<String>, n: usize) -> Vec<Share> {
    shares(top_n(table, n), table.total())
}

/// Builds the summary report. Temporal tables are in calendar order,
/// demographic and environmental tables are ranked by count, and
/// placeholder labels are hidden where a chart would show them as noise.
#[must_use]
pub fn summary(snapshot: &AggregateSnapshot, views: &ViewConfig) -> SummaryReport {
    let placeholders: Vec<&str> = views.placeholder_labels.iter().map(String::as_str).collect();
    let total = snapshot.total_records;

    let gender = without_labels(&snapshot.by_gender, &placeholders);
    let weather = without_labels(&snapshot.by_weather, &placeholders);

    let ages: Vec<(AgeBucket, u64)> = snapshot
        .by_age
        .iter()
        .filter(|(bucket, _)| **bucket != AgeBucket::Unknown)
        .map(|(bucket, count)| (*bucket, count))
        .collect();
    let known_ages: u64 = ages.iter().map(|(_, count)| count).sum();

    SummaryReport {
        quick_stats: quick_stats(snapshot),
        by_year: shares(
            snapshot.by_year.iter().map(|(y, c)| (*y, c)).collect(),
            total,
        ),
        by_month: shares(canonical_order(&snapshot.by_month, month_rank), total),
        by_day_of_week: shares(
            canonical_order(&snapshot.by_day_of_week, day_of_week_rank),
            total,
        ),
        by_hour: shares(canonical_order(&snapshot.by_hour, hour_rank), total),
        by_gender: shares(sort_by_value(&gender, false), gender.total()),
        by_age: shares(ages, known_ages),
        by_person_type: ranked(&snapshot.by_person_type, views.top_n),
        top_weather: ranked(&weather, views.top_n),
        top_light_conditions: ranked(&snapshot.by_light_condition, views.top_n),
        top_road_types: ranked(&snapshot.by_road_type, views.top_n),
        top_counties: ranked(&snapshot.by_county, views.top_n),
    }
}
