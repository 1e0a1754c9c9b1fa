//! Sorting and selection over any [`FrequencyTable`].
//!
//! All sorts are stable: entries with equal counts keep the table's key
//! order, so repeated calls on the same table always agree.

use crash_stats_analytics_models::FrequencyTable;

use crate::AnalyticsError;

/// Returns every `(key, count)` entry ordered by count.
#[must_use]
pub fn sort_by_value<K: Ord + Clone>(table: &FrequencyTable<K>, ascending: bool) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = table.iter().map(|(k, v)| (k.clone(), v)).collect();
    if ascending {
        entries.sort_by(|a, b| a.1.cmp(&b.1));
    } else {
        entries.sort_by(|a, b| b.1.cmp(&a.1));
    }
    entries
}

/// The `n` highest-count entries, highest first. Returns every entry when
/// the table is smaller than `n`, and nothing when `n` is zero.
#[must_use]
pub fn top_n<K: Ord + Clone>(table: &FrequencyTable<K>, n: usize) -> Vec<(K, u64)> {
    let mut entries = sort_by_value(table, false);
    entries.truncate(n);
    entries
}

/// The `n` lowest-count entries, lowest first.
#[must_use]
pub fn bottom_n<K: Ord + Clone>(table: &FrequencyTable<K>, n: usize) -> Vec<(K, u64)> {
    let mut entries = sort_by_value(table, true);
    entries.truncate(n);
    entries
}

/// The highest-count entry. The first in key order wins a tie.
#[must_use]
pub fn peak<K: Ord + Clone>(table: &FrequencyTable<K>) -> Option<(K, u64)> {
    top_n(table, 1).into_iter().next()
}

/// Copy of `table` without the given labels, for dropping placeholder
/// categories such as `"Unknown"` before display.
#[must_use]
pub fn without_labels(table: &FrequencyTable<String>, excluded: &[&str]) -> FrequencyTable<String> {
    table
        .iter()
        .filter(|(label, _)| !excluded.contains(&label.as_str()))
        .map(|(label, count)| (label.clone(), count))
        .collect()
}

/// `count / total * 100` rendered with one decimal place.
///
/// # Panics
///
/// * If `total` is zero. Callers must check for an empty table first, or
///   use [`try_percentage`].
#[must_use]
pub fn percentage(count: u64, total: u64) -> String {
    assert!(total > 0, "percentage of a zero total");

    #[allow(clippy::cast_precision_loss)]
    let value = count as f64 / total as f64 * 100.0;
    format!("{value:.1}")
}

/// Checked form of [`percentage`].
///
/// # Errors
///
/// * [`AnalyticsError::ZeroTotal`] if `total` is zero
pub fn try_percentage(count: u64, total: u64) -> Result<String, AnalyticsError> {
    if total == 0 {
        return Err(AnalyticsError::ZeroTotal);
    }
    Ok(percentage(count, total))
}
