//! Canonical orderings for the fixed temporal vocabularies.
//!
//! Aggregates are keyed by label, so their natural iteration order is
//! alphabetical. These tables give every month, weekday and hour label its
//! calendar rank so views can be sorted the way people read them.

use std::sync::LazyLock;

use crash_stats_analytics_models::FrequencyTable;
use regex::Regex;

/// Rank returned for a label outside the vocabulary.
pub const UNRANKED: i32 = -1;

/// Gregorian month names in calendar order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day names, week starting on Sunday.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

static HOUR_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):00(am|pm)-([0-9]{1,2}):59(am|pm)$")
        .unwrap_or_else(|_| unreachable!())
});

fn position(vocabulary: &[&str], label: &str) -> i32 {
    vocabulary
        .iter()
        .position(|v| *v == label)
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(UNRANKED)
}

/// `January` is 0, `December` is 11.
#[must_use]
pub fn month_rank(label: &str) -> i32 {
    position(&MONTHS, label)
}

/// `Sunday` is 0, `Saturday` is 6.
#[must_use]
pub fn day_of_week_rank(label: &str) -> i32 {
    position(&DAYS_OF_WEEK, label)
}

/// Parses an hour range label such as `"4:00pm-4:59pm"` into its 24-hour
/// start hour (16). `12:00am` is midnight (0) and `12:00pm` is noon (12).
///
/// Labels that do not have the `H:00xm-H:59xm` shape, whose two halves
/// name different hours, or whose hour is outside 1-12, return
/// [`UNRANKED`].
#[must_use]
pub fn hour_rank(label: &str) -> i32 {
    let Some(caps) = HOUR_LABEL.captures(label) else {
        return UNRANKED;
    };
    if caps[1] != caps[3] || caps[2] != caps[4] {
        return UNRANKED;
    }
    let Ok(hour) = caps[1].parse::<i32>() else {
        return UNRANKED;
    };
    if !(1..=12).contains(&hour) {
        return UNRANKED;
    }

    match (&caps[2], hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        (_, h) => h + 12,
    }
}

/// Orders a label table by a canonical rank function.
///
/// Unranked labels are placed after every ranked one; ties (including
/// between unranked labels) keep the table's iteration order.
#[must_use]
pub fn canonical_order(
    table: &FrequencyTable<String>,
    rank: impl Fn(&str) -> i32,
) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = table
        .iter()
        .map(|(label, count)| (label.clone(), count))
        .collect();
    entries.sort_by_key(|(label, _)| {
        let r = rank(label);
        (r == UNRANKED, r)
    });
    entries
}
