//! Plain-text rendering of reports and views for the terminal.

use std::fmt::Write as _;

use crash_stats_analytics_models::{
    CityRankings, GridRow, LabelCount, TimeSeriesPoint, TrendAnalysis,
};

use crate::report::{Share, SummaryReport};

const LABEL_WIDTH: usize = 32;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(LABEL_WIDTH + 18));
}

fn share_table(out: &mut String, title: &str, shares: &[Share]) {
    heading(out, title);
    if shares.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for share in shares {
        let pct = share.percentage.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$} {:>9} {:>6}%",
            share.label, share.count, pct
        );
    }
    out.push('\n');
}

fn count_table(out: &mut String, title: &str, entries: &[LabelCount]) {
    heading(out, title);
    if entries.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<w$} {:>9}",
            rank + 1,
            entry.label,
            entry.count,
            w = LABEL_WIDTH - 5
        );
    }
    out.push('\n');
}

fn highlight(out: &mut String, title: &str, entry: Option<&LabelCount>) {
    match entry {
        Some(e) => {
            let _ = writeln!(out, "{title:<20} {} ({})", e.label, e.count);
        }
        None => {
            let _ = writeln!(out, "{title:<20} -");
        }
    }
}

/// Renders the full `summary` report.
#[must_use]
pub fn summary(report: &SummaryReport) -> String {
    let mut out = String::new();
    let stats = &report.quick_stats;

    heading(&mut out, "Quick stats");
    let _ = writeln!(out, "{:<20} {}", "Crashes", stats.distinct_crashes);
    let _ = writeln!(out, "{:<20} {}", "Victims", stats.total_victims);
    highlight(&mut out, "Top state", stats.top_state.as_ref());
    highlight(&mut out, "Top weather", stats.top_weather.as_ref());
    highlight(&mut out, "Peak month", stats.top_month.as_ref());
    highlight(&mut out, "Peak hour", stats.top_hour.as_ref());
    highlight(&mut out, "Peak day", stats.top_day.as_ref());
    highlight(&mut out, "Top person type", stats.top_person_type.as_ref());
    highlight(&mut out, "Top road type", stats.top_road_type.as_ref());
    for entry in &stats.rural_urban {
        let _ = writeln!(out, "{:<20} {}", entry.label, entry.count);
    }
    out.push('\n');

    share_table(&mut out, "By year", &report.by_year);
    share_table(&mut out, "By month", &report.by_month);
    share_table(&mut out, "By day of week", &report.by_day_of_week);
    share_table(&mut out, "By hour", &report.by_hour);
    share_table(&mut out, "By gender", &report.by_gender);
    share_table(&mut out, "By age", &report.by_age);
    share_table(&mut out, "By person type", &report.by_person_type);
    share_table(&mut out, "Top weather conditions", &report.top_weather);
    share_table(&mut out, "Top light conditions", &report.top_light_conditions);
    share_table(&mut out, "Top road types", &report.top_road_types);
    share_table(&mut out, "Top counties", &report.top_counties);

    out
}

/// Renders safest and riskiest city lists.
#[must_use]
pub fn rankings(rankings: &CityRankings) -> String {
    let mut out = String::new();
    count_table(&mut out, "Safest cities", &rankings.safest);
    count_table(&mut out, "Riskiest cities", &rankings.riskiest);
    out
}

/// Renders city search results.
#[must_use]
pub fn search(term: &str, matches: &[LabelCount]) -> String {
    let mut out = String::new();
    count_table(&mut out, &format!("Cities matching \"{term}\""), matches);
    out
}

/// Renders a yearly timeline followed by its trend.
#[must_use]
pub fn timeline(title: &str, points: &[TimeSeriesPoint], trend: &TrendAnalysis) -> String {
    let mut out = String::new();
    heading(&mut out, title);
    for point in points {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {:>9}", point.year, point.count);
    }
    let _ = writeln!(
        out,
        "\nTrend: {} ({:.1}%)",
        trend.direction, trend.percent_change
    );
    out
}

/// Renders a grid with one header row built from the first row's cells.
#[must_use]
pub fn grid(title: &str, rows: &[GridRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    let Some(first) = rows.first() else {
        let _ = writeln!(out, "  (no data)");
        return out;
    };

    let _ = write!(out, "{:<12}", "");
    for cell in &first.cells {
        let _ = write!(out, " {:>14}", truncate(&cell.label, 14));
    }
    out.push('\n');

    for row in rows {
        let _ = write!(out, "{:<12}", truncate(&row.label, 12));
        for cell in &row.cells {
            let _ = write!(out, " {:>14}", cell.count);
        }
        out.push('\n');
    }
    out
}

fn truncate(label: &str, width: usize) -> String {
    label.chars().take(width).collect()
}
