#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for pedestrian and cyclist crash statistics.
//!
//! Loads a crash feature document, aggregates it once, and prints the
//! requested view as text or JSON.

mod render;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use crash_stats_analytics::aggregate_with;
use crash_stats_analytics::views::{
    TimelineLocation, city_rankings, monthly_trend, search_cities, timeline, trend,
    weather_by_light, weather_by_month,
};
use crash_stats_ingest::config::Config;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "crash_stats", about = "Pedestrian and cyclist crash statistics")]
struct Cli {
    /// Crash feature document (`GeoJSON` `FeatureCollection`)
    #[arg(long, short)]
    input: PathBuf,
    /// TOML config file (overrides the `CRASH_STATS_CONFIG` env var)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline figures plus temporal, demographic, and environmental breakdowns
    Summary,
    /// Safest and riskiest cities, or cities matching a search term
    Rankings {
        /// Minimum crashes for a city to be ranked
        #[arg(long)]
        min_count: Option<u64>,
        /// Length of each ranked list
        #[arg(long)]
        limit: Option<usize>,
        /// Show cities whose name contains this term instead of rankings
        #[arg(long)]
        search: Option<String>,
    },
    /// Crashes per year with trend, for everything or one state/city
    Timeline {
        /// `all`, `state:<name>`, or `city:<name>`
        #[arg(long, default_value = "all")]
        location: String,
    },
    /// Weather by month and weather by light condition grids
    Weather {
        /// Number of weather conditions to include
        #[arg(long)]
        columns: Option<usize>,
    },
    /// Crashes per month for each year
    Monthly,
    /// Dump the full aggregate snapshot as JSON
    Snapshot,
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let records = crash_stats_ingest::load_path(&cli.input)?;

    let start = Instant::now();
    let snapshot = aggregate_with(&records, &config.normalizer);
    log::info!(
        "Aggregated {} record(s) into {} crash(es) in {:.2?}",
        snapshot.total_records,
        snapshot.distinct_incidents(),
        start.elapsed()
    );

    let views = &config.views;

    match cli.command {
        Commands::Summary => {
            let report = report::summary(&snapshot, views);
            emit(cli.json, &report, render::summary)?;
        }
        Commands::Rankings {
            min_count,
            limit,
            search,
        } => {
            if let Some(term) = search {
                let matches = search_cities(&snapshot.by_city, &term);
                emit(cli.json, &matches, |m| render::search(&term, m))?;
            } else {
                let rankings = city_rankings(
                    &snapshot.by_city,
                    min_count.unwrap_or(views.min_city_count),
                    limit.unwrap_or(views.ranking_limit),
                );
                emit(cli.json, &rankings, render::rankings)?;
            }
        }
        Commands::Timeline { location } => {
            let location: TimelineLocation = location.parse()?;
            let title = match &location {
                TimelineLocation::All => "All locations".to_string(),
                TimelineLocation::State(name) | TimelineLocation::City(name) => name.clone(),
            };
            if matches!(location, TimelineLocation::City(_))
                && !snapshot.by_city.contains(title.as_str())
            {
                log::warn!("No crashes recorded for city {title}");
            }

            let points = timeline(&snapshot, &location);
            let analysis = trend(&points);
            emit(cli.json, &(&points, &analysis), |(p, a)| {
                render::timeline(&title, p, a)
            })?;
        }
        Commands::Weather { columns } => {
            let columns = columns.unwrap_or(views.weather_columns);
            let grids = (
                weather_by_month(&snapshot, columns),
                weather_by_light(&snapshot, columns),
            );
            emit(cli.json, &grids, |(by_month, by_light)| {
                format!(
                    "{}\n{}",
                    render::grid("Weather by month", by_month),
                    render::grid("Weather by light condition", by_light)
                )
            })?;
        }
        Commands::Monthly => {
            let rows = monthly_trend(&snapshot);
            emit(cli.json, &rows, |rows| render::grid("Crashes by month", rows))?;
        }
        Commands::Snapshot => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
