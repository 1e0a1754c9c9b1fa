#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads crash feature documents into [`IncidentRecord`]s.
//!
//! Input is a `GeoJSON` `FeatureCollection` whose feature `properties` use
//! the FARS pedestrian/bicyclist field names (`CRASH_NUM1`, `YEAR`,
//! `STATENAME`, ...). Only document-level problems are errors: a feature
//! with missing or oddly typed properties still becomes a record, with the
//! affected fields left empty, so that one bad row never prevents the rest
//! of the collection from being aggregated.

pub mod config;
pub mod fields;

use std::io::Read;
use std::path::Path;

use crash_stats_crash_models::IncidentRecord;
use thiserror::Error;

/// Errors that can occur while loading a crash document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a feature collection.
    #[error("Invalid crash document: {message}")]
    Document {
        /// Description of what went wrong.
        message: String,
    },
}

/// Reads and parses the crash document at `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, is not valid JSON,
/// or has no features array.
pub fn load_path(path: &Path) -> Result<Vec<IncidentRecord>, IngestError> {
    log::info!("Loading crash features from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_reader(std::io::BufReader::new(file))
}

/// Parses a crash document from any reader.
///
/// # Errors
///
/// Returns [`IngestError`] if the input is not valid JSON or has no
/// features array.
pub fn load_reader(reader: impl Read) -> Result<Vec<IncidentRecord>, IngestError> {
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    parse_document(&json)
}

/// Converts a parsed document into records, one per feature.
///
/// Accepts either a `FeatureCollection` object or a bare array of
/// features.
///
/// # Errors
///
/// Returns [`IngestError::Document`] if no features array is present.
pub fn parse_document(json: &serde_json::Value) -> Result<Vec<IncidentRecord>, IngestError> {
    let features = json
        .as_array()
        .or_else(|| json.get("features").and_then(serde_json::Value::as_array))
        .ok_or_else(|| IngestError::Document {
            message: "No features array in crash document".to_string(),
        })?;

    let mut without_properties = 0_u64;
    let records: Vec<IncidentRecord> = features
        .iter()
        .map(|feature| {
            let props = feature.get("properties").filter(|p| p.is_object());
            if props.is_none() {
                without_properties += 1;
            }
            props.map_or_else(IncidentRecord::default, fields::record_from_properties)
        })
        .collect();

    if without_properties > 0 {
        log::warn!("{without_properties} feature(s) had no properties object");
    }
    log::info!("Loaded {} crash record(s)", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-89.65, 39.78] },
                "properties": {
                    "CRASH_NUM1": "170123",
                    "YEAR": 2020,
                    "STATENAME": "Illinois",
                    "CITYNAME": "SPRINGFIELD",
                    "COUNTYNAME": "SANGAMON (167)",
                    "MONTHNAME": "January",
                    "DAY_WEEKNAME": "Friday",
                    "HOURNAME": "6:00pm-6:59pm",
                    "PBSEXNAME": "Male",
                    "PBPTYPENAME": "Pedestrian",
                    "PBAGE": 34,
                    "WEATHERNAME": "Rain",
                    "LGT_CONDNAME": "Dark - Lighted",
                    "FUNC_SYSNAME": "Local",
                    "RUR_URBNAME": "Urban"
                }
            },
            { "type": "Feature", "geometry": null },
            {
                "type": "Feature",
                "properties": { "CRASH_NUM1": "170123", "YEAR": "2020", "PBAGE": null }
            }
        ]
    }"#;

    #[test]
    fn loads_feature_collection() {
        let records = load_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.incident_id.as_deref(), Some("170123"));
        assert_eq!(first.year, Some(2020));
        assert_eq!(first.city.as_deref(), Some("SPRINGFIELD"));
        assert_eq!(first.county.as_deref(), Some("SANGAMON (167)"));
        assert_eq!(first.hour_label.as_deref(), Some("6:00pm-6:59pm"));
        assert_eq!(first.road_type.as_deref(), Some("Local"));
        assert_eq!(first.age, Some(34));
    }

    #[test]
    fn keeps_features_without_properties() {
        let records = load_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(records[1], IncidentRecord::default());
        assert_eq!(records[2].year, Some(2020));
        assert_eq!(records[2].age, None);
    }

    #[test]
    fn accepts_bare_feature_array() {
        let json = serde_json::json!([{ "properties": { "YEAR": 2021 } }]);
        let records = parse_document(&json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, Some(2021));
    }

    #[test]
    fn rejects_document_without_features() {
        let json = serde_json::json!({ "type": "FeatureCollection" });
        assert!(matches!(
            parse_document(&json),
            Err(IngestError::Document { .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            load_reader("{ not json".as_bytes()),
            Err(IngestError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_path(Path::new("/nonexistent/crash-stats/features.json"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
