//! Lenient extraction of FARS feature properties.
//!
//! Source documents are loosely typed: numbers sometimes arrive as strings
//! and fields are sometimes missing or `null`. Each accessor returns `None`
//! for anything it cannot interpret instead of failing the document.

use crash_stats_crash_models::IncidentRecord;
use serde_json::Value;

/// Property names in FARS pedestrian/bicyclist feature documents.
pub mod names {
    pub const CRASH_NUM: &str = "CRASH_NUM1";
    pub const ST_CASE: &str = "ST_CASE";
    pub const YEAR: &str = "YEAR";
    pub const STATE: &str = "STATENAME";
    pub const CITY: &str = "CITYNAME";
    pub const COUNTY: &str = "COUNTYNAME";
    pub const MONTH: &str = "MONTHNAME";
    pub const DAY_OF_WEEK: &str = "DAY_WEEKNAME";
    pub const HOUR: &str = "HOURNAME";
    pub const GENDER: &str = "PBSEXNAME";
    pub const PERSON_TYPE: &str = "PBPTYPENAME";
    pub const AGE: &str = "PBAGE";
    pub const WEATHER: &str = "WEATHERNAME";
    pub const LIGHT_CONDITION: &str = "LGT_CONDNAME";
    pub const ROAD_TYPE: &str = "FUNC_SYSNAME";
    pub const RURAL_URBAN: &str = "RUR_URBNAME";
}

/// Reads a non-empty string property. Numbers are rendered as strings.
#[must_use]
pub fn text(props: &Value, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an integer property, accepting numeric strings.
#[must_use]
pub fn integer(props: &Value, key: &str) -> Option<i64> {
    match props.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Builds the crash identity. `CRASH_NUM1` is preferred; without it the
/// year and `ST_CASE` together identify the crash.
fn incident_id(props: &Value) -> Option<String> {
    text(props, names::CRASH_NUM).or_else(|| {
        let case = integer(props, names::ST_CASE)?;
        let year = integer(props, names::YEAR)?;
        Some(format!("{year}-{case}"))
    })
}

/// Maps one feature's `properties` object to an [`IncidentRecord`].
#[must_use]
pub fn record_from_properties(props: &Value) -> IncidentRecord {
    IncidentRecord {
        incident_id: incident_id(props),
        year: integer(props, names::YEAR).and_then(|y| u16::try_from(y).ok()),
        state: text(props, names::STATE),
        city: text(props, names::CITY),
        county: text(props, names::COUNTY),
        month: text(props, names::MONTH),
        day_of_week: text(props, names::DAY_OF_WEEK),
        hour_label: text(props, names::HOUR),
        gender: text(props, names::GENDER),
        person_type: text(props, names::PERSON_TYPE),
        weather: text(props, names::WEATHER),
        light_condition: text(props, names::LIGHT_CONDITION),
        road_type: text(props, names::ROAD_TYPE),
        rural_urban: text(props, names::RURAL_URBAN),
        age: integer(props, names::AGE).and_then(|a| i32::try_from(a).ok()),
    }
}
