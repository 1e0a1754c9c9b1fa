//! Per-record derivations needed before counting.
//!
//! Place names in the source data use a sentinel (`NOT APPLICABLE`) for
//! crashes outside any city or county; those values are excluded from
//! place aggregates entirely rather than counted as a category of their
//! own.

use crash_stats_crash_models::{AgeBucket, IncidentRecord};
use serde::{Deserialize, Serialize};

/// Sentinel marking a place field as "not applicable".
pub const NOT_APPLICABLE: &str = "NOT APPLICABLE";

/// Settings that control how records are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct NormalizerConfig {
    /// Substrings that exclude a city or county value from place
    /// aggregates. Matching is case-sensitive.
    pub place_sentinels: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            place_sentinels: vec![NOT_APPLICABLE.to_string()],
        }
    }
}

impl NormalizerConfig {
    /// Whether a place value should be counted in place aggregates.
    ///
    /// Absent and empty values are excluded, as is anything containing one
    /// of the configured sentinels.
    #[must_use]
    pub fn include_place(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| {
            !v.trim().is_empty() && !self.place_sentinels.iter().any(|s| v.contains(s.as_str()))
        })
    }
}

/// Fields derived from one [`IncidentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRecord<'a> {
    /// Bucket for the record's age, [`AgeBucket::Unknown`] when absent.
    pub age_bucket: AgeBucket,
    /// Whether the city counts toward city aggregates.
    pub include_city: bool,
    /// Whether the county counts toward county aggregates.
    pub include_county: bool,
    /// County name with any code suffix removed. `None` when the county is
    /// excluded from place aggregates.
    pub county: Option<&'a str>,
}

/// Strips a trailing code suffix from a county label, e.g. `"COOK (31)"`
/// becomes `"COOK"`. Only the last parenthesized group is removed, and only
/// when it ends the label.
#[must_use]
pub fn canonical_county(name: &str) -> &str {
    name.strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .map_or(name, |(county, _)| county)
}

/// Derives the age bucket and place inclusion flags for a record.
#[must_use]
pub fn normalize<'a>(record: &'a IncidentRecord, config: &NormalizerConfig) -> NormalizedRecord<'a> {
    let include_city = config.include_place(record.city.as_deref());
    let include_county = config.include_place(record.county.as_deref());

    NormalizedRecord {
        age_bucket: AgeBucket::from_age(record.age),
        include_city,
        include_county,
        county: record
            .county
            .as_deref()
            .filter(|_| include_county)
            .map(|county| canonical_county(county.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: Option<&str>, county: Option<&str>, age: Option<i32>) -> IncidentRecord {
        IncidentRecord {
            city: city.map(str::to_string),
            county: county.map(str::to_string),
            age,
            ..IncidentRecord::default()
        }
    }

    #[test]
    fn excludes_not_applicable_places() {
        let config = NormalizerConfig::default();
        let r = record(Some("NOT APPLICABLE"), Some("NOT APPLICABLE (0)"), Some(30));
        let n = normalize(&r, &config);
        assert!(!n.include_city);
        assert!(!n.include_county);
        assert_eq!(n.county, None);
        assert_eq!(n.age_bucket, AgeBucket::Age25To34);
    }

    #[test]
    fn sentinel_match_is_substring_and_case_sensitive() {
        let config = NormalizerConfig::default();
        assert!(!config.include_place(Some("CITY NOT APPLICABLE")));
        assert!(config.include_place(Some("Not Applicable")));
        assert!(config.include_place(Some("Springfield")));
    }

    #[test]
    fn excludes_missing_and_blank_places() {
        let config = NormalizerConfig::default();
        assert!(!config.include_place(None));
        assert!(!config.include_place(Some("")));
        assert!(!config.include_place(Some("   ")));
    }

    #[test]
    fn custom_sentinels() {
        let config = NormalizerConfig {
            place_sentinels: vec!["Unknown".to_string(), "Not Reported".to_string()],
        };
        assert!(!config.include_place(Some("Unknown")));
        assert!(!config.include_place(Some("Not Reported")));
        assert!(config.include_place(Some("NOT APPLICABLE")));
    }

    #[test]
    fn strips_county_codes() {
        assert_eq!(canonical_county("COOK (31)"), "COOK");
        assert_eq!(canonical_county("LOS ANGELES (37)"), "LOS ANGELES");
        assert_eq!(canonical_county("KING"), "KING");

        let r = record(None, Some("COOK (31)"), None);
        let n = normalize(&r, &NormalizerConfig::default());
        assert_eq!(n.county, Some("COOK"));
        assert!(!n.include_city);
        assert_eq!(n.age_bucket, AgeBucket::Unknown);
    }

    #[test]
    fn only_trailing_county_code_is_stripped() {
        assert_eq!(canonical_county("ST. MARY (PARISH) (97)"), "ST. MARY (PARISH)");
        assert_eq!(canonical_county("DE KALB (EAST) COUNTY"), "DE KALB (EAST) COUNTY");
        assert_eq!(canonical_county("COOK (31"), "COOK (31");
    }

    #[test]
    fn sixteen_is_not_under_sixteen() {
        let r = record(None, None, Some(16));
        let n = normalize(&r, &NormalizerConfig::default());
        assert_eq!(n.age_bucket, AgeBucket::Age16To24);
    }
}
