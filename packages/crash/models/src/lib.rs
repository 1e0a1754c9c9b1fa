#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash incident record types and the categorical dimensions they are
//! counted under.
//!
//! One [`IncidentRecord`] exists per person involved in a crash, so several
//! records can share an `incident_id`. Every categorical field is optional
//! because source documents are not guaranteed to carry all of them; the
//! aggregation engine skips a missing field for that one dimension only.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single person-level row of the crash dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Crash identity shared by every person involved in the same crash.
    pub incident_id: Option<String>,
    /// Reporting year.
    pub year: Option<u16>,
    /// State name (e.g. "California").
    pub state: Option<String>,
    /// City name. May carry a "not applicable" sentinel.
    pub city: Option<String>,
    /// County name, possibly suffixed with a county code (e.g. "COOK (31)").
    pub county: Option<String>,
    /// Full month name (e.g. "January").
    pub month: Option<String>,
    /// Full day-of-week name (e.g. "Sunday").
    pub day_of_week: Option<String>,
    /// Hour range label (e.g. "4:00pm-4:59pm").
    pub hour_label: Option<String>,
    /// Gender label of the involved person.
    pub gender: Option<String>,
    /// Person type label (pedestrian, bicyclist, ...).
    pub person_type: Option<String>,
    /// Weather condition label.
    pub weather: Option<String>,
    /// Light condition label.
    pub light_condition: Option<String>,
    /// Functional road system label.
    pub road_type: Option<String>,
    /// Rural/urban classification label.
    pub rural_urban: Option<String>,
    /// Age of the involved person, if reported.
    pub age: Option<i32>,
}

/// Demographic age range derived from a record's numeric age.
///
/// Ranges are half-open: `Age16To24` covers `[16, 25)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeBucket {
    /// Younger than 16
    #[serde(rename = "Under 16")]
    #[strum(serialize = "Under 16")]
    Under16,
    /// 16 through 24
    #[serde(rename = "16-24")]
    #[strum(serialize = "16-24")]
    Age16To24,
    /// 25 through 34
    #[serde(rename = "25-34")]
    #[strum(serialize = "25-34")]
    Age25To34,
    /// 35 through 44
    #[serde(rename = "35-44")]
    #[strum(serialize = "35-44")]
    Age35To44,
    /// 45 through 54
    #[serde(rename = "45-54")]
    #[strum(serialize = "45-54")]
    Age45To54,
    /// 55 through 64
    #[serde(rename = "55-64")]
    #[strum(serialize = "55-64")]
    Age55To64,
    /// 65 through 74
    #[serde(rename = "65-74")]
    #[strum(serialize = "65-74")]
    Age65To74,
    /// 75 and older
    #[serde(rename = "75+")]
    #[strum(serialize = "75+")]
    Age75Plus,
    /// Age not reported
    Unknown,
}

impl AgeBucket {
    /// Buckets an optional age. A missing age is [`Self::Unknown`]; any
    /// present value, including negative ones, lands in the range it
    /// numerically satisfies.
    #[must_use]
    pub const fn from_age(age: Option<i32>) -> Self {
        match age {
            None => Self::Unknown,
            Some(a) if a < 16 => Self::Under16,
            Some(a) if a < 25 => Self::Age16To24,
            Some(a) if a < 35 => Self::Age25To34,
            Some(a) if a < 45 => Self::Age35To44,
            Some(a) if a < 55 => Self::Age45To54,
            Some(a) if a < 65 => Self::Age55To64,
            Some(a) if a < 75 => Self::Age65To74,
            Some(_) => Self::Age75Plus,
        }
    }

    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Under16,
            Self::Age16To24,
            Self::Age25To34,
            Self::Age35To44,
            Self::Age45To54,
            Self::Age55To64,
            Self::Age65To74,
            Self::Age75Plus,
            Self::Unknown,
        ]
    }
}

/// A field of [`IncidentRecord`] that the aggregation engine counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    IncidentId,
    Year,
    State,
    City,
    County,
    Month,
    DayOfWeek,
    HourLabel,
    Gender,
    PersonType,
    Weather,
    LightCondition,
    RoadType,
    RuralUrban,
}

impl Dimension {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IncidentId,
            Self::Year,
            Self::State,
            Self::City,
            Self::County,
            Self::Month,
            Self::DayOfWeek,
            Self::HourLabel,
            Self::Gender,
            Self::PersonType,
            Self::Weather,
            Self::LightCondition,
            Self::RoadType,
            Self::RuralUrban,
        ]
    }

    /// Whether this dimension names a place and is subject to sentinel
    /// filtering.
    #[must_use]
    pub const fn is_place(self) -> bool {
        matches!(self, Self::City | Self::County)
    }
}
