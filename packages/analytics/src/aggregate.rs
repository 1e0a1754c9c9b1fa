//! Single-pass aggregation of incident records into an
//! [`AggregateSnapshot`].
//!
//! Counting is commutative, so an [`Aggregator`] can be fed records in any
//! order, and partial aggregators built over disjoint partitions can be
//! [merged](Aggregator::merge) into the same result a single pass would
//! produce.

use crash_stats_analytics_models::{AggregateSnapshot, FrequencyTable};
use crash_stats_crash_models::{Dimension, IncidentRecord};

use crate::normalize::{NormalizerConfig, normalize};

/// Aggregates `records` with the default normalizer settings.
#[must_use]
pub fn aggregate<'a, I>(records: I) -> AggregateSnapshot
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    aggregate_with(records, &NormalizerConfig::default())
}

/// Aggregates `records` with custom normalizer settings.
#[must_use]
pub fn aggregate_with<'a, I>(records: I, config: &NormalizerConfig) -> AggregateSnapshot
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut aggregator = Aggregator::new(config.clone());
    aggregator.extend(records);
    aggregator.finish()
}

/// Incremental accumulator behind [`aggregate`].
///
/// The snapshot under construction is only handed out by
/// [`finish`](Self::finish), so callers never observe a partially built
/// one.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: NormalizerConfig,
    snapshot: AggregateSnapshot,
}

/// Returns the trimmed value of a text field, treating an empty or
/// whitespace-only string as absent.
fn text(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).map(str::trim).filter(|v| !v.is_empty())
}

/// Counts `value` under `table`, or records the dimension as missing.
fn tally<K: Ord>(
    table: &mut FrequencyTable<K>,
    missing: &mut FrequencyTable<Dimension>,
    dimension: Dimension,
    value: Option<K>,
) {
    if let Some(value) = value {
        table.increment(value);
    } else {
        log::debug!("Record has no usable {dimension}, skipping that dimension");
        missing.increment(dimension);
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            snapshot: AggregateSnapshot::default(),
        }
    }

    /// Number of records absorbed so far.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.snapshot.total_records
    }

    /// Counts one record into every table it contributes to.
    pub fn push(&mut self, record: &IncidentRecord) {
        let normalized = normalize(record, &self.config);
        let s = &mut self.snapshot;
        let missing = &mut s.missing;

        let incident_id = text(record.incident_id.as_ref());
        let state = text(record.state.as_ref());
        let month = text(record.month.as_ref());
        let weather = text(record.weather.as_ref());
        let light = text(record.light_condition.as_ref());
        let city = text(record.city.as_ref()).filter(|_| normalized.include_city);

        if let Some(id) = incident_id {
            if !s.unique_incidents.contains(id) {
                s.unique_incidents.insert(id.to_string());
            }
        } else {
            log::debug!("Record has no incident id, skipping identity");
            missing.increment(Dimension::IncidentId);
        }

        tally(&mut s.by_year, missing, Dimension::Year, record.year);
        tally(&mut s.by_state, missing, Dimension::State, state.map(str::to_string));
        tally(&mut s.by_month, missing, Dimension::Month, month.map(str::to_string));
        tally(
            &mut s.by_day_of_week,
            missing,
            Dimension::DayOfWeek,
            text(record.day_of_week.as_ref()).map(str::to_string),
        );
        tally(
            &mut s.by_hour,
            missing,
            Dimension::HourLabel,
            text(record.hour_label.as_ref()).map(str::to_string),
        );
        tally(
            &mut s.by_gender,
            missing,
            Dimension::Gender,
            text(record.gender.as_ref()).map(str::to_string),
        );
        s.by_age.increment(normalized.age_bucket);
        tally(&mut s.by_weather, missing, Dimension::Weather, weather.map(str::to_string));
        tally(
            &mut s.by_light_condition,
            missing,
            Dimension::LightCondition,
            light.map(str::to_string),
        );
        tally(
            &mut s.by_road_type,
            missing,
            Dimension::RoadType,
            text(record.road_type.as_ref()).map(str::to_string),
        );
        tally(
            &mut s.by_person_type,
            missing,
            Dimension::PersonType,
            text(record.person_type.as_ref()).map(str::to_string),
        );
        tally(
            &mut s.by_rural_urban,
            missing,
            Dimension::RuralUrban,
            text(record.rural_urban.as_ref()).map(str::to_string),
        );
        tally(&mut s.by_city, missing, Dimension::City, city.map(str::to_string));
        tally(
            &mut s.by_county,
            missing,
            Dimension::County,
            normalized.county.map(str::to_string),
        );

        if let (Some(month), Some(weather)) = (month, weather) {
            s.weather_by_month
                .increment(month.to_string(), weather.to_string());
        }
        if let (Some(year), Some(month)) = (record.year, month) {
            s.month_by_year.increment(year, month.to_string());
        }
        if let (Some(state), Some(year)) = (state, record.year) {
            s.year_by_state.increment(state.to_string(), year);
        }
        if let (Some(city), Some(year)) = (city, record.year) {
            s.year_by_city.increment(city.to_string(), year);
        }
        if let (Some(weather), Some(light)) = (weather, light) {
            s.light_by_weather
                .increment(weather.to_string(), light.to_string());
        }

        s.total_records += 1;
    }

    /// Folds another accumulator's counts into this one.
    ///
    /// Tables add pointwise and the incident identity sets are unioned, so
    /// merging aggregators built over disjoint partitions of a collection
    /// equals aggregating the whole collection at once. Both accumulators
    /// must share the same [`NormalizerConfig`].
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the two accumulators were built with
    /// different normalizer settings.
    pub fn merge(&mut self, other: Self) {
        debug_assert_eq!(
            self.config, other.config,
            "cannot merge aggregators with different normalizer settings"
        );
        if self.config != other.config {
            log::warn!("Merging aggregators built with different normalizer settings");
        }
        merge_snapshot(&mut self.snapshot, other.snapshot);
    }

    /// Completes aggregation and returns the snapshot.
    #[must_use]
    pub fn finish(self) -> AggregateSnapshot {
        let snapshot = self.snapshot;

        for (dimension, count) in snapshot.missing.iter() {
            if dimension.is_place() {
                log::debug!("{count} record(s) excluded from {dimension} aggregates");
            } else {
                log::warn!("{count} record(s) had no usable {dimension} and were not counted for it");
            }
        }
        log::debug!(
            "Aggregated {} record(s) from {} distinct incident(s)",
            snapshot.total_records,
            snapshot.distinct_incidents(),
        );

        snapshot
    }
}

impl<'a> Extend<&'a IncidentRecord> for Aggregator {
    fn extend<T: IntoIterator<Item = &'a IncidentRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

fn merge_snapshot(into: &mut AggregateSnapshot, from: AggregateSnapshot) {
    let AggregateSnapshot {
        unique_incidents,
        total_records,
        by_year,
        by_state,
        by_month,
        by_day_of_week,
        by_hour,
        by_gender,
        by_age,
        by_weather,
        by_light_condition,
        by_road_type,
        by_person_type,
        by_rural_urban,
        by_city,
        by_county,
        weather_by_month,
        month_by_year,
        year_by_state,
        year_by_city,
        light_by_weather,
        missing,
    } = from;

    into.unique_incidents.extend(unique_incidents);
    into.total_records += total_records;
    into.by_year.merge(by_year);
    into.by_state.merge(by_state);
    into.by_month.merge(by_month);
    into.by_day_of_week.merge(by_day_of_week);
    into.by_hour.merge(by_hour);
    into.by_gender.merge(by_gender);
    into.by_age.merge(by_age);
    into.by_weather.merge(by_weather);
    into.by_light_condition.merge(by_light_condition);
    into.by_road_type.merge(by_road_type);
    into.by_person_type.merge(by_person_type);
    into.by_rural_urban.merge(by_rural_urban);
    into.by_city.merge(by_city);
    into.by_county.merge(by_county);
    into.weather_by_month.merge(weather_by_month);
    into.month_by_year.merge(month_by_year);
    into.year_by_state.merge(year_by_state);
    into.year_by_city.merge(year_by_city);
    into.light_by_weather.merge(light_by_weather);
    into.missing.merge(missing);
}

#[cfg(test)]
mod tests {
    use crash_stats_crash_models::AgeBucket;

    use super::*;

    #[allow(clippy::too_many_arguments)]
    fn person(
        id: &str,
        year: u16,
        state: &str,
        city: &str,
        month: &str,
        weather: &str,
        light: &str,
        age: Option<i32>,
    ) -> IncidentRecord {
        IncidentRecord {
            incident_id: Some(id.to_string()),
            year: Some(year),
            state: Some(state.to_string()),
            city: Some(city.to_string()),
            county: Some(format!("{city} COUNTY (1)")),
            month: Some(month.to_string()),
            day_of_week: Some("Friday".to_string()),
            hour_label: Some("6:00pm-6:59pm".to_string()),
            gender: Some("Male".to_string()),
            person_type: Some("Pedestrian".to_string()),
            weather: Some(weather.to_string()),
            light_condition: Some(light.to_string()),
            road_type: Some("Local".to_string()),
            rural_urban: Some("Urban".to_string()),
            age,
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            person("A", 2020, "Illinois", "Springfield", "January", "Rain", "Dark - Lighted", Some(15)),
            person("A", 2020, "Illinois", "Springfield", "January", "Rain", "Dark - Lighted", Some(16)),
            person("B", 2021, "Ohio", "NOT APPLICABLE", "March", "Clear", "Daylight", Some(75)),
            person("C", 2021, "Ohio", "Columbus", "March", "Clear", "Daylight", None),
            person("D", 2022, "Illinois", "Chicago", "July", "Cloudy", "Daylight", Some(40)),
            person("E", 2022, "Ohio", "Columbus", "December", "Snow", "Dark - Not Lighted", Some(60)),
        ]
    }

    #[test]
    fn three_record_scenario() {
        let records = vec![
            IncidentRecord {
                incident_id: Some("A".to_string()),
                year: Some(2020),
                city: Some("Springfield".to_string()),
                weather: Some("Rain".to_string()),
                ..IncidentRecord::default()
            },
            IncidentRecord {
                incident_id: Some("A".to_string()),
                year: Some(2020),
                city: Some("Springfield".to_string()),
                weather: Some("Rain".to_string()),
                ..IncidentRecord::default()
            },
            IncidentRecord {
                incident_id: Some("B".to_string()),
                year: Some(2021),
                city: Some("NOT APPLICABLE".to_string()),
                weather: Some("Clear".to_string()),
                ..IncidentRecord::default()
            },
        ];

        let snapshot = aggregate(&records);
        assert_eq!(snapshot.total_records, 3);
        assert_eq!(snapshot.distinct_incidents(), 2);
        assert_eq!(
            snapshot.by_year,
            [(2020, 2), (2021, 1)].into_iter().collect::<FrequencyTable<u16>>()
        );
        assert_eq!(
            snapshot.by_city,
            [("Springfield".to_string(), 2)]
                .into_iter()
                .collect::<FrequencyTable<String>>()
        );
        assert_eq!(
            snapshot.by_weather,
            [("Rain".to_string(), 2), ("Clear".to_string(), 1)]
                .into_iter()
                .collect::<FrequencyTable<String>>()
        );
        assert!(snapshot.weather_by_month.is_empty());
        assert_eq!(snapshot.missing.get(&Dimension::Month), 3);
        assert_eq!(snapshot.missing.get(&Dimension::City), 1);
    }

    #[test]
    fn empty_input_is_an_empty_snapshot() {
        let snapshot = aggregate(&Vec::<IncidentRecord>::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.distinct_incidents(), 0);
        assert!(snapshot.by_year.is_empty());
        assert!(snapshot.by_age.is_empty());
        assert!(snapshot.missing.is_empty());
    }

    #[test]
    fn shared_incident_id_counts_once() {
        let mut aggregator = Aggregator::default();
        aggregator.push(&person("X", 2020, "Utah", "Provo", "May", "Clear", "Daylight", None));
        let before = aggregator.clone().finish();

        aggregator.push(&person("Y", 2020, "Utah", "Provo", "May", "Clear", "Daylight", None));
        aggregator.push(&person("Y", 2020, "Utah", "Provo", "May", "Clear", "Daylight", None));
        let after = aggregator.finish();

        assert_eq!(after.distinct_incidents(), before.distinct_incidents() + 1);
        assert_eq!(after.total_records, before.total_records + 2);
    }

    #[test]
    fn one_key_tables_sum_to_total() {
        let snapshot = aggregate(&sample());
        let total = snapshot.total_records;
        assert_eq!(total, 6);
        assert_eq!(snapshot.by_year.total(), total);
        assert_eq!(snapshot.by_state.total(), total);
        assert_eq!(snapshot.by_month.total(), total);
        assert_eq!(snapshot.by_day_of_week.total(), total);
        assert_eq!(snapshot.by_hour.total(), total);
        assert_eq!(snapshot.by_gender.total(), total);
        assert_eq!(snapshot.by_age.total(), total);
        assert_eq!(snapshot.by_weather.total(), total);
        assert_eq!(snapshot.by_light_condition.total(), total);
        assert_eq!(snapshot.by_road_type.total(), total);
        assert_eq!(snapshot.by_person_type.total(), total);
        assert_eq!(snapshot.by_rural_urban.total(), total);
        assert_eq!(snapshot.by_city.total(), total - 1);
        assert_eq!(snapshot.by_county.total(), total - 1);
    }

    #[test]
    fn correlation_rows_match_one_key_tables() {
        let snapshot = aggregate(&sample());

        for (year, count) in snapshot.by_year.iter() {
            let row = snapshot.month_by_year.slice(year).map_or(0, FrequencyTable::total);
            assert_eq!(row, count, "year {year}");
        }
        for (state, count) in snapshot.by_state.iter() {
            let row = snapshot.year_by_state.slice(state).map_or(0, FrequencyTable::total);
            assert_eq!(row, count, "state {state}");
        }
        for (city, count) in snapshot.by_city.iter() {
            let row = snapshot.year_by_city.slice(city).map_or(0, FrequencyTable::total);
            assert_eq!(row, count, "city {city}");
        }
        for (month, count) in snapshot.by_month.iter() {
            let row = snapshot.weather_by_month.slice(month).map_or(0, FrequencyTable::total);
            assert_eq!(row, count, "month {month}");
        }
        for (weather, count) in snapshot.by_weather.iter() {
            let row = snapshot.light_by_weather.slice(weather).map_or(0, FrequencyTable::total);
            assert_eq!(row, count, "weather {weather}");
        }
    }

    #[test]
    fn not_applicable_city_only_leaves_place_tables() {
        let snapshot = aggregate(&sample());
        assert!(!snapshot.by_city.contains("NOT APPLICABLE"));
        assert!(snapshot.year_by_city.slice("NOT APPLICABLE").is_none());
        assert_eq!(snapshot.by_weather.get("Clear"), 2);
        assert_eq!(snapshot.year_by_state.get("Ohio", &2021), 2);
        assert_eq!(snapshot.missing.get(&Dimension::City), 1);
    }

    #[test]
    fn ages_and_counties_are_normalized() {
        let snapshot = aggregate(&sample());
        assert_eq!(snapshot.by_age.get(&AgeBucket::Under16), 1);
        assert_eq!(snapshot.by_age.get(&AgeBucket::Age16To24), 1);
        assert_eq!(snapshot.by_age.get(&AgeBucket::Age75Plus), 1);
        assert_eq!(snapshot.by_age.get(&AgeBucket::Unknown), 1);
        assert_eq!(snapshot.by_county.get("Columbus COUNTY"), 2);
        assert!(!snapshot.by_county.contains("Columbus COUNTY (1)"));
    }

    #[test]
    fn missing_field_skips_only_that_dimension() {
        let mut broken = person("Z", 2022, "Ohio", "Dayton", "June", "Rain", "Dusk", Some(30));
        broken.weather = None;
        broken.hour_label = Some(String::new());

        let snapshot = aggregate(std::slice::from_ref(&broken));
        assert_eq!(snapshot.total_records, 1);
        assert!(snapshot.by_weather.is_empty());
        assert!(snapshot.by_hour.is_empty());
        assert!(snapshot.weather_by_month.is_empty());
        assert!(snapshot.light_by_weather.is_empty());
        assert_eq!(snapshot.by_light_condition.get("Dusk"), 1);
        assert_eq!(snapshot.by_year.get(&2022), 1);
        assert_eq!(snapshot.missing.get(&Dimension::Weather), 1);
        assert_eq!(snapshot.missing.get(&Dimension::HourLabel), 1);
        assert_eq!(
            snapshot.by_weather.total() + snapshot.missing.get(&Dimension::Weather),
            snapshot.total_records
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(aggregate(&records), aggregate(&reversed));
    }

    #[test]
    fn merged_partitions_equal_whole() {
        let records = sample();
        let whole = aggregate(&records);

        for split in 0..=records.len() {
            let (left, right) = records.split_at(split);
            let mut a = Aggregator::default();
            a.extend(left);
            let mut b = Aggregator::default();
            b.extend(right);
            a.merge(b);
            assert_eq!(a.finish(), whole, "split at {split}");
        }
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let mut record = person("W", 2022, "Ohio", "Dayton", "June", "Rain", "Dusk", Some(30));
        record.state = Some("   ".to_string());
        record.weather = Some("\t".to_string());
        record.city = Some(" ".to_string());
        record.month = Some(" June ".to_string());

        let other = person("V", 2022, "Ohio", "Dayton", "June", "Rain", "Dusk", Some(30));
        let snapshot = aggregate(&[record, other]);

        assert_eq!(
            snapshot.by_state,
            [("Ohio".to_string(), 1)]
                .into_iter()
                .collect::<FrequencyTable<String>>()
        );
        assert_eq!(snapshot.missing.get(&Dimension::State), 1);
        assert_eq!(snapshot.missing.get(&Dimension::Weather), 1);
        assert_eq!(snapshot.missing.get(&Dimension::City), 1);
        assert_eq!(snapshot.by_city.get("Dayton"), 1);
        assert_eq!(snapshot.by_month.get("June"), 2);
        assert_eq!(snapshot.year_by_state.get("Ohio", &2022), 1);
        assert!(snapshot.year_by_state.slice("   ").is_none());
    }

    #[test]
    fn missing_incident_id_still_counts_the_record() {
        let mut anonymous = person("", 2021, "Ohio", "Akron", "May", "Clear", "Daylight", Some(50));
        anonymous.incident_id = None;
        let mut blank = anonymous.clone();
        blank.incident_id = Some("  ".to_string());
        let named = person("K", 2021, "Ohio", "Akron", "May", "Clear", "Daylight", Some(50));

        let snapshot = aggregate(&[anonymous, blank, named]);
        assert_eq!(snapshot.total_records, 3);
        assert_eq!(snapshot.distinct_incidents(), 1);
        assert!(snapshot.unique_incidents.contains("K"));
        assert_eq!(snapshot.missing.get(&Dimension::IncidentId), 2);
        assert_eq!(snapshot.by_year.get(&2021), 3);
        assert_eq!(snapshot.by_city.get("Akron"), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different normalizer settings")]
    fn merging_different_configs_is_rejected() {
        let mut a = Aggregator::default();
        let b = Aggregator::new(NormalizerConfig {
            place_sentinels: vec!["Chicago".to_string()],
        });
        a.merge(b);
    }

    #[test]
    fn custom_sentinels_filter_places() {
        let config = NormalizerConfig {
            place_sentinels: vec!["Chicago".to_string()],
        };
        let snapshot = aggregate_with(&sample(), &config);
        assert!(!snapshot.by_city.contains("Chicago"));
        assert_eq!(snapshot.by_city.get("NOT APPLICABLE"), 1);
    }
}
