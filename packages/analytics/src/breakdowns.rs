//! Secondary dashboard breakdowns: vehicle types, weekday/hour patterns,
//! per-borough totals and severity.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Timelike as _, Weekday};
use collision_map_analytics_models::{
    BoroughHourCount, BoroughSummary, CategoryCount, ReportSummary, WeekdayHourCount,
    WeekdaySeverity,
};
use collision_map_collision_models::NormalizedRecord;
use indexmap::IndexMap;

use crate::aggregators::top_counts;

/// Weekdays in display order, indexed by `num_days_from_monday`.
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Most frequent contributing factors across every vehicle in a collision.
#[must_use]
pub fn all_vehicle_factors(
    records: &[NormalizedRecord],
    sentinel: &str,
    limit: usize,
) -> Vec<CategoryCount> {
    top_counts(
        records
            .iter()
            .flat_map(NormalizedRecord::all_factors)
            .filter(|factor| *factor != sentinel),
        limit,
    )
}

/// Most frequent vehicle type codes.
#[must_use]
pub fn vehicle_types(records: &[NormalizedRecord], limit: usize) -> Vec<CategoryCount> {
    top_counts(
        records
            .iter()
            .flat_map(|r| r.vehicle_types.iter().map(String::as_str)),
        limit,
    )
}

/// Collisions per (weekday, hour), Monday first. Only observed cells are
/// returned.
#[must_use]
pub fn weekday_hour_matrix(records: &[NormalizedRecord]) -> Vec<WeekdayHourCount> {
    let mut cells: BTreeMap<(usize, u32), u64> = BTreeMap::new();
    for crash_at in records.iter().filter_map(NormalizedRecord::crash_at) {
        let day = crash_at.weekday().num_days_from_monday() as usize;
        *cells.entry((day, crash_at.hour())).or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((day, hour), count)| WeekdayHourCount {
            weekday: WEEKDAYS[day],
            hour,
            count,
        })
        .collect()
}

/// Collision, injury and fatality totals per borough in first-seen order.
#[must_use]
pub fn borough_summary(records: &[NormalizedRecord]) -> Vec<BoroughSummary> {
    let mut boroughs: IndexMap<&str, BoroughSummary> = IndexMap::new();
    for record in records {
        let Some(borough) = record.borough.as_deref() else {
            continue;
        };
        let entry = boroughs.entry(borough).or_insert_with(|| BoroughSummary {
            borough: borough.to_string(),
            collisions: 0,
            persons_injured: 0,
            persons_killed: 0,
        });
        entry.collisions += 1;
        entry.persons_injured += u64::from(record.persons_injured);
        entry.persons_killed += u64::from(record.persons_killed);
    }
    boroughs.into_values().collect()
}

/// Collisions per (borough, hour). Boroughs appear in first-seen order and
/// hours ascend within each borough.
#[must_use]
pub fn hourly_by_borough(records: &[NormalizedRecord]) -> Vec<BoroughHourCount> {
    let mut boroughs: IndexMap<&str, BTreeMap<u32, u64>> = IndexMap::new();
    for record in records {
        let (Some(borough), Some(crash_at)) = (record.borough.as_deref(), record.crash_at())
        else {
            continue;
        };
        *boroughs
            .entry(borough)
            .or_default()
            .entry(crash_at.hour())
            .or_default() += 1;
    }
    boroughs
        .into_iter()
        .flat_map(|(borough, hours)| {
            hours.into_iter().map(move |(hour, count)| BoroughHourCount {
                borough: borough.to_string(),
                hour,
                count,
            })
        })
        .collect()
}

/// Mean of persons injured plus killed per collision, for each weekday that
/// has at least one collision with a valid timestamp.
#[must_use]
pub fn severity_by_weekday(records: &[NormalizedRecord]) -> Vec<WeekdaySeverity> {
    let mut totals = [(0_u64, 0_u64); 7];
    for record in records {
        let Some(crash_at) = record.crash_at() else {
            continue;
        };
        let slot = &mut totals[crash_at.weekday().num_days_from_monday() as usize];
        slot.0 += record.severity();
        slot.1 += 1;
    }
    WEEKDAYS
        .iter()
        .zip(totals)
        .filter(|(_, (_, collisions))| *collisions > 0)
        .map(|(&weekday, (severity, collisions))| {
            #[allow(clippy::cast_precision_loss)]
            let average_severity = severity as f64 / collisions as f64;
            WeekdaySeverity {
                weekday,
                average_severity,
                collisions,
            }
        })
        .collect()
}

/// Dataset-wide record counts and casualty totals.
#[must_use]
pub fn summarize(records: &[NormalizedRecord]) -> ReportSummary {
    records
        .iter()
        .fold(ReportSummary::default(), |mut summary, record| {
            summary.total_records += 1;
            summary.valid_timestamps += u64::from(record.crash_at.is_valid());
            summary.geolocated += u64::from(record.coordinates().is_some());
            summary.with_borough += u64::from(record.borough.is_some());
            summary.persons_injured += u64::from(record.persons_injured);
            summary.persons_killed += u64::from(record.persons_killed);
            summary
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use collision_map_collision_models::FieldValue;

    use super::*;

    fn crash(s: &str, borough: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            crash_at: FieldValue::Valid(
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap(),
            ),
            borough: borough.map(String::from),
            ..NormalizedRecord::default()
        }
    }

    #[test]
    fn all_vehicle_factors_counts_every_column() {
        let records = vec![
            NormalizedRecord {
                contributing_factor: Some("Unsafe Speed".to_string()),
                additional_factors: vec!["Unsafe Speed".to_string(), "Unspecified".to_string()],
                ..NormalizedRecord::default()
            },
            NormalizedRecord {
                additional_factors: vec!["Driver Inexperience".to_string()],
                ..NormalizedRecord::default()
            },
        ];
        let factors = all_vehicle_factors(&records, "Unspecified", 20);
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].category, "Unsafe Speed");
        assert_eq!(factors[0].count, 2);
        assert_eq!(factors[1].category, "Driver Inexperience");
    }

    #[test]
    fn vehicle_types_top_n() {
        let records = vec![
            NormalizedRecord {
                vehicle_types: vec!["Sedan".to_string(), "Bike".to_string()],
                ..NormalizedRecord::default()
            },
            NormalizedRecord {
                vehicle_types: vec!["Sedan".to_string()],
                ..NormalizedRecord::default()
            },
        ];
        let types = vehicle_types(&records, 1);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].category, "Sedan");
        assert_eq!(types[0].count, 2);
    }

    #[test]
    fn weekday_hour_matrix_starts_monday() {
        // 2021-09-11 is a Saturday, 2021-09-13 a Monday.
        let records = vec![
            crash("2021-09-11 02:39", None),
            crash("2021-09-13 08:15", None),
            crash("2021-09-13 08:45", None),
            NormalizedRecord::default(),
        ];
        let cells = weekday_hour_matrix(&records);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].weekday, Weekday::Mon);
        assert_eq!(cells[0].hour, 8);
        assert_eq!(cells[0].count, 2);
        assert_eq!(cells[1].weekday, Weekday::Sat);
    }

    #[test]
    fn borough_summary_sums_casualties() {
        let records = vec![
            NormalizedRecord {
                borough: Some("BROOKLYN".to_string()),
                persons_injured: 2,
                persons_killed: 1,
                ..NormalizedRecord::default()
            },
            NormalizedRecord {
                borough: Some("BROOKLYN".to_string()),
                persons_injured: 3,
                ..NormalizedRecord::default()
            },
            NormalizedRecord {
                persons_injured: 7,
                ..NormalizedRecord::default()
            },
        ];
        let summary = borough_summary(&records);
        assert_eq!(
            summary,
            [BoroughSummary {
                borough: "BROOKLYN".to_string(),
                collisions: 2,
                persons_injured: 5,
                persons_killed: 1,
            }]
        );
    }

    #[test]
    fn hourly_by_borough_needs_both_fields() {
        let records = vec![
            crash("2021-09-11 14:00", Some("QUEENS")),
            crash("2021-09-11 09:00", Some("QUEENS")),
            crash("2021-09-11 09:30", Some("BRONX")),
            crash("2021-09-11 09:30", None),
            NormalizedRecord {
                borough: Some("BRONX".to_string()),
                ..NormalizedRecord::default()
            },
        ];
        let cells = hourly_by_borough(&records);
        let flat: Vec<(&str, u32, u64)> = cells
            .iter()
            .map(|c| (c.borough.as_str(), c.hour, c.count))
            .collect();
        assert_eq!(flat, [("QUEENS", 9, 1), ("QUEENS", 14, 1), ("BRONX", 9, 1)]);
    }

    #[test]
    fn severity_is_mean_per_weekday() {
        let mut monday_a = crash("2021-09-13 08:00", None);
        monday_a.persons_injured = 3;
        let mut monday_b = crash("2021-09-13 09:00", None);
        monday_b.persons_killed = 1;
        let severity = severity_by_weekday(&[monday_a, monday_b]);
        assert_eq!(severity.len(), 1);
        assert_eq!(severity[0].weekday, Weekday::Mon);
        assert_eq!(severity[0].collisions, 2);
        assert!((severity[0].average_severity - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_counts_records() {
        let records = vec![
            crash("2021-09-13 08:00", Some("BRONX")),
            NormalizedRecord {
                latitude: FieldValue::Valid(40.0),
                longitude: FieldValue::Valid(-73.0),
                persons_injured: 4,
                ..NormalizedRecord::default()
            },
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.valid_timestamps, 1);
        assert_eq!(summary.geolocated, 1);
        assert_eq!(summary.with_borough, 1);
        assert_eq!(summary.persons_injured, 4);
    }
}
