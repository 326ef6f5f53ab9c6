//! The dashboard's core aggregations.
//!
//! Each function is a pure pass over the normalized record set. A record
//! missing the field an aggregation keys on is skipped by that aggregation
//! only; nothing here can fail.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike as _};
use collision_map_analytics_models::{
    CategoryCount, GeoPoint, GroupTotal, HourCount, TimeSeriesPoint,
};
use collision_map_collision_models::{NormalizedRecord, UserGroup};
use indexmap::IndexMap;

/// Counts occurrences of each value and keeps the `limit` most frequent.
///
/// Ties keep the order in which values were first seen.
pub(crate) fn top_counts<'a>(
    values: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<CategoryCount> {
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // Stable: equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Density-map points for every record with both coordinates numeric.
///
/// With `drop_zero_coordinates`, points where either coordinate is exactly
/// zero are treated as placeholders and skipped.
#[must_use]
pub fn heatmap_points(records: &[NormalizedRecord], drop_zero_coordinates: bool) -> Vec<GeoPoint> {
    records
        .iter()
        .filter_map(NormalizedRecord::coordinates)
        .filter(|(lat, lng)| !drop_zero_coordinates || (*lat != 0.0 && *lng != 0.0))
        .map(|(latitude, longitude)| GeoPoint {
            latitude,
            longitude,
            weight: 1,
        })
        .collect()
}

/// Most frequent primary-vehicle contributing factors.
///
/// Absent factors and the `sentinel` placeholder are never counted.
#[must_use]
pub fn contributing_factors(
    records: &[NormalizedRecord],
    sentinel: &str,
    limit: usize,
) -> Vec<CategoryCount> {
    top_counts(
        records
            .iter()
            .filter_map(|r| r.contributing_factor.as_deref())
            .filter(|factor| *factor != sentinel),
        limit,
    )
}

fn group_totals(
    records: &[NormalizedRecord],
    value: impl Fn(&NormalizedRecord, UserGroup) -> u32,
) -> Vec<GroupTotal> {
    UserGroup::all()
        .iter()
        .map(|&group| GroupTotal {
            group,
            total: records.iter().map(|r| u64::from(value(r, group))).sum(),
        })
        .collect()
}

/// Injuries summed per road-user group, in the fixed order pedestrians,
/// cyclists, motorists.
#[must_use]
pub fn injuries_by_group(records: &[NormalizedRecord]) -> Vec<GroupTotal> {
    group_totals(records, NormalizedRecord::injured)
}

/// Fatalities summed per road-user group, in the fixed order pedestrians,
/// cyclists, motorists.
#[must_use]
pub fn fatalities_by_group(records: &[NormalizedRecord]) -> Vec<GroupTotal> {
    group_totals(records, NormalizedRecord::killed)
}

/// Collisions per calendar day, ascending. Days with no collisions are not
/// filled in.
#[must_use]
pub fn collisions_over_time(records: &[NormalizedRecord]) -> Vec<TimeSeriesPoint> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for crash_at in records.iter().filter_map(NormalizedRecord::crash_at) {
        *days.entry(crash_at.date()).or_default() += 1;
    }
    days.into_iter()
        .map(|(day, count)| TimeSeriesPoint { day, count })
        .collect()
}

/// Collisions per borough in first-seen order. Borough names are grouped
/// verbatim (case-sensitive).
#[must_use]
pub fn collisions_by_borough(records: &[NormalizedRecord]) -> Vec<CategoryCount> {
    let mut boroughs: IndexMap<&str, u64> = IndexMap::new();
    for borough in records.iter().filter_map(|r| r.borough.as_deref()) {
        *boroughs.entry(borough).or_default() += 1;
    }
    boroughs
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Collisions per hour of day, ascending. Hours with no collisions are not
/// filled in.
#[must_use]
pub fn hourly_trends(records: &[NormalizedRecord]) -> Vec<HourCount> {
    let mut hours: BTreeMap<u32, u64> = BTreeMap::new();
    for crash_at in records.iter().filter_map(NormalizedRecord::crash_at) {
        *hours.entry(crash_at.hour()).or_default() += 1;
    }
    hours
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}
