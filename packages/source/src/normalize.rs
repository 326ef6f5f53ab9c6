//! Record normalization.
//!
//! Converts each [`RawRecord`] into a [`NormalizedRecord`] using a
//! [`FieldMapping`]. Normalization never drops or merges rows and never
//! fails; malformed fields are kept as [`FieldValue::Invalid`] (or coerced to
//! zero for counts) and tallied in [`NormalizationStats`].

use collision_map_collision_models::{FieldValue, NormalizedRecord, RawRecord};
use serde::Serialize;

use crate::dataset::FieldMapping;
use crate::parsing::{non_empty, parse_coordinate, parse_count, parse_crash_timestamp};

/// Tally of field-level problems seen while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationStats {
    /// Rows normalized.
    pub records: u64,
    /// Rows with a date that could not be parsed.
    pub invalid_timestamps: u64,
    /// Rows with no crash date at all.
    pub absent_timestamps: u64,
    /// Rows with a latitude or longitude that is not a number.
    pub invalid_coordinates: u64,
    /// Count fields that were not a non-negative number (coerced to 0).
    pub invalid_counts: u64,
}

/// Normalizes a whole table. The output has exactly one entry per input row,
/// in the same order.
#[must_use]
pub fn normalize_records(
    records: &[RawRecord],
    fields: &FieldMapping,
) -> (Vec<NormalizedRecord>, NormalizationStats) {
    let mut stats = NormalizationStats::default();
    let normalized = records
        .iter()
        .map(|record| normalize_record(record, fields, &mut stats))
        .collect();
    (normalized, stats)
}

/// Normalizes a single row.
pub fn normalize_record(
    record: &RawRecord,
    fields: &FieldMapping,
    stats: &mut NormalizationStats,
) -> NormalizedRecord {
    stats.records += 1;

    // ── Timestamp ────────────────────────────────────────────────────
    let crash_at = parse_crash_timestamp(
        record.get(&fields.crash_date),
        record.get(&fields.crash_time),
    );
    match &crash_at {
        FieldValue::Invalid(raw) => {
            stats.invalid_timestamps += 1;
            log::trace!("Unparseable crash timestamp '{raw}'");
        }
        FieldValue::Absent => stats.absent_timestamps += 1,
        FieldValue::Valid(_) => {}
    }

    // ── Coordinates ──────────────────────────────────────────────────
    let latitude = parse_coordinate(record.get(&fields.latitude));
    let longitude = parse_coordinate(record.get(&fields.longitude));
    if latitude.is_invalid() || longitude.is_invalid() {
        stats.invalid_coordinates += 1;
    }

    // ── Counts ───────────────────────────────────────────────────────
    let mut count = |column: &str| match parse_count(record.get(column)) {
        FieldValue::Valid(n) => n,
        FieldValue::Absent => 0,
        FieldValue::Invalid(raw) => {
            stats.invalid_counts += 1;
            log::trace!("Non-numeric count '{raw}' in column '{column}', using 0");
            0
        }
    };
    let counts = &fields.counts;
    let persons_injured = count(&counts.persons_injured);
    let persons_killed = count(&counts.persons_killed);
    let pedestrians_injured = count(&counts.pedestrians_injured);
    let cyclists_injured = count(&counts.cyclists_injured);
    let motorists_injured = count(&counts.motorists_injured);
    let pedestrians_killed = count(&counts.pedestrians_killed);
    let cyclists_killed = count(&counts.cyclists_killed);
    let motorists_killed = count(&counts.motorists_killed);

    // ── Categorical fields ───────────────────────────────────────────
    let text = |column: &String| non_empty(record.get(column)).map(String::from);

    let mut factor_columns = fields.contributing_factors.iter();
    let contributing_factor = factor_columns.next().and_then(text);
    let additional_factors = factor_columns.filter_map(text).collect();
    let vehicle_types = fields.vehicle_types.iter().filter_map(text).collect();
    let borough = text(&fields.borough);

    NormalizedRecord {
        crash_at,
        latitude,
        longitude,
        persons_injured,
        persons_killed,
        pedestrians_injured,
        cyclists_injured,
        motorists_injured,
        pedestrians_killed,
        cyclists_killed,
        motorists_killed,
        contributing_factor,
        additional_factors,
        vehicle_types,
        borough,
    }
}
