//! Config-driven collision dataset definition.
//!
//! [`DatasetDefinition`] captures everything unique about a collision export
//! (where to download it, which CSV column holds which field) in a
//! serializable config struct, so a single generic normalizer handles every
//! dataset that follows the same shape.

use collision_map_collision_models::{NormalizedRecord, RawRecord};
use serde::Deserialize;

use crate::SourceError;
use crate::normalize::{NormalizationStats, normalize_records};

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete, config-driven collision dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"nyc_collisions"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City the dataset covers.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Direct CSV download URL, if the dataset is published online.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Human-readable data portal page.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Column name mappings for normalization.
    pub fields: FieldMapping,
}

/// Maps CSV column headers to normalized record fields.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Column holding the crash date.
    pub crash_date: String,
    /// Column holding the crash time of day.
    pub crash_time: String,
    /// Latitude column.
    pub latitude: String,
    /// Longitude column.
    pub longitude: String,
    /// Borough column.
    pub borough: String,
    /// Contributing-factor columns, one per vehicle. The first entry is the
    /// primary vehicle.
    #[serde(default)]
    pub contributing_factors: Vec<String>,
    /// Vehicle type code columns.
    #[serde(default)]
    pub vehicle_types: Vec<String>,
    /// Casualty count columns.
    pub counts: CountColumns,
}

/// Casualty count columns.
#[derive(Debug, Clone, Deserialize)]
pub struct CountColumns {
    /// Total persons injured.
    pub persons_injured: String,
    /// Total persons killed.
    pub persons_killed: String,
    /// Pedestrians injured.
    pub pedestrians_injured: String,
    /// Pedestrians killed.
    pub pedestrians_killed: String,
    /// Cyclists injured.
    pub cyclists_injured: String,
    /// Cyclists killed.
    pub cyclists_killed: String,
    /// Motorists injured.
    pub motorists_injured: String,
    /// Motorists killed.
    pub motorists_killed: String,
}

impl CountColumns {
    /// All count column names.
    #[must_use]
    pub fn all(&self) -> [&str; 8] {
        [
            self.persons_injured.as_str(),
            self.persons_killed.as_str(),
            self.pedestrians_injured.as_str(),
            self.pedestrians_killed.as_str(),
            self.cyclists_injured.as_str(),
            self.cyclists_killed.as_str(),
            self.motorists_injured.as_str(),
            self.motorists_killed.as_str(),
        ]
    }
}

impl FieldMapping {
    /// Every column name this mapping reads from.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![
            self.crash_date.as_str(),
            self.crash_time.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.borough.as_str(),
        ];
        columns.extend(self.contributing_factors.iter().map(String::as_str));
        columns.extend(self.vehicle_types.iter().map(String::as_str));
        columns.extend(self.counts.all());
        columns
    }

    /// Returns the mapped columns that do not appear in `headers`.
    ///
    /// Missing columns are not an error: their values simply normalize as
    /// absent.
    #[must_use]
    pub fn missing_columns<'a>(&'a self, headers: &[String]) -> Vec<&'a str> {
        self.columns()
            .into_iter()
            .filter(|column| !headers.iter().any(|h| h == column))
            .collect()
    }
}

impl DatasetDefinition {
    /// Returns the unique dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logs a warning for every mapped column missing from `headers`.
    pub fn check_headers(&self, headers: &[String]) {
        for column in self.fields.missing_columns(headers) {
            log::warn!(
                "[{}] Column '{column}' not found in CSV header, values will be treated as absent",
                self.id
            );
        }
    }

    /// Normalizes raw rows into [`NormalizedRecord`]s, one per input row.
    #[must_use]
    pub fn normalize(&self, records: &[RawRecord]) -> (Vec<NormalizedRecord>, NormalizationStats) {
        let (normalized, stats) = normalize_records(records, &self.fields);

        log::info!(
            "[{}] Normalized {} records ({} invalid timestamps, {} invalid coordinates, {} invalid counts)",
            self.id,
            normalized.len(),
            stats.invalid_timestamps,
            stats.invalid_coordinates,
            stats.invalid_counts
        );

        (normalized, stats)
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

/// Reads and parses a [`DatasetDefinition`] from a TOML file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_dataset_toml(path: &std::path::Path) -> Result<DatasetDefinition, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    parse_dataset_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> DatasetDefinition {
        parse_dataset_toml(include_str!("../datasets/nyc_collisions.toml")).unwrap()
    }

    #[test]
    fn parses_nyc_toml() {
        let def = nyc();
        assert_eq!(def.id(), "nyc_collisions");
        assert_eq!(def.city, "New York");
        assert_eq!(def.fields.crash_date, "CRASH DATE");
        assert_eq!(def.fields.contributing_factors.len(), 5);
        assert_eq!(def.fields.vehicle_types.len(), 2);
        assert!(def.download_url.is_some());
    }

    #[test]
    fn lists_every_mapped_column() {
        let def = nyc();
        let columns = def.fields.columns();
        assert_eq!(columns.len(), 5 + 5 + 2 + 8);
        assert!(columns.contains(&"NUMBER OF CYCLIST KILLED"));
    }

    #[test]
    fn reports_missing_columns() {
        let def = nyc();
        let headers: Vec<String> = def
            .fields
            .columns()
            .into_iter()
            .filter(|c| *c != "BOROUGH")
            .map(String::from)
            .collect();
        assert_eq!(def.fields.missing_columns(&headers), ["BOROUGH"]);
    }

    #[test]
    fn rejects_incomplete_toml() {
        let err = parse_dataset_toml("id = \"x\"\nname = \"x\"").unwrap_err();
        assert!(matches!(err, SourceError::Config { .. }));
    }

    #[test]
    fn normalize_preserves_cardinality() {
        let def = nyc();
        let raw = vec![
            RawRecord::new(),
            RawRecord::new().with("CRASH DATE", "garbage"),
            RawRecord::new()
                .with("CRASH DATE", "09/11/2021")
                .with("CRASH TIME", "2:39"),
        ];
        let (records, stats) = def.normalize(&raw);
        assert_eq!(records.len(), raw.len());
        assert_eq!(stats.records, 3);
        assert_eq!(stats.invalid_timestamps, 1);
    }
}
