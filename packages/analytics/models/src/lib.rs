#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types and analysis options for the collision charts.
//!
//! Every aggregation produces a small sequence of plain `(label, value)`
//! rows that a chart or map renderer can consume directly. The full set is
//! bundled into a [`CollisionReport`].

use chrono::{NaiveDate, Weekday};
use collision_map_collision_models::UserGroup;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which contributing-factor columns feed the factor chart.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactorScope {
    /// Only the first vehicle's factor.
    #[default]
    PrimaryVehicle,
    /// Factors of every vehicle involved, counted together.
    AllVehicles,
}

/// Tunable parameters for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisOptions {
    /// Number of contributing factors to keep.
    pub top_factors: usize,
    /// Number of vehicle types to keep.
    pub top_vehicle_types: usize,
    /// Which factor columns the primary factor chart counts.
    pub factor_scope: FactorScope,
    /// Placeholder factor value that is never counted.
    pub unspecified_sentinel: String,
    /// Drop geo points where either coordinate is exactly zero.
    pub drop_zero_coordinates: bool,
    /// Run independent aggregations on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_factors: 20,
            top_vehicle_types: 10,
            factor_scope: FactorScope::PrimaryVehicle,
            unspecified_sentinel: "Unspecified".to_string(),
            drop_zero_coordinates: false,
            parallel: false,
        }
    }
}

/// Count of collisions in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label, verbatim from the data.
    pub category: String,
    /// Number of occurrences.
    pub count: u64,
}

/// Casualty total for one road-user group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    /// Road-user group.
    pub group: UserGroup,
    /// Summed count across all records.
    pub total: u64,
}

/// Collisions on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Calendar day.
    pub day: NaiveDate,
    /// Collisions on that day.
    pub count: u64,
}

/// Collisions in one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Collisions in that hour.
    pub count: u64,
}

/// A weighted point for density-map rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Point weight. Always 1 for individual collisions.
    pub weight: u32,
}

/// Collisions in one (weekday, hour) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHourCount {
    /// Day of the week.
    pub weekday: Weekday,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Collisions in the cell.
    pub count: u64,
}

/// Per-borough totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughSummary {
    /// Borough name, verbatim.
    pub borough: String,
    /// Number of collisions.
    pub collisions: u64,
    /// Persons injured.
    pub persons_injured: u64,
    /// Persons killed.
    pub persons_killed: u64,
}

/// Collisions in one (borough, hour) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughHourCount {
    /// Borough name, verbatim.
    pub borough: String,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Collisions in the cell.
    pub count: u64,
}

/// Mean severity (injured + killed per collision) for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySeverity {
    /// Day of the week.
    pub weekday: Weekday,
    /// Mean persons injured plus killed per collision.
    pub average_severity: f64,
    /// Collisions the mean was taken over.
    pub collisions: u64,
}

/// Record-level totals for the whole dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Records in the dataset.
    pub total_records: u64,
    /// Records with a parseable crash timestamp.
    pub valid_timestamps: u64,
    /// Records with both coordinates present and numeric.
    pub geolocated: u64,
    /// Records with a borough.
    pub with_borough: u64,
    /// Persons injured across all records.
    pub persons_injured: u64,
    /// Persons killed across all records.
    pub persons_killed: u64,
}

/// Everything a renderer needs to draw the collision dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionReport {
    /// Dataset-wide totals.
    pub summary: ReportSummary,
    /// Density-map points.
    pub heatmap: Vec<GeoPoint>,
    /// Top contributing factors, descending.
    pub contributing_factors: Vec<CategoryCount>,
    /// Injuries per road-user group.
    pub injuries: Vec<GroupTotal>,
    /// Fatalities per road-user group.
    pub fatalities: Vec<GroupTotal>,
    /// Collisions per calendar day, ascending.
    pub collisions_over_time: Vec<TimeSeriesPoint>,
    /// Collisions per borough.
    pub collisions_by_borough: Vec<CategoryCount>,
    /// Collisions per hour of day, ascending.
    pub hourly_trends: Vec<HourCount>,
    /// Top contributing factors across every vehicle.
    pub all_vehicle_factors: Vec<CategoryCount>,
    /// Top vehicle types.
    pub vehicle_types: Vec<CategoryCount>,
    /// Weekday x hour matrix.
    pub weekday_hour_matrix: Vec<WeekdayHourCount>,
    /// Per-borough totals.
    pub borough_summary: Vec<BoroughSummary>,
    /// Hourly trends split by borough.
    pub hourly_by_borough: Vec<BoroughHourCount>,
    /// Mean severity per weekday.
    pub severity_by_weekday: Vec<WeekdaySeverity>,
}

/// The charts of the collision dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartName {
    /// Density map of collision locations.
    Heatmap,
    /// Top contributing factors.
    ContributingFactors,
    /// Injuries by road-user group.
    Injuries,
    /// Fatalities by road-user group.
    Fatalities,
    /// Daily collisions.
    CollisionsOverTime,
    /// Collisions per borough.
    CollisionsByBorough,
    /// Collisions per hour of day.
    HourlyTrends,
    /// Top factors across every vehicle.
    AllVehicleFactors,
    /// Top vehicle types.
    VehicleTypes,
    /// Weekday x hour matrix.
    WeekdayHourMatrix,
    /// Per-borough totals.
    BoroughSummary,
    /// Hourly trends split by borough.
    HourlyByBorough,
    /// Mean severity per weekday.
    SeverityByWeekday,
}

impl ChartName {
    /// Returns all charts in dashboard order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Heatmap,
            Self::ContributingFactors,
            Self::Injuries,
            Self::Fatalities,
            Self::CollisionsOverTime,
            Self::CollisionsByBorough,
            Self::HourlyTrends,
            Self::AllVehicleFactors,
            Self::VehicleTypes,
            Self::WeekdayHourMatrix,
            Self::BoroughSummary,
            Self::HourlyByBorough,
            Self::SeverityByWeekday,
        ]
    }

    /// Human-readable chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Heatmap => "Geospatial Crash Heatmap",
            Self::ContributingFactors => "Top Contributing Factors to Collisions",
            Self::Injuries => "Injuries by User-Groups",
            Self::Fatalities => "Fatalities by User-Groups",
            Self::CollisionsOverTime => "Daily Collisions Over Time",
            Self::CollisionsByBorough => "Collisions by Borough",
            Self::HourlyTrends => "Hourly Collision Trends",
            Self::AllVehicleFactors => "Top Contributing Factors (All Vehicles)",
            Self::VehicleTypes => "Top Vehicle Types Involved in Collisions",
            Self::WeekdayHourMatrix => "Collisions Heatmap by Day and Hour",
            Self::BoroughSummary => "Borough Totals",
            Self::HourlyByBorough => "Hourly Collision Trends by Borough",
            Self::SeverityByWeekday => "Average Severity by Day of the Week",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = AnalysisOptions::default();
        assert_eq!(options.top_factors, 20);
        assert_eq!(options.top_vehicle_types, 10);
        assert_eq!(options.factor_scope, FactorScope::PrimaryVehicle);
        assert_eq!(options.unspecified_sentinel, "Unspecified");
        assert!(!options.drop_zero_coordinates);
    }

    #[test]
    fn options_from_partial_toml() {
        let options: AnalysisOptions =
            toml::de::from_str("top_factors = 5\nfactor_scope = \"all_vehicles\"").unwrap();
        assert_eq!(options.top_factors, 5);
        assert_eq!(options.factor_scope, FactorScope::AllVehicles);
        assert_eq!(options.top_vehicle_types, 10);
    }

    #[test]
    fn chart_names_are_snake_case() {
        assert_eq!(ChartName::HourlyTrends.to_string(), "hourly_trends");
        assert_eq!(
            "collisions_by_borough".parse::<ChartName>().unwrap(),
            ChartName::CollisionsByBorough
        );
    }

    #[test]
    fn every_chart_has_a_title() {
        for chart in ChartName::all() {
            assert!(!chart.title().is_empty(), "{chart} has no title");
        }
    }

    #[test]
    fn geo_point_serializes_camel_case() {
        let point = GeoPoint {
            latitude: 40.5,
            longitude: -73.5,
            weight: 1,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["weight"], 1);
        assert_eq!(json["latitude"], 40.5);
    }
}
