//! Builds the full [`CollisionReport`] from a normalized record set.
//!
//! Every aggregation reads the same immutable slice and owns its output, so
//! the parallel path simply spawns each one on the rayon pool and assembles
//! the results afterwards. Both paths produce identical reports.

use std::time::Instant;

use collision_map_analytics_models::{AnalysisOptions, CategoryCount, CollisionReport, FactorScope};
use collision_map_collision_models::NormalizedRecord;

use crate::aggregators::{
    collisions_by_borough, collisions_over_time, contributing_factors, fatalities_by_group,
    heatmap_points, hourly_trends, injuries_by_group,
};
use crate::breakdowns::{
    all_vehicle_factors, borough_summary, hourly_by_borough, severity_by_weekday, summarize,
    vehicle_types, weekday_hour_matrix,
};
use crate::quality::warn_on_case_variants;

/// Computes every chart's data from `records`.
#[must_use]
pub fn build_report(records: &[NormalizedRecord], options: &AnalysisOptions) -> CollisionReport {
    let start = Instant::now();

    let report = if options.parallel {
        build_parallel(records, options)
    } else {
        build_sequential(records, options)
    };

    log::info!(
        "Aggregated {} records in {:.2?} ({} geo points, {} days, {} boroughs)",
        records.len(),
        start.elapsed(),
        report.heatmap.len(),
        report.collisions_over_time.len(),
        report.collisions_by_borough.len()
    );
    warn_on_case_variants("borough", &report.collisions_by_borough);

    report
}

fn primary_factors(records: &[NormalizedRecord], options: &AnalysisOptions) -> Vec<CategoryCount> {
    let sentinel = &options.unspecified_sentinel;
    match options.factor_scope {
        FactorScope::PrimaryVehicle => contributing_factors(records, sentinel, options.top_factors),
        FactorScope::AllVehicles => all_vehicle_factors(records, sentinel, options.top_factors),
    }
}

fn build_sequential(records: &[NormalizedRecord], options: &AnalysisOptions) -> CollisionReport {
    CollisionReport {
        summary: summarize(records),
        heatmap: heatmap_points(records, options.drop_zero_coordinates),
        contributing_factors: primary_factors(records, options),
        injuries: injuries_by_group(records),
        fatalities: fatalities_by_group(records),
        collisions_over_time: collisions_over_time(records),
        collisions_by_borough: collisions_by_borough(records),
        hourly_trends: hourly_trends(records),
        all_vehicle_factors: all_vehicle_factors(
            records,
            &options.unspecified_sentinel,
            options.top_factors,
        ),
        vehicle_types: vehicle_types(records, options.top_vehicle_types),
        weekday_hour_matrix: weekday_hour_matrix(records),
        borough_summary: borough_summary(records),
        hourly_by_borough: hourly_by_borough(records),
        severity_by_weekday: severity_by_weekday(records),
    }
}

fn build_parallel(records: &[NormalizedRecord], options: &AnalysisOptions) -> CollisionReport {
    let mut summary = None;
    let mut heatmap = Vec::new();
    let mut factors = Vec::new();
    let mut injuries = Vec::new();
    let mut fatalities = Vec::new();
    let mut daily = Vec::new();
    let mut boroughs = Vec::new();
    let mut hourly = Vec::new();
    let mut every_vehicle = Vec::new();
    let mut vehicles = Vec::new();
    let mut matrix = Vec::new();
    let mut borough_totals = Vec::new();
    let mut borough_hours = Vec::new();
    let mut severity = Vec::new();

    rayon::scope(|s| {
        s.spawn(|_| summary = Some(summarize(records)));
        s.spawn(|_| heatmap = heatmap_points(records, options.drop_zero_coordinates));
        s.spawn(|_| factors = primary_factors(records, options));
        s.spawn(|_| injuries = injuries_by_group(records));
        s.spawn(|_| fatalities = fatalities_by_group(records));
        s.spawn(|_| daily = collisions_over_time(records));
        s.spawn(|_| boroughs = collisions_by_borough(records));
        s.spawn(|_| hourly = hourly_trends(records));
        s.spawn(|_| {
            every_vehicle =
                all_vehicle_factors(records, &options.unspecified_sentinel, options.top_factors);
        });
        s.spawn(|_| vehicles = vehicle_types(records, options.top_vehicle_types));
        s.spawn(|_| matrix = weekday_hour_matrix(records));
        s.spawn(|_| borough_totals = borough_summary(records));
        s.spawn(|_| borough_hours = hourly_by_borough(records));
        s.spawn(|_| severity = severity_by_weekday(records));
    });

    CollisionReport {
        summary: summary.unwrap_or_default(),
        heatmap,
        contributing_factors: factors,
        injuries,
        fatalities,
        collisions_over_time: daily,
        collisions_by_borough: boroughs,
        hourly_trends: hourly,
        all_vehicle_factors: every_vehicle,
        vehicle_types: vehicles,
        weekday_hour_matrix: matrix,
        borough_summary: borough_totals,
        hourly_by_borough: borough_hours,
        severity_by_weekday: severity,
    }
}
