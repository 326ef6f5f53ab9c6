//! Report rendering: JSON for downstream charting, plain text for a quick
//! look in the terminal.

use collision_map_analytics_models::{
    CategoryCount, ChartName, CollisionReport, GroupTotal, WeekdayHourCount,
};
use collision_map_source::normalize::NormalizationStats;
use serde::Serialize;

use crate::run::Run;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    dataset: &'a str,
    normalization: &'a NormalizationStats,
    report: &'a CollisionReport,
}

/// Serializes a run as a JSON document.
///
/// # Errors
///
/// * If the report fails to serialize
pub fn report_json(run: &Run, pretty: bool) -> serde_json::Result<String> {
    let document = ReportDocument {
        dataset: &run.dataset_id,
        normalization: &run.stats,
        report: &run.report,
    };
    if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
}

fn category_lines(lines: &mut Vec<String>, categories: &[CategoryCount], rows: usize) {
    for c in categories.iter().take(rows) {
        lines.push(format!("  {:>8}  {}", c.count, c.category));
    }
    if categories.len() > rows {
        lines.push(format!("  ... {} more", categories.len() - rows));
    }
}

fn group_lines(lines: &mut Vec<String>, groups: &[GroupTotal]) {
    for g in groups {
        lines.push(format!("  {:<12} {}", g.group.as_ref(), g.total));
    }
}

fn busiest_cells(cells: &[WeekdayHourCount], rows: usize) -> Vec<&WeekdayHourCount> {
    let mut ranked: Vec<&WeekdayHourCount> = cells.iter().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(rows);
    ranked
}

fn chart_lines(lines: &mut Vec<String>, chart: ChartName, report: &CollisionReport, rows: usize) {
    match chart {
        ChartName::Heatmap => {
            lines.push(format!("  {} geolocated points", report.heatmap.len()));
        }
        ChartName::ContributingFactors => {
            category_lines(lines, &report.contributing_factors, rows);
        }
        ChartName::Injuries => group_lines(lines, &report.injuries),
        ChartName::Fatalities => group_lines(lines, &report.fatalities),
        ChartName::CollisionsOverTime => {
            let days = &report.collisions_over_time;
            if let (Some(first), Some(last)) = (days.first(), days.last()) {
                lines.push(format!("  {} days from {} to {}", days.len(), first.day, last.day));
            }
            if let Some(busiest) = days.iter().max_by_key(|p| p.count) {
                lines.push(format!("  busiest: {} ({})", busiest.day, busiest.count));
            }
        }
        ChartName::CollisionsByBorough => {
            category_lines(lines, &report.collisions_by_borough, rows);
        }
        ChartName::HourlyTrends => {
            for h in &report.hourly_trends {
                lines.push(format!("  {:02}:00  {}", h.hour, h.count));
            }
        }
        ChartName::AllVehicleFactors => {
            category_lines(lines, &report.all_vehicle_factors, rows);
        }
        ChartName::VehicleTypes => category_lines(lines, &report.vehicle_types, rows),
        ChartName::WeekdayHourMatrix => {
            for cell in busiest_cells(&report.weekday_hour_matrix, rows) {
                lines.push(format!("  {} {:02}:00  {}", cell.weekday, cell.hour, cell.count));
            }
        }
        ChartName::BoroughSummary => {
            for b in &report.borough_summary {
                lines.push(format!(
                    "  {:<14} {} collisions, {} injured, {} killed",
                    b.borough, b.collisions, b.persons_injured, b.persons_killed
                ));
            }
        }
        ChartName::HourlyByBorough => {
            let mut peaks: Vec<(&str, u32, u64)> = Vec::new();
            for cell in &report.hourly_by_borough {
                match peaks.iter_mut().find(|(b, _, _)| *b == cell.borough) {
                    Some(peak) if cell.count > peak.2 => {
                        *peak = (cell.borough.as_str(), cell.hour, cell.count);
                    }
                    Some(_) => {}
                    None => peaks.push((cell.borough.as_str(), cell.hour, cell.count)),
                }
            }
            for (borough, hour, count) in peaks {
                lines.push(format!("  {borough:<14} peak {hour:02}:00 ({count})"));
            }
        }
        ChartName::SeverityByWeekday => {
            for s in &report.severity_by_weekday {
                lines.push(format!(
                    "  {}  {:.3} over {} collisions",
                    s.weekday, s.average_severity, s.collisions
                ));
            }
        }
    }
}

/// Renders every chart as a short text section, `rows` entries at most for
/// ranked charts.
#[must_use]
pub fn render_summary(run: &Run, rows: usize) -> String {
    let summary = &run.report.summary;
    let mut lines = vec![
        format!("Dataset: {}", run.dataset_id),
        format!(
            "Records: {} ({} with timestamp, {} geolocated, {} with borough)",
            summary.total_records, summary.valid_timestamps, summary.geolocated, summary.with_borough
        ),
        format!(
            "Casualties: {} injured, {} killed",
            summary.persons_injured, summary.persons_killed
        ),
        format!(
            "Coerced: {} invalid timestamps, {} invalid coordinates, {} invalid counts",
            run.stats.invalid_timestamps, run.stats.invalid_coordinates, run.stats.invalid_counts
        ),
    ];

    for &chart in ChartName::all() {
        lines.push(String::new());
        lines.push(chart.title().to_string());
        chart_lines(&mut lines, chart, &run.report, rows);
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use collision_map_analytics_models::{BoroughHourCount, ReportSummary};

    use super::*;

    fn run() -> Run {
        Run {
            dataset_id: "nyc_collisions".to_string(),
            stats: NormalizationStats::default(),
            report: CollisionReport {
                summary: ReportSummary {
                    total_records: 4,
                    ..ReportSummary::default()
                },
                heatmap: Vec::new(),
                contributing_factors: vec![
                    CategoryCount {
                        category: "Unsafe Speed".to_string(),
                        count: 3,
                    },
                    CategoryCount {
                        category: "Driver Inattention/Distraction".to_string(),
                        count: 1,
                    },
                ],
                injuries: Vec::new(),
                fatalities: Vec::new(),
                collisions_over_time: Vec::new(),
                collisions_by_borough: Vec::new(),
                hourly_trends: Vec::new(),
                all_vehicle_factors: Vec::new(),
                vehicle_types: Vec::new(),
                weekday_hour_matrix: Vec::new(),
                borough_summary: Vec::new(),
                hourly_by_borough: vec![
                    BoroughHourCount {
                        borough: "QUEENS".to_string(),
                        hour: 8,
                        count: 2,
                    },
                    BoroughHourCount {
                        borough: "QUEENS".to_string(),
                        hour: 17,
                        count: 5,
                    },
                ],
                severity_by_weekday: Vec::new(),
            },
        }
    }

    #[test]
    fn summary_has_every_chart_title() {
        let text = render_summary(&run(), 10);
        for chart in ChartName::all() {
            assert!(text.contains(chart.title()), "missing {chart}");
        }
        assert!(text.contains("Records: 4"));
    }

    #[test]
    fn ranked_charts_are_truncated() {
        let text = render_summary(&run(), 1);
        assert!(text.contains("Unsafe Speed"));
        assert!(!text.contains("Driver Inattention/Distraction"));
        assert!(text.contains("... 1 more"));
    }

    #[test]
    fn borough_peak_hour() {
        let text = render_summary(&run(), 10);
        assert!(text.contains("peak 17:00 (5)"));
    }

    #[test]
    fn json_wraps_report() {
        let json = report_json(&run(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dataset"], "nyc_collisions");
        assert_eq!(value["report"]["summary"]["totalRecords"], 4);
        assert_eq!(
            value["report"]["contributingFactors"][0]["category"],
            "Unsafe Speed"
        );
        assert!(value["normalization"]["invalidCounts"].is_number());
    }
}
