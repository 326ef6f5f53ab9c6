//! Loading a collision CSV and turning it into a report.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use collision_map_analytics::build_report;
use collision_map_analytics_models::{AnalysisOptions, CollisionReport, FactorScope};
use collision_map_source::csv_file::{CsvOptions, read_csv_file};
use collision_map_source::dataset::{DatasetDefinition, load_dataset_toml};
use collision_map_source::normalize::NormalizationStats;
use collision_map_source::progress::ProgressCallback;
use collision_map_source::registry::{DEFAULT_DATASET, builtin_dataset};

/// Input and analysis flags shared by `report` and `summary`.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Collision CSV export (files ending in `.gz` are decompressed)
    #[arg(long)]
    pub input: PathBuf,
    /// Built-in dataset id describing the CSV columns (default: `nyc_collisions`)
    #[arg(long, conflicts_with = "fields")]
    pub dataset: Option<String>,
    /// Dataset definition TOML for a CSV with a custom column layout
    #[arg(long)]
    pub fields: Option<PathBuf>,
    /// Analysis options TOML. Flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Maximum number of rows to read
    #[arg(long)]
    pub limit: Option<u64>,
    /// Run the aggregations on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Number of contributing factors to keep
    #[arg(long)]
    pub top_factors: Option<usize>,
    /// Factor columns counted by the factor chart (`primary_vehicle` or `all_vehicles`)
    #[arg(long, value_parser = parse_factor_scope)]
    pub factor_scope: Option<FactorScope>,
    /// Leave points with a zero coordinate out of the heatmap
    #[arg(long)]
    pub drop_zero_coordinates: bool,
}

fn parse_factor_scope(value: &str) -> Result<FactorScope, String> {
    value
        .parse()
        .map_err(|_| format!("unknown factor scope '{value}'"))
}

/// The outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct Run {
    /// Id of the dataset definition used to read the CSV.
    pub dataset_id: String,
    /// What normalization had to coerce.
    pub stats: NormalizationStats,
    /// All chart data.
    pub report: CollisionReport,
}

fn resolve_dataset(args: &InputArgs) -> Result<DatasetDefinition, Box<dyn Error>> {
    if let Some(path) = &args.fields {
        log::info!("Using dataset definition {}", path.display());
        return Ok(load_dataset_toml(path)?);
    }
    Ok(builtin_dataset(
        args.dataset.as_deref().unwrap_or(DEFAULT_DATASET),
    )?)
}

/// Reads `--config` (or the defaults) and applies flag overrides.
fn load_options(args: &InputArgs) -> Result<AnalysisOptions, Box<dyn Error>> {
    let mut options = match &args.config {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => AnalysisOptions::default(),
    };
    apply_overrides(&mut options, args);
    log::debug!("Analysis options: {options:?}");
    Ok(options)
}

fn apply_overrides(options: &mut AnalysisOptions, args: &InputArgs) {
    if args.parallel {
        options.parallel = true;
    }
    if args.drop_zero_coordinates {
        options.drop_zero_coordinates = true;
    }
    if let Some(top_factors) = args.top_factors {
        options.top_factors = top_factors;
    }
    if let Some(scope) = args.factor_scope {
        options.factor_scope = scope;
    }
}

/// Loads, normalizes and aggregates the input CSV.
///
/// # Errors
///
/// * If the dataset definition or options file cannot be loaded
/// * If the CSV cannot be read
pub fn execute(args: &InputArgs, progress: &Arc<dyn ProgressCallback>) -> Result<Run, Box<dyn Error>> {
    let dataset = resolve_dataset(args)?;
    let options = load_options(args)?;

    let csv_options = CsvOptions {
        limit: args.limit,
        ..CsvOptions::default()
    };
    let table = read_csv_file(&args.input, &csv_options, progress)?;
    dataset.check_headers(&table.headers);

    let (records, stats) = dataset.normalize(&table.records);
    let report = build_report(&records, &options);

    Ok(Run {
        dataset_id: dataset.id,
        stats,
        report,
    })
}

#[cfg(test)]
mod tests {
    use collision_map_source::progress::null_progress;

    use super::*;

    const CSV: &str = "\
CRASH DATE,CRASH TIME,BOROUGH,ZIP CODE,LATITUDE,LONGITUDE,LOCATION,ON STREET NAME,CROSS STREET NAME,OFF STREET NAME,NUMBER OF PERSONS INJURED,NUMBER OF PERSONS KILLED,NUMBER OF PEDESTRIANS INJURED,NUMBER OF PEDESTRIANS KILLED,NUMBER OF CYCLIST INJURED,NUMBER OF CYCLIST KILLED,NUMBER OF MOTORIST INJURED,NUMBER OF MOTORIST KILLED,CONTRIBUTING FACTOR VEHICLE 1,CONTRIBUTING FACTOR VEHICLE 2,CONTRIBUTING FACTOR VEHICLE 3,CONTRIBUTING FACTOR VEHICLE 4,CONTRIBUTING FACTOR VEHICLE 5,COLLISION_ID,VEHICLE TYPE CODE 1,VEHICLE TYPE CODE 2,VEHICLE TYPE CODE 3,VEHICLE TYPE CODE 4,VEHICLE TYPE CODE 5
09/11/2021,2:39,BRONX,10457,40.8,-73.9,,,,,1,0,1,0,0,0,0,0,Unspecified,,,,,1,Sedan,,,,
09/11/2021,9:35,BRONX,,,,,,,,0,0,0,0,0,0,0,0,Following Too Closely,Unspecified,,,,2,Sedan,Bike,,,
09/12/2021,14:58,,,40.7,-73.8,,,,,2,0,2,0,0,0,0,0,Following Too Closely,,,,,3,Station Wagon/Sport Utility Vehicle,,,,
";

    fn write_input(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "collision_map_cli_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn executes_worked_example() {
        let input = write_input("worked.csv", CSV);
        let args = InputArgs {
            input: input.clone(),
            ..InputArgs::default()
        };

        let run = execute(&args, &null_progress()).unwrap();
        std::fs::remove_file(input).ok();

        assert_eq!(run.dataset_id, "nyc_collisions");
        assert_eq!(run.stats.records, 3);
        let report = run.report;
        assert_eq!(report.collisions_by_borough.len(), 1);
        assert_eq!(report.collisions_by_borough[0].category, "BRONX");
        assert_eq!(report.collisions_by_borough[0].count, 2);
        assert_eq!(report.contributing_factors.len(), 1);
        assert_eq!(report.contributing_factors[0].category, "Following Too Closely");
        assert_eq!(report.contributing_factors[0].count, 2);
        assert_eq!(report.injuries[0].total, 3);
        assert_eq!(report.heatmap.len(), 2);
        assert_eq!(report.collisions_over_time.len(), 2);
    }

    #[test]
    fn config_file_and_flags_combine() {
        let config = write_input("options.toml", "top_factors = 3\nparallel = false\n");
        let args = InputArgs {
            config: Some(config.clone()),
            parallel: true,
            factor_scope: Some(FactorScope::AllVehicles),
            ..InputArgs::default()
        };

        let options = load_options(&args).unwrap();
        std::fs::remove_file(config).ok();

        assert_eq!(options.top_factors, 3);
        assert!(options.parallel);
        assert_eq!(options.factor_scope, FactorScope::AllVehicles);
        assert_eq!(options.top_vehicle_types, 10);
    }

    #[test]
    fn top_factors_flag_wins_over_config() {
        let mut options = AnalysisOptions {
            top_factors: 3,
            ..AnalysisOptions::default()
        };
        let args = InputArgs {
            top_factors: Some(7),
            ..InputArgs::default()
        };
        apply_overrides(&mut options, &args);
        assert_eq!(options.top_factors, 7);
        assert!(!options.parallel);
    }

    #[test]
    fn parses_factor_scope_names() {
        assert_eq!(
            parse_factor_scope("all_vehicles"),
            Ok(FactorScope::AllVehicles)
        );
        assert_eq!(
            parse_factor_scope("primary_vehicle"),
            Ok(FactorScope::PrimaryVehicle)
        );
        let err = parse_factor_scope("every_vehicle").unwrap_err();
        assert!(err.contains("every_vehicle"));
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let args = InputArgs {
            dataset: Some("atlantis".to_string()),
            ..InputArgs::default()
        };
        let err = resolve_dataset(&args).unwrap_err();
        assert!(err.to_string().contains("atlantis"));
    }
}
