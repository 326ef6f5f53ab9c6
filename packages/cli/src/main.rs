#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the collision map toolchain.

mod output;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use collision_map_cli_utils::{IndicatifProgress, init_logger};
use collision_map_source::download::download_dataset;
use collision_map_source::registry::{DEFAULT_DATASET, all_datasets, builtin_dataset};

use crate::run::InputArgs;

#[derive(Parser)]
#[command(name = "collision_map", about = "Traffic collision dashboard data builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a collision CSV into the dashboard's JSON report
    Report {
        #[command(flatten)]
        input: InputArgs,
        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print a plain-text overview of every chart
    Summary {
        #[command(flatten)]
        input: InputArgs,
        /// Entries shown for ranked charts
        #[arg(long, default_value = "10")]
        rows: usize,
    },
    /// Download a dataset's CSV export
    Download {
        /// Built-in dataset id
        #[arg(long, default_value = DEFAULT_DATASET)]
        dataset: String,
        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
    /// List the built-in dataset definitions
    Datasets,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            output: destination,
            pretty,
        } => {
            let progress = IndicatifProgress::rows_spinner(&multi, "Reading");
            let run = run::execute(&input, &progress)?;
            let json = output::report_json(&run, pretty)?;

            if let Some(path) = destination {
                std::fs::write(&path, json)?;
                log::info!("Wrote report to {}", path.display());
            } else {
                println!("{json}");
            }
        }
        Commands::Summary { input, rows } => {
            let progress = IndicatifProgress::rows_spinner(&multi, "Reading");
            let run = run::execute(&input, &progress)?;
            print!("{}", output::render_summary(&run, rows));
        }
        Commands::Download {
            dataset,
            output: destination,
        } => {
            let dataset = builtin_dataset(&dataset)?;
            let progress = IndicatifProgress::bytes_bar(&multi, dataset.name());
            let path = download_dataset(&dataset, &destination, &progress).await?;
            log::info!("[{}] Saved to {}", dataset.id(), path.display());
        }
        Commands::Datasets => {
            let datasets = all_datasets();
            println!("{:<20} {:<16} NAME", "ID", "CITY");
            println!("{}", "-".repeat(70));
            for dataset in &datasets {
                let location = format!("{}, {}", dataset.city, dataset.state);
                println!("{:<20} {location:<16} {}", dataset.id(), dataset.name());
            }
        }
    }

    Ok(())
}
