#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Collision dataset loading and record normalization.
//!
//! A [`dataset::DatasetDefinition`] describes where a collision export lives
//! and which CSV column holds which field. [`csv_file`] reads the export into
//! [`collision_map_collision_models::RawRecord`]s and [`normalize`] turns
//! those into typed records for the analytics pipeline.

pub mod csv_file;
pub mod dataset;
pub mod download;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod registry;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input could not be interpreted as a table.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// A dataset definition or config file is invalid.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// No built-in dataset has the requested id.
    #[error("Unknown dataset '{id}'")]
    UnknownDataset {
        /// The requested dataset id.
        id: String,
    },
}
