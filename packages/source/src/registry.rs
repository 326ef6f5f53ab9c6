//! Dataset registry: built-in dataset definitions embedded as TOML.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new dataset is as simple as
//! creating a new TOML file and adding it to the list below.

use crate::SourceError;
use crate::dataset::{DatasetDefinition, parse_dataset_toml};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[(
    "nyc_collisions",
    include_str!("../datasets/nyc_collisions.toml"),
)];

/// Identifier of the dataset used when none is requested.
pub const DEFAULT_DATASET: &str = "nyc_collisions";

/// Returns all built-in dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a built-in dataset by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownDataset`] if no embedded definition has the
/// given id.
pub fn builtin_dataset(id: &str) -> Result<DatasetDefinition, SourceError> {
    all_datasets()
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| SourceError::UnknownDataset { id: id.to_string() })
}
