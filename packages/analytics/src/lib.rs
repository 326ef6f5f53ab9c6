#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for the collision dashboard.
//!
//! Each public function in [`aggregators`] and [`breakdowns`] turns a slice
//! of normalized records into the data behind one chart. [`build_report`]
//! runs all of them, sequentially or on the rayon pool, and bundles the
//! results into a [`collision_map_analytics_models::CollisionReport`].

pub mod aggregators;
pub mod breakdowns;
pub mod pipeline;
pub mod quality;

pub use pipeline::build_report;
