#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw and normalized collision record types.
//!
//! A [`RawRecord`] is one untyped row of the source table, exactly as it was
//! read. Normalization turns it into a [`NormalizedRecord`] whose fields carry
//! their semantic types. Fields that can fail to parse are wrapped in
//! [`FieldValue`] so that downstream aggregations can tell a missing value
//! apart from a malformed one without ever aborting.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One untyped row of the source table, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Returns the raw string value of a column, if the column exists.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Sets a column value, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Number of columns in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no columns at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Outcome of parsing a single raw field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue<T> {
    /// The field was present and parsed successfully.
    Valid(T),
    /// The field was present but could not be parsed. Holds the raw input.
    Invalid(String),
    /// The field was empty or the column was missing.
    #[default]
    Absent,
}

impl<T> FieldValue<T> {
    /// Returns the parsed value, if valid.
    #[must_use]
    pub const fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid(_) | Self::Absent => None,
        }
    }

    /// Whether the field parsed successfully.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Whether the field was present but malformed.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Whether the field was empty or missing.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T: Copy> FieldValue<T> {
    /// Returns a copy of the parsed value, if valid.
    #[must_use]
    pub const fn get(&self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(*v),
            Self::Invalid(_) | Self::Absent => None,
        }
    }
}

/// Road-user groups that injury and fatality counts are broken down by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum UserGroup {
    /// People on foot
    Pedestrians,
    /// People on bicycles
    Cyclists,
    /// Vehicle occupants
    Motorists,
}

impl UserGroup {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pedestrians, Self::Cyclists, Self::Motorists]
    }
}

/// A collision record with every field coerced to its semantic type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Crash date and time combined. No timezone is attached.
    pub crash_at: FieldValue<NaiveDateTime>,
    /// Latitude (WGS84).
    pub latitude: FieldValue<f64>,
    /// Longitude (WGS84).
    pub longitude: FieldValue<f64>,
    /// Total persons injured.
    pub persons_injured: u32,
    /// Total persons killed.
    pub persons_killed: u32,
    /// Pedestrians injured.
    pub pedestrians_injured: u32,
    /// Cyclists injured.
    pub cyclists_injured: u32,
    /// Motorists injured.
    pub motorists_injured: u32,
    /// Pedestrians killed.
    pub pedestrians_killed: u32,
    /// Cyclists killed.
    pub cyclists_killed: u32,
    /// Motorists killed.
    pub motorists_killed: u32,
    /// Contributing factor reported for the first vehicle.
    pub contributing_factor: Option<String>,
    /// Contributing factors reported for the remaining vehicles (non-empty
    /// values only).
    pub additional_factors: Vec<String>,
    /// Vehicle type codes (non-empty values only).
    pub vehicle_types: Vec<String>,
    /// Borough name, verbatim from the source.
    pub borough: Option<String>,
}

impl NormalizedRecord {
    /// Returns the crash timestamp when it parsed successfully.
    #[must_use]
    pub const fn crash_at(&self) -> Option<NaiveDateTime> {
        self.crash_at.get()
    }

    /// Returns `(latitude, longitude)` when both are valid finite numbers.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let latitude = self.latitude.get()?;
        let longitude = self.longitude.get()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some((latitude, longitude))
    }

    /// Number of injured people in the given group.
    #[must_use]
    pub const fn injured(&self, group: UserGroup) -> u32 {
        match group {
            UserGroup::Pedestrians => self.pedestrians_injured,
            UserGroup::Cyclists => self.cyclists_injured,
            UserGroup::Motorists => self.motorists_injured,
        }
    }

    /// Number of killed people in the given group.
    #[must_use]
    pub const fn killed(&self, group: UserGroup) -> u32 {
        match group {
            UserGroup::Pedestrians => self.pedestrians_killed,
            UserGroup::Cyclists => self.cyclists_killed,
            UserGroup::Motorists => self.motorists_killed,
        }
    }

    /// Persons injured plus persons killed.
    #[must_use]
    pub fn severity(&self) -> u64 {
        u64::from(self.persons_injured) + u64::from(self.persons_killed)
    }

    /// Every reported contributing factor, first vehicle first.
    pub fn all_factors(&self) -> impl Iterator<Item = &str> {
        self.contributing_factor
            .as_deref()
            .into_iter()
            .chain(self.additional_factors.iter().map(String::as_str))
    }
}
