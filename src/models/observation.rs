use serde::Deserialize;
use std::fmt;
use validator::Validate;

use crate::utils::constants::{COL_COUNTS, COL_END_LAT, COL_END_LON, COL_START_LAT, COL_START_LON};

/// One input row exactly as it appears in the source table.
///
/// Every field is optional text; typing happens in [`Observation::from_raw`]
/// so that a malformed value drops a single row instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawObservation {
    #[serde(rename = "Bird_ID")]
    pub bird_id: Option<String>,

    #[serde(rename = "Species")]
    pub species: Option<String>,

    #[serde(rename = "Start_Latitude")]
    pub start_latitude: Option<String>,

    #[serde(rename = "Start_Longitude")]
    pub start_longitude: Option<String>,

    #[serde(rename = "End_Latitude")]
    pub end_latitude: Option<String>,

    #[serde(rename = "End_Longitude")]
    pub end_longitude: Option<String>,

    #[serde(rename = "Observation_Counts")]
    pub observation_counts: Option<String>,
}

/// A cleaned observation: every numeric field is present and finite
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Observation {
    pub bird_id: String,
    pub species: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub start_latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub start_longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub end_latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub end_longitude: f64,

    #[validate(range(min = 0.0))]
    pub observation_counts: f64,
}

/// Why a raw row was left out of the cleaned set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    InvalidCoordinate { column: &'static str },
    InvalidCount,
    NegativeCount,
    OutOfBounds,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InvalidCoordinate { column } => {
                write!(f, "missing or non-numeric {}", column)
            }
            DropReason::InvalidCount => write!(f, "missing or non-numeric {}", COL_COUNTS),
            DropReason::NegativeCount => write!(f, "negative {}", COL_COUNTS),
            DropReason::OutOfBounds => write!(f, "coordinate outside world bounds"),
        }
    }
}

impl Observation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bird_id: impl Into<String>,
        species: impl Into<String>,
        start_latitude: f64,
        start_longitude: f64,
        end_latitude: f64,
        end_longitude: f64,
        observation_counts: f64,
    ) -> Self {
        Self {
            bird_id: bird_id.into(),
            species: species.into(),
            start_latitude,
            start_longitude,
            end_latitude,
            end_longitude,
            observation_counts,
        }
    }

    /// Coerce a raw row into a typed observation.
    ///
    /// Empty, non-numeric and non-finite values all count as missing.
    /// Negative counts are rejected as [`DropReason::NegativeCount`]; a plain
    /// numeric coercion would keep them and let them reduce cell totals.
    /// Bounds are not checked here; see [`Observation::is_within_world_bounds`].
    pub fn from_raw(raw: &RawObservation) -> std::result::Result<Self, DropReason> {
        let coordinate = |value: &Option<String>, column: &'static str| {
            parse_number(value.as_deref()).ok_or(DropReason::InvalidCoordinate { column })
        };

        let start_latitude = coordinate(&raw.start_latitude, COL_START_LAT)?;
        let start_longitude = coordinate(&raw.start_longitude, COL_START_LON)?;
        let end_latitude = coordinate(&raw.end_latitude, COL_END_LAT)?;
        let end_longitude = coordinate(&raw.end_longitude, COL_END_LON)?;

        let observation_counts =
            parse_number(raw.observation_counts.as_deref()).ok_or(DropReason::InvalidCount)?;
        if observation_counts < 0.0 {
            return Err(DropReason::NegativeCount);
        }

        Ok(Self {
            bird_id: text_field(&raw.bird_id),
            species: text_field(&raw.species),
            start_latitude,
            start_longitude,
            end_latitude,
            end_longitude,
            observation_counts,
        })
    }

    pub fn is_within_world_bounds(&self) -> bool {
        self.validate().is_ok()
    }

    /// Great-circle length of the start→end segment in kilometres
    pub fn route_length_km(&self) -> f64 {
        crate::utils::haversine_distance(
            self.start_latitude,
            self.start_longitude,
            self.end_latitude,
            self.end_longitude,
        )
    }
}

/// Parse a numeric cell, treating blanks, garbage and NaN/inf as missing
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn text_field(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
