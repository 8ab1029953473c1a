use crate::utils::constants::{MAX_LAT, MAX_LON, MAX_PRECISION, MIN_LAT, MIN_LON};
use std::cmp::Ordering;

/// Round a coordinate to `precision` decimal places, breaking ties to even.
///
/// The value is scaled by `10^precision`, rounded half-to-even and scaled
/// back, so the result matches what NumPy's `round` produces for the same
/// input.
///
/// # Examples
/// ```
/// use bird_migration_processor::utils::round_coordinate;
///
/// assert_eq!(round_coordinate(40.7128, 2), 40.71);
/// assert_eq!(round_coordinate(0.125, 2), 0.12);
/// ```
pub fn round_coordinate(value: f64, precision: u32) -> f64 {
    let scale = scale_factor(precision);
    (value * scale).round_ties_even() / scale
}

/// A rounded coordinate usable as an exact, ordered grouping key.
///
/// Holds the value produced by [`round_coordinate`], with `-0.0` folded into
/// `0.0`. Equality is bitwise and ordering follows [`f64::total_cmp`], so any
/// finite magnitude groups correctly.
#[derive(Debug, Clone, Copy)]
pub struct CellCoordinate(f64);

impl CellCoordinate {
    pub fn new(value: f64, precision: u32) -> Self {
        Self(round_coordinate(value, precision) + 0.0)
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl PartialEq for CellCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for CellCoordinate {}

impl PartialOrd for CellCoordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn scale_factor(precision: u32) -> f64 {
    10f64.powi(precision.min(MAX_PRECISION) as i32)
}

pub fn is_valid_latitude(latitude: f64) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    (MIN_LON..=MAX_LON).contains(&longitude)
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
