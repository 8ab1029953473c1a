use crate::models::Observation;
use crate::utils::constants::{COL_BIRD_ID, COL_COUNTS, COL_SPECIES, DEFAULT_PRECISION};
use crate::utils::coordinates::CellCoordinate;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use std::collections::BTreeMap;

const PROP_SIGHTINGS: &str = "Sightings";

/// Rounded start lat/lon, rounded end lat/lon, species
type RouteKey = (
    CellCoordinate,
    CellCoordinate,
    CellCoordinate,
    CellCoordinate,
    String,
);

/// Builds GeoJSON LineString features from cleaned observations
pub struct RouteBuilder {
    precision: u32,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Precision used when grouping routes in [`RouteBuilder::build_aggregated_routes`]
    pub fn with_precision(precision: u32) -> Self {
        Self { precision }
    }

    /// One feature per observation, in input order
    pub fn build_routes(&self, observations: &[Observation]) -> FeatureCollection {
        let features = observations
            .iter()
            .map(|o| {
                let mut properties = JsonObject::new();
                properties.insert(COL_SPECIES.to_string(), JsonValue::from(o.species.clone()));
                properties.insert(COL_COUNTS.to_string(), JsonValue::from(o.observation_counts));
                properties.insert(COL_BIRD_ID.to_string(), JsonValue::from(o.bird_id.clone()));

                line_feature(
                    [o.start_longitude, o.start_latitude],
                    [o.end_longitude, o.end_latitude],
                    properties,
                )
            })
            .collect();

        collection(features)
    }

    /// One feature per (rounded start, rounded end, species) group.
    ///
    /// Groups are ordered by start, then end, then species. Each feature
    /// carries the summed counts and the number of rows in the group.
    pub fn build_aggregated_routes(&self, observations: &[Observation]) -> FeatureCollection {
        let mut grouped: BTreeMap<RouteKey, (f64, usize)> = BTreeMap::new();

        for o in observations {
            let key = (
                CellCoordinate::new(o.start_latitude, self.precision),
                CellCoordinate::new(o.start_longitude, self.precision),
                CellCoordinate::new(o.end_latitude, self.precision),
                CellCoordinate::new(o.end_longitude, self.precision),
                o.species.clone(),
            );
            let entry = grouped.entry(key).or_insert((0.0, 0));
            entry.0 += o.observation_counts;
            entry.1 += 1;
        }

        let features = grouped
            .into_iter()
            .map(|((start_lat, start_lon, end_lat, end_lon, species), (counts, sightings))| {
                let mut properties = JsonObject::new();
                properties.insert(COL_SPECIES.to_string(), JsonValue::from(species));
                properties.insert(COL_COUNTS.to_string(), JsonValue::from(counts));
                properties.insert(PROP_SIGHTINGS.to_string(), JsonValue::from(sightings));

                line_feature(
                    [start_lon.degrees(), start_lat.degrees()],
                    [end_lon.degrees(), end_lat.degrees()],
                    properties,
                )
            })
            .collect();

        collection(features)
    }
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `start` and `end` are `[longitude, latitude]`
fn line_feature(start: [f64; 2], end: [f64; 2], properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(vec![
            start.to_vec(),
            end.to_vec(),
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
