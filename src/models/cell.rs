use serde::{Deserialize, Serialize, Serializer};

/// One row of the aggregated density table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCell {
    #[serde(rename = "Latitude")]
    pub latitude: f64,

    #[serde(rename = "Longitude")]
    pub longitude: f64,

    #[serde(rename = "Species")]
    pub species: String,

    #[serde(rename = "Observation_Counts", serialize_with = "serialize_count")]
    pub observation_counts: f64,

    #[serde(rename = "Sightings")]
    pub sightings: usize,
}

impl AggregatedCell {
    pub fn new(
        latitude: f64,
        longitude: f64,
        species: impl Into<String>,
        observation_counts: f64,
        sightings: usize,
    ) -> Self {
        Self {
            latitude,
            longitude,
            species: species.into(),
            observation_counts,
            sightings,
        }
    }

    pub fn mean_count_per_sighting(&self) -> f64 {
        if self.sightings == 0 {
            0.0
        } else {
            self.observation_counts / self.sightings as f64
        }
    }
}

/// Whole-number counts are written without a fractional part (`8`, not `8.0`)
pub fn serialize_count<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
