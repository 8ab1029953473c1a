use crate::models::{AggregatedCell, Observation};
use crate::utils::constants::DEFAULT_PRECISION;
use crate::utils::coordinates::CellCoordinate;
use std::collections::BTreeMap;

/// Grouping key: rounded start coordinates plus species
type CellKey = (CellCoordinate, CellCoordinate, String);

#[derive(Debug, Default, Clone, Copy)]
struct CellTotals {
    observation_counts: f64,
    sightings: usize,
}

/// Groups observations into rounded start-coordinate cells per species
pub struct CellAggregator {
    precision: u32,
}

impl CellAggregator {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Aggregate observations into cells sorted by (latitude, longitude, species).
    ///
    /// Coordinates are grouped on their rounded values, so grouping is exact
    /// at any finite magnitude.
    pub fn aggregate(&self, observations: &[Observation]) -> Vec<AggregatedCell> {
        let mut grouped: BTreeMap<CellKey, CellTotals> = BTreeMap::new();

        for observation in observations {
            let key = (
                CellCoordinate::new(observation.start_latitude, self.precision),
                CellCoordinate::new(observation.start_longitude, self.precision),
                observation.species.clone(),
            );
            let totals = grouped.entry(key).or_default();
            totals.observation_counts += observation.observation_counts;
            totals.sightings += 1;
        }

        grouped
            .into_iter()
            .map(|((lat, lon, species), totals)| {
                AggregatedCell::new(
                    lat.degrees(),
                    lon.degrees(),
                    species,
                    totals.observation_counts,
                    totals.sightings,
                )
            })
            .collect()
    }
}

impl Default for CellAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obs(species: &str, lat: f64, lon: f64, count: f64) -> Observation {
        Observation::new("B", species, lat, lon, 0.0, 0.0, count)
    }

    #[test]
    fn test_rows_in_same_cell_are_merged() {
        let observations = vec![
            obs("Robin", 40.7128, -74.0060, 3.0),
            obs("Robin", 40.7149, -74.0081, 5.0),
        ];

        let cells = CellAggregator::new().aggregate(&observations);

        assert_eq!(cells, vec![AggregatedCell::new(40.71, -74.01, "Robin", 8.0, 2)]);
    }

    #[test]
    fn test_species_split_cells() {
        let observations = vec![
            obs("Robin", 40.7128, -74.0060, 3.0),
            obs("Crow", 40.7130, -74.0061, 1.0),
        ];

        let cells = CellAggregator::new().aggregate(&observations);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].species, "Crow");
        assert_eq!(cells[1].species, "Robin");
    }

    #[test]
    fn test_output_sorted_by_lat_lon_species() {
        let observations = vec![
            obs("Robin", 51.5, -0.12, 1.0),
            obs("Stork", -33.9, 18.4, 2.0),
            obs("Crow", 51.5, -3.18, 1.0),
            obs("Adelie Penguin", -33.9, 18.4, 4.0),
        ];

        let cells = CellAggregator::new().aggregate(&observations);
        let keys: Vec<(f64, f64, &str)> = cells
            .iter()
            .map(|c| (c.latitude, c.longitude, c.species.as_str()))
            .collect();

        assert_eq!(
            keys,
            vec![
                (-33.9, 18.4, "Adelie Penguin"),
                (-33.9, 18.4, "Stork"),
                (51.5, -3.18, "Crow"),
                (51.5, -0.12, "Robin"),
            ]
        );
    }

    #[test]
    fn test_conservation_of_counts_and_sightings() {
        let observations: Vec<Observation> = (0..200)
            .map(|i| {
                let species = ["Robin", "Crow", "Stork"][i % 3];
                obs(species, 40.0 + (i % 7) as f64 * 0.003, -74.0 - (i % 5) as f64 * 0.004, (i % 4) as f64)
            })
            .collect();

        let cells = CellAggregator::new().aggregate(&observations);

        let input_total: f64 = observations.iter().map(|o| o.observation_counts).sum();
        let output_total: f64 = cells.iter().map(|c| c.observation_counts).sum();
        let sightings: usize = cells.iter().map(|c| c.sightings).sum();

        assert_eq!(input_total, output_total);
        assert_eq!(sightings, observations.len());
    }

    #[test]
    fn test_coarser_precision_merges_more() {
        let observations = vec![
            obs("Robin", 40.71, -74.01, 1.0),
            obs("Robin", 40.74, -74.03, 1.0),
        ];

        assert_eq!(CellAggregator::with_precision(2).aggregate(&observations).len(), 2);

        let coarse = CellAggregator::with_precision(1).aggregate(&observations);
        assert_eq!(coarse, vec![AggregatedCell::new(40.7, -74.0, "Robin", 2.0, 2)]);
    }

    #[test]
    fn test_tie_breaks_to_even() {
        let observations = vec![obs("Robin", 0.125, 0.375, 1.0)];
        let cells = CellAggregator::new().aggregate(&observations);

        assert_eq!(cells[0].latitude, 0.12);
        assert_eq!(cells[0].longitude, 0.38);
    }

    #[test]
    fn test_distant_large_coordinates_stay_separate() {
        let observations = vec![
            obs("Robin", 1e17, 0.0, 1.0),
            obs("Robin", 3e17, 0.0, 1.0),
        ];

        let cells = CellAggregator::new().aggregate(&observations);

        assert_eq!(
            cells,
            vec![
                AggregatedCell::new(1e17, 0.0, "Robin", 1.0, 1),
                AggregatedCell::new(3e17, 0.0, "Robin", 1.0, 1),
            ]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        assert!(CellAggregator::new().aggregate(&[]).is_empty());
    }
}
