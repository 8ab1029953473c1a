use crate::error::Result;
use crate::models::AggregatedCell;
use crate::writers::read_aggregates;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStatistics {
    pub cell_count: usize,
    pub total_observations: f64,
    pub total_sightings: usize,
    pub species_totals: BTreeMap<String, f64>,
    pub bounds: Option<GeographicBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub struct AggregateAnalyzer;

impl AggregateAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze_file(&self, path: &Path) -> Result<(Vec<AggregatedCell>, AggregateStatistics)> {
        let cells = read_aggregates(path)?;
        let stats = self.analyze(&cells);
        Ok((cells, stats))
    }

    pub fn analyze(&self, cells: &[AggregatedCell]) -> AggregateStatistics {
        let mut species_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut bounds: Option<GeographicBounds> = None;

        for cell in cells {
            *species_totals.entry(cell.species.clone()).or_default() += cell.observation_counts;

            bounds = Some(match bounds {
                None => GeographicBounds {
                    min_lat: cell.latitude,
                    max_lat: cell.latitude,
                    min_lon: cell.longitude,
                    max_lon: cell.longitude,
                },
                Some(b) => GeographicBounds {
                    min_lat: b.min_lat.min(cell.latitude),
                    max_lat: b.max_lat.max(cell.latitude),
                    min_lon: b.min_lon.min(cell.longitude),
                    max_lon: b.max_lon.max(cell.longitude),
                },
            });
        }

        AggregateStatistics {
            cell_count: cells.len(),
            total_observations: cells.iter().map(|c| c.observation_counts).sum(),
            total_sightings: cells.iter().map(|c| c.sightings).sum(),
            species_totals,
            bounds,
        }
    }
}

impl Default for AggregateAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStatistics {
    /// Species ordered by total observations, largest first
    pub fn top_species(&self, limit: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .species_totals
            .iter()
            .map(|(species, total)| (species.as_str(), *total))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Aggregate Summary ===\n");
        summary.push_str(&format!("Cells: {}\n", self.cell_count));
        summary.push_str(&format!("Species: {}\n", self.species_totals.len()));
        summary.push_str(&format!("Total Observations: {}\n", self.total_observations));
        summary.push_str(&format!("Total Sightings: {}\n", self.total_sightings));

        if let Some(b) = &self.bounds {
            summary.push_str(&format!(
                "Bounds: lat [{}, {}], lon [{}, {}]\n",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            ));
        }

        let top = self.top_species(5);
        if !top.is_empty() {
            summary.push_str("\nTop Species:\n");
            for (i, (species, total)) in top.iter().enumerate() {
                summary.push_str(&format!("  {}. {}: {}\n", i + 1, species, total));
            }
        }

        summary
    }
}
