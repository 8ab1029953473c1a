use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{AggregatedCell, Observation};
use crate::processors::{CellAggregator, Cleaner, CleaningReport, RouteBuilder};
use crate::readers::ObservationReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::{AggregateCsvWriter, GeoJsonWriter};
use geojson::FeatureCollection;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Typed rows that survived cleaning, with the report describing the pass
#[derive(Debug, Clone)]
pub struct CleanedSet {
    pub observations: Vec<Observation>,
    pub report: CleaningReport,
}

/// Derived artifacts for one cleaned set, before they are written
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub cells: Vec<AggregatedCell>,
    pub routes: FeatureCollection,
    pub summary: PipelineSummary,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub cleaned_rows: usize,
    pub aggregated_cells: usize,
    pub species_count: usize,
    pub route_features: usize,
    pub total_observations: f64,
    pub total_route_km: f64,
}

impl PipelineSummary {
    pub fn mean_route_km(&self) -> f64 {
        if self.cleaned_rows == 0 {
            0.0
        } else {
            self.total_route_km / self.cleaned_rows as f64
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Run Summary ===\n");
        summary.push_str(&format!("Cleaned Rows: {}\n", self.cleaned_rows));
        summary.push_str(&format!("Aggregated Cells: {}\n", self.aggregated_cells));
        summary.push_str(&format!("Species: {}\n", self.species_count));
        summary.push_str(&format!("Route Features: {}\n", self.route_features));
        summary.push_str(&format!("Total Observations: {}\n", self.total_observations));
        summary.push_str(&format!(
            "Route Length: {:.1} km total, {:.1} km mean\n",
            self.total_route_km,
            self.mean_route_km()
        ));
        summary
    }
}

/// Result of a complete run that wrote both artifacts
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: CleaningReport,
    pub summary: PipelineSummary,
}

pub struct MigrationPipeline {
    precision: u32,
    strict_bounds: bool,
    aggregate_routes: bool,
}

impl MigrationPipeline {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            strict_bounds: false,
            aggregate_routes: false,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.precision)
            .with_strict_bounds(config.strict_bounds)
            .with_aggregate_routes(config.aggregate_routes)
    }

    pub fn with_strict_bounds(mut self, strict_bounds: bool) -> Self {
        self.strict_bounds = strict_bounds;
        self
    }

    pub fn with_aggregate_routes(mut self, aggregate_routes: bool) -> Self {
        self.aggregate_routes = aggregate_routes;
        self
    }

    /// Load the observation table and reduce it to typed, usable rows
    pub fn load_and_clean(&self, input: &Path) -> Result<CleanedSet> {
        let raw = ObservationReader::new().read_observations(input)?;
        let (observations, report) = Cleaner::with_strict_bounds(self.strict_bounds).clean(&raw);

        info!(
            input = %input.display(),
            total = report.total_rows,
            kept = report.kept_rows,
            dropped = report.dropped_rows(),
            "Cleaned observation table"
        );

        Ok(CleanedSet {
            observations,
            report,
        })
    }

    /// Build the aggregated table and the route collection from cleaned rows
    pub fn process(&self, observations: &[Observation]) -> PipelineOutput {
        let cells = CellAggregator::with_precision(self.precision).aggregate(observations);

        let route_builder = RouteBuilder::with_precision(self.precision);
        let routes = if self.aggregate_routes {
            route_builder.build_aggregated_routes(observations)
        } else {
            route_builder.build_routes(observations)
        };

        let species: HashSet<&str> = observations.iter().map(|o| o.species.as_str()).collect();
        let summary = PipelineSummary {
            cleaned_rows: observations.len(),
            aggregated_cells: cells.len(),
            species_count: species.len(),
            route_features: routes.features.len(),
            total_observations: observations.iter().map(|o| o.observation_counts).sum(),
            total_route_km: observations.iter().map(Observation::route_length_km).sum(),
        };

        PipelineOutput {
            cells,
            routes,
            summary,
        }
    }

    /// Run load, clean, aggregate and export, writing both output files.
    ///
    /// The run fails if either file cannot be written.
    pub fn run(
        &self,
        config: &PipelineConfig,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineRun> {
        if let Some(p) = progress {
            p.set_message("Reading observations...");
        }
        let cleaned = self.load_and_clean(&config.input)?;

        if let Some(p) = progress {
            p.set_message("Aggregating observations...");
        }
        let output = self.process(&cleaned.observations);

        if let Some(p) = progress {
            p.set_message("Writing outputs...");
        }
        let aggregate_path = config.aggregate_path();
        AggregateCsvWriter::new().write_cells(&output.cells, &aggregate_path)?;
        info!(path = %aggregate_path.display(), cells = output.cells.len(), "Saved aggregate CSV");

        let routes_path = config.routes_path();
        GeoJsonWriter::with_pretty(config.pretty_geojson)
            .write_collection(&output.routes, &routes_path)?;
        info!(
            path = %routes_path.display(),
            features = output.routes.features.len(),
            "Saved route GeoJSON"
        );

        if let Some(p) = progress {
            p.finish_with_message("Processing complete");
        }

        Ok(PipelineRun {
            report: cleaned.report,
            summary: output.summary,
        })
    }
}

impl Default for MigrationPipeline {
    fn default() -> Self {
        Self::new(crate::utils::constants::DEFAULT_PRECISION)
    }
}
