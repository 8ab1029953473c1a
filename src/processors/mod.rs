pub mod aggregator;
pub mod cleaner;
pub mod pipeline;
pub mod route_builder;

pub use aggregator::CellAggregator;
pub use cleaner::{Cleaner, CleaningReport};
pub use pipeline::{CleanedSet, MigrationPipeline, PipelineOutput, PipelineRun, PipelineSummary};
pub use route_builder::RouteBuilder;
