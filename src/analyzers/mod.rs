pub mod aggregate_analyzer;

pub use aggregate_analyzer::{AggregateAnalyzer, AggregateStatistics, GeographicBounds};
