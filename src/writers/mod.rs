pub mod atomic;
pub mod csv_writer;
pub mod geojson_writer;

pub use csv_writer::{read_aggregates, AggregateCsvWriter};
pub use geojson_writer::GeoJsonWriter;
