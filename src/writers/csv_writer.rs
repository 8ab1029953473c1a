use crate::error::{DataError, Result};
use crate::models::AggregatedCell;
use crate::utils::constants::AGGREGATE_HEADER;
use crate::writers::atomic::write_atomically;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::debug;

pub struct AggregateCsvWriter;

impl AggregateCsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write aggregated cells with a header row, even when there are no cells
    pub fn write_cells(&self, cells: &[AggregatedCell], path: &Path) -> Result<()> {
        write_atomically(path, |out| write_table(out, cells))?;

        debug!(path = %path.display(), cells = cells.len(), "Wrote aggregate CSV");
        Ok(())
    }

    /// Render cells to an in-memory CSV string
    pub fn to_csv_string(&self, cells: &[AggregatedCell]) -> Result<String> {
        let mut buffer = Vec::new();
        write_table(&mut buffer, cells)?;
        String::from_utf8(buffer)
            .map_err(|e| DataError::Io(std::io::Error::new(ErrorKind::InvalidData, e)))
    }
}

fn write_table<W: Write>(out: W, cells: &[AggregatedCell]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(AGGREGATE_HEADER)?;
    for cell in cells {
        writer.serialize(cell)?;
    }
    writer.flush()?;
    Ok(())
}

impl Default for AggregateCsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a previously written aggregate CSV back into cells
pub fn read_aggregates(path: &Path) -> Result<Vec<AggregatedCell>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Io(e),
    })?;

    let mut reader = ReaderBuilder::new().from_reader(file);
    let headers = reader.headers()?.clone();
    let missing: Vec<String> = AGGREGATE_HEADER
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<AggregatedCell>, _>>()
        .map_err(|e| DataError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cells() -> Vec<AggregatedCell> {
        vec![
            AggregatedCell::new(-33.9, 18.4, "Stork", 4.0, 2),
            AggregatedCell::new(40.71, -74.01, "Robin", 8.0, 2),
            AggregatedCell::new(52.0, 13.0, "Barn Swallow", 2.5, 1),
        ]
    }

    #[test]
    fn test_csv_layout() -> Result<()> {
        let csv = AggregateCsvWriter::new().to_csv_string(&cells())?;

        assert_eq!(
            csv,
            "Latitude,Longitude,Species,Observation_Counts,Sightings\n\
             -33.9,18.4,Stork,4,2\n\
             40.71,-74.01,Robin,8,2\n\
             52.0,13.0,Barn Swallow,2.5,1\n"
        );
        Ok(())
    }

    #[test]
    fn test_empty_table_still_has_header() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("agg.csv");

        AggregateCsvWriter::new().write_cells(&[], &path)?;

        assert_eq!(
            std::fs::read_to_string(&path)?,
            "Latitude,Longitude,Species,Observation_Counts,Sightings\n"
        );
        assert!(read_aggregates(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_then_read_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("agg.csv");

        AggregateCsvWriter::new().write_cells(&cells(), &path)?;
        let loaded = read_aggregates(&path)?;

        assert_eq!(loaded, cells());
        Ok(())
    }

    #[test]
    fn test_species_with_commas_are_quoted() -> Result<()> {
        let cells = vec![AggregatedCell::new(1.0, 2.0, "Warbler, Yellow", 1.0, 1)];
        let csv = AggregateCsvWriter::new().to_csv_string(&cells)?;

        assert!(csv.contains("\"Warbler, Yellow\""));
        Ok(())
    }

    #[test]
    fn test_read_rejects_foreign_csv() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("other.csv");
        std::fs::write(&path, "a,b\n1,2\n")?;

        let err = read_aggregates(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumns { .. }));
        Ok(())
    }
}
