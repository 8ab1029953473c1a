use crate::error::{DataError, Result};
use crate::models::RawObservation;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::debug;

/// A raw row together with the 1-based line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub line: u64,
    pub observation: RawObservation,
}

pub struct ObservationReader {
    delimiter: u8,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read every row of an observation table.
    ///
    /// Fails if the file is missing, is not a readable delimited table, or
    /// lacks any of the required columns. Row values are not typed here.
    pub fn read_observations(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => DataError::Io(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file));

        let headers = reader
            .headers()
            .map_err(|e| invalid_format(path, &e))?
            .clone();
        check_required_columns(path, &headers)?;

        let mut records = Vec::new();
        let mut row = StringRecord::new();
        loop {
            match reader.read_record(&mut row) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(invalid_format(path, &e)),
            }

            // Rows made only of delimiters carry nothing to clean
            if row.iter().all(str::is_empty) {
                continue;
            }

            let line = row.position().map_or(0, |p| p.line());
            let observation: RawObservation = row
                .deserialize(Some(&headers))
                .map_err(|e| invalid_format(path, &e))?;

            records.push(RawRecord { line, observation });
        }

        debug!(path = %path.display(), rows = records.len(), "Read observation table");
        Ok(records)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_required_columns(path: &Path, headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        })
    }
}

fn invalid_format(path: &Path, error: &csv::Error) -> DataError {
    DataError::InvalidFormat {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Bird_ID,Species,Start_Latitude,Start_Longitude,End_Latitude,End_Longitude,Observation_Counts";

    #[test]
    fn test_read_observations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "B001,Robin,40.7128,-74.0060,25.76,-80.19,3")?;
        writeln!(temp_file, "B002,Robin,40.7149,-74.0081,25.80,-80.20,")?;
        writeln!(temp_file, ",,,,,,")?;
        writeln!(temp_file, "B003, Barn Swallow ,51.5,-0.12,n/a,-3.18,1")?;

        let reader = ObservationReader::new();
        let records = reader.read_observations(temp_file.path())?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].observation.bird_id.as_deref(), Some("B001"));
        assert_eq!(records[0].observation.start_latitude.as_deref(), Some("40.7128"));
        assert_eq!(records[1].observation.observation_counts, None);
        assert_eq!(records[2].line, 5);
        assert_eq!(records[2].observation.species.as_deref(), Some("Barn Swallow"));
        assert_eq!(records[2].observation.end_latitude.as_deref(), Some("n/a"));

        Ok(())
    }

    #[test]
    fn test_extra_and_reordered_columns() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "Observation_Counts,Notes,Species,Bird_ID,End_Longitude,End_Latitude,Start_Longitude,Start_Latitude"
        )?;
        writeln!(temp_file, "4,cloudy,Stork,S9,10.0,50.0,20.0,30.0")?;

        let records = ObservationReader::new().read_observations(temp_file.path())?;

        assert_eq!(records.len(), 1);
        let row = &records[0].observation;
        assert_eq!(row.species.as_deref(), Some("Stork"));
        assert_eq!(row.start_latitude.as_deref(), Some("30.0"));
        assert_eq!(row.observation_counts.as_deref(), Some("4"));

        Ok(())
    }

    #[test]
    fn test_short_rows_read_as_missing() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "B001,Robin,40.7128,-74.0060")?;

        let records = ObservationReader::new().read_observations(temp_file.path())?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].observation.end_latitude, None);
        assert_eq!(records[0].observation.observation_counts, None);
        Ok(())
    }

    #[test]
    fn test_semicolon_delimiter() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER.replace(',', ";"))?;
        writeln!(temp_file, "B001;Robin;40.7;-74.0;25.7;-80.1;2")?;

        let records = ObservationReader::with_delimiter(b';').read_observations(temp_file.path())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].observation.observation_counts.as_deref(), Some("2"));
        Ok(())
    }

    #[test]
    fn test_missing_columns_are_named() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Bird_ID,Species,Start_Latitude,Start_Longitude").unwrap();
        writeln!(temp_file, "B001,Robin,40.7,-74.0").unwrap();

        let err = ObservationReader::new()
            .read_observations(temp_file.path())
            .unwrap_err();

        match err {
            DataError::MissingColumns { columns, .. } => assert_eq!(
                columns,
                vec!["End_Latitude", "End_Longitude", "Observation_Counts"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_has_no_columns() {
        let temp_file = NamedTempFile::new().unwrap();

        let err = ObservationReader::new()
            .read_observations(temp_file.path())
            .unwrap_err();

        match err {
            DataError::MissingColumns { columns, .. } => assert_eq!(columns.len(), 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undecodable_row_names_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", HEADER).unwrap();
        temp_file
            .write_all(b"B001,Robin,\xff\xfe,-74.0,25.7,-80.1,2\n")
            .unwrap();

        let err = ObservationReader::new()
            .read_observations(temp_file.path())
            .unwrap_err();

        match &err {
            DataError::InvalidFormat { path, .. } => assert_eq!(path, temp_file.path()),
            other => panic!("unexpected error: {other}"),
        }
        let file_name = temp_file.path().file_name().unwrap().to_string_lossy();
        assert!(err.to_string().contains(file_name.as_ref()));
    }

    #[test]
    fn test_missing_file() {
        let err = ObservationReader::new()
            .read_observations(Path::new("does/not/exist.csv"))
            .unwrap_err();

        assert!(matches!(err, DataError::InputNotFound { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
