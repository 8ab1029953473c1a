use crate::error::{DataError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `path` through a sibling temporary file that replaces the target
/// only once `write` and the final flush have both succeeded.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| DataError::output_write(path, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| DataError::output_write(path, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer
            .flush()
            .map_err(|e| DataError::output_write(path, e))?;
    }

    temp.persist(path)
        .map_err(|e| DataError::output_write(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested/out/data.txt");

        write_atomically(&path, |w| {
            w.write_all(b"hello")?;
            Ok(())
        })?;

        assert_eq!(std::fs::read_to_string(&path)?, "hello");
        Ok(())
    }

    #[test]
    fn test_failed_write_keeps_previous_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("data.txt");
        std::fs::write(&path, "previous")?;

        let result = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            Err(DataError::Config("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path)?, "previous");

        let leftovers = std::fs::read_dir(temp_dir.path())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }
}
