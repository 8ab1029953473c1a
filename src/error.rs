use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Input file {} is missing required column(s): {}", .path.display(), .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("Invalid data format in {}: {message}", .path.display())]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Failed to write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl DataError {
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::OutputWrite {
            path: path.into(),
            source,
        }
    }
}
