use crate::error::Result;
use crate::utils::constants::{
    AGGREGATE_FILE, CONFIG_FILE, DEFAULT_PRECISION, ENV_PREFIX, INPUT_FILE, ROUTES_FILE,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Settings for one pipeline run.
///
/// Sources are layered lowest to highest: built-in defaults, an optional
/// `bird-migration.toml`, `BIRD_MIGRATION_*` environment variables, then
/// command-line overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct PipelineConfig {
    pub input: PathBuf,

    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub aggregate_file: String,

    #[validate(length(min = 1))]
    pub routes_file: String,

    #[validate(range(max = 10))]
    pub precision: u32,

    pub strict_bounds: bool,

    pub pretty_geojson: bool,

    pub aggregate_routes: bool,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub precision: Option<u32>,
    pub strict_bounds: bool,
    pub pretty_geojson: bool,
    pub aggregate_routes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(INPUT_FILE),
            output_dir: PathBuf::from("."),
            aggregate_file: AGGREGATE_FILE.to_string(),
            routes_file: ROUTES_FILE.to_string(),
            precision: DEFAULT_PRECISION,
            strict_bounds: false,
            pretty_geojson: false,
            aggregate_routes: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };

        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("input", defaults.input.to_string_lossy().into_owned())?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().into_owned())?
            .set_default("aggregate_file", defaults.aggregate_file)?
            .set_default("routes_file", defaults.routes_file)?
            .set_default("precision", i64::from(defaults.precision))?
            .set_default("strict_bounds", defaults.strict_bounds)?
            .set_default("pretty_geojson", defaults.pretty_geojson)?
            .set_default("aggregate_routes", defaults.aggregate_routes)?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(input) = overrides.input {
            self.input = input;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(precision) = overrides.precision {
            self.precision = precision;
        }
        self.strict_bounds |= overrides.strict_bounds;
        self.pretty_geojson |= overrides.pretty_geojson;
        self.aggregate_routes |= overrides.aggregate_routes;

        self.validate()?;
        Ok(self)
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.output_dir.join(&self.aggregate_file)
    }

    pub fn routes_path(&self) -> PathBuf {
        self.output_dir.join(&self.routes_file)
    }
}
