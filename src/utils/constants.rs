/// File names
pub const INPUT_FILE: &str = "bird_migration_dataset.csv";
pub const AGGREGATE_FILE: &str = "bird_migration_start_agg.csv";
pub const ROUTES_FILE: &str = "routes.geojson";
pub const CONFIG_FILE: &str = "bird-migration.toml";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BIRD_MIGRATION";

/// Input column names
pub const COL_BIRD_ID: &str = "Bird_ID";
pub const COL_SPECIES: &str = "Species";
pub const COL_START_LAT: &str = "Start_Latitude";
pub const COL_START_LON: &str = "Start_Longitude";
pub const COL_END_LAT: &str = "End_Latitude";
pub const COL_END_LON: &str = "End_Longitude";
pub const COL_COUNTS: &str = "Observation_Counts";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_BIRD_ID,
    COL_SPECIES,
    COL_START_LAT,
    COL_START_LON,
    COL_END_LAT,
    COL_END_LON,
    COL_COUNTS,
];

/// Aggregated output header, in column order
pub const AGGREGATE_HEADER: [&str; 5] = [
    "Latitude",
    "Longitude",
    "Species",
    "Observation_Counts",
    "Sightings",
];

/// Rounding precision (decimal places); 2 places is roughly a 1.1 km cell
pub const DEFAULT_PRECISION: u32 = 2;
pub const MAX_PRECISION: u32 = 10;

/// World geographic bounds
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
