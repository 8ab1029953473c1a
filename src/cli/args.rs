use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bird-migration-processor")]
#[command(about = "Aggregate bird-migration observations into density cells and GeoJSON routes")]
#[command(version)]
pub struct Cli {
    /// Defaults to `process` with the configured paths
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: bird-migration.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean, aggregate and export an observation table
    Process {
        #[command(flatten)]
        options: ProcessOptions,

        #[arg(long, default_value = "false", help = "Clean and report without writing outputs")]
        validate_only: bool,
    },

    /// Load and clean an observation table and report dropped rows
    Validate {
        #[arg(short, long, help = "Input CSV file [default: bird_migration_dataset.csv]")]
        input: Option<PathBuf>,

        #[arg(long, help = "Drop rows with coordinates outside world bounds")]
        strict_bounds: bool,
    },

    /// Display information about an aggregate CSV
    Info {
        #[arg(
            short,
            long,
            help = "Aggregate CSV file [default: bird_migration_start_agg.csv in the output directory]"
        )]
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProcessOptions {
    #[arg(short, long, help = "Input CSV file [default: bird_migration_dataset.csv]")]
    pub input: Option<PathBuf>,

    #[arg(short, long, help = "Directory for output files [default: .]")]
    pub output_dir: Option<PathBuf>,

    #[arg(short, long, help = "Decimal places for coordinate cells [default: 2]")]
    pub precision: Option<u32>,

    #[arg(long, help = "Drop rows with coordinates outside world bounds")]
    pub strict_bounds: bool,

    #[arg(long, help = "Pretty-print the GeoJSON output")]
    pub pretty: bool,

    #[arg(long, help = "Emit one route per rounded start/end/species group")]
    pub aggregate_routes: bool,
}

impl From<ProcessOptions> for ConfigOverrides {
    fn from(options: ProcessOptions) -> Self {
        Self {
            input: options.input,
            output_dir: options.output_dir,
            precision: options.precision,
            strict_bounds: options.strict_bounds,
            pretty_geojson: options.pretty,
            aggregate_routes: options.aggregate_routes,
        }
    }
}
