use crate::analyzers::AggregateAnalyzer;
use crate::cli::args::{Cli, Commands, ProcessOptions};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::error::{DataError, Result};
use crate::processors::MigrationPipeline;
use crate::utils::progress::ProgressReporter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let base_config = PipelineConfig::load(cli.config.as_deref())?;
    let quiet = cli.quiet;

    let command = cli.command.unwrap_or(Commands::Process {
        options: ProcessOptions::default(),
        validate_only: false,
    });

    match command {
        Commands::Process {
            options,
            validate_only,
        } => {
            let config = base_config.with_overrides(options.into())?;
            println!("Processing bird migration data...");
            println!("Input file: {}", config.input.display());

            let pipeline = MigrationPipeline::from_config(&config);

            if validate_only {
                let cleaned = pipeline.load_and_clean(&config.input)?;
                println!("\n{}", cleaned.report.summary());
                println!("Validation complete - no output files written");
                return Ok(());
            }

            println!("Aggregate output: {}", config.aggregate_path().display());
            println!("Routes output: {}", config.routes_path().display());

            let progress = ProgressReporter::new_spinner("Processing data...", quiet);
            let run = pipeline.run(&config, Some(&progress))?;

            println!("\n{}", run.report.summary());
            println!("{}", run.summary.summary());
            println!("Processing complete!");
        }

        Commands::Validate {
            input,
            strict_bounds,
        } => {
            let config = base_config.with_overrides(ConfigOverrides {
                input,
                strict_bounds,
                ..ConfigOverrides::default()
            })?;
            println!("Validating bird migration data...");
            println!("Input file: {}", config.input.display());

            let progress = ProgressReporter::new_spinner("Validating data...", quiet);
            let cleaned = MigrationPipeline::from_config(&config).load_and_clean(&config.input)?;
            progress.finish_with_message("Validation complete");

            println!("\n{}", cleaned.report.summary());

            if cleaned.report.dropped_rows() == 0 {
                println!("✅ All rows passed validation checks");
            } else {
                println!(
                    "⚠️  {} rows would be dropped during cleaning",
                    cleaned.report.dropped_rows()
                );
            }
        }

        Commands::Info { file, sample } => {
            let file = file.unwrap_or_else(|| base_config.aggregate_path());
            println!("Analyzing aggregate file: {}", file.display());

            let (cells, stats) = AggregateAnalyzer::new().analyze_file(&file)?;
            println!("\n{}", stats.summary());

            if sample > 0 && !cells.is_empty() {
                println!("Sample Cells (showing {} cells):", sample.min(cells.len()));
                for (i, cell) in cells.iter().take(sample).enumerate() {
                    println!(
                        "{}. ({}, {}) {}: {} observed over {} sightings ({:.1} per sighting)",
                        i + 1,
                        cell.latitude,
                        cell.longitude,
                        cell.species,
                        cell.observation_counts,
                        cell.sightings,
                        cell.mean_count_per_sighting()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the flags when set. A log file, if given, receives
/// the same events without ANSI colours.
pub fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| DataError::output_write(path, e))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| DataError::Config(format!("Failed to initialise logging: {}", e)))?;

    debug!(verbose, quiet, "Logging initialised");
    Ok(())
}
