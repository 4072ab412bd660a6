// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;
use database::{DatabaseConnection, Repository};

mod app_config;
mod app_controller;
mod database;
mod errors;
mod file_utils;
mod log_reader;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest matching log files into the raw-log table (default command)
    #[command(alias = "load")]
    Ingest(IngestArgs),

    /// Print row and file counts for the raw-log database
    Stats {
        /// Database file to inspect (defaults to the configured location)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for soho-etl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct IngestArgs {
    /// Directory scanned for log files
    #[arg(short = 'd', long)]
    log_directory: Option<PathBuf>,

    /// Regular expression matched against filenames, anchored at the start
    #[arg(short = 'm', long)]
    match_regex: Option<String>,

    /// SQLite database file receiving the rows
    #[arg(long)]
    database: Option<PathBuf>,

    /// Force overwrite of a file already present in the completed directory
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// soho-etl - raw log file loader
///
/// Scans a directory for log files matching a pattern, loads each line
/// verbatim into an append-only SQLite table, verifies the loaded row
/// count against the lines read, and moves verified files into the
/// etl_complete/ subdirectory.
#[derive(Parser, Debug)]
#[command(name = "soho-etl")]
#[command(version = "1.0.0")]
#[command(about = "Load raw log files into a relational table, verify, and archive")]
#[command(long_about = "soho-etl loads raw log files line-by-line into an append-only SQLite table.

Each file is processed on its own: every line becomes one row
(source_file, line_number, raw_line), the loaded row count is compared
against the number of lines read, and only files whose counts match are
moved into <log_directory>/etl_complete/. Files that fail verification
or archiving stay in place for manual inspection and retry.

EXAMPLES:
    soho-etl                                    # Ingest using conf.json defaults
    soho-etl -d /var/log/soho                   # Scan a specific directory
    soho-etl -m 'soho\\.log-\\d{8}'               # Select files by pattern
    soho-etl --database /srv/etl/raw.db         # Load into a specific database
    soho-etl -f                                 # Overwrite archived files of the same name
    soho-etl stats                              # Show row and file counts
    soho-etl completions bash > soho-etl.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory scanned for log files
    #[arg(short = 'd', long)]
    log_directory: Option<PathBuf>,

    /// Regular expression matched against filenames, anchored at the start
    #[arg(short = 'm', long)]
    match_regex: Option<String>,

    /// SQLite database file receiving the rows
    #[arg(long)]
    database: Option<PathBuf>,

    /// Force overwrite of a file already present in the completed directory
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "soho-etl", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Stats {
            database,
            config_path,
        }) => run_stats(database, &config_path),
        Some(Commands::Ingest(args)) => run_ingest(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let ingest_args = IngestArgs {
                log_directory: cli.log_directory,
                match_regex: cli.match_regex,
                database: cli.database,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_ingest(ingest_args)
        }
    }
}

fn run_ingest(options: IngestArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(log_directory) = &options.log_directory {
        config.log_directory = log_directory.clone();
    }

    if let Some(match_regex) = &options.match_regex {
        config.match_regex = match_regex.clone();
    }

    if let Some(database) = &options.database {
        config.database.path = Some(database.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // The shared connection is established once, before any file is
    // processed; failure here aborts the whole run.
    let repository = open_repository(config.database_path())
        .context("Unable to connect to database")?;

    debug!("Backed by SQLite {}", repository.database_version()?);

    let controller = Controller::with_config(config, repository)?;
    let summary = controller.run(options.force_overwrite)?;

    if summary.failed_count() > 0 {
        warn!(
            "{} of {} file(s) were not archived; inspect them in the log directory and re-run",
            summary.failed_count(),
            summary.reports.len()
        );
    }

    Ok(())
}

fn run_stats(database: Option<PathBuf>, config_path: &str) -> Result<()> {
    let mut config = load_or_create_config(config_path)?;

    if let Some(database) = database {
        config.database.path = Some(database);
    }

    let repository = open_repository(config.database_path())
        .context("Unable to connect to database")?;

    let stats = repository.stats()?;
    println!("{}", stats);

    Ok(())
}

// Helper to open the repository at the configured or default location
fn open_repository(path: Option<&Path>) -> Result<Repository> {
    let connection = match path {
        Some(path) => DatabaseConnection::new(path)?,
        None => DatabaseConnection::new_default()?,
    };
    Ok(Repository::new(connection))
}

// Helper to load the config file, creating a default one if absent
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
