//! Binary entry point for csvrecord.
//!
//! This binary provides a small CLI over the record reader and writer.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use csvrecord::cli::{self, SelectOptions};
use csvrecord::config::{CONFIG_PATH_ENV, CsvRecordConfig, parse_byte};
use csvrecord::observability;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// csvrecord - header-aware delimited records.
#[derive(Parser)]
#[command(name = "csvrecord")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<String>,

    /// Field delimiter (one ASCII character, or `tab`).
    #[arg(short, long, global = true)]
    delimiter: Option<String>,

    /// Strip leading whitespace from every field.
    #[arg(long, global = true)]
    trim_leading: bool,

    /// Strip trailing whitespace from header names and values.
    #[arg(long, global = true)]
    trim_trailing: bool,

    /// Accept rows whose length differs from the header.
    #[arg(long, global = true)]
    flexible: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the header's field names.
    Fields {
        /// Input file, `-` for stdin.
        #[arg(default_value = "-")]
        input: String,
    },

    /// Print every record as a JSON object per line.
    Cat {
        /// Input file, `-` for stdin.
        #[arg(default_value = "-")]
        input: String,
    },

    /// Re-emit records under a new field list.
    Select {
        /// Input file, `-` for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output fields (comma-separated).
        #[arg(short, long)]
        fields: String,

        /// Drop input columns not in the field list instead of failing.
        #[arg(long)]
        allow_unknown: bool,

        /// Do not write the header row.
        #[arg(long)]
        no_header: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &CsvRecordConfig) -> csvrecord::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Fields { input } => {
            cli::cmd_fields(cli::open_input(&input)?, &mut out, &config.reader)?;
        },
        Commands::Cat { input } => {
            cli::cmd_cat(cli::open_input(&input)?, &mut out, &config.reader)?;
        },
        Commands::Select {
            input,
            fields,
            allow_unknown,
            no_header,
        } => {
            let options = SelectOptions {
                fields: cli::parse_field_list(&fields)?,
                allow_unknown,
                write_header: !no_header,
            };
            cli::cmd_select(
                cli::open_input(&input)?,
                &mut out,
                &config.reader,
                &config.writer,
                &options,
            )?;
        },
    }

    out.flush()
        .map_err(|e| csvrecord::Error::Write {
            operation: "flush_stdout".to_string(),
            cause: e.to_string(),
        })
}

/// Loads configuration and applies command-line overrides.
fn load_config(cli: &Cli) -> csvrecord::Result<CsvRecordConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) if !path.trim().is_empty() => CsvRecordConfig::load_from_file(Path::new(path))?,
        _ => CsvRecordConfig::load_default()?,
    };

    let mut dialect = config.dialect;
    if let Some(delimiter) = cli.delimiter.as_deref() {
        dialect.delimiter = parse_byte("delimiter", delimiter)?;
    }
    if cli.trim_leading {
        dialect.trim_leading_space = true;
    }
    if cli.flexible {
        dialect.flexible = true;
    }
    config.set_dialect(dialect);

    if cli.trim_trailing {
        config.reader.trim_trailing_space = true;
    }

    Ok(config)
}
