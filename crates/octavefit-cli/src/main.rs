//! octavefit - fit a melody into a transposing instrument's range
//!
//! Subcommands:
//! - `octavefit fit [FILE...]` - Print the `\transpose` command for each source
//! - `octavefit extract <file>` - Print the `MIDI:` line for a notation file
//! - `octavefit instruments` - List instrument profiles
//! - `octavefit directive <text> [NOTE...]` - Parse a `\transpose` command,
//!   or transpose pitch classes with it
//! - `octavefit config` - Show the effective configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use octavefit_conf::OctaveFitConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod report;

#[derive(Parser)]
#[command(name = "octavefit")]
#[command(about = "Pick the octave shift that fits a melody to a transposing instrument")]
#[command(version)]
struct Cli {
    /// Config file, replacing ./octavefit.toml
    #[arg(long, global = true, env = "OCTAVEFIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit notation files, or a MIDI: line on stdin
    Fit {
        /// LilyPond sources or music-expression dumps
        files: Vec<PathBuf>,

        /// Target instrument (see `octavefit instruments`)
        #[arg(short, long)]
        instrument: Option<String>,

        /// Octaves to search in each direction
        #[arg(short = 'r', long)]
        shift_range: Option<u32>,

        /// Print the full report
        #[arg(short, long)]
        verbose: bool,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the MIDI: line for a notation file
    Extract {
        file: PathBuf,
    },

    /// List instrument profiles
    Instruments,

    /// Parse a \transpose command and print its interval, or transpose notes
    Directive {
        /// e.g. '\transpose c a,'
        text: String,

        /// Pitch classes to transpose (e.g. c e bf)
        notes: Vec<String>,
    },

    /// Show the effective configuration and where it came from
    Config,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = OctaveFitConfig::load_with_sources_from(cli.config.as_deref())?;
    init_tracing(&config.telemetry.log_level);
    tracing::debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    match cli.command {
        Commands::Fit {
            files,
            instrument,
            shift_range,
            verbose,
            json,
        } => {
            commands::fit_notes(
                &config,
                commands::FitArgs {
                    files,
                    instrument,
                    shift_range,
                    verbose,
                    json,
                },
            )?;
        }
        Commands::Extract { file } => {
            commands::extract_file(file)?;
        }
        Commands::Instruments => {
            commands::instruments(&config)?;
        }
        Commands::Directive { text, notes } => {
            commands::directive(&text, &notes)?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources)?;
        }
    }

    Ok(())
}
