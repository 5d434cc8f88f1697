//! Subcommand implementations.

use anyhow::{Context, Result};
use octavefit::{
    check_shift_range, fit, to_midi_list, FitError, FitReport, Instrument, TransposeDirective,
};
use octavefit_conf::{ConfigSources, OctaveFitConfig};
use serde::Serialize;
use std::path::PathBuf;

use crate::input::{self, Notes};
use crate::report::{self, Palette};

/// Options for `octavefit fit`
#[derive(Debug, Clone, Default)]
pub struct FitArgs {
    pub files: Vec<PathBuf>,
    pub instrument: Option<String>,
    pub shift_range: Option<u32>,
    pub verbose: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct SourceReport<'a> {
    source: String,
    #[serde(flatten)]
    report: &'a FitReport,
}

fn palette(config: &OctaveFitConfig) -> Palette {
    Palette {
        color: config.report.color && atty::is(atty::Stream::Stdout),
    }
}

pub fn fit_notes(config: &OctaveFitConfig, args: FitArgs) -> Result<()> {
    // Validate before touching any input
    let instrument = match &args.instrument {
        Some(name) => name.parse::<Instrument>()?,
        None => config.fit.instrument,
    };
    let shift_range = check_shift_range(args.shift_range.unwrap_or(config.fit.shift_range))?;

    let inputs: Vec<Notes> = if args.files.is_empty() {
        vec![input::read_stdin(&config.fit.default_midi)?]
    } else {
        args.files
            .iter()
            .map(|path| input::read_notation(path))
            .collect::<Result<_>>()?
    };

    let reports: Vec<(String, FitReport)> = inputs
        .into_iter()
        .map(|input| {
            let label = input.origin.label();
            Ok((label, fit(input.notes, instrument, shift_range)?))
        })
        .collect::<Result<_, FitError>>()?;

    if args.json {
        let out: Vec<SourceReport> = reports
            .iter()
            .map(|(source, report)| SourceReport {
                source: source.clone(),
                report,
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("Failed to format JSON")?
        );
        return Ok(());
    }

    let verbose = args.verbose || config.report.verbose;
    let palette = palette(config);
    let several = reports.len() > 1;

    for (source, report) in &reports {
        if verbose {
            println!("{}", report::render_fit(source, report, palette)?);
        } else if several {
            println!("{}: {}", source, report.command);
        } else {
            println!("{}", report.command);
        }
    }

    Ok(())
}

pub fn extract_file(path: PathBuf) -> Result<()> {
    let notes = input::read_notation(&path)?;
    println!("{}", to_midi_list(&notes.notes));
    Ok(())
}

pub fn instruments(config: &OctaveFitConfig) -> Result<()> {
    print!("{}", report::render_instruments(palette(config))?);
    Ok(())
}

/// Describe a `\transpose` command, or apply it to pitch classes when
/// `notes` are given.
pub fn directive(text: &str, notes: &[String]) -> Result<()> {
    let directive = TransposeDirective::parse(text)?;

    if !notes.is_empty() {
        let moved = notes
            .iter()
            .map(|note| {
                directive
                    .transpose_pitch_class(note)
                    .ok_or_else(|| FitError::UnknownPitch(note.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", moved.join(" "));
        return Ok(());
    }

    let interval = directive.interval();
    println!("{}", directive);
    println!(
        "interval: {:+} semitones ({:+} octaves {:+})",
        interval,
        interval.div_euclid(12),
        interval.rem_euclid(12)
    );
    Ok(())
}

pub fn show_config(config: &OctaveFitConfig, sources: &ConfigSources) -> Result<()> {
    for file in &sources.files {
        println!("# loaded: {}", file.display());
    }
    for var in &sources.env_overrides {
        println!("# env: {}", var);
    }
    print!("{}", config.to_toml());
    Ok(())
}
