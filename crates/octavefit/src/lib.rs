//! LilyPond pitch extraction and octave fitting for transposing instruments.
//!
//! The pipeline has three stages: extract MIDI notes from notation text,
//! pick the octave shift that best fits an instrument's range, and render
//! the result as a `\transpose` command.
//!
//! # Example
//!
//! ```
//! use octavefit::{fit_notation, Instrument};
//!
//! let source = r#"
//! \version "2.24.0"
//! \relative { f'4 c c d e c' d e }
//! "#;
//!
//! let result = fit_notation(source, Instrument::EbClarinet, 1)?;
//! if !result.has_errors() {
//!     println!("{}", result.value.command);
//! }
//! # Ok::<(), octavefit::FitError>(())
//! ```

pub mod directive;
pub mod error;
pub mod feedback;
pub mod fit;
pub mod format;
pub mod instrument;
pub mod parser;
pub mod pitch;

use serde::{Deserialize, Serialize};

pub use directive::TransposeDirective;
pub use error::FitError;
pub use feedback::{Feedback, FeedbackLevel, ParseResult};
pub use fit::{
    check_shift_range, select_best_shift, BestShift, ShiftCandidate, DEFAULT_SHIFT_RANGE,
    MAX_SHIFT_RANGE,
};
pub use format::{format_transpose, midi_to_display, midi_to_lily};
pub use instrument::{Instrument, InstrumentProfile};
pub use parser::{extract, parse_midi_list, to_midi_list, Extraction, SourceKind};

/// Everything produced by one run of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitReport {
    pub instrument: Instrument,
    /// Sounding MIDI notes that were fitted
    pub notes: Vec<i32>,
    pub best: BestShift,
    /// The `\transpose` command for the chosen shift
    pub command: String,
}

/// Fit already-resolved MIDI notes to an instrument.
pub fn fit(
    notes: Vec<i32>,
    instrument: Instrument,
    shift_range: u32,
) -> Result<FitReport, FitError> {
    let profile = instrument.profile();
    let best = select_best_shift(&notes, &profile, shift_range)?;
    let command = format_transpose(profile.transpose, best.shift);

    tracing::info!(
        instrument = %instrument,
        notes = notes.len(),
        shift = best.shift,
        %command,
        "fitted notes"
    );

    Ok(FitReport {
        instrument,
        notes,
        best,
        command,
    })
}

/// Extract notes from notation text and fit them to an instrument.
///
/// Extraction feedback is carried through unchanged. The shift range is
/// checked before the source is read.
pub fn fit_notation(
    input: &str,
    instrument: Instrument,
    shift_range: u32,
) -> Result<ParseResult<FitReport>, FitError> {
    check_shift_range(shift_range)?;
    let extraction = extract(input);
    let report = fit(extraction.value.notes, instrument, shift_range)?;
    Ok(ParseResult::new(report, extraction.feedback))
}
