//! `\transpose <from> <to>` directives.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::parser::note::{is_token_tail, parse_pitch_token};
use crate::pitch::{pitch_value, round_half_up, LetterPitch, FLAT_NAMES};

fn transpose_command() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\transpose\s+([a-g][a-z]*[',]*)\s+([a-g][a-z]*[',]*)").expect("valid regex")
    })
}

fn parse_pitch(text: &str) -> Result<LetterPitch, FitError> {
    let mut input = text;
    let pitch = parse_pitch_token(&mut input).map_err(|_| FitError::UnknownPitch(text.to_string()))?;
    if !is_token_tail(input) || pitch.to_midi().is_none() {
        return Err(FitError::UnknownPitch(text.to_string()));
    }
    Ok(pitch)
}

/// A parsed transposition from one pitch to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransposeDirective {
    pub from: LetterPitch,
    pub to: LetterPitch,
}

impl TransposeDirective {
    /// Find the first `\transpose` command in `text`.
    pub fn parse(text: &str) -> Result<Self, FitError> {
        let caps = transpose_command()
            .captures(text)
            .ok_or_else(|| FitError::UnknownPitch(text.trim().to_string()))?;
        Ok(TransposeDirective {
            from: parse_pitch(&caps[1])?,
            to: parse_pitch(&caps[2])?,
        })
    }

    /// Interval in semitones, octave marks included
    pub fn interval(&self) -> i32 {
        // both sides were validated in parse
        let from = self.from.to_midi().unwrap_or_default();
        let to = self.to.to_midi().unwrap_or_default();
        to - from
    }

    /// Move one spelling by the directive's interval, ignoring octaves.
    ///
    /// Returns the flat-preferred name of the resulting pitch class.
    pub fn transpose_pitch_class(&self, spelling: &str) -> Option<&'static str> {
        let semitone = round_half_up(pitch_value(spelling)?);
        Some(FLAT_NAMES[(semitone + self.interval()).rem_euclid(12) as usize])
    }
}

fn write_pitch(f: &mut fmt::Formatter<'_>, pitch: &LetterPitch) -> fmt::Result {
    f.write_str(&pitch.spelling)?;
    let mark = if pitch.octave_marks > 0 { "'" } else { "," };
    f.write_str(&mark.repeat(pitch.octave_marks.unsigned_abs() as usize))
}

impl fmt::Display for TransposeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\\transpose ")?;
        write_pitch(f, &self.from)?;
        f.write_str(" ")?;
        write_pitch(f, &self.to)
    }
}
