//! `ly:make-pitch` triples from a music-expression dump.
//!
//! Accepts `(ly:make-pitch OCTAVE NAME ALTERATION)` and the two-argument
//! form `(ly:make-pitch OCTAVE NAME)`. Anything else that mentions
//! `ly:make-pitch` is a malformed event: reported and skipped.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::feedback::{FeedbackCollector, FeedbackLevel};
use crate::pitch::{parse_alteration, NoteName, PitchTriple};

/// Text that introduces a pitch triple
pub const TRIPLE_MARKER: &str = "ly:make-pitch";

fn three_arg() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ly:make-pitch\s+(-?\d+)\s+(-?\d+)\s+([-+]?\d+(?:/\d+)?)\s*\)")
            .expect("valid regex")
    })
}

fn two_arg() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ly:make-pitch\s+(-?\d+)\s+(-?\d+)\s*\)").expect("valid regex"))
}

/// Why a matched triple could not be turned into a pitch
fn build_triple(caps: &Captures, alteration: Option<&str>) -> Result<PitchTriple, String> {
    let octave: i32 = caps[1]
        .parse()
        .map_err(|_| format!("octave '{}' out of range", &caps[1]))?;
    let index: i32 = caps[2]
        .parse()
        .map_err(|_| format!("note index '{}' out of range", &caps[2]))?;
    let name = NoteName::from_index(index)
        .ok_or_else(|| format!("note index {} is not in 0..6", index))?;
    let alteration = match alteration {
        Some(text) => parse_alteration(text)
            .ok_or_else(|| format!("cannot evaluate alteration '{}'", text))?,
        None => 0.0,
    };
    let triple = PitchTriple {
        octave,
        name,
        alteration,
    };
    if triple.to_midi().is_none() {
        return Err(format!(
            "octave {} alteration {} is outside the MIDI range",
            octave, alteration
        ));
    }
    Ok(triple)
}

/// Parse one `ly:make-pitch` occurrence starting at `text`.
fn parse_occurrence(text: &str) -> Result<PitchTriple, String> {
    if let Some(caps) = three_arg().captures(text) {
        let alteration = caps.get(3).map(|m| m.as_str());
        return build_triple(&caps, alteration);
    }
    if let Some(caps) = two_arg().captures(text) {
        return build_triple(&caps, None);
    }
    Err("malformed ly:make-pitch, expected 2 or 3 arguments".to_string())
}

/// Scan every line for pitch triples, in source order.
pub fn scan_triples(input: &str, collector: &mut FeedbackCollector) -> Vec<PitchTriple> {
    let mut triples = Vec::new();

    for (line_idx, line) in input.lines().enumerate() {
        for (offset, _) in line.match_indices(TRIPLE_MARKER) {
            collector.set_position(line_idx + 1, offset + 1);
            let occurrence = &line[offset..];
            match parse_occurrence(occurrence) {
                Ok(triple) => triples.push(triple),
                Err(message) => {
                    let token = occurrence.split(')').next().unwrap_or(occurrence).trim();
                    collector.skipped(FeedbackLevel::Error, message, token);
                }
            }
        }
    }

    triples
}
