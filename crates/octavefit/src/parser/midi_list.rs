//! The `MIDI:60,62,64` line exchanged with upstream tooling.

use crate::error::FitError;
use crate::feedback::{FeedbackCollector, FeedbackLevel, ParseResult};
use crate::pitch::MIDI_RANGE;

/// Literal tag that starts a MIDI list line
pub const MIDI_TAG: &str = "MIDI:";

/// Parse a tagged, comma-separated MIDI list.
///
/// A missing tag is an error so callers can fall back to a default
/// sequence. Empty entries are ignored. Entries that are not integers, or
/// fall outside 0-127, are skipped with a warning.
pub fn parse_midi_list(line: &str) -> Result<ParseResult<Vec<i32>>, FitError> {
    let trimmed = line.trim();
    let body = trimmed
        .strip_prefix(MIDI_TAG)
        .ok_or_else(|| FitError::MissingMidiTag {
            tag: MIDI_TAG,
            line: trimmed.to_string(),
        })?;

    let mut collector = FeedbackCollector::new();
    let mut notes = Vec::new();
    let mut column = MIDI_TAG.len() + 1;

    for entry in body.split(',') {
        let value = entry.trim();
        if !value.is_empty() {
            match value.parse::<i32>() {
                Ok(note) if MIDI_RANGE.contains(&note) => notes.push(note),
                _ => {
                    collector.set_position(1, column);
                    collector.skipped(
                        FeedbackLevel::Warning,
                        format!("'{}' is not a MIDI note number (0-127)", value),
                        value,
                    );
                }
            }
        }
        column += entry.len() + 1;
    }

    Ok(ParseResult::new(notes, collector.into_feedback()))
}

/// Write notes in the tagged list format
pub fn to_midi_list(notes: &[i32]) -> String {
    let body: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
    format!("{}{}", MIDI_TAG, body.join(","))
}
