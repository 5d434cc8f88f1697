//! Notation extraction: source text in, ordered MIDI notes out.
//!
//! The extractor is generous. It scans the whole source, resolves every
//! pitch it can, and records a feedback entry for each token it had to
//! skip.

mod cleanup;
mod midi_list;
pub(crate) mod note;
mod triple;

use serde::{Deserialize, Serialize};

use crate::directive::TransposeDirective;
use crate::feedback::{FeedbackCollector, FeedbackLevel, ParseResult};
use crate::pitch::{closest_spelling, PitchTriple, MIDI_RANGE};

pub use cleanup::{clean_source, CleanSource};
pub use midi_list::{parse_midi_list, to_midi_list, MIDI_TAG};
pub use note::{classify_word, Word};
pub use triple::{scan_triples, TRIPLE_MARKER};

/// Which resolver produced the notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Letter notation, unmarked `c` at MIDI 48
    Letters,
    /// `ly:make-pitch` triples, octave 0 at middle C
    Triples,
}

/// Notes extracted from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub kind: SourceKind,
    /// MIDI notes in order of appearance
    pub notes: Vec<i32>,
    pub rests: usize,
    /// A `\transpose` command already present in the source
    pub directive: Option<TransposeDirective>,
}

/// Extract notes with whichever resolver explains the source.
///
/// Letter notation is the default. A source mentioning `ly:make-pitch` is
/// read as a music-expression dump only when the triples account for more
/// notes than the letters do, so a `.ly` file with a stray Scheme
/// `#(ly:make-pitch ...)` keeps its letter notes.
pub fn extract(input: &str) -> ParseResult<Extraction> {
    let letters = extract_letters(input);
    if !input.contains(TRIPLE_MARKER) {
        return letters;
    }

    let triples = extract_triples(input);
    if letters.value.notes.is_empty() || triples.value.notes.len() > letters.value.notes.len() {
        triples
    } else {
        letters
    }
}

/// Word boundaries inside a cleaned line
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '<' | '>' | '|' | '[' | ']' | '(' | ')' | '~' | '=')
}

/// Split a line into `(byte offset, word)` pairs. A backslash always starts
/// a new word so `c4\fermata` yields `c4` and `\fermata`.
fn words(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        if is_separator(c) {
            if let Some(s) = start.take() {
                out.push((s, &line[s..i]));
            }
        } else if c == '\\' {
            if let Some(s) = start.take() {
                out.push((s, &line[s..i]));
            }
            start = Some(i);
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &line[s..]));
    }
    out
}

/// Extract notes from letter notation.
pub fn extract_letters(input: &str) -> ParseResult<Extraction> {
    let mut collector = FeedbackCollector::new();
    let cleaned = clean_source(input);

    let directive = cleaned.transpose.as_deref().and_then(|text| {
        match TransposeDirective::parse(text) {
            Ok(directive) => Some(directive),
            Err(e) => {
                collector.warning(format!("ignoring transpose command: {}", e));
                None
            }
        }
    });

    let mut notes = Vec::new();
    let mut rests = 0;

    for (line_idx, line) in cleaned.text.lines().enumerate() {
        for (offset, word) in words(line) {
            if word.starts_with(|c: char| c == '\\' || c == '#' || c.is_ascii_digit()) {
                continue;
            }
            collector.set_position(line_idx + 1, offset + 1);

            match classify_word(word) {
                Word::Pitch(pitch) => match pitch.to_midi() {
                    Some(midi) if MIDI_RANGE.contains(&midi) => notes.push(midi),
                    Some(_) => collector.skipped(
                        FeedbackLevel::Warning,
                        format!("'{}' is outside the MIDI range", word),
                        word,
                    ),
                    None => {
                        let mut entry = collector
                            .entry(
                                FeedbackLevel::Warning,
                                format!("unresolved pitch spelling '{}'", pitch.spelling),
                            )
                            .with_token(word);
                        if let Some(nearest) = closest_spelling(&pitch.spelling) {
                            entry = entry.with_suggestion(format!("did you mean '{}'?", nearest));
                        }
                        collector.push(entry);
                    }
                },
                Word::Rest => {
                    rests += 1;
                    collector.skipped(FeedbackLevel::Info, "rest skipped", word);
                }
                Word::Other => {}
            }
        }
    }

    tracing::debug!(notes = notes.len(), rests, "extracted letter notation");

    ParseResult::new(
        Extraction {
            kind: SourceKind::Letters,
            notes,
            rests,
            directive,
        },
        collector.into_feedback(),
    )
}

/// Extract notes from `ly:make-pitch` triples, one event per occurrence.
pub fn extract_triples(input: &str) -> ParseResult<Extraction> {
    let mut collector = FeedbackCollector::new();
    let notes: Vec<i32> = scan_triples(input, &mut collector)
        .iter()
        .filter_map(PitchTriple::to_midi)
        .collect();

    tracing::debug!(notes = notes.len(), "extracted pitch triples");

    ParseResult::new(
        Extraction {
            kind: SourceKind::Triples,
            notes,
            rests: 0,
            directive: None,
        },
        collector.into_feedback(),
    )
}
