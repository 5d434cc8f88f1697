//! Rendering pitches and transpose commands as text.

use crate::pitch::{FLAT_NAMES, LETTER_ORIGIN};

/// Emitted when neither a transposition nor an octave shift applies
pub const IDENTITY_TRANSPOSE: &str = "\\transpose c c";

const DISPLAY_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

fn octave_marks(count: i32) -> String {
    let mark = if count > 0 { "'" } else { "," };
    mark.repeat(count.unsigned_abs() as usize)
}

/// Build the `\transpose c <target>` command for an instrument.
///
/// `transpose` is the instrument's written-minus-sounding offset in
/// semitones; only its magnitude is used. `octave_shift` is the chosen
/// whole-octave shift and adds directly to the octave marks.
pub fn format_transpose(transpose: i32, octave_shift: i32) -> String {
    if transpose == 0 && octave_shift == 0 {
        return IDENTITY_TRANSPOSE.to_string();
    }

    let magnitude = transpose.abs();
    let name = FLAT_NAMES[(magnitude % 12) as usize];
    let marks = magnitude / 12 + octave_shift;

    format!("\\transpose c {}{}", name, octave_marks(marks))
}

/// Sharp-spelled note name with octave number, middle C as `C4`
pub fn midi_to_display(midi: i32) -> String {
    let name = DISPLAY_NAMES[midi.rem_euclid(12) as usize];
    format!("{}{}", name, midi.div_euclid(12) - 1)
}

/// Flat-spelled LilyPond letter name in absolute octaves
pub fn midi_to_lily(midi: i32) -> String {
    let name = FLAT_NAMES[midi.rem_euclid(12) as usize];
    format!("{}{}", name, octave_marks((midi - LETTER_ORIGIN).div_euclid(12)))
}
