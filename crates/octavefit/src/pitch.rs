//! Pitch spellings, the pitch value table, and MIDI resolution.
//!
//! Two resolvers live here. Letter notation (`cis'`, `bf,,`) places an
//! unmarked `c` at [`LETTER_ORIGIN`]; `ly:make-pitch` triples place octave 0
//! around middle C at [`TRIPLE_ORIGIN`]. The two origins disagree by an
//! octave and are kept apart on purpose.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Valid MIDI note numbers
pub const MIDI_RANGE: RangeInclusive<i32> = 0..=127;

/// MIDI number of an unmarked letter-notation `c`.
pub const LETTER_ORIGIN: i32 = 48;

/// MIDI number added to `octave * 12 + semitone` for pitch triples.
pub const TRIPLE_ORIGIN: i32 = 60;

/// Pitch-class names for semitones 0-11, flats preferred (English suffixes).
pub const FLAT_NAMES: [&str; 12] = [
    "c", "df", "d", "ef", "e", "f", "gf", "g", "af", "a", "bf", "b",
];

/// Accidental suffixes and their semitone offsets.
///
/// Dutch (`is`, `es`, ...) and English (`s`, `f`, ...) spellings, including
/// quarter and three-quarter tones. Ordered longest first.
const ACCIDENTALS: &[(&str, f64)] = &[
    ("isis", 2.0),
    ("eses", -2.0),
    ("isih", 1.5),
    ("eseh", -1.5),
    ("tqs", 1.5),
    ("tqf", -1.5),
    ("is", 1.0),
    ("es", -1.0),
    ("ih", 0.5),
    ("eh", -0.5),
    ("ss", 2.0),
    ("ff", -2.0),
    ("qs", 0.5),
    ("qf", -0.5),
    ("x", 2.0),
    ("s", 1.0),
    ("f", -1.0),
    ("", 0.0),
];

/// Characters that may appear in an accidental suffix.
pub(crate) fn is_accidental_char(c: char) -> bool {
    matches!(c, 'i' | 's' | 'e' | 'h' | 'f' | 'x' | 'q' | 't')
}

/// Diatonic note name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Semitone offset from C (0-11)
    pub fn to_semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Diatonic index as used by `ly:make-pitch` (C=0 .. B=6)
    pub fn from_index(index: i32) -> Option<NoteName> {
        match index {
            0 => Some(NoteName::C),
            1 => Some(NoteName::D),
            2 => Some(NoteName::E),
            3 => Some(NoteName::F),
            4 => Some(NoteName::G),
            5 => Some(NoteName::A),
            6 => Some(NoteName::B),
            _ => None,
        }
    }

    /// Lowercase letter-notation base letter
    pub fn from_letter(c: char) -> Option<NoteName> {
        match c {
            'c' => Some(NoteName::C),
            'd' => Some(NoteName::D),
            'e' => Some(NoteName::E),
            'f' => Some(NoteName::F),
            'g' => Some(NoteName::G),
            'a' => Some(NoteName::A),
            'b' => Some(NoteName::B),
            _ => None,
        }
    }
}

/// Look up a clean spelling (no octave marks, no duration) in the pitch
/// value table.
///
/// Returns the semitone offset from the C of the letter's octave, before
/// rounding. `ces` is -1.0, `bis` is 12.0, `cih` is 0.5.
///
/// Two-letter spellings are read with English suffixes: `as` is a-sharp and
/// `es` is e-sharp. Dutch flats are spelled `aes` and `ees`.
pub fn pitch_value(spelling: &str) -> Option<f64> {
    let mut chars = spelling.chars();
    let name = NoteName::from_letter(chars.next()?)?;
    let suffix = chars.as_str();
    ACCIDENTALS
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, offset)| name.to_semitone() as f64 + offset)
}

/// The longest proper prefix of `spelling` that is in the table.
///
/// `ceseses` gives `ceses`, `bess` gives `bes`. Used to hint at a fix for
/// an unresolved spelling.
pub fn closest_spelling(spelling: &str) -> Option<&str> {
    spelling
        .char_indices()
        .rev()
        .map(|(end, _)| &spelling[..end])
        .find(|prefix| pitch_value(prefix).is_some())
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Evaluate an alteration written as an integer or a signed rational
/// (`1`, `-1/2`, `3/4`).
pub fn parse_alteration(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.split_once('/') {
        Some((num, den)) => {
            let num: i64 = num.trim().parse().ok()?;
            let den: i64 = den.trim().parse().ok()?;
            if den == 0 {
                return None;
            }
            Some(num as f64 / den as f64)
        }
        None => text.parse::<i64>().ok().map(|n| n as f64),
    }
}

/// A letter-notation pitch: clean spelling plus net octave marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterPitch {
    pub spelling: String,
    /// Up-marks minus down-marks
    pub octave_marks: i32,
}

impl LetterPitch {
    pub fn new(spelling: impl Into<String>, octave_marks: i32) -> Self {
        LetterPitch {
            spelling: spelling.into(),
            octave_marks,
        }
    }

    /// Resolve to MIDI, or `None` when the spelling is not in the table.
    pub fn to_midi(&self) -> Option<i32> {
        let value = pitch_value(&self.spelling)?;
        Some(round_half_up(
            value + 12.0 * self.octave_marks as f64 + LETTER_ORIGIN as f64,
        ))
    }
}

/// An explicit `(octave, name, alteration)` pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchTriple {
    pub octave: i32,
    pub name: NoteName,
    /// Alteration in semitones, possibly fractional
    pub alteration: f64,
}

impl PitchTriple {
    /// Resolve to MIDI, or `None` when the pitch falls outside [`MIDI_RANGE`].
    pub fn to_midi(&self) -> Option<i32> {
        let midi = self
            .octave
            .checked_mul(12)?
            .checked_add(self.name.to_semitone() + TRIPLE_ORIGIN)?
            .checked_add(round_half_up(self.alteration))?;
        MIDI_RANGE.contains(&midi).then_some(midi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naturals() {
        assert_eq!(pitch_value("c"), Some(0.0));
        assert_eq!(pitch_value("e"), Some(4.0));
        assert_eq!(pitch_value("b"), Some(11.0));
    }

    #[test]
    fn test_sharp_spellings_agree() {
        assert_eq!(pitch_value("cis"), pitch_value("cs"));
        assert_eq!(pitch_value("fisis"), pitch_value("fss"));
        assert_eq!(pitch_value("fisis"), pitch_value("fx"));
        assert_eq!(pitch_value("gis"), Some(8.0));
    }

    #[test]
    fn test_flat_spellings_agree() {
        assert_eq!(pitch_value("bes"), pitch_value("bf"));
        assert_eq!(pitch_value("aeses"), pitch_value("aff"));
        assert_eq!(pitch_value("ees"), Some(3.0));
        assert_eq!(pitch_value("ces"), Some(-1.0));
    }

    #[test]
    fn test_quarter_tones() {
        assert_eq!(pitch_value("cih"), Some(0.5));
        assert_eq!(pitch_value("cqs"), Some(0.5));
        assert_eq!(pitch_value("deh"), Some(1.5));
        assert_eq!(pitch_value("eeseh"), Some(2.5));
        assert_eq!(pitch_value("ftqs"), Some(6.5));
    }

    #[test]
    fn test_ambiguous_two_letter_spellings() {
        assert_eq!(pitch_value("as"), Some(10.0));
        assert_eq!(pitch_value("es"), Some(5.0));
    }

    #[test]
    fn test_unknown_spellings() {
        assert_eq!(pitch_value("h"), None);
        assert_eq!(pitch_value("cisis2"), None);
        assert_eq!(pitch_value("ceses es"), None);
        assert_eq!(pitch_value(""), None);
    }

    #[test]
    fn test_closest_spelling() {
        assert_eq!(closest_spelling("ceseses"), Some("ceses"));
        assert_eq!(closest_spelling("bess"), Some("bes"));
        assert_eq!(closest_spelling("dz"), Some("d"));
        assert_eq!(closest_spelling("c"), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(1.49), 1);
        assert_eq!(round_half_up(-1.5), -1);
    }

    #[test]
    fn test_parse_alteration() {
        assert_eq!(parse_alteration("1/2"), Some(0.5));
        assert_eq!(parse_alteration("-1/2"), Some(-0.5));
        assert_eq!(parse_alteration("2"), Some(2.0));
        assert_eq!(parse_alteration("1/0"), None);
        assert_eq!(parse_alteration("half"), None);
    }

    #[test]
    fn test_letter_pitch_to_midi() {
        assert_eq!(LetterPitch::new("c", 0).to_midi(), Some(48));
        assert_eq!(LetterPitch::new("c", 1).to_midi(), Some(60));
        assert_eq!(LetterPitch::new("a", 1).to_midi(), Some(69));
        assert_eq!(LetterPitch::new("bes", -1).to_midi(), Some(46));
        assert_eq!(LetterPitch::new("cih", 0).to_midi(), Some(49));
        assert_eq!(LetterPitch::new("ceh", 0).to_midi(), Some(48));
        assert_eq!(LetterPitch::new("zz", 0).to_midi(), None);
    }

    #[test]
    fn test_triple_to_midi() {
        let middle_c = PitchTriple {
            octave: 0,
            name: NoteName::C,
            alteration: 0.0,
        };
        assert_eq!(middle_c.to_midi(), Some(60));

        let b_flat_below = PitchTriple {
            octave: -1,
            name: NoteName::B,
            alteration: -1.0,
        };
        assert_eq!(b_flat_below.to_midi(), Some(58));

        let quarter_sharp = PitchTriple {
            octave: 0,
            name: NoteName::D,
            alteration: 0.5,
        };
        assert_eq!(quarter_sharp.to_midi(), Some(63));
    }

    #[test]
    fn test_triple_outside_midi_range() {
        let huge = PitchTriple {
            octave: 200_000_000,
            name: NoteName::C,
            alteration: 0.0,
        };
        assert_eq!(huge.to_midi(), None);

        let below = PitchTriple {
            octave: -5,
            name: NoteName::C,
            alteration: -1.0,
        };
        assert_eq!(below.to_midi(), None);

        let lowest = PitchTriple {
            octave: -5,
            name: NoteName::C,
            alteration: 0.0,
        };
        assert_eq!(lowest.to_midi(), Some(0));

        let wild_alteration = PitchTriple {
            octave: 0,
            name: NoteName::C,
            alteration: 1e12,
        };
        assert_eq!(wild_alteration.to_midi(), None);
    }

    #[test]
    fn test_origins_differ_by_an_octave() {
        assert_eq!(TRIPLE_ORIGIN - LETTER_ORIGIN, 12);
    }
}
