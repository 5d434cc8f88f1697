//! Letter-notation pitch and rest tokens, parsed with winnow combinators.
//!
//! A pitch word is a base letter, an accidental run, octave marks, an
//! optional `!`/`?`, duration digits, and optionally more octave marks.
//! Whatever follows must be an articulation (`-.`, `^>`, `_`) or a tremolo
//! (`:16`), otherwise the word is not a pitch.

use winnow::combinator::{opt, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::pitch::{is_accidental_char, LetterPitch};

type PResult<T> = winnow::ModalResult<T>;

/// Parse the base letter of a pitch (a-g)
pub fn parse_letter(input: &mut &str) -> PResult<char> {
    one_of('a'..='g').parse_next(input)
}

/// Parse an accidental suffix run (`is`, `eses`, `f`, `tqs`, ...)
///
/// Takes the longest run of accidental characters; whether the run is a
/// known suffix is decided by the pitch value table.
pub fn parse_accidental_run<'i>(input: &mut &'i str) -> PResult<&'i str> {
    take_while(0.., is_accidental_char).parse_next(input)
}

/// Parse octave marks (', ,) into ups minus downs
pub fn parse_octave_marks(input: &mut &str) -> PResult<i32> {
    let ups: Vec<_> = repeat(0.., '\'').parse_next(input)?;
    let downs: Vec<_> = repeat(0.., ',').parse_next(input)?;
    Ok(ups.len() as i32 - downs.len() as i32)
}

/// Parse a duration with dots and multiplier (`4`, `8.`, `1*3/4`)
pub fn parse_duration<'i>(input: &mut &'i str) -> PResult<&'i str> {
    take_while(0.., |c: char| c.is_ascii_digit() || matches!(c, '.' | '*' | '/'))
        .parse_next(input)
}

/// Parse a pitch word into its clean spelling and octave marks
pub fn parse_pitch_token(input: &mut &str) -> PResult<LetterPitch> {
    let letter = parse_letter(input)?;
    let accidental = parse_accidental_run(input)?;
    let marks_before = parse_octave_marks(input)?;
    let _reminder = opt(one_of(['!', '?'])).parse_next(input)?;
    let _duration = parse_duration(input)?;
    let marks_after = parse_octave_marks(input)?;

    let mut spelling = String::with_capacity(1 + accidental.len());
    spelling.push(letter);
    spelling.push_str(accidental);

    Ok(LetterPitch::new(spelling, marks_before + marks_after))
}

/// Parse a rest or spacer (`r`, `R1*4`, `s8`)
pub fn parse_rest(input: &mut &str) -> PResult<char> {
    let c = one_of(['r', 'R', 's']).parse_next(input)?;
    parse_duration(input)?;
    Ok(c)
}

/// True if what is left after a token is something a note may carry
pub fn is_token_tail(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some('-' | '_' | '^') => true,
        Some(':') => rest[1..].chars().all(|c| c.is_ascii_digit()),
        Some(_) => false,
    }
}

/// What a single word turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    Pitch(LetterPitch),
    Rest,
    /// Not pitch-bearing text
    Other,
}

/// Classify a whole word. The word must be consumed up to a valid tail.
pub fn classify_word(word: &str) -> Word {
    let mut input = word;
    if let Ok(pitch) = parse_pitch_token(&mut input) {
        if is_token_tail(input) {
            return Word::Pitch(pitch);
        }
    }

    let mut input = word;
    if parse_rest(&mut input).is_ok() && is_token_tail(input) {
        return Word::Rest;
    }

    Word::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(spelling: &str, marks: i32) -> Word {
        Word::Pitch(LetterPitch::new(spelling, marks))
    }

    #[test]
    fn test_parse_octave_marks() {
        let mut input = "''";
        assert_eq!(parse_octave_marks(&mut input).unwrap(), 2);

        let mut input = ",,,";
        assert_eq!(parse_octave_marks(&mut input).unwrap(), -3);

        let mut input = "";
        assert_eq!(parse_octave_marks(&mut input).unwrap(), 0);
    }

    #[test]
    fn test_parse_accidental_run_is_greedy() {
        let mut input = "eses'4";
        assert_eq!(parse_accidental_run(&mut input).unwrap(), "eses");
        assert_eq!(input, "'4");
    }

    #[test]
    fn test_parse_pitch_token() {
        let mut input = "cis''8.";
        let p = parse_pitch_token(&mut input).unwrap();
        assert_eq!(p, LetterPitch::new("cis", 2));
        assert_eq!(input, "");

        let mut input = "bf,4";
        let p = parse_pitch_token(&mut input).unwrap();
        assert_eq!(p, LetterPitch::new("bf", -1));
    }

    #[test]
    fn test_marks_after_duration() {
        // Some hand-written sources put marks after the duration
        assert_eq!(classify_word("g4'"), pitch("g", 1));
        assert_eq!(classify_word("g'4'"), pitch("g", 2));
    }

    #[test]
    fn test_classify_pitches() {
        assert_eq!(classify_word("c"), pitch("c", 0));
        assert_eq!(classify_word("aes'2"), pitch("aes", 1));
        assert_eq!(classify_word("fis!4"), pitch("fis", 0));
        assert_eq!(classify_word("d'4-."), pitch("d", 1));
        assert_eq!(classify_word("e8^>"), pitch("e", 0));
        assert_eq!(classify_word("c1*3/4"), pitch("c", 0));
        assert_eq!(classify_word("g4:16"), pitch("g", 0));
    }

    #[test]
    fn test_classify_unknown_spelling_is_still_a_pitch_word() {
        // Shaped like a pitch, resolved (or not) by the table later
        assert_eq!(classify_word("ceseses4"), pitch("ceseses", 0));
        assert_eq!(classify_word("beef"), pitch("beef", 0));
    }

    #[test]
    fn test_classify_rests() {
        assert_eq!(classify_word("r"), Word::Rest);
        assert_eq!(classify_word("r4."), Word::Rest);
        assert_eq!(classify_word("R1*4"), Word::Rest);
        assert_eq!(classify_word("s2"), Word::Rest);
    }

    #[test]
    fn test_classify_other_words() {
        assert_eq!(classify_word("bass"), Word::Other);
        assert_eq!(classify_word("dolce"), Word::Other);
        assert_eq!(classify_word("default"), Word::Other);
        assert_eq!(classify_word("melody"), Word::Other);
        assert_eq!(classify_word("set-paper-size"), Word::Other);
        assert_eq!(classify_word("Staff"), Word::Other);
        assert_eq!(classify_word("g4:m7"), Word::Other);
    }
}
