//! Source cleanup before token scanning.
//!
//! Comments, strings, and command arguments that are spelled like pitches
//! (`\key bf \major`, `\relative c'`, `\transpose c d`) are blanked out.
//! Blanking keeps every byte offset and line break in place so diagnostics
//! still point at the original source.

use std::sync::OnceLock;

use regex::Regex;

fn comments_and_strings() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)%\{.*?%\}|"(?:[^"\\]|\\.)*"|%[^\n]*"#).expect("valid regex")
    })
}

fn key_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\\key\s+[a-g][a-z]*[',]*(?:\s*\\(?:major|minor|ionian|dorian|phrygian|lydian|mixolydian|aeolian|locrian))?",
        )
        .expect("valid regex")
    })
}

fn relative_argument() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\relative\s+[a-g][a-z]*[',]*").expect("valid regex"))
}

fn transpose_arguments() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\transpose\s+[a-g][a-z]*[',]*\s+[a-g][a-z]*[',]*").expect("valid regex")
    })
}

/// Replace every character except newlines with spaces of the same byte width
fn blank(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c == '\n' {
                "\n".to_string()
            } else {
                " ".repeat(c.len_utf8())
            }
        })
        .collect()
}

fn blank_matches(text: &str, re: &Regex) -> String {
    re.replace_all(text, |caps: &regex::Captures| blank(&caps[0]))
        .into_owned()
}

/// Result of cleaning a notation source
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSource {
    /// Same length and line structure as the input
    pub text: String,
    /// The first `\transpose` command found outside comments, verbatim
    pub transpose: Option<String>,
}

/// Blank comments, strings, and pitch-like command arguments.
pub fn clean_source(input: &str) -> CleanSource {
    let text = blank_matches(input, comments_and_strings());
    let text = blank_matches(&text, key_declaration());
    let text = blank_matches(&text, relative_argument());

    let transpose = transpose_arguments()
        .find(&text)
        .map(|m| m.as_str().to_string());
    let text = blank_matches(&text, transpose_arguments());

    CleanSource { text, transpose }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_preserves_layout() {
        let input = "a % comment\nb";
        let cleaned = clean_source(input);
        assert_eq!(cleaned.text.len(), input.len());
        assert_eq!(cleaned.text, format!("a{}\nb", " ".repeat(10)));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let cleaned = clean_source("c %{ d\ne %} f");
        assert_eq!(cleaned.text, format!("c{}\n{}f", " ".repeat(5), " ".repeat(5)));
    }

    #[test]
    fn test_strings_removed() {
        let cleaned = clean_source(r#"title = "a day in 100% e" g"#);
        assert!(!cleaned.text.contains('a'));
        assert!(cleaned.text.ends_with(" g"));
    }

    #[test]
    fn test_key_declaration_removed() {
        let cleaned = clean_source(r"\key bf \major c d");
        assert_eq!(cleaned.text.trim(), "c d");

        let cleaned = clean_source(r"\key e \minor");
        assert_eq!(cleaned.text.trim(), "");
    }

    #[test]
    fn test_relative_argument_removed() {
        let cleaned = clean_source(r"melody = \relative c'' { a4 }");
        assert_eq!(cleaned.text.split_whitespace().collect::<Vec<_>>(), ["melody", "=", "{", "a4", "}"]);
    }

    #[test]
    fn test_transpose_captured_and_removed() {
        let cleaned = clean_source("\\transpose c a, { g4 }");
        assert_eq!(cleaned.transpose.as_deref(), Some("\\transpose c a,"));
        assert_eq!(cleaned.text.split_whitespace().collect::<Vec<_>>(), ["{", "g4", "}"]);
    }

    #[test]
    fn test_commented_transpose_ignored() {
        let cleaned = clean_source("% \\transpose g c\nd");
        assert_eq!(cleaned.transpose, None);
    }
}
