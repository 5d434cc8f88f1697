//! Validation errors. These halt an invocation; token-level problems are
//! reported as [`crate::Feedback`] instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FitError {
    #[error("unknown instrument '{name}' (valid: {})", valid.join(", "))]
    UnknownInstrument { name: String, valid: Vec<&'static str> },

    #[error("expected a line starting with '{tag}', got '{line}'")]
    MissingMidiTag { tag: &'static str, line: String },

    #[error("cannot parse pitch '{0}'")]
    UnknownPitch(String),

    #[error("shift range {range} is too wide (at most {max} octaves)")]
    ShiftRangeTooWide { range: u32, max: u32 },
}
