//! Extraction diagnostics.
//!
//! Token-level problems never abort a run. The offending token is skipped
//! and a `Feedback` entry records what happened and where, so callers can
//! route it to a warning channel separate from the report.

use serde::{Deserialize, Serialize};

/// One diagnostic from extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// The source text that triggered this entry
    pub token: Option<String>,
    /// A likely fix, shown after the message
    pub suggestion: Option<String>,
}

impl Feedback {
    fn new(level: FeedbackLevel, message: impl Into<String>, line: usize, column: usize) -> Self {
        Feedback {
            level,
            message: message.into(),
            line,
            column,
            token: None,
            suggestion: None,
        }
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Feedback::new(FeedbackLevel::Warning, message, line, column)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackLevel {
    /// Malformed input, the event was dropped
    Error,
    /// Token skipped, processing continued
    Warning,
    /// Expected skip (rests, ignored commands)
    Info,
}

/// Collector for feedback while scanning
#[derive(Debug)]
pub struct FeedbackCollector {
    feedback: Vec<Feedback>,
    current_line: usize,
    current_column: usize,
}

impl Default for FeedbackCollector {
    fn default() -> Self {
        FeedbackCollector::new()
    }
}

impl FeedbackCollector {
    pub fn new() -> Self {
        FeedbackCollector {
            feedback: Vec::new(),
            current_line: 1,
            current_column: 1,
        }
    }

    /// Move the position used for subsequent entries
    pub fn set_position(&mut self, line: usize, column: usize) {
        self.current_line = line;
        self.current_column = column;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Feedback::warning(message, self.current_line, self.current_column));
    }

    /// An entry at the current position, not yet recorded. Finish it with
    /// the builder methods and hand it to [`FeedbackCollector::push`].
    pub fn entry(&self, level: FeedbackLevel, message: impl Into<String>) -> Feedback {
        Feedback::new(level, message, self.current_line, self.current_column)
    }

    /// Record a skipped token at the current position
    pub fn skipped(&mut self, level: FeedbackLevel, message: impl Into<String>, token: &str) {
        let entry = self.entry(level, message).with_token(token);
        self.push(entry);
    }

    pub fn push(&mut self, feedback: Feedback) {
        tracing::debug!(line = feedback.line, column = feedback.column, "{}", feedback.message);
        self.feedback.push(feedback);
    }

    pub fn has_errors(&self) -> bool {
        self.feedback
            .iter()
            .any(|f| f.level == FeedbackLevel::Error)
    }

    pub fn into_feedback(self) -> Vec<Feedback> {
        self.feedback
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }
}

/// A value together with the diagnostics produced while building it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult<T> {
    pub value: T,
    pub feedback: Vec<Feedback>,
}

impl<T> ParseResult<T> {
    pub fn new(value: T, feedback: Vec<Feedback>) -> Self {
        ParseResult { value, feedback }
    }

    pub fn has_errors(&self) -> bool {
        self.feedback
            .iter()
            .any(|f| f.level == FeedbackLevel::Error)
    }

    /// Entries worth surfacing to a user (errors and warnings)
    pub fn diagnostics(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level != FeedbackLevel::Info)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Error)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            value: f(self.value),
            feedback: self.feedback,
        }
    }
}
