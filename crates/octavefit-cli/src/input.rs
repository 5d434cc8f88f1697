//! Reading notes from files and stdin.

use anyhow::{Context, Result};
use octavefit::{extract, parse_midi_list, Feedback, FeedbackLevel};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where a set of notes came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    Stdin,
    /// The configured fallback sequence
    Default,
}

impl Origin {
    pub fn label(&self) -> String {
        match self {
            Origin::File(path) => path.display().to_string(),
            Origin::Stdin => "stdin".to_string(),
            Origin::Default => "default".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notes {
    pub origin: Origin,
    pub notes: Vec<i32>,
}

/// Emit extraction feedback on stderr through tracing.
pub fn log_feedback(source: &str, feedback: &[Feedback]) {
    for item in feedback {
        match item.level {
            FeedbackLevel::Error | FeedbackLevel::Warning => {
                tracing::warn!(source, "{}", item);
            }
            FeedbackLevel::Info => tracing::debug!(source, "{}", item),
        }
    }
}

/// Read a notation file and extract its notes.
pub fn read_notation(path: &Path) -> Result<Notes> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let result = extract(&source);
    let label = path.display().to_string();
    log_feedback(&label, &result.feedback);

    if let Some(directive) = &result.value.directive {
        tracing::info!(source = %label, "source already contains {}", directive);
    }
    tracing::info!(
        source = %label,
        kind = ?result.value.kind,
        notes = result.value.notes.len(),
        rests = result.value.rests,
        "extracted notes"
    );

    Ok(Notes {
        origin: Origin::File(path.to_path_buf()),
        notes: result.value.notes,
    })
}

/// Read a `MIDI:` line from stdin, falling back to `default`.
pub fn read_stdin(default: &[i32]) -> Result<Notes> {
    if atty::is(atty::Stream::Stdin) {
        tracing::info!("stdin is a terminal, using the default sequence");
        return Ok(fallback(default));
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;

    Ok(notes_from_text(&text, default))
}

fn fallback(default: &[i32]) -> Notes {
    Notes {
        origin: Origin::Default,
        notes: default.to_vec(),
    }
}

/// Interpret piped text: the first non-blank line must carry the `MIDI:` tag.
pub fn notes_from_text(text: &str, default: &[i32]) -> Notes {
    let Some(line) = text.lines().find(|l| !l.trim().is_empty()) else {
        tracing::info!("no input on stdin, using the default sequence");
        return fallback(default);
    };

    match parse_midi_list(line) {
        Ok(result) => {
            log_feedback("stdin", &result.feedback);
            Notes {
                origin: Origin::Stdin,
                notes: result.value,
            }
        }
        Err(e) => {
            tracing::warn!("{}; using the default sequence", e);
            fallback(default)
        }
    }
}
