//! Octave fitting: pick the whole-octave shift that puts the most written
//! notes inside an instrument's range.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::instrument::InstrumentProfile;

/// Default search half-width, in octaves
pub const DEFAULT_SHIFT_RANGE: u32 = 1;

/// Widest search half-width accepted. Eleven octaves already cover the
/// whole MIDI range.
pub const MAX_SHIFT_RANGE: u32 = 11;

/// Statistics for one candidate octave shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// Octaves applied to every note
    pub shift: i32,
    pub in_range: usize,
    pub out_of_range: usize,
    /// Sum of semitones by which out-of-range notes miss the nearer bound
    pub distance: i64,
}

impl ShiftCandidate {
    /// Sort key: most notes in range, least distance, smallest shift,
    /// downward before upward.
    fn rank(&self) -> (Reverse<usize>, i64, u32, i32) {
        (
            Reverse(self.in_range),
            self.distance,
            self.shift.unsigned_abs(),
            self.shift,
        )
    }
}

/// The chosen shift with everything needed to report on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestShift {
    pub shift: i32,
    pub in_range: usize,
    pub out_of_range: usize,
    pub distance: i64,
    /// Inclusive written-pitch bounds used for classification
    pub written_range: (i32, i32),
    /// Every candidate evaluated, in ascending shift order
    pub candidates: Vec<ShiftCandidate>,
    /// Written notes under the chosen shift, in input order
    pub written: Vec<i32>,
}

impl BestShift {
    /// Human-readable summary of the decision
    pub fn decision(&self) -> String {
        let octaves = |n: u32| if n == 1 { "1 octave".to_string() } else { format!("{} octaves", n) };
        match self.shift {
            0 => "no shift".to_string(),
            k if k < 0 => format!("shift down {}", octaves(k.unsigned_abs())),
            k => format!("shift up {}", octaves(k.unsigned_abs())),
        }
    }
}

/// Reject a search half-width wider than [`MAX_SHIFT_RANGE`].
pub fn check_shift_range(shift_range: u32) -> Result<u32, FitError> {
    if shift_range > MAX_SHIFT_RANGE {
        return Err(FitError::ShiftRangeTooWide {
            range: shift_range,
            max: MAX_SHIFT_RANGE,
        });
    }
    Ok(shift_range)
}

/// Shifts from `-shift_range` to `shift_range` inclusive
pub fn candidate_shifts(shift_range: u32) -> Result<impl Iterator<Item = i32>, FitError> {
    let r = check_shift_range(shift_range)? as i32;
    Ok(-r..=r)
}

/// Written pitches for `notes` under one octave shift. Saturates rather
/// than wrapping for notes far outside the MIDI range.
pub fn written_notes(notes: &[i32], profile: &InstrumentProfile, shift: i32) -> Vec<i32> {
    notes
        .iter()
        .map(|n| {
            n.saturating_add(profile.transpose)
                .saturating_add(shift.saturating_mul(12))
        })
        .collect()
}

/// Count in-range notes and out-of-range distance for one shift.
pub fn evaluate_shift(notes: &[i32], profile: &InstrumentProfile, shift: i32) -> ShiftCandidate {
    let (low, high) = profile.written_range();
    let mut in_range = 0;
    let mut distance: i64 = 0;

    for written in written_notes(notes, profile, shift) {
        if written < low {
            distance += i64::from(low) - i64::from(written);
        } else if written > high {
            distance += i64::from(written) - i64::from(high);
        } else {
            in_range += 1;
        }
    }

    ShiftCandidate {
        shift,
        in_range,
        out_of_range: notes.len() - in_range,
        distance,
    }
}

/// Evaluate every candidate shift and pick the best.
///
/// Ranking, in priority order: most notes in range, smallest total
/// distance, smallest `|shift|`, then the lower shift. Empty input is fine
/// and resolves to no shift. A `shift_range` above [`MAX_SHIFT_RANGE`] is
/// an error.
pub fn select_best_shift(
    notes: &[i32],
    profile: &InstrumentProfile,
    shift_range: u32,
) -> Result<BestShift, FitError> {
    let candidates: Vec<ShiftCandidate> = candidate_shifts(shift_range)?
        .map(|shift| evaluate_shift(notes, profile, shift))
        .collect();

    // a checked range always includes shift 0
    let best = candidates
        .iter()
        .copied()
        .min_by_key(ShiftCandidate::rank)
        .unwrap_or(ShiftCandidate {
            shift: 0,
            in_range: 0,
            out_of_range: notes.len(),
            distance: 0,
        });

    tracing::debug!(
        shift = best.shift,
        in_range = best.in_range,
        distance = best.distance,
        candidates = candidates.len(),
        "selected octave shift"
    );

    Ok(BestShift {
        shift: best.shift,
        in_range: best.in_range,
        out_of_range: best.out_of_range,
        distance: best.distance,
        written_range: profile.written_range(),
        written: written_notes(notes, profile, best.shift),
        candidates,
    })
}
