//! Transposing instrument profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Sounding range and transposition of an instrument.
///
/// `low` and `high` are inclusive concert-pitch MIDI numbers. Written pitch
/// is concert pitch plus `transpose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub low: i32,
    pub high: i32,
    pub transpose: i32,
}

impl InstrumentProfile {
    /// Inclusive written-pitch bounds
    pub fn written_range(&self) -> (i32, i32) {
        (self.low + self.transpose, self.high + self.transpose)
    }
}

/// The supported instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Instrument {
    EbClarinet,
    AltoSax,
    BbClarinet,
    TenorSax,
    Trumpet,
    EbHorn,
}

impl Instrument {
    pub const ALL: [Instrument; 6] = [
        Instrument::EbClarinet,
        Instrument::AltoSax,
        Instrument::BbClarinet,
        Instrument::TenorSax,
        Instrument::Trumpet,
        Instrument::EbHorn,
    ];

    pub fn profile(self) -> InstrumentProfile {
        let (low, high, transpose) = match self {
            Instrument::EbClarinet => (41, 84, 9),
            Instrument::AltoSax => (49, 81, 9),
            Instrument::BbClarinet => (50, 86, 2),
            Instrument::TenorSax => (44, 76, 14),
            Instrument::Trumpet => (52, 82, 2),
            Instrument::EbHorn => (45, 75, 9),
        };
        InstrumentProfile {
            low,
            high,
            transpose,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::EbClarinet => "eb-clarinet",
            Instrument::AltoSax => "alto-sax",
            Instrument::BbClarinet => "bb-clarinet",
            Instrument::TenorSax => "tenor-sax",
            Instrument::Trumpet => "trumpet",
            Instrument::EbHorn => "eb-horn",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Instrument::EbClarinet => "Clarinet in E-flat",
            Instrument::AltoSax => "Alto saxophone",
            Instrument::BbClarinet => "Clarinet in B-flat",
            Instrument::TenorSax => "Tenor saxophone",
            Instrument::Trumpet => "Trumpet in B-flat",
            Instrument::EbHorn => "Horn in E-flat",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Instrument::ALL.iter().map(|i| i.name()).collect()
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Instrument {
    type Err = FitError;

    /// Case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Instrument::ALL
            .iter()
            .copied()
            .find(|i| i.name() == normalized)
            .ok_or_else(|| FitError::UnknownInstrument {
                name: s.to_string(),
                valid: Instrument::names(),
            })
    }
}
