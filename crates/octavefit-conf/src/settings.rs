//! Configuration sections.

use octavefit::{Instrument, DEFAULT_SHIFT_RANGE};
use serde::{Deserialize, Serialize};

/// Notes used when no usable input arrives on stdin.
pub const DEFAULT_MIDI: [i32; 15] = [65, 60, 60, 62, 64, 72, 74, 76, 84, 86, 88, 96, 98, 100, 108];

/// What to fit and how far to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitSettings {
    /// Default: eb-clarinet
    #[serde(default = "FitSettings::default_instrument")]
    pub instrument: Instrument,

    /// Octaves searched each way.
    /// Default: 1
    #[serde(default = "FitSettings::default_shift_range")]
    pub shift_range: u32,

    /// Fallback sequence for empty or untagged stdin.
    #[serde(default = "FitSettings::default_midi")]
    pub default_midi: Vec<i32>,
}

impl FitSettings {
    fn default_instrument() -> Instrument {
        Instrument::EbClarinet
    }

    fn default_shift_range() -> u32 {
        DEFAULT_SHIFT_RANGE
    }

    fn default_midi() -> Vec<i32> {
        DEFAULT_MIDI.to_vec()
    }
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            instrument: Self::default_instrument(),
            shift_range: Self::default_shift_range(),
            default_midi: Self::default_midi(),
        }
    }
}

/// Report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Print the full report without `-v`.
    #[serde(default)]
    pub verbose: bool,

    /// Colored output. `NO_COLOR` turns this off.
    #[serde(default = "ReportSettings::default_color")]
    pub color: bool,
}

impl ReportSettings {
    fn default_color() -> bool {
        true
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            color: Self::default_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// `EnvFilter` directive.
    /// Default: warn
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
