//! Configuration loading for octavefit.
//!
//! # Usage
//!
//! ```rust,no_run
//! use octavefit_conf::OctaveFitConfig;
//!
//! let config = OctaveFitConfig::load().expect("Failed to load config");
//! println!("Fitting for {}", config.fit.instrument);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/octavefit/config.toml` (system)
//! 2. `~/.config/octavefit/config.toml` (user)
//! 3. `./octavefit.toml` (local override, or `--config PATH`)
//! 4. Environment variables (`OCTAVEFIT_*`, `RUST_LOG`, `NO_COLOR`)
//!
//! # Example Config
//!
//! ```toml
//! [fit]
//! instrument = "eb-clarinet"
//! shift_range = 1
//! default_midi = [65, 60, 60, 62, 64]
//!
//! [report]
//! verbose = false
//! color = true
//!
//! [telemetry]
//! log_level = "warn"
//! ```

pub mod loader;
pub mod settings;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use settings::{FitSettings, ReportSettings, TelemetrySettings, DEFAULT_MIDI};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key} in {origin}: {message}")]
    Invalid {
        origin: String,
        key: String,
        message: String,
    },
}

/// Complete octavefit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OctaveFitConfig {
    #[serde(default)]
    pub fit: FitSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl OctaveFitConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/octavefit/config.toml`
    /// 3. `~/.config/octavefit/config.toml`
    /// 4. `./octavefit.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./octavefit.toml` override and must exist. System and user configs
    /// still load first.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = OctaveFitConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_into(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# octavefit configuration\n\n");

        output.push_str("[fit]\n");
        output.push_str(&format!("instrument = \"{}\"\n", self.fit.instrument));
        output.push_str(&format!("shift_range = {}\n", self.fit.shift_range));
        let notes: Vec<String> = self.fit.default_midi.iter().map(|n| n.to_string()).collect();
        output.push_str(&format!("default_midi = [{}]\n", notes.join(", ")));

        output.push_str("\n[report]\n");
        output.push_str(&format!("verbose = {}\n", self.report.verbose));
        output.push_str(&format!("color = {}\n", self.report.color));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}
