//! Config file discovery, loading, and environment variable overlay.
//!
//! Each layer writes only the keys it sets, so a user file that names an
//! instrument keeps the system file's shift range.

use crate::{ConfigError, OctaveFitConfig};
use octavefit::pitch::MIDI_RANGE;
use octavefit::{check_shift_range, Instrument};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided it replaces the local override. A missing
/// `cli_path` is still returned so loading reports it.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/octavefit/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("octavefit/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("octavefit.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and apply it on top of `config`.
pub fn load_into(config: &mut OctaveFitConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

fn invalid(origin: &Path, key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        origin: origin.display().to_string(),
        key: key.to_string(),
        message: message.into(),
    }
}

/// Apply the keys present in a TOML document.
fn apply_toml(config: &mut OctaveFitConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(fit) = table.get("fit").and_then(|v| v.as_table()) {
        if let Some(v) = fit.get("instrument").and_then(|v| v.as_str()) {
            config.fit.instrument = v
                .parse::<Instrument>()
                .map_err(|e| invalid(path, "fit.instrument", e.to_string()))?;
        }
        if let Some(v) = fit.get("shift_range") {
            let range = v
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid(path, "fit.shift_range", "expected a non-negative integer"))?;
            config.fit.shift_range =
                check_shift_range(range).map_err(|e| invalid(path, "fit.shift_range", e.to_string()))?;
        }
        if let Some(v) = fit.get("default_midi") {
            let notes = v
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_integer().and_then(midi_note))
                        .collect::<Option<Vec<i32>>>()
                })
                .ok_or_else(|| invalid(path, "fit.default_midi", "expected an array of MIDI notes (0-127)"))?;
            config.fit.default_midi = notes;
        }
    }

    if let Some(report) = table.get("report").and_then(|v| v.as_table()) {
        if let Some(v) = report.get("verbose") {
            config.report.verbose = v
                .as_bool()
                .ok_or_else(|| invalid(path, "report.verbose", "expected true or false"))?;
        }
        if let Some(v) = report.get("color") {
            config.report.color = v
                .as_bool()
                .ok_or_else(|| invalid(path, "report.color", "expected true or false"))?;
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level") {
            config.telemetry.log_level = v
                .as_str()
                .ok_or_else(|| invalid(path, "telemetry.log_level", "expected a filter string"))?
                .to_string();
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(
    config: &mut OctaveFitConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_overrides_with(config, sources, |key| env::var(key).ok())
}

/// Apply overrides from any variable lookup.
pub fn apply_overrides_with(
    config: &mut OctaveFitConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let env_origin = Path::new("environment");

    if let Some(v) = lookup("OCTAVEFIT_INSTRUMENT") {
        config.fit.instrument = v
            .parse::<Instrument>()
            .map_err(|e| invalid(env_origin, "OCTAVEFIT_INSTRUMENT", e.to_string()))?;
        sources.env_overrides.push("OCTAVEFIT_INSTRUMENT".to_string());
    }
    if let Some(v) = lookup("OCTAVEFIT_SHIFT_RANGE") {
        let range = v.trim().parse().map_err(|_| {
            invalid(env_origin, "OCTAVEFIT_SHIFT_RANGE", format!("'{}' is not a non-negative integer", v))
        })?;
        config.fit.shift_range = check_shift_range(range)
            .map_err(|e| invalid(env_origin, "OCTAVEFIT_SHIFT_RANGE", e.to_string()))?;
        sources.env_overrides.push("OCTAVEFIT_SHIFT_RANGE".to_string());
    }
    if let Some(v) = lookup("OCTAVEFIT_DEFAULT_MIDI") {
        config.fit.default_midi = parse_note_list(&v).ok_or_else(|| {
            invalid(env_origin, "OCTAVEFIT_DEFAULT_MIDI", format!("'{}' is not a comma-separated note list", v))
        })?;
        sources.env_overrides.push("OCTAVEFIT_DEFAULT_MIDI".to_string());
    }

    if let Some(v) = lookup("OCTAVEFIT_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("OCTAVEFIT_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    // https://no-color.org: any non-empty value disables color
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.report.color = false;
        sources.env_overrides.push("NO_COLOR".to_string());
    }

    Ok(())
}

/// A MIDI note number, or `None` outside 0-127
fn midi_note(n: i64) -> Option<i32> {
    i32::try_from(n).ok().filter(|n| MIDI_RANGE.contains(n))
}

/// Parse `60,62,64`; an optional `MIDI:` tag is accepted.
fn parse_note_list(text: &str) -> Option<Vec<i32>> {
    let body = text.trim();
    let body = body.strip_prefix(octavefit::parser::MIDI_TAG).unwrap_or(body);
    body.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().ok().and_then(midi_note))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(vars: &[(&str, &str)]) -> Result<(OctaveFitConfig, ConfigSources), ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = OctaveFitConfig::default();
        let mut sources = ConfigSources::default();
        apply_overrides_with(&mut config, &mut sources, |key| vars.get(key).cloned())?;
        Ok((config, sources))
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_cli_path_always_listed_last() {
        let path = Path::new("/nonexistent/octavefit.toml");
        let files = discover_config_files_with_override(Some(path));
        assert_eq!(files.last().map(PathBuf::as_path), Some(path));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let mut config = OctaveFitConfig::default();
        apply_toml(&mut config, "[fit]\ninstrument = \"trumpet\"\n", Path::new("test.toml")).unwrap();

        assert_eq!(config.fit.instrument, Instrument::Trumpet);
        // Other values should be defaults
        assert_eq!(config.fit.shift_range, 1);
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[fit]
instrument = "Tenor_Sax"
shift_range = 2
default_midi = [60, 64, 67]

[report]
verbose = true
color = false

[telemetry]
log_level = "octavefit=debug"
"#;
        let mut config = OctaveFitConfig::default();
        apply_toml(&mut config, toml, Path::new("test.toml")).unwrap();

        assert_eq!(config.fit.instrument, Instrument::TenorSax);
        assert_eq!(config.fit.shift_range, 2);
        assert_eq!(config.fit.default_midi, vec![60, 64, 67]);
        assert!(config.report.verbose);
        assert!(!config.report.color);
        assert_eq!(config.telemetry.log_level, "octavefit=debug");
    }

    #[test]
    fn test_later_layer_keeps_unset_keys() {
        let mut config = OctaveFitConfig::default();
        apply_toml(&mut config, "[fit]\nshift_range = 3\n", Path::new("system.toml")).unwrap();
        apply_toml(&mut config, "[fit]\ninstrument = \"alto-sax\"\n", Path::new("user.toml")).unwrap();

        assert_eq!(config.fit.shift_range, 3);
        assert_eq!(config.fit.instrument, Instrument::AltoSax);
    }

    #[test]
    fn test_unknown_instrument_in_file() {
        let mut config = OctaveFitConfig::default();
        let err = apply_toml(&mut config, "[fit]\ninstrument = \"kazoo\"\n", Path::new("bad.toml"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fit.instrument"), "{}", message);
        assert!(message.contains("kazoo"), "{}", message);
    }

    #[test]
    fn test_negative_shift_range_rejected() {
        let mut config = OctaveFitConfig::default();
        let result = apply_toml(&mut config, "[fit]\nshift_range = -1\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_wide_shift_range_rejected() {
        let mut config = OctaveFitConfig::default();
        let err = apply_toml(&mut config, "[fit]\nshift_range = 4294967295\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("fit.shift_range"), "{}", err);

        let err = overrides(&[("OCTAVEFIT_SHIFT_RANGE", "2147483648")]).unwrap_err();
        assert!(err.to_string().contains("too wide"), "{}", err);
    }

    #[test]
    fn test_default_midi_outside_range_rejected() {
        let mut config = OctaveFitConfig::default();
        let result = apply_toml(&mut config, "[fit]\ndefault_midi = [60, 2147483647]\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        assert!(overrides(&[("OCTAVEFIT_DEFAULT_MIDI", "MIDI:60,128")]).is_err());
        assert!(overrides(&[("OCTAVEFIT_DEFAULT_MIDI", "-1")]).is_err());
        assert_eq!(
            overrides(&[("OCTAVEFIT_DEFAULT_MIDI", "0,127")]).unwrap().0.fit.default_midi,
            vec![0, 127]
        );
    }

    #[test]
    fn test_wrong_value_types_rejected() {
        for (toml, key) in [
            ("[report]\nverbose = \"yes\"\n", "report.verbose"),
            ("[report]\ncolor = 1\n", "report.color"),
            ("[telemetry]\nlog_level = 3\n", "telemetry.log_level"),
        ] {
            let mut config = OctaveFitConfig::default();
            let err = apply_toml(&mut config, toml, Path::new("bad.toml")).unwrap_err();
            assert!(err.to_string().contains(key), "{}", err);
        }
    }

    #[test]
    fn test_malformed_toml() {
        let mut config = OctaveFitConfig::default();
        let result = apply_toml(&mut config, "[fit\n", Path::new("broken.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let (config, sources) = overrides(&[
            ("OCTAVEFIT_INSTRUMENT", "eb_horn"),
            ("OCTAVEFIT_SHIFT_RANGE", "2"),
            ("OCTAVEFIT_DEFAULT_MIDI", "MIDI:60, 62"),
            ("NO_COLOR", "1"),
        ])
        .unwrap();

        assert_eq!(config.fit.instrument, Instrument::EbHorn);
        assert_eq!(config.fit.shift_range, 2);
        assert_eq!(config.fit.default_midi, vec![60, 62]);
        assert!(!config.report.color);
        assert_eq!(sources.env_overrides.len(), 4);
    }

    #[test]
    fn test_rust_log_wins_over_log_level() {
        let (config, _) = overrides(&[
            ("OCTAVEFIT_LOG_LEVEL", "info"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_empty_no_color_ignored() {
        let (config, sources) = overrides(&[("NO_COLOR", "")]).unwrap();
        assert!(config.report.color);
        assert!(sources.env_overrides.is_empty());
    }

    #[test]
    fn test_bad_env_values() {
        assert!(overrides(&[("OCTAVEFIT_INSTRUMENT", "kazoo")]).is_err());
        assert!(overrides(&[("OCTAVEFIT_SHIFT_RANGE", "-2")]).is_err());
        assert!(overrides(&[("OCTAVEFIT_DEFAULT_MIDI", "60,x")]).is_err());
    }
}
