//! TOML-based configuration for miditokb.
//!
//! The config file is optional.  It is read from
//! `$XDG_CONFIG_HOME/miditokb/config.toml` (falling back to
//! `~/.config/miditokb/config.toml`), or from the path given with `--config`.
//! Every value can also be given on the command line, which always wins.
//!
//! ```toml
//! [input]
//! port = "hw:1,0"
//! idle_timeout_secs = 600.0
//! include_clock = false
//! include_active_sensing = false
//!
//! [keymap]
//! path = "/home/me/.config/miditokb/pads.keymap"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) is a valid configuration.  `port` and `keymap.path` have no useful
//! default; startup fails later if neither the file nor the command line
//! provides them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miditokb_core::TransportFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine config directory (XDG_CONFIG_HOME and HOME are unset)")]
    NoConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The idle timeout is negative or not a number.
    #[error("invalid idle timeout {0} (expected seconds >= 0)")]
    InvalidTimeout(f64),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub keymap: KeymapConfig,
    pub logging: LoggingConfig,
}

/// MIDI input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// `hw:<card>,<device>` name or device node path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// End the session after this many seconds without input.  `0` disables.
    pub idle_timeout_secs: f64,
    /// Forward MIDI clock bytes (`0xF8`) to the matcher.
    pub include_clock: bool,
    /// Forward active-sensing bytes (`0xFE`) to the matcher.
    pub include_active_sensing: bool,
}

/// Keymap file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeymapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`,
    /// `"trace"`, or a full `EnvFilter` string.  `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl InputConfig {
    /// The transport filter these settings select.
    pub fn transport_filter(&self) -> TransportFilter {
        TransportFilter {
            drop_clock: !self.include_clock,
            drop_active_sensing: !self.include_active_sensing,
        }
    }

    /// The idle timeout, or `None` when disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for negative or non-finite values.
    pub fn idle_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        idle_timeout_from_secs(self.idle_timeout_secs)
    }
}

/// Converts fractional seconds to an idle timeout; `0` disables it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimeout`] for negative or non-finite values.
pub fn idle_timeout_from_secs(secs: f64) -> Result<Option<Duration>, ConfigError> {
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| ConfigError::InvalidTimeout(secs))
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Determines the config directory (`$XDG_CONFIG_HOME/miditokb` or
/// `~/.config/miditokb`).
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if neither variable is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    config_dir_from(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the default location, returning
/// `AppConfig::default()` if the file does not exist or no config directory
/// can be determined.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    match config_file_path() {
        Ok(path) => load_config_from(&path, false),
        Err(ConfigError::NoConfigDir) => Ok(AppConfig::default()),
        Err(e) => Err(e),
    }
}

/// Loads the config from `path`.
///
/// A missing file yields the defaults unless `required` is set, in which case
/// it is an error (an explicit `--config` path must exist).
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn config_dir_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    // An empty XDG_CONFIG_HOME counts as unset.
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("miditokb"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_filters_both_transport_bytes() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.input.transport_filter(), TransportFilter::default());
    }

    #[test]
    fn test_app_config_default_has_no_port_keymap_or_timeout() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.input.port, None);
        assert_eq!(cfg.keymap.path, None);
        assert_eq!(cfg.input.idle_timeout().unwrap(), None);
    }

    #[test]
    fn test_logging_config_default_level_is_info() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_full_toml() {
        // Arrange
        let toml_str = r#"
[input]
port = "hw:1,0"
idle_timeout_secs = 1.5
include_clock = true

[keymap]
path = "/etc/miditokb/pads.keymap"

[logging]
level = "debug"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg.input.port.as_deref(), Some("hw:1,0"));
        assert_eq!(
            cfg.input.idle_timeout().unwrap(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            cfg.input.transport_filter(),
            TransportFilter {
                drop_clock: false,
                drop_active_sensing: true,
            }
        );
        assert_eq!(
            cfg.keymap.path,
            Some(PathBuf::from("/etc/miditokb/pads.keymap"))
        );
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_omits_unset_port_and_keymap() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("port"));
        assert!(!toml_str.contains("path"));
    }

    // ── Idle timeout ──────────────────────────────────────────────────────────

    #[test]
    fn test_idle_timeout_zero_disables() {
        assert_eq!(idle_timeout_from_secs(0.0).unwrap(), None);
    }

    #[test]
    fn test_idle_timeout_fractional_seconds() {
        assert_eq!(
            idle_timeout_from_secs(0.25).unwrap(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_idle_timeout_rejects_negative_and_nan() {
        assert!(matches!(
            idle_timeout_from_secs(-1.0),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            idle_timeout_from_secs(f64::NAN),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    // ── Config directory ──────────────────────────────────────────────────────

    #[test]
    fn test_config_dir_prefers_xdg_config_home() {
        let dir = config_dir_from(Some("/xdg".into()), Some("/home/me".into()));
        assert_eq!(dir, Some(PathBuf::from("/xdg/miditokb")));
    }

    #[test]
    fn test_config_dir_falls_back_to_home_dot_config() {
        let dir = config_dir_from(Some("".into()), Some("/home/me".into()));
        assert_eq!(dir, Some(PathBuf::from("/home/me/.config/miditokb")));
    }

    #[test]
    fn test_config_dir_none_without_environment() {
        assert_eq!(config_dir_from(None, None), None);
    }

    // ── load_config_from ──────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_optional_file_returns_default() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let cfg = load_config_from(&path, false).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_missing_required_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let result = load_config_from(&path, true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_from_temp_file() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("miditokb_cfg_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[input]\nport = \"hw:2,0\"\n").unwrap();

        // Act
        let cfg = load_config_from(&path, true).expect("load");

        // Assert
        assert_eq!(cfg.input.port.as_deref(), Some("hw:2,0"));
        assert_eq!(cfg.logging.level, "info");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }
}
