//! Workstep Configuration - argument defaults as operator-tunable TOML values
//!
//! Each section implements `Default` with the built-in constants from
//! `defaults.rs`, so behavior is unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "WORKSTEPS_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "worksteps.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `WorkstepConfig::load()` which searches:
/// 1. `$WORKSTEPS_CONFIG` env var
/// 2. `./worksteps.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkstepConfig {
    /// KB shift workstep
    #[serde(default)]
    pub kb_shift: KbShiftConfig,

    /// Close-well detection
    #[serde(default)]
    pub distance: DistanceConfig,

    /// Color/symbol propagation
    #[serde(default)]
    pub presentation: PresentationConfig,

    /// Log output
    #[serde(default)]
    pub log: LogConfig,
}

impl WorkstepConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded workstep config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./worksteps.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded workstep config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found — using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate ranges.
    ///
    /// Rules:
    /// - Distance threshold must be positive and finite
    /// - Intersection half-length must be positive and finite
    /// - zflat must be finite
    /// - Decimals at most 6
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// KB Shift
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbShiftConfig {
    /// Flat target elevation used when no surface is given
    #[serde(default = "default_zflat")]
    pub default_zflat: f64,

    /// Ask before shifting to a positive (above datum) plane
    #[serde(default = "default_true")]
    pub confirm_positive_zflat: bool,

    /// Half-length of the vertical line intersected with the surface
    #[serde(default = "default_intersection_half_length")]
    pub intersection_half_length: f64,

    /// Decimals printed for shifts
    #[serde(default = "default_shift_decimals")]
    pub decimals: usize,
}

fn default_zflat() -> f64 {
    defaults::DEFAULT_ZFLAT
}
fn default_true() -> bool {
    true
}
fn default_intersection_half_length() -> f64 {
    defaults::INTERSECTION_HALF_LENGTH
}
fn default_shift_decimals() -> usize {
    defaults::SHIFT_DECIMALS
}

impl Default for KbShiftConfig {
    fn default() -> Self {
        Self {
            default_zflat: default_zflat(),
            confirm_positive_zflat: true,
            intersection_half_length: default_intersection_half_length(),
            decimals: default_shift_decimals(),
        }
    }
}

// ============================================================================
// Distance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Threshold used when none is given on the command line
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Decimals printed for distances
    #[serde(default = "default_distance_decimals")]
    pub decimals: usize,
}

fn default_threshold() -> f64 {
    defaults::DEFAULT_DISTANCE_THRESHOLD
}
fn default_distance_decimals() -> usize {
    defaults::DISTANCE_DECIMALS
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            decimals: default_distance_decimals(),
        }
    }
}

// ============================================================================
// Presentation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_set_color")]
    pub set_color: bool,
    #[serde(default = "default_set_symbol")]
    pub set_symbol: bool,
}

fn default_set_color() -> bool {
    defaults::DEFAULT_SET_COLOR
}
fn default_set_symbol() -> bool {
    defaults::DEFAULT_SET_SYMBOL
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            set_color: default_set_color(),
            set_symbol: default_set_symbol(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    defaults::DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
