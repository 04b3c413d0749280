//! Configuration loading for Almanack.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.almanack/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The tool runs with sensible defaults
//! when no config exists. Almanack is a per-user tool, so there is no
//! per-project config layer.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AlmanackError, Result};

/// File name of the user config inside the almanack home.
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration struct for Almanack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Paid-feature entitlement configuration.
    pub entitlement: EntitlementConfig,
}

/// Paid-feature entitlement configuration.
///
/// Core operations never check entitlement; the CLI reads this before
/// offering gated features (custom virtues).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntitlementConfig {
    /// Whether the pro entitlement is active.
    pub pro: bool,
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. User config (`~/.almanack/config.toml`)
    /// 3. Defaults
    pub fn load() -> Self {
        let mut config = Self::load_user_config().unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    /// Load user config from `<almanack_home>/config.toml`.
    ///
    /// A missing file is normal and returns `None`. A malformed file is
    /// reported and then ignored so the tool still starts.
    fn load_user_config() -> Option<Config> {
        let home = almanack_home()?;
        let config_path = home.join(CONFIG_FILE);
        if !config_path.exists() {
            return None;
        }
        match Self::load_from_file(&config_path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(
                    "ignoring malformed config at {}: {}",
                    config_path.display(),
                    err
                );
                None
            }
        }
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| AlmanackError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| AlmanackError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // ALMANACK_PRO
        if let Ok(val) = env::var("ALMANACK_PRO") {
            match val.as_str() {
                "true" | "1" => self.entitlement.pro = true,
                "false" | "0" => self.entitlement.pro = false,
                _ => eprintln!(
                    "Warning: Invalid ALMANACK_PRO value '{}'. \
                    Expected 'true' or 'false'. Using '{}'.",
                    val, self.entitlement.pro
                ),
            }
        }
    }
}

/// Get the Almanack home directory.
///
/// Checks `ALMANACK_HOME` environment variable first, then falls back to
/// `~/.almanack`.
///
/// # Validation
///
/// If `ALMANACK_HOME` is set, it must be:
/// - Non-empty
/// - An absolute path (or we canonicalize it)
///
/// Invalid values are ignored and we fall back to the default.
pub fn almanack_home() -> Option<PathBuf> {
    // Check ALMANACK_HOME env var first
    if let Ok(home) = env::var("ALMANACK_HOME") {
        // Validate: must be non-empty
        if home.is_empty() {
            tracing::warn!("ALMANACK_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            // If it's an absolute path, use it directly
            if path.is_absolute() {
                return Some(path);
            }
            // For relative paths, try to canonicalize it
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            // If canonicalization fails (path doesn't exist), use as-is but warn
            tracing::warn!("ALMANACK_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    // Fall back to ~/.almanack
    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".almanack"));
    }

    // Fallback for containerized/minimal environments without HOME
    let fallback_path = fallback_almanack_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get fallback almanack home path when HOME is unavailable.
#[cfg(unix)]
fn fallback_almanack_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    // Get UID for unique temp directory
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/almanack-{}", uid))
}

/// Get fallback almanack home path when HOME is unavailable.
#[cfg(not(unix))]
fn fallback_almanack_home() -> PathBuf {
    std::env::temp_dir().join("almanack")
}

/// Get the user config path.
///
/// Returns `<almanack_home>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    almanack_home().map(|h| h.join(CONFIG_FILE))
}
