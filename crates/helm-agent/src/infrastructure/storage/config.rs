//! TOML-based configuration for the agent.
//!
//! Reads and writes [`AppConfig`] at the platform-appropriate location:
//! - Windows:  `%APPDATA%\HelmControl\config.toml`
//! - Linux:    `~/.config/helmctl/config.toml`
//! - macOS:    `~/Library/Application Support/HelmControl/config.toml`
//!
//! Every field carries a serde default, so a missing file, an empty file,
//! and a file written by an older version all load cleanly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::control::PauseSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

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

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub control: ControlConfig,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// TCP listener settings for the command server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// TCP port for control messages.
    #[serde(default = "default_command_port")]
    pub port: u16,
    /// IP address to bind the listener to. `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

/// Geometry and timing of the pause sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlConfig {
    /// Pause button X in normalized screen coordinates `[0, 65535]`.
    #[serde(default = "default_pause_button_x")]
    pub pause_button_x: u16,
    /// Pause button Y in normalized screen coordinates `[0, 65535]`.
    #[serde(default = "default_pause_button_y")]
    pub pause_button_y: u16,
    /// Delay in milliseconds between individual synthesized input events.
    #[serde(default = "default_event_delay_ms")]
    pub event_delay_ms: u64,
    /// Delay in milliseconds between pause-sequence steps.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Capture the screen just before the pause click.
    #[serde(default)]
    pub screenshot_before_click: bool,
}

impl ControlConfig {
    /// Converts the on-disk form into the application-layer settings.
    pub fn to_settings(&self) -> PauseSettings {
        PauseSettings {
            button_x: self.pause_button_x,
            button_y: self.pause_button_y,
            event_delay: Duration::from_millis(self.event_delay_ms),
            step_delay: Duration::from_millis(self.step_delay_ms),
            screenshot_before_click: self.screenshot_before_click,
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_command_port() -> u16 {
    helm_core::command::DEFAULT_COMMAND_PORT
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_pause_button_x() -> u16 {
    6143
}
fn default_pause_button_y() -> u16 {
    6675
}
fn default_event_delay_ms() -> u64 {
    1
}
fn default_step_delay_ms() -> u64 {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            control: ControlConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: default_command_port(),
            bind: default_bind_address(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pause_button_x: default_pause_button_x(),
            pause_button_y: default_pause_button_y(),
            event_delay_ms: default_event_delay_ms(),
            step_delay_ms: default_step_delay_ms(),
            screenshot_before_click: false,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads [`AppConfig`] from the default location, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads [`AppConfig`] from an explicit path, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the default location, creating the config directory
/// if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("HelmControl"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("helmctl"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("HelmControl")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
