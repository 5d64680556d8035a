//! Runtime settings.
//!
//! Defaults are embedded from `config/default.toml`. A settings file given on
//! the command line replaces them; when it cannot be loaded the embedded
//! defaults are used and the failure is logged.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable that overrides `remote.base_url`.
pub const REMOTE_URL_ENV: &str = "NETCFG_REMOTE_URL";

const EMBEDDED: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub push: PushSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Empty means offline.
    pub base_url: String,
    pub token_env: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_env: "NETCFG_REMOTE_TOKEN".to_string(),
        }
    }
}

impl RemoteSettings {
    /// Base URL when a remote is configured.
    pub fn endpoint(&self) -> Option<&str> {
        let url = self.base_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Bearer token read from `token_env`, if set.
    pub fn token(&self) -> Option<String> {
        if self.token_env.is_empty() {
            return None;
        }
        env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSettings {
    pub dangerous_commands: Vec<String>,
}

impl PushSettings {
    /// Commands that contain any dangerous pattern, compared case-insensitively.
    pub fn flag_dangerous<'a>(&self, commands: &'a [String]) -> Vec<&'a str> {
        let patterns: Vec<String> = self
            .dangerous_commands
            .iter()
            .map(|p| p.trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        commands
            .iter()
            .filter(|command| {
                let lowered = command.to_ascii_lowercase();
                patterns.iter().any(|p| lowered.contains(p.as_str()))
            })
            .map(String::as_str)
            .collect()
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Where the active settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    Embedded,
    File(String),
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_settings(&raw, path.display().to_string())
}

/// Built-in settings.
pub fn default_settings() -> Settings {
    parse_settings(EMBEDDED, "embedded settings".to_string()).unwrap_or_default()
}

/// Load `path` when given, falling back to the embedded defaults, then apply
/// environment overrides.
pub fn load_settings_with_source(path: Option<&Path>) -> (Settings, SettingsSource) {
    let (mut settings, source) = match path {
        Some(path) => match load_settings(path) {
            Ok(settings) => (settings, SettingsSource::File(path.display().to_string())),
            Err(err) => {
                warn!(error = %err, "using embedded settings");
                (default_settings(), SettingsSource::Embedded)
            }
        },
        None => (default_settings(), SettingsSource::Embedded),
    };
    apply_env_overrides(&mut settings, env::var(REMOTE_URL_ENV).ok());
    (settings, source)
}

fn apply_env_overrides(settings: &mut Settings, remote_url: Option<String>) {
    if let Some(url) = remote_url.filter(|u| !u.trim().is_empty()) {
        settings.remote.base_url = url;
    }
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse { path, source })
}
