//! Shared configuration for ticketdesk front-ends.
//!
//! TOML profiles layered with `TICKETDESK_` environment variables, the
//! file-backed session store, and translation to
//! `ticketdesk_core::ClientConfig`.

mod session_file;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use ticketdesk_core::{ClientConfig, DEFAULT_PAGE_SIZE};

pub use session_file::FileSessionStorage;

/// Backend used when no profile names one.
pub const DEFAULT_BACKEND: &str = "http://localhost:8080";

pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (known: {known})")]
    UnknownProfile { name: String, known: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("session file is corrupt: {0}")]
    SessionFormat(#[from] serde_json::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// A named backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL, e.g. "http://localhost:8080".
    pub backend: String,

    pub timeout: Option<u64>,

    pub page_size: Option<usize>,

    /// PEM bundle to trust in addition to the system roots.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.into(),
            timeout: None,
            page_size: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

impl Config {
    /// Pick the profile to use: the explicit name, then `default_profile`,
    /// then "default".
    ///
    /// An empty config still resolves "default" to a local backend so a
    /// fresh install works without writing a file first.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_owned();

        if let Some(profile) = self.profiles.get(&name) {
            return Ok((name, profile.clone()));
        }
        if name == DEFAULT_PROFILE {
            return Ok((name, Profile::default()));
        }
        let known = if self.profiles.is_empty() {
            "none".to_owned()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        };
        Err(ConfigError::UnknownProfile { name, known })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ticketdesk", "ticketdesk")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "ticketdesk", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the signed-in session is kept between runs.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "ticketdesk", "session.json"]),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if any), then `TICKETDESK_*`
/// variables. Nested keys use a double underscore, e.g.
/// `TICKETDESK_DEFAULTS__PAGE_SIZE=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TICKETDESK_").split("__"))
        .extract()?;
    Ok(config)
}

pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the core's `ClientConfig` from a profile, falling back to the
/// global defaults for anything the profile leaves unset.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|e: url::ParseError| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("{e}: {}", profile.backend),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "backend".into(),
            reason: format!("expected an http(s) URL, got '{}'", profile.backend),
        });
    }

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = ClientConfig::new(url);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.page_size = page_size;
    config.ca_cert.clone_from(&profile.ca_cert);
    config.accept_invalid_certs = profile.insecure.unwrap_or(false);
    Ok(config)
}
