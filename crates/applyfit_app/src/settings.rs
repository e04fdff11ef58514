//! Settings file handling.
//!
//! Settings live in a RON file, `./applyfit.ron` unless `--config` names
//! another path. Every field has a default, so a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use applyfit_core::FailurePolicy;
use applyfit_engine::{AtomicFileWriter, ClientSettings};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILENAME: &str = "applyfit.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PolicySetting {
    #[default]
    Surface,
    KeepPrevious,
}

impl From<PolicySetting> for FailurePolicy {
    fn from(value: PolicySetting) -> Self {
        match value {
            PolicySetting::Surface => FailurePolicy::Surface,
            PolicySetting::KeepPrevious => FailurePolicy::KeepPrevious,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum LevelSetting {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LevelSetting> for LevelFilter {
    fn from(value: LevelSetting) -> Self {
        match value {
            LevelSetting::Off => LevelFilter::Off,
            LevelSetting::Error => LevelFilter::Error,
            LevelSetting::Warn => LevelFilter::Warn,
            LevelSetting::Info => LevelFilter::Info,
            LevelSetting::Debug => LevelFilter::Debug,
            LevelSetting::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
    pub failure_policy: PolicySetting,
    /// `None` logs to the terminal instead of a file.
    pub log_file: Option<PathBuf>,
    pub log_level: LevelSetting,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.map(|t| t.as_secs()),
            max_response_bytes: client.max_response_bytes,
            failure_policy: PolicySetting::default(),
            log_file: Some(PathBuf::from("applyfit.log")),
            log_level: LevelSetting::default(),
        }
    }
}

impl Settings {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Loads settings from `path`. A missing file yields the defaults; unreadable
/// or malformed files are errors so the caller can report them once logging
/// is up.
pub fn load(path: &Path) -> Result<Settings> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read settings from {:?}", path));
        }
    };

    ron::from_str(&content).with_context(|| format!("failed to parse settings in {:?}", path))
}

pub fn save(path: &Path, settings: &Settings) -> Result<PathBuf> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(settings, pretty).context("failed to serialize settings")?;
    AtomicFileWriter::new()
        .write(path, &content)
        .with_context(|| format!("failed to write settings to {:?}", path))
}
