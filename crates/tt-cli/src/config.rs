//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tt_core::{Precision, WorkSchedule, Workdays};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which storage backend to use.
    pub backend: Backend,
    /// Path to the storage file; defaults to a backend-specific file in the
    /// platform data directory.
    pub storage_path: Option<PathBuf>,
    /// Precision durations are rendered with.
    pub precision: Precision,
    /// Expected hours on each work day.
    pub hours_per_day: u32,
    /// Which weekdays count as work days.
    pub workdays: Workdays,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("storage_path", &self.storage_path)
            .field("precision", &self.precision)
            .field("hours_per_day", &self.hours_per_day)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            storage_path: None,
            precision: Precision::default(),
            hours_per_day: WorkSchedule::default().hours_per_day,
            workdays: Workdays::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TT_"));

        figment.extract()
    }

    /// The schedule worked time is reported against.
    #[must_use]
    pub const fn schedule(&self) -> WorkSchedule {
        WorkSchedule {
            hours_per_day: self.hours_per_day,
            workdays: self.workdays,
        }
    }

    /// The effective storage path, falling back to the platform data
    /// directory with a backend-specific file name.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
            match self.backend {
                Backend::Sqlite => data_dir.join("tt.db"),
                Backend::File => data_dir.join("tt.json"),
            }
        })
    }
}

/// Returns the platform-specific config directory for tt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tt"))
}

/// Returns the platform-specific data directory for tt.
///
/// On Linux: `~/.local/share/tt`
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tt"))
}
