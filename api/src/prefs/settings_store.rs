//! Persistence of `UserPrefs`.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use super::user_prefs::UserPrefs;
use crate::fee_mode::TransactionFeeMode;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A store for user preferences.
///
/// Screens read preferences when they are constructed and write them back when
/// they are dismissed.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<UserPrefs, SettingsError>;

    fn save(&self, prefs: &UserPrefs) -> Result<(), SettingsError>;

    /// Reads the preferred fee tier, falling back to the default on error.
    fn preferred_fee_mode(&self) -> TransactionFeeMode {
        match self.load() {
            Ok(prefs) => prefs.preferred_fee_mode(),
            Err(e) => {
                tracing::warn!("could not load preferred fee mode, using default: {e}");
                TransactionFeeMode::default()
            }
        }
    }

    /// Writes `mode` as the preferred fee tier, keeping other preferences.
    fn persist_fee_mode(&self, mode: TransactionFeeMode) -> Result<(), SettingsError> {
        let mut prefs = self.load()?;
        prefs.set_preferred_fee_mode(mode);
        self.save(&prefs)
    }
}

/// Stores preferences as a JSON file. A missing file reads as defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<UserPrefs, SettingsError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no settings at {}, using defaults", self.path.display());
                return Ok(UserPrefs::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, prefs: &UserPrefs) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        // replace the file in one step so an interrupted save keeps the old prefs
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        tracing::info!("saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Keeps preferences in memory only.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    prefs: Mutex<UserPrefs>,
}

impl MemorySettingsStore {
    pub fn new(prefs: UserPrefs) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<UserPrefs, SettingsError> {
        Ok(match self.prefs.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        })
    }

    fn save(&self, prefs: &UserPrefs) -> Result<(), SettingsError> {
        match self.prefs.lock() {
            Ok(mut guard) => *guard = *prefs,
            Err(poisoned) => *poisoned.into_inner() = *prefs,
        }
        Ok(())
    }
}
