//! Preference persistence backends.

use super::Preferences;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum PreferencesError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for PreferencesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "preferences i/o failed: {err}"),
            Self::Json(err) => write!(f, "preferences are not valid json: {err}"),
        }
    }
}

impl Error for PreferencesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for PreferencesError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Key-value style persistence for one preferences document.
pub trait PreferenceStore {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Preferences>, PreferencesError>;
    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError>;
}

/// Stores preferences as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(preferences)?)?;
        Ok(())
    }
}

/// Volatile store, mainly for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: Cell<Option<Preferences>>,
    saves: Cell<usize>,
}

impl MemoryPreferenceStore {
    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        Ok(self.saved.get())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        self.saved.set(Some(*preferences));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
