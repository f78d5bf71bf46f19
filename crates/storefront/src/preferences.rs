//! Persisted user preferences.
//!
//! The theme flag is the only state that survives a session. Preferences are
//! stored as JSON values under string keys.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// Error type for preference storage.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("preferences file {0} does not contain a JSON object")]
    Malformed(PathBuf),
}

/// Light or dark color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme: {s}")),
        }
    }
}

/// Key-value preference storage.
pub trait PreferenceStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<JsonValue>, PreferenceError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: JsonValue) -> Result<(), PreferenceError>;
}

/// In-memory preferences, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, JsonValue>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: JsonValue) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored as a JSON object in a file.
///
/// A missing file reads as empty. Writes create parent directories.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, JsonValue>, PreferenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(PreferenceError::Malformed(self.path.clone())),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: JsonValue) -> Result<(), PreferenceError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&JsonValue::Object(values))?;
        std::fs::write(&self.path, contents)?;

        tracing::debug!(path = %self.path.display(), key, "Saved preference");
        Ok(())
    }
}

/// Read the stored theme, falling back to the default.
///
/// # Errors
///
/// Returns an error if the store cannot be read. An unrecognised stored value
/// is not an error; it logs a warning and yields the default theme.
pub fn load_theme(store: &dyn PreferenceStore) -> Result<Theme, PreferenceError> {
    let Some(value) = store.get(THEME_KEY)? else {
        return Ok(Theme::default());
    };

    match serde_json::from_value::<Theme>(value.clone()) {
        Ok(theme) => Ok(theme),
        Err(_) => {
            tracing::warn!(%value, "Ignoring unrecognised stored theme");
            Ok(Theme::default())
        }
    }
}

/// Persist the theme.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, serde_json::to_value(theme)?)
}
