//! Process-wide preference store
//!
//! Persists small key/value preferences (currently the configuration file
//! path) across agent runs. The store is an explicit trait so callers and
//! tests can inject their own backing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Preference key holding the path to the configuration XML file.
pub const CONFIG_PATH_KEY: &str = "config_xml_path";

/// Errors from reading or writing the preference backing store.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to read preferences at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write preferences at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preferences file at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine a preferences directory for this user")]
    NoConfigDir,
}

/// Host-and-user-scoped key/value store for agent preferences.
///
/// Values persist across process runs. The store is never torn down by the
/// agent; entries are only ever overwritten.
pub trait PreferenceStore {
    /// Look up a preference value.
    fn get(&self, key: &str) -> Option<String>;

    /// Record a preference value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Preference store backed by a JSON file under the user's config directory.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store at its default location
    /// (`<config dir>/healthmon/prefs.json`), creating nothing on disk yet.
    pub fn open_default() -> Result<Self, PrefsError> {
        let dir = dirs_next::config_dir().ok_or(PrefsError::NoConfigDir)?;
        Self::open(dir.join("healthmon").join("prefs.json"))
    }

    /// Open a store backed by a specific file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| PrefsError::Read {
                path: path.clone(),
                source,
            })?;
            let file: PrefsFile =
                serde_json::from_str(&content).map_err(|source| PrefsError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            file.values
        } else {
            HashMap::new()
        };

        Ok(Self { path, values })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PrefsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let file = PrefsFile {
            values: self.values.clone(),
        };
        // Serializing a string map cannot fail; any error here is an I/O one.
        let content =
            serde_json::to_string_pretty(&file).map_err(|source| PrefsError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// In-memory preference store for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
