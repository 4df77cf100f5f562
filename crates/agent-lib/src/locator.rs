//! Configuration file discovery
//!
//! Resolves a path to the configuration XML without interactive input when
//! possible: either a previously recorded path that still exists, or a scan
//! of conventional locations. Absence is a normal outcome, never an error.

use crate::prefs::{PreferenceStore, CONFIG_PATH_KEY};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Expected file name for auto-discovery.
pub const CONFIG_FILE_NAME: &str = "config.xml";

/// Returns true iff a config path is recorded in the store and still
/// resolves to a file on disk. Side-effect free.
pub fn can_get_file(store: &dyn PreferenceStore) -> bool {
    match store.get(CONFIG_PATH_KEY) {
        Some(path) => {
            let exists = Path::new(&path).is_file();
            if !exists {
                debug!(path = %path, "Recorded config path no longer exists");
            }
            exists
        }
        None => false,
    }
}

/// Best-effort search of conventional directories for `config.xml`.
///
/// On the first hit the path is recorded in the store and `true` is
/// returned. Not finding the file returns `false` without raising an error;
/// only faults while recording the result are log-worthy.
pub fn attempt_auto_discover(store: &mut dyn PreferenceStore) -> bool {
    discover_in(&default_search_dirs(), store)
}

fn discover_in(dirs: &[PathBuf], store: &mut dyn PreferenceStore) -> bool {
    for dir in dirs {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            continue;
        }

        let path = candidate.to_string_lossy().to_string();
        info!(path = %path, "Auto-discovered configuration file");
        match store.set(CONFIG_PATH_KEY, &path) {
            Ok(()) => return true,
            Err(e) => {
                warn!(error = %e, "Failed to record auto-discovered config path");
                return false;
            }
        }
    }

    debug!("No configuration file found in conventional locations");
    false
}

/// Conventional directories searched by auto-discovery, in order.
fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(home) = dirs_next::home_dir() {
        dirs.push(home.join("Desktop"));
        dirs.push(home.join("Documents"));
        dirs.push(home);
    }
    if let Some(config) = dirs_next::config_dir() {
        dirs.push(config.join("healthmon"));
    }
    #[cfg(unix)]
    dirs.push(PathBuf::from("/etc/healthmon"));

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferenceStore;

    #[test]
    fn test_can_get_file_false_when_nothing_recorded() {
        let store = MemoryPreferenceStore::new();
        assert!(!can_get_file(&store));
    }

    #[test]
    fn test_can_get_file_false_when_recorded_path_is_gone() {
        let mut store = MemoryPreferenceStore::new();
        store
            .set(CONFIG_PATH_KEY, "/no/such/place/config.xml")
            .unwrap();
        assert!(!can_get_file(&store));
    }

    #[test]
    fn test_can_get_file_true_only_when_recorded_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "<config/>").unwrap();

        let mut store = MemoryPreferenceStore::new();
        store
            .set(CONFIG_PATH_KEY, &path.to_string_lossy())
            .unwrap();
        assert!(can_get_file(&store));

        // Deleting the file flips the answer back; the store is untouched
        std::fs::remove_file(&path).unwrap();
        assert!(!can_get_file(&store));
        assert!(store.get(CONFIG_PATH_KEY).is_some());
    }

    #[test]
    fn test_discover_records_first_hit() {
        let empty = tempfile::tempdir().unwrap();
        let with_config = tempfile::tempdir().unwrap();
        let path = with_config.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "<config/>").unwrap();

        let mut store = MemoryPreferenceStore::new();
        let dirs = vec![
            empty.path().to_path_buf(),
            with_config.path().to_path_buf(),
        ];
        assert!(discover_in(&dirs, &mut store));
        assert_eq!(
            store.get(CONFIG_PATH_KEY),
            Some(path.to_string_lossy().to_string())
        );
    }

    #[test]
    fn test_discover_misses_without_error() {
        let empty = tempfile::tempdir().unwrap();

        let mut store = MemoryPreferenceStore::new();
        let dirs = vec![empty.path().to_path_buf()];
        assert!(!discover_in(&dirs, &mut store));
        assert_eq!(store.get(CONFIG_PATH_KEY), None);
    }

    #[test]
    fn test_can_get_file_false_when_path_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = MemoryPreferenceStore::new();
        store
            .set(CONFIG_PATH_KEY, &dir.path().to_string_lossy())
            .unwrap();
        assert!(!can_get_file(&store));
    }
}
