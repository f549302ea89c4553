//! Load and persist launcher settings in the per-user config directory.
//!
//! Responsibilities:
//! - Create `~/.config/cslauncher/.cslauncher` on first run
//! - Load the file as a flat JSON string map (an empty file is an empty map)
//! - Store keys lowercased so lookups are case-insensitive
//! - Write the map back in one go when the launcher shuts down
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, info};

use crate::{error::LauncherError, paths};

/// Key holding the selected target directory.
pub const KEY_TARGET_DIR: &str = "cs";

/// Key holding the start command. Stored lowercased like every other key.
pub const KEY_COMMAND: &str = "csCmdArgs";

/// Store shared by the event loop (writes) and the shutdown hook (final flush).
/// Held only around `set`/`save`, never across a dialog.
pub type SharedSettings = Arc<Mutex<SettingsStore>>;

/// Locks `shared`, recovering the store if a previous holder panicked.
pub fn lock(shared: &SharedSettings) -> MutexGuard<'_, SettingsStore> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
pub struct SettingsStore {
    dir: PathBuf,
    file: PathBuf,
    // `None` until `init` ran or something was `set`; `save` skips an untouched store.
    values: Option<BTreeMap<String, String>>,
}

impl SettingsStore {
    /// Creates an empty store rooted at `dir`. Nothing touches the disk until `init`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            file: paths::config_file(&dir),
            dir,
            values: None,
        }
    }

    /// Creates an empty store at the default per-user location.
    pub fn from_home() -> Self {
        Self::new(paths::resolve_config_dir())
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Ensures the config directory and file exist, then loads the file if it has content.
    ///
    /// Returns [`LauncherError::Io`] when the directory or file cannot be created or read,
    /// and [`LauncherError::Parse`] when the content is not a flat string map.
    pub fn init(&mut self) -> Result<(), LauncherError> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir).map_err(|e| LauncherError::io(&self.dir, e))?;
            info!(dir = %self.dir.display(), "created config directory");
        }

        let data = if self.file.exists() {
            fs::read_to_string(&self.file).map_err(|e| LauncherError::io(&self.file, e))?
        } else {
            fs::File::create(&self.file).map_err(|e| LauncherError::io(&self.file, e))?;
            info!(file = %self.file.display(), "created empty settings file");
            String::new()
        };

        if data.trim().is_empty() {
            self.values.get_or_insert_with(BTreeMap::new);
            return Ok(());
        }

        // A malformed file stays untouched by `save` unless something is `set` afterwards.
        let parsed: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|source| LauncherError::Parse {
                path: self.file.clone(),
                source,
            })?;
        let values = self.values.get_or_insert_with(BTreeMap::new);
        for (k, v) in parsed {
            values.insert(k.to_lowercase(), v);
        }
        debug!(entries = values.len(), "loaded settings");
        Ok(())
    }

    /// Returns the value stored under `key` (case-insensitive), or an empty string.
    pub fn get(&self, key: &str) -> String {
        self.values
            .as_ref()
            .and_then(|m| m.get(&key.to_lowercase()))
            .cloned()
            .unwrap_or_default()
    }

    /// Stores `value` under the lowercased `key`. Memory only until [`save`](Self::save).
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_lowercase(), value.into());
    }

    /// Overwrites the settings file with the in-memory map.
    pub fn save(&self) -> Result<(), LauncherError> {
        let Some(values) = self.values.as_ref() else {
            return Ok(());
        };
        let data = serde_json::to_string(values).map_err(LauncherError::Serialize)?;
        fs::write(&self.file, data).map_err(|e| LauncherError::io(&self.file, e))?;
        info!(file = %self.file.display(), entries = values.len(), "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_directory_and_empty_file() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join(".config").join("cslauncher");
        let mut store = SettingsStore::new(&dir);

        store.init().unwrap();

        assert!(dir.is_dir());
        let file = dir.join(".cslauncher");
        assert!(file.is_file());
        assert_eq!(fs::read_to_string(file).unwrap(), "");
        assert_eq!(store.get("cs"), "");
    }

    #[test]
    fn test_get_missing_key_returns_empty_string() {
        let store = SettingsStore::new("/nonexistent/never/created");
        assert_eq!(store.get("anything"), "");
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let tmp = tempdir().unwrap();
        let mut store = SettingsStore::new(tmp.path());
        store.set("CS", "x");
        assert_eq!(store.get("cs"), "x");
        assert_eq!(store.get("Cs"), "x");
    }

    #[test]
    fn test_set_save_then_fresh_init_restores_values() {
        let tmp = tempdir().unwrap();
        let mut store = SettingsStore::new(tmp.path());
        store.init().unwrap();
        store.set(KEY_TARGET_DIR, "/opt/cobaltstrike");
        store.set(KEY_COMMAND, "/bin/bash /opt/cobaltstrike/cobaltstrike");
        store.save().unwrap();

        let mut reloaded = SettingsStore::new(tmp.path());
        reloaded.init().unwrap();

        assert_eq!(reloaded.get("cs"), "/opt/cobaltstrike");
        assert_eq!(
            reloaded.get("cscmdargs"),
            "/bin/bash /opt/cobaltstrike/cobaltstrike"
        );
    }

    #[test]
    fn test_saved_file_uses_lowercase_keys() {
        let tmp = tempdir().unwrap();
        let mut store = SettingsStore::new(tmp.path());
        store.init().unwrap();
        store.set("csCmdArgs", "java -jar cobaltstrike.jar");
        store.save().unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["cscmdargs"], "java -jar cobaltstrike.jar");
        assert!(parsed.get("csCmdArgs").is_none());
    }

    #[test]
    fn test_init_lowercases_keys_written_by_hand() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".cslauncher"), r#"{"CS":"/opt/cs"}"#).unwrap();
        let mut store = SettingsStore::new(tmp.path());

        store.init().unwrap();

        assert_eq!(store.get("cs"), "/opt/cs");
    }

    #[test]
    fn test_init_rejects_malformed_file() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".cslauncher"), "{not json").unwrap();
        let mut store = SettingsStore::new(tmp.path());

        let err = store.init().unwrap_err();

        assert!(matches!(err, LauncherError::Parse { .. }));
        store.save().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{not json");
    }

    #[test]
    fn test_init_rejects_non_string_values() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".cslauncher"), r#"{"cs": 3}"#).unwrap();
        let mut store = SettingsStore::new(tmp.path());

        assert!(matches!(store.init(), Err(LauncherError::Parse { .. })));
    }

    #[test]
    fn test_init_fails_when_config_dir_is_a_file() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut store = SettingsStore::new(blocker.join("cslauncher"));

        assert!(matches!(store.init(), Err(LauncherError::Io { .. })));
    }

    #[test]
    fn test_save_on_untouched_store_is_noop() {
        let tmp = tempdir().unwrap();
        let store = SettingsStore::new(tmp.path().join("missing"));

        store.save().unwrap();

        assert!(!tmp.path().join("missing").exists());
    }
}
