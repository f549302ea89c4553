//! Target directory resolution.
//!
//! A target directory is valid when it contains `cobaltstrike.jar`. When the
//! vendor's `cobaltstrike` startup script sits next to it, the launcher runs that
//! script through bash; otherwise it falls back to a plain JVM invocation.
use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    error::LauncherError,
    settings::{SettingsStore, KEY_COMMAND, KEY_TARGET_DIR},
};

/// File whose presence marks a directory as a valid target.
pub const ARCHIVE_FILE: &str = "cobaltstrike.jar";

/// Vendor startup script, preferred over [`DEFAULT_COMMAND`] when present.
pub const LAUNCHER_SCRIPT: &str = "cobaltstrike";

/// Interpreter used to run [`LAUNCHER_SCRIPT`].
pub const SCRIPT_SHELL: &str = "/bin/bash";

/// Command used when the target has no startup script.
pub const DEFAULT_COMMAND: &str =
    "java -XX:ParallelGCThreads=4 -XX:+AggressiveHeap -XX:+UseParallelGC -jar cobaltstrike.jar $*";

/// In-memory launcher state: the chosen directory and the command to run in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Launcher {
    pub(crate) target_dir: Option<PathBuf>,
    pub(crate) command: Option<String>,
}

impl Launcher {
    /// Restores the state saved by a previous run.
    pub fn from_settings(settings: &SettingsStore) -> Self {
        let dir = settings.get(KEY_TARGET_DIR);
        let command = settings.get(KEY_COMMAND);
        Self {
            target_dir: (!dir.is_empty()).then(|| PathBuf::from(dir)),
            command: (!command.is_empty()).then_some(command),
        }
    }

    pub fn target_dir(&self) -> Option<&Path> {
        self.target_dir.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Validates `dir` as a target and derives the command to start it.
    ///
    /// An empty path is a cancelled picker and changes nothing. On
    /// [`LauncherError::MissingArchive`] or an unreadable directory the current
    /// state and `settings` are left as they were.
    pub fn select_path(
        &mut self,
        dir: &Path,
        settings: &mut SettingsStore,
    ) -> Result<(), LauncherError> {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }

        let entries = fs::read_dir(dir).map_err(|e| LauncherError::io(dir, e))?;
        let mut has_archive = false;
        let mut script_command = None;
        for entry in entries {
            let entry = entry.map_err(|e| LauncherError::io(dir, e))?;
            let name = entry.file_name();
            if name == LAUNCHER_SCRIPT {
                script_command = Some(format!(
                    "{} {}",
                    SCRIPT_SHELL,
                    dir.join(LAUNCHER_SCRIPT).display()
                ));
            } else if name == ARCHIVE_FILE {
                has_archive = true;
            }
        }

        if !has_archive {
            warn!(dir = %dir.display(), "selected directory has no {ARCHIVE_FILE}");
            return Err(LauncherError::MissingArchive);
        }

        let command = script_command
            .or_else(|| self.command.clone())
            .unwrap_or_else(|| DEFAULT_COMMAND.to_string());

        settings.set(KEY_TARGET_DIR, dir.to_string_lossy());
        settings.set(KEY_COMMAND, command.as_str());
        info!(dir = %dir.display(), command = %command, "target selected");
        self.target_dir = Some(dir.to_path_buf());
        self.command = Some(command);
        Ok(())
    }

    /// Replaces the start command with user input. Empty input is ignored.
    ///
    /// Returns `true` when the command changed.
    pub fn set_command(&mut self, command: &str, settings: &mut SettingsStore) -> bool {
        if command.is_empty() {
            return false;
        }
        settings.set(KEY_COMMAND, command);
        self.command = Some(command.to_string());
        info!(command = %command, "start command updated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn target_with(files: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), "").unwrap();
        }
        dir
    }

    fn store() -> (TempDir, SettingsStore) {
        let cfg = tempdir().unwrap();
        let mut s = SettingsStore::new(cfg.path());
        s.init().unwrap();
        (cfg, s)
    }

    #[test]
    fn test_missing_archive_is_rejected_and_state_untouched() {
        let (_cfg, mut settings) = store();
        let target = target_with(&[LAUNCHER_SCRIPT, "README.txt"]);
        let mut launcher = Launcher {
            target_dir: Some(PathBuf::from("/previous")),
            command: Some("java -jar old.jar".into()),
        };
        let before = launcher.clone();

        let err = launcher.select_path(target.path(), &mut settings).unwrap_err();

        assert!(matches!(err, LauncherError::MissingArchive));
        assert_eq!(launcher, before);
        assert_eq!(settings.get("cs"), "");
        assert_eq!(settings.get("cscmdargs"), "");
    }

    #[test]
    fn test_script_next_to_archive_runs_through_bash() {
        let (_cfg, mut settings) = store();
        let target = target_with(&[ARCHIVE_FILE, LAUNCHER_SCRIPT]);
        let mut launcher = Launcher::default();

        launcher.select_path(target.path(), &mut settings).unwrap();

        let expected = format!("/bin/bash {}", target.path().join("cobaltstrike").display());
        assert_eq!(launcher.command(), Some(expected.as_str()));
        assert_eq!(launcher.target_dir(), Some(target.path()));
        assert_eq!(settings.get("csCmdArgs"), expected);
    }

    #[test]
    fn test_script_overrides_existing_command() {
        let (_cfg, mut settings) = store();
        let target = target_with(&[ARCHIVE_FILE, LAUNCHER_SCRIPT]);
        let mut launcher = Launcher {
            target_dir: None,
            command: Some("java -Xmx2g -jar cobaltstrike.jar".into()),
        };

        launcher.select_path(target.path(), &mut settings).unwrap();

        assert!(launcher.command().unwrap().starts_with("/bin/bash "));
    }

    #[test]
    fn test_archive_only_uses_default_command() {
        let (_cfg, mut settings) = store();
        let target = target_with(&[ARCHIVE_FILE]);
        let mut launcher = Launcher::default();

        launcher.select_path(target.path(), &mut settings).unwrap();

        assert_eq!(launcher.command(), Some(DEFAULT_COMMAND));
        assert_eq!(settings.get("cs"), target.path().to_string_lossy());
        assert_eq!(settings.get("cscmdargs"), DEFAULT_COMMAND);
    }

    #[test]
    fn test_archive_only_keeps_existing_command() {
        let (_cfg, mut settings) = store();
        let target = target_with(&[ARCHIVE_FILE]);
        let mut launcher = Launcher {
            target_dir: None,
            command: Some("java -Xmx2g -jar cobaltstrike.jar".into()),
        };

        launcher.select_path(target.path(), &mut settings).unwrap();

        assert_eq!(launcher.command(), Some("java -Xmx2g -jar cobaltstrike.jar"));
    }

    #[test]
    fn test_empty_path_changes_nothing() {
        let (_cfg, mut settings) = store();
        let mut launcher = Launcher::default();

        launcher.select_path(Path::new(""), &mut settings).unwrap();

        assert_eq!(launcher, Launcher::default());
        assert_eq!(settings.get("cs"), "");
    }

    #[test]
    fn test_unreadable_directory_is_io_error() {
        let (_cfg, mut settings) = store();
        let tmp = tempdir().unwrap();
        let mut launcher = Launcher::default();

        let err = launcher
            .select_path(&tmp.path().join("gone"), &mut settings)
            .unwrap_err();

        assert!(matches!(err, LauncherError::Io { .. }));
        assert_eq!(launcher, Launcher::default());
    }

    #[test]
    fn test_set_command_ignores_empty_input() {
        let (_cfg, mut settings) = store();
        let mut launcher = Launcher::default();

        assert!(!launcher.set_command("", &mut settings));
        assert!(launcher.set_command("java -jar cobaltstrike.jar", &mut settings));

        assert_eq!(launcher.command(), Some("java -jar cobaltstrike.jar"));
        assert_eq!(settings.get("csCmdArgs"), "java -jar cobaltstrike.jar");
    }

    #[test]
    fn test_from_settings_treats_empty_values_as_unset() {
        let (_cfg, mut settings) = store();
        assert_eq!(Launcher::from_settings(&settings), Launcher::default());

        settings.set("cs", "/opt/cs");
        let launcher = Launcher::from_settings(&settings);
        assert_eq!(launcher.target_dir(), Some(Path::new("/opt/cs")));
        assert_eq!(launcher.command(), None);
    }

    #[test]
    fn test_fresh_config_to_restart_scenario() {
        let cfg = tempdir().unwrap();
        let target = target_with(&[ARCHIVE_FILE]);

        let mut settings = SettingsStore::new(cfg.path());
        settings.init().unwrap();
        assert_eq!(settings.get("cs"), "");

        let mut launcher = Launcher::from_settings(&settings);
        launcher.select_path(target.path(), &mut settings).unwrap();
        assert_eq!(launcher.target_dir(), Some(target.path()));
        assert_eq!(launcher.command(), Some(DEFAULT_COMMAND));
        settings.save().unwrap();

        let text = fs::read_to_string(settings.path()).unwrap();
        assert!(text.contains("\"cs\""));
        assert!(text.contains("\"cscmdargs\""));

        let mut restarted = SettingsStore::new(cfg.path());
        restarted.init().unwrap();
        assert_eq!(restarted.get("cs"), target.path().to_string_lossy());
        let restored = Launcher::from_settings(&restarted);
        assert_eq!(restored, launcher);
    }
}
