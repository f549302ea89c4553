/// Config directory resolution for cslauncher.
///
/// The launcher keeps a single settings file under a per-user directory.
/// This module decides where that directory lives and names the file inside it.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Name of the per-user directory under `~/.config`.
pub const APP_DIR_NAME: &str = "cslauncher";

/// Name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = ".cslauncher";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "CSLAUNCHER_CONFIG_DIR";

/// Resolves the config directory from the process environment.
///
/// Resolution order:
/// 1. **Environment variable override** via `CSLAUNCHER_CONFIG_DIR`.
/// 2. `<home>/.config/cslauncher` when the home directory is known.
/// 3. **Fallback**: `<cwd>/.config/cslauncher`.
///
/// The directory may not exist yet. Creation is handled by the settings store.
pub fn resolve_config_dir() -> PathBuf {
    resolve_from(
        env::var_os(CONFIG_DIR_ENV),
        env::var_os("HOME"),
        env::current_dir().ok(),
    )
}

/// Applies the resolution order of [`resolve_config_dir`] to explicit inputs.
/// Empty values count as unset.
pub fn resolve_from(
    override_dir: Option<OsString>,
    home: Option<OsString>,
    cwd: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    let base = home
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or(cwd)
        .unwrap_or_else(|| PathBuf::from("."));
    config_dir_under(&base)
}

/// Returns `<base>/.config/cslauncher`.
pub fn config_dir_under(base: &Path) -> PathBuf {
    base.join(".config").join(APP_DIR_NAME)
}

/// Returns the settings file path inside `config_dir`.
pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}
