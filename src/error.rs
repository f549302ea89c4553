//! Error type shared by the settings store, target resolver and process controller.
//!
//! The event loop is the only place these errors are presented to the user; every
//! other layer returns them with `?`.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    /// A file or directory under the config dir or the target dir could not be accessed.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file exists but does not hold a flat string map.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory settings could not be encoded for writing.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The selected directory has no `cobaltstrike.jar`.
    #[error("missing cobaltstrike.jar file")]
    MissingArchive,

    /// An action needs a target directory and none has been selected.
    #[error("target directory not set")]
    NotFound,

    /// An action needs a start command and none has been configured.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// A child process (target or file browser) could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A native dialog failed for a reason other than the user dismissing it.
    #[error("dialog failed: {0}")]
    Dialog(String),
}

impl LauncherError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
