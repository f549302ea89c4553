//! Starting the target and revealing its folder.
//!
//! Children are fire-and-forget: the launcher never waits on them, never reads
//! their output and never kills them. A `Child` handle is dropped right after
//! spawning, which leaves the process running on its own.
use std::{
    io,
    path::Path,
    process::{Command, Stdio},
};

use tracing::info;

use crate::{error::LauncherError, target::Launcher};

/// Message shown when Start is clicked before any command exists.
pub const NO_COMMAND_MESSAGE: &str = "must set cobaltstrike path";

/// Process boundary used by [`Launcher::start_target`] and [`Launcher::reveal_target`].
pub trait ProcessRunner {
    /// Starts `program` with `args` without waiting for it.
    fn spawn(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<(), LauncherError>;

    /// Opens `dir` in the platform file browser.
    fn reveal(&self, dir: &Path) -> Result<(), LauncherError>;
}

/// Runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn spawn(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<(), LauncherError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let child = cmd.spawn().map_err(|source| LauncherError::Spawn {
            program: program.to_string(),
            source,
        })?;
        info!(pid = child.id(), program, "started target");
        Ok(())
    }

    fn reveal(&self, dir: &Path) -> Result<(), LauncherError> {
        tauri_plugin_opener::open_path(dir, None::<&str>).map_err(|e| LauncherError::Spawn {
            program: "open".to_string(),
            source: io::Error::other(e.to_string()),
        })?;
        info!(dir = %dir.display(), "revealed target in file browser");
        Ok(())
    }
}

/// Splits a stored command on single spaces. Quoting is not supported, so an
/// argument can never contain a space.
pub fn split_command(command: &str) -> (&str, Vec<&str>) {
    let mut parts = command.split(' ');
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

impl Launcher {
    /// Starts the configured command inside the target directory.
    pub fn start_target(&self, runner: &impl ProcessRunner) -> Result<(), LauncherError> {
        let command = self
            .command()
            .filter(|c| !c.is_empty())
            .ok_or(LauncherError::NotConfigured(NO_COMMAND_MESSAGE))?;
        let (program, args) = split_command(command);
        runner.spawn(program, &args, self.target_dir())
    }

    /// Opens the target directory in the file browser.
    pub fn reveal_target(&self, runner: &impl ProcessRunner) -> Result<(), LauncherError> {
        let dir = self.target_dir().ok_or(LauncherError::NotFound)?;
        runner.reveal(dir)
    }
}
