//! Modal prompts shown by the event loop.
//!
//! Folder picking and error messages go through `tauri-plugin-dialog`. The plugin has
//! no free-text input, so the command editor asks `osascript` for a `display dialog`
//! with a default answer, which is what native macOS prompts use anyway.
//!
//! Every call here blocks until the user dismisses the dialog, so it must only run on
//! the event-loop worker thread, never on the tauri main thread.
use std::{path::PathBuf, process::Command};

use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tracing::debug;

use crate::error::LauncherError;

/// Title of every error dialog.
pub const ERROR_TITLE: &str = "Error";

/// Title of the text prompt window.
const PROMPT_TITLE: &str = "cslauncher";

pub trait Prompter {
    /// Asks for free text, pre-filled with `initial`. `Ok(None)` means the user cancelled.
    fn entry(&self, prompt: &str, initial: &str) -> Result<Option<String>, LauncherError>;

    /// Asks for a directory. `Ok(None)` means the user cancelled.
    fn pick_directory(&self) -> Result<Option<PathBuf>, LauncherError>;

    /// Shows a modal error message.
    fn error(&self, message: &str);
}

pub struct TauriPrompter<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriPrompter<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> Prompter for TauriPrompter<R> {
    fn entry(&self, prompt: &str, initial: &str) -> Result<Option<String>, LauncherError> {
        let script = format!(
            "display dialog {} default answer {} with title {}",
            applescript_string(prompt),
            applescript_string(initial),
            applescript_string(PROMPT_TITLE),
        );
        let output = Command::new("osascript")
            .args(["-e", &script, "-e", "text returned of result"])
            .output()
            .map_err(|source| LauncherError::Spawn {
                program: "osascript".to_string(),
                source,
            })?;

        if output.status.success() {
            let text = String::from_utf8_lossy(&output.stdout);
            return Ok(Some(strip_newline(&text).to_string()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_user_cancel(&stderr) {
            debug!("text prompt cancelled");
            return Ok(None);
        }
        Err(LauncherError::Dialog(stderr.trim().to_string()))
    }

    fn pick_directory(&self) -> Result<Option<PathBuf>, LauncherError> {
        match self.app.dialog().file().blocking_pick_folder() {
            Some(picked) => picked
                .into_path()
                .map(Some)
                .map_err(|e| LauncherError::Dialog(e.to_string())),
            None => {
                debug!("directory picker cancelled");
                Ok(None)
            }
        }
    }

    fn error(&self, message: &str) {
        self.app
            .dialog()
            .message(message)
            .title(ERROR_TITLE)
            .kind(MessageDialogKind::Error)
            .blocking_show();
    }
}

/// Quotes `s` as an AppleScript string literal.
fn applescript_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

// osascript terminates its output with a single newline.
fn strip_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

// AppleScript error -128 is "User canceled."
fn is_user_cancel(stderr: &str) -> bool {
    stderr.contains("(-128)")
}
