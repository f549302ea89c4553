use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use tracing::{debug, error};

use crate::events::MenuAction;
use crate::settings::{self, SharedSettings};

/// Tauri-managed handle to the event loop and the settings it writes.
pub struct AppState {
    actions: Sender<MenuAction>,
    settings: SharedSettings,
    flushed: AtomicBool,
}

impl AppState {
    pub fn new(actions: Sender<MenuAction>, settings: SharedSettings) -> Self {
        Self {
            actions,
            settings,
            flushed: AtomicBool::new(false),
        }
    }

    /// Queues a clicked menu action for the event loop.
    pub fn dispatch(&self, action: MenuAction) {
        if self.actions.send(action).is_err() {
            debug!(?action, "event loop already stopped, dropping action");
        }
    }

    /// Stops the event loop and flushes the settings. Only the first call does anything.
    ///
    /// Does not wait for the loop: it may still be blocked in a modal dialog, and
    /// every change it made so far is already in the shared store.
    pub fn shutdown(&self) {
        if self.flushed.swap(true, Ordering::SeqCst) {
            return;
        }

        // Already gone after Quit, which is fine.
        let _ = self.actions.send(MenuAction::Shutdown);

        if let Err(e) = settings::lock(&self.settings).save() {
            error!(error = %e, "failed to save settings");
        }
    }
}
