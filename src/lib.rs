//! # cslauncher
//!
//! Menu-bar launcher for Cobalt Strike on macOS.
//! Remembers the install directory and start command, starts the client, and
//! reveals its folder in Finder.

// Module declarations for organizing code
mod dialogs;
mod error;
mod events;
mod paths;
mod process;
mod settings;
mod state;
mod target;
mod tray;

use std::sync::{mpsc, Arc, Mutex};

use tauri::Manager;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::dialogs::TauriPrompter;
use crate::events::EventLoop;
use crate::process::SystemRunner;
use crate::settings::SettingsStore;
use crate::state::AppState;
use crate::target::Launcher;

pub use crate::error::LauncherError;

/// Main entry point for the launcher.
///
/// Loads the settings, builds the tray, and starts the event-loop worker thread.
/// Settings are flushed once when tauri reports `RunEvent::Exit`.
///
/// # Panics
/// Panics if the Tauri application fails to build
pub fn run() {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("cslauncher starting");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init()) // Opener plugin for revealing the target folder
        .plugin(tauri_plugin_dialog::init()) // Dialog plugin for folder picker and error dialogs
        .setup(|app| {
            // Menu-bar only, no Dock icon.
            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            let mut settings = SettingsStore::from_home();
            let init_error = settings.init().err();
            if let Some(e) = &init_error {
                error!(error = %e, file = %settings.path().display(), "failed to load settings");
            }
            let launcher = Launcher::from_settings(&settings);

            let settings = Arc::new(Mutex::new(settings));
            let (actions_tx, actions_rx) = mpsc::channel();
            app.manage(AppState::new(actions_tx, Arc::clone(&settings)));

            let handle = app.handle().clone();
            let view = tray::build(&handle, &launcher)?;
            let prompter = TauriPrompter::new(handle);

            std::thread::Builder::new()
                .name("event-loop".into())
                .spawn(move || {
                    let event_loop =
                        EventLoop::new(launcher, settings, prompter, SystemRunner, view);
                    if let Some(e) = init_error {
                        event_loop.report(&e);
                    }
                    event_loop.run(actions_rx);
                })?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| {
        if let tauri::RunEvent::Exit = event {
            if let Some(state) = app.try_state::<AppState>() {
                state.shutdown();
            }
            info!("cslauncher exited");
        }
    });
}
