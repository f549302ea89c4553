//! Menu-bar icon and its menu.
//!
//! Layout, top to bottom:
//! - `Path: ...` (disabled, display only)
//! - `CmdArgs: ...` (shows the command, click to edit it)
//! - separator
//! - `Select Path`, `ShowInFinder`, `Start CS`
//! - separator
//! - `Quit`
use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::TrayIconBuilder,
    AppHandle, Manager, Runtime,
};
use tracing::warn;

use crate::{events::MenuAction, state::AppState, target::Launcher};

pub const TRAY_ID: &str = "cslauncher";
pub const TRAY_TITLE: &str = "cslauncher";
pub const TRAY_TOOLTIP: &str = "Cobalt Strike Launcher on macOS - zznQ";

pub const PATH_PREFIX: &str = "Path: ";
pub const COMMAND_PREFIX: &str = "CmdArgs: ";

/// Label updates the event loop makes after handling an action.
pub trait MenuView {
    fn show_path(&self, path: &str);
    fn show_command(&self, command: &str);
    /// Asks the UI framework to exit. Shutdown continues on the main thread.
    fn quit(&self);
}

/// Handles on the two status items, moved into the worker thread.
pub struct TrayMenu<R: Runtime> {
    app: AppHandle<R>,
    path_item: MenuItem<R>,
    command_item: MenuItem<R>,
}

impl<R: Runtime> MenuView for TrayMenu<R> {
    fn show_path(&self, path: &str) {
        if let Err(e) = self.path_item.set_text(format!("{PATH_PREFIX}{path}")) {
            warn!(error = %e, "failed to update path label");
        }
    }

    fn show_command(&self, command: &str) {
        if let Err(e) = self.command_item.set_text(format!("{COMMAND_PREFIX}{command}")) {
            warn!(error = %e, "failed to update command label");
        }
    }

    fn quit(&self) {
        self.app.exit(0);
    }
}

/// Builds the tray icon and menu, labelled from the restored `launcher` state.
///
/// Clicks are forwarded to the event loop through [`AppState::dispatch`]; the
/// closure never handles an action itself.
pub fn build<R: Runtime>(app: &AppHandle<R>, launcher: &Launcher) -> tauri::Result<TrayMenu<R>> {
    let path_item = MenuItem::with_id(
        app,
        "path",
        path_label(launcher),
        false,
        None::<&str>,
    )?;
    let command_item = MenuItem::with_id(
        app,
        MenuAction::EditCommand.id(),
        command_label(launcher),
        true,
        None::<&str>,
    )?;
    let select_path = MenuItem::with_id(
        app,
        MenuAction::SelectPath.id(),
        "Select Path",
        true,
        None::<&str>,
    )?;
    let show_in_finder = MenuItem::with_id(
        app,
        MenuAction::ShowInFinder.id(),
        "ShowInFinder",
        true,
        None::<&str>,
    )?;
    let start = MenuItem::with_id(
        app,
        MenuAction::StartTarget.id(),
        "Start CS",
        true,
        None::<&str>,
    )?;
    let quit = MenuItem::with_id(app, MenuAction::Quit.id(), "Quit", true, None::<&str>)?;

    let menu = Menu::with_items(
        app,
        &[
            &path_item,
            &command_item,
            &PredefinedMenuItem::separator(app)?,
            &select_path,
            &show_in_finder,
            &start,
            &PredefinedMenuItem::separator(app)?,
            &quit,
        ],
    )?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(tauri::include_image!("icons/icon.png"))
        .icon_as_template(true)
        .title(TRAY_TITLE)
        .tooltip(TRAY_TOOLTIP)
        .menu(&menu)
        .show_menu_on_left_click(true)
        .on_menu_event(|app, event| match MenuAction::from_id(event.id().as_ref()) {
            Some(action) => app.state::<AppState>().dispatch(action),
            None => warn!(id = ?event.id(), "click on unknown menu item"),
        })
        .build(app)?;

    Ok(TrayMenu {
        app: app.clone(),
        path_item,
        command_item,
    })
}

/// Status label for the target directory; bare prefix when unset.
pub fn path_label(launcher: &Launcher) -> String {
    match launcher.target_dir() {
        Some(dir) => format!("{PATH_PREFIX}{}", dir.display()),
        None => PATH_PREFIX.to_string(),
    }
}

/// Status label for the start command; bare prefix when unset.
pub fn command_label(launcher: &Launcher) -> String {
    format!("{COMMAND_PREFIX}{}", launcher.command().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_labels_show_bare_prefix_when_unset() {
        let launcher = Launcher::default();
        assert_eq!(path_label(&launcher), "Path: ");
        assert_eq!(command_label(&launcher), "CmdArgs: ");
    }

    #[test]
    fn test_labels_show_restored_state() {
        let launcher = Launcher {
            target_dir: Some(PathBuf::from("/opt/cs")),
            command: Some("java -jar cobaltstrike.jar".into()),
        };
        assert_eq!(path_label(&launcher), "Path: /opt/cs");
        assert_eq!(command_label(&launcher), "CmdArgs: java -jar cobaltstrike.jar");
    }

    #[test]
    fn test_tooltip_carries_author_suffix() {
        assert_eq!(TRAY_TOOLTIP, "Cobalt Strike Launcher on macOS - zznQ");
    }
}
