//! The launcher's single event loop.
//!
//! Menu clicks arrive on the tauri main thread and are sent down one channel as
//! [`MenuAction`]s. A single worker thread owns [`Launcher`], receives one action at
//! a time and runs it to completion before taking the next. The settings store is
//! shared with the shutdown hook, so it is locked only while a value is written and
//! never while a dialog is open. Errors from any action become an error dialog and
//! the loop keeps going.
use std::{ops::ControlFlow, sync::mpsc::Receiver};

use tracing::{debug, error, info};

use crate::{
    dialogs::Prompter,
    error::LauncherError,
    process::ProcessRunner,
    settings::{self, SharedSettings},
    target::Launcher,
    tray::MenuView,
};

/// Prompt shown by the command editor.
pub const COMMAND_PROMPT: &str = "set cs start command args";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    EditCommand,
    SelectPath,
    ShowInFinder,
    StartTarget,
    Quit,
    /// The UI is tearing down on its own; stop without asking it to quit again.
    Shutdown,
}

impl MenuAction {
    const CLICKABLE: [MenuAction; 5] = [
        MenuAction::EditCommand,
        MenuAction::SelectPath,
        MenuAction::ShowInFinder,
        MenuAction::StartTarget,
        MenuAction::Quit,
    ];

    /// Menu item id carrying this action.
    pub fn id(self) -> &'static str {
        match self {
            MenuAction::EditCommand => "cmd_args",
            MenuAction::SelectPath => "select_path",
            MenuAction::ShowInFinder => "show_in_finder",
            MenuAction::StartTarget => "start_cs",
            MenuAction::Quit => "quit",
            MenuAction::Shutdown => "shutdown",
        }
    }

    /// Maps a clicked menu item id back to its action.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::CLICKABLE.into_iter().find(|a| a.id() == id)
    }
}

pub struct EventLoop<P, R, V> {
    launcher: Launcher,
    settings: SharedSettings,
    prompter: P,
    runner: R,
    view: V,
}

impl<P: Prompter, R: ProcessRunner, V: MenuView> EventLoop<P, R, V> {
    pub fn new(launcher: Launcher, settings: SharedSettings, prompter: P, runner: R, view: V) -> Self {
        Self {
            launcher,
            settings,
            prompter,
            runner,
            view,
        }
    }

    /// Shows `err` to the user.
    pub fn report(&self, err: &LauncherError) {
        error!(error = %err, "action failed");
        self.prompter.error(&err.to_string());
    }

    /// Handles actions until Quit, Shutdown, or every sender is gone.
    pub fn run(mut self, actions: Receiver<MenuAction>) {
        info!("event loop started");
        while let Ok(action) = actions.recv() {
            if self.handle(action).is_break() {
                break;
            }
        }
        info!("event loop stopped");
    }

    /// Runs one action to completion.
    pub fn handle(&mut self, action: MenuAction) -> ControlFlow<()> {
        debug!(?action, "handling menu action");
        let result = match action {
            MenuAction::EditCommand => self.edit_command(),
            MenuAction::SelectPath => self.select_path(),
            MenuAction::ShowInFinder => self.launcher.reveal_target(&self.runner),
            MenuAction::StartTarget => self.launcher.start_target(&self.runner),
            MenuAction::Quit => {
                self.view.quit();
                return ControlFlow::Break(());
            }
            MenuAction::Shutdown => return ControlFlow::Break(()),
        };
        if let Err(err) = result {
            self.report(&err);
        }
        ControlFlow::Continue(())
    }

    fn edit_command(&mut self) -> Result<(), LauncherError> {
        let current = self.launcher.command().unwrap_or_default().to_string();
        let Some(input) = self.prompter.entry(COMMAND_PROMPT, &current)? else {
            return Ok(());
        };
        let changed = self
            .launcher
            .set_command(&input, &mut settings::lock(&self.settings));
        if changed {
            self.view.show_command(&input);
        }
        Ok(())
    }

    fn select_path(&mut self) -> Result<(), LauncherError> {
        let Some(dir) = self.prompter.pick_directory()? else {
            return Ok(());
        };
        self.launcher
            .select_path(&dir, &mut settings::lock(&self.settings))?;
        if let Some(dir) = self.launcher.target_dir() {
            self.view.show_path(&dir.display().to_string());
        }
        self.view
            .show_command(self.launcher.command().unwrap_or_default());
        Ok(())
    }
}
