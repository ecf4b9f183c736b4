//! Glue between Tauri events and the window lifecycle controller.
//!
//! The controller lock is never held while calling into a window method that can fire window
//! events back at us (close, show), since those handlers take the same lock.

use super::app_log;
use super::error::ShellError;
use super::lifecycle::WindowLifecycle;
use super::main_window::{MainWindow, TauriHost};
use parking_lot::Mutex;
use tauri::{AppHandle, Manager};

pub type ShellState = Mutex<WindowLifecycle<MainWindow>>;

pub fn open_main_window(app_handle: &AppHandle) -> Result<(), ShellError> {
    let shell = app_handle.state::<ShellState>();

    let window = {
        let mut lifecycle = shell.lock();
        if !lifecycle.needs_window() {
            return Ok(());
        }
        lifecycle.create(&TauriHost::new(app_handle.clone()))?;
        lifecycle.window().cloned()
    };

    if let Some(window) = window {
        window.show()?;
        shell.lock().activate();
    }
    Ok(())
}

/// Clone of the live main window, if there is one.
pub fn main_window(app_handle: &AppHandle) -> Option<MainWindow> {
    let shell = app_handle.state::<ShellState>();
    let lifecycle = shell.lock();
    lifecycle.window().cloned()
}

pub fn on_close_requested(app_handle: &AppHandle) {
    let shell = app_handle.state::<ShellState>();
    shell.lock().begin_close();
}

pub fn on_destroyed(app_handle: &AppHandle) {
    let shell = app_handle.state::<ShellState>();
    shell.lock().release();
    let _ = app_log::info("lifecycle", "window_destroyed");
}

/// Dock re-activation: bring back a window if the last one was closed.
pub fn reopen(app_handle: &AppHandle) {
    if let Err(e) = open_main_window(app_handle) {
        let _ = app_log::error(
            "lifecycle",
            "reopen_failed",
            serde_json::json!({ "error": e.to_string() }),
        );
    }
}

pub fn quit(app_handle: &AppHandle) {
    on_close_requested(app_handle);
    app_handle.exit(0);
}
