mod app_menu;
mod core;
mod models;

use anyhow::Context;
use crate::core::{
    app_log, app_updater, config::MAIN_WINDOW_LABEL, shell, ShellState, WindowLifecycle,
    WindowStateStore,
};
use tauri::{Manager, RunEvent, WindowEvent};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .on_menu_event(|app, event| {
            app_menu::handle_menu_event(app, event);
        })
        .setup(|app| {
            let app_handle = app.handle().clone();

            let log_dir = app_handle
                .path()
                .app_log_dir()
                .context("Failed to resolve log dir")?;
            if let Err(e) = app_log::init(log_dir) {
                eprintln!("{}", e);
            }
            app_log::install_panic_hook();
            let _ = app_log::info("app", "startup");

            let config_dir = app_handle
                .path()
                .app_config_dir()
                .context("Failed to resolve config dir")?;
            let store_path =
                WindowStateStore::file_path(&config_dir, &app_handle.package_info().name);
            let store = WindowStateStore::open_or_default(store_path);
            app.manage(ShellState::new(WindowLifecycle::new(store)));

            app_menu::install(&app_handle)?;
            shell::open_main_window(&app_handle).context("Failed to open main window")?;
            app_updater::check_once(app_handle);

            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            match event {
                // Geometry has to be read while the native window is still alive.
                WindowEvent::CloseRequested { .. } => {
                    shell::on_close_requested(window.app_handle());
                }
                WindowEvent::Destroyed => {
                    shell::on_destroyed(window.app_handle());
                }
                _ => {}
            }
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { code, api, .. } => {
            // On macOS the app outlives its last window until an explicit quit.
            if code.is_none() && cfg!(target_os = "macos") {
                api.prevent_exit();
                return;
            }
            shell::on_close_requested(app_handle);
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            if !has_visible_windows {
                shell::reopen(app_handle);
            }
        }
        _ => {}
    });
}
