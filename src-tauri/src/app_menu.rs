use crate::core::error::ShellError;
use crate::core::main_window::{self, MainWindow};
use crate::core::{app_log, config::ABOUT_URL, shell};
use tauri::{
    menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, Submenu, SubmenuBuilder},
    AppHandle, Wry,
};
use tauri_plugin_opener::OpenerExt;

#[cfg(target_os = "macos")]
use tauri::menu::PredefinedMenuItem;

fn build_file_submenu(app: &AppHandle<Wry>) -> tauri::Result<Submenu<Wry>> {
    let reload = MenuItemBuilder::with_id("reload", "Reload Webapp").build(app)?;
    let builder = SubmenuBuilder::with_id(app, "file", "File").item(&reload);

    // Quit lives in the app menu on macOS.
    #[cfg(not(target_os = "macos"))]
    let builder = builder.item(&MenuItemBuilder::with_id("close_window", "Quit").build(app)?);

    builder.build()
}

fn build_view_submenu(app: &AppHandle<Wry>) -> tauri::Result<Submenu<Wry>> {
    let zoom_in = MenuItemBuilder::with_id("zoom_in", "Zoom In")
        .accelerator("CmdOrCtrl+Shift+3")
        .build(app)?;
    let zoom_out = MenuItemBuilder::with_id("zoom_out", "Zoom Out")
        .accelerator("CmdOrCtrl+Shift+2")
        .build(app)?;
    let zoom_reset = MenuItemBuilder::with_id("zoom_reset", "Reset Zoom")
        .accelerator("CmdOrCtrl+Shift+1")
        .build(app)?;

    SubmenuBuilder::with_id(app, "view", "View")
        .item(&zoom_in)
        .item(&zoom_out)
        .item(&zoom_reset)
        .build()
}

fn build_help_submenu(app: &AppHandle<Wry>) -> tauri::Result<Submenu<Wry>> {
    let about = MenuItemBuilder::with_id("about", "About").build(app)?;
    let logs = MenuItemBuilder::with_id("open_logs", "Open Logs Directory").build(app)?;

    SubmenuBuilder::with_id(app, "help", "Help")
        .item(&about)
        .item(&logs)
        .build()
}

#[cfg(target_os = "macos")]
fn build_app_submenu(app: &AppHandle<Wry>) -> tauri::Result<Submenu<Wry>> {
    let quit = MenuItemBuilder::with_id("quit", "Quit")
        .accelerator("CmdOrCtrl+Q")
        .build(app)?;

    SubmenuBuilder::with_id(app, "app", app.package_info().name.clone())
        .item(&quit)
        .build()
}

/// Clipboard shortcuts in WKWebView only work when an Edit menu provides them.
#[cfg(target_os = "macos")]
fn build_edit_submenu(app: &AppHandle<Wry>) -> tauri::Result<Submenu<Wry>> {
    SubmenuBuilder::with_id(app, "edit", "Edit")
        .item(&PredefinedMenuItem::undo(app, None)?)
        .item(&PredefinedMenuItem::redo(app, None)?)
        .separator()
        .item(&PredefinedMenuItem::cut(app, None)?)
        .item(&PredefinedMenuItem::copy(app, None)?)
        .item(&PredefinedMenuItem::paste(app, None)?)
        .item(&PredefinedMenuItem::select_all(app, None)?)
        .build()
}

fn build_app_menu(app: &AppHandle<Wry>) -> tauri::Result<Menu<Wry>> {
    let builder = MenuBuilder::new(app);

    #[cfg(target_os = "macos")]
    let builder = builder
        .item(&build_app_submenu(app)?)
        .item(&build_file_submenu(app)?)
        .item(&build_edit_submenu(app)?);

    #[cfg(not(target_os = "macos"))]
    let builder = builder.item(&build_file_submenu(app)?);

    builder
        .item(&build_view_submenu(app)?)
        .item(&build_help_submenu(app)?)
        .build()
}

pub fn install(app: &AppHandle<Wry>) -> tauri::Result<()> {
    let menu = build_app_menu(app)?;
    app.set_menu(menu)?;
    Ok(())
}

fn open_logs_directory(app: &AppHandle<Wry>) -> Result<(), String> {
    let dir = app_log::log_dir().ok_or_else(|| "Log directory not initialized".to_string())?;
    app.opener()
        .open_path(dir.to_string_lossy(), None::<&str>)
        .map_err(|e| format!("Failed to open log dir: {}", e))
}

/// Runs `f` on a clone of the main window so no lock is held while it fires window events.
fn with_window<F>(app: &AppHandle<Wry>, failure: &str, f: F)
where
    F: FnOnce(&MainWindow) -> Result<(), ShellError>,
{
    let Some(window) = shell::main_window(app) else {
        return;
    };
    if let Err(e) = f(&window) {
        let _ = app_log::warn("menu", failure, serde_json::json!({ "error": e.to_string() }));
    }
}

pub fn handle_menu_event(app: &AppHandle<Wry>, event: MenuEvent) {
    let id = event.id().as_ref();
    match id {
        "reload" => with_window(app, "reload_failed", |w| w.reload()),
        "close_window" => with_window(app, "close_failed", |w| w.close()),
        "zoom_in" => with_window(app, "zoom_failed", |w| w.zoom_in()),
        "zoom_out" => with_window(app, "zoom_failed", |w| w.zoom_out()),
        "zoom_reset" => with_window(app, "zoom_failed", |w| w.reset_zoom()),
        "about" => main_window::open_externally(app, ABOUT_URL),
        "open_logs" => {
            if let Err(e) = open_logs_directory(app) {
                let _ = app_log::warn("menu", "open_logs_failed", serde_json::json!({ "error": e }));
            }
        }
        "quit" => shell::quit(app),
        _ => {}
    }
}
