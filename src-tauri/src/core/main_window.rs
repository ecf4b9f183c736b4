use super::app_log;
use super::config::{HOME_URL, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE};
use super::error::ShellError;
use super::lifecycle::{LaunchParams, ShellWindow, WindowHost};
use super::navigation::{self, PopupAction};
use super::{placement, zoom};
use crate::models::{DisplayRegion, NavigationRequest, WindowRectangle};
use parking_lot::Mutex;
use std::sync::Arc;
use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{
    AppHandle, Manager, PhysicalPosition, PhysicalSize, Position, Size, WebviewUrl,
    WebviewWindow, WebviewWindowBuilder,
};
use tauri_plugin_opener::OpenerExt;
use url::Url;

fn window_error(action: &str, e: tauri::Error) -> ShellError {
    ShellError::Window(format!("Failed to {}: {}", action, e))
}

/// The main webview window plus the zoom factor it is currently showing.
///
/// Webviews don't report their zoom, so every change goes through `set_zoom` and is tracked here.
#[derive(Clone)]
pub struct MainWindow {
    window: WebviewWindow,
    zoom: Arc<Mutex<f64>>,
}

impl MainWindow {
    pub fn set_zoom(&self, factor: f64) -> Result<(), ShellError> {
        self.window
            .set_zoom(factor)
            .map_err(|e| window_error("set zoom", e))?;
        *self.zoom.lock() = factor;
        Ok(())
    }

    pub fn zoom_in(&self) -> Result<(), ShellError> {
        self.set_zoom(zoom::zoom_in(self.zoom_factor()))
    }

    pub fn zoom_out(&self) -> Result<(), ShellError> {
        self.set_zoom(zoom::zoom_out(self.zoom_factor()))
    }

    pub fn reset_zoom(&self) -> Result<(), ShellError> {
        self.set_zoom(zoom::reset())
    }

    pub fn reload(&self) -> Result<(), ShellError> {
        self.window
            .eval("window.location.reload()")
            .map_err(|e| window_error("reload", e))
    }

    pub fn show(&self) -> Result<(), ShellError> {
        self.window.show().map_err(|e| window_error("show window", e))?;
        self.window
            .set_focus()
            .map_err(|e| window_error("focus window", e))
    }

    pub fn close(&self) -> Result<(), ShellError> {
        self.window.close().map_err(|e| window_error("close window", e))
    }
}

impl ShellWindow for MainWindow {
    fn bounds(&self) -> Result<WindowRectangle, ShellError> {
        let position = self
            .window
            .outer_position()
            .map_err(|e| window_error("read position", e))?;
        let size = self
            .window
            .inner_size()
            .map_err(|e| window_error("read size", e))?;
        Ok(WindowRectangle::at(position.x, position.y, size.width, size.height))
    }

    fn zoom_factor(&self) -> f64 {
        *self.zoom.lock()
    }

    fn is_maximized(&self) -> Result<bool, ShellError> {
        self.window
            .is_maximized()
            .map_err(|e| window_error("read maximized state", e))
    }
}

/// Hands `url` to the system's default handler.
pub fn open_externally(app_handle: &AppHandle, url: &str) {
    if let Err(e) = app_handle.opener().open_url(url, None::<&str>) {
        let _ = app_log::warn(
            "navigation",
            "open_external_failed",
            serde_json::json!({ "url": url, "error": e.to_string() }),
        );
    }
}

/// Runs the navigation policy and performs its side effect. Returns whether the webview may
/// continue.
fn route_navigation(app_handle: &AppHandle, current: &Mutex<Url>, target: &Url) -> bool {
    let current_url = current.lock().to_string();
    let decision = navigation::decide(&NavigationRequest::new(target.as_str(), current_url));
    if decision.open_externally {
        open_externally(app_handle, target.as_str());
    }
    decision.allow
}

/// Popups never get a window of their own; they load in place or go to the browser.
fn route_popup(app_handle: &AppHandle, current: &Mutex<Url>, target: Url) {
    let current_url = current.lock().to_string();
    let request = NavigationRequest::new(target.as_str(), current_url);
    match navigation::route_new_window(&request) {
        PopupAction::LoadInMainWindow => {
            if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
                let _ = window.navigate(target);
            }
        }
        PopupAction::OpenExternally => open_externally(app_handle, target.as_str()),
        PopupAction::Ignore => {}
    }
}

/// Builds main windows for the lifecycle controller on top of a Tauri app.
pub struct TauriHost {
    app_handle: AppHandle,
}

impl TauriHost {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn build_webview(&self, home: Url) -> Result<WebviewWindow, ShellError> {
        // Host of the page currently shown; the policy compares targets against it.
        let current_page = Arc::new(Mutex::new(home.clone()));

        let nav_app = self.app_handle.clone();
        let nav_page = Arc::clone(&current_page);
        let popup_app = self.app_handle.clone();
        let popup_page = Arc::clone(&current_page);
        let load_page = Arc::clone(&current_page);

        WebviewWindowBuilder::new(&self.app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(home))
            .title(MAIN_WINDOW_TITLE)
            .visible(false)
            .zoom_hotkeys_enabled(false)
            .on_navigation(move |url| route_navigation(&nav_app, &nav_page, url))
            .on_new_window(move |url, _features| {
                route_popup(&popup_app, &popup_page, url);
                NewWindowResponse::Deny
            })
            .on_page_load(move |_window, payload| {
                if matches!(payload.event(), PageLoadEvent::Finished) {
                    *load_page.lock() = payload.url().clone();
                }
            })
            .build()
            .map_err(|e| window_error("build main window", e))
    }
}

impl WindowHost for TauriHost {
    type Window = MainWindow;

    fn displays(&self) -> Vec<DisplayRegion> {
        placement::current_displays(&self.app_handle)
    }

    fn create_window(&self, params: &LaunchParams) -> Result<MainWindow, ShellError> {
        let home = Url::parse(HOME_URL).map_err(|e| ShellError::MalformedNavigationTarget {
            url: HOME_URL.to_string(),
            reason: e.to_string(),
        })?;
        let window = self.build_webview(home)?;

        let rect = params.rectangle;
        let _ = window.set_size(Size::Physical(PhysicalSize {
            width: rect.width,
            height: rect.height,
        }));
        match rect.position() {
            Some((x, y)) => {
                let _ = window.set_position(Position::Physical(PhysicalPosition { x, y }));
            }
            None => {
                let _ = window.center();
            }
        }

        let main_window = MainWindow {
            window,
            zoom: Arc::new(Mutex::new(params.zoom_factor)),
        };
        if let Err(e) = main_window.set_zoom(params.zoom_factor) {
            let _ = app_log::warn(
                "lifecycle",
                "zoom_restore_failed",
                serde_json::json!({ "error": e.to_string() }),
            );
        }

        if params.maximized {
            let _ = main_window.window.maximize();
        }

        Ok(main_window)
    }
}
