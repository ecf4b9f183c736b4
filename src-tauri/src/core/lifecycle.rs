use super::app_log;
use super::error::ShellError;
use super::placement;
use super::window_state_store::WindowStateStore;
use crate::models::{DisplayRegion, WindowRectangle};

/// What the controller needs to read back from a live window before it goes away.
pub trait ShellWindow {
    fn bounds(&self) -> Result<WindowRectangle, ShellError>;
    fn zoom_factor(&self) -> f64;
    fn is_maximized(&self) -> Result<bool, ShellError>;
}

/// Parameters a new window is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub rectangle: WindowRectangle,
    pub zoom_factor: f64,
    pub maximized: bool,
}

/// Source of display topology and native windows.
pub trait WindowHost {
    type Window: ShellWindow;

    fn displays(&self) -> Vec<DisplayRegion>;
    fn create_window(&self, params: &LaunchParams) -> Result<Self::Window, ShellError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unborn,
    Created,
    Active,
    Closing,
    Destroyed,
}

/// Owns the store and the one main window, and moves state between them.
pub struct WindowLifecycle<W> {
    store: WindowStateStore,
    state: LifecycleState,
    window: Option<W>,
}

impl<W: ShellWindow> WindowLifecycle<W> {
    pub fn new(store: WindowStateStore) -> Self {
        Self {
            store,
            state: LifecycleState::Unborn,
            window: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    pub fn store(&self) -> &WindowStateStore {
        &self.store
    }

    pub fn needs_window(&self) -> bool {
        matches!(self.state, LifecycleState::Unborn | LifecycleState::Destroyed)
    }

    /// Restores placement and zoom from the store and builds the window.
    ///
    /// Does nothing when a window already exists. On failure the controller stays where it was.
    pub fn create<H>(&mut self, host: &H) -> Result<(), ShellError>
    where
        H: WindowHost<Window = W>,
    {
        if !self.needs_window() {
            return Ok(());
        }

        let persisted = self.store.state();
        let displays = host.displays();
        let params = LaunchParams {
            rectangle: placement::resolve(&persisted, &displays),
            zoom_factor: persisted.zoom_factor,
            maximized: persisted.window_maximized,
        };

        let window = host.create_window(&params)?;
        let _ = app_log::append(app_log::AppLogRecord::now(
            "info",
            "lifecycle",
            "window_created",
            Some(serde_json::json!({
                "x": params.rectangle.x,
                "y": params.rectangle.y,
                "width": params.rectangle.width,
                "height": params.rectangle.height,
                "zoom_factor": params.zoom_factor,
                "maximized": params.maximized,
                "displays": displays.len(),
            })),
        ));

        self.window = Some(window);
        self.state = LifecycleState::Created;
        Ok(())
    }

    pub fn activate(&mut self) {
        if self.state == LifecycleState::Created {
            self.state = LifecycleState::Active;
        }
    }

    /// Captures geometry, zoom and maximized state from the live window and writes them out.
    ///
    /// Must run while the native window still exists. Failures are logged and never block the
    /// close.
    pub fn begin_close(&mut self) {
        if !matches!(self.state, LifecycleState::Created | LifecycleState::Active) {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        let maximized = match window.is_maximized() {
            Ok(maximized) => maximized,
            Err(e) => {
                let _ = app_log::warn(
                    "lifecycle",
                    "maximized_read_failed",
                    serde_json::json!({ "error": e.to_string() }),
                );
                self.store.window_maximized()
            }
        };
        self.store.set_window_maximized(maximized);
        self.store.set_zoom_factor(window.zoom_factor());

        // Written even when maximized, so the window comes back on the display it was on.
        match window.bounds() {
            Ok(bounds) => self.store.set_window_rectangle(bounds),
            Err(e) => {
                let _ = app_log::warn(
                    "lifecycle",
                    "bounds_read_failed",
                    serde_json::json!({ "error": e.to_string() }),
                );
            }
        }

        if let Err(e) = self.store.save() {
            let _ = app_log::error(
                "lifecycle",
                "state_save_failed",
                serde_json::json!({ "error": e.to_string() }),
            );
        }

        self.state = LifecycleState::Closing;
    }

    /// Drops the window handle so a later re-open can build a fresh one.
    pub fn release(&mut self) {
        if matches!(self.state, LifecycleState::Created | LifecycleState::Active) {
            self.begin_close();
        }
        if self.window.take().is_some() {
            self.state = LifecycleState::Destroyed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersistedState;
    use std::cell::{Cell, RefCell};
    use std::fs;

    struct FakeWindow {
        bounds: Result<WindowRectangle, String>,
        zoom: f64,
        maximized: bool,
    }

    impl ShellWindow for FakeWindow {
        fn bounds(&self) -> Result<WindowRectangle, ShellError> {
            self.bounds.clone().map_err(ShellError::Window)
        }

        fn zoom_factor(&self) -> f64 {
            self.zoom
        }

        fn is_maximized(&self) -> Result<bool, ShellError> {
            Ok(self.maximized)
        }
    }

    struct FakeHost {
        displays: Vec<DisplayRegion>,
        fail: bool,
        launched: RefCell<Vec<LaunchParams>>,
        next_window: Cell<Option<WindowRectangle>>,
    }

    impl FakeHost {
        fn with_displays(displays: Vec<DisplayRegion>) -> Self {
            Self {
                displays,
                fail: false,
                launched: RefCell::new(Vec::new()),
                next_window: Cell::new(None),
            }
        }
    }

    impl WindowHost for FakeHost {
        type Window = FakeWindow;

        fn displays(&self) -> Vec<DisplayRegion> {
            self.displays.clone()
        }

        fn create_window(&self, params: &LaunchParams) -> Result<FakeWindow, ShellError> {
            if self.fail {
                return Err(ShellError::Window("webview refused".to_string()));
            }
            self.launched.borrow_mut().push(*params);
            let bounds = self
                .next_window
                .take()
                .unwrap_or_else(|| {
                    let r = params.rectangle;
                    WindowRectangle::at(r.x.unwrap_or(0), r.y.unwrap_or(0), r.width, r.height)
                });
            Ok(FakeWindow {
                bounds: Ok(bounds),
                zoom: params.zoom_factor,
                maximized: params.maximized,
            })
        }
    }

    fn one_display() -> Vec<DisplayRegion> {
        vec![DisplayRegion::new(0, 0, 1920, 1080)]
    }

    fn seeded_store(dir: &std::path::Path, state: PersistedState) -> WindowStateStore {
        let path = WindowStateStore::file_path(dir, "kanbanflow-app");
        let mut store = WindowStateStore::open(path).expect("open");
        store.replace(state);
        store.save().expect("seed");
        store
    }

    #[test]
    fn create_restores_stored_placement_and_zoom() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = PersistedState {
            zoom_factor: 1.2,
            window_rectangle: WindowRectangle::at(100, 100, 800, 600),
            window_maximized: true,
        };
        let host = FakeHost::with_displays(one_display());
        let mut lifecycle = WindowLifecycle::new(seeded_store(dir.path(), state));

        assert_eq!(lifecycle.state(), LifecycleState::Unborn);
        lifecycle.create(&host).expect("create");
        assert_eq!(lifecycle.state(), LifecycleState::Created);
        assert_eq!(
            host.launched.borrow()[0],
            LaunchParams {
                rectangle: WindowRectangle::at(100, 100, 800, 600),
                zoom_factor: 1.2,
                maximized: true,
            }
        );

        lifecycle.activate();
        assert_eq!(lifecycle.state(), LifecycleState::Active);
    }

    #[test]
    fn create_centers_window_from_a_missing_display() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = PersistedState {
            window_rectangle: WindowRectangle::at(2000, 100, 800, 600),
            ..PersistedState::default()
        };
        let host = FakeHost::with_displays(one_display());
        let mut lifecycle = WindowLifecycle::new(seeded_store(dir.path(), state));

        lifecycle.create(&host).expect("create");
        assert_eq!(
            host.launched.borrow()[0].rectangle,
            WindowRectangle::unpositioned(800, 600)
        );
    }

    #[test]
    fn close_writes_live_state_through_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = FakeHost::with_displays(one_display());
        host.next_window.set(Some(WindowRectangle::at(40, 60, 1000, 700)));
        let mut lifecycle =
            WindowLifecycle::new(seeded_store(dir.path(), PersistedState::default()));

        lifecycle.create(&host).expect("create");
        lifecycle.activate();
        lifecycle.begin_close();
        assert_eq!(lifecycle.state(), LifecycleState::Closing);
        lifecycle.release();
        assert_eq!(lifecycle.state(), LifecycleState::Destroyed);
        assert!(lifecycle.window().is_none());

        let reopened = WindowStateStore::open(lifecycle.store().path().to_path_buf())
            .expect("reopen");
        assert_eq!(
            reopened.state(),
            PersistedState {
                zoom_factor: 1.0,
                window_rectangle: WindowRectangle::at(40, 60, 1000, 700),
                window_maximized: false,
            }
        );
    }

    #[test]
    fn maximized_on_second_display_restores_there() {
        let dir = tempfile::tempdir().expect("tempdir");
        let displays = vec![
            DisplayRegion::new(0, 0, 1920, 1080),
            DisplayRegion::new(1920, 0, 1920, 1080),
        ];
        let host = FakeHost::with_displays(displays);
        let mut lifecycle = WindowLifecycle::new(seeded_store(
            dir.path(),
            PersistedState {
                window_rectangle: WindowRectangle::at(100, 100, 800, 600),
                ..PersistedState::default()
            },
        ));

        lifecycle.create(&host).expect("create");
        if let Some(window) = lifecycle.window.as_mut() {
            window.maximized = true;
            window.bounds = Ok(WindowRectangle::at(1920, 0, 1920, 1080));
            window.zoom = 1.5;
        }
        lifecycle.release();

        let state = lifecycle.store().state();
        assert!(state.window_maximized);
        assert_eq!(state.window_rectangle, WindowRectangle::at(1920, 0, 1920, 1080));
        assert_eq!(state.zoom_factor, 1.5);

        lifecycle.create(&host).expect("recreate");
        let relaunch = host.launched.borrow()[1];
        assert_eq!(relaunch.rectangle, WindowRectangle::at(1920, 0, 1920, 1080));
        assert!(relaunch.maximized);
    }

    #[test]
    fn unreadable_bounds_keep_previous_rectangle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stored = WindowRectangle::at(10, 10, 900, 700);
        let host = FakeHost::with_displays(one_display());
        let mut lifecycle = WindowLifecycle::new(seeded_store(
            dir.path(),
            PersistedState {
                window_rectangle: stored,
                ..PersistedState::default()
            },
        ));

        lifecycle.create(&host).expect("create");
        if let Some(window) = lifecycle.window.as_mut() {
            window.bounds = Err("window already gone".to_string());
        }
        lifecycle.begin_close();
        assert_eq!(lifecycle.store().window_rectangle(), stored);
    }

    #[test]
    fn save_failure_does_not_block_release() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").expect("write");
        let store = WindowStateStore::open_or_default(blocker.join("kanbanflow-app.json"));

        let host = FakeHost::with_displays(one_display());
        let mut lifecycle = WindowLifecycle::new(store);
        lifecycle.create(&host).expect("create");
        lifecycle.begin_close();
        lifecycle.release();

        assert_eq!(lifecycle.state(), LifecycleState::Destroyed);
        assert!(lifecycle.needs_window());
    }

    #[test]
    fn failed_creation_leaves_controller_unborn() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut host = FakeHost::with_displays(one_display());
        host.fail = true;
        let mut lifecycle =
            WindowLifecycle::new(seeded_store(dir.path(), PersistedState::default()));

        assert!(matches!(lifecycle.create(&host), Err(ShellError::Window(_))));
        assert_eq!(lifecycle.state(), LifecycleState::Unborn);
        assert!(lifecycle.window().is_none());
    }

    #[test]
    fn destroyed_window_can_be_recreated_with_saved_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = FakeHost::with_displays(one_display());
        host.next_window.set(Some(WindowRectangle::at(200, 150, 1024, 768)));
        let mut lifecycle =
            WindowLifecycle::new(seeded_store(dir.path(), PersistedState::default()));

        lifecycle.create(&host).expect("create");
        lifecycle.create(&host).expect("second create is a no-op");
        assert_eq!(host.launched.borrow().len(), 1);

        lifecycle.release();
        assert!(lifecycle.needs_window());

        lifecycle.create(&host).expect("recreate");
        assert_eq!(lifecycle.state(), LifecycleState::Created);
        assert_eq!(
            host.launched.borrow()[1].rectangle,
            WindowRectangle::at(200, 150, 1024, 768)
        );
    }
}
