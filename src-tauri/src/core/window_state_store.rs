use super::app_log;
use super::error::ShellError;
use crate::models::{PersistedState, StoreRecord, WindowRectangle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable record of zoom, window rectangle and maximized flag.
///
/// Reads happen once at startup; every setter only touches memory until `save`.
#[derive(Debug)]
pub struct WindowStateStore {
    path: PathBuf,
    state: PersistedState,
}

impl WindowStateStore {
    /// Store file for `app_name` inside `dir`.
    pub fn file_path(dir: &Path, app_name: &str) -> PathBuf {
        dir.join(format!("{}.json", app_name))
    }

    /// Opens the store; a missing file yields defaults, an unreadable or corrupt one an error.
    pub fn open(path: PathBuf) -> Result<Self, ShellError> {
        let state = load(&path)?;
        Ok(Self { path, state })
    }

    /// Like `open`, but starts from defaults when the file cannot be used.
    pub fn open_or_default(path: PathBuf) -> Self {
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                let _ = app_log::warn(
                    "store",
                    "load_failed",
                    serde_json::json!({ "error": e.to_string() }),
                );
                Self {
                    path,
                    state: PersistedState::default(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> PersistedState {
        self.state
    }

    pub fn zoom_factor(&self) -> f64 {
        self.state.zoom_factor
    }

    pub fn window_rectangle(&self) -> WindowRectangle {
        self.state.window_rectangle
    }

    pub fn window_maximized(&self) -> bool {
        self.state.window_maximized
    }

    pub fn set_zoom_factor(&mut self, zoom_factor: f64) {
        self.replace(PersistedState {
            zoom_factor,
            ..self.state
        });
    }

    pub fn set_window_rectangle(&mut self, window_rectangle: WindowRectangle) {
        self.replace(PersistedState {
            window_rectangle,
            ..self.state
        });
    }

    pub fn set_window_maximized(&mut self, window_maximized: bool) {
        self.state.window_maximized = window_maximized;
    }

    pub fn replace(&mut self, state: PersistedState) {
        self.state = state.normalized();
    }

    pub fn save(&self) -> Result<(), ShellError> {
        write_state_atomically(&self.path, &StoreRecord::from(self.state))
            .map_err(|e| ShellError::store(&self.path, e))
    }
}

fn load(path: &Path) -> Result<PersistedState, ShellError> {
    if !path.exists() {
        return Ok(PersistedState::default());
    }

    let bytes = fs::read(path).map_err(|e| ShellError::store(path, e))?;
    let record: StoreRecord =
        serde_json::from_slice(&bytes).map_err(|e| ShellError::store(path, e))?;
    Ok(record.into())
}

fn write_state_atomically(path: &Path, record: &StoreRecord) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp)?;
    serde_json::to_writer_pretty(&mut file, record).map_err(std::io::Error::other)?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    let _ = fs::remove_file(path);
    fs::rename(tmp, path)?;
    Ok(())
}
