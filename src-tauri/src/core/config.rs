//! Fixed application settings. None of these are user-configurable.

pub const HOME_URL: &str = "https://kanbanflow.com/";
pub const ABOUT_URL: &str = "https://github.com/metawave/kanbanflow-app";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "KanbanFlow";

pub const DEFAULT_WINDOW_WIDTH: u32 = 1440;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 900;

pub const DEFAULT_ZOOM_FACTOR: f64 = 1.0;
pub const MIN_ZOOM_FACTOR: f64 = 0.25;
pub const MAX_ZOOM_FACTOR: f64 = 5.0;
