pub mod app_log;
pub mod app_updater;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod main_window;
pub mod navigation;
pub mod placement;
pub mod shell;
pub mod window_state_store;
pub mod zoom;

pub use lifecycle::WindowLifecycle;
pub use shell::ShellState;
pub use window_state_store::WindowStateStore;
