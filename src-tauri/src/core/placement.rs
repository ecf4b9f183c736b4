use super::app_log;
use super::error::ShellError;
use crate::models::{DisplayRegion, PersistedState, WindowRectangle};
use tauri::{AppHandle, Monitor};

/// Whether `inner` lies fully within `outer`. A rectangle without a position is never contained.
pub fn is_contained(outer: &DisplayRegion, inner: &WindowRectangle) -> bool {
    let Some((x, y)) = inner.position() else {
        return false;
    };

    let (outer_left, outer_top) = (outer.x as i64, outer.y as i64);
    let outer_right = outer_left + outer.width as i64;
    let outer_bottom = outer_top + outer.height as i64;

    let (left, top) = (x as i64, y as i64);
    let right = left + inner.width as i64;
    let bottom = top + inner.height as i64;

    outer_left <= left && outer_top <= top && outer_right >= right && outer_bottom >= bottom
}

/// Rectangle to open the window with: the stored one if some display still holds it, otherwise
/// the stored size with the position left to the platform.
pub fn resolve(persisted: &PersistedState, displays: &[DisplayRegion]) -> WindowRectangle {
    let stored = persisted.window_rectangle;

    if displays.is_empty() {
        let _ = app_log::warn(
            "placement",
            "no_displays",
            serde_json::json!({ "error": ShellError::NoDisplaysReported.to_string() }),
        );
        return stored.without_position();
    }

    if displays.iter().any(|d| is_contained(d, &stored)) {
        stored
    } else {
        stored.without_position()
    }
}

fn region_of(monitor: &Monitor) -> DisplayRegion {
    let pos = monitor.position();
    let size = monitor.size();
    DisplayRegion::new(pos.x, pos.y, size.width, size.height)
}

/// Bounds of every attached monitor right now. Errors read as "no displays".
pub fn current_displays(app_handle: &AppHandle) -> Vec<DisplayRegion> {
    match app_handle.available_monitors() {
        Ok(monitors) => monitors.iter().map(region_of).collect(),
        Err(e) => {
            let _ = app_log::warn(
                "placement",
                "monitor_query_failed",
                serde_json::json!({ "error": e.to_string() }),
            );
            Vec::new()
        }
    }
}
