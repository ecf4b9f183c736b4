use super::WindowRectangle;
use crate::core::config::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DEFAULT_ZOOM_FACTOR, MAX_ZOOM_FACTOR,
    MIN_ZOOM_FACTOR,
};
use serde::{Deserialize, Serialize};

/// Everything the shell remembers between runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedState {
    pub zoom_factor: f64,
    pub window_rectangle: WindowRectangle,
    pub window_maximized: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            window_rectangle: WindowRectangle::unpositioned(
                DEFAULT_WINDOW_WIDTH,
                DEFAULT_WINDOW_HEIGHT,
            ),
            window_maximized: false,
        }
    }
}

/// On-disk layout of the store file: a flat map with camelCase keys.
///
/// `windowPosX`/`windowPosY` were written by older builds and are still accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreRecord {
    pub zoom_factor: f64,
    #[serde(alias = "windowPosX", skip_serializing_if = "Option::is_none")]
    pub window_x: Option<i32>,
    #[serde(alias = "windowPosY", skip_serializing_if = "Option::is_none")]
    pub window_y: Option<i32>,
    pub window_width: u32,
    pub window_height: u32,
    pub window_maximized: bool,
}

impl Default for StoreRecord {
    fn default() -> Self {
        PersistedState::default().into()
    }
}

fn normalize_zoom_factor(zoom: f64) -> f64 {
    if !zoom.is_finite() || zoom <= 0.0 {
        return DEFAULT_ZOOM_FACTOR;
    }
    zoom.clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR)
}

fn normalize_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT);
    }
    (width, height)
}

impl From<StoreRecord> for PersistedState {
    fn from(record: StoreRecord) -> Self {
        let (width, height) = normalize_size(record.window_width, record.window_height);
        // A half-known position is as good as none.
        let (x, y) = match (record.window_x, record.window_y) {
            (Some(x), Some(y)) => (Some(x), Some(y)),
            _ => (None, None),
        };
        Self {
            zoom_factor: normalize_zoom_factor(record.zoom_factor),
            window_rectangle: WindowRectangle {
                x,
                y,
                width,
                height,
            },
            window_maximized: record.window_maximized,
        }
    }
}

impl From<PersistedState> for StoreRecord {
    fn from(state: PersistedState) -> Self {
        Self {
            zoom_factor: state.zoom_factor,
            window_x: state.window_rectangle.x,
            window_y: state.window_rectangle.y,
            window_width: state.window_rectangle.width,
            window_height: state.window_rectangle.height,
            window_maximized: state.window_maximized,
        }
    }
}

impl PersistedState {
    /// Normalizes values that may have come from outside (a live window or the store file).
    pub fn normalized(self) -> Self {
        StoreRecord::from(self).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let record: StoreRecord = serde_json::from_str("{}").expect("deserialize");
        let state = PersistedState::from(record);
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.window_rectangle.width, 1440);
        assert_eq!(state.window_rectangle.height, 900);
        assert_eq!(state.window_rectangle.x, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"{"zoomFactor":1.5,"windowWidth":800,"windowHeight":600,"sidebar":"left"}"#;
        let record: StoreRecord = serde_json::from_str(json).expect("deserialize");
        let state = PersistedState::from(record);
        assert_eq!(state.zoom_factor, 1.5);
        assert_eq!(state.window_rectangle, WindowRectangle::unpositioned(800, 600));
    }

    #[test]
    fn legacy_position_keys_are_read() {
        let json = r#"{"windowPosX":10,"windowPosY":20,"windowWidth":800,"windowHeight":600}"#;
        let record: StoreRecord = serde_json::from_str(json).expect("deserialize");
        let state = PersistedState::from(record);
        assert_eq!(state.window_rectangle, WindowRectangle::at(10, 20, 800, 600));
    }

    #[test]
    fn null_position_reads_as_absent() {
        let json = r#"{"windowX":null,"windowY":null,"windowWidth":800,"windowHeight":600}"#;
        let record: StoreRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            PersistedState::from(record).window_rectangle,
            WindowRectangle::unpositioned(800, 600)
        );
    }

    #[test]
    fn absent_position_is_not_written() {
        let json = serde_json::to_string(&StoreRecord::default()).expect("serialize");
        assert!(!json.contains("windowX"));
        assert!(json.contains("\"windowWidth\":1440"));
        assert!(json.contains("\"zoomFactor\":1.0"));
    }

    #[test]
    fn invalid_values_are_normalized() {
        let record = StoreRecord {
            zoom_factor: -2.0,
            window_x: Some(5),
            window_y: None,
            window_width: 0,
            window_height: 700,
            window_maximized: true,
        };
        let state = PersistedState::from(record);
        assert_eq!(state.zoom_factor, 1.0);
        assert_eq!(state.window_rectangle, WindowRectangle::unpositioned(1440, 900));
        assert!(state.window_maximized);

        let huge = StoreRecord {
            zoom_factor: 40.0,
            ..StoreRecord::default()
        };
        assert_eq!(PersistedState::from(huge).zoom_factor, 5.0);
    }
}
