use super::config::{DEFAULT_ZOOM_FACTOR, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR};

const LEVEL_BASE: f64 = 1.2;
const LEVEL_STEP: f64 = 0.5;

fn level_of(factor: f64) -> f64 {
    factor.ln() / LEVEL_BASE.ln()
}

fn factor_of(level: f64) -> f64 {
    LEVEL_BASE.powf(level)
}

fn step(factor: f64, delta: f64) -> f64 {
    let factor = if factor.is_finite() && factor > 0.0 {
        factor
    } else {
        DEFAULT_ZOOM_FACTOR
    };
    // Snap to the level grid so repeated steps don't drift.
    let level = (level_of(factor) / LEVEL_STEP).round() * LEVEL_STEP + delta;
    factor_of(level).clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR)
}

pub fn zoom_in(factor: f64) -> f64 {
    step(factor, LEVEL_STEP)
}

pub fn zoom_out(factor: f64) -> f64 {
    step(factor, -LEVEL_STEP)
}

pub fn reset() -> f64 {
    DEFAULT_ZOOM_FACTOR
}
