use crate::constants::{KEY_SEED_NEXT, KEY_SEED_PREVIOUS, KEY_SEED_TODAY};
use glam::DVec2;

/// Pointer position in client px to normalized [0, 1] viewport coordinates.
#[inline]
pub fn normalize_pointer(client_x: f64, client_y: f64, width: f64, height: f64) -> DVec2 {
    if width <= 0.0 || height <= 0.0 {
        return DVec2::splat(0.5);
    }
    DVec2::new(
        (client_x / width).clamp(0.0, 1.0),
        (client_y / height).clamp(0.0, 1.0),
    )
}

/// Scroll progress in [0, 1] for a page `document_height` tall viewed
/// through a viewport `viewport_height` tall. A page that does not scroll
/// reports 0.
#[inline]
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let max = document_height - viewport_height;
    if max.is_nan() || max <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / max).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedKey {
    Previous,
    Next,
    Today,
}

/// Seed control bound to `key`, ignoring presses with modifiers held.
#[inline]
pub fn seed_key(key: &str, modified: bool) -> Option<SeedKey> {
    if modified {
        return None;
    }
    match key {
        k if k == KEY_SEED_PREVIOUS => Some(SeedKey::Previous),
        k if k == KEY_SEED_NEXT => Some(SeedKey::Next),
        k if k == KEY_SEED_TODAY => Some(SeedKey::Today),
        _ => None,
    }
}

/// Elapsed seconds between two RAF timestamps, clamped to `[0, max_step]`.
#[inline]
pub fn frame_step_sec(prev_ms: f64, now_ms: f64, max_step: f64) -> f64 {
    ((now_ms - prev_ms) / 1000.0).clamp(0.0, max_step)
}
