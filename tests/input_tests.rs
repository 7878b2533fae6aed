// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use glam::DVec2;
use input::*;

#[test]
fn pointer_is_normalized_and_clamped() {
    let p = normalize_pointer(480.0, 270.0, 1920.0, 1080.0);
    assert!((p - DVec2::new(0.25, 0.25)).length() < 1e-12);

    let outside = normalize_pointer(-50.0, 5000.0, 1920.0, 1080.0);
    assert_eq!(outside, DVec2::new(0.0, 1.0));
}

#[test]
fn pointer_on_empty_viewport_is_centered() {
    assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 1080.0), DVec2::splat(0.5));
    assert_eq!(normalize_pointer(10.0, 10.0, 1920.0, -1.0), DVec2::splat(0.5));
}

#[test]
fn scroll_progress_spans_the_scrollable_range() {
    assert_eq!(scroll_progress(0.0, 5000.0, 1000.0), 0.0);
    assert!((scroll_progress(2000.0, 5000.0, 1000.0) - 0.5).abs() < 1e-12);
    assert_eq!(scroll_progress(4000.0, 5000.0, 1000.0), 1.0);
    // overscroll on touch devices
    assert_eq!(scroll_progress(-80.0, 5000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(4200.0, 5000.0, 1000.0), 1.0);
}

#[test]
fn page_that_does_not_scroll_reports_zero() {
    assert_eq!(scroll_progress(0.0, 900.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(10.0, 1000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(f64::NAN, 5000.0, 1000.0), 0.0);
}

#[test]
fn seed_keys_map_to_actions() {
    assert_eq!(seed_key("[", false), Some(SeedKey::Previous));
    assert_eq!(seed_key("]", false), Some(SeedKey::Next));
    assert_eq!(seed_key("\\", false), Some(SeedKey::Today));
    assert_eq!(seed_key("a", false), None);
}

#[test]
fn modified_key_presses_are_ignored() {
    assert_eq!(seed_key("[", true), None);
    assert_eq!(seed_key("]", true), None);
}

#[test]
fn frame_step_is_clamped() {
    assert!((frame_step_sec(1000.0, 1016.0, 0.25) - 0.016).abs() < 1e-12);
    assert_eq!(frame_step_sec(1000.0, 9000.0, 0.25), 0.25);
    assert_eq!(frame_step_sec(1000.0, 900.0, 0.25), 0.0);
}
