// Host-side tests for front-end constants and how they relate to the core's.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use inkburst_core::constants as core;

#[test]
fn dom_ids_are_distinct_and_non_empty() {
    let ids = [
        INK_LAYER_ID,
        MAIN_CANVAS_ID,
        GLOW_CANVAS_ID,
        OVERLAY_CANVAS_ID,
        SKY_LAYER_ID,
        GRAIN_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.contains(' '), "{a} is not a valid id");
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn parallax_never_outruns_the_overflow_band() {
    // a full scroll of the page must fit inside the band above the viewport
    assert!(PARALLAX > 0.0 && PARALLAX < 1.0);
    assert!(PARALLAX * core::MAX_SCROLL_VH <= core::OVERFLOW);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn glow_styling_is_sane() {
    assert!(GLOW_BLUR_PX > 0.0);
    assert!(GLOW_OPACITY > 0.0 && GLOW_OPACITY <= 1.0);
    assert!(MAX_FRAME_STEP_SEC > 0.0 && MAX_FRAME_STEP_SEC < 1.0);
}

#[test]
fn seed_keys_are_single_characters() {
    for key in [KEY_SEED_PREVIOUS, KEY_SEED_NEXT, KEY_SEED_TODAY] {
        assert_eq!(key.chars().count(), 1);
    }
    assert!(REDUCED_MOTION_QUERY.contains("prefers-reduced-motion"));
}
