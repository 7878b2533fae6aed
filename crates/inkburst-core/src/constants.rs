// Shared generation and timing constants used by the core and the web frontend.

// Golden ratio and friends
pub const PHI: f64 = 1.6180339887;
pub const PHI_INV: f64 = 0.6180339887;

/// Golden angle 2π/φ² (~2.399 rad), the angular step for radiating primitives.
#[inline]
pub fn golden_angle() -> f64 {
    (2.0 * std::f64::consts::PI) / (PHI * PHI)
}

// Canvas framing
pub const OVERFLOW: f64 = 0.8; // extra canvas height above and below the viewport, in viewport heights
pub const FOCAL_X: f64 = 0.7;
pub const FOCAL_Y: f64 = 0.3;
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Device tier breakpoints (CSS px)
pub const TABLET_MIN_WIDTH: f64 = 640.0;
pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;
pub const WIDE_MIN_WIDTH: f64 = 1440.0;

// Scroll deformation
pub const DEFORM_AMP_X: f64 = 12.0;
pub const DEFORM_AMP_Y: f64 = 8.0;
pub const DEFORM_SCROLL_RATE: f64 = 0.0008;

// Scheduling
pub const RESIZE_DEBOUNCE_MS: f64 = 200.0;
pub const SCROLL_REDRAW_THRESHOLD_PX: f64 = 4.0;
pub const POINTER_THROTTLE_MS: f64 = 33.0;
pub const POINTER_NOISE_THRESHOLD: f64 = 0.002;

// Choreography
pub const SECTION_HYSTERESIS: f64 = 0.02;
pub const FOCAL_PULL: f64 = 0.3; // fraction of the way toward the next keyframe
pub const COUNT_PULL: f64 = 0.2;
pub const DRIFT_X: f64 = 0.03;
pub const DRIFT_Y: f64 = 0.02;

// Per-layer seed offsets, added to the page seed
pub const GLITCH_SEED_OFFSET: i32 = 42;
pub const RECT_SEED_OFFSET: i32 = 333;
pub const SKY_LAYOUT_SEED_OFFSET: i32 = 555;
pub const SKY_ANIM_SEED_OFFSET: i32 = 777;
pub const ATMOSPHERE_SEED_OFFSET: i32 = 777;
pub const DUST_SEED_OFFSET: i32 = 888;
pub const BURST_PARTICLE_SEED_OFFSET: i32 = 999;

// Approximate max scroll depth in viewport heights (page is ~6.8vh tall)
pub const MAX_SCROLL_VH: f64 = 5.8;

// Palette (rgb)
pub const CYAN_RGB: [u8; 3] = [0, 153, 255];
pub const INK_RGB: [u8; 3] = [0, 0, 0];
pub const GRAY_RGB: [u8; 3] = [160, 160, 160];
pub const ARC_RGB: [u8; 3] = [170, 170, 170];
