// Front-end constants: DOM contract, canvas styling and input tuning.
// Generation and timing constants shared with the core live in
// `inkburst_core::constants`.

// DOM ids
pub const INK_LAYER_ID: &str = "ink-layer";
pub const MAIN_CANVAS_ID: &str = "ink-main";
pub const GLOW_CANVAS_ID: &str = "ink-glow";
pub const OVERLAY_CANVAS_ID: &str = "ink-overlay";
pub const SKY_LAYER_ID: &str = "sky-layer";
pub const GRAIN_ID: &str = "ink-grain"; // optional

// Ink canvas container scrolls at this fraction of the page
pub const PARALLAX: f64 = 0.12;

// Glow canvas styling
pub const GLOW_BLUR_PX: f64 = 20.0;
pub const GLOW_OPACITY: f64 = 0.70;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Keyboard seed control
pub const KEY_SEED_PREVIOUS: &str = "[";
pub const KEY_SEED_NEXT: &str = "]";
pub const KEY_SEED_TODAY: &str = "\\";

// Query parameter names
pub const QUERY_SEED: &str = "seed";
pub const QUERY_TIER: &str = "tier";
pub const QUERY_DEBUG: &str = "debug";

// Upper bound on one RAF step fed to animations (s); avoids jumps after a
// background tab resumes.
pub const MAX_FRAME_STEP_SEC: f64 = 0.25;
