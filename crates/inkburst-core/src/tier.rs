//! Device-tier classification and the per-tier quality table.
//!
//! The tier is a pure function of viewport width and is recomputed on every
//! resize. There is no hysteresis: dragging a window back and forth across a
//! breakpoint reclassifies each time.

use crate::constants::{DESKTOP_MIN_WIDTH, MAX_DEVICE_PIXEL_RATIO, TABLET_MIN_WIDTH, WIDE_MIN_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DeviceTier {
    Mobile,
    Tablet,
    #[default]
    Desktop,
    Wide,
}

impl DeviceTier {
    pub const ALL: [DeviceTier; 4] = [
        DeviceTier::Mobile,
        DeviceTier::Tablet,
        DeviceTier::Desktop,
        DeviceTier::Wide,
    ];

    pub fn from_width(width: f64) -> Self {
        if width < TABLET_MIN_WIDTH {
            DeviceTier::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            DeviceTier::Tablet
        } else if width < WIDE_MIN_WIDTH {
            DeviceTier::Desktop
        } else {
            DeviceTier::Wide
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceTier::Mobile => "mobile",
            DeviceTier::Tablet => "tablet",
            DeviceTier::Desktop => "desktop",
            DeviceTier::Wide => "wide",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mobile" => Some(DeviceTier::Mobile),
            "tablet" => Some(DeviceTier::Tablet),
            "desktop" => Some(DeviceTier::Desktop),
            "wide" => Some(DeviceTier::Wide),
            _ => None,
        }
    }

    /// Population multiplier for the scene builder.
    pub fn density_scale(self) -> f64 {
        match self {
            DeviceTier::Mobile => 0.35,
            DeviceTier::Tablet => 0.55,
            DeviceTier::Desktop | DeviceTier::Wide => 1.0,
        }
    }

    /// Backing-store pixel ratio: phones draw at 1x, everything else caps at 2x.
    pub fn pixel_ratio(self, device_pixel_ratio: f64) -> f64 {
        match self {
            DeviceTier::Mobile => 1.0,
            _ => device_pixel_ratio.clamp(1.0, MAX_DEVICE_PIXEL_RATIO),
        }
    }

    /// Size and drift multiplier for overlay fragments.
    pub fn overlay_scale(self) -> f64 {
        match self {
            DeviceTier::Mobile => 0.5,
            DeviceTier::Tablet => 0.75,
            DeviceTier::Desktop | DeviceTier::Wide => 1.0,
        }
    }

    pub fn performance(self) -> PerformanceParams {
        PerformanceParams::for_tier(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderComplexity {
    Simplified,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostEffect {
    Bloom,
    Grain,
    ChromaticAberration,
}

/// Inclusive count range `[min, max]`.
pub type CountRange = (u32, u32);

/// Fixed quality table for one tier.
#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceParams {
    pub line_count: CountRange,
    pub sky_fragment_count: CountRange,
    pub particle_count: CountRange,
    pub shader_complexity: ShaderComplexity,
    pub post_effects: &'static [PostEffect],
    pub texture_resolution: u32,
    pub target_fps: u32,
    pub atmosphere_blocks: CountRange,
    pub overlay: OverlayCounts,
}

/// Element counts of the seeded overlay layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayCounts {
    pub glitch: usize,
    pub dust: usize,
    pub rects: usize,
    pub sky: usize,
    pub atmosphere: usize,
}

impl OverlayCounts {
    pub fn for_tier(tier: DeviceTier) -> Self {
        PerformanceParams::for_tier(tier).overlay
    }
}

const GRAIN_ONLY: &[PostEffect] = &[PostEffect::Grain];
const BLOOM_GRAIN: &[PostEffect] = &[PostEffect::Bloom, PostEffect::Grain];
const FULL_POST: &[PostEffect] = &[
    PostEffect::Bloom,
    PostEffect::Grain,
    PostEffect::ChromaticAberration,
];

impl PerformanceParams {
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Mobile => Self {
                line_count: (30, 60),
                sky_fragment_count: (2, 3),
                particle_count: (50, 100),
                shader_complexity: ShaderComplexity::Simplified,
                post_effects: GRAIN_ONLY,
                texture_resolution: 512,
                target_fps: 30,
                atmosphere_blocks: (2, 3),
                overlay: OverlayCounts {
                    glitch: 80,
                    dust: 60,
                    rects: 10,
                    sky: 10,
                    atmosphere: 10,
                },
            },
            DeviceTier::Tablet => Self {
                line_count: (80, 120),
                sky_fragment_count: (3, 5),
                particle_count: (100, 200),
                shader_complexity: ShaderComplexity::Full,
                post_effects: BLOOM_GRAIN,
                texture_resolution: 1024,
                target_fps: 60,
                atmosphere_blocks: (4, 6),
                overlay: OverlayCounts {
                    glitch: 150,
                    dust: 110,
                    rects: 16,
                    sky: 18,
                    atmosphere: 18,
                },
            },
            DeviceTier::Desktop => Self {
                line_count: (150, 200),
                sky_fragment_count: (4, 8),
                particle_count: (300, 500),
                shader_complexity: ShaderComplexity::Full,
                post_effects: FULL_POST,
                texture_resolution: 2048,
                target_fps: 60,
                atmosphere_blocks: (6, 8),
                overlay: OverlayCounts {
                    glitch: 240,
                    dust: 180,
                    rects: 25,
                    sky: 28,
                    atmosphere: 30,
                },
            },
            DeviceTier::Wide => Self {
                line_count: (180, 250),
                sky_fragment_count: (5, 8),
                particle_count: (400, 600),
                shader_complexity: ShaderComplexity::Full,
                post_effects: FULL_POST,
                texture_resolution: 2048,
                target_fps: 60,
                atmosphere_blocks: (7, 9),
                overlay: OverlayCounts {
                    glitch: 240,
                    dust: 180,
                    rects: 25,
                    sky: 28,
                    atmosphere: 30,
                },
            },
        }
    }

    /// Post effects actually enabled; none at all under reduced motion.
    pub fn active_post_effects(&self, reduced_motion: bool) -> &'static [PostEffect] {
        if reduced_motion {
            &[]
        } else {
            self.post_effects
        }
    }

    /// Frame interval implied by `target_fps`.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps.max(1) as f64
    }
}

/// Chromatic aberration offset: strong only while crossing a section boundary.
#[inline]
pub fn chromatic_offset(transition_phase: f64) -> f64 {
    if transition_phase > 0.0 {
        0.002 * transition_phase
    } else {
        0.0005
    }
}
