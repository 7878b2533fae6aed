//! Seeded overlay layers that sit on top of the ink burst: sky photo
//! fragments, black rectangles, dust, glitch marks and atmosphere text.
//!
//! Layout is in viewport percent (`x`, `y`) plus CSS px for sizes. Every
//! element parallaxes by `-scroll_y * parallax`; the `y` it is given puts
//! it near the middle of the viewport when the page has scrolled to its
//! target depth.

use crate::constants::{
    ATMOSPHERE_SEED_OFFSET, CYAN_RGB, DUST_SEED_OFFSET, GLITCH_SEED_OFFSET, INK_RGB,
    MAX_SCROLL_VH, PHI_INV, RECT_SEED_OFFSET, SKY_ANIM_SEED_OFFSET, SKY_LAYOUT_SEED_OFFSET,
};
use crate::render::{CompositeOp, LineCap, LineJoin, Paint, Rgba, Surface};
use crate::rng::Mulberry32;
use crate::seed::layer_seed;
use crate::tier::{DeviceTier, OverlayCounts};
use glam::DVec2;
use smallvec::SmallVec;
use std::f64::consts::TAU;

pub const SKY_PHOTOS: [&str; 16] = [
    "assets/sky/sky-1.jpg",
    "assets/sky/sky-2.jpg",
    "assets/sky/sky-3.jpg",
    "assets/sky/sky-4.jpg",
    "assets/sky/sky-5.jpg",
    "assets/sky/sky-6.jpg",
    "assets/sky/sky-7.jpg",
    "assets/sky/sky-8.jpg",
    "assets/sky/sky-9.jpg",
    "assets/sky/sky-10.jpg",
    "assets/sky/sky-11.jpg",
    "assets/sky/sky-12.jpg",
    "assets/sky/sky-13.jpg",
    "assets/sky/sky-14.jpg",
    "assets/sky/sky-15.jpg",
    "assets/sky/sky-16.jpg",
];

/// CSS `clip-path` values for sky fragments.
pub const CLIP_SHAPES: [&str; 6] = [
    "inset(0)",
    "polygon(5% 0%, 100% 0%, 95% 100%, 0% 100%)",
    "inset(0 round 8px)",
    "polygon(3% 0%, 97% 2%, 100% 98%, 0% 100%)",
    "inset(0 round 12px)",
    "polygon(0% 5%, 100% 0%, 98% 95%, 2% 100%)",
];

const MAX_RECT_AREA: f64 = 14_000.0;
const RECT_WIDTHS: [(f64, f64); 6] = [
    (60.0, 160.0),
    (100.0, 220.0),
    (120.0, 240.0),
    (80.0, 180.0),
    (90.0, 200.0),
    (50.0, 140.0),
];
const RECT_HEIGHTS: [(f64, f64); 6] = [
    (25.0, 60.0),
    (35.0, 80.0),
    (40.0, 90.0),
    (30.0, 65.0),
    (35.0, 75.0),
    (25.0, 55.0),
];

const FADE_IN_S: f64 = 0.6;
const HATCH_PERIOD: f64 = 4.0;
/// Elements further than this outside the viewport are not painted.
const CULL_MARGIN: f64 = 480.0;

const TEXT_PX: f64 = 11.0;
const TEXT_LINE_HEIGHT: f64 = 22.0;
/// Advance of one monospace glyph at 11 px with 0.05em tracking.
const TEXT_ADVANCE: f64 = 7.15;

/// Page depth (in viewport heights) at which element `i` should be centred.
fn target_depth(i: usize, jitter: f64, rng: &mut Mulberry32) -> f64 {
    ((i as f64 * PHI_INV) % 1.0) * MAX_SCROLL_VH + rng.signed(jitter)
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Opacity multiplier for a fade that starts at `delay` seconds.
pub fn fade_in(time_s: f64, delay: f64) -> f64 {
    smoothstep((time_s - delay) / FADE_IN_S)
}

// --- sky fragments ---

#[derive(Clone, Debug, PartialEq)]
pub struct SkyBlock {
    pub src: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub clip_path: &'static str,
    pub parallax: f64,
    pub opacity: f64,
    pub z_index: u32,
}

pub fn sky_blocks(seed: i32, tier: DeviceTier) -> Vec<SkyBlock> {
    let mut rng = Mulberry32::new(layer_seed(seed, SKY_LAYOUT_SEED_OFFSET));
    let count = OverlayCounts::for_tier(tier).sky;
    let scale = tier.overlay_scale();

    (0..count)
        .map(|i| {
            let depth = target_depth(i, 0.6, &mut rng);
            let parallax = 0.06 + rng.next_f64() * 0.42;
            let y = depth * parallax * 100.0 + rng.range(10.0, 90.0);
            let x = rng.range(2.0, 90.0);

            let roll = rng.next_f64();
            let base = if roll < 0.3 {
                rng.range(60.0, 160.0)
            } else if roll < 0.7 {
                rng.range(120.0, 280.0)
            } else {
                rng.range(250.0, 450.0)
            };
            let width = base * scale;
            let height = width * rng.range(0.4, 1.3);
            let opacity = rng.range(0.45, 0.9);
            let src = SKY_PHOTOS[rng.index(SKY_PHOTOS.len())];
            let clip_path = CLIP_SHAPES[rng.index(CLIP_SHAPES.len())];

            SkyBlock {
                src,
                x,
                y,
                width,
                height,
                clip_path,
                parallax,
                opacity,
                z_index: 2 + (i % 3) as u32,
            }
        })
        .collect()
}

/// Per-fragment drift, opacity and scale breathing. Frequencies are in Hz.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentAnim {
    pub drift_amp: DVec2,
    pub drift_freq: DVec2,
    pub drift_phase: DVec2,
    pub base_opacity: f64,
    pub opacity_amp: f64,
    pub fade_freq: f64,
    pub fade_phase: f64,
    pub scale_amp: f64,
    pub scale_freq: f64,
    pub scale_phase: f64,
    pub parallax: f64,
}

/// Where a sky fragment is at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentTransform {
    pub offset: DVec2,
    pub scale: f64,
    pub opacity: f64,
}

impl FragmentTransform {
    /// Scroll parallax only; the reduced-motion pose.
    pub fn parallax(block: &SkyBlock, scroll_y: f64) -> Self {
        Self {
            offset: DVec2::new(0.0, -scroll_y * block.parallax),
            scale: 1.0,
            opacity: block.opacity,
        }
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) scale({:.4})",
            self.offset.x, self.offset.y, self.scale
        )
    }
}

impl FragmentAnim {
    /// Pose `time_s` seconds after the loop started, at page offset
    /// `scroll_y`. Opacity stays within [0.05, 1].
    pub fn transform(&self, time_s: f64, scroll_y: f64) -> FragmentTransform {
        let wave = |freq: f64, phase: f64| (time_s * freq * TAU + phase).sin();
        let dx = wave(self.drift_freq.x, self.drift_phase.x) * self.drift_amp.x;
        let dy = wave(self.drift_freq.y, self.drift_phase.y) * self.drift_amp.y;
        let scale = 1.0 + wave(self.scale_freq, self.scale_phase) * self.scale_amp;
        let opacity = (self.base_opacity + wave(self.fade_freq, self.fade_phase) * self.opacity_amp)
            .clamp(0.05, 1.0);
        FragmentTransform {
            offset: DVec2::new(dx, dy - scroll_y * self.parallax),
            scale,
            opacity,
        }
    }
}

/// Animation state for `blocks`, one entry each, in block order.
pub fn fragment_anims(seed: i32, tier: DeviceTier, blocks: &[SkyBlock]) -> Vec<FragmentAnim> {
    let mut rng = Mulberry32::new(layer_seed(seed, SKY_ANIM_SEED_OFFSET));
    let ds = tier.overlay_scale();
    blocks
        .iter()
        .map(|b| {
            let drift_amp = DVec2::new(rng.range(25.0, 90.0) * ds, rng.range(12.0, 42.0) * ds);
            let drift_freq = DVec2::new(rng.range(0.015, 0.055), rng.range(0.012, 0.047));
            let drift_phase = DVec2::new(rng.next_f64() * TAU, rng.next_f64() * TAU);
            FragmentAnim {
                drift_amp,
                drift_freq,
                drift_phase,
                base_opacity: b.opacity,
                opacity_amp: rng.range(0.08, 0.26),
                fade_freq: rng.range(0.01, 0.035),
                fade_phase: rng.next_f64() * TAU,
                scale_amp: rng.range(0.015, 0.055),
                scale_freq: rng.range(0.008, 0.026),
                scale_phase: rng.next_f64() * TAU,
                parallax: b.parallax,
            }
        })
        .collect()
}

// --- black rectangles ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Cross-hatched instead of solid.
    pub hatched: bool,
    pub opacity: f64,
    pub delay: f64,
    pub parallax: f64,
}

impl BlackRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

pub fn black_rects(seed: i32, tier: DeviceTier) -> Vec<BlackRect> {
    let mut rng = Mulberry32::new(layer_seed(seed, RECT_SEED_OFFSET));
    let count = OverlayCounts::for_tier(tier).rects;

    (0..count)
        .map(|i| {
            let depth = target_depth(i, 0.5, &mut rng);
            let parallax = 0.06 + rng.next_f64() * 0.38;
            let y = depth * parallax * 100.0 + rng.range(5.0, 90.0);
            let x = rng.range(2.0, 92.0);

            let (w_lo, w_hi) = RECT_WIDTHS[i % RECT_WIDTHS.len()];
            let (h_lo, h_hi) = RECT_HEIGHTS[i % RECT_HEIGHTS.len()];
            let mut width = rng.range(w_lo, w_hi);
            let mut height = rng.range(h_lo, h_hi);
            let area = width * height;
            if area > MAX_RECT_AREA {
                let k = (MAX_RECT_AREA / area).sqrt();
                width *= k;
                height *= k;
            }

            BlackRect {
                x,
                y,
                width,
                height,
                hatched: rng.chance(0.3),
                opacity: rng.range(0.85, 1.0),
                delay: (i as f64 * 0.05).min(1.5),
                parallax,
            }
        })
        .collect()
}

/// Segments of the 45° and -45° hatch lines clipped to the box at `origin`.
pub fn hatch_segments(origin: DVec2, size: DVec2) -> Vec<(DVec2, DVec2)> {
    let step = HATCH_PERIOD * std::f64::consts::SQRT_2;
    let mut out = Vec::new();
    // Lines x - y = c (down-right) and x + y = c (down-left), in box-local space.
    for dir in [1.0_f64, -1.0] {
        let (c_min, c_max) = if dir > 0.0 {
            (-size.y, size.x)
        } else {
            (0.0, size.x + size.y)
        };
        let mut c = c_min + step * 0.5;
        while c < c_max {
            let mut ends: SmallVec<[DVec2; 4]> = SmallVec::new();
            // Intersect with the four edges.
            for x in [0.0, size.x] {
                let y = if dir > 0.0 { x - c } else { c - x };
                if (0.0..=size.y).contains(&y) {
                    ends.push(DVec2::new(x, y));
                }
            }
            for y in [0.0, size.y] {
                let x = if dir > 0.0 { c + y } else { c - y };
                if (0.0..=size.x).contains(&x) {
                    ends.push(DVec2::new(x, y));
                }
            }
            if ends.len() >= 2 {
                let a = ends[0];
                let b = ends
                    .iter()
                    .copied()
                    .max_by(|p, q| a.distance_squared(*p).total_cmp(&a.distance_squared(*q)))
                    .unwrap_or(a);
                if a.distance_squared(b) > 1e-6 {
                    out.push((origin + a, origin + b));
                }
            }
            c += step;
        }
    }
    out
}

// --- dust ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DustParticle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub delay: f64,
    pub drift: DVec2,
    pub duration: f64,
    pub parallax: f64,
}

impl DustParticle {
    /// Drift offset and alpha `time_s` seconds in. One cycle goes out to
    /// `drift` and back, brightening on the way out and dimming on return.
    pub fn sample(&self, time_s: f64) -> (DVec2, f64) {
        let local = time_s - self.delay;
        if local < 0.0 || self.duration <= 0.0 {
            return (DVec2::ZERO, self.opacity);
        }
        let u = (local / self.duration).fract();
        let (k, gain) = if u < 0.5 {
            let k = smoothstep(u * 2.0);
            (k, 0.5 + 0.5 * k)
        } else {
            let k = smoothstep(u * 2.0 - 1.0);
            (1.0 - k, 1.0 - 0.7 * k)
        };
        (self.drift * k, self.opacity * self.opacity * gain)
    }
}

pub fn dust_particles(seed: i32, tier: DeviceTier) -> Vec<DustParticle> {
    let mut rng = Mulberry32::new(layer_seed(seed, DUST_SEED_OFFSET));
    let count = OverlayCounts::for_tier(tier).dust;

    (0..count)
        .map(|i| {
            let depth = target_depth(i, 0.4, &mut rng);
            let parallax = 0.06 + rng.next_f64() * 0.38;
            let y = depth * parallax * 100.0 + rng.range(3.0, 93.0);
            DustParticle {
                x: rng.next_f64() * 100.0,
                y,
                size: rng.range(1.0, 3.5),
                opacity: rng.range(0.15, 0.6),
                delay: rng.next_f64() * 5.0,
                drift: DVec2::new(rng.signed(30.0), rng.signed(20.0)),
                duration: rng.range(8.0, 20.0),
                parallax,
            }
        })
        .collect()
}

// --- glitch marks ---

/// Small technical glyphs scattered across the page. Sizes in px.
#[derive(Clone, Debug, PartialEq)]
pub enum GlitchShape {
    /// Live wall-clock readout `HH:MM:SS:FF`.
    Timecode { scale: f64 },
    Cross { size: f64, weight: f64 },
    DotGrid { cols: u32, rows: u32, spacing: f64 },
    Rule { width: f64, label: Option<u32> },
    Corners { width: f64, height: f64 },
    DottedBox { width: f64, height: f64 },
    Bar { length: f64, vertical: bool },
    DoubleBar { height: f64 },
    Coordinate { label: String },
    CyanRule { length: f64, vertical: bool },
    Ring { diameter: f64 },
    Triangle { size: f64, rotation_deg: f64 },
    Micro { width: f64, height: f64, opacity: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlitchMark {
    pub x: f64,
    pub y: f64,
    pub parallax: f64,
    pub shape: GlitchShape,
}

fn glitch_shape(roll: f64, rng: &mut Mulberry32) -> GlitchShape {
    if roll < 0.06 {
        GlitchShape::Timecode {
            scale: rng.range(0.9, 1.3),
        }
    } else if roll < 0.15 {
        let size = rng.range(10.0, 35.0);
        let weight = 1.0 + (rng.next_f64() * 2.0).floor();
        GlitchShape::Cross { size, weight }
    } else if roll < 0.22 {
        let cols = 3 + (rng.next_f64() * 8.0) as u32;
        let rows = 2 + (rng.next_f64() * 5.0) as u32;
        let spacing = rng.range(4.0, 8.0);
        GlitchShape::DotGrid {
            cols,
            rows,
            spacing,
        }
    } else if roll < 0.34 {
        let width = rng.range(30.0, 210.0);
        let label = rng
            .chance(0.35)
            .then(|| (rng.next_f64() * 9999.0) as u32);
        GlitchShape::Rule { width, label }
    } else if roll < 0.42 {
        let width = rng.range(30.0, 150.0);
        let height = rng.range(20.0, 100.0);
        GlitchShape::Corners { width, height }
    } else if roll < 0.50 {
        let width = rng.range(40.0, 190.0);
        let height = rng.range(20.0, 100.0);
        GlitchShape::DottedBox { width, height }
    } else if roll < 0.60 {
        let length = rng.range(8.0, 58.0);
        let vertical = rng.chance(0.3);
        GlitchShape::Bar { length, vertical }
    } else if roll < 0.67 {
        GlitchShape::DoubleBar {
            height: rng.range(10.0, 35.0),
        }
    } else if roll < 0.74 {
        // Every candidate label draws from the stream before one is picked.
        let x = (rng.next_f64() * 9999.0) as u32;
        let y = (rng.next_f64() * 9999.0) as u32;
        let labels = [
            format!("x:{x} y:{y}"),
            format!("{}\u{00B0}", (rng.next_f64() * 360.0) as u32),
            format!("r:{:.2}", rng.next_f64() * 10.0),
            format!("t:{:.1}ms", rng.next_f64() * 100.0),
            format!("idx:{}", (rng.next_f64() * 999.0) as u32),
            {
                let w = (rng.next_f64() * 1920.0) as u32;
                let h = (rng.next_f64() * 1080.0) as u32;
                format!("{w}\u{00D7}{h}")
            },
        ];
        let i = rng.index(labels.len());
        GlitchShape::Coordinate {
            label: labels[i].to_uppercase(),
        }
    } else if roll < 0.82 {
        let length = rng.range(20.0, 120.0);
        let vertical = rng.chance(0.4);
        GlitchShape::CyanRule { length, vertical }
    } else if roll < 0.88 {
        GlitchShape::Ring {
            diameter: rng.range(8.0, 38.0),
        }
    } else if roll < 0.93 {
        let size = rng.range(6.0, 18.0);
        let rotation_deg = rng.next_f64() * 360.0;
        GlitchShape::Triangle { size, rotation_deg }
    } else {
        let width = rng.range(3.0, 21.0);
        let height = rng.range(3.0, 15.0);
        let opacity = rng.range(0.3, 0.8);
        GlitchShape::Micro {
            width,
            height,
            opacity,
        }
    }
}

pub fn glitch_marks(seed: i32, tier: DeviceTier) -> Vec<GlitchMark> {
    let mut rng = Mulberry32::new(layer_seed(seed, GLITCH_SEED_OFFSET));
    let count = OverlayCounts::for_tier(tier).glitch;

    (0..count)
        .map(|i| {
            let roll = rng.next_f64();
            let x = rng.next_f64() * 95.0;
            let depth = target_depth(i, 0.4, &mut rng);
            let parallax = 0.08 + rng.next_f64() * 0.35;
            let y = depth * parallax * 100.0 + rng.range(5.0, 90.0);
            let shape = glitch_shape(roll, &mut rng);
            GlitchMark {
                x,
                y,
                parallax,
                shape,
            }
        })
        .collect()
}

/// `HH:MM:SS:FF` with frames at ~30 fps.
pub fn timecode(hours: u32, minutes: u32, seconds: u32, millis: u32) -> String {
    let frames = (millis as f64 / 33.33).floor() as u32;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{frames:02}")
}

// --- atmosphere text ---

#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereBlock {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub parallax: f64,
    pub opacity: f64,
    pub delay: f64,
    /// Word indices (whitespace separated, counted across lines) to
    /// highlight. May repeat.
    pub highlight_words: SmallVec<[usize; 3]>,
}

fn shuffled<'a>(pool: &[&'a str], rng: &mut Mulberry32) -> Vec<&'a str> {
    let mut out = pool.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.index(i + 1);
        out.swap(i, j);
    }
    out
}

/// Text blocks drawn from `pool`. Empty when the pool is.
pub fn atmosphere_blocks(seed: i32, tier: DeviceTier, pool: &[&str]) -> Vec<AtmosphereBlock> {
    if pool.is_empty() {
        return Vec::new();
    }
    let mut rng = Mulberry32::new(layer_seed(seed, ATMOSPHERE_SEED_OFFSET));
    let count = OverlayCounts::for_tier(tier).atmosphere;
    let texts = shuffled(pool, &mut rng);

    (0..count)
        .map(|i| {
            let text = texts[i % texts.len()];
            let x = crate::burst::phi_position(100.0, 100.0, i, &mut rng).x;
            let words = text.split_whitespace().count().max(1);
            let highlights = 1 + (rng.next_f64() * 3.0) as usize;
            let highlight_words = (0..highlights).map(|_| rng.index(words)).collect();

            let depth = target_depth(i, 0.5, &mut rng);
            let parallax = 0.5 + rng.next_f64() * 0.42;
            let y = depth * parallax * 100.0 + rng.range(5.0, 90.0);

            AtmosphereBlock {
                text: text.to_owned(),
                x,
                y,
                parallax,
                opacity: rng.range(0.35, 0.8),
                delay: (i as f64 * 0.15 + rng.next_f64() * 0.8).min(3.0),
                highlight_words,
            }
        })
        .collect()
}

// --- plan ---

/// Every overlay layout for one seed and tier.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayPlan {
    pub seed: i32,
    pub tier: DeviceTier,
    pub reduced_motion: bool,
    pub sky: Vec<SkyBlock>,
    pub sky_anims: Vec<FragmentAnim>,
    pub rects: Vec<BlackRect>,
    pub dust: Vec<DustParticle>,
    pub glitch: Vec<GlitchMark>,
    pub atmosphere: Vec<AtmosphereBlock>,
}

impl OverlayPlan {
    /// Layouts without atmosphere text; see [`OverlayPlan::with_text_pool`].
    pub fn new(seed: i32, tier: DeviceTier, reduced_motion: bool) -> Self {
        let sky = sky_blocks(seed, tier);
        let sky_anims = fragment_anims(seed, tier, &sky);
        let plan = Self {
            seed,
            tier,
            reduced_motion,
            sky,
            sky_anims,
            rects: black_rects(seed, tier),
            dust: dust_particles(seed, tier),
            glitch: glitch_marks(seed, tier),
            atmosphere: Vec::new(),
        };
        log::debug!(
            "[overlay] plan seed={} tier={} sky={} rects={} dust={} glitch={}",
            seed,
            tier.name(),
            plan.sky.len(),
            plan.rects.len(),
            plan.dust.len(),
            plan.glitch.len()
        );
        plan
    }

    pub fn with_text_pool(mut self, pool: &[&str]) -> Self {
        self.atmosphere = atmosphere_blocks(self.seed, self.tier, pool);
        self
    }

    /// Elements that move after layout: scroll parallax or time animation.
    /// Under reduced motion only sky fragments move, and only with scroll.
    pub fn animated_elements(&self) -> usize {
        if self.reduced_motion {
            self.sky.len()
        } else {
            self.sky.len()
                + self.rects.len()
                + self.dust.len()
                + self.glitch.len()
                + self.atmosphere.len()
        }
    }

    /// Layers that follow the scroll offset.
    pub fn scroll_listeners(&self) -> usize {
        if self.reduced_motion {
            1
        } else {
            [
                !self.sky.is_empty(),
                !self.rects.is_empty(),
                !self.dust.is_empty(),
                !self.glitch.is_empty(),
                !self.atmosphere.is_empty(),
            ]
            .into_iter()
            .filter(|b| *b)
            .count()
        }
    }

    /// Whether anything changes without scrolling.
    pub fn needs_animation_frames(&self) -> bool {
        !self.reduced_motion
    }

    /// Sky fragment poses, in block order.
    pub fn sky_transforms(&self, time_s: f64, scroll_y: f64) -> Vec<FragmentTransform> {
        if self.reduced_motion {
            self.sky
                .iter()
                .map(|b| FragmentTransform::parallax(b, scroll_y))
                .collect()
        } else {
            self.sky_anims
                .iter()
                .map(|a| a.transform(time_s, scroll_y))
                .collect()
        }
    }
}

// --- painting ---

/// Inputs for one overlay canvas frame, in CSS px.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFrame<'a> {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    /// Seconds since the overlay was mounted.
    pub time_s: f64,
    pub timecode: &'a str,
}

impl OverlayFrame<'_> {
    fn place(&self, x_pct: f64, y_pct: f64, parallax: f64, reduced_motion: bool) -> DVec2 {
        let shift = if reduced_motion {
            0.0
        } else {
            self.scroll_y * parallax
        };
        DVec2::new(x_pct * 0.01 * self.width, y_pct * 0.01 * self.height - shift)
    }

    fn visible(&self, p: DVec2) -> bool {
        p.y > -CULL_MARGIN && p.y < self.height + CULL_MARGIN
    }
}

fn solid(s: &mut dyn Surface, color: Rgba) {
    s.set_fill(&Paint::Solid(color));
}

fn fill_box(s: &mut dyn Surface, origin: DVec2, size: DVec2) {
    s.begin_path();
    s.rect(origin, size);
    s.fill();
}

fn line(s: &mut dyn Surface, a: DVec2, b: DVec2) {
    s.begin_path();
    s.move_to(a);
    s.line_to(b);
    s.stroke();
}

/// Paint rectangles, dust, glitch marks and atmosphere text (back to
/// front) onto a surface in CSS px. Sky fragments are DOM images and are
/// positioned by the caller from [`OverlayPlan::sky_transforms`].
pub fn paint_overlay(plan: &OverlayPlan, frame: &OverlayFrame<'_>, s: &mut dyn Surface) {
    s.clear(frame.width, frame.height);
    s.set_composite(CompositeOp::SourceOver);
    s.set_line_cap(LineCap::Butt);
    s.set_line_join(LineJoin::Miter);
    s.set_line_dash(&[]);

    paint_rects(plan, frame, s);
    if plan.reduced_motion {
        paint_atmosphere(plan, frame, s);
        return;
    }
    paint_dust(plan, frame, s);
    paint_glitch(plan, frame, s);
    paint_atmosphere(plan, frame, s);
}

fn paint_rects(plan: &OverlayPlan, frame: &OverlayFrame<'_>, s: &mut dyn Surface) {
    for r in &plan.rects {
        let origin = frame.place(r.x, r.y, r.parallax, plan.reduced_motion);
        if !frame.visible(origin) {
            continue;
        }
        let fade = if plan.reduced_motion {
            1.0
        } else {
            fade_in(frame.time_s, r.delay)
        };
        if fade <= 0.0 {
            continue;
        }
        let size = DVec2::new(r.width, r.height);
        if r.hatched {
            s.set_stroke(&Paint::Solid(Rgba::rgb(INK_RGB, 0.9 * fade)));
            s.set_line_width(1.0);
            for (a, b) in hatch_segments(origin, size) {
                line(s, a, b);
            }
        } else {
            solid(s, Rgba::rgb(INK_RGB, r.opacity * fade));
            fill_box(s, origin, size);
        }
    }
}

fn paint_dust(plan: &OverlayPlan, frame: &OverlayFrame<'_>, s: &mut dyn Surface) {
    for d in &plan.dust {
        let anchor = frame.place(d.x, d.y, d.parallax, false);
        if !frame.visible(anchor) {
            continue;
        }
        let (offset, alpha) = d.sample(frame.time_s);
        let r = d.size * 0.5;
        solid(s, Rgba::rgb(INK_RGB, alpha));
        s.begin_path();
        s.circle(anchor + offset + DVec2::splat(r), r);
        s.fill();
    }
}

fn paint_glitch(plan: &OverlayPlan, frame: &OverlayFrame<'_>, s: &mut dyn Surface) {
    let ink = |a: f64| Rgba::rgb(INK_RGB, a);
    for g in &plan.glitch {
        let p = frame.place(g.x, g.y, g.parallax, false);
        if !frame.visible(p) {
            continue;
        }
        match &g.shape {
            GlitchShape::Timecode { scale } => {
                let px = 11.0 * scale;
                let w = frame.timecode.chars().count() as f64 * px * 0.68 + 8.0;
                solid(s, Rgba::rgb(CYAN_RGB, 0.12));
                fill_box(s, p, DVec2::new(w, px + 2.0));
                solid(s, Rgba::hex(0x333333));
                s.fill_text(frame.timecode, p + DVec2::new(4.0, px), px);
            }
            GlitchShape::Cross { size, weight } => {
                solid(s, ink(0.4));
                fill_box(s, p + DVec2::new((size - weight) * 0.5, 0.0), DVec2::new(*weight, *size));
                fill_box(s, p + DVec2::new(0.0, (size - weight) * 0.5), DVec2::new(*size, *weight));
            }
            GlitchShape::DotGrid {
                cols,
                rows,
                spacing,
            } => {
                solid(s, ink(0.35));
                s.begin_path();
                for r in 0..*rows {
                    for c in 0..*cols {
                        let at = p + DVec2::new(c as f64 * spacing, r as f64 * spacing);
                        s.circle(at + DVec2::ONE, 1.0);
                    }
                }
                s.fill();
            }
            GlitchShape::Rule { width, label } => {
                solid(s, ink(0.2));
                fill_box(s, p, DVec2::new(*width, 1.0));
                if let Some(n) = label {
                    let text = n.to_string();
                    let w = text.len() as f64 * 8.0 * 0.7;
                    solid(s, Rgba::hex(0x999999));
                    s.fill_text(&text, p + DVec2::new(width - w, -2.0), 8.0);
                }
            }
            GlitchShape::Corners { width, height } => {
                const ARM: f64 = 8.0;
                s.set_stroke(&Paint::Solid(ink(0.35)));
                s.set_line_width(1.0);
                for (cx, sx) in [(0.0, 1.0), (*width, -1.0)] {
                    for (cy, sy) in [(0.0, 1.0), (*height, -1.0)] {
                        let c = p + DVec2::new(cx, cy);
                        s.begin_path();
                        s.move_to(c + DVec2::new(ARM * sx, 0.0));
                        s.line_to(c);
                        s.line_to(c + DVec2::new(0.0, ARM * sy));
                        s.stroke();
                    }
                }
            }
            GlitchShape::DottedBox { width, height } => {
                s.set_stroke(&Paint::Solid(ink(0.2)));
                s.set_line_width(1.0);
                s.set_line_dash(&[1.0, 2.0]);
                s.begin_path();
                s.rect(p, DVec2::new(*width, *height));
                s.stroke();
                s.set_line_dash(&[]);
            }
            GlitchShape::Bar { length, vertical } => {
                solid(s, ink(0.5));
                let size = if *vertical {
                    DVec2::new(2.0, *length)
                } else {
                    DVec2::new(*length, 2.0)
                };
                fill_box(s, p, size);
            }
            GlitchShape::DoubleBar { height } => {
                solid(s, ink(0.4));
                fill_box(s, p, DVec2::new(2.0, *height));
                fill_box(s, p + DVec2::new(5.0, 0.0), DVec2::new(2.0, *height));
            }
            GlitchShape::Coordinate { label } => {
                solid(s, Rgba::hex(0xAAAAAA));
                s.fill_text(label, p + DVec2::new(0.0, 8.0), 8.0);
            }
            GlitchShape::CyanRule { length, vertical } => {
                solid(s, Rgba::rgb(CYAN_RGB, 0.35));
                let size = if *vertical {
                    DVec2::new(1.0, *length)
                } else {
                    DVec2::new(*length, 1.0)
                };
                fill_box(s, p, size);
            }
            GlitchShape::Ring { diameter } => {
                s.set_stroke(&Paint::Solid(ink(0.2)));
                s.set_line_width(1.0);
                s.begin_path();
                s.circle(p, diameter * 0.5);
                s.stroke();
            }
            GlitchShape::Triangle { size, rotation_deg } => {
                let c = p + DVec2::new(size * 0.5, size * 0.5);
                let rot = DVec2::from_angle(rotation_deg.to_radians());
                let corners = [
                    DVec2::new(0.0, -size * 0.5),
                    DVec2::new(size * 0.5, size * 0.5),
                    DVec2::new(-size * 0.5, size * 0.5),
                ];
                solid(s, ink(0.3));
                s.begin_path();
                s.move_to(c + rot.rotate(corners[0]));
                s.line_to(c + rot.rotate(corners[1]));
                s.line_to(c + rot.rotate(corners[2]));
                s.close_path();
                s.fill();
            }
            GlitchShape::Micro {
                width,
                height,
                opacity,
            } => {
                solid(s, ink(*opacity));
                fill_box(s, p, DVec2::new(*width, *height));
            }
        }
    }
}

fn paint_atmosphere(plan: &OverlayPlan, frame: &OverlayFrame<'_>, s: &mut dyn Surface) {
    for b in &plan.atmosphere {
        let origin = frame.place(b.x, b.y, b.parallax, plan.reduced_motion);
        if !frame.visible(origin) {
            continue;
        }
        let alpha = if plan.reduced_motion {
            b.opacity
        } else {
            b.opacity * fade_in(frame.time_s, b.delay)
        };
        if alpha <= 0.0 {
            continue;
        }

        let mut word = 0;
        for (row, text_line) in b.text.lines().enumerate() {
            let baseline = origin + DVec2::new(0.0, (row as f64 + 1.0) * TEXT_LINE_HEIGHT - 6.0);
            let mut col = 0usize;
            for w in text_line.split(' ') {
                if w.is_empty() {
                    col += 1;
                    continue;
                }
                let len = w.chars().count();
                if b.highlight_words.contains(&word) {
                    solid(s, Rgba::rgb(CYAN_RGB, 0.18 * alpha));
                    let at = baseline + DVec2::new(col as f64 * TEXT_ADVANCE - 3.0, -TEXT_PX);
                    fill_box(s, at, DVec2::new(len as f64 * TEXT_ADVANCE + 6.0, TEXT_PX + 4.0));
                }
                word += 1;
                col += len + 1;
            }
            solid(s, Rgba::hex(0x1A1A1A).with_alpha(alpha));
            s.fill_text(text_line, baseline, TEXT_PX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn rect_area_is_capped() {
        for seed in [1, 20250115, -7] {
            for r in black_rects(seed, DeviceTier::Desktop) {
                assert!(r.area() <= MAX_RECT_AREA + 1e-6);
            }
        }
    }

    #[test]
    fn fragment_opacity_is_clamped() {
        let plan = OverlayPlan::new(3, DeviceTier::Desktop, false);
        for a in &plan.sky_anims {
            for t in [0.0, 7.5, 31.0, 120.0] {
                let o = a.transform(t, 0.0).opacity;
                assert!((0.05..=1.0).contains(&o));
            }
        }
    }

    #[test]
    fn hatch_stays_inside_box() {
        let origin = DVec2::new(10.0, 20.0);
        let size = DVec2::new(80.0, 30.0);
        let segs = hatch_segments(origin, size);
        assert!(!segs.is_empty());
        for (a, b) in segs {
            for p in [a, b] {
                assert!(p.x >= origin.x - 1e-9 && p.x <= origin.x + size.x + 1e-9);
                assert!(p.y >= origin.y - 1e-9 && p.y <= origin.y + size.y + 1e-9);
            }
        }
    }

    #[test]
    fn timecode_pads_fields() {
        assert_eq!(timecode(9, 5, 3, 500), "09:05:03:15");
    }

    #[test]
    fn reduced_motion_paints_no_dust_or_glitch() {
        let plan = OverlayPlan::new(5, DeviceTier::Mobile, true).with_text_pool(&["a b c"]);
        let frame = OverlayFrame {
            width: 400.0,
            height: 800.0,
            scroll_y: 0.0,
            time_s: 10.0,
            timecode: "00:00:00:00",
        };
        let mut s = RecordingSurface::new();
        paint_overlay(&plan, &frame, &mut s);
        assert!(s.texts().iter().all(|t| *t == "a b c"));
        assert!(!s.has_non_finite());
    }
}
