//! Procedural scene builder.
//!
//! `build_scene` turns a focal point, a canvas size and a density scale into
//! a [`SceneDescription`] by drawing from one RNG stream. The order of draws
//! below is part of the output: reordering any two categories changes every
//! scene for every seed.

use crate::constants::{golden_angle, CYAN_RGB, FOCAL_X, FOCAL_Y, INK_RGB, OVERFLOW, PHI_INV};
use crate::error::SceneError;
use crate::geometry::{brush_control_points, quadratic_at};
use crate::rng::Mulberry32;
use crate::scene::{
    Arc, Beam, BrushRole, BrushStroke, Bundle, Dot, Hairline, InkStroke, Mark, SceneDescription,
    Segment, Tangle, Through, Whip,
};
use crate::taper::Taper;
use crate::tier::DeviceTier;
use glam::DVec2;
use smallvec::SmallVec;
use std::f64::consts::{PI, TAU};

/// Splatter dots dropped around every primary brush stroke.
const SPLATTER_PER_BRUSH: usize = 6;
/// Whip curves are sampled at `t = 0, 0.05, .., 0.95`, so the tail stops
/// just short of the end point.
const WHIP_POINTS: usize = 20;
const WHIP_STEP: f64 = 0.05;

/// Inputs of one scene build.
///
/// Fields:
/// - `focal`: point every radiating category is anchored on
/// - `width`, `height`: canvas size in CSS px (height includes overflow)
/// - `density`: population multiplier from the device tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildParams {
    pub focal: DVec2,
    pub width: f64,
    pub height: f64,
    pub density: f64,
}

impl BuildParams {
    pub fn from_frame(frame: &SceneFrame) -> Self {
        Self {
            focal: frame.focal,
            width: frame.width,
            height: frame.canvas_height,
            density: frame.density,
        }
    }
}

/// Canvas geometry for one viewport: the drawing surface extends
/// `OVERFLOW` viewport heights above and below the visible area so scroll
/// parallax never exposes an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    pub width: f64,
    pub viewport_height: f64,
    pub canvas_height: f64,
    pub overflow: f64,
    pub focal: DVec2,
    pub pixel_ratio: f64,
    pub density: f64,
    pub tier: DeviceTier,
}

impl SceneFrame {
    /// Frame for a viewport at 1x pixel ratio. Sizes are rounded to whole
    /// CSS px; non-positive sizes are lifted to 1 px so callers on the hot
    /// path never have to handle an error.
    pub fn for_viewport(width: f64, viewport_height: f64, tier: DeviceTier) -> Self {
        let w = if width.is_finite() { width.round().max(1.0) } else { 1.0 };
        let vh = if viewport_height.is_finite() {
            viewport_height.round().max(1.0)
        } else {
            1.0
        };
        let overflow = (vh * OVERFLOW).round();
        Self {
            width: w,
            viewport_height: vh,
            canvas_height: vh + overflow * 2.0,
            overflow,
            focal: DVec2::new(w * FOCAL_X, vh * FOCAL_Y + overflow),
            pixel_ratio: 1.0,
            density: tier.density_scale(),
            tier,
        }
    }

    pub fn try_for_viewport(
        width: f64,
        viewport_height: f64,
        tier: DeviceTier,
    ) -> Result<Self, SceneError> {
        if !(width.is_finite() && viewport_height.is_finite())
            || width <= 0.0
            || viewport_height <= 0.0
        {
            return Err(SceneError::EmptyViewport {
                width,
                height: viewport_height,
            });
        }
        Ok(Self::for_viewport(width, viewport_height, tier))
    }

    /// Apply the tier's pixel-ratio policy to the device's reported ratio.
    pub fn with_device_pixel_ratio(mut self, device_pixel_ratio: f64) -> Self {
        self.pixel_ratio = self.tier.pixel_ratio(device_pixel_ratio);
        self
    }

    /// Backing-store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.canvas_height * self.pixel_ratio).round() as u32,
        )
    }

    /// Upward parallax shift of the canvas container, clamped so the
    /// overflow band is never scrolled past.
    pub fn parallax_shift(&self, scroll_y: f64, parallax: f64) -> f64 {
        (scroll_y.max(0.0) * parallax).min(self.viewport_height * OVERFLOW)
    }
}

#[inline]
fn polar(origin: DVec2, angle: f64, dist: f64) -> DVec2 {
    DVec2::new(origin.x + angle.cos() * dist, origin.y + angle.sin() * dist)
}

/// Midpoint of `p0..p1` jittered by up to `±span/2` on both axes.
#[inline]
fn bent_midpoint(rng: &mut Mulberry32, p0: DVec2, p1: DVec2, span: f64) -> DVec2 {
    let x = (p0.x + p1.x) / 2.0 + rng.signed(span);
    let y = (p0.y + p1.y) / 2.0 + rng.signed(span);
    DVec2::new(x, y)
}

fn edge_point(rng: &mut Mulberry32, edge: usize, w: f64, h: f64) -> DVec2 {
    match edge {
        0 => DVec2::new(rng.next_f64() * w, -40.0),
        1 => DVec2::new(w + 40.0, rng.next_f64() * h),
        2 => DVec2::new(rng.next_f64() * w, h + 40.0),
        _ => DVec2::new(-40.0, rng.next_f64() * h),
    }
}

struct Builder<'a> {
    rng: &'a mut Mulberry32,
    focal: DVec2,
    w: f64,
    h: f64,
    s: f64,
    diag: f64,
    golden: f64,
    tangle_radius: f64,
    diagonals: [f64; 4],
    /// Role stamped on primary brushes by `add_brush`.
    role: BrushRole,
    out: SceneDescription,
}

/// Count helpers; the scale is applied before rounding.
#[inline]
fn ceil_count(base: f64, s: f64) -> usize {
    (base * s).ceil().max(0.0) as usize
}

#[inline]
fn floor_count(base: f64, s: f64) -> usize {
    (base * s).floor().max(0.0) as usize
}

/// Build a complete scene. Deterministic in `(params, rng state)`.
pub fn build_scene(params: &BuildParams, rng: &mut Mulberry32) -> SceneDescription {
    let (w, h) = (params.width, params.height);
    let mut b = Builder {
        rng,
        focal: params.focal,
        w,
        h,
        s: params.density,
        diag: (w * w + h * h).sqrt(),
        golden: golden_angle(),
        tangle_radius: w.min(h) * 0.14,
        diagonals: [h.atan2(w), h.atan2(-w), w.atan2(-h), (-w).atan2(-h)],
        role: BrushRole::Hero,
        out: SceneDescription {
            focal: params.focal,
            width: w,
            height: h,
            ..Default::default()
        },
    };

    b.hero_strokes();
    b.accent_strokes();
    b.peripheral_strokes();
    b.diagonal_strokes();
    b.beams();
    b.hairlines();
    b.tangles();
    b.arcs();
    b.accent_marks();
    b.scratches();
    b.throughs();
    b.whips();
    b.brush_tangles();
    b.inks();
    b.thick_cyans();
    b.bundles();

    log::trace!(
        "[builder] {} primitives ({} brushes, {} beams, {} hairlines)",
        b.out.primitive_count(),
        b.out.brushes.len(),
        b.out.beams.len(),
        b.out.hairlines.len()
    );
    b.out
}

impl Builder<'_> {
    /// Push a primary chrome stroke, its micro-seed, and its splatter.
    #[allow(clippy::too_many_arguments)]
    fn add_brush(&mut self, p0: DVec2, dir: f64, len: f64, curv: f64, max_w: f64, roll: usize, opacity: f64) {
        let cp = brush_control_points(p0, dir, len, curv);
        let micro_seed = self.rng.next_f64() * 100.0;
        self.out.brushes.push(BrushStroke {
            role: self.role,
            cp,
            taper: Taper::brush(max_w, roll),
            opacity,
            micro_seed,
        });
        for d in 0..SPLATTER_PER_BRUSH {
            let ep = if d < 2 { cp[0] } else { cp[3] };
            let x = ep.x + self.rng.signed(28.0);
            let y = ep.y + self.rng.signed(28.0);
            let radius = 1.0 + self.rng.next_f64() * 3.5;
            let opacity = 0.3 + self.rng.next_f64() * 0.5;
            self.out.splatter.push(Dot {
                center: DVec2::new(x, y),
                radius,
                opacity,
            });
        }
    }

    fn hero_strokes(&mut self) {
        self.role = BrushRole::Hero;
        for i in 0..ceil_count(5.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.5);
            let d = self.rng.next_f64() * self.diag * 0.06;
            let len = self.diag * (0.30 + self.rng.next_f64() * 0.35);
            let curv = self.rng.signed(0.35);
            let max_w = 20.0 + self.rng.next_f64() * 35.0;
            let roll = self.rng.index(3);
            let op = 0.88 + self.rng.next_f64() * 0.12;
            self.add_brush(polar(self.focal, angle, d), angle, len, curv, max_w, roll, op);
        }
    }

    fn accent_strokes(&mut self) {
        self.role = BrushRole::Accent;
        for i in 0..ceil_count(4.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.8);
            let d = self.rng.next_f64() * self.diag * 0.08;
            let dir = angle + self.rng.signed(0.6);
            let len = self.diag * (0.08 + self.rng.next_f64() * 0.12);
            let curv = self.rng.signed(0.5);
            let max_w = 16.0 + self.rng.next_f64() * 20.0;
            let roll = if self.rng.chance(0.6) { 0 } else { 1 };
            let op = 0.85 + self.rng.next_f64() * 0.15;
            self.add_brush(polar(self.focal, angle, d), dir, len, curv, max_w, roll, op);
        }
    }

    /// Strokes entering from a random edge, aimed roughly at the focal point.
    fn peripheral_strokes(&mut self) {
        self.role = BrushRole::Peripheral;
        let (w, h, f) = (self.w, self.h, self.focal);
        for _ in 0..ceil_count(3.0, self.s) {
            let edge = self.rng.index(4);
            let sx = match edge {
                1 => w + 20.0,
                3 => -20.0,
                _ => self.rng.next_f64() * w,
            };
            let sy = match edge {
                0 => -20.0,
                2 => h + 20.0,
                _ => self.rng.next_f64() * h,
            };
            let a_to_f = (f.y - sy).atan2(f.x - sx) + self.rng.signed(0.5);
            let len = self.diag * (0.18 + self.rng.next_f64() * 0.20);
            let curv = self.rng.signed(0.4);
            let max_w = 14.0 + self.rng.next_f64() * 22.0;
            let op = 0.75 + self.rng.next_f64() * 0.25;
            self.add_brush(DVec2::new(sx, sy), a_to_f, len, curv, max_w, 2, op);
        }
    }

    /// Structural strokes along the frame diagonals. Only the first three
    /// diagonal angles get a stroke; all four bias the through lines.
    fn diagonal_strokes(&mut self) {
        self.role = BrushRole::Diagonal;
        for i in 0..3 {
            let angle = self.diagonals[i] + self.rng.signed(0.15);
            let d = self.rng.next_f64() * self.diag * 0.04;
            let len = self.diag * (0.35 + self.rng.next_f64() * 0.25);
            let curv = self.rng.signed(0.2);
            let max_w = 22.0 + self.rng.next_f64() * 22.0;
            let roll = self.rng.index(3);
            let op = 0.90 + self.rng.next_f64() * 0.10;
            self.add_brush(polar(self.focal, angle, d), angle, len, curv, max_w, roll, op);
        }
    }

    fn beams(&mut self) {
        for i in 0..floor_count(55.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.3);
            let len = self.diag * (0.2 + self.rng.next_f64() * 0.7);
            let off = self.rng.next_f64() * 15.0;
            let p0 = polar(self.focal, angle, off);
            let p1 = polar(self.focal, angle, len);
            let cp = if self.rng.chance(0.3) {
                Some(bent_midpoint(self.rng, p0, p1, len * 0.08))
            } else {
                None
            };
            let width = 0.8 + self.rng.next_f64() * 4.2;
            let opacity = 0.3 + self.rng.next_f64() * 0.5;
            self.out.beams.push(Beam {
                p0,
                cp,
                p1,
                width,
                opacity,
            });
        }
    }

    /// Radial hairlines from the focal point, then a scattered set that
    /// starts partway out for mid-page coverage.
    fn hairlines(&mut self) {
        for i in 0..floor_count(200.0, self.s) {
            let angle = (i as f64 + 0.5) * self.golden + self.rng.signed(0.5);
            let len = self.diag * (0.1 + self.rng.next_f64() * 0.8);
            let off = self.rng.next_f64() * 15.0;
            let opacity = 0.03 + self.rng.next_f64() * 0.17;
            let gray = self.rng.chance(0.4);
            self.out.hairlines.push(Hairline {
                p0: polar(self.focal, angle, off),
                p1: polar(self.focal, angle, len),
                opacity,
                gray,
            });
        }
        for i in 0..floor_count(40.0, self.s) {
            let s_angle = i as f64 * self.golden + self.rng.signed(0.8);
            let s_dist = self.diag * (0.15 + self.rng.next_f64() * 0.45);
            let start = polar(self.focal, s_angle, s_dist);
            let angle = s_angle + self.rng.signed(0.7);
            let len = self.diag * (0.05 + self.rng.next_f64() * 0.3);
            let opacity = 0.03 + self.rng.next_f64() * 0.12;
            let gray = self.rng.chance(0.5);
            self.out.hairlines.push(Hairline {
                p0: start,
                p1: polar(start, angle, len),
                opacity,
                gray,
            });
        }
    }

    /// Random walks held near the focal point by an elastic pull-back.
    fn tangles(&mut self) {
        let f = self.focal;
        let r = self.tangle_radius;
        for _ in 0..floor_count(80.0, self.s) {
            let num_pts = 10 + self.rng.index(15);
            let mut c = DVec2::new(
                f.x + self.rng.signed(r * 0.6),
                f.y + self.rng.signed(r * 0.6),
            );
            let mut dir = self.rng.next_f64() * TAU;
            let mut points = Vec::with_capacity(num_pts);
            points.push(c);
            let escape = self.rng.chance(0.25);
            let esc_at = (num_pts as f64 * (0.3 + self.rng.next_f64() * 0.4)).floor() as usize;
            for j in 1..num_pts {
                dir += self.rng.signed(PI * 1.8);
                let mut step = 25.0 + self.rng.next_f64() * 55.0;
                if escape && j == esc_at {
                    step = 150.0 + self.rng.next_f64() * 300.0;
                }
                c = polar(c, dir, step);
                let d = c - f;
                if d.length() > r * 0.7 {
                    c -= d * 0.4;
                    dir = (f.y - c.y).atan2(f.x - c.x) + self.rng.signed(0.7);
                }
                points.push(c);
            }
            let width = 0.5 + self.rng.next_f64() * 2.5;
            let opacity = 0.10 + self.rng.next_f64() * 0.35;
            self.out.tangles.push(Tangle {
                points,
                width,
                opacity,
            });
        }

        // dense core inside 20% of the tangle radius
        let core = r * 0.2;
        for _ in 0..floor_count(45.0, self.s) {
            let num_pts = 4 + self.rng.index(5);
            let mut c = DVec2::new(f.x + self.rng.signed(core), f.y + self.rng.signed(core));
            let mut dir = self.rng.next_f64() * TAU;
            let mut points = Vec::with_capacity(num_pts);
            points.push(c);
            for _ in 1..num_pts {
                dir += self.rng.signed(PI * 1.8);
                let step = 10.0 + self.rng.next_f64() * 30.0;
                c = polar(c, dir, step);
                let d = c - f;
                if d.length() > core * 1.2 {
                    c -= d * 0.6;
                    dir = (f.y - c.y).atan2(f.x - c.x) + self.rng.signed(0.5);
                }
                points.push(c);
            }
            let width = 0.4 + self.rng.next_f64() * 3.0;
            let opacity = 0.15 + self.rng.next_f64() * 0.35;
            self.out.tangles.push(Tangle {
                points,
                width,
                opacity,
            });
        }
    }

    /// Faint quadratic arcs between two different canvas edges.
    fn arcs(&mut self) {
        let (w, h, f) = (self.w, self.h, self.focal);
        for _ in 0..floor_count(12.0, self.s) {
            let start_edge = self.rng.index(4);
            let end_edge = (start_edge + 1 + self.rng.index(3)) % 4;
            let p0 = edge_point(self.rng, start_edge, w, h);
            let cp = DVec2::new(
                f.x + self.rng.signed(w * 0.5),
                f.y + self.rng.signed(h * 0.5),
            );
            let p1 = edge_point(self.rng, end_edge, w, h);
            let width = 0.4 + self.rng.next_f64() * 0.8;
            let opacity = 0.04 + self.rng.next_f64() * 0.1;
            self.out.arcs.push(Arc {
                p0,
                cp,
                p1,
                width,
                opacity,
            });
        }
    }

    /// Short marks clustered around the harmonic armature: rule of thirds,
    /// quarter points and golden-section intersections.
    fn accent_marks(&mut self) {
        let (w, h) = (self.w, self.h);
        let attractors = [
            DVec2::new(w / 3.0, h / 3.0),
            DVec2::new(2.0 * w / 3.0, h / 3.0),
            DVec2::new(w / 3.0, 2.0 * h / 3.0),
            DVec2::new(2.0 * w / 3.0, 2.0 * h / 3.0),
            DVec2::new(w / 4.0, h / 4.0),
            DVec2::new(3.0 * w / 4.0, h / 4.0),
            DVec2::new(w / 4.0, 3.0 * h / 4.0),
            DVec2::new(3.0 * w / 4.0, 3.0 * h / 4.0),
            DVec2::new(w * PHI_INV, h * PHI_INV),
            DVec2::new(w * (1.0 - PHI_INV), h * PHI_INV),
            DVec2::new(w * PHI_INV, h * (1.0 - PHI_INV)),
            DVec2::new(w * (1.0 - PHI_INV), h * (1.0 - PHI_INV)),
        ];
        for _ in 0..floor_count(24.0, self.s) {
            let att = attractors[self.rng.index(attractors.len())];
            let x = att.x + self.rng.signed(w * 0.16);
            let y = att.y + self.rng.signed(h * 0.16);
            let angle = self.rng.next_f64() * TAU;
            let len = 20.0 + self.rng.next_f64() * 50.0;
            let p0 = DVec2::new(x, y);
            let p1 = polar(p0, angle, len);
            let cp = if self.rng.chance(0.35) {
                Some(bent_midpoint(self.rng, p0, p1, len * 0.3))
            } else {
                None
            };
            let width = 0.5 + self.rng.next_f64() * 3.0;
            let opacity = 0.2 + self.rng.next_f64() * 0.4;
            let has_dot = self.rng.chance(0.4);
            self.out.accents.push(Mark {
                p0,
                cp,
                p1,
                width,
                opacity,
                has_dot,
            });
        }
    }

    fn scratches(&mut self) {
        let scatter = self.tangle_radius * 2.0;
        for _ in 0..floor_count(80.0, self.s) {
            let p0 = DVec2::new(
                self.focal.x + self.rng.signed(scatter),
                self.focal.y + self.rng.signed(scatter),
            );
            let angle = self.rng.next_f64() * TAU;
            let len = 8.0 + self.rng.next_f64() * 37.0;
            let p1 = polar(p0, angle, len);
            let cp = if self.rng.chance(0.3) {
                Some(bent_midpoint(self.rng, p0, p1, len * 0.4))
            } else {
                None
            };
            let width = 0.4 + self.rng.next_f64() * 2.1;
            let opacity = 0.15 + self.rng.next_f64() * 0.4;
            let has_dot = self.rng.chance(0.2);
            self.out.scratches.push(Mark {
                p0,
                cp,
                p1,
                width,
                opacity,
                has_dot,
            });
        }
    }

    /// Edge-to-edge lines passing within 15 px of the focal point. The first
    /// four follow the frame diagonals (±15°).
    fn throughs(&mut self) {
        let ext = self.diag * 0.6;
        for i in 0..floor_count(22.0, self.s) {
            let angle = if i < 4 {
                self.diagonals[i] + self.rng.signed(0.52)
            } else {
                self.rng.next_f64() * TAU
            };
            let jitter = self.rng.signed(30.0);
            let perp = DVec2::new(-angle.sin() * jitter, angle.cos() * jitter);
            let axis = DVec2::new(angle.cos(), angle.sin()) * ext;
            let p0 = self.focal + perp - axis;
            let p1 = self.focal + perp + axis;
            let cp = if self.rng.chance(0.4) {
                Some(bent_midpoint(self.rng, p0, p1, ext * 0.06))
            } else {
                None
            };
            let width = 0.4 + self.rng.next_f64() * 1.1;
            let opacity = 0.05 + self.rng.next_f64() * 0.15;
            self.out.throughs.push(Through {
                p0,
                cp,
                p1,
                width,
                opacity,
            });
        }
    }

    fn whips(&mut self) {
        for i in 0..floor_count(22.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.6);
            let len = self.diag * (0.18 + self.rng.next_f64() * 0.35);
            let off = self.rng.next_f64() * 20.0;
            let p0 = polar(self.focal, angle, off);
            let p1 = polar(self.focal, angle, len);
            let mag = len * (0.05 + self.rng.next_f64() * 0.12);
            let cp_off = if self.rng.chance(0.5) { mag } else { -mag };
            let cp = polar((p0 + p1) / 2.0, angle + PI / 2.0, cp_off);
            let points = (0..WHIP_POINTS)
                .map(|k| quadratic_at(p0, cp, p1, k as f64 * WHIP_STEP))
                .collect();
            let max_width = 2.0 + self.rng.next_f64() * 4.0;
            let opacity = 0.15 + self.rng.next_f64() * 0.35;
            self.out.whips.push(Whip {
                points,
                max_width,
                opacity,
            });
        }
    }

    /// Short curly chrome strokes confined to the tangle area.
    fn brush_tangles(&mut self) {
        for _ in 0..floor_count(8.0, self.s) {
            let angle = self.rng.next_f64() * TAU;
            let dist = self.rng.next_f64() * self.tangle_radius * 1.2;
            let origin = polar(self.focal, angle, dist);
            let dir = self.rng.next_f64() * TAU;
            let len = self.diag * (0.05 + self.rng.next_f64() * 0.07);
            let curv = self.rng.signed(1.2);
            let max_w = 3.0 + self.rng.next_f64() * 9.0;
            let roll = if self.rng.chance(0.5) { 0 } else { 2 };
            let cp = brush_control_points(origin, dir, len, curv);
            let opacity = 0.5 + self.rng.next_f64() * 0.35;
            let micro_seed = self.rng.next_f64() * 100.0;
            self.out.brush_tangles.push(BrushStroke {
                role: BrushRole::Tangle,
                cp,
                taper: Taper::brush(max_w, roll),
                opacity,
                micro_seed,
            });
        }
    }

    /// Bold black calligraphy (30-58 px).
    fn inks(&mut self) {
        for i in 0..ceil_count(3.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.4);
            let d = self.rng.next_f64() * self.diag * 0.05;
            let origin = polar(self.focal, angle, d);
            let len = self.diag * (0.22 + self.rng.next_f64() * 0.30);
            let curv = self.rng.signed(0.25);
            let max_w = 30.0 + self.rng.next_f64() * 28.0;
            let variant = if self.rng.chance(0.6) { 0 } else { 1 };
            let cp = brush_control_points(origin, angle, len, curv);
            let micro_seed = self.rng.next_f64() * 100.0;
            self.out.inks.push(InkStroke {
                cp,
                taper: Taper::ink(max_w, variant),
                micro_seed,
                rgb: INK_RGB,
            });
        }
    }

    /// Cyan calligraphy (12-37 px), rotated off the ink strokes by 0.3π.
    fn thick_cyans(&mut self) {
        for i in 0..ceil_count(3.0, self.s) {
            let angle = i as f64 * self.golden + self.rng.signed(0.5) + PI * 0.3;
            let d = self.rng.next_f64() * self.diag * 0.06;
            let origin = polar(self.focal, angle, d);
            let len = self.diag * (0.18 + self.rng.next_f64() * 0.30);
            let curv = self.rng.signed(0.35);
            let max_w = 12.0 + self.rng.next_f64() * 25.0;
            let variant = if self.rng.chance(0.5) { 0 } else { 1 };
            let cp = brush_control_points(origin, angle, len, curv);
            let micro_seed = self.rng.next_f64() * 100.0;
            self.out.thick_cyans.push(InkStroke {
                cp,
                taper: Taper::ink(max_w, variant),
                micro_seed,
                rgb: CYAN_RGB,
            });
        }
    }

    /// Groups of 5-10 parallel lines, 3-11 px apart.
    fn bundles(&mut self) {
        for i in 0..ceil_count(7.0, self.s) {
            let b_angle = i as f64 * self.golden + self.rng.signed(0.6);
            let b_dist = self.diag * (0.10 + self.rng.next_f64() * 0.35);
            let base = polar(self.focal, b_angle, b_dist);
            let angle = b_angle + self.rng.signed(0.5);
            let count = 5 + self.rng.index(6);
            let spacing = 3.0 + self.rng.next_f64() * 8.0;
            let base_len = self.diag * (0.08 + self.rng.next_f64() * 0.25);
            let perp = DVec2::new(-angle.sin(), angle.cos());
            let mut lines: SmallVec<[Segment; 10]> = SmallVec::new();
            for j in 0..count {
                let offset = (j as f64 - (count - 1) as f64 / 2.0) * spacing;
                let len = base_len * (0.7 + self.rng.next_f64() * 0.6);
                let p0 = base + perp * offset;
                lines.push(Segment {
                    p0,
                    p1: polar(p0, angle, len),
                });
            }
            let width = 0.3 + self.rng.next_f64() * 0.7;
            let opacity = 0.06 + self.rng.next_f64() * 0.14;
            self.out.bundles.push(Bundle {
                lines,
                width,
                opacity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop_params() -> BuildParams {
        BuildParams {
            focal: DVec2::new(1344.0, 1188.0),
            width: 1920.0,
            height: 2808.0,
            density: 1.0,
        }
    }

    #[test]
    fn mobile_density_shrinks_every_category() {
        let mut p = desktop_params();
        let full = build_scene(&p, &mut Mulberry32::new(7));
        p.density = DeviceTier::Mobile.density_scale();
        let small = build_scene(&p, &mut Mulberry32::new(7));
        assert_eq!(small.brushes.len(), 2 + 2 + 2 + 3);
        assert_eq!(small.beams.len(), 19);
        assert!(small.primitive_count() < full.primitive_count());
    }

    #[test]
    fn splatter_follows_primary_brushes() {
        let scene = build_scene(&desktop_params(), &mut Mulberry32::new(1));
        assert_eq!(scene.splatter.len(), scene.brushes.len() * SPLATTER_PER_BRUSH);
        assert!(scene.whips.iter().all(|w| w.points.len() == WHIP_POINTS));
    }

    #[test]
    fn whip_tails_stop_one_step_short() {
        let scene = build_scene(&desktop_params(), &mut Mulberry32::new(3));
        assert!(!scene.whips.is_empty());
        for w in &scene.whips {
            let p = &w.points;
            // quadratic extrapolation of the samples to t = 1
            let end = p[17] - 3.0 * p[18] + 3.0 * p[19];
            let step = p[19].distance(p[18]);
            assert!(end.distance(p[19]) > step * 0.5);
        }
    }

    #[test]
    fn frame_places_focal_inside_overflowed_canvas() {
        let f = SceneFrame::for_viewport(1920.0, 1080.0, DeviceTier::Desktop);
        assert_eq!(f.overflow, 864.0);
        assert_eq!(f.canvas_height, 1080.0 + 2.0 * 864.0);
        assert_eq!(f.focal, DVec2::new(1344.0, 324.0 + 864.0));
        assert!(SceneFrame::try_for_viewport(0.0, 1080.0, DeviceTier::Desktop).is_err());
    }
}
