//! Shading routines for single primitives.
//!
//! Every routine takes already-deformed geometry and draws it onto a
//! [`Surface`]. Degenerate input (fewer than two points, zero length,
//! non-finite coordinates) draws nothing.

use super::surface::{CompositeOp, LineCap, LinearGradient, Paint, Rgba, Surface};
use crate::geometry::{edge_noise, edge_taper_scale, polyline_normals, weighted_average_normal};
use crate::taper::Taper;
use glam::DVec2;

/// Samples per side of a straight tapering line.
const TAPER_SAMPLES: usize = 10;
const MIN_PATH_LENGTH: f64 = 1e-6;
/// End caps narrower than this are not worth a circle.
const CAP_MIN_RADIUS: f64 = 1.5;

const BLACK: [u8; 3] = [0, 0, 0];

pub fn path_length(pts: &[DVec2]) -> f64 {
    pts.windows(2).map(|w| w[0].distance(w[1])).sum()
}

pub fn is_degenerate(pts: &[DVec2]) -> bool {
    if pts.len() < 2 || !pts.iter().all(|p| p.is_finite()) {
        return true;
    }
    let len = path_length(pts);
    !len.is_finite() || len < MIN_PATH_LENGTH
}

#[inline]
fn fract(x: f64) -> f64 {
    x.rem_euclid(1.0)
}

/// Fill the closed ribbon `pts + n*left` forward, `pts - n*right` back.
fn trace_ribbon(
    s: &mut dyn Surface,
    pts: &[DVec2],
    norms: &[DVec2],
    left: impl Fn(usize) -> f64,
    right: impl Fn(usize) -> f64,
) {
    s.begin_path();
    for (i, (p, n)) in pts.iter().zip(norms).enumerate() {
        let q = *p + *n * left(i);
        if i == 0 {
            s.move_to(q);
        } else {
            s.line_to(q);
        }
    }
    for i in (0..pts.len()).rev() {
        s.line_to(pts[i] - norms[i] * right(i));
    }
    s.close_path();
    s.fill();
}

/// Straight line as a polygon that narrows to a point and fades out at both
/// ends. Lines shorter than 1 px are skipped.
pub fn tapering_line(
    s: &mut dyn Surface,
    p0: DVec2,
    p1: DVec2,
    width: f64,
    opacity: f64,
    rgb: [u8; 3],
    taper_frac: f64,
) {
    let d = p1 - p0;
    let len = d.length();
    if !len.is_finite() || len < 1.0 {
        return;
    }
    let n = DVec2::new(-d.y / len, d.x / len);
    let color = Rgba::rgb(rgb, opacity);
    s.set_fill(&LinearGradient::faded(p0, p1, color, taper_frac).into());
    let half = |i: usize| {
        let t = i as f64 / TAPER_SAMPLES as f64;
        (t, width * edge_taper_scale(t, taper_frac) * 0.5)
    };
    s.begin_path();
    for i in 0..=TAPER_SAMPLES {
        let (t, hw) = half(i);
        let q = p0 + d * t + n * hw;
        if i == 0 {
            s.move_to(q);
        } else {
            s.line_to(q);
        }
    }
    for i in (0..=TAPER_SAMPLES).rev() {
        let (t, hw) = half(i);
        s.line_to(p0 + d * t - n * hw);
    }
    s.close_path();
    s.fill();
}

/// Sampled curve with the same taper and fade as [`tapering_line`]; the
/// fade runs along the chord.
pub fn tapering_curve(
    s: &mut dyn Surface,
    pts: &[DVec2],
    width: f64,
    opacity: f64,
    rgb: [u8; 3],
    taper_frac: f64,
) {
    if is_degenerate(pts) {
        return;
    }
    let n = pts.len();
    let norms = polyline_normals(pts);
    let color = Rgba::rgb(rgb, opacity);
    s.set_fill(&LinearGradient::faded(pts[0], pts[n - 1], color, taper_frac).into());
    let hw = |i: usize| width * edge_taper_scale(i as f64 / (n - 1) as f64, taper_frac) * 0.5;
    trace_ribbon(s, pts, &norms, hw, hw);
}

/// Precomputed body of a shaded stroke: normals, widths and the gradient
/// axis across the widest point.
struct StrokeBody<'a> {
    pts: &'a [DVec2],
    norms: Vec<DVec2>,
    widths: Vec<f64>,
    seed: f64,
    avg_normal: DVec2,
    max_width: f64,
    center: DVec2,
}

impl<'a> StrokeBody<'a> {
    fn new(pts: &'a [DVec2], taper: &Taper, seed: f64) -> Option<Self> {
        if is_degenerate(pts) {
            return None;
        }
        let n = pts.len();
        let norms = polyline_normals(pts);
        let widths: Vec<f64> = (0..n)
            .map(|i| taper.width(i as f64 / (n - 1) as f64))
            .collect();
        let mut max_width = 0.0;
        let mut max_idx = 0;
        for (i, w) in widths.iter().enumerate() {
            if *w > max_width {
                max_width = *w;
                max_idx = i;
            }
        }
        let avg_normal = weighted_average_normal(&norms);
        Some(Self {
            pts,
            norms,
            widths,
            seed,
            avg_normal,
            max_width,
            center: pts[max_idx],
        })
    }

    fn axis(&self) -> (DVec2, DVec2) {
        let ext = self.max_width * 0.55;
        (
            self.center - self.avg_normal * ext,
            self.center + self.avg_normal * ext,
        )
    }

    fn gradient(&self) -> LinearGradient {
        let (a, b) = self.axis();
        LinearGradient::new(a, b)
    }

    /// Upper side of the stroke faces the sky when the averaged normal
    /// points up.
    fn start_faces_sky(&self) -> bool {
        self.avg_normal.y < 0.0
    }

    /// Fill the body at `frac` of its width, edges displaced by `roughness`
    /// times the edge noise, plus round caps where wide enough.
    fn fill(&self, s: &mut dyn Surface, frac: f64, paint: &Paint, roughness: f64) {
        s.set_fill(paint);
        let n = self.pts.len();
        let nf = n as f64;
        let edge = |i: usize, side: f64| {
            let hw = self.widths[i] * frac / 2.0;
            if roughness == 0.0 {
                hw
            } else {
                let t = i as f64 / (n - 1) as f64;
                hw + hw * roughness * edge_noise(t * nf, self.seed, side)
            }
        };
        trace_ribbon(
            s,
            self.pts,
            &self.norms,
            |i| edge(i, 0.0),
            |i| edge(i, 1.0),
        );
        let r0 = self.widths[0] * frac / 2.0;
        let r1 = self.widths[n - 1] * frac / 2.0;
        if r0 > CAP_MIN_RADIUS {
            s.begin_path();
            s.circle(self.pts[0], r0);
            s.fill();
        }
        if r1 > CAP_MIN_RADIUS {
            s.begin_path();
            s.circle(self.pts[n - 1], r1);
            s.fill();
        }
    }

    fn env_reflection(&self, sky: Rgba, ground: Rgba) -> Paint {
        let (a, c) = if self.start_faces_sky() {
            (sky, ground)
        } else {
            (ground, sky)
        };
        self.gradient()
            .stop(0.0, a)
            .stop(0.5, Rgba::TRANSPARENT)
            .stop(1.0, c)
            .into()
    }
}

/// Specular colour for a stroke: cool, warm or neutral by micro-seed.
fn chrome_specular(seed: f64) -> Rgba {
    let temp = fract(seed * 5.1);
    if temp < 0.33 {
        Rgba::hex(0xd8e4f8)
    } else if temp < 0.66 {
        Rgba::hex(0xf0e8d8)
    } else {
        Rgba::hex(0xe0e8f4)
    }
}

fn chrome_midtone(spec: Rgba) -> Rgba {
    Rgba::new(
        (spec.r as f64 * 0.6).round() as u8,
        (spec.g as f64 * 0.66).round() as u8,
        (spec.b as f64 * 0.78).round() as u8,
        1.0,
    )
}

/// Polished chrome brush stroke: a perpendicular cylinder gradient with a
/// seed-shifted specular peak, soft halo, environment reflection, centre
/// highlight, additive bloom and a rough edge outline.
pub fn chrome_stroke(s: &mut dyn Surface, pts: &[DVec2], taper: &Taper, seed: f64) {
    let Some(body) = StrokeBody::new(pts, taper, seed) else {
        return;
    };
    let shift = fract(seed * 7.3) * 0.03 - 0.015;
    let peak = 0.44 + fract(seed * 3.7) * 0.08 - 0.04;
    let spec = chrome_specular(seed);
    let mid = chrome_midtone(spec);

    let grad: Paint = body
        .gradient()
        .stop(0.00, Rgba::hex(0x0d1018))
        .stop(0.06 + shift, Rgba::hex(0x07080e))
        .stop(0.16 + shift, Rgba::hex(0x141824))
        .stop(0.27, Rgba::hex(0x2e3448))
        .stop(0.35, Rgba::hex(0x586880))
        .stop((peak - 0.04).max(0.36), mid)
        .stop(peak, spec)
        .stop((peak + 0.06).min(0.59), mid)
        .stop(0.60, Rgba::hex(0x586880))
        .stop(0.70, Rgba::hex(0x2e3448))
        .stop(0.82 - shift, Rgba::hex(0x141824))
        .stop(0.86, Rgba::hex(0x1e2438))
        .stop(0.92 - shift, Rgba::hex(0x07080e))
        .stop(1.00, Rgba::hex(0x0d1018))
        .into();

    body.fill(s, 1.25, &Rgba::new(0, 0, 0, 0.025).into(), 0.0);
    body.fill(s, 1.0, &grad, 0.0);
    let env = body.env_reflection(Rgba::new(170, 190, 220, 0.07), Rgba::new(0, 0, 0, 0.05));
    body.fill(s, 0.92, &env, 0.0);
    body.fill(s, 0.05, &Rgba::new(210, 220, 240, 0.22).into(), 0.0);

    s.set_composite(CompositeOp::Lighter);
    body.fill(s, 0.12, &Rgba::new(180, 195, 220, 0.06).into(), 0.0);
    body.fill(s, 0.04, &Rgba::new(220, 230, 245, 0.10).into(), 0.0);
    s.set_composite(CompositeOp::SourceOver);

    // rough outlines break up the smooth polygon edge
    s.set_stroke(&Rgba::new(5, 8, 20, 0.10).into());
    s.set_line_width(body.max_width * 0.012 + 0.3);
    s.set_line_cap(LineCap::Round);
    let n = pts.len();
    let nf = n as f64;
    for side in [1.0, -1.0] {
        s.begin_path();
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            let hw = body.widths[i] / 2.0;
            let disp = hw * 0.05 * edge_noise(t * nf, seed, side);
            let q = pts[i] + body.norms[i] * (hw * side + disp);
            if i == 0 {
                s.move_to(q);
            } else {
                s.line_to(q);
            }
        }
        s.stroke();
    }
}

/// Near-black (or deep cyan) chrome for the calligraphic ink strokes. The
/// edge noise is baked into the polygon instead of drawn as an outline.
pub fn dark_chrome_stroke(s: &mut dyn Surface, pts: &[DVec2], taper: &Taper, seed: f64, cyan: bool) {
    let Some(body) = StrokeBody::new(pts, taper, seed) else {
        return;
    };
    let shift = fract(seed * 7.3) * 0.03 - 0.015;
    let peak = 0.44 + fract(seed * 3.7) * 0.08 - 0.04;

    let grad: Paint = if cyan {
        body.gradient()
            .stop(0.00, Rgba::hex(0x020810))
            .stop(0.08 + shift, Rgba::hex(0x011018))
            .stop(0.20, Rgba::hex(0x03192e))
            .stop(0.32, Rgba::hex(0x0a3858))
            .stop((peak - 0.04).max(0.36), Rgba::hex(0x1a6890))
            .stop(peak, Rgba::hex(0x2a99cc))
            .stop((peak + 0.06).min(0.58), Rgba::hex(0x1a6890))
            .stop(0.65, Rgba::hex(0x0a3858))
            .stop(0.78, Rgba::hex(0x03192e))
            .stop(0.88, Rgba::hex(0x041828))
            .stop(0.94 - shift, Rgba::hex(0x011018))
            .stop(1.00, Rgba::hex(0x020810))
            .into()
    } else {
        body.gradient()
            .stop(0.00, Rgba::hex(0x060810))
            .stop(0.07 + shift, Rgba::hex(0x030406))
            .stop(0.16, Rgba::hex(0x080c14))
            .stop(0.26, Rgba::hex(0x121820))
            .stop(0.34, Rgba::hex(0x1e2838))
            .stop((peak - 0.04).max(0.37), Rgba::hex(0x2e3c54))
            .stop(peak, Rgba::hex(0x4a6480))
            .stop((peak + 0.06).min(0.57), Rgba::hex(0x2e3c54))
            .stop(0.64, Rgba::hex(0x1e2838))
            .stop(0.73, Rgba::hex(0x121820))
            .stop(0.82, Rgba::hex(0x080c14))
            .stop(0.87, Rgba::hex(0x101828))
            .stop(0.93 - shift, Rgba::hex(0x030406))
            .stop(1.00, Rgba::hex(0x060810))
            .into()
    };

    let halo = if cyan {
        Rgba::new(0, 80, 160, 0.04)
    } else {
        Rgba::new(0, 0, 0, 0.06)
    };
    body.fill(s, 1.18, &halo.into(), 0.03);
    body.fill(s, 1.0, &grad, 0.025);

    let sky = if cyan {
        Rgba::new(100, 180, 240, 0.06)
    } else {
        Rgba::new(80, 100, 130, 0.05)
    };
    let env = body.env_reflection(sky, Rgba::new(0, 0, 0, 0.03));
    body.fill(s, 0.90, &env, 0.015);

    let highlight = if cyan {
        Rgba::new(120, 200, 255, 0.18)
    } else {
        Rgba::new(150, 165, 195, 0.16)
    };
    body.fill(s, 0.06, &highlight.into(), 0.0);

    s.set_composite(CompositeOp::Lighter);
    if cyan {
        body.fill(s, 0.14, &Rgba::new(0, 120, 200, 0.05).into(), 0.0);
        body.fill(s, 0.04, &Rgba::new(80, 180, 240, 0.08).into(), 0.0);
    } else {
        body.fill(s, 0.14, &Rgba::new(70, 85, 110, 0.05).into(), 0.0);
        body.fill(s, 0.04, &Rgba::new(110, 125, 155, 0.08).into(), 0.0);
    }
    s.set_composite(CompositeOp::SourceOver);
}

/// Flat black polygon thickening sinusoidally toward the middle.
pub fn whip_stroke(s: &mut dyn Surface, pts: &[DVec2], max_width: f64, opacity: f64) {
    if is_degenerate(pts) {
        return;
    }
    let n = pts.len();
    let norms = polyline_normals(pts);
    s.set_fill(&Rgba::rgb(BLACK, opacity).into());
    let hw = |i: usize| max_width * (i as f64 / (n - 1) as f64 * std::f64::consts::PI).sin() * 0.5;
    trace_ribbon(s, pts, &norms, hw, hw);
}

/// Stroke a polyline through quadratic midpoints. Uses the current stroke
/// paint and width.
pub fn smooth_path(s: &mut dyn Surface, pts: &[DVec2]) {
    if is_degenerate(pts) {
        return;
    }
    let n = pts.len();
    s.begin_path();
    s.move_to(pts[0]);
    if n == 2 {
        s.line_to(pts[1]);
    } else {
        for i in 1..n - 1 {
            let mid = (pts[i] + pts[i + 1]) / 2.0;
            s.quadratic_to(pts[i], mid);
        }
        s.line_to(pts[n - 1]);
    }
    s.stroke();
}

/// Stroke a straight or quadratic segment with the current paint.
fn trace_segment(s: &mut dyn Surface, p0: DVec2, cp: Option<DVec2>, p1: DVec2) {
    s.begin_path();
    s.move_to(p0);
    match cp {
        Some(c) => s.quadratic_to(c, p1),
        None => s.line_to(p1),
    }
    s.stroke();
}

fn segment_degenerate(p0: DVec2, cp: Option<DVec2>, p1: DVec2) -> bool {
    match cp {
        Some(c) => is_degenerate(&[p0, c, p1]),
        None => is_degenerate(&[p0, p1]),
    }
}

/// Short black mark with an optional dot of `dot_scale * width` at its
/// start.
#[allow(clippy::too_many_arguments)]
pub fn mark(
    s: &mut dyn Surface,
    p0: DVec2,
    cp: Option<DVec2>,
    p1: DVec2,
    width: f64,
    opacity: f64,
    dot_scale: Option<f64>,
) {
    if segment_degenerate(p0, cp, p1) {
        return;
    }
    let color = Rgba::rgb(BLACK, opacity);
    s.set_stroke(&color.into());
    s.set_line_width(width);
    trace_segment(s, p0, cp, p1);
    if let Some(k) = dot_scale {
        s.set_fill(&color.into());
        s.begin_path();
        s.circle(p0, width * k);
        s.fill();
    }
}

/// Cyan beam stroke whose ends fade out over 15% of its length.
pub fn beam(
    s: &mut dyn Surface,
    p0: DVec2,
    cp: Option<DVec2>,
    p1: DVec2,
    width: f64,
    opacity: f64,
    rgb: [u8; 3],
) {
    if segment_degenerate(p0, cp, p1) {
        return;
    }
    let grad = LinearGradient::faded(p0, p1, Rgba::rgb(rgb, opacity), 0.15);
    s.set_stroke(&grad.into());
    s.set_line_width(width);
    trace_segment(s, p0, cp, p1);
}

pub fn dot(s: &mut dyn Surface, center: DVec2, radius: f64, opacity: f64) {
    if !(center.is_finite() && radius.is_finite()) || radius <= 0.0 {
        return;
    }
    s.set_fill(&Rgba::rgb(BLACK, opacity).into());
    s.begin_path();
    s.circle(center, radius);
    s.fill();
}
