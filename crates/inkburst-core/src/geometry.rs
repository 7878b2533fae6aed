//! Curve sampling, normals, noise and scroll deformation.
//!
//! Everything here is a pure function of its inputs. The compositor calls
//! these on every scroll redraw, so none of them may touch an RNG.

use crate::constants::{DEFORM_AMP_X, DEFORM_AMP_Y, DEFORM_SCROLL_RATE};
use crate::error::SceneError;
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Cubic Bezier control quadruple.
pub type CubicControl = [DVec2; 4];

#[inline]
pub fn sample_cubic(cp: &CubicControl, t: f64) -> DVec2 {
    let u = 1.0 - t;
    cp[0] * (u * u * u) + cp[1] * (3.0 * u * u * t) + cp[2] * (3.0 * u * t * t) + cp[3] * (t * t * t)
}

/// `n + 1` evenly spaced samples of a cubic, endpoints included.
pub fn sample_path(cp: &CubicControl, n: usize) -> Vec<DVec2> {
    let n = n.max(1);
    (0..=n)
        .map(|i| sample_cubic(cp, i as f64 / n as f64))
        .collect()
}

#[inline]
pub fn quadratic_at(p0: DVec2, cp: DVec2, p1: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u) + cp * (2.0 * u * t) + p1 * (t * t)
}

/// `n + 1` evenly spaced samples of a quadratic, endpoints included.
pub fn sample_quadratic(p0: DVec2, cp: DVec2, p1: DVec2, n: usize) -> Vec<DVec2> {
    let n = n.max(1);
    (0..=n)
        .map(|i| quadratic_at(p0, cp, p1, i as f64 / n as f64))
        .collect()
}

/// Unit normals along a polyline from central differences (one-sided at the
/// ends). A zero-length tangent yields a zero normal rather than NaN.
pub fn polyline_normals(pts: &[DVec2]) -> Vec<DVec2> {
    let n = pts.len();
    if n < 2 {
        return vec![DVec2::ZERO; n];
    }
    (0..n)
        .map(|i| {
            let tan = if i == 0 {
                pts[1] - pts[0]
            } else if i == n - 1 {
                pts[n - 1] - pts[n - 2]
            } else {
                pts[i + 1] - pts[i - 1]
            };
            let len = tan.length();
            let len = if len > 0.0 { len } else { 1.0 };
            DVec2::new(-tan.y / len, tan.x / len)
        })
        .collect()
}

/// Normal direction averaged with a sine window so the stroke centre dominates.
pub fn weighted_average_normal(norms: &[DVec2]) -> DVec2 {
    let n = norms.len();
    if n < 2 {
        return DVec2::new(0.0, 1.0);
    }
    let mut acc = DVec2::ZERO;
    for (i, nrm) in norms.iter().enumerate() {
        let w = ((i as f64 / (n - 1) as f64) * PI).sin();
        acc += *nrm * w;
    }
    let len = acc.length();
    let len = if len > 0.0 { len } else { 1.0 };
    acc / len
}

/// Control points for a brush stroke of length `len` leaving `p0` along `dir`,
/// bulging sideways by `len * curvature` at one third and 60% of that at two
/// thirds.
pub fn brush_control_points(p0: DVec2, dir: f64, len: f64, curvature: f64) -> CubicControl {
    let p3 = DVec2::new(p0.x + dir.cos() * len, p0.y + dir.sin() * len);
    let d = p3 - p0;
    let perp = DVec2::new(-d.y, d.x);
    let pl = perp.length();
    let pl = if pl > 0.0 { pl } else { 1.0 };
    let nrm = perp / pl;
    [
        p0,
        p0 + d * 0.33 + nrm * (len * curvature),
        p0 + d * 0.66 + nrm * (len * curvature * 0.6),
        p3,
    ]
}

/// Multi-octave sine roughness along a stroke edge. `side` separates the two
/// edges of one stroke.
#[inline]
pub fn edge_noise(t: f64, seed: f64, side: f64) -> f64 {
    let s = seed + side * 137.5;
    (t * 41.3 + s * 3.71).sin() * 0.40
        + (t * 123.7 + s * 7.29).sin() * 0.25
        + (t * 347.1 + s * 13.13).sin() * 0.20
        + (t * 22.7 + s * 2.07).sin() * 0.15
}

/// Scroll-driven flex. The displacement is measured against the rest pose so
/// `deform(p, 0.0) == p`.
#[inline]
pub fn deform(p: DVec2, scroll_y: f64) -> DVec2 {
    let phase = p.x * 0.003 + p.y * 0.002;
    let s = scroll_y * DEFORM_SCROLL_RATE;
    DVec2::new(
        p.x + ((phase + s).sin() - phase.sin()) * DEFORM_AMP_X,
        p.y + ((phase * 1.3 + s * 0.7).cos() - (phase * 1.3).cos()) * DEFORM_AMP_Y,
    )
}

pub fn deform_all(pts: &[DVec2], scroll_y: f64) -> Vec<DVec2> {
    pts.iter().map(|p| deform(*p, scroll_y)).collect()
}

#[inline]
pub fn deform_cubic(cp: &CubicControl, scroll_y: f64) -> CubicControl {
    [
        deform(cp[0], scroll_y),
        deform(cp[1], scroll_y),
        deform(cp[2], scroll_y),
        deform(cp[3], scroll_y),
    ]
}

/// Linear width ramp: 0 at the ends, 1 between `frac` and `1 - frac`.
#[inline]
pub fn edge_taper_scale(t: f64, frac: f64) -> f64 {
    if frac <= 0.0 {
        1.0
    } else if t < frac {
        t / frac
    } else if t > 1.0 - frac {
        (1.0 - t) / frac
    } else {
        1.0
    }
}

/// Uniform Catmull-Rom spline (tension 0.5) through 3D control points, open
/// at both ends with mirrored phantom endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct CatmullRom {
    points: Vec<DVec3>,
    tension: f64,
}

struct Segment {
    c0: DVec3,
    c1: DVec3,
    c2: DVec3,
    c3: DVec3,
    weight: f64,
}

impl CatmullRom {
    pub fn new(points: Vec<DVec3>) -> Result<Self, SceneError> {
        if points.len() < 2 {
            return Err(SceneError::InvalidPointCount {
                needed: 2,
                got: points.len(),
            });
        }
        Ok(Self {
            points,
            tension: 0.5,
        })
    }

    fn segment(&self, t: f64) -> Segment {
        let pts = &self.points;
        let l = pts.len();
        let p = (l - 1) as f64 * t.clamp(0.0, 1.0);
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f64;
        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }
        let p0 = if int_point > 0 {
            pts[int_point - 1]
        } else {
            pts[0] * 2.0 - pts[1]
        };
        let p1 = pts[int_point];
        let p2 = pts[int_point + 1];
        let p3 = if int_point + 2 < l {
            pts[int_point + 2]
        } else {
            pts[l - 1] * 2.0 - pts[l - 2]
        };
        let t0 = (p2 - p0) * self.tension;
        let t1 = (p3 - p1) * self.tension;
        Segment {
            c0: p1,
            c1: t0,
            c2: p1 * -3.0 + p2 * 3.0 - t0 * 2.0 - t1,
            c3: p1 * 2.0 - p2 * 2.0 + t0 + t1,
            weight,
        }
    }

    pub fn point(&self, t: f64) -> DVec3 {
        let s = self.segment(t);
        let w = s.weight;
        s.c0 + s.c1 * w + s.c2 * (w * w) + s.c3 * (w * w * w)
    }

    /// Unit tangent; zero if the curve is degenerate at `t`.
    pub fn tangent(&self, t: f64) -> DVec3 {
        let s = self.segment(t);
        let w = s.weight;
        (s.c1 + s.c2 * (2.0 * w) + s.c3 * (3.0 * w * w)).normalize_or_zero()
    }

    /// `divisions + 1` positions and tangents.
    pub fn sample(&self, divisions: usize) -> (Vec<DVec3>, Vec<DVec3>) {
        let d = divisions.max(1);
        (0..=d)
            .map(|i| {
                let t = i as f64 / d as f64;
                (self.point(t), self.tangent(t))
            })
            .unzip()
    }
}

/// In-plane ribbon normal: the tangent rotated 90 degrees about Z.
#[inline]
pub fn ribbon_normal(tangent: DVec3) -> DVec3 {
    DVec3::new(-tangent.y, tangent.x, 0.0).normalize_or_zero()
}
