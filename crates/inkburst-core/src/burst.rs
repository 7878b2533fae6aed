//! Line burst: Fibonacci-spiral line configs sampled into ribbon buffers.
//!
//! The vertex layout is a flat `bytemuck::Pod` record, so a
//! `RibbonGeometry` can be handed to a GPU buffer with `cast_slice`. The
//! Canvas2D front end strokes it with [`paint_burst`].

use crate::builder::SceneFrame;
use crate::constants::{golden_angle, CYAN_RGB, INK_RGB, PHI_INV};
use crate::geometry::{ribbon_normal, CatmullRom};
use crate::render::strokes::is_degenerate;
use crate::render::{LineCap, LineJoin, Paint, Rgba, Surface};
use crate::rng::Mulberry32;
use glam::{DVec2, DVec3};
use std::f64::consts::{PI, TAU};

pub const MAX_LINES: usize = 250;
pub const POINTS_PER_LINE: usize = 64;

const BURST_INK_ALPHA: f64 = 0.18;
const BURST_CYAN_ALPHA: f64 = 0.35;

/// One radiating line before sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct LineConfig {
    pub origin: DVec3,
    pub control_points: Vec<DVec3>,
    pub thickness: f64,
    pub is_cyan: bool,
    pub animation_phase: f64,
    pub length: f64,
}

/// Generate `count` lines radiating from `focal`.
///
/// Directions step by the golden angle and are folded into a fan of
/// `spread_deg` degrees. Lengths are log-normal and capped at 2.0. Each
/// line gets `3..complexity` control points with sine-weighted jitter, so
/// the ends stay on the ray and the middle wanders.
pub fn generate_line_configs(
    focal: DVec2,
    count: usize,
    spread_deg: f64,
    complexity: u32,
    seed: i32,
) -> Vec<LineConfig> {
    let mut rng = Mulberry32::new(seed);
    let golden = golden_angle();
    let spread = spread_deg.to_radians();
    let extra = complexity.saturating_sub(2) as f64;
    let mut lines = Vec::with_capacity(count);

    for i in 0..count {
        let angle = if spread > 0.0 {
            (i as f64 * golden) % spread - spread / 2.0
        } else {
            0.0
        };

        let length_base = (rng.next_f64() * 2.5 - 0.5).exp();
        let length = (length_base * 0.3).min(2.0);
        let num_points = (rng.next_f64() * extra).floor() as usize + 3;

        let mut control_points = Vec::with_capacity(num_points);
        for j in 0..num_points {
            let t = j as f64 / (num_points - 1) as f64;
            let r = length * t;
            let noise = 0.15 * (t * PI).sin();
            let nx = rng.signed(noise);
            let ny = rng.signed(noise);
            let z = rng.signed(0.5);
            control_points.push(DVec3::new(
                focal.x + angle.cos() * r + nx,
                focal.y + angle.sin() * r + ny,
                z,
            ));
        }

        let thickness = 0.5 + rng.next_f64() * 1.5;
        let is_cyan = rng.chance(0.12);
        let animation_phase = rng.next_f64() * TAU;
        lines.push(LineConfig {
            origin: focal.extend(0.0),
            control_points,
            thickness,
            is_cyan,
            animation_phase,
            length,
        });
    }
    lines
}

/// Per-vertex record of the burst ribbon.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub phase: f32,
    pub thickness: f32,
    pub is_cyan: f32,
    pub curve_t: f32,
    pub origin: [f32; 3],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RibbonGeometry {
    pub vertices: Vec<RibbonVertex>,
    /// Line-segment pairs, `points_per_line - 1` per line.
    pub indices: Vec<u32>,
}

impl RibbonGeometry {
    pub fn line_count(&self, points_per_line: usize) -> usize {
        if points_per_line == 0 {
            0
        } else {
            self.vertices.len() / points_per_line
        }
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[inline]
fn to_f32(v: DVec3) -> [f32; 3] {
    v.as_vec3().to_array()
}

/// Sample every config along a Catmull-Rom curve. Configs with fewer than
/// two control points are skipped.
pub fn build_ribbon(configs: &[LineConfig], points_per_line: usize) -> RibbonGeometry {
    let ppl = points_per_line.max(2);
    let mut geo = RibbonGeometry {
        vertices: Vec::with_capacity(configs.len() * ppl),
        indices: Vec::with_capacity(configs.len() * (ppl - 1) * 2),
    };

    for config in configs {
        let curve = match CatmullRom::new(config.control_points.clone()) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("[burst] skipping line: {e}");
                continue;
            }
        };
        let base = geo.vertices.len() as u32;
        let (points, tangents) = curve.sample(ppl - 1);
        for (i, (p, tan)) in points.iter().zip(tangents.iter()).enumerate() {
            geo.vertices.push(RibbonVertex {
                position: to_f32(*p),
                normal: to_f32(ribbon_normal(*tan)),
                phase: config.animation_phase as f32,
                thickness: config.thickness as f32,
                is_cyan: if config.is_cyan { 1.0 } else { 0.0 },
                curve_t: (i as f64 / (ppl - 1) as f64) as f32,
                origin: to_f32(config.origin),
            });
        }
        for i in 0..(ppl as u32 - 1) {
            geo.indices.push(base + i);
            geo.indices.push(base + i + 1);
        }
    }
    geo
}

/// Configs for the current line params, with the count clamped to
/// [`MAX_LINES`], sampled at [`POINTS_PER_LINE`].
pub fn burst_geometry(
    focal: DVec2,
    count: u32,
    spread_deg: f64,
    complexity: u32,
    seed: i32,
) -> RibbonGeometry {
    let count = (count as usize).min(MAX_LINES);
    let configs = generate_line_configs(focal, count, spread_deg, complexity, seed);
    build_ribbon(&configs, POINTS_PER_LINE)
}

/// Stroke each ribbon line onto the ink canvas. Positions are in
/// viewport units (0..1 across the visible page) and land inside the
/// overflowed canvas of `frame`. Lines must be `POINTS_PER_LINE` long.
pub fn paint_burst(s: &mut dyn Surface, geo: &RibbonGeometry, frame: &SceneFrame) {
    let to_canvas = |p: [f32; 3]| {
        DVec2::new(
            p[0] as f64 * frame.width,
            p[1] as f64 * frame.viewport_height + frame.overflow,
        )
    };
    s.set_line_cap(LineCap::Round);
    s.set_line_join(LineJoin::Round);
    for line in geo.vertices.chunks(POINTS_PER_LINE) {
        let Some(head) = line.first() else {
            continue;
        };
        let pts: Vec<DVec2> = line.iter().map(|v| to_canvas(v.position)).collect();
        if is_degenerate(&pts) {
            continue;
        }
        let color = if head.is_cyan > 0.5 {
            Rgba::rgb(CYAN_RGB, BURST_CYAN_ALPHA)
        } else {
            Rgba::rgb(INK_RGB, BURST_INK_ALPHA)
        };
        s.set_stroke(&Paint::from(color));
        s.set_line_width(head.thickness as f64);
        s.begin_path();
        s.move_to(pts[0]);
        for p in &pts[1..] {
            s.line_to(*p);
        }
        s.stroke();
    }
}

/// Golden-section anchor for element `index`, jittered by ±5% of the
/// viewport on each axis.
pub fn phi_position(width: f64, height: f64, index: usize, rng: &mut Mulberry32) -> DVec2 {
    const X: [f64; 4] = [PHI_INV, 1.0 - PHI_INV, 0.5, PHI_INV * PHI_INV];
    const Y: [f64; 4] = [PHI_INV, 0.5, 1.0 - PHI_INV, PHI_INV * 0.5];
    let x = width * (X[index % X.len()] + rng.signed(0.1));
    let y = height * (Y[index % Y.len()] + rng.signed(0.1));
    DVec2::new(x, y)
}

/// Ambient burst particle: normalized scene-space position, point size and
/// drift phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParticle {
    pub position: DVec3,
    pub size: f64,
    pub phase: f64,
}

pub fn burst_particles(seed: i32, count: usize) -> Vec<BurstParticle> {
    let mut rng = Mulberry32::new(seed);
    (0..count)
        .map(|_| {
            let position = DVec3::new(rng.signed(10.0), rng.signed(8.0), rng.signed(6.0));
            let size = rng.next_f64() * 2.0 + 0.5;
            let phase = rng.next_f64() * TAU;
            BurstParticle {
                position,
                size,
                phase,
            }
        })
        .collect()
}

/// Particle position after `time` seconds of diagonal drift, wrapped back
/// into the 10 x 8 volume.
pub fn particle_position(p: &BurstParticle, time: f64) -> DVec3 {
    let drift = (time * 0.05 + p.phase).rem_euclid(10.0) - 5.0;
    let mut x = p.position.x + drift * 0.3 + (time * 0.2 + p.phase).sin() * 0.05;
    let mut y = p.position.y - drift * 0.2 + (time * 0.15 + p.phase * 1.3).cos() * 0.05;
    x = (x + 5.0).rem_euclid(10.0) - 5.0;
    y = (y + 4.0).rem_euclid(8.0) - 4.0;
    DVec3::new(x, y, p.position.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_count_respects_complexity() {
        let lines = generate_line_configs(DVec2::new(0.7, 0.3), 40, 120.0, 5, 99);
        assert_eq!(lines.len(), 40);
        for l in &lines {
            assert!((3..=5).contains(&l.control_points.len()));
            assert!(l.length <= 2.0);
            assert!((0.5..2.0).contains(&l.thickness));
        }
    }

    #[test]
    fn degenerate_spread_points_every_line_the_same_way() {
        let lines = generate_line_configs(DVec2::ZERO, 5, 0.0, 3, 1);
        for l in &lines {
            let last = l.control_points[l.control_points.len() - 1];
            assert!(last.y.abs() < 0.2);
        }
    }

    #[test]
    fn particles_stay_in_volume() {
        let ps = burst_particles(20250115 + 999, 50);
        for p in &ps {
            for t in [0.0, 3.3, 100.0] {
                let q = particle_position(p, t);
                assert!(q.x >= -5.0 && q.x < 5.0);
                assert!(q.y >= -4.0 && q.y < 4.0);
            }
        }
    }
}
