use super::strokes;
use super::surface::{LineCap, LineJoin, Rgba, Surface};
use super::DrawLayer;
use crate::constants::{ARC_RGB, CYAN_RGB, GRAY_RGB, INK_RGB};
use crate::geometry::{deform, deform_all, deform_cubic, sample_path, sample_quadratic};
use crate::scene::{Beam, SceneDescription};
use glam::DVec2;

/// Segment counts used when sampling curves for shading.
///
/// Fields:
/// - `brush`: hero, accent, peripheral and diagonal chrome strokes
/// - `brush_tangle`: short chrome strokes in the tangle
/// - `ink`, `thick_cyan`: calligraphic strokes
/// - `curve`: background arcs and curved through lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampling {
    pub brush: usize,
    pub brush_tangle: usize,
    pub ink: usize,
    pub thick_cyan: usize,
    pub curve: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            brush: 60,
            brush_tangle: 30,
            ink: 50,
            thick_cyan: 40,
            curve: 16,
        }
    }
}

/// Draws a scene onto the main and glow surfaces in a fixed layer order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compositor {
    pub pixel_ratio: f64,
    pub sampling: Sampling,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Compositor {
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            sampling: Sampling::default(),
        }
    }

    /// Redraw both surfaces for `scroll_y`. Either surface may be missing;
    /// the other is still drawn.
    pub fn render(
        &self,
        scene: &SceneDescription,
        scroll_y: f64,
        width: f64,
        height: f64,
        main: Option<&mut dyn Surface>,
        glow: Option<&mut dyn Surface>,
    ) {
        if let Some(m) = main {
            self.render_main(scene, scroll_y, width, height, m);
        }
        if let Some(g) = glow {
            self.render_glow(scene, scroll_y, width, height, g);
        }
    }

    fn prepare(&self, s: &mut dyn Surface, width: f64, height: f64) {
        let r = self.pixel_ratio;
        s.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);
        s.clear(width, height);
    }

    pub fn render_main(
        &self,
        scene: &SceneDescription,
        scroll_y: f64,
        width: f64,
        height: f64,
        s: &mut dyn Surface,
    ) {
        self.prepare(s, width, height);
        for layer in DrawLayer::MAIN_ORDER {
            s.begin_layer(layer);
            self.draw_layer(layer, scene, scroll_y, s);
        }
    }

    pub fn render_glow(
        &self,
        scene: &SceneDescription,
        scroll_y: f64,
        width: f64,
        height: f64,
        s: &mut dyn Surface,
    ) {
        self.prepare(s, width, height);
        for layer in DrawLayer::GLOW_ORDER {
            s.begin_layer(layer);
            self.draw_layer(layer, scene, scroll_y, s);
        }
    }

    /// Draw one layer. Stored geometry is deformed into temporaries.
    pub fn draw_layer(
        &self,
        layer: DrawLayer,
        scene: &SceneDescription,
        scroll_y: f64,
        s: &mut dyn Surface,
    ) {
        let d = |p: DVec2| deform(p, scroll_y);
        let sm = &self.sampling;
        match layer {
            DrawLayer::Arcs => {
                for a in &scene.arcs {
                    let pts = sample_quadratic(d(a.p0), d(a.cp), d(a.p1), sm.curve);
                    strokes::tapering_curve(s, &pts, a.width, a.opacity, ARC_RGB, 0.15);
                }
            }
            DrawLayer::Throughs => {
                for t in &scene.throughs {
                    let (p0, p1) = (d(t.p0), d(t.p1));
                    match t.cp {
                        Some(cp) => {
                            let pts = sample_quadratic(p0, d(cp), p1, sm.curve);
                            strokes::tapering_curve(s, &pts, t.width, t.opacity, INK_RGB, 0.12);
                        }
                        None => strokes::tapering_line(s, p0, p1, t.width, t.opacity, INK_RGB, 0.12),
                    }
                }
            }
            DrawLayer::Hairlines => {
                for l in &scene.hairlines {
                    let rgb = if l.gray { GRAY_RGB } else { INK_RGB };
                    strokes::tapering_line(s, d(l.p0), d(l.p1), 0.5, l.opacity, rgb, 0.15);
                }
                for b in &scene.bundles {
                    for ln in &b.lines {
                        strokes::tapering_line(s, d(ln.p0), d(ln.p1), b.width, b.opacity, INK_RGB, 0.18);
                    }
                }
            }
            DrawLayer::Scratches => {
                s.set_line_cap(LineCap::Round);
                for m in &scene.scratches {
                    let dot = m.has_dot.then_some(0.7);
                    strokes::mark(s, d(m.p0), m.cp.map(d), d(m.p1), m.width, m.opacity, dot);
                }
            }
            DrawLayer::Tangles => {
                s.set_line_cap(LineCap::Round);
                s.set_line_join(LineJoin::Round);
                for t in &scene.tangles {
                    s.set_stroke(&Rgba::rgb(INK_RGB, t.opacity).into());
                    s.set_line_width(t.width);
                    strokes::smooth_path(s, &deform_all(&t.points, scroll_y));
                }
            }
            DrawLayer::Whips => {
                for w in &scene.whips {
                    let pts = deform_all(&w.points, scroll_y);
                    strokes::whip_stroke(s, &pts, w.max_width, w.opacity);
                }
            }
            DrawLayer::Inks => {
                for ink in &scene.inks {
                    let pts = sample_path(&deform_cubic(&ink.cp, scroll_y), sm.ink);
                    strokes::dark_chrome_stroke(s, &pts, &ink.taper, ink.micro_seed, ink.is_cyan());
                }
            }
            DrawLayer::BrushTangles => {
                for b in &scene.brush_tangles {
                    let pts = sample_path(&deform_cubic(&b.cp, scroll_y), sm.brush_tangle);
                    strokes::chrome_stroke(s, &pts, &b.taper, b.micro_seed);
                }
            }
            DrawLayer::Brushes => {
                for b in &scene.brushes {
                    let pts = sample_path(&deform_cubic(&b.cp, scroll_y), sm.brush);
                    strokes::chrome_stroke(s, &pts, &b.taper, b.micro_seed);
                }
            }
            DrawLayer::Splatter => {
                for dot in &scene.splatter {
                    strokes::dot(s, d(dot.center), dot.radius, dot.opacity);
                }
            }
            DrawLayer::Accents => {
                s.set_line_cap(LineCap::Round);
                for m in &scene.accents {
                    let dot = m.has_dot.then_some(0.8);
                    strokes::mark(s, d(m.p0), m.cp.map(d), d(m.p1), m.width, m.opacity, dot);
                }
            }
            DrawLayer::BeamAura => {
                s.set_line_cap(LineCap::Round);
                for b in &scene.beams {
                    draw_beam(s, b, scroll_y, 4.0, 0.2);
                }
            }
            DrawLayer::ThickCyans => {
                for tc in &scene.thick_cyans {
                    let pts = sample_path(&deform_cubic(&tc.cp, scroll_y), sm.thick_cyan);
                    strokes::dark_chrome_stroke(s, &pts, &tc.taper, tc.micro_seed, tc.is_cyan());
                }
            }
            DrawLayer::BeamCore => {
                s.set_line_cap(LineCap::Round);
                for b in &scene.beams {
                    draw_beam(s, b, scroll_y, 1.0, 1.0);
                }
            }
        }
    }
}

fn draw_beam(s: &mut dyn Surface, b: &Beam, scroll_y: f64, width_mul: f64, opacity_mul: f64) {
    strokes::beam(
        s,
        deform(b.p0, scroll_y),
        b.cp.map(|c| deform(c, scroll_y)),
        deform(b.p1, scroll_y),
        b.width * width_mul,
        b.opacity * opacity_mul,
        CYAN_RGB,
    );
}
