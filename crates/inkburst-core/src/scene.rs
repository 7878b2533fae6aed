//! Scene description: one ordered collection per primitive category.
//!
//! The description is built once per (viewport, tier, seed) and then only
//! read. Renderers deform copies of these points; they never write back.

use crate::geometry::CubicControl;
use crate::taper::Taper;
use glam::DVec2;
use smallvec::SmallVec;

/// RGB colour tag carried by calligraphic strokes.
pub type Rgb = [u8; 3];

/// Which pass of the builder produced a brush stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrushRole {
    Hero,
    Accent,
    Peripheral,
    Diagonal,
    Tangle,
}

/// Chrome brush stroke (hero, accent, peripheral, diagonal, brush tangle).
#[derive(Clone, Debug, PartialEq)]
pub struct BrushStroke {
    pub role: BrushRole,
    pub cp: CubicControl,
    pub taper: Taper,
    pub opacity: f64,
    /// `rng() * 100`, fed straight into the sine noise of the shader.
    pub micro_seed: f64,
}

/// Cyan energy beam, straight or bent by an optional control point.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    pub p0: DVec2,
    pub cp: Option<DVec2>,
    pub p1: DVec2,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hairline {
    pub p0: DVec2,
    pub p1: DVec2,
    pub opacity: f64,
    pub gray: bool,
}

/// Random-walk polyline confined near the focal point.
#[derive(Clone, Debug, PartialEq)]
pub struct Tangle {
    pub points: Vec<DVec2>,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    pub p0: DVec2,
    pub cp: DVec2,
    pub p1: DVec2,
    pub width: f64,
    pub opacity: f64,
}

/// Short stroked mark; used for both accent marks and scratches.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub p0: DVec2,
    pub cp: Option<DVec2>,
    pub p1: DVec2,
    pub width: f64,
    pub opacity: f64,
    pub has_dot: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
    pub center: DVec2,
    pub radius: f64,
    pub opacity: f64,
}

/// Medium-weight quadratic curve, pre-sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct Whip {
    pub points: Vec<DVec2>,
    pub max_width: f64,
    pub opacity: f64,
}

/// Long line crossing close to the focal point.
#[derive(Clone, Debug, PartialEq)]
pub struct Through {
    pub p0: DVec2,
    pub cp: Option<DVec2>,
    pub p1: DVec2,
    pub width: f64,
    pub opacity: f64,
}

/// Bold calligraphic stroke with dark-chrome shading (black ink or cyan).
#[derive(Clone, Debug, PartialEq)]
pub struct InkStroke {
    pub cp: CubicControl,
    pub taper: Taper,
    pub micro_seed: f64,
    pub rgb: Rgb,
}

impl InkStroke {
    pub fn is_cyan(&self) -> bool {
        self.rgb[2] > 200
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p0: DVec2,
    pub p1: DVec2,
}

/// 5 to 10 evenly spaced parallel lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    pub lines: SmallVec<[Segment; 10]>,
    pub width: f64,
    pub opacity: f64,
}

/// Everything one scene build produces, grouped by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    pub focal: DVec2,
    pub width: f64,
    pub height: f64,
    pub brushes: Vec<BrushStroke>,
    pub brush_tangles: Vec<BrushStroke>,
    pub beams: Vec<Beam>,
    pub hairlines: Vec<Hairline>,
    pub tangles: Vec<Tangle>,
    pub whips: Vec<Whip>,
    pub scratches: Vec<Mark>,
    pub throughs: Vec<Through>,
    pub arcs: Vec<Arc>,
    pub accents: Vec<Mark>,
    pub splatter: Vec<Dot>,
    pub inks: Vec<InkStroke>,
    pub thick_cyans: Vec<InkStroke>,
    pub bundles: Vec<Bundle>,
}

impl SceneDescription {
    /// Total number of records across every category.
    pub fn primitive_count(&self) -> usize {
        self.brushes.len()
            + self.brush_tangles.len()
            + self.beams.len()
            + self.hairlines.len()
            + self.tangles.len()
            + self.whips.len()
            + self.scratches.len()
            + self.throughs.len()
            + self.arcs.len()
            + self.accents.len()
            + self.splatter.len()
            + self.inks.len()
            + self.thick_cyans.len()
            + self.bundles.len()
    }

    pub fn brushes_with(&self, role: BrushRole) -> usize {
        self.brushes.iter().filter(|b| b.role == role).count()
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
