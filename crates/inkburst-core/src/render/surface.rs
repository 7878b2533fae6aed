//! The drawing surface: the subset of Canvas2D the compositor needs.
//!
//! Paint and colour values are plain data so they can be recorded and
//! compared in tests; the web front end turns them into canvas styles.

use super::DrawLayer;
use glam::DVec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
    }

    pub const fn rgb(rgb: [u8; 3], a: f64) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba(...)` string.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient between two points in surface space.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: DVec2,
    pub to: DVec2,
    pub stops: SmallVec<[ColorStop; 14]>,
}

impl LinearGradient {
    pub fn new(from: DVec2, to: DVec2) -> Self {
        Self {
            from,
            to,
            stops: SmallVec::new(),
        }
    }

    /// Add a stop; offsets are clamped into [0, 1] the way canvas would
    /// reject them otherwise.
    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.stops.push(ColorStop { offset, color });
        self
    }

    /// Transparent at both ends, `color` at full strength between `frac`
    /// and `1 - frac`.
    pub fn faded(from: DVec2, to: DVec2, color: Rgba, frac: f64) -> Self {
        Self::new(from, to)
            .stop(0.0, color.with_alpha(0.0))
            .stop(frac.min(0.49), color)
            .stop((1.0 - frac).max(0.51), color)
            .stop(1.0, color.with_alpha(0.0))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::Linear(g)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CompositeOp {
    #[default]
    SourceOver,
    Lighter,
}

impl CompositeOp {
    pub fn css(self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::Lighter => "lighter",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
}

impl LineCap {
    pub fn css(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        }
    }
}

impl LineJoin {
    pub fn css(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
        }
    }
}

/// Immediate-mode 2D drawing target.
pub trait Surface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);
    fn clear(&mut self, width: f64, height: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: DVec2);
    fn line_to(&mut self, p: DVec2);
    fn quadratic_to(&mut self, cp: DVec2, p: DVec2);
    /// Full circle as a closed sub-path.
    fn circle(&mut self, center: DVec2, radius: f64);
    fn close_path(&mut self);

    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_composite(&mut self, op: CompositeOp);

    fn fill(&mut self);
    fn stroke(&mut self);

    /// Empty slice for solid lines.
    fn set_line_dash(&mut self, segments: &[f64]);
    /// Monospace text at `px` size, alphabetic baseline at `at`.
    fn fill_text(&mut self, text: &str, at: DVec2, px: f64);

    fn rect(&mut self, origin: DVec2, size: DVec2) {
        self.move_to(origin);
        self.line_to(origin + DVec2::new(size.x, 0.0));
        self.line_to(origin + size);
        self.line_to(origin + DVec2::new(0.0, size.y));
        self.close_path();
    }

    /// Called before each compositor layer. Surfaces that do not care
    /// ignore it.
    fn begin_layer(&mut self, _layer: DrawLayer) {}
}
