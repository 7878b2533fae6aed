//! Layered compositor over an abstract 2D surface.

mod compositor;
mod recording;
pub mod strokes;
mod surface;

pub use compositor::{Compositor, Sampling};
pub use recording::{Command, RecordingSurface};
pub use surface::{
    ColorStop, CompositeOp, LineCap, LineJoin, LinearGradient, Paint, Rgba, Surface,
};

/// One pass of the compositor. Later layers paint over earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    Arcs,
    Throughs,
    /// Hairlines followed by parallel bundles.
    Hairlines,
    Scratches,
    Tangles,
    Whips,
    Inks,
    BrushTangles,
    Brushes,
    Splatter,
    Accents,
    BeamAura,
    ThickCyans,
    BeamCore,
}

impl DrawLayer {
    pub const MAIN_ORDER: [DrawLayer; 14] = [
        DrawLayer::Arcs,
        DrawLayer::Throughs,
        DrawLayer::Hairlines,
        DrawLayer::Scratches,
        DrawLayer::Tangles,
        DrawLayer::Whips,
        DrawLayer::Inks,
        DrawLayer::BrushTangles,
        DrawLayer::Brushes,
        DrawLayer::Splatter,
        DrawLayer::Accents,
        DrawLayer::BeamAura,
        DrawLayer::ThickCyans,
        DrawLayer::BeamCore,
    ];

    /// The glow surface is blurred by the page, so only the cyan layers go
    /// on it.
    pub const GLOW_ORDER: [DrawLayer; 2] = [DrawLayer::BeamCore, DrawLayer::ThickCyans];
}
