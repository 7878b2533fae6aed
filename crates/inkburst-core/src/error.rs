use thiserror::Error;

/// Errors surfaced by the few fallible constructors in the core.
///
/// Drawing and sampling never fail; degenerate geometry is skipped instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("viewport has no area ({width}x{height})")]
    EmptyViewport { width: f64, height: f64 },
    #[error("curve needs at least {needed} control points, got {got}")]
    InvalidPointCount { needed: usize, got: usize },
}
