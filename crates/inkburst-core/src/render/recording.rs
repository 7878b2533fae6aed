use super::surface::{CompositeOp, LineCap, LineJoin, Paint, Surface};
use super::DrawLayer;
use glam::DVec2;

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetTransform([f64; 6]),
    Clear { width: f64, height: f64 },
    BeginPath,
    MoveTo(DVec2),
    LineTo(DVec2),
    QuadraticTo { cp: DVec2, to: DVec2 },
    Circle { center: DVec2, radius: f64 },
    ClosePath,
    SetFill(Paint),
    SetStroke(Paint),
    LineWidth(f64),
    LineCap(LineCap),
    LineJoin(LineJoin),
    Composite(CompositeOp),
    Fill,
    Stroke,
    LineDash(Vec<f64>),
    Text { text: String, at: DVec2, px: f64 },
    Layer(DrawLayer),
}

/// Surface that keeps every call. Used headless and in tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    commands: Vec<Command>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Layers in the order they were started.
    pub fn layers(&self) -> Vec<DrawLayer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Layer(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn fills(&self) -> usize {
        self.count(|c| matches!(c, Command::Fill))
    }

    pub fn strokes(&self) -> usize {
        self.count(|c| matches!(c, Command::Stroke))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Commands issued while `layer` was active.
    pub fn layer_commands(&self, layer: DrawLayer) -> &[Command] {
        let start = self
            .commands
            .iter()
            .position(|c| *c == Command::Layer(layer));
        let Some(start) = start else {
            return &[];
        };
        let rest = &self.commands[start + 1..];
        let end = rest
            .iter()
            .position(|c| matches!(c, Command::Layer(_)))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// True if any recorded coordinate is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.commands.iter().any(|c| match c {
            Command::MoveTo(p) | Command::LineTo(p) => !p.is_finite(),
            Command::QuadraticTo { cp, to } => !(cp.is_finite() && to.is_finite()),
            Command::Circle { center, radius } => !(center.is_finite() && radius.is_finite()),
            Command::LineWidth(w) => !w.is_finite(),
            Command::Text { at, px, .. } => !(at.is_finite() && px.is_finite()),
            _ => false,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.commands.push(Command::SetTransform([a, b, c, d, e, f]));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(Command::Clear { width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
    }

    fn move_to(&mut self, p: DVec2) {
        self.commands.push(Command::MoveTo(p));
    }

    fn line_to(&mut self, p: DVec2) {
        self.commands.push(Command::LineTo(p));
    }

    fn quadratic_to(&mut self, cp: DVec2, p: DVec2) {
        self.commands.push(Command::QuadraticTo { cp, to: p });
    }

    fn circle(&mut self, center: DVec2, radius: f64) {
        self.commands.push(Command::Circle { center, radius });
    }

    fn close_path(&mut self) {
        self.commands.push(Command::ClosePath);
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.commands.push(Command::SetFill(paint.clone()));
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.commands.push(Command::SetStroke(paint.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(Command::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(Command::LineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(Command::LineJoin(join));
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.commands.push(Command::Composite(op));
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.commands.push(Command::LineDash(segments.to_vec()));
    }

    fn fill_text(&mut self, text: &str, at: DVec2, px: f64) {
        self.commands.push(Command::Text {
            text: text.to_owned(),
            at,
            px,
        });
    }

    fn begin_layer(&mut self, layer: DrawLayer) {
        self.commands.push(Command::Layer(layer));
    }
}
