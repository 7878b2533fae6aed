use inkburst_core::render::{CompositeOp, LineCap, LineJoin, Paint, Surface};
use glam::DVec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// [`Surface`] over a Canvas2D context. Canvas calls that can throw only do
/// so for invalid arguments, which the core never emits; failures are
/// logged at debug and the call skipped.
pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// `None` if the canvas has no 2D context (or already has another kind).
    pub fn for_canvas(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas.get_context("2d").ok().flatten()?;
        ctx.dyn_into::<web::CanvasRenderingContext2d>()
            .ok()
            .map(Self::new)
    }

    fn gradient(&self, paint: &Paint) -> Option<web::CanvasGradient> {
        let Paint::Linear(g) = paint else {
            return None;
        };
        let grad = self
            .ctx
            .create_linear_gradient(g.from.x, g.from.y, g.to.x, g.to.y);
        for stop in &g.stops {
            if let Err(e) = grad.add_color_stop(stop.offset as f32, &stop.color.css()) {
                log::debug!("[canvas] color stop rejected: {:?}", e);
            }
        }
        Some(grad)
    }
}

fn check(what: &str, r: Result<(), JsValue>) {
    if let Err(e) = r {
        log::debug!("[canvas] {} failed: {:?}", what, e);
    }
}

impl Surface for CanvasSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        check("setTransform", self.ctx.set_transform(a, b, c, d, e, f));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: DVec2) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: DVec2) {
        self.ctx.line_to(p.x, p.y);
    }

    fn quadratic_to(&mut self, cp: DVec2, p: DVec2) {
        self.ctx.quadratic_curve_to(cp.x, cp.y, p.x, p.y);
    }

    fn circle(&mut self, center: DVec2, radius: f64) {
        self.ctx.move_to(center.x + radius, center.y);
        check("arc", self.ctx.arc(center.x, center.y, radius, 0.0, TAU));
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.css()),
            Paint::Linear(_) => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_stroke_style_str(&c.css()),
            Paint::Linear(_) => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.css());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.css());
    }

    fn set_composite(&mut self, op: CompositeOp) {
        check(
            "globalCompositeOperation",
            self.ctx.set_global_composite_operation(op.css()),
        );
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let arr = js_sys::Array::new();
        for s in segments {
            arr.push(&JsValue::from_f64(*s));
        }
        check("setLineDash", self.ctx.set_line_dash(&arr));
    }

    fn fill_text(&mut self, text: &str, at: DVec2, px: f64) {
        self.ctx.set_font(&format!("{px:.1}px ui-monospace, monospace"));
        check("fillText", self.ctx.fill_text(text, at.x, at.y));
    }
}
