use anyhow::anyhow;
use inkburst_core::builder::SceneFrame;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Element by id, cast to `T`.
pub fn element<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|e| anyhow!("#{id} has the wrong element type: {:?}", e))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, prop: &str, value: &str) {
    if let Err(e) = el.style().set_property(prop, value) {
        log::debug!("[dom] style {prop} rejected: {:?}", e);
    }
}

/// Viewport size in CSS px.
pub fn viewport_size(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w, h)
}

/// Full scrollable height of the document in CSS px.
pub fn document_height(document: &web::Document) -> f64 {
    document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &web::Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Size a canvas for `frame`: CSS size in px, backing store in device px.
pub fn size_ink_canvas(canvas: &web::HtmlCanvasElement, frame: &SceneFrame) {
    let (w_px, h_px) = frame.backing_size();
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
    set_style(canvas, "width", &format!("{}px", frame.width));
    set_style(canvas, "height", &format!("{}px", frame.canvas_height));
}

/// Size a viewport-covering canvas at `pixel_ratio`.
pub fn size_viewport_canvas(canvas: &web::HtmlCanvasElement, width: f64, height: f64, pixel_ratio: f64) {
    canvas.set_width(((width * pixel_ratio).round() as u32).max(1));
    canvas.set_height(((height * pixel_ratio).round() as u32).max(1));
    set_style(canvas, "width", &format!("{width}px"));
    set_style(canvas, "height", &format!("{height}px"));
}

/// Position the ink layer so the overflow band sits above the viewport and
/// shift it by the current parallax.
pub fn place_ink_layer(layer: &web::HtmlElement, frame: &SceneFrame, shift: f64) {
    set_style(layer, "top", &format!("{}px", -frame.overflow));
    set_style(layer, "transform", &format!("translateY({:.2}px)", -shift));
}

pub fn style_glow_canvas(canvas: &web::HtmlCanvasElement, blur_px: f64, opacity: f64) {
    set_style(canvas, "filter", &format!("blur({blur_px}px)"));
    set_style(canvas, "opacity", &format!("{opacity}"));
}

pub fn set_visible(el: &web::HtmlElement, visible: bool) {
    set_style(el, "display", if visible { "" } else { "none" });
}
