use crate::canvas::CanvasSurface;
use crate::dom;
use inkburst_core::overlay::{paint_overlay, timecode, OverlayFrame, OverlayPlan};
use inkburst_core::render::Surface;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Margin notes drawn by the atmosphere layer.
pub const TEXT_POOL: &[&str] = &[
    "the fix was one line\nfinding it took all week",
    "measure first\nthen argue",
    "every cache\nis a promise\nyou will forget to keep",
    "ship the small thing\nlearn the big thing",
    "the logs said nothing\nwhich said everything",
    "state lives somewhere\nmake it live\nin exactly one place",
    "read the error message\nall of it\nslowly",
    "green on my machine\nred on everyone else's",
    "naming it\nwas the design",
    "backpressure\nis just saying no\npolitely",
    "deleted the abstraction\nthe code got shorter\nand clearer",
    "one frame at a time\nsixteen milliseconds\nis a long time",
];

/// Sky fragment `<img>` elements plus the overlay canvas.
pub struct OverlayView {
    sky_layer: web::HtmlElement,
    images: Vec<web::HtmlImageElement>,
    canvas: web::HtmlCanvasElement,
    surface: Option<CanvasSurface>,
    plan: OverlayPlan,
    size: (f64, f64),
    pixel_ratio: f64,
}

impl OverlayView {
    pub fn new(
        document: &web::Document,
        sky_layer: web::HtmlElement,
        canvas: web::HtmlCanvasElement,
        plan: OverlayPlan,
    ) -> Self {
        let surface = CanvasSurface::for_canvas(&canvas);
        if surface.is_none() {
            log::warn!("[overlay] no 2d context; overlay canvas disabled");
        }
        let mut view = Self {
            sky_layer,
            images: Vec::new(),
            canvas,
            surface,
            plan,
            size: (0.0, 0.0),
            pixel_ratio: 1.0,
        };
        view.mount_images(document);
        view
    }

    pub fn plan(&self) -> &OverlayPlan {
        &self.plan
    }

    /// Swap in a new layout (seed, tier or motion preference changed).
    pub fn replace_plan(&mut self, document: &web::Document, plan: OverlayPlan) {
        self.plan = plan;
        self.mount_images(document);
    }

    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
        dom::size_viewport_canvas(&self.canvas, width, height, pixel_ratio);
    }

    fn mount_images(&mut self, document: &web::Document) {
        for img in self.images.drain(..) {
            img.remove();
        }
        for block in &self.plan.sky {
            let img = match document
                .create_element("img")
                .ok()
                .and_then(|el| el.dyn_into::<web::HtmlImageElement>().ok())
            {
                Some(img) => img,
                None => {
                    log::warn!("[overlay] could not create sky image");
                    continue;
                }
            };
            img.set_src(block.src);
            img.set_alt("");
            img.set_decoding("async");
            dom::set_style(&img, "position", "absolute");
            dom::set_style(&img, "left", &format!("{:.3}%", block.x));
            dom::set_style(&img, "top", &format!("{:.3}%", block.y));
            dom::set_style(&img, "width", &format!("{:.1}px", block.width));
            dom::set_style(&img, "height", &format!("{:.1}px", block.height));
            dom::set_style(&img, "object-fit", "cover");
            dom::set_style(&img, "clip-path", block.clip_path);
            dom::set_style(&img, "opacity", &format!("{:.3}", block.opacity));
            dom::set_style(&img, "z-index", &block.z_index.to_string());
            dom::set_style(&img, "will-change", "transform");
            if let Err(e) = self.sky_layer.append_child(&img) {
                log::warn!("[overlay] append sky image failed: {:?}", e);
                continue;
            }
            self.images.push(img);
        }
        log::info!(
            "[overlay] mounted {} sky fragments, {} animated elements",
            self.images.len(),
            self.plan.animated_elements()
        );
    }

    /// Position the sky fragments and repaint the overlay canvas.
    pub fn draw(&mut self, time_s: f64, scroll_y: f64) {
        let poses = self.plan.sky_transforms(time_s, scroll_y);
        for (img, pose) in self.images.iter().zip(&poses) {
            dom::set_style(img, "transform", &pose.css_transform());
            dom::set_style(img, "opacity", &format!("{:.3}", pose.opacity));
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let now = js_sys::Date::new_0();
        let tc = timecode(
            now.get_hours(),
            now.get_minutes(),
            now.get_seconds(),
            now.get_milliseconds(),
        );
        let (width, height) = self.size;
        let frame = OverlayFrame {
            width,
            height,
            scroll_y,
            time_s,
            timecode: &tc,
        };
        let pr = self.pixel_ratio;
        surface.set_transform(pr, 0.0, 0.0, pr, 0.0, 0.0);
        paint_overlay(&self.plan, &frame, surface);
    }
}

impl Drop for OverlayView {
    fn drop(&mut self) {
        for img in self.images.drain(..) {
            img.remove();
        }
    }
}
