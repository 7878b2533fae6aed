use crate::canvas::CanvasSurface;
use crate::constants::*;
use crate::dom;
use crate::input::{self, SeedKey};
use crate::overlay::{OverlayView, TEXT_POOL};
use inkburst_core::choreography::Section;
use inkburst_core::overlay::OverlayPlan;
use inkburst_core::render::Surface;
use inkburst_core::schedule::{Clock, PointerThrottle, Scheduler};
use inkburst_core::seed::CalendarDate;
use inkburst_core::tier::{chromatic_offset, DeviceTier, PostEffect};
use inkburst_core::{Engine, SceneStore};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Milliseconds since the page started, from `instant`.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    start: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

pub fn today() -> CalendarDate {
    let d = js_sys::Date::new_0();
    CalendarDate::new(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
}

/// DOM handles the frame context draws into.
pub struct Canvases {
    pub layer: web::HtmlElement,
    pub main: web::HtmlCanvasElement,
    pub glow: web::HtmlCanvasElement,
    pub grain: Option<web::HtmlElement>,
}

pub struct FrameContext {
    pub window: web::Window,
    pub document: web::Document,
    pub store: SceneStore,
    pub engine: Engine,
    pub canvases: Canvases,
    main: Option<CanvasSurface>,
    glow: Option<CanvasSurface>,
    pub overlay: OverlayView,
    overlay_key: (i32, DeviceTier, bool),
    pointer: PointerThrottle,
    started_ms: Option<f64>,
    last_ms: f64,
    anim_time_s: f64,
    section: Section,
}

impl FrameContext {
    pub fn new(
        window: web::Window,
        document: web::Document,
        store: SceneStore,
        canvases: Canvases,
        overlay: OverlayView,
    ) -> Self {
        let main = CanvasSurface::for_canvas(&canvases.main);
        let glow = CanvasSurface::for_canvas(&canvases.glow);
        if main.is_none() || glow.is_none() {
            log::warn!(
                "[frame] 2d context missing (main={} glow={})",
                main.is_some(),
                glow.is_some()
            );
        }
        dom::style_glow_canvas(&canvases.glow, GLOW_BLUR_PX, GLOW_OPACITY);
        let overlay_key = (store.seed(), store.tier(), store.reduced_motion());
        Self {
            window,
            document,
            store,
            engine: Engine::new(),
            canvases,
            main,
            glow,
            overlay,
            overlay_key,
            pointer: PointerThrottle::default(),
            started_ms: None,
            last_ms: 0.0,
            anim_time_s: 0.0,
            section: Section::Hero,
        }
    }

    /// Debounced resize: store the size, rebuild if the key moved, redraw.
    pub fn resize(&mut self, width: f64, height: f64) {
        let tier_changed = self.store.viewport_mut().resize(width, height);
        if tier_changed {
            log::info!("[tier] {}", self.store.tier().name());
        }
        let dpr = self.window.device_pixel_ratio();
        let pixel_ratio = self.store.tier().pixel_ratio(dpr);
        self.overlay.resize(width, height, pixel_ratio);
        self.sync_scene();
        let y = dom::scroll_y(&self.window);
        self.scroll_to(y);
    }

    /// Rebuild scene and overlay plan if their inputs changed.
    fn sync_scene(&mut self) {
        let dpr = self.window.device_pixel_ratio();
        match self.engine.sync(&self.store, dpr) {
            Ok(true) => {
                let frame = *self.engine.frame();
                dom::size_ink_canvas(&self.canvases.main, &frame);
                dom::size_ink_canvas(&self.canvases.glow, &frame);
                log::info!(
                    "[scene] rebuilt seed={} {}x{} primitives={} (build #{})",
                    self.store.seed(),
                    frame.width,
                    frame.viewport_height,
                    self.engine.scene().primitive_count(),
                    self.engine.builds()
                );
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("[scene] not rebuilt: {e}");
            }
        }

        let key = (
            self.store.seed(),
            self.store.tier(),
            self.store.reduced_motion(),
        );
        if key != self.overlay_key {
            self.overlay_key = key;
            let plan = OverlayPlan::new(key.0, key.1, key.2).with_text_pool(TEXT_POOL);
            self.overlay.replace_plan(&self.document, plan);
        }

        let effects = self
            .store
            .tier()
            .performance()
            .active_post_effects(self.store.reduced_motion());
        if let Some(grain) = &self.canvases.grain {
            dom::set_visible(grain, effects.contains(&PostEffect::Grain));
        }
    }

    /// Coalesced scroll: update choreography and redraw the ink canvases.
    pub fn scroll_to(&mut self, scroll_y: f64) {
        let doc_h = dom::document_height(&self.document);
        let (_, vh) = self.store.viewport();
        let progress = input::scroll_progress(scroll_y, doc_h, vh);
        let section = self.store.scroll_mut().apply(progress, scroll_y).active_section;
        if section != self.section {
            self.section = section;
            log::info!("[scene] section {}", section.name());
        }
        self.redraw(scroll_y);
        if self.store.reduced_motion() {
            self.overlay.draw(0.0, scroll_y);
        }
    }

    fn redraw(&mut self, scroll_y: f64) {
        self.engine.sync_burst(self.store.seed(), self.store.scene());
        let main = self.main.as_mut().map(|s| s as &mut dyn Surface);
        let glow = self.glow.as_mut().map(|s| s as &mut dyn Surface);
        self.engine.paint(scroll_y, main, glow);

        let frame = self.engine.frame();
        let shift = frame.parallax_shift(scroll_y, PARALLAX);
        dom::place_ink_layer(&self.canvases.layer, frame, shift);

        let effects = self
            .store
            .tier()
            .performance()
            .active_post_effects(self.store.reduced_motion());
        let offset = if effects.contains(&PostEffect::ChromaticAberration) {
            chromatic_offset(self.store.transition_phase()) * frame.width
        } else {
            0.0
        };
        dom::set_style(
            &self.canvases.glow,
            "transform",
            &format!("translateX({offset:.2}px)"),
        );
    }

    pub fn record_pointer(&mut self, client_x: f64, client_y: f64) {
        let (w, h) = self.store.viewport();
        self.pointer
            .record(input::normalize_pointer(client_x, client_y, w, h));
    }

    pub fn seed_key(&mut self, key: SeedKey) {
        let seed = {
            let control = &mut self.store.seed_mut().control;
            match key {
                SeedKey::Previous => control.previous(),
                SeedKey::Next => control.next(),
                SeedKey::Today => {
                    control.reset_to(today());
                    control.seed()
                }
            }
        };
        log::info!("[seed] {seed}");
        self.sync_scene();
        self.redraw(self.store.scroll_y());
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.store.motion_mut().reduced_motion = reduced;
        log::info!("[motion] reduced={reduced}");
        self.sync_scene();
        self.redraw(self.store.scroll_y());
        self.overlay.draw(self.anim_time_s, self.store.scroll_y());
    }

    pub fn pointer_pending(&self) -> bool {
        self.pointer.is_pending()
    }

    pub fn needs_animation(&self) -> bool {
        self.overlay.plan().needs_animation_frames()
    }

    /// Per-frame work: publish the throttled pointer, advance the overlay.
    pub fn frame(&mut self, now_ms: f64) {
        let started = *self.started_ms.get_or_insert(now_ms);
        self.anim_time_s += input::frame_step_sec(self.last_ms.max(started), now_ms, MAX_FRAME_STEP_SEC);
        self.last_ms = now_ms;

        if let Some(p) = self.pointer.tick(now_ms) {
            self.store.pointer_mut().position = p;
            log::trace!("[pointer] {:.3},{:.3}", p.x, p.y);
        }
        if self.needs_animation() {
            self.overlay.draw(self.anim_time_s, self.store.scroll_y());
        }
    }
}

/// Everything the running page owns. Dropping the bindings detaches the
/// listeners; clearing `running` stops the RAF loop.
pub struct App {
    pub ctx: Rc<RefCell<FrameContext>>,
    pub scheduler: Rc<RefCell<Scheduler<InstantClock>>>,
    pub running: Rc<Cell<bool>>,
    pub bindings: Vec<crate::events::EventBinding>,
    pub frame_loop: FrameLoop,
}

impl App {
    pub fn teardown(&mut self) {
        self.running.set(false);
        let kinds: Vec<&str> = self.bindings.iter().map(|b| b.kind()).collect();
        log::debug!("[events] detaching {}", kinds.join(","));
        self.bindings.clear();
        self.scheduler.borrow_mut().teardown();
        log::info!("[frame] stopped (seed {})", self.ctx.borrow().store.seed());
    }
}

/// Route scheduler output into the frame context.
pub fn subscribe(scheduler: &mut Scheduler<InstantClock>, ctx: &Rc<RefCell<FrameContext>>) {
    let c = ctx.clone();
    scheduler.on_resize(move |w, h| c.borrow_mut().resize(w, h));
    let c = ctx.clone();
    scheduler.on_scroll(move |y| c.borrow_mut().scroll_to(y));
    let c = ctx.clone();
    scheduler.on_frame(move |now| c.borrow_mut().frame(now));
}

/// The RAF loop. It re-arms itself only while the scheduler has queued
/// work, the pointer has an unpublished sample, or the overlay animates;
/// input handlers call `wake` to restart it.
#[derive(Clone)]
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    armed: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn wake(&self) {
        if !self.armed.replace(true) {
            request_frame(&self.tick);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

pub fn start_loop(
    ctx: Rc<RefCell<FrameContext>>,
    scheduler: Rc<RefCell<Scheduler<InstantClock>>>,
    running: Rc<Cell<bool>>,
) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let armed = Rc::new(Cell::new(false));
    let tick_clone = tick.clone();
    let armed_clone = armed.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        armed_clone.set(false);
        if !running.get() {
            return;
        }
        if ctx.borrow().needs_animation() {
            scheduler.borrow_mut().request_frame();
        }
        let report = scheduler.borrow_mut().tick();
        let again = {
            let c = ctx.borrow();
            report.wants_frame || c.needs_animation() || c.pointer_pending()
        };
        if again {
            armed_clone.set(true);
            request_frame(&tick_clone);
        } else {
            log::trace!("[frame] idle");
        }
    }) as Box<dyn FnMut()>));
    let frame_loop = FrameLoop { tick, armed };
    frame_loop.wake();
    frame_loop
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
