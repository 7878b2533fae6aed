#![cfg(target_arch = "wasm32")]
use crate::config::PageConfig;
use crate::frame::{App, Canvases, FrameContext, InstantClock};
use inkburst_core::overlay::OverlayPlan;
use inkburst_core::schedule::Scheduler;
use inkburst_core::seed::SeedControl;
use inkburst_core::SceneStore;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod canvas;
mod config;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let search = web::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    let config = PageConfig::from_query(&search);
    console_log::init_with_level(config.log_level()).ok();
    log::info!("inkburst-web starting");

    if let Err(e) = init(config) {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

/// Detach every listener and stop the frame loop.
#[wasm_bindgen]
pub fn stop() {
    APP.with(|app| {
        if let Some(mut app) = app.borrow_mut().take() {
            app.teardown();
        }
    });
}

fn init(config: PageConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvases = Canvases {
        layer: dom::element(&document, constants::INK_LAYER_ID)?,
        main: dom::element(&document, constants::MAIN_CANVAS_ID)?,
        glow: dom::element(&document, constants::GLOW_CANVAS_ID)?,
        grain: dom::element(&document, constants::GRAIN_ID).ok(),
    };
    let overlay_canvas: web::HtmlCanvasElement =
        dom::element(&document, constants::OVERLAY_CANVAS_ID)?;
    let sky_layer: web::HtmlElement = dom::element(&document, constants::SKY_LAYER_ID)?;

    let media = window
        .match_media(constants::REDUCED_MOTION_QUERY)
        .ok()
        .flatten();
    let reduced_motion = media.as_ref().map(|m| m.matches()).unwrap_or(false);

    let seed = match config.seed {
        Some(s) => SeedControl::with_seed(s),
        None => SeedControl::for_date(frame::today()),
    };
    let mut store = SceneStore::new(seed);
    {
        let p = store.producers();
        p.viewport.forced_tier = config.tier;
        p.motion.reduced_motion = reduced_motion;
    }
    log::info!(
        "[seed] {} tier={} reduced_motion={}",
        store.seed(),
        config.tier.map(|t| t.name()).unwrap_or("auto"),
        reduced_motion
    );

    let (width, height) = dom::viewport_size(&window);
    store.viewport_mut().resize(width, height);
    let plan = OverlayPlan::new(store.seed(), store.tier(), reduced_motion)
        .with_text_pool(overlay::TEXT_POOL);
    let overlay = overlay::OverlayView::new(&document, sky_layer, overlay_canvas, plan);

    let ctx = Rc::new(RefCell::new(FrameContext::new(
        window.clone(),
        document,
        store,
        canvases,
        overlay,
    )));
    ctx.borrow_mut().resize(width, height);

    let scheduler = Rc::new(RefCell::new(Scheduler::new(InstantClock::new())));
    frame::subscribe(&mut scheduler.borrow_mut(), &ctx);

    let running = Rc::new(Cell::new(true));
    let frame_loop = frame::start_loop(ctx.clone(), scheduler.clone(), running.clone());

    let handlers = events::Handlers {
        on_scroll: {
            let s = scheduler.clone();
            let l = frame_loop.clone();
            Box::new(move |y| {
                s.borrow_mut().scroll(y);
                l.wake();
            })
        },
        on_resize: {
            let s = scheduler.clone();
            let l = frame_loop.clone();
            Box::new(move |w, h| {
                s.borrow_mut().resize(w, h);
                l.wake();
            })
        },
        on_pointer: {
            let c = ctx.clone();
            let s = scheduler.clone();
            let l = frame_loop.clone();
            Box::new(move |x, y| {
                c.borrow_mut().record_pointer(x, y);
                s.borrow_mut().request_frame();
                l.wake();
            })
        },
        on_seed_key: {
            let c = ctx.clone();
            let s = scheduler.clone();
            Box::new(move |key| {
                c.borrow_mut().seed_key(key);
                let y = c.borrow().store.scroll_y();
                s.borrow_mut().mark_drawn(y);
            })
        },
        on_reduced_motion: {
            let c = ctx.clone();
            let l = frame_loop.clone();
            Box::new(move |reduced| {
                c.borrow_mut().set_reduced_motion(reduced);
                l.wake();
            })
        },
    };
    let bindings = events::wire(&window, media.as_ref(), handlers)?;
    log::debug!("[frame] loop armed={}", frame_loop.is_armed());

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            ctx,
            scheduler,
            running,
            bindings,
            frame_loop,
        });
    });
    Ok(())
}
