use crate::input;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A DOM listener that removes itself when dropped.
pub struct EventBinding {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventBinding {
    pub fn listen(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("addEventListener({kind}) failed: {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Callbacks the page wires to the window.
pub struct Handlers {
    pub on_scroll: Box<dyn FnMut(f64)>,
    pub on_resize: Box<dyn FnMut(f64, f64)>,
    pub on_pointer: Box<dyn FnMut(f64, f64)>,
    pub on_seed_key: Box<dyn FnMut(input::SeedKey)>,
    pub on_reduced_motion: Box<dyn FnMut(bool)>,
}

/// Attach every listener. Dropping the returned bindings detaches them.
pub fn wire(
    window: &web::Window,
    media: Option<&web::MediaQueryList>,
    h: Handlers,
) -> anyhow::Result<Vec<EventBinding>> {
    let Handlers {
        mut on_scroll,
        mut on_resize,
        mut on_pointer,
        mut on_seed_key,
        mut on_reduced_motion,
    } = h;
    let mut bindings = Vec::with_capacity(5);

    let w = window.clone();
    bindings.push(EventBinding::listen(window, "scroll", move |_| {
        on_scroll(w.scroll_y().unwrap_or(0.0));
    })?);

    let w = window.clone();
    bindings.push(EventBinding::listen(window, "resize", move |_| {
        let (width, height) = crate::dom::viewport_size(&w);
        on_resize(width, height);
    })?);

    bindings.push(EventBinding::listen(window, "mousemove", move |ev| {
        if let Some(m) = ev.dyn_ref::<web::MouseEvent>() {
            on_pointer(m.client_x() as f64, m.client_y() as f64);
        }
    })?);

    bindings.push(EventBinding::listen(window, "keydown", move |ev| {
        let Some(k) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        let modified = k.ctrl_key() || k.meta_key() || k.alt_key();
        if let Some(action) = input::seed_key(&k.key(), modified) {
            on_seed_key(action);
        }
    })?);

    if let Some(mq) = media {
        bindings.push(EventBinding::listen(mq, "change", move |ev| {
            if let Some(m) = ev.dyn_ref::<web::MediaQueryListEvent>() {
                on_reduced_motion(m.matches());
            }
        })?);
    }

    log::info!("[events] {} listeners attached", bindings.len());
    Ok(bindings)
}
