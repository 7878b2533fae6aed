//! Event coalescing: resize debounce, one frame per burst of scroll events,
//! pointer throttling.
//!
//! Nothing here reads a real clock. The front end passes a [`Clock`] backed
//! by the browser; tests pass a [`ManualClock`] and step it by hand.

use crate::constants::{
    POINTER_NOISE_THRESHOLD, POINTER_THROTTLE_MS, RESIZE_DEBOUNCE_MS, SCROLL_REDRAW_THRESHOLD_PX,
};
use fnv::FnvHashMap;
use glam::DVec2;
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Keeps only the latest value and releases it once `delay_ms` has passed
/// without another notify.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<(f64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn notify(&mut self, now_ms: f64, value: T) {
        self.pending = Some((now_ms, value));
    }

    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let due = matches!(&self.pending, Some((at, _)) if now_ms - *at >= self.delay_ms);
        if due {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value would fire, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|(at, _)| at + self.delay_ms)
    }
}

/// At most one animation frame in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    in_flight: bool,
}

impl FrameGate {
    /// True only if this call scheduled a new frame.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    pub fn begin_frame(&mut self) {
        self.in_flight = false;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight
    }
}

/// Pointer updates at ~30 Hz, ignoring sub-threshold jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerThrottle {
    interval_ms: f64,
    threshold: f64,
    last_tick: f64,
    latest: DVec2,
    published: DVec2,
}

impl Default for PointerThrottle {
    fn default() -> Self {
        Self::new(POINTER_THROTTLE_MS, POINTER_NOISE_THRESHOLD)
    }
}

impl PointerThrottle {
    pub fn new(interval_ms: f64, threshold: f64) -> Self {
        Self {
            interval_ms,
            threshold,
            last_tick: f64::NEG_INFINITY,
            latest: DVec2::splat(0.5),
            published: DVec2::splat(0.5),
        }
    }

    /// Record a raw pointer sample (normalized coordinates).
    pub fn record(&mut self, pos: DVec2) {
        self.latest = pos;
    }

    /// Called every frame. Returns a position to publish, at most once per
    /// interval and only if it moved more than the threshold on some axis.
    pub fn tick(&mut self, now_ms: f64) -> Option<DVec2> {
        if now_ms - self.last_tick <= self.interval_ms {
            return None;
        }
        self.last_tick = now_ms;
        if self.is_pending() {
            self.published = self.latest;
            Some(self.latest)
        } else {
            None
        }
    }

    /// A sample past the threshold is waiting to be published.
    pub fn is_pending(&self) -> bool {
        let d = (self.latest - self.published).abs();
        d.x > self.threshold || d.y > self.threshold
    }
}

/// Skip redraws for scroll deltas of a few pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRedrawGate {
    threshold: f64,
    last: Option<f64>,
}

impl Default for ScrollRedrawGate {
    fn default() -> Self {
        Self::new(SCROLL_REDRAW_THRESHOLD_PX)
    }
}

impl ScrollRedrawGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    pub fn should_redraw(&mut self, scroll_y: f64) -> bool {
        match self.last {
            Some(last) if (scroll_y - last).abs() <= self.threshold => false,
            _ => {
                self.last = Some(scroll_y);
                true
            }
        }
    }

    /// Note a redraw that happened elsewhere (e.g. after a rebuild).
    pub fn mark(&mut self, scroll_y: f64) {
        self.last = Some(scroll_y);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u32);

type FrameFn = Box<dyn FnMut(f64)>;
type ScrollFn = Box<dyn FnMut(f64)>;
type ResizeFn = Box<dyn FnMut(f64, f64)>;

/// What one `tick` did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub resized: Option<(f64, f64)>,
    pub frame_ran: bool,
    pub scrolled: Option<f64>,
    /// Work is still queued, so the host should schedule another tick.
    pub wants_frame: bool,
}

/// Owns every registered callback and the coalescing state between them.
/// Subscribers of one kind run in no particular order.
pub struct Scheduler<C: Clock> {
    clock: C,
    next_id: u32,
    frame_cbs: FnvHashMap<Subscription, FrameFn>,
    scroll_cbs: FnvHashMap<Subscription, ScrollFn>,
    resize_cbs: FnvHashMap<Subscription, ResizeFn>,
    resize: Debouncer<(f64, f64)>,
    frame: FrameGate,
    scroll_gate: ScrollRedrawGate,
    pending_scroll: Option<f64>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self::with_debounce(clock, RESIZE_DEBOUNCE_MS)
    }

    pub fn with_debounce(clock: C, resize_debounce_ms: f64) -> Self {
        Self {
            clock,
            next_id: 0,
            frame_cbs: FnvHashMap::default(),
            scroll_cbs: FnvHashMap::default(),
            resize_cbs: FnvHashMap::default(),
            resize: Debouncer::new(resize_debounce_ms),
            frame: FrameGate::default(),
            scroll_gate: ScrollRedrawGate::default(),
            pending_scroll: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn next_subscription(&mut self) -> Subscription {
        self.next_id += 1;
        Subscription(self.next_id)
    }

    /// Runs on every frame with the frame time.
    pub fn on_frame(&mut self, cb: impl FnMut(f64) + 'static) -> Subscription {
        let id = self.next_subscription();
        self.frame_cbs.insert(id, Box::new(cb));
        id
    }

    /// Runs once per frame in which the scroll offset moved past the redraw
    /// threshold.
    pub fn on_scroll(&mut self, cb: impl FnMut(f64) + 'static) -> Subscription {
        let id = self.next_subscription();
        self.scroll_cbs.insert(id, Box::new(cb));
        id
    }

    /// Runs with the final size once resizes have been quiet for the
    /// debounce window.
    pub fn on_resize(&mut self, cb: impl FnMut(f64, f64) + 'static) -> Subscription {
        let id = self.next_subscription();
        self.resize_cbs.insert(id, Box::new(cb));
        id
    }

    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        self.frame_cbs.remove(&sub).is_some()
            || self.scroll_cbs.remove(&sub).is_some()
            || self.resize_cbs.remove(&sub).is_some()
    }

    /// Record a scroll event. Returns true if it requested a new frame.
    pub fn scroll(&mut self, scroll_y: f64) -> bool {
        self.pending_scroll = Some(scroll_y);
        self.frame.request()
    }

    pub fn request_frame(&mut self) -> bool {
        self.frame.request()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let now = self.clock.now_ms();
        self.resize.notify(now, (width, height));
    }

    /// A redraw happened outside the scroll path.
    pub fn mark_drawn(&mut self, scroll_y: f64) {
        self.scroll_gate.mark(scroll_y);
    }

    /// Advance to the clock's current time: fire a due resize, then run at
    /// most one coalesced frame.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let mut report = TickReport::default();

        if let Some((w, h)) = self.resize.poll(now) {
            log::debug!("[schedule] resize fired {w}x{h}");
            for cb in self.resize_cbs.values_mut() {
                cb(w, h);
            }
            report.resized = Some((w, h));
        }

        if self.frame.is_pending() {
            self.frame.begin_frame();
            report.frame_ran = true;
            for cb in self.frame_cbs.values_mut() {
                cb(now);
            }
            if let Some(y) = self.pending_scroll.take() {
                if self.scroll_gate.should_redraw(y) {
                    for cb in self.scroll_cbs.values_mut() {
                        cb(y);
                    }
                    report.scrolled = Some(y);
                }
            }
        }
        report.wants_frame = self.has_pending_work();
        report
    }

    /// Drop every subscription and any pending work.
    pub fn teardown(&mut self) {
        self.frame_cbs.clear();
        self.scroll_cbs.clear();
        self.resize_cbs.clear();
        self.resize.cancel();
        self.frame.begin_frame();
        self.pending_scroll = None;
    }

    pub fn listener_count(&self) -> usize {
        self.frame_cbs.len() + self.scroll_cbs.len() + self.resize_cbs.len()
    }

    pub fn has_pending_work(&self) -> bool {
        self.resize.is_pending() || self.frame.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_restarts_window_on_notify() {
        let mut d = Debouncer::new(200.0);
        d.notify(0.0, 1);
        d.notify(150.0, 2);
        assert_eq!(d.poll(250.0), None);
        assert_eq!(d.poll(350.0), Some(2));
        assert_eq!(d.poll(900.0), None);
    }

    #[test]
    fn frame_gate_coalesces_requests() {
        let mut g = FrameGate::default();
        assert!(g.request());
        assert!(!g.request());
        g.begin_frame();
        assert!(g.request());
    }

    #[test]
    fn scroll_gate_ignores_small_moves() {
        let mut g = ScrollRedrawGate::default();
        assert!(g.should_redraw(0.0));
        assert!(!g.should_redraw(4.0));
        assert!(g.should_redraw(4.5));
    }
}
