// Host-side tests for event coalescing, the scene store and scene rebuilds.

use glam::DVec2;
use inkburst_core::schedule::{ManualClock, PointerThrottle, Scheduler};
use inkburst_core::{CalendarDate, DeviceTier, Engine, SceneStore, SeedControl, Section};
use std::cell::RefCell;
use std::rc::Rc;

fn store(width: f64, height: f64) -> SceneStore {
    let mut store = SceneStore::new(SeedControl::with_seed(20250115));
    store.viewport_mut().resize(width, height);
    store
}

#[test]
fn resize_burst_rebuilds_once_with_final_size() {
    let clock = ManualClock::new(0.0);
    let mut scheduler = Scheduler::new(clock.clone());

    let state = Rc::new(RefCell::new((store(1920.0, 1080.0), Engine::new())));
    {
        let (store, engine) = &mut *state.borrow_mut();
        assert_eq!(engine.sync(store, 1.0).ok(), Some(true));
    }

    let resized = Rc::new(RefCell::new(Vec::new()));
    {
        let state = state.clone();
        let resized = resized.clone();
        scheduler.on_resize(move |w, h| {
            resized.borrow_mut().push((w, h));
            let (store, engine) = &mut *state.borrow_mut();
            store.viewport_mut().resize(w, h);
            if let Err(e) = engine.sync(store, 1.0) {
                panic!("rebuild failed: {e}");
            }
        });
    }

    // ten events inside 50 ms
    for i in 0..10 {
        scheduler.resize(1200.0 + i as f64 * 10.0, 700.0 + i as f64);
        clock.advance(5.0);
        scheduler.tick();
    }
    assert!(resized.borrow().is_empty());

    clock.advance(100.0);
    scheduler.tick();
    assert!(resized.borrow().is_empty());

    clock.advance(150.0);
    let report = scheduler.tick();
    assert_eq!(report.resized, Some((1290.0, 709.0)));
    assert_eq!(*resized.borrow(), vec![(1290.0, 709.0)]);

    clock.advance(1000.0);
    scheduler.tick();
    assert_eq!(resized.borrow().len(), 1);

    let (store, engine) = &*state.borrow();
    assert_eq!(engine.builds(), 2);
    assert_eq!(engine.frame().width, 1290.0);
    assert_eq!(engine.frame().viewport_height, 709.0);
    assert_eq!(store.tier(), DeviceTier::Desktop);
}

#[test]
fn scroll_bursts_coalesce_into_one_frame() {
    let clock = ManualClock::new(0.0);
    let mut scheduler = Scheduler::new(clock.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let frames = Rc::new(RefCell::new(0));
    {
        let seen = seen.clone();
        scheduler.on_scroll(move |y| seen.borrow_mut().push(y));
        let frames = frames.clone();
        scheduler.on_frame(move |_| *frames.borrow_mut() += 1);
    }

    assert!(scheduler.scroll(10.0));
    assert!(!scheduler.scroll(40.0));
    assert!(!scheduler.scroll(120.0));
    clock.advance(16.0);
    let report = scheduler.tick();
    assert!(report.frame_ran);
    assert_eq!(report.scrolled, Some(120.0));

    // nothing requested, nothing runs
    clock.advance(16.0);
    assert!(!scheduler.tick().frame_ran);

    // sub-threshold moves are dropped
    scheduler.scroll(122.0);
    clock.advance(16.0);
    assert_eq!(scheduler.tick().scrolled, None);

    assert_eq!(*seen.borrow(), vec![120.0]);
    assert_eq!(*frames.borrow(), 2);
}

#[test]
fn pointer_updates_are_throttled_and_denoised() {
    let mut throttle = PointerThrottle::new(33.0, 0.002);
    throttle.record(DVec2::new(0.6, 0.5));
    assert_eq!(throttle.tick(0.0), Some(DVec2::new(0.6, 0.5)));

    throttle.record(DVec2::new(0.7, 0.5));
    assert_eq!(throttle.tick(10.0), None);
    assert_eq!(throttle.tick(40.0), Some(DVec2::new(0.7, 0.5)));

    throttle.record(DVec2::new(0.7005, 0.5));
    assert_eq!(throttle.tick(100.0), None);
}

#[test]
fn teardown_drops_every_listener_and_pending_event() {
    let clock = ManualClock::new(0.0);
    let mut scheduler = Scheduler::new(clock.clone());
    let calls = Rc::new(RefCell::new(0));
    {
        let c = calls.clone();
        scheduler.on_frame(move |_| *c.borrow_mut() += 1);
        let c = calls.clone();
        scheduler.on_scroll(move |_| *c.borrow_mut() += 1);
        let c = calls.clone();
        scheduler.on_resize(move |_, _| *c.borrow_mut() += 1);
    }
    assert_eq!(scheduler.listener_count(), 3);

    scheduler.resize(800.0, 600.0);
    scheduler.scroll(500.0);
    assert!(scheduler.has_pending_work());

    scheduler.teardown();
    assert_eq!(scheduler.listener_count(), 0);
    assert!(!scheduler.has_pending_work());

    clock.advance(1000.0);
    let report = scheduler.tick();
    assert_eq!(report.resized, None);
    assert!(!report.frame_ran);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn unsubscribed_callbacks_stop_running() {
    let mut scheduler = Scheduler::new(ManualClock::new(0.0));
    let calls = Rc::new(RefCell::new(0));
    let c = calls.clone();
    let sub = scheduler.on_frame(move |_| *c.borrow_mut() += 1);
    assert!(scheduler.unsubscribe(sub));
    assert!(!scheduler.unsubscribe(sub));
    scheduler.request_frame();
    scheduler.tick();
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn producers_write_disjoint_fields() {
    let mut store = SceneStore::for_date(CalendarDate::new(2025, 1, 15));
    let before = store.clone();
    {
        let p = store.producers();
        p.scroll.apply(0.5, 2400.0);
        p.viewport.resize(390.0, 844.0);
        p.seed.control.next();
        p.motion.reduced_motion = true;
        p.pointer.position = DVec2::new(0.1, 0.9);
    }
    assert_eq!(store.progress(), 0.5);
    assert_eq!(store.scroll_y(), 2400.0);
    assert_eq!(store.active_section(), Section::Projects);
    assert_eq!(store.viewport(), (390.0, 844.0));
    assert_eq!(store.tier(), DeviceTier::Mobile);
    assert_eq!(store.seed(), 20250116);
    assert!(store.reduced_motion());
    assert_eq!(store.pointer(), DVec2::new(0.1, 0.9));

    // a scroll-only update never touches the rebuild inputs
    let mut scrolled = before.clone();
    scrolled.scroll_mut().apply(0.9, 5000.0);
    assert_eq!(scrolled.rebuild_key(), before.rebuild_key());
    assert_eq!(scrolled.pointer(), before.pointer());
    assert_eq!(scrolled.reduced_motion(), before.reduced_motion());
}

#[test]
fn engine_rebuilds_only_when_its_key_changes() {
    let mut store = store(1920.0, 1080.0);
    let mut engine = Engine::new();
    assert_eq!(engine.sync(&store, 2.0).ok(), Some(true));
    assert_eq!(engine.frame().pixel_ratio, 2.0);
    let first = engine.scene().clone();

    store.scroll_mut().apply(0.4, 1800.0);
    store.pointer_mut().position = DVec2::new(0.2, 0.2);
    store.motion_mut().reduced_motion = true;
    assert_eq!(engine.sync(&store, 2.0).ok(), Some(false));

    store.seed_mut().control.next();
    assert_eq!(engine.sync(&store, 2.0).ok(), Some(true));
    assert_ne!(engine.scene(), &first);

    store.seed_mut().control.previous();
    assert_eq!(engine.sync(&store, 2.0).ok(), Some(true));
    assert_eq!(engine.scene(), &first);
    assert_eq!(engine.builds(), 3);
}

#[test]
fn engine_rejects_an_empty_viewport() {
    let store = SceneStore::new(SeedControl::with_seed(1));
    let mut engine = Engine::new();
    assert!(engine.sync(&store, 1.0).is_err());
    assert_eq!(engine.builds(), 0);
}

#[test]
fn idle_reduced_motion_page_stops_asking_for_frames() {
    use inkburst_core::OverlayPlan;

    let plan = OverlayPlan::new(20250115, DeviceTier::Desktop, true);
    assert!(!plan.needs_animation_frames());

    let clock = ManualClock::new(0.0);
    let mut scheduler = Scheduler::new(clock.clone());
    scheduler.on_frame(|_| {});
    scheduler.on_scroll(|_| {});
    scheduler.on_resize(|_, _| {});

    // no input: nothing to schedule
    clock.advance(16.0);
    assert!(!scheduler.tick().wants_frame);

    // a scroll runs once and the loop goes quiet again
    scheduler.scroll(300.0);
    clock.advance(16.0);
    let report = scheduler.tick();
    assert!(report.frame_ran);
    assert!(!report.wants_frame);

    // a debounced resize keeps the loop alive only until it fires
    scheduler.resize(800.0, 600.0);
    clock.advance(16.0);
    assert!(scheduler.tick().wants_frame);
    clock.advance(300.0);
    let report = scheduler.tick();
    assert_eq!(report.resized, Some((800.0, 600.0)));
    assert!(!report.wants_frame);
    clock.advance(16.0);
    assert!(!scheduler.tick().wants_frame);
}

#[test]
fn unpublished_pointer_sample_stays_pending() {
    let mut throttle = PointerThrottle::new(33.0, 0.002);
    assert!(!throttle.is_pending());
    assert_eq!(throttle.tick(0.0), None);
    throttle.record(DVec2::new(0.8, 0.5));
    assert!(throttle.is_pending());
    assert_eq!(throttle.tick(10.0), None);
    assert!(throttle.is_pending());
    assert_eq!(throttle.tick(50.0), Some(DVec2::new(0.8, 0.5)));
    assert!(!throttle.is_pending());
}
