// Host-side tests for the overlay layers and the motion preference.

use inkburst_core::overlay::{paint_overlay, OverlayFrame, SKY_PHOTOS};
use inkburst_core::{DeviceTier, OverlayPlan, RecordingSurface};

const POOL: &[&str] = &["one two three\nfour five", "six seven", "eight"];

fn frame(time_s: f64, scroll_y: f64) -> OverlayFrame<'static> {
    OverlayFrame {
        width: 1440.0,
        height: 900.0,
        scroll_y,
        time_s,
        timecode: "12:00:00:00",
    }
}

fn paint(plan: &OverlayPlan, time_s: f64, scroll_y: f64) -> RecordingSurface {
    let mut s = RecordingSurface::new();
    paint_overlay(plan, &frame(time_s, scroll_y), &mut s);
    s
}

#[test]
fn reduced_motion_leaves_only_sky_moving() {
    let plan = OverlayPlan::new(20250115, DeviceTier::Desktop, true).with_text_pool(POOL);
    assert!(!plan.sky.is_empty());
    assert!(!plan.glitch.is_empty());
    assert!(!plan.dust.is_empty());
    assert_eq!(plan.animated_elements(), plan.sky.len());
    assert_eq!(plan.scroll_listeners(), 1);
    assert!(!plan.needs_animation_frames());
}

#[test]
fn reduced_motion_overlay_is_static() {
    let plan = OverlayPlan::new(20250115, DeviceTier::Desktop, true).with_text_pool(POOL);
    let a = paint(&plan, 0.0, 0.0);
    let b = paint(&plan, 30.0, 1500.0);
    assert_eq!(a, b);
    assert!(a.texts().iter().all(|t| !t.contains("12:00")));

    let still = plan.sky_transforms(0.0, 400.0);
    assert_eq!(still, plan.sky_transforms(45.0, 400.0));
    assert!(still.iter().all(|t| t.scale == 1.0));
}

#[test]
fn full_motion_animates_every_layer() {
    let plan = OverlayPlan::new(20250115, DeviceTier::Desktop, false).with_text_pool(POOL);
    assert!(plan.needs_animation_frames());
    assert_eq!(
        plan.animated_elements(),
        plan.sky.len() + plan.rects.len() + plan.dust.len() + plan.glitch.len() + plan.atmosphere.len()
    );
    assert_eq!(plan.scroll_listeners(), 5);
    assert_ne!(paint(&plan, 5.0, 0.0), paint(&plan, 6.0, 0.0));
    assert_ne!(plan.sky_transforms(1.0, 0.0), plan.sky_transforms(2.5, 0.0));
}

#[test]
fn overlay_layouts_follow_the_seed() {
    let a = OverlayPlan::new(7, DeviceTier::Tablet, false).with_text_pool(POOL);
    let b = OverlayPlan::new(7, DeviceTier::Tablet, false).with_text_pool(POOL);
    let c = OverlayPlan::new(8, DeviceTier::Tablet, false).with_text_pool(POOL);
    assert_eq!(a, b);
    assert_ne!(a.glitch, c.glitch);
    for block in &a.sky {
        assert!(SKY_PHOTOS.contains(&block.src));
    }
    for block in &a.atmosphere {
        assert!(POOL.contains(&block.text.as_str()));
    }
}

#[test]
fn smaller_tiers_carry_fewer_overlay_elements() {
    let mobile = OverlayPlan::new(3, DeviceTier::Mobile, false);
    let wide = OverlayPlan::new(3, DeviceTier::Wide, false);
    assert!(mobile.dust.len() <= wide.dust.len());
    assert!(mobile.glitch.len() <= wide.glitch.len());
    assert!(mobile.animated_elements() < wide.animated_elements());
}

#[test]
fn overlay_paints_finite_geometry() {
    for tier in DeviceTier::ALL {
        let plan = OverlayPlan::new(99, tier, false).with_text_pool(POOL);
        for t in [0.0, 1.5, 12.0] {
            assert!(!paint(&plan, t, 800.0).has_non_finite());
        }
    }
}

#[test]
fn empty_text_pool_gives_no_atmosphere() {
    let plan = OverlayPlan::new(5, DeviceTier::Desktop, false).with_text_pool(&[]);
    assert!(plan.atmosphere.is_empty());
}
