// Host-side tests for scene generation and compositing.

use glam::DVec2;
use inkburst_core::burst::{burst_geometry, RibbonVertex, MAX_LINES, POINTS_PER_LINE};
use inkburst_core::geometry::{deform, deform_cubic};
use inkburst_core::render::Command;
use inkburst_core::scene::{BrushRole, BrushStroke, Hairline, InkStroke, Tangle, Whip};
use inkburst_core::taper::{Taper, TaperClass};
use inkburst_core::{
    build_scene, BuildParams, Compositor, DeviceTier, DrawLayer, Mulberry32, RecordingSurface,
    SceneDescription, SceneFrame,
};

fn build(seed: i32, width: f64, height: f64, tier: DeviceTier) -> (SceneFrame, SceneDescription) {
    let frame = SceneFrame::for_viewport(width, height, tier);
    let scene = build_scene(&BuildParams::from_frame(&frame), &mut Mulberry32::new(seed));
    (frame, scene)
}

fn render_main(frame: &SceneFrame, scene: &SceneDescription, scroll_y: f64) -> RecordingSurface {
    let mut s = RecordingSurface::new();
    Compositor::new(1.0).render_main(scene, scroll_y, frame.width, frame.canvas_height, &mut s);
    s
}

#[test]
fn same_seed_builds_the_same_scene() {
    let (frame, a) = build(20250115, 1920.0, 1080.0, DeviceTier::Desktop);
    let (_, b) = build(20250115, 1920.0, 1080.0, DeviceTier::Desktop);
    assert_eq!(a, b);
    assert_eq!(render_main(&frame, &a, 300.0), render_main(&frame, &b, 300.0));
}

#[test]
fn neighbouring_seeds_build_different_scenes() {
    let (_, a) = build(20250115, 1920.0, 1080.0, DeviceTier::Desktop);
    let (_, b) = build(20250116, 1920.0, 1080.0, DeviceTier::Desktop);
    assert_ne!(a.brushes, b.brushes);
}

#[test]
fn desktop_scene_has_expected_counts() {
    let (_, scene) = build(20250115, 1920.0, 1080.0, DeviceTier::Desktop);
    assert_eq!(scene.brushes_with(BrushRole::Hero), 5);
    assert_eq!(scene.brushes_with(BrushRole::Accent), 4);
    assert_eq!(scene.brushes_with(BrushRole::Peripheral), 3);
    assert_eq!(scene.brushes_with(BrushRole::Diagonal), 3);
    assert_eq!(scene.beams.len(), 55);
    assert_eq!(scene.hairlines.len(), 200 + 40);
    assert!(scene.brush_tangles.iter().all(|b| b.role == BrushRole::Tangle));
}

#[test]
fn primitives_stay_near_the_focal_point() {
    let (frame, scene) = build(7, 1280.0, 800.0, DeviceTier::Desktop);
    assert_eq!(scene.focal, frame.focal);
    let reach = (frame.width.powi(2) + frame.canvas_height.powi(2)).sqrt();
    for beam in &scene.beams {
        assert!(beam.p0.distance(scene.focal) <= 15.0 + 1e-9);
        assert!(beam.p1.distance(scene.focal) <= reach);
    }
}

#[test]
fn tapers_never_drop_below_their_floor() {
    let classes = [
        TaperClass::ExponentialDecay,
        TaperClass::EasedSine,
        TaperClass::Sine,
        TaperClass::CalligraphicEase,
        TaperClass::OrganicDoubleTaper,
    ];
    for class in classes {
        for max_width in [0.0, 0.2, 3.0, 40.0, f64::NAN] {
            let taper = Taper::new(max_width, class);
            for i in 0..=200 {
                let w = taper.width(i as f64 / 200.0);
                assert!(w >= taper.floor(), "{class:?} {max_width} -> {w}");
            }
        }
    }
    assert_eq!(Taper::ink(10.0, 0).floor(), Taper::INK_FLOOR);
    assert_eq!(Taper::brush(10.0, 2).floor(), Taper::BRUSH_FLOOR);
}

#[test]
fn deform_is_identity_at_rest() {
    for p in [DVec2::ZERO, DVec2::new(1344.0, 1188.0), DVec2::new(-20.0, 4000.0)] {
        assert_eq!(deform(p, 0.0), p);
    }
    let cp = [DVec2::ZERO, DVec2::X, DVec2::Y, DVec2::ONE];
    assert_eq!(deform_cubic(&cp, 0.0), cp);
    assert_ne!(deform(DVec2::new(100.0, 100.0), 900.0), DVec2::new(100.0, 100.0));
}

#[test]
fn layers_are_drawn_in_fixed_order() {
    let (frame, scene) = build(3, 1920.0, 1080.0, DeviceTier::Desktop);
    let main = render_main(&frame, &scene, 0.0);
    assert_eq!(main.layers(), DrawLayer::MAIN_ORDER.to_vec());
    assert!(!main.has_non_finite());

    let mut glow = RecordingSurface::new();
    Compositor::new(1.0).render_glow(&scene, 0.0, frame.width, frame.canvas_height, &mut glow);
    assert_eq!(glow.layers(), DrawLayer::GLOW_ORDER.to_vec());
}

#[test]
fn rendering_leaves_the_scene_untouched() {
    let (frame, scene) = build(11, 1024.0, 768.0, DeviceTier::Tablet);
    let before = scene.clone();
    render_main(&frame, &scene, 2500.0);
    assert_eq!(scene, before);
}

#[test]
fn degenerate_geometry_draws_nothing() {
    let p = DVec2::new(50.0, 50.0);
    let mut scene = SceneDescription {
        width: 200.0,
        height: 200.0,
        ..Default::default()
    };
    scene.brushes.push(BrushStroke {
        role: BrushRole::Hero,
        cp: [p; 4],
        taper: Taper::brush(20.0, 0),
        opacity: 1.0,
        micro_seed: 12.5,
    });
    scene.inks.push(InkStroke {
        cp: [p, DVec2::new(f64::NAN, 0.0), p, p],
        taper: Taper::ink(12.0, 1),
        micro_seed: 3.0,
        rgb: [0, 0, 0],
    });
    scene.hairlines.push(Hairline {
        p0: p,
        p1: p,
        opacity: 0.5,
        gray: false,
    });
    scene.whips.push(Whip {
        points: vec![p],
        max_width: 4.0,
        opacity: 0.5,
    });
    scene.tangles.push(Tangle {
        points: Vec::new(),
        width: 1.0,
        opacity: 0.5,
    });

    let mut s = RecordingSurface::new();
    Compositor::new(1.0).render_main(&scene, 0.0, 200.0, 200.0, &mut s);
    assert_eq!(s.fills(), 0);
    assert_eq!(s.strokes(), 0);
    assert!(!s.has_non_finite());
}

#[test]
fn black_ink_stays_off_the_glow_surface() {
    let mut scene = SceneDescription::default();
    scene.hairlines.push(Hairline {
        p0: DVec2::ZERO,
        p1: DVec2::new(300.0, 10.0),
        opacity: 0.5,
        gray: false,
    });
    let mut glow = RecordingSurface::new();
    Compositor::new(1.0).render_glow(&scene, 0.0, 400.0, 400.0, &mut glow);
    assert_eq!(glow.fills(), 0);

    let mut main = RecordingSurface::new();
    Compositor::new(1.0).render_main(&scene, 0.0, 400.0, 400.0, &mut main);
    assert!(main
        .layer_commands(DrawLayer::Hairlines)
        .iter()
        .any(|c| matches!(c, Command::Fill)));
}

#[test]
fn burst_ribbon_has_one_strip_per_line() {
    let geo = burst_geometry(DVec2::new(0.75, 0.25), 180, 120.0, 5, 20250115);
    assert_eq!(geo.line_count(POINTS_PER_LINE), 180);
    assert_eq!(geo.vertices.len(), 180 * POINTS_PER_LINE);
    assert_eq!(geo.indices.len(), 180 * (POINTS_PER_LINE - 1) * 2);
    assert_eq!(
        geo.vertex_bytes().len(),
        geo.vertices.len() * std::mem::size_of::<RibbonVertex>()
    );
    let max_index = *geo.indices.iter().max().unwrap_or(&0) as usize;
    assert!(max_index < geo.vertices.len());

    let capped = burst_geometry(DVec2::ZERO, 10_000, 360.0, 3, 1);
    assert_eq!(capped.line_count(POINTS_PER_LINE), MAX_LINES);
}

#[test]
fn engine_strokes_the_line_burst_over_the_scene() {
    use inkburst_core::{Engine, SceneStore, SeedControl, Surface};

    let mut store = SceneStore::new(SeedControl::with_seed(20250115));
    store.viewport_mut().resize(1920.0, 1080.0);
    store.scroll_mut().apply(0.0, 0.0);
    let mut engine = Engine::new();
    assert_eq!(engine.sync(&store, 1.0).ok(), Some(true));
    assert!(engine.sync_burst(store.seed(), store.scene()));
    assert!(!engine.sync_burst(store.seed(), store.scene()));
    let lines = engine.burst().line_count(POINTS_PER_LINE);
    assert_eq!(lines, 180);

    let frame = *engine.frame();
    let mut scene_only = RecordingSurface::new();
    Compositor::new(frame.pixel_ratio).render_main(
        engine.scene(),
        0.0,
        frame.width,
        frame.canvas_height,
        &mut scene_only,
    );
    let mut painted = RecordingSurface::new();
    engine.paint(0.0, Some(&mut painted as &mut dyn Surface), None);

    let prefix = scene_only.commands().len();
    assert_eq!(&painted.commands()[..prefix], scene_only.commands());
    let burst_strokes = painted.commands()[prefix..]
        .iter()
        .filter(|c| matches!(c, Command::Stroke))
        .count();
    assert_eq!(burst_strokes, lines);
    assert!(!painted.has_non_finite());

    // scrolling into another section regenerates the burst
    store.scroll_mut().apply(0.5, 2400.0);
    assert!(engine.sync_burst(store.seed(), store.scene()));
    assert_eq!(
        engine.burst().line_count(POINTS_PER_LINE),
        store.line_params().count as usize
    );
    // the scene itself is untouched by scrolling
    assert_eq!(engine.sync(&store, 1.0).ok(), Some(false));
}
