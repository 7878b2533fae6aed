// Host-side tests for scroll choreography.

use glam::DVec2;
use inkburst_core::choreography::current_section;
use inkburst_core::{scene_state, SceneState, Section};

const EPS: f64 = 1e-9;

#[test]
fn top_of_page_is_the_hero_keyframe_exactly() {
    let s = scene_state(0.0);
    let hero = Section::Hero.keyframe();
    assert_eq!(s.active_section, Section::Hero);
    assert_eq!(s.focal, DVec2::from(hero.focal));
    assert_eq!(s.line_params.count, hero.line_count);
    assert_eq!(s.line_params.spread, hero.spread);
    assert_eq!(s.line_params.complexity, hero.complexity);
    assert_eq!(s.burst_direction, hero.burst_direction);
    assert_eq!(s.transition_phase, 0.0);
}

#[test]
fn bottom_of_page_is_contact_settled() {
    let s = scene_state(1.0);
    assert_eq!(s, SceneState::settled(Section::Contact));
    let contact = Section::Contact.keyframe();
    assert_eq!(s.focal, DVec2::from(contact.focal));
    assert_eq!(s.line_params.count, contact.line_count);
    assert_eq!(s.transition_phase, 0.0);
}

#[test]
fn sections_tile_the_progress_range() {
    let mut prev_end = 0.0;
    for section in Section::ALL {
        let (start, end) = section.range();
        assert_eq!(start, prev_end);
        assert!(end > start);
        prev_end = end;
    }
    assert_eq!(prev_end, 1.0);
}

#[test]
fn active_section_never_moves_backwards() {
    let mut last = Section::Hero;
    for i in 0..=1000 {
        let section = scene_state(i as f64 / 1000.0).active_section;
        assert!(section >= last);
        last = section;
    }
    assert_eq!(last, Section::Contact);
}

#[test]
fn crossing_a_boundary_does_not_jump() {
    for section in &Section::ALL[..4] {
        let (_, end) = section.range();
        let before = scene_state(end);
        let after = scene_state(end + EPS);
        assert_eq!(before.active_section, *section);
        assert_eq!(after.active_section, section.next());
        assert!(
            before.focal.distance(after.focal) < 1e-4,
            "focal jumps at {end}: {} vs {}",
            before.focal,
            after.focal
        );
        assert!((before.line_params.spread - after.line_params.spread).abs() < 1e-3);
        assert!((before.burst_direction - after.burst_direction).abs() < 1e-3);
        assert_eq!(before.line_params.count, after.line_params.count);
        assert_eq!(before.line_params.complexity, after.line_params.complexity);
    }
}

#[test]
fn transition_phase_rises_toward_each_boundary() {
    let (_, end) = Section::About.range();
    assert_eq!(scene_state(end - 0.05).transition_phase, 0.0);
    let near = scene_state(end - 0.015).transition_phase;
    let nearer = scene_state(end - 0.005).transition_phase;
    assert!(near > 0.0 && nearer > near && nearer <= 1.0);
    assert!(current_section(end - 0.005).is_transitioning);
}
