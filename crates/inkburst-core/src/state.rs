//! Application state shared between the event handlers and the renderers.
//!
//! Each field group has exactly one producer. [`SceneStore::producers`]
//! hands out all five `&mut` groups at once, so two producers can never
//! write the same field; consumers read through the store's getters.

use crate::choreography::{scene_state, LineParams, SceneState, Section, SkyFragmentState};
use crate::seed::{CalendarDate, SeedControl};
use crate::tier::DeviceTier;
use glam::DVec2;

/// Written by the scroll handler.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFields {
    pub progress: f64,
    pub scroll_y: f64,
    pub scene: SceneState,
}

impl Default for ScrollFields {
    fn default() -> Self {
        Self {
            progress: 0.0,
            scroll_y: 0.0,
            scene: SceneState::default(),
        }
    }
}

impl ScrollFields {
    /// Recompute the scene state for `progress` and store it in one update.
    pub fn apply(&mut self, progress: f64, scroll_y: f64) -> &SceneState {
        self.progress = progress.clamp(0.0, 1.0);
        self.scroll_y = scroll_y;
        self.scene = scene_state(self.progress);
        &self.scene
    }
}

/// Written by the (debounced) resize handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFields {
    pub width: f64,
    pub height: f64,
    pub tier: DeviceTier,
    /// Tier forced by configuration; resizes keep it.
    pub forced_tier: Option<DeviceTier>,
}

impl Default for ViewportFields {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            tier: DeviceTier::Desktop,
            forced_tier: None,
        }
    }
}

impl ViewportFields {
    /// Store the new size; returns true when the tier changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.width = width;
        self.height = height;
        let tier = self
            .forced_tier
            .unwrap_or_else(|| DeviceTier::from_width(width));
        let changed = tier != self.tier;
        self.tier = tier;
        changed
    }
}

/// Written by the seed control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedFields {
    pub control: SeedControl,
}

impl SeedFields {
    pub fn seed(&self) -> i32 {
        self.control.seed()
    }
}

/// Written by the reduced-motion media query listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionFields {
    pub reduced_motion: bool,
}

/// Written by the pointer throttle; normalized [0, 1] coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFields {
    pub position: DVec2,
}

impl Default for PointerFields {
    fn default() -> Self {
        Self {
            position: DVec2::splat(0.5),
        }
    }
}

/// Mutable handles to every field group, one per producer.
pub struct Producers<'a> {
    pub scroll: &'a mut ScrollFields,
    pub viewport: &'a mut ViewportFields,
    pub seed: &'a mut SeedFields,
    pub motion: &'a mut MotionFields,
    pub pointer: &'a mut PointerFields,
}

/// What a scene rebuild depends on. Scroll never changes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RebuildKey {
    pub width: f64,
    pub height: f64,
    pub tier: DeviceTier,
    pub seed: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneStore {
    scroll: ScrollFields,
    viewport: ViewportFields,
    seed: SeedFields,
    motion: MotionFields,
    pointer: PointerFields,
}

impl SceneStore {
    pub fn new(seed: SeedControl) -> Self {
        Self {
            scroll: ScrollFields::default(),
            viewport: ViewportFields::default(),
            seed: SeedFields { control: seed },
            motion: MotionFields::default(),
            pointer: PointerFields::default(),
        }
    }

    pub fn for_date(date: CalendarDate) -> Self {
        Self::new(SeedControl::for_date(date))
    }

    pub fn producers(&mut self) -> Producers<'_> {
        Producers {
            scroll: &mut self.scroll,
            viewport: &mut self.viewport,
            seed: &mut self.seed,
            motion: &mut self.motion,
            pointer: &mut self.pointer,
        }
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollFields {
        &mut self.scroll
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportFields {
        &mut self.viewport
    }

    pub fn seed_mut(&mut self) -> &mut SeedFields {
        &mut self.seed
    }

    pub fn motion_mut(&mut self) -> &mut MotionFields {
        &mut self.motion
    }

    pub fn pointer_mut(&mut self) -> &mut PointerFields {
        &mut self.pointer
    }

    pub fn scene(&self) -> &SceneState {
        &self.scroll.scene
    }

    pub fn progress(&self) -> f64 {
        self.scroll.progress
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll.scroll_y
    }

    pub fn active_section(&self) -> Section {
        self.scroll.scene.active_section
    }

    pub fn focal(&self) -> DVec2 {
        self.scroll.scene.focal
    }

    pub fn line_params(&self) -> LineParams {
        self.scroll.scene.line_params
    }

    pub fn sky_fragments(&self) -> &[SkyFragmentState] {
        &self.scroll.scene.sky_fragments
    }

    pub fn transition_phase(&self) -> f64 {
        self.scroll.scene.transition_phase
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn tier(&self) -> DeviceTier {
        self.viewport.tier
    }

    pub fn seed(&self) -> i32 {
        self.seed.seed()
    }

    pub fn reduced_motion(&self) -> bool {
        self.motion.reduced_motion
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer.position
    }

    pub fn rebuild_key(&self) -> RebuildKey {
        RebuildKey {
            width: self.viewport.width,
            height: self.viewport.height,
            tier: self.viewport.tier,
            seed: self.seed.seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_tier_survives_resize() {
        let mut v = ViewportFields {
            forced_tier: Some(DeviceTier::Mobile),
            ..Default::default()
        };
        assert!(v.resize(1920.0, 1080.0));
        assert_eq!(v.tier, DeviceTier::Mobile);
        assert!(!v.resize(800.0, 600.0));
    }
}
