pub mod builder;
pub mod burst;
pub mod choreography;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod render;
pub mod rng;
pub mod scene;
pub mod schedule;
pub mod seed;
pub mod state;
pub mod taper;
pub mod tier;

pub use builder::{build_scene, BuildParams, SceneFrame};
pub use choreography::{scene_state, SceneState, Section};
pub use error::SceneError;
pub use overlay::OverlayPlan;
pub use render::{Compositor, DrawLayer, RecordingSurface, Surface};
pub use rng::Mulberry32;
pub use scene::SceneDescription;
pub use seed::{daily_seed, CalendarDate, SeedControl};
pub use state::SceneStore;
pub use tier::DeviceTier;

use burst::{burst_geometry, paint_burst, RibbonGeometry};
use state::RebuildKey;

/// Inputs the line burst is regenerated from.
type BurstKey = (i32, Section, u32, u32);

/// Scene built for one viewport, tier and seed, plus the compositor that
/// paints it. Rebuilds only when the [`RebuildKey`] changes.
pub struct Engine {
    key: Option<RebuildKey>,
    frame: SceneFrame,
    scene: SceneDescription,
    compositor: Compositor,
    builds: u32,
    burst: RibbonGeometry,
    burst_key: Option<BurstKey>,
}

impl Engine {
    pub fn new() -> Self {
        let frame = SceneFrame::for_viewport(1.0, 1.0, DeviceTier::Desktop);
        Self {
            key: None,
            frame,
            scene: SceneDescription::default(),
            compositor: Compositor::new(frame.pixel_ratio),
            builds: 0,
            burst: RibbonGeometry::default(),
            burst_key: None,
        }
    }

    /// Rebuild if the store's viewport, tier or seed moved since the last
    /// build. Returns true when a new scene was generated.
    pub fn sync(&mut self, store: &SceneStore, device_pixel_ratio: f64) -> Result<bool, SceneError> {
        let key = store.rebuild_key();
        if self.key == Some(key) {
            return Ok(false);
        }
        let frame = SceneFrame::try_for_viewport(key.width, key.height, key.tier)?
            .with_device_pixel_ratio(device_pixel_ratio);
        let mut rng = Mulberry32::new(key.seed);
        self.scene = build_scene(&BuildParams::from_frame(&frame), &mut rng);
        self.frame = frame;
        self.compositor = Compositor::new(frame.pixel_ratio);
        self.key = Some(key);
        self.builds += 1;
        log::debug!(
            "[engine] rebuilt seed={} {}x{} tier={} primitives={}",
            key.seed,
            frame.width,
            frame.viewport_height,
            key.tier.name(),
            self.scene.primitive_count()
        );
        Ok(true)
    }

    /// Regenerate the line burst when the seed, the active section or the
    /// line params moved. Focal point and spread are taken as of the
    /// rebuild. Returns true when new geometry was built.
    pub fn sync_burst(&mut self, seed: i32, state: &SceneState) -> bool {
        let params = state.line_params;
        let key = (seed, state.active_section, params.count, params.complexity);
        if self.burst_key == Some(key) {
            return false;
        }
        self.burst = burst_geometry(state.focal, params.count, params.spread, params.complexity, seed);
        self.burst_key = Some(key);
        log::debug!(
            "[engine] burst seed={seed} section={} lines={}",
            state.active_section.name(),
            self.burst.line_count(burst::POINTS_PER_LINE)
        );
        true
    }

    /// Paint both layers at `scroll_y`, the line burst over the main one.
    /// A missing surface skips its layer.
    pub fn paint(
        &self,
        scroll_y: f64,
        main: Option<&mut dyn Surface>,
        glow: Option<&mut dyn Surface>,
    ) {
        let (width, height) = (self.frame.width, self.frame.canvas_height);
        if let Some(m) = main {
            self.compositor.render_main(&self.scene, scroll_y, width, height, m);
            paint_burst(m, &self.burst, &self.frame);
        }
        if let Some(g) = glow {
            self.compositor.render_glow(&self.scene, scroll_y, width, height, g);
        }
    }

    pub fn burst(&self) -> &RibbonGeometry {
        &self.burst
    }

    pub fn frame(&self) -> &SceneFrame {
        &self.frame
    }

    pub fn scene(&self) -> &SceneDescription {
        &self.scene
    }

    /// Scenes generated so far.
    pub fn builds(&self) -> u32 {
        self.builds
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
