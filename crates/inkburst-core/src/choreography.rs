//! Scroll choreography: page progress to section, keyframe and blended
//! scene parameters.
//!
//! Within a section the parameters lean part of the way toward the next
//! section's keyframe along an eased curve. In the last 0.02 of progress
//! before a boundary they finish the trip, so a section's end value is the
//! next section's start value and nothing jumps when the boundary is
//! crossed.

use crate::constants::{COUNT_PULL, DRIFT_X, DRIFT_Y, FOCAL_PULL, PHI_INV, SECTION_HYSTERESIS};
use glam::DVec2;
use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Section {
    #[default]
    Hero,
    About,
    Projects,
    Research,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Hero,
        Section::About,
        Section::Projects,
        Section::Research,
        Section::Contact,
    ];

    /// Inclusive progress range `(start, end)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            Section::Hero => (0.0, 0.18),
            Section::About => (0.18, 0.35),
            Section::Projects => (0.35, 0.70),
            Section::Research => (0.70, 0.88),
            Section::Contact => (0.88, 1.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Projects => "projects",
            Section::Research => "research",
            Section::Contact => "contact",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Following section; the last section is its own successor.
    pub fn next(self) -> Section {
        Section::ALL[(self.index() + 1).min(Section::ALL.len() - 1)]
    }

    pub fn is_first(self) -> bool {
        self == Section::Hero
    }

    pub fn is_last(self) -> bool {
        self == Section::Contact
    }

    pub fn keyframe(self) -> &'static Keyframe {
        &KEYFRAMES[self.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskShape {
    Rectangle,
    Parallelogram,
    Rounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionStyle {
    Convergence,
    Explosion,
    Sweep,
    Radial,
    Settle,
}

/// Sky fragment placement in normalized viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPlacement {
    pub position: [f64; 2],
    pub mask: MaskShape,
    pub opacity: f64,
    pub scale: f64,
}

/// Settled scene parameters for one section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub focal: [f64; 2],
    pub line_count: u32,
    /// Fan width of the burst, degrees.
    pub spread: f64,
    pub complexity: u32,
    /// Degrees.
    pub burst_direction: f64,
    pub sky_fragments: &'static [SkyPlacement],
    pub transition: TransitionStyle,
}

const fn sky(x: f64, y: f64, mask: MaskShape, opacity: f64, scale: f64) -> SkyPlacement {
    SkyPlacement {
        position: [x, y],
        mask,
        opacity,
        scale,
    }
}

use MaskShape::{Parallelogram as Para, Rectangle as Rect, Rounded as Round};

static KEYFRAMES: [Keyframe; 5] = [
    Keyframe {
        focal: [0.75, 0.25],
        line_count: 180,
        spread: 120.0,
        complexity: 5,
        burst_direction: -45.0,
        sky_fragments: &[sky(0.15, 0.3, Rect, 0.7, 0.8), sky(0.85, 0.7, Para, 0.5, 0.6)],
        transition: TransitionStyle::Explosion,
    },
    Keyframe {
        focal: [0.6, 0.5],
        line_count: 120,
        spread: 220.0,
        complexity: 6,
        burst_direction: 30.0,
        sky_fragments: &[
            sky(0.2, 0.4, Round, 0.8, 1.2),
            sky(0.8, 0.2, Rect, 0.5, 0.7),
            sky(0.1, 0.8, Para, 0.4, 0.5),
        ],
        transition: TransitionStyle::Convergence,
    },
    Keyframe {
        focal: [0.4, 0.45],
        line_count: 160,
        spread: 280.0,
        complexity: 5,
        burst_direction: 0.0,
        sky_fragments: &[
            sky(0.85, 0.35, Rect, 0.6, 1.0),
            sky(0.1, 0.6, Round, 0.7, 0.9),
            sky(0.7, 0.8, Para, 0.5, 0.7),
            sky(0.3, 0.15, Rect, 0.4, 0.6),
        ],
        transition: TransitionStyle::Sweep,
    },
    Keyframe {
        focal: [0.5, 0.5],
        line_count: 140,
        spread: 340.0,
        complexity: 4,
        burst_direction: 90.0,
        sky_fragments: &[
            sky(0.8, 0.3, Rect, 0.6, 0.8),
            sky(0.2, 0.7, Round, 0.7, 1.0),
            sky(0.6, 0.9, Para, 0.4, 0.5),
        ],
        transition: TransitionStyle::Radial,
    },
    Keyframe {
        focal: [0.5, 0.6],
        line_count: 80,
        spread: 360.0,
        complexity: 3,
        burst_direction: 180.0,
        sky_fragments: &[sky(0.3, 0.4, Round, 0.8, 1.1), sky(0.75, 0.6, Rect, 0.6, 0.8)],
        transition: TransitionStyle::Settle,
    },
];

/// Where a progress value falls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionProgress {
    pub section: Section,
    pub local_progress: f64,
    pub is_transitioning: bool,
    /// 0 outside the hysteresis bands, rising to 1 at the boundary.
    pub transition_progress: f64,
}

/// Classify `progress` (clamped to [0, 1]). A value exactly on a boundary
/// belongs to the earlier section, at local progress 1.
pub fn current_section(progress: f64) -> SectionProgress {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    for section in Section::ALL {
        let (start, end) = section.range();
        if p >= start && p <= end {
            let span = end - start;
            let lp = (p - start) / span;
            let band = SECTION_HYSTERESIS / span;
            // the page top and bottom have no neighbour to transition to
            let near_start = lp < band && !section.is_first();
            let near_end = lp > 1.0 - band && !section.is_last();
            let transition_progress = if near_end {
                (lp - (1.0 - band)) / band
            } else if near_start {
                1.0 - lp / band
            } else {
                0.0
            };
            return SectionProgress {
                section,
                local_progress: lp,
                is_transitioning: near_start || near_end,
                transition_progress,
            };
        }
    }
    SectionProgress {
        section: Section::Contact,
        local_progress: 1.0,
        is_transitioning: false,
        transition_progress: 0.0,
    }
}

/// One-dimensional cubic Bezier with control values `p0..p3`.
#[inline]
pub fn cubic_bezier_1d(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[inline]
pub fn eased(local_progress: f64) -> f64 {
    cubic_bezier_1d(local_progress, 0.0, 0.1, 0.9, 1.0)
}

/// Exact at both ends: `lerp(a, b, 0) == a`, `lerp(a, b, 1) == b`.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineParams {
    pub count: u32,
    pub spread: f64,
    pub complexity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyFragmentState {
    pub position: [f64; 2],
    pub mask: MaskShape,
    pub opacity: f64,
    pub scale: f64,
}

/// Everything the scroll handler publishes in one update.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub focal: DVec2,
    pub line_params: LineParams,
    pub sky_fragments: Vec<SkyFragmentState>,
    pub transition_phase: f64,
    pub active_section: Section,
    pub local_progress: f64,
    pub burst_direction: f64,
}

impl SceneState {
    /// The settled state of a section: its keyframe verbatim.
    pub fn settled(section: Section) -> Self {
        let k = section.keyframe();
        Self {
            focal: DVec2::from(k.focal),
            line_params: LineParams {
                count: k.line_count,
                spread: k.spread,
                complexity: k.complexity,
            },
            sky_fragments: fragments(k, 1.0),
            transition_phase: 0.0,
            active_section: section,
            local_progress: if section.is_last() { 1.0 } else { 0.0 },
            burst_direction: k.burst_direction,
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::settled(Section::Hero)
    }
}

fn fragments(k: &Keyframe, breathe: f64) -> Vec<SkyFragmentState> {
    k.sky_fragments
        .iter()
        .map(|f| SkyFragmentState {
            position: f.position,
            mask: f.mask,
            opacity: f.opacity * breathe,
            scale: f.scale,
        })
        .collect()
}

/// Map page progress to the blended scene state.
pub fn scene_state(progress: f64) -> SceneState {
    if progress >= 1.0 {
        return SceneState::settled(Section::Contact);
    }
    let sp = current_section(progress);
    let lp = sp.local_progress;
    let cur = sp.section.keyframe();
    let next = sp.section.next().keyframe();

    let e = eased(lp);
    let drift_wave = (lp * TAU).sin();
    let drift = DVec2::new(drift_wave * DRIFT_X * PHI_INV, drift_wave * DRIFT_Y * PHI_INV);
    // finish the pull inside the end band so the boundary is seamless
    let arrive = if sp.is_transitioning && lp > 0.5 {
        smoothstep(sp.transition_progress)
    } else {
        0.0
    };

    let blend = |a: f64, b: f64, pull: f64, wobble: f64| {
        lerp(lerp(a, b, e * pull) + wobble, b, arrive)
    };

    let focal = DVec2::new(
        blend(cur.focal[0], next.focal[0], FOCAL_PULL, drift.x),
        blend(cur.focal[1], next.focal[1], FOCAL_PULL, drift.y),
    );
    let count = blend(cur.line_count as f64, next.line_count as f64, COUNT_PULL, 0.0);
    let spread = blend(cur.spread, next.spread, FOCAL_PULL, 0.0);
    let complexity = blend(cur.complexity as f64, next.complexity as f64, COUNT_PULL, 0.0);
    let burst_direction = blend(cur.burst_direction, next.burst_direction, FOCAL_PULL, 0.0);

    SceneState {
        focal,
        line_params: LineParams {
            count: count.round().max(0.0) as u32,
            spread,
            complexity: complexity.round().max(0.0) as u32,
        },
        sky_fragments: fragments(cur, 0.8 + 0.2 * (lp * PI).sin()),
        transition_phase: if sp.is_transitioning {
            sp.transition_progress
        } else {
            0.0
        },
        active_section: sp.section,
        local_progress: lp,
        burst_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_value_belongs_to_earlier_section() {
        let sp = current_section(0.18);
        assert_eq!(sp.section, Section::Hero);
        assert!((sp.local_progress - 1.0).abs() < 1e-12);
        assert_eq!(current_section(0.1800001).section, Section::About);
    }

    #[test]
    fn top_of_page_is_not_a_transition() {
        let sp = current_section(0.0);
        assert!(!sp.is_transitioning);
        assert_eq!(scene_state(0.0).transition_phase, 0.0);
    }

    #[test]
    fn out_of_range_progress_clamps() {
        assert_eq!(scene_state(-3.0), scene_state(0.0));
        assert_eq!(scene_state(7.0), SceneState::settled(Section::Contact));
        assert_eq!(current_section(f64::NAN).section, Section::Hero);
    }

    #[test]
    fn mid_section_leans_toward_next_keyframe() {
        let s = scene_state(0.09);
        let hero = Section::Hero.keyframe();
        let about = Section::About.keyframe();
        assert!(s.burst_direction > hero.burst_direction);
        assert!(s.burst_direction < about.burst_direction);
    }
}
