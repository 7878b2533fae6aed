//! Width profiles along a stroke.
//!
//! A [`Taper`] is a small `Copy` value rather than a closure so scene
//! descriptions stay comparable and cheap to clone. Its noise term is seeded
//! by the stroke's own max width, not by the scene RNG.

use std::f64::consts::PI;

/// Envelope family for a stroke's width along normalized arc length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaperClass {
    /// `(1 - t)^1.6`: full at the origin, decaying to a point.
    ExponentialDecay,
    /// `0.15 + 0.85 sin(0.85πt + 0.15)`: quick onset, soft tail.
    EasedSine,
    /// `sin(πt)`: thin at both ends.
    Sine,
    /// Sine ease-in over the first 15%, then a `^1.5` taper to a point.
    CalligraphicEase,
    /// `sin(πt)^0.55`: broad body, thin tips.
    OrganicDoubleTaper,
}

impl TaperClass {
    /// Brush classes indexed the way the scene builder rolls them.
    pub fn brush_from_index(i: usize) -> Self {
        match i {
            0 => TaperClass::ExponentialDecay,
            1 => TaperClass::EasedSine,
            _ => TaperClass::Sine,
        }
    }

    pub fn is_calligraphic(self) -> bool {
        matches!(
            self,
            TaperClass::CalligraphicEase | TaperClass::OrganicDoubleTaper
        )
    }

    fn envelope(self, t: f64) -> f64 {
        match self {
            TaperClass::ExponentialDecay => (1.0 - t).max(0.0).powf(1.6),
            TaperClass::EasedSine => 0.15 + 0.85 * (t * PI * 0.85 + 0.15).sin(),
            TaperClass::Sine => (t * PI).sin(),
            TaperClass::CalligraphicEase => {
                if t < 0.15 {
                    (t / 0.15 * PI / 2.0).sin()
                } else {
                    (1.0 - (t - 0.15) / 0.85).max(0.0).powf(1.5)
                }
            }
            // sin(πt) dips a hair below zero at t = 1 in floating point
            TaperClass::OrganicDoubleTaper => (t * PI).sin().max(0.0).powf(0.55),
        }
    }
}

/// Width function `t ↦ width` for one stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Taper {
    pub max_width: f64,
    pub class: TaperClass,
}

impl Taper {
    pub const BRUSH_FLOOR: f64 = 0.5;
    pub const INK_FLOOR: f64 = 1.0;

    pub fn new(max_width: f64, class: TaperClass) -> Self {
        Self { max_width, class }
    }

    /// Chrome brush taper from the builder's `0..3` roll.
    pub fn brush(max_width: f64, roll: usize) -> Self {
        Self::new(max_width, TaperClass::brush_from_index(roll))
    }

    /// Calligraphic ink taper; variant 0 eases in, anything else is the
    /// organic double taper.
    pub fn ink(max_width: f64, variant: usize) -> Self {
        let class = if variant == 0 {
            TaperClass::CalligraphicEase
        } else {
            TaperClass::OrganicDoubleTaper
        };
        Self::new(max_width, class)
    }

    /// Smallest width this taper ever returns.
    pub fn floor(&self) -> f64 {
        if self.class.is_calligraphic() {
            Self::INK_FLOOR
        } else {
            Self::BRUSH_FLOOR
        }
    }

    pub fn width(&self, t: f64) -> f64 {
        let env = self.class.envelope(t);
        let noise = if self.class.is_calligraphic() {
            0.96 + 0.04 * (t * 19.7 + self.max_width).sin()
        } else {
            0.93 + 0.07 * (t * 17.3 + self.max_width).sin()
        };
        let w = self.max_width * env * noise;
        // NaN-safe: f64::max returns the non-NaN operand
        w.max(self.floor())
    }

    /// Index and value of the widest sample over `n` evenly spaced points.
    pub fn widest(&self, n: usize) -> (usize, f64) {
        let mut best = (0, 0.0);
        if n < 2 {
            return (0, self.width(0.0));
        }
        for i in 0..n {
            let w = self.width(i as f64 / (n - 1) as f64);
            if w > best.1 {
                best = (i, w);
            }
        }
        best
    }
}
