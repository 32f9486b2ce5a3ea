use crate::constants::{PROGRESS_MAX, PROGRESS_MIN};

/// Clamp `value` into `[min, max]`. NaN collapses to `min`.
#[inline]
pub fn clamp(min: f32, value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Trolley advancement on the 0–100 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Progress(f32);

impl Progress {
    pub const ZERO: Progress = Progress(PROGRESS_MIN);
    pub const FULL: Progress = Progress(PROGRESS_MAX);

    pub fn new(percent: f32) -> Self {
        Self(clamp(PROGRESS_MIN, percent, PROGRESS_MAX))
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Fraction of the track covered, in `[0, 1]`.
    #[inline]
    pub fn fraction(self) -> f32 {
        self.0 / PROGRESS_MAX
    }

    /// Advance by a non-negative step; negative steps are treated as zero.
    pub fn advanced_by(self, step: f32) -> Self {
        Self::new(self.0 + step.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_stays_in_range_for_extremes() {
        for v in [-1e9, -1.0, 0.0, 42.5, 100.0, 100.1, 1e9, f32::INFINITY, f32::NEG_INFINITY] {
            let c = clamp(0.0, v, 100.0);
            assert!((0.0..=100.0).contains(&c), "{v} clamped to {c}");
        }
        assert_eq!(clamp(0.0, f32::NAN, 100.0), 0.0);
    }

    #[test]
    fn advance_never_goes_backwards() {
        let p = Progress::new(10.0);
        assert_eq!(p.advanced_by(-5.0), p);
        assert_eq!(Progress::new(99.9).advanced_by(1.0), Progress::FULL);
    }
}
