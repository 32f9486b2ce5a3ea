//! Maps trolley progress onto screen coordinates.
//!
//! The trolley travels from its start offset towards the viewport edge picked
//! by the sign of each direction component. The magnitude of a component
//! scales how much of the available travel is used on that axis.

use crate::progress::Progress;
use glam::Vec2;

/// Fixed travel parameters for one page load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackLayout {
    /// Signed weights in `[-1, 1]`; `+x` is right, `+y` is down.
    pub direction: Vec2,
    /// Start position in CSS pixels.
    pub start: Vec2,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            direction: crate::constants::DIRECTION,
            start: crate::constants::START_OFFSET,
        }
    }
}

impl TrackLayout {
    /// Offset of the element's top-left corner for `progress`.
    ///
    /// Never negative and never past `viewport - element` on either axis,
    /// even when the element is larger than the viewport.
    pub fn position(&self, progress: Progress, element: Vec2, viewport: Vec2) -> Vec2 {
        let limit = (viewport - element).max(Vec2::ZERO);
        let f = progress.fraction();
        let x = axis_offset(self.start.x, self.direction.x, limit.x, f);
        let y = axis_offset(self.start.y, self.direction.y, limit.y, f);
        Vec2::new(x, y).clamp(Vec2::ZERO, limit)
    }
}

#[inline]
fn axis_offset(start: f32, direction: f32, limit: f32, fraction: f32) -> f32 {
    let travel = if direction > 0.0 {
        (limit - start).max(0.0)
    } else {
        start.max(0.0)
    };
    start + (fraction * travel * direction).round()
}
