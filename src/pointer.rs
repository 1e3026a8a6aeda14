//! Virtual pointer driven by head pose while aiming.

use crate::{
    config::PointerConfig,
    filters::{exponential::ExponentialFilter, PoseFilter},
    smoothing::AdjustedPose,
};
use serde::Serialize;

/// Pointer position, normalized to [0, 1] on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    /// Center of the viewport
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };
}

impl Default for Pointer {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Maps adjusted yaw/pitch to a pointer position with extra smoothing
///
/// The pose is already smoothed once; the second, lighter filter removes the
/// remaining jitter that is visible at pointer scale.
pub struct PointerTracker {
    config: PointerConfig,
    filter: ExponentialFilter,
    frozen: bool,
}

impl PointerTracker {
    /// Create a tracker centered in the viewport
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(config: PointerConfig, alpha: f64) -> Self {
        Self {
            config,
            filter: ExponentialFilter::with_initial(alpha, Pointer::CENTER.x, Pointer::CENTER.y),
            frozen: false,
        }
    }

    /// Track the pose unless frozen; returns the current position
    pub fn update(&mut self, pose: AdjustedPose) -> Pointer {
        if !self.frozen {
            let target_x = self.map_axis(pose.yaw, self.config.yaw_range_deg);
            let target_y = self.map_axis(pose.pitch, self.config.pitch_range_deg);
            self.filter.apply(target_x, target_y);
        }
        self.position()
    }

    /// Current position
    #[must_use]
    pub fn position(&self) -> Pointer {
        let (x, y) = self.filter.current();
        Pointer { x, y }
    }

    /// Hold the pointer still, or release it
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Whether the pointer is holding still
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Return to the center and unfreeze
    pub fn recenter(&mut self) {
        self.filter.reset();
        self.frozen = false;
    }

    fn map_axis(&self, angle: f64, range: f64) -> f64 {
        0.5_f64
            .mul_add(angle / range.max(f64::EPSILON), 0.5)
            .clamp(self.config.min, self.config.max)
    }
}
