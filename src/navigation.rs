//! Yaw-hold navigation gesture.
//!
//! Turning the head past the yaw threshold and holding it there for the hold
//! duration navigates back (left) or forward (right). A hold that keeps going
//! re-arms after firing and repeats once per hold duration.

use crate::timer::DwellTimer;
use log::{debug, info};
use serde::Serializer;

/// Navigation direction selected by head yaw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// Head turned left
    Back,
    /// Head turned right
    Forward,
}

impl NavDirection {
    /// Signed representation: -1 for back, +1 for forward
    #[must_use]
    pub const fn signum(self) -> i8 {
        match self {
            Self::Back => -1,
            Self::Forward => 1,
        }
    }
}

/// Serialize an optional direction as -1, 0 or +1
pub(crate) fn serialize_signed<S: Serializer>(
    direction: &Option<NavDirection>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i8(direction.map_or(0, NavDirection::signum))
}

/// Per-frame result of the navigator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavUpdate {
    /// Direction currently being held, if any
    pub direction: Option<NavDirection>,
    /// Hold progress (0.0-1.0)
    pub progress: f64,
    /// Direction that completed on this frame
    pub fired: Option<NavDirection>,
}

/// Tracks a sustained yaw beyond the threshold
#[derive(Debug, Clone)]
pub struct YawHoldNavigator {
    yaw_threshold: f64,
    hold_duration: f64,
    direction: Option<NavDirection>,
    timer: DwellTimer,
}

impl YawHoldNavigator {
    /// Create a navigator with a yaw threshold (degrees) and hold duration (seconds)
    #[must_use]
    pub const fn new(yaw_threshold: f64, hold_duration: f64) -> Self {
        Self {
            yaw_threshold,
            hold_duration,
            direction: None,
            timer: DwellTimer::new(),
        }
    }

    /// Advance with this frame's adjusted yaw
    pub fn update(&mut self, adjusted_yaw: f64, now: f64) -> NavUpdate {
        let wanted = if adjusted_yaw < -self.yaw_threshold {
            Some(NavDirection::Back)
        } else if adjusted_yaw > self.yaw_threshold {
            Some(NavDirection::Forward)
        } else {
            None
        };

        let Some(direction) = wanted else {
            // No grace period: progress drops as soon as yaw is back inside the band
            self.reset();
            return NavUpdate::default();
        };

        if self.direction != Some(direction) {
            debug!("Yaw hold started toward {direction:?} at {now:.3}s");
            self.timer.clear();
            self.direction = Some(direction);
        }

        let elapsed = self.timer.hold(now);
        let progress = (elapsed / self.hold_duration.max(f64::EPSILON)).clamp(0.0, 1.0);
        let fired = if elapsed >= self.hold_duration {
            info!("Yaw hold complete, navigating {direction:?}");
            // Restart timing on the next frame
            self.timer.clear();
            Some(direction)
        } else {
            None
        };

        NavUpdate {
            direction: Some(direction),
            progress,
            fired,
        }
    }

    /// Drop any hold in progress
    pub fn reset(&mut self) {
        self.direction = None;
        self.timer.clear();
    }
}
