//! Pose smoothing and neutral-pose calibration.
//!
//! Raw pitch and yaw are low-pass filtered, then expressed relative to a
//! neutral baseline captured by calibration.

use crate::filters::PoseFilter;

/// Smoothed head pose together with the calibrated neutral baseline
pub struct PoseSmoother {
    filter: Box<dyn PoseFilter>,
    neutral_pitch: f64,
    neutral_yaw: f64,
}

/// Head angles relative to the neutral pose (degrees)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdjustedPose {
    /// Positive when the head tilts up
    pub pitch: f64,
    /// Positive when the head turns right
    pub yaw: f64,
}

impl PoseSmoother {
    /// Create a smoother around the given filter
    #[must_use]
    pub fn new(filter: Box<dyn PoseFilter>) -> Self {
        Self {
            filter,
            neutral_pitch: 0.0,
            neutral_yaw: 0.0,
        }
    }

    /// Feed a raw sample and return the adjusted pose
    pub fn update(&mut self, raw_pitch: f64, raw_yaw: f64) -> AdjustedPose {
        self.filter.apply(raw_pitch, raw_yaw);
        self.adjusted()
    }

    /// Adjusted pose for the most recent sample
    #[must_use]
    pub fn adjusted(&self) -> AdjustedPose {
        let (pitch, yaw) = self.filter.current();
        AdjustedPose {
            pitch: pitch - self.neutral_pitch,
            yaw: yaw - self.neutral_yaw,
        }
    }

    /// Capture the current smoothed pose as the new neutral baseline
    pub fn calibrate_neutral(&mut self) {
        let (pitch, yaw) = self.filter.current();
        self.neutral_pitch = pitch;
        self.neutral_yaw = yaw;
    }

    /// Name of the underlying filter
    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.filter.name()
    }
}
