//! Head-driven adjustment of scroll settings.
//!
//! While settings mode is active, turning the head selects which setting is
//! edited and tilting it sets the value. Both are measured from the pose at
//! the moment the mode was entered.

use crate::{
    config::{ScrollConfig, SettingsAdjustConfig},
    constants::{DEFAULT_DEAD_ZONE_DEG, DEFAULT_MAX_SPEED},
    smoothing::AdjustedPose,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Setting targeted by head yaw in settings mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    /// Scroll dead zone, selected by turning left
    #[default]
    DeadZone,
    /// Maximum scroll speed, selected by turning right
    MaxSpeed,
}

/// Edits scroll settings from head pose
#[derive(Debug, Clone)]
pub struct SettingsAdjuster {
    config: SettingsAdjustConfig,
    zero: AdjustedPose,
    selected: SettingKind,
}

impl SettingsAdjuster {
    /// Create an adjuster with the dead zone selected
    #[must_use]
    pub fn new(config: SettingsAdjustConfig) -> Self {
        Self {
            config,
            zero: AdjustedPose::default(),
            selected: SettingKind::default(),
        }
    }

    /// Start a session using `pose` as the zero reference
    ///
    /// The selection carries over from the previous session.
    pub fn begin(&mut self, pose: AdjustedPose) {
        self.zero = pose;
    }

    /// Currently selected setting
    #[must_use]
    pub const fn selected(&self) -> SettingKind {
        self.selected
    }

    /// Apply this frame's pose to `scroll`; returns true if a value changed
    pub fn update(&mut self, pose: AdjustedPose, scroll: &mut ScrollConfig) -> bool {
        let pitch_delta = pose.pitch - self.zero.pitch;
        let yaw_delta = pose.yaw - self.zero.yaw;

        // Inside the band the previous selection is kept
        let selected = if yaw_delta < -self.config.selection_band_deg {
            SettingKind::DeadZone
        } else if yaw_delta > self.config.selection_band_deg {
            SettingKind::MaxSpeed
        } else {
            self.selected
        };
        if selected != self.selected {
            debug!("Settings selection changed to {selected:?}");
            self.selected = selected;
        }

        let ratio = pitch_delta / self.config.pitch_span_deg.max(f64::EPSILON);
        match self.selected {
            SettingKind::DeadZone => {
                let value = self
                    .config
                    .clamp_dead_zone(ratio.mul_add(self.config.dead_zone_span, DEFAULT_DEAD_ZONE_DEG));
                replace(&mut scroll.dead_zone_deg, value)
            }
            SettingKind::MaxSpeed => {
                let value = self
                    .config
                    .clamp_max_speed(ratio.mul_add(self.config.max_speed_span, DEFAULT_MAX_SPEED));
                replace(&mut scroll.max_speed, value)
            }
        }
    }
}

fn replace(slot: &mut f64, value: f64) -> bool {
    if (*slot - value).abs() > f64::EPSILON {
        *slot = value;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(pitch: f64, yaw: f64) -> AdjustedPose {
        AdjustedPose { pitch, yaw }
    }

    #[test]
    fn test_level_head_restores_defaults() {
        let mut adjuster = SettingsAdjuster::new(SettingsAdjustConfig::default());
        let mut scroll = ScrollConfig {
            dead_zone_deg: 7.0,
            ..ScrollConfig::default()
        };
        adjuster.begin(pose(2.0, 1.0));
        assert!(adjuster.update(pose(2.0, 1.0), &mut scroll));
        assert_eq!(scroll.dead_zone_deg, DEFAULT_DEAD_ZONE_DEG);
    }

    #[test]
    fn test_full_span_tilt() {
        let mut adjuster = SettingsAdjuster::new(SettingsAdjustConfig::default());
        let mut scroll = ScrollConfig::default();
        adjuster.update(pose(15.0, 0.0), &mut scroll);
        assert!((scroll.dead_zone_deg - 8.0).abs() < 1e-9);
        adjuster.update(pose(-15.0, 0.0), &mut scroll);
        assert_eq!(scroll.dead_zone_deg, 1.0);
    }

    #[test]
    fn test_yaw_selects_with_hysteresis() {
        let mut adjuster = SettingsAdjuster::new(SettingsAdjustConfig::default());
        let mut scroll = ScrollConfig::default();

        adjuster.update(pose(0.0, 4.0), &mut scroll);
        assert_eq!(adjuster.selected(), SettingKind::MaxSpeed);

        // Back inside the band keeps the selection
        adjuster.update(pose(0.0, -2.9), &mut scroll);
        assert_eq!(adjuster.selected(), SettingKind::MaxSpeed);

        adjuster.update(pose(0.0, -3.1), &mut scroll);
        assert_eq!(adjuster.selected(), SettingKind::DeadZone);
    }

    #[test]
    fn test_max_speed_clamped() {
        let mut adjuster = SettingsAdjuster::new(SettingsAdjustConfig::default());
        let mut scroll = ScrollConfig::default();
        adjuster.update(pose(1000.0, 5.0), &mut scroll);
        assert_eq!(scroll.max_speed, 3000.0);
        adjuster.update(pose(-1000.0, 5.0), &mut scroll);
        assert_eq!(scroll.max_speed, 200.0);
        // Dead zone untouched while max speed is selected
        assert_eq!(scroll.dead_zone_deg, DEFAULT_DEAD_ZONE_DEG);
    }

    #[test]
    fn test_unchanged_value_reports_no_change() {
        let mut adjuster = SettingsAdjuster::new(SettingsAdjustConfig::default());
        let mut scroll = ScrollConfig::default();
        assert!(!adjuster.update(pose(0.0, 0.0), &mut scroll));
    }
}
