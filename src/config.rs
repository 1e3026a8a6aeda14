//! Configuration management for the gesture engine

use crate::{
    constants::{
        AIM_ENTRY_DURATION_S, CALIBRATE_DURATION_S, CALIBRATION_PROGRESS_START_S, DEAD_ZONE_MAX_DEG,
        DEAD_ZONE_MIN_DEG, DEFAULT_DEAD_ZONE_DEG, DEFAULT_MAX_ANGLE_DEG, DEFAULT_MAX_SPEED, EYE_CLOSE_THRESHOLD,
        GRACE_DELAY_S, MAX_SPEED_MAX, MAX_SPEED_MIN, MOUTH_OPEN_THRESHOLD, MOUTH_TOGGLE_DELAY_S,
        NAV_HOLD_DURATION_S, NAV_YAW_THRESHOLD_DEG, POINTER_MAX, POINTER_MIN, POINTER_PITCH_RANGE_DEG,
        POINTER_SMOOTHING_ALPHA, POINTER_YAW_RANGE_DEG, SETTINGS_DEAD_ZONE_SPAN, SETTINGS_MAX_SPEED_SPAN,
        SETTINGS_PITCH_SPAN_DEG, SETTINGS_SELECTION_BAND_DEG, TAP_CONFIRM_DURATION_S,
    },
    filters::{create_filter, PoseFilter},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-adjustable scroll parameters
    pub scroll: ScrollConfig,

    /// Gesture thresholds and dwell timings
    pub gestures: GestureConfig,

    /// Smoothing filters
    pub smoothing: SmoothingConfig,

    /// Aiming pointer mapping
    pub pointer: PointerConfig,

    /// Head-driven settings adjustment
    pub settings_adjust: SettingsAdjustConfig,
}

/// Scroll parameters the user can change at runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Angular band around neutral that produces no scrolling (degrees)
    pub dead_zone_deg: f64,

    /// Pitch at which scroll speed saturates (degrees)
    pub max_angle_deg: f64,

    /// Scroll speed at saturation (points per second)
    pub max_speed: f64,

    /// Reverse the scroll direction
    pub inverted: bool,

    /// Master switch for scroll output
    pub enabled: bool,
}

/// Gesture thresholds and dwell timings, all in seconds unless noted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Closure time before any gesture progress is shown
    pub grace_delay: f64,

    /// Closure time that enters aim mode from scrolling
    pub aim_entry_duration: f64,

    /// Closure time that confirms a tap while aiming
    pub tap_confirm_duration: f64,

    /// Closure time that recalibrates the neutral pose
    pub calibrate_duration: f64,

    /// Closure time at which the calibration indicator starts
    pub calibration_progress_start: f64,

    /// Blink coefficient above which an eye counts as closed (0.0-1.0)
    pub eye_close_threshold: f64,

    /// Jaw-open intensity above which the mouth counts as open (0.0-1.0)
    pub mouth_open_threshold: f64,

    /// Mouth-open duration that toggles settings mode
    pub mouth_toggle_delay: f64,

    /// Yaw beyond which a navigation hold starts (degrees)
    pub nav_yaw_threshold: f64,

    /// Hold duration that fires navigation
    pub nav_hold_duration: f64,
}

/// Smoothing filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter applied to raw pitch/yaw, as a `create_filter` spec
    pub pose_filter: String,

    /// Secondary smoothing factor for the aiming pointer
    pub pointer_alpha: f64,
}

/// Aiming pointer mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Yaw that moves the pointer from center to edge (degrees)
    pub yaw_range_deg: f64,

    /// Pitch that moves the pointer from center to edge (degrees)
    pub pitch_range_deg: f64,

    /// Lower pointer bound (normalized)
    pub min: f64,

    /// Upper pointer bound (normalized)
    pub max: f64,
}

/// Head-driven settings adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsAdjustConfig {
    /// Yaw offset that switches the selected setting (degrees)
    pub selection_band_deg: f64,

    /// Pitch offset that produces a full span of adjustment (degrees)
    pub pitch_span_deg: f64,

    /// Dead-zone change at a full pitch span (degrees)
    pub dead_zone_span: f64,

    /// Max-speed change at a full pitch span
    pub max_speed_span: f64,

    /// Dead-zone bounds (degrees)
    pub dead_zone_min: f64,
    pub dead_zone_max: f64,

    /// Max-speed bounds
    pub max_speed_min: f64,
    pub max_speed_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            gestures: GestureConfig::default(),
            smoothing: SmoothingConfig::default(),
            pointer: PointerConfig::default(),
            settings_adjust: SettingsAdjustConfig::default(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            dead_zone_deg: DEFAULT_DEAD_ZONE_DEG,
            max_angle_deg: DEFAULT_MAX_ANGLE_DEG,
            max_speed: DEFAULT_MAX_SPEED,
            inverted: false,
            enabled: true,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            grace_delay: GRACE_DELAY_S,
            aim_entry_duration: AIM_ENTRY_DURATION_S,
            tap_confirm_duration: TAP_CONFIRM_DURATION_S,
            calibrate_duration: CALIBRATE_DURATION_S,
            calibration_progress_start: CALIBRATION_PROGRESS_START_S,
            eye_close_threshold: EYE_CLOSE_THRESHOLD,
            mouth_open_threshold: MOUTH_OPEN_THRESHOLD,
            mouth_toggle_delay: MOUTH_TOGGLE_DELAY_S,
            nav_yaw_threshold: NAV_YAW_THRESHOLD_DEG,
            nav_hold_duration: NAV_HOLD_DURATION_S,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            pose_filter: "exponential:0.2".to_string(),
            pointer_alpha: POINTER_SMOOTHING_ALPHA,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            yaw_range_deg: POINTER_YAW_RANGE_DEG,
            pitch_range_deg: POINTER_PITCH_RANGE_DEG,
            min: POINTER_MIN,
            max: POINTER_MAX,
        }
    }
}

impl Default for SettingsAdjustConfig {
    fn default() -> Self {
        Self {
            selection_band_deg: SETTINGS_SELECTION_BAND_DEG,
            pitch_span_deg: SETTINGS_PITCH_SPAN_DEG,
            dead_zone_span: SETTINGS_DEAD_ZONE_SPAN,
            max_speed_span: SETTINGS_MAX_SPEED_SPAN,
            dead_zone_min: DEAD_ZONE_MIN_DEG,
            dead_zone_max: DEAD_ZONE_MAX_DEG,
            max_speed_min: MAX_SPEED_MIN,
            max_speed_max: MAX_SPEED_MAX,
        }
    }
}

impl SettingsAdjustConfig {
    /// Clamp a dead-zone value into its valid range
    #[must_use]
    pub fn clamp_dead_zone(&self, value: f64) -> f64 {
        value.clamp(self.dead_zone_min, self.dead_zone_max)
    }

    /// Clamp a max-speed value into its valid range
    #[must_use]
    pub fn clamp_max_speed(&self, value: f64) -> f64 {
        value.clamp(self.max_speed_min, self.max_speed_max)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the pose smoothing filter from configuration
    pub fn create_pose_filter(&self) -> Result<Box<dyn PoseFilter>> {
        create_filter(&self.smoothing.pose_filter)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let g = &self.gestures;

        // Validate timings
        let durations = [
            ("grace_delay", g.grace_delay),
            ("aim_entry_duration", g.aim_entry_duration),
            ("tap_confirm_duration", g.tap_confirm_duration),
            ("calibrate_duration", g.calibrate_duration),
            ("mouth_toggle_delay", g.mouth_toggle_delay),
            ("nav_hold_duration", g.nav_hold_duration),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::ConfigError(format!("{name} must be a positive number of seconds")));
            }
        }
        if g.grace_delay >= g.aim_entry_duration || g.grace_delay >= g.tap_confirm_duration {
            return Err(Error::ConfigError(
                "Grace delay must be shorter than aim entry and tap confirm durations".to_string(),
            ));
        }
        if g.aim_entry_duration >= g.calibrate_duration || g.tap_confirm_duration >= g.calibrate_duration {
            return Err(Error::ConfigError(
                "Calibrate duration must exceed aim entry and tap confirm durations".to_string(),
            ));
        }
        if !(0.0..g.calibrate_duration).contains(&g.calibration_progress_start) {
            return Err(Error::ConfigError(
                "Calibration progress must start before the calibrate duration".to_string(),
            ));
        }

        // Validate thresholds
        if !(0.0..=1.0).contains(&g.eye_close_threshold) {
            return Err(Error::ConfigError("Eye close threshold must be between 0.0 and 1.0".to_string()));
        }
        if !(0.0..=1.0).contains(&g.mouth_open_threshold) {
            return Err(Error::ConfigError("Mouth open threshold must be between 0.0 and 1.0".to_string()));
        }
        if g.nav_yaw_threshold <= 0.0 {
            return Err(Error::ConfigError("Navigation yaw threshold must be positive".to_string()));
        }

        // Validate scroll mapping and settings ranges
        let s = &self.settings_adjust;
        let p = &self.pointer;
        let numbers = [
            ("scroll.dead_zone_deg", self.scroll.dead_zone_deg),
            ("scroll.max_angle_deg", self.scroll.max_angle_deg),
            ("scroll.max_speed", self.scroll.max_speed),
            ("gestures.nav_yaw_threshold", g.nav_yaw_threshold),
            ("pointer.yaw_range_deg", p.yaw_range_deg),
            ("pointer.pitch_range_deg", p.pitch_range_deg),
            ("settings_adjust.selection_band_deg", s.selection_band_deg),
            ("settings_adjust.pitch_span_deg", s.pitch_span_deg),
            ("settings_adjust.dead_zone_span", s.dead_zone_span),
            ("settings_adjust.max_speed_span", s.max_speed_span),
            ("settings_adjust.dead_zone_min", s.dead_zone_min),
            ("settings_adjust.dead_zone_max", s.dead_zone_max),
            ("settings_adjust.max_speed_min", s.max_speed_min),
            ("settings_adjust.max_speed_max", s.max_speed_max),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(Error::ConfigError(format!("{name} must be a finite number")));
            }
        }
        if self.scroll.max_angle_deg <= 0.0 {
            return Err(Error::ConfigError("Max angle must be positive".to_string()));
        }
        if self.scroll.dead_zone_deg < 0.0 || self.scroll.max_speed < 0.0 {
            return Err(Error::ConfigError("Dead zone and max speed must be non-negative".to_string()));
        }

        // Validate smoothing
        if !(self.smoothing.pointer_alpha > 0.0 && self.smoothing.pointer_alpha <= 1.0) {
            return Err(Error::ConfigError("Pointer alpha must be in (0, 1]".to_string()));
        }
        create_filter(&self.smoothing.pose_filter)?;

        // Validate pointer mapping
        if p.yaw_range_deg <= 0.0 || p.pitch_range_deg <= 0.0 {
            return Err(Error::ConfigError("Pointer ranges must be positive".to_string()));
        }
        if !(0.0 <= p.min && p.min < p.max && p.max <= 1.0) {
            return Err(Error::ConfigError("Pointer bounds must satisfy 0 <= min < max <= 1".to_string()));
        }

        // Validate settings adjustment
        if s.pitch_span_deg <= 0.0 {
            return Err(Error::ConfigError("Settings pitch span must be positive".to_string()));
        }
        if s.dead_zone_min > s.dead_zone_max || s.max_speed_min > s.max_speed_max {
            return Err(Error::ConfigError("Settings bounds must satisfy min <= max".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Scroll Configuration

# User-adjustable scrolling
scroll:
  dead_zone_deg: 3.5
  max_angle_deg: 12.0
  max_speed: 1200.0
  inverted: false
  enabled: true

# Gesture thresholds (seconds unless noted)
gestures:
  grace_delay: 0.5
  aim_entry_duration: 1.0
  tap_confirm_duration: 1.0
  calibrate_duration: 3.0
  calibration_progress_start: 1.0
  eye_close_threshold: 0.55
  mouth_open_threshold: 0.35
  mouth_toggle_delay: 0.5
  nav_yaw_threshold: 10.0
  nav_hold_duration: 2.0

# Smoothing
smoothing:
  pose_filter: "exponential:0.2"
  pointer_alpha: 0.08

# Aiming pointer
pointer:
  yaw_range_deg: 17.0
  pitch_range_deg: 15.0
  min: 0.05
  max: 0.95

# Settings adjustment
settings_adjust:
  selection_band_deg: 3.0
  pitch_span_deg: 15.0
  dead_zone_span: 4.5
  max_speed_span: 1400.0
  dead_zone_min: 1.0
  dead_zone_max: 10.0
  max_speed_min: 200.0
  max_speed_max: 3000.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("scroll:\n  max_speed: 800.0\n").unwrap();
        assert_eq!(parsed.scroll.max_speed, 800.0);
        assert_eq!(parsed.scroll.dead_zone_deg, DEFAULT_DEAD_ZONE_DEG);
        assert_eq!(parsed.gestures, GestureConfig::default());
    }

    #[test]
    fn test_validate_rejects_inverted_timings() {
        let mut config = Config::default();
        config.gestures.grace_delay = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gestures.calibrate_duration = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let mut config = Config::default();
        config.smoothing.pose_filter = "kalman".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_numbers() {
        let mut config = Config::default();
        config.settings_adjust.dead_zone_min = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scroll.max_speed = f64::INFINITY;
        assert!(config.validate().is_err());

        let parsed: Config = serde_yaml::from_str("settings_adjust:\n  max_speed_max: .nan\n").unwrap();
        assert!(parsed.settings_adjust.max_speed_max.is_nan());
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_default_tap_confirm_duration() {
        assert_eq!(GestureConfig::default().tap_confirm_duration, TAP_CONFIRM_DURATION_S);
    }

    #[test]
    fn test_settings_clamps() {
        let s = SettingsAdjustConfig::default();
        assert_eq!(s.clamp_dead_zone(0.0), 1.0);
        assert_eq!(s.clamp_dead_zone(50.0), 10.0);
        assert_eq!(s.clamp_max_speed(50.0), 200.0);
        assert_eq!(s.clamp_max_speed(9000.0), 3000.0);
        assert_eq!(s.clamp_max_speed(1500.0), 1500.0);
    }
}
