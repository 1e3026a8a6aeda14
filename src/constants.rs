//! Constants used throughout the gesture engine

/// Exponential smoothing factor for head pitch and yaw
pub const POSE_SMOOTHING_ALPHA: f64 = 0.2;

/// Secondary smoothing factor applied to the aiming pointer
pub const POINTER_SMOOTHING_ALPHA: f64 = 0.08;

/// Default dead zone around neutral pitch (degrees)
pub const DEFAULT_DEAD_ZONE_DEG: f64 = 3.5;

/// Pitch at which scroll speed saturates (degrees)
pub const DEFAULT_MAX_ANGLE_DEG: f64 = 12.0;

/// Default maximum scroll speed (points per second)
pub const DEFAULT_MAX_SPEED: f64 = 1200.0;

/// Valid range for the user-adjustable dead zone (degrees)
pub const DEAD_ZONE_MIN_DEG: f64 = 1.0;
pub const DEAD_ZONE_MAX_DEG: f64 = 10.0;

/// Valid range for the user-adjustable maximum scroll speed
pub const MAX_SPEED_MIN: f64 = 200.0;
pub const MAX_SPEED_MAX: f64 = 3000.0;

/// Eye-closure gesture timings (seconds from the moment both eyes close)
pub const GRACE_DELAY_S: f64 = 0.5;
pub const AIM_ENTRY_DURATION_S: f64 = 1.0;
pub const TAP_CONFIRM_DURATION_S: f64 = 1.0;
pub const CALIBRATE_DURATION_S: f64 = 3.0;

/// Closure time after which the calibration indicator starts filling
pub const CALIBRATION_PROGRESS_START_S: f64 = 1.0;

/// Blink coefficient above which an eye counts as closed
pub const EYE_CLOSE_THRESHOLD: f64 = 0.55;

/// Jaw-open intensity above which the mouth counts as open
pub const MOUTH_OPEN_THRESHOLD: f64 = 0.35;

/// Minimum mouth-open duration that toggles settings mode
pub const MOUTH_TOGGLE_DELAY_S: f64 = 0.5;

/// Yaw beyond which a navigation hold starts (degrees)
pub const NAV_YAW_THRESHOLD_DEG: f64 = 10.0;

/// Hold duration that fires a navigation event
pub const NAV_HOLD_DURATION_S: f64 = 2.0;

/// Yaw and pitch spans mapped onto the full pointer range (degrees)
pub const POINTER_YAW_RANGE_DEG: f64 = 17.0;
pub const POINTER_PITCH_RANGE_DEG: f64 = 15.0;

/// Pointer coordinates are kept inside this band
pub const POINTER_MIN: f64 = 0.05;
pub const POINTER_MAX: f64 = 0.95;

/// Yaw offset that switches the selected setting (degrees)
pub const SETTINGS_SELECTION_BAND_DEG: f64 = 3.0;

/// Pitch offset that produces the full adjustment span (degrees)
pub const SETTINGS_PITCH_SPAN_DEG: f64 = 15.0;

/// Adjustment applied at a full pitch span
pub const SETTINGS_DEAD_ZONE_SPAN: f64 = 4.5;
pub const SETTINGS_MAX_SPEED_SPAN: f64 = 1400.0;
