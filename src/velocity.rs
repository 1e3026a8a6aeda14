//! Pitch to scroll-velocity mapping.

use crate::config::ScrollConfig;

/// Map adjusted pitch (degrees) to a signed scroll speed
///
/// Inside the dead zone the result is exactly zero. Beyond it the speed ramps
/// linearly to `max_speed` at `max_angle_deg` and stays saturated past that.
/// Tilting the head up (positive pitch) scrolls toward the top of the page,
/// which is a negative offset change unless `inverted` is set. A non-finite
/// pitch maps to zero.
#[must_use]
pub fn map_pitch_to_velocity(pitch: f64, config: &ScrollConfig) -> f64 {
    if !pitch.is_finite() {
        return 0.0;
    }
    let abs_pitch = pitch.abs();
    if abs_pitch < config.dead_zone_deg {
        return 0.0;
    }

    let clamped = abs_pitch.min(config.max_angle_deg);
    // Guard keeps the ramp finite when the dead zone reaches the max angle
    let norm = ((clamped - config.dead_zone_deg) / (config.max_angle_deg - config.dead_zone_deg).max(1.0)).max(0.0);

    let sign = if pitch > 0.0 { -1.0 } else { 1.0 };
    let invert = if config.inverted { -1.0 } else { 1.0 };

    sign * invert * norm * config.max_speed
}
