//! Signal filtering algorithms for smoothing head pose angles.
//!
//! Raw pitch and yaw arrive with frame-to-frame jitter; every decision in the
//! gesture engine consumes filtered values produced here.

/// Exponential low-pass filter used for pose and pointer smoothing
pub mod exponential;

use crate::{Error, Result};

/// Trait for two-channel pose filters
pub trait PoseFilter: Send + Sync {
    /// Apply filter to input values
    fn apply(&mut self, pitch: f64, yaw: f64) -> (f64, f64);

    /// Current filtered values without consuming a new sample
    fn current(&self) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
#[derive(Debug, Default)]
pub struct NoFilter {
    last: (f64, f64),
}

impl PoseFilter for NoFilter {
    fn apply(&mut self, pitch: f64, yaw: f64) -> (f64, f64) {
        self.last = (pitch, yaw);
        self.last
    }

    fn current(&self) -> (f64, f64) {
        self.last
    }

    fn reset(&mut self) {
        self.last = (0.0, 0.0);
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a pose filter from a spec such as `"exponential:0.2"` or `"none"`
pub fn create_filter(spec: &str) -> Result<Box<dyn PoseFilter>> {
    let lowered = spec.trim().to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    if parts.next().is_some() {
        return Err(Error::FilterError(format!("Too many parameters in filter spec: {spec}")));
    }

    match (name, param) {
        ("none" | "nofilter", None) => Ok(Box::new(NoFilter::default())),
        ("exponential" | "lowpass" | "low_pass", param) => {
            let alpha = match param {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|_| Error::FilterError(format!("Invalid alpha in filter spec: {spec}")))?,
                None => crate::constants::POSE_SMOOTHING_ALPHA,
            };
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter::default();
        let (pitch, yaw) = filter.apply(10.0, 20.0);
        assert_eq!(pitch, 10.0);
        assert_eq!(yaw, 20.0);
        assert_eq!(filter.current(), (10.0, 20.0));
    }

    #[test]
    fn test_create_filter() {
        assert!(create_filter("none").is_ok());
        assert!(create_filter("exponential").is_ok());
        assert!(create_filter("exponential:0.2").is_ok());
        assert!(create_filter("LowPass:0.5").is_ok());
        assert!(create_filter("unknown").is_err());
        assert!(create_filter("exponential:0").is_err());
        assert!(create_filter("exponential:abc").is_err());
        assert!(create_filter("exponential:0.2:3").is_err());
        assert!(create_filter("none:1").is_err());
    }
}
