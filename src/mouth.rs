//! Mouth-open toggle for settings mode.

use crate::timer::DwellTimer;
use log::debug;

/// Fires once when the mouth closes after staying open long enough
///
/// The toggle is edge-triggered on release: holding the mouth open never
/// fires by itself, so the user decides when the toggle happens.
#[derive(Debug, Clone)]
pub struct MouthToggle {
    open_threshold: f64,
    toggle_delay: f64,
    timer: DwellTimer,
}

impl MouthToggle {
    /// Create a toggle with an intensity threshold and minimum open duration
    #[must_use]
    pub const fn new(open_threshold: f64, toggle_delay: f64) -> Self {
        Self {
            open_threshold,
            toggle_delay,
            timer: DwellTimer::new(),
        }
    }

    /// Advance with this frame's jaw-open intensity; returns true on toggle
    pub fn update(&mut self, intensity: f64, now: f64) -> bool {
        if intensity > self.open_threshold {
            if !self.timer.is_running() {
                debug!("Mouth opened at {now:.3}s");
            }
            self.timer.hold(now);
            return false;
        }

        match self.timer.release(now) {
            Some(duration) if duration >= self.toggle_delay => {
                debug!("Mouth closed after {duration:.3}s, toggling settings mode");
                true
            }
            _ => false,
        }
    }
}
