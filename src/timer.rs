//! Dwell timer shared by the gated gestures.

/// Tracks how long a gating condition has held continuously
///
/// A timer starts on the first frame the condition holds and is cleared when
/// it stops holding. Once marked fired it stays latched until cleared, so a
/// single continuous gesture can complete at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DwellTimer {
    since: Option<f64>,
    fired: bool,
}

impl DwellTimer {
    /// Create an idle timer
    #[must_use]
    pub const fn new() -> Self {
        Self { since: None, fired: false }
    }

    /// Record the condition holding at `now` and return the elapsed time
    pub fn hold(&mut self, now: f64) -> f64 {
        let since = *self.since.get_or_insert(now);
        (now - since).max(0.0)
    }

    /// Stop the timer, returning the elapsed time if it was running and not fired
    pub fn release(&mut self, now: f64) -> Option<f64> {
        let since = self.since.take();
        let fired = std::mem::take(&mut self.fired);
        match since {
            Some(since) if !fired => Some((now - since).max(0.0)),
            _ => None,
        }
    }

    /// Latch the timer so the current gesture cannot complete again
    pub fn mark_fired(&mut self) {
        self.fired = true;
    }

    /// Reset to idle without reporting an elapsed time
    pub fn clear(&mut self) {
        self.since = None;
        self.fired = false;
    }

    /// Whether the condition is currently being timed
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.since.is_some()
    }

    /// Whether the current gesture already completed
    #[must_use]
    pub const fn is_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_measures_from_first_frame() {
        let mut timer = DwellTimer::new();
        assert_eq!(timer.hold(10.0), 0.0);
        assert_eq!(timer.hold(10.25), 0.25);
        assert_eq!(timer.hold(11.0), 1.0);
        assert!(timer.is_running());
    }

    #[test]
    fn test_release_reports_duration_once() {
        let mut timer = DwellTimer::new();
        timer.hold(1.0);
        assert_eq!(timer.release(1.75), Some(0.75));
        assert_eq!(timer.release(2.0), None);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_fired_timer_releases_silently() {
        let mut timer = DwellTimer::new();
        timer.hold(0.0);
        timer.mark_fired();
        assert!(timer.is_fired());
        assert_eq!(timer.release(5.0), None);
        assert!(!timer.is_fired());
    }

    #[test]
    fn test_clock_going_backwards_never_negative() {
        let mut timer = DwellTimer::new();
        timer.hold(5.0);
        assert_eq!(timer.hold(4.0), 0.0);
    }
}
