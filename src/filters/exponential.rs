use super::PoseFilter;

/// Exponential smoothing filter
///
/// Each sample moves the state a fixed fraction `alpha` of the way toward the
/// input: `s' = s + alpha * (x - s)`. The state starts at a seed value rather
/// than the first sample, so the output is continuous from the first frame.
#[derive(Debug, Clone)]
pub struct ExponentialFilter {
    alpha: f64,
    initial: (f64, f64),
    state: (f64, f64),
}

impl ExponentialFilter {
    /// Create a filter seeded at the origin
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self::with_initial(alpha, 0.0, 0.0)
    }

    /// Create a filter seeded at the given values, which `reset` returns to
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn with_initial(alpha: f64, first: f64, second: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self {
            alpha,
            initial: (first, second),
            state: (first, second),
        }
    }
}

impl PoseFilter for ExponentialFilter {
    fn apply(&mut self, pitch: f64, yaw: f64) -> (f64, f64) {
        let (last_pitch, last_yaw) = self.state;
        self.state = (
            self.alpha.mul_add(pitch - last_pitch, last_pitch),
            self.alpha.mul_add(yaw - last_yaw, last_yaw),
        );
        self.state
    }

    fn current(&self) -> (f64, f64) {
        self.state
    }

    fn reset(&mut self) {
        self.state = self.initial;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
