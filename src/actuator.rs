//! Applying engine output to a web view.
//!
//! The web host ticks the [`ScrollActuator`] once per display refresh to turn
//! scroll velocity into a content offset, and turns engine events into
//! [`WebCommand`]s.

use crate::engine::{EngineEvent, EngineOutput};
use serde::Serialize;

/// Command for the web-content host
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WebCommand {
    GoBack,
    GoForward,
    /// Synthetic click at normalized viewport coordinates
    TapAt { x: f64, y: f64 },
}

impl WebCommand {
    /// Command for an engine event, if it maps to one
    #[must_use]
    pub fn from_event(event: &EngineEvent) -> Option<Self> {
        match *event {
            EngineEvent::NavigateBack => Some(Self::GoBack),
            EngineEvent::NavigateForward => Some(Self::GoForward),
            EngineEvent::Tap { x, y } => Some(Self::TapAt { x, y }),
            _ => None,
        }
    }
}

/// Integrates scroll velocity into a vertical content offset
#[derive(Debug, Clone, Default)]
pub struct ScrollActuator {
    last_tick: Option<f64>,
    offset: f64,
}

impl ScrollActuator {
    /// Start at the top of the page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vertical offset (points)
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Sync with an offset changed by the host (navigation, user drag)
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
    }

    /// Advance to display time `now`; returns the new offset when it moved
    ///
    /// Nothing happens without a face or with scrolling disabled. The first
    /// tick only records the time base.
    pub fn tick(&mut self, now: f64, output: &EngineOutput, content_height: f64, viewport_height: f64) -> Option<f64> {
        if !(output.has_face && output.scroll.enabled) {
            return None;
        }

        let Some(last) = self.last_tick.replace(now) else {
            return None;
        };
        let dt = (now - last).max(0.0);

        if output.scroll_velocity == 0.0 {
            return None;
        }

        let max_offset = (content_height - viewport_height).max(0.0);
        let target = dt.mul_add(output.scroll_velocity, self.offset);
        self.offset = target.clamp(0.0, max_offset);
        Some(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GestureEngine;

    fn output(velocity: f64) -> EngineOutput {
        let mut out = GestureEngine::default().output();
        out.has_face = true;
        out.scroll_velocity = velocity;
        out
    }

    #[test]
    fn test_first_tick_sets_time_base() {
        let mut actuator = ScrollActuator::new();
        assert_eq!(actuator.tick(1.0, &output(600.0), 5000.0, 800.0), None);
        assert_eq!(actuator.tick(1.5, &output(600.0), 5000.0, 800.0), Some(300.0));
    }

    #[test]
    fn test_offset_clamped_to_content() {
        let mut actuator = ScrollActuator::new();
        actuator.tick(0.0, &output(-1000.0), 5000.0, 800.0);
        assert_eq!(actuator.tick(1.0, &output(-1000.0), 5000.0, 800.0), Some(0.0));

        actuator.tick(2.0, &output(3000.0), 1000.0, 800.0);
        assert_eq!(actuator.offset(), 200.0);

        // Content shorter than the viewport never scrolls
        actuator.set_offset(0.0);
        actuator.tick(3.0, &output(3000.0), 500.0, 800.0);
        assert_eq!(actuator.offset(), 0.0);
    }

    #[test]
    fn test_no_face_or_disabled_does_nothing() {
        let mut actuator = ScrollActuator::new();
        let mut out = output(600.0);
        out.has_face = false;
        assert_eq!(actuator.tick(0.0, &out, 5000.0, 800.0), None);
        assert_eq!(actuator.tick(1.0, &out, 5000.0, 800.0), None);

        let mut out = output(600.0);
        out.scroll.enabled = false;
        assert_eq!(actuator.tick(2.0, &out, 5000.0, 800.0), None);
        assert_eq!(actuator.offset(), 0.0);
    }

    #[test]
    fn test_zero_velocity_keeps_offset() {
        let mut actuator = ScrollActuator::new();
        actuator.set_offset(120.0);
        actuator.tick(0.0, &output(0.0), 5000.0, 800.0);
        assert_eq!(actuator.tick(1.0, &output(0.0), 5000.0, 800.0), None);
        assert_eq!(actuator.offset(), 120.0);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(WebCommand::from_event(&EngineEvent::NavigateBack), Some(WebCommand::GoBack));
        assert_eq!(WebCommand::from_event(&EngineEvent::NavigateForward), Some(WebCommand::GoForward));
        assert_eq!(
            WebCommand::from_event(&EngineEvent::Tap { x: 0.25, y: 0.75 }),
            Some(WebCommand::TapAt { x: 0.25, y: 0.75 })
        );
        assert_eq!(WebCommand::from_event(&EngineEvent::Calibrated), None);
    }
}
