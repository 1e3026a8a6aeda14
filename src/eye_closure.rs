//! Eye-closure gesture arbitration.
//!
//! A single continuous closure of both eyes is one episode. Depending on how
//! long it lasts and whether the engine is aiming, an episode enters aim mode,
//! confirms a tap, or recalibrates the neutral pose. Exactly one of those (or
//! nothing) happens per episode.

use crate::{config::GestureConfig, timer::DwellTimer};
use log::debug;
use serde::Serialize;

/// What the in-flight closure gesture is working toward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    /// No gesture in flight
    #[default]
    None,
    /// Closing the eyes long enough will enter aim mode
    EnteringAim,
    /// Closing the eyes long enough will tap at the pointer
    ConfirmingTap,
}

impl GestureLabel {
    /// Status text shown next to the progress indicator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::EnteringAim => "entering aim mode",
            Self::ConfirmingTap => "confirming tap",
        }
    }
}

/// Discrete result of a closure episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureOutcome {
    /// Eyes reopened after the aim entry duration while scrolling
    EnterAim,
    /// Eyes reopened after the tap confirm duration while aiming
    Tap,
    /// Eyes stayed closed for the calibrate duration
    Calibrate,
}

/// Per-frame result of the arbiter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClosureUpdate {
    /// Primary gesture progress (0.0-1.0)
    pub progress: f64,
    /// What the primary progress is counting toward
    pub label: GestureLabel,
    /// Secondary calibration progress (0.0-1.0)
    pub calibration_progress: f64,
    /// Whether the aiming pointer should hold still
    pub freeze_pointer: bool,
    /// Completed gesture, if any
    pub outcome: Option<ClosureOutcome>,
}

/// Tracks both-eyes-closed episodes and decides their outcome
#[derive(Debug, Clone)]
pub struct EyeClosureArbiter {
    timings: GestureConfig,
    timer: DwellTimer,
}

impl EyeClosureArbiter {
    /// Create an arbiter with the given timings
    #[must_use]
    pub const fn new(timings: GestureConfig) -> Self {
        Self {
            timings,
            timer: DwellTimer::new(),
        }
    }

    /// Advance with this frame's eye state
    pub fn update(&mut self, both_closed: bool, aiming: bool, now: f64) -> ClosureUpdate {
        if both_closed {
            self.hold(aiming, now)
        } else {
            self.release(aiming, now)
        }
    }

    /// Abandon any in-flight episode
    pub fn cancel(&mut self) {
        self.timer.clear();
    }

    /// Whether an episode is in flight
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    fn hold(&mut self, aiming: bool, now: f64) -> ClosureUpdate {
        if !self.timer.is_running() {
            debug!("Both eyes closed at {now:.3}s");
        }
        let elapsed = self.timer.hold(now);

        // Calibration already happened during this episode
        if self.timer.is_fired() {
            return ClosureUpdate::default();
        }

        let t = &self.timings;
        if elapsed >= t.calibrate_duration {
            self.timer.mark_fired();
            return ClosureUpdate {
                outcome: Some(ClosureOutcome::Calibrate),
                ..ClosureUpdate::default()
            };
        }

        let calibration_progress = if elapsed < t.calibration_progress_start {
            0.0
        } else {
            ramp(elapsed, t.calibration_progress_start, t.calibrate_duration)
        };

        if aiming {
            ClosureUpdate {
                progress: ramp(elapsed, t.grace_delay, t.tap_confirm_duration),
                label: GestureLabel::ConfirmingTap,
                calibration_progress,
                freeze_pointer: elapsed >= t.grace_delay,
                outcome: None,
            }
        } else {
            ClosureUpdate {
                progress: ramp(elapsed, t.grace_delay, t.aim_entry_duration),
                label: GestureLabel::EnteringAim,
                calibration_progress,
                freeze_pointer: false,
                outcome: None,
            }
        }
    }

    fn release(&mut self, aiming: bool, now: f64) -> ClosureUpdate {
        let Some(elapsed) = self.timer.release(now) else {
            return ClosureUpdate::default();
        };
        debug!("Eyes reopened after {elapsed:.3}s");

        let t = &self.timings;
        let outcome = if elapsed >= t.calibrate_duration {
            None
        } else if aiming && elapsed >= t.tap_confirm_duration {
            Some(ClosureOutcome::Tap)
        } else if !aiming && elapsed >= t.aim_entry_duration {
            Some(ClosureOutcome::EnterAim)
        } else {
            None
        };

        ClosureUpdate {
            outcome,
            ..ClosureUpdate::default()
        }
    }
}

/// Linear progress from `start` to `end`, clamped to [0, 1]
fn ramp(elapsed: f64, start: f64, end: f64) -> f64 {
    ((elapsed - start) / (end - start).max(f64::EPSILON)).clamp(0.0, 1.0)
}
