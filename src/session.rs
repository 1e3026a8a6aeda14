//! Single-writer access to an engine shared between threads.
//!
//! The sensor callback, the UI and the scroll actuator usually run on
//! different threads. All of them go through [`SharedEngine`], which holds
//! one lock for each full frame or command, so a snapshot is only ever
//! observed between transitions.

use crate::engine::{EngineEvent, EngineOutput, FrameSample, GestureEngine, StepOutput};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to a gesture engine
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<GestureEngine>>,
}

impl SharedEngine {
    /// Wrap an engine for shared use
    #[must_use]
    pub fn new(engine: GestureEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Process one frame
    pub fn step(&self, sample: &FrameSample) -> StepOutput {
        self.lock().step(sample)
    }

    /// Report that the face is no longer visible
    pub fn on_face_lost(&self) -> EngineOutput {
        self.lock().on_face_lost()
    }

    /// Recapture the neutral pose
    pub fn calibrate_neutral(&self) -> Vec<EngineEvent> {
        self.lock().calibrate_neutral()
    }

    /// Turn scroll output on or off
    pub fn set_scroll_enabled(&self, enabled: bool) -> Vec<EngineEvent> {
        self.lock().set_scroll_enabled(enabled)
    }

    /// Reverse scroll direction
    pub fn set_scroll_inverted(&self, inverted: bool) -> Vec<EngineEvent> {
        self.lock().set_scroll_inverted(inverted)
    }

    /// Update dead zone and/or max speed
    pub fn set_config(&self, dead_zone_deg: Option<f64>, max_speed: Option<f64>) -> Vec<EngineEvent> {
        self.lock().set_config(dead_zone_deg, max_speed)
    }

    /// Pause the session, zeroing velocity and face presence
    pub fn stop(&self) -> EngineOutput {
        self.lock().stop()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> EngineOutput {
        self.lock().output()
    }

    fn lock(&self) -> MutexGuard<'_, GestureEngine> {
        // Engine state is consistent between calls, so a panic elsewhere
        // cannot leave it half-updated
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
