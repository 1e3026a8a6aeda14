//! Recorded sensor traces and their replay through the engine.
//!
//! A trace is a YAML document with a `frames` list. Each frame carries raw
//! blend-shape coefficients as the capture pipeline reports them, plus
//! optional user commands applied just before the frame.
//!
//! ```yaml
//! frames:
//!   - { t: 0.000, pitch: 1.5, yaw: -0.3, left_blink: 0.1, right_blink: 0.1, jaw_open: 0.0 }
//!   - { t: 0.016, face: false }
//!   - { t: 0.033, calibrate: true }
//! ```

use crate::{
    engine::{EngineEvent, EngineOutput, FacialActionSample, FrameSample, GestureEngine, PoseSample},
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceFrame {
    /// Capture time (seconds)
    pub t: f64,
    /// Raw pitch (degrees)
    pub pitch: f64,
    /// Raw yaw (degrees)
    pub yaw: f64,
    /// Left eye blink coefficient (0.0-1.0)
    pub left_blink: f64,
    /// Right eye blink coefficient (0.0-1.0)
    pub right_blink: f64,
    /// Jaw-open coefficient (0.0-1.0)
    pub jaw_open: f64,
    /// Whether a face was detected; absent means true
    pub face: Option<bool>,
    /// Recalibrate before this frame
    pub calibrate: bool,
    /// Set scroll on/off before this frame
    pub scroll_enabled: Option<bool>,
    /// Set scroll direction before this frame
    pub scroll_inverted: Option<bool>,
    /// Set dead zone before this frame
    pub dead_zone_deg: Option<f64>,
    /// Set max speed before this frame
    pub max_speed: Option<f64>,
}

/// A recorded sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub frames: Vec<TraceFrame>,
}

/// An engine event with the time of the frame that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimedEvent {
    pub t: f64,
    #[serde(flatten)]
    pub event: EngineEvent,
}

/// Result of replaying a trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub frames: usize,
    pub events: Vec<TimedEvent>,
    pub final_output: EngineOutput,
}

impl Trace {
    /// Parse a trace from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let trace: Self =
            serde_yaml::from_str(content).map_err(|e| Error::InvalidInput(format!("Failed to parse trace: {e}")))?;
        trace.validate()?;
        Ok(trace)
    }

    /// Load a trace from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Timestamps must be finite and non-decreasing
    pub fn validate(&self) -> Result<()> {
        let mut last = f64::NEG_INFINITY;
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.t.is_finite() {
                return Err(Error::InvalidInput(format!("Frame {index} has a non-finite timestamp")));
            }
            if frame.t < last {
                return Err(Error::InvalidInput(format!(
                    "Frame {index} goes back in time ({} < {last})",
                    frame.t
                )));
            }
            last = frame.t;
        }
        Ok(())
    }
}

/// Feed every frame of `trace` through `engine`
pub fn replay(engine: &mut GestureEngine, trace: &Trace) -> ReplayReport {
    let threshold = engine.config().gestures.eye_close_threshold;
    let mut events = Vec::new();

    for frame in &trace.frames {
        let mut produced = Vec::new();

        if frame.calibrate {
            produced.extend(engine.calibrate_neutral());
        }
        if let Some(enabled) = frame.scroll_enabled {
            produced.extend(engine.set_scroll_enabled(enabled));
        }
        if let Some(inverted) = frame.scroll_inverted {
            produced.extend(engine.set_scroll_inverted(inverted));
        }
        if frame.dead_zone_deg.is_some() || frame.max_speed.is_some() {
            produced.extend(engine.set_config(frame.dead_zone_deg, frame.max_speed));
        }

        if frame.face.unwrap_or(true) {
            let sample = FrameSample {
                timestamp: frame.t,
                pose: PoseSample {
                    pitch_deg: frame.pitch,
                    yaw_deg: frame.yaw,
                },
                face: FacialActionSample::from_blend_shapes(
                    frame.left_blink,
                    frame.right_blink,
                    frame.jaw_open,
                    threshold,
                ),
            };
            produced.extend(engine.step(&sample).events);
        } else {
            engine.on_face_lost();
        }

        for event in produced {
            debug!("{:.3}s: {event:?}", frame.t);
            events.push(TimedEvent { t: frame.t, event });
        }
    }

    ReplayReport {
        frames: trace.frames.len(),
        events,
        final_output: engine.output(),
    }
}
