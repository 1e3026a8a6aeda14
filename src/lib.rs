//! Head-pose gesture recognition for hands-free browsing.
//!
//! This library turns a stream of head pose angles and facial actions from a
//! face-tracking camera into browser interactions:
//! - Pitch beyond a dead zone scrolls the page with a proportional speed
//! - Closing both eyes enters aim mode, where head pose moves a pointer, and
//!   closing them again taps at the pointer
//! - Closing both eyes for three seconds recalibrates the neutral pose
//! - Holding the head turned left or right navigates back or forward
//! - Opening the mouth toggles a mode where head pose edits scroll settings
//!
//! The engine is a deterministic state machine: every frame carries its own
//! timestamp, and each call returns the events it produced.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use head_scroll::engine::{FacialActionSample, FrameSample, GestureEngine, PoseSample};
//!
//! let mut engine = GestureEngine::default();
//!
//! for i in 0..60 {
//!     let sample = FrameSample {
//!         timestamp: f64::from(i) / 60.0,
//!         pose: PoseSample { pitch_deg: -20.0, yaw_deg: 0.0 },
//!         face: FacialActionSample::from_blend_shapes(0.1, 0.1, 0.0, 0.55),
//!     };
//!     let step = engine.step(&sample);
//!     for event in &step.events {
//!         println!("{event:?}");
//!     }
//! }
//!
//! // Head tilted down: scroll toward the bottom of the page
//! assert!(engine.output().scroll_velocity > 0.0);
//! ```
//!
//! ## Sharing Between Threads
//!
//! ```
//! use head_scroll::{engine::GestureEngine, session::SharedEngine};
//!
//! let shared = SharedEngine::new(GestureEngine::default());
//! let ui = shared.clone();
//!
//! shared.calibrate_neutral();
//! let snapshot = ui.snapshot();
//! assert_eq!(snapshot.scroll_velocity, 0.0);
//! ```
//!
//! ## Persisting Settings
//!
//! ```
//! use head_scroll::{
//!     config::Config,
//!     engine::{EngineEvent, GestureEngine},
//!     preferences::{save_scroll_preferences, MemoryStore},
//! };
//!
//! # fn main() -> head_scroll::Result<()> {
//! let mut engine = GestureEngine::new(Config::default())?;
//! let mut store = MemoryStore::new();
//!
//! for event in engine.set_config(Some(5.0), None) {
//!     if let EngineEvent::ConfigChanged { scroll } = event {
//!         save_scroll_preferences(&mut store, &scroll)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

/// Signal filtering algorithms for smoothing pose angles
pub mod filters;

/// Pose smoothing and neutral calibration
pub mod smoothing;

/// Pitch to scroll-velocity mapping
pub mod velocity;

/// Dwell timer shared by gated gestures
pub mod timer;

/// Eye-closure gesture arbitration
pub mod eye_closure;

/// Mouth-open settings toggle
pub mod mouth;

/// Yaw-hold navigation gesture
pub mod navigation;

/// Aiming pointer
pub mod pointer;

/// Head-driven settings adjustment
pub mod settings_adjust;

/// Mode state machine and public engine surface
pub mod engine;

/// Thread-safe engine handle
pub mod session;

/// Persistent user preferences
pub mod preferences;

/// Scroll offset integration and web commands
pub mod actuator;

/// Recorded traces and replay
pub mod trace;

pub use error::{Error, Result};
