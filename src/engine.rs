//! Gesture engine: the mode state machine tying the components together.
//!
//! Each frame flows one way: raw sample, smoothing, eye and mouth timers,
//! mode transition, mode-specific routing (scroll velocity, pointer, or
//! settings values), then the published snapshot. Discrete events are
//! returned from the call that produced them and are never stored, so each
//! one is observed exactly once.

use crate::{
    config::{Config, ScrollConfig},
    constants::POSE_SMOOTHING_ALPHA,
    eye_closure::{ClosureOutcome, EyeClosureArbiter, GestureLabel},
    filters::{exponential::ExponentialFilter, PoseFilter},
    mouth::MouthToggle,
    navigation::{NavDirection, YawHoldNavigator},
    pointer::{Pointer, PointerTracker},
    settings_adjust::{SettingKind, SettingsAdjuster},
    smoothing::PoseSmoother,
    velocity::map_pitch_to_velocity,
    Result,
};
use log::{debug, info, warn};
use serde::Serialize;

/// Head orientation for one sensor frame (degrees)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseSample {
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Facial actions for one sensor frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FacialActionSample {
    pub left_eye_closed: bool,
    pub right_eye_closed: bool,
    /// Jaw-open intensity (0.0-1.0)
    pub mouth_open_intensity: f64,
}

impl FacialActionSample {
    /// Build from raw blend-shape coefficients
    ///
    /// An eye counts as closed when its blink coefficient exceeds `eye_close_threshold`.
    #[must_use]
    pub fn from_blend_shapes(eye_blink_left: f64, eye_blink_right: f64, jaw_open: f64, eye_close_threshold: f64) -> Self {
        Self {
            left_eye_closed: eye_blink_left > eye_close_threshold,
            right_eye_closed: eye_blink_right > eye_close_threshold,
            mouth_open_intensity: jaw_open,
        }
    }

    /// Whether both eyes are closed
    #[must_use]
    pub const fn both_eyes_closed(&self) -> bool {
        self.left_eye_closed && self.right_eye_closed
    }
}

/// Everything the capture pipeline delivers for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSample {
    /// Monotonic capture time (seconds)
    pub timestamp: f64,
    pub pose: PoseSample,
    pub face: FacialActionSample,
}

/// Top-level interaction mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Head pitch scrolls the page; yaw holds navigate
    #[default]
    Scrolling,
    /// Head pose moves a pointer; eye closure taps
    Aiming,
    /// Head pose edits scroll settings
    SettingsAdjusting,
}

/// Discrete, edge-triggered engine output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Tap at the normalized pointer position
    Tap { x: f64, y: f64 },
    NavigateBack,
    NavigateForward,
    /// Neutral pose was recaptured
    Calibrated,
    ModeChanged { mode: Mode },
    /// In-memory scroll settings changed and should be persisted
    ConfigChanged { scroll: ScrollConfig },
}

/// Read-only snapshot published after every frame or command
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineOutput {
    /// Signed scroll speed (points per second)
    pub scroll_velocity: f64,
    pub pointer: Pointer,
    pub pointer_frozen: bool,
    /// Adjusted pitch (degrees)
    pub pitch_deg: f64,
    /// Adjusted yaw (degrees)
    pub yaw_deg: f64,
    pub calibration_progress: f64,
    pub gesture_progress: f64,
    pub gesture_label: GestureLabel,
    pub nav_progress: f64,
    /// Held direction, published as -1 (back), 0 or +1 (forward)
    #[serde(serialize_with = "crate::navigation::serialize_signed")]
    pub nav_direction: Option<NavDirection>,
    pub mode: Mode,
    pub selected_setting: SettingKind,
    pub has_face: bool,
    pub is_supported: bool,
    pub scroll: ScrollConfig,
}

impl EngineOutput {
    fn initial(scroll: ScrollConfig) -> Self {
        Self {
            scroll_velocity: 0.0,
            pointer: Pointer::CENTER,
            pointer_frozen: false,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            calibration_progress: 0.0,
            gesture_progress: 0.0,
            gesture_label: GestureLabel::None,
            nav_progress: 0.0,
            nav_direction: None,
            mode: Mode::Scrolling,
            selected_setting: SettingKind::default(),
            has_face: false,
            is_supported: true,
            scroll,
        }
    }

    /// Whether head pose currently drives the pointer
    #[must_use]
    pub fn is_aiming(&self) -> bool {
        self.mode == Mode::Aiming
    }

    /// Whether head pose currently edits settings
    #[must_use]
    pub fn is_settings_adjusting(&self) -> bool {
        self.mode == Mode::SettingsAdjusting
    }
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub output: EngineOutput,
    pub events: Vec<EngineEvent>,
}

/// Head-pose gesture recognition engine
pub struct GestureEngine {
    config: Config,
    scroll: ScrollConfig,
    smoother: PoseSmoother,
    pointer: PointerTracker,
    eyes: EyeClosureArbiter,
    mouth: MouthToggle,
    navigator: YawHoldNavigator,
    settings: SettingsAdjuster,
    mode: Mode,
    has_face: bool,
    is_supported: bool,
    output: EngineOutput,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::with_filter(Config::default(), Box::new(ExponentialFilter::new(POSE_SMOOTHING_ALPHA)))
    }
}

impl GestureEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let filter = config.create_pose_filter()?;
        Ok(Self::with_filter(config, filter))
    }

    /// Create an engine with an explicit pose filter
    ///
    /// # Panics
    ///
    /// Panics if the pointer smoothing alpha is not in the range (0, 1]
    #[must_use]
    pub fn with_filter(config: Config, filter: Box<dyn PoseFilter>) -> Self {
        info!("Initializing gesture engine with {} pose filter", filter.name());
        let g = config.gestures;
        let scroll = config.scroll;
        Self {
            smoother: PoseSmoother::new(filter),
            pointer: PointerTracker::new(config.pointer, config.smoothing.pointer_alpha),
            eyes: EyeClosureArbiter::new(g),
            mouth: MouthToggle::new(g.mouth_open_threshold, g.mouth_toggle_delay),
            navigator: YawHoldNavigator::new(g.nav_yaw_threshold, g.nav_hold_duration),
            settings: SettingsAdjuster::new(config.settings_adjust),
            mode: Mode::Scrolling,
            has_face: false,
            is_supported: true,
            output: EngineOutput::initial(scroll),
            scroll,
            config,
        }
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current in-memory scroll settings
    #[must_use]
    pub const fn scroll_config(&self) -> ScrollConfig {
        self.scroll
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Latest published snapshot
    #[must_use]
    pub const fn output(&self) -> EngineOutput {
        self.output
    }

    /// Name of the pose filter in use
    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.smoother.filter_name()
    }

    /// Process one complete sensor frame
    pub fn step(&mut self, sample: &FrameSample) -> StepOutput {
        let mut events = self.on_facial_action(&sample.face, sample.timestamp);
        events.extend(self.on_pose_frame(&sample.pose, sample.timestamp));
        StepOutput {
            output: self.output,
            events,
        }
    }

    /// Feed eye and mouth state; drives mode transitions
    pub fn on_facial_action(&mut self, face: &FacialActionSample, now: f64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.is_supported {
            return events;
        }
        if !now.is_finite() {
            debug!("Dropping facial action sample with non-finite timestamp");
            return events;
        }
        self.has_face = true;

        // Eye closure has no effect while editing settings
        if self.mode != Mode::SettingsAdjusting {
            let update = self.eyes.update(face.both_eyes_closed(), self.mode == Mode::Aiming, now);
            self.output.gesture_progress = update.progress;
            self.output.gesture_label = update.label;
            self.output.calibration_progress = update.calibration_progress;
            if self.mode == Mode::Aiming {
                self.pointer.set_frozen(update.freeze_pointer);
            }

            match update.outcome {
                Some(ClosureOutcome::Calibrate) => {
                    info!("Eyes closed for calibration");
                    self.calibrate(&mut events);
                    self.set_mode(Mode::Scrolling, &mut events);
                }
                Some(ClosureOutcome::Tap) => {
                    let Pointer { x, y } = self.pointer.position();
                    info!("Tap fired at ({x:.3}, {y:.3})");
                    events.push(EngineEvent::Tap { x, y });
                    self.set_mode(Mode::Scrolling, &mut events);
                }
                Some(ClosureOutcome::EnterAim) => self.set_mode(Mode::Aiming, &mut events),
                None => {}
            }
        }

        if self.mouth.update(face.mouth_open_intensity, now) {
            if self.mode == Mode::SettingsAdjusting {
                self.set_mode(Mode::Scrolling, &mut events);
            } else {
                self.settings.begin(self.smoother.adjusted());
                if self.eyes.is_active() {
                    debug!("Abandoning eye closure for settings mode");
                    self.eyes.cancel();
                }
                self.set_mode(Mode::SettingsAdjusting, &mut events);
            }
        }

        self.publish();
        events
    }

    /// Feed head pose; drives velocity, pointer, settings values and navigation
    pub fn on_pose_frame(&mut self, pose: &PoseSample, now: f64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.is_supported {
            return events;
        }
        // A single NaN would otherwise stick in the filter state
        if !(now.is_finite() && pose.pitch_deg.is_finite() && pose.yaw_deg.is_finite()) {
            debug!("Dropping non-finite pose sample at {now}");
            return events;
        }
        self.has_face = true;

        let adjusted = self.smoother.update(pose.pitch_deg, pose.yaw_deg);
        self.output.pitch_deg = adjusted.pitch;
        self.output.yaw_deg = adjusted.yaw;
        self.output.scroll_velocity = 0.0;

        match self.mode {
            Mode::SettingsAdjusting => {
                if self.settings.update(adjusted, &mut self.scroll) {
                    events.push(EngineEvent::ConfigChanged { scroll: self.scroll });
                }
            }
            Mode::Aiming => {
                self.pointer.update(adjusted);
            }
            Mode::Scrolling => {
                let gesture_idle = self.output.gesture_progress == 0.0;
                if self.has_face && self.scroll.enabled && gesture_idle {
                    self.output.scroll_velocity = map_pitch_to_velocity(adjusted.pitch, &self.scroll);
                }
            }
        }

        if self.mode == Mode::Scrolling {
            let nav = self.navigator.update(adjusted.yaw, now);
            self.output.nav_progress = nav.progress;
            self.output.nav_direction = nav.direction;
            match nav.fired {
                Some(NavDirection::Back) => events.push(EngineEvent::NavigateBack),
                Some(NavDirection::Forward) => events.push(EngineEvent::NavigateForward),
                None => {}
            }
        } else {
            self.navigator.reset();
            self.output.nav_progress = 0.0;
            self.output.nav_direction = None;
        }

        self.publish();
        events
    }

    /// The capture pipeline lost the face
    pub fn on_face_lost(&mut self) -> EngineOutput {
        debug!("Face lost");
        self.has_face = false;
        self.output.scroll_velocity = 0.0;
        self.output.pitch_deg = 0.0;
        self.publish();
        self.output
    }

    /// Capture the current head pose as neutral (user command)
    pub fn calibrate_neutral(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        info!("Calibrating neutral pose on request");
        self.calibrate(&mut events);
        self.publish();
        events
    }

    /// Turn scroll output on or off
    pub fn set_scroll_enabled(&mut self, enabled: bool) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.scroll.enabled != enabled {
            self.scroll.enabled = enabled;
            if !enabled {
                self.output.scroll_velocity = 0.0;
            }
            events.push(EngineEvent::ConfigChanged { scroll: self.scroll });
        }
        self.publish();
        events
    }

    /// Reverse scroll direction
    pub fn set_scroll_inverted(&mut self, inverted: bool) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.scroll.inverted != inverted {
            self.scroll.inverted = inverted;
            events.push(EngineEvent::ConfigChanged { scroll: self.scroll });
        }
        self.publish();
        events
    }

    /// Update dead zone and/or max speed; out-of-range values are clamped
    pub fn set_config(&mut self, dead_zone_deg: Option<f64>, max_speed: Option<f64>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let bounds = self.config.settings_adjust;
        let mut next = self.scroll;
        if let Some(value) = dead_zone_deg.filter(|v| v.is_finite()) {
            next.dead_zone_deg = bounds.clamp_dead_zone(value);
        }
        if let Some(value) = max_speed.filter(|v| v.is_finite()) {
            next.max_speed = bounds.clamp_max_speed(value);
        }
        if next != self.scroll {
            self.scroll = next;
            events.push(EngineEvent::ConfigChanged { scroll: self.scroll });
        }
        self.publish();
        events
    }

    /// Replace the in-memory scroll settings, e.g. from a preference store
    pub fn load_scroll_config(&mut self, scroll: ScrollConfig) {
        self.scroll = scroll;
        self.publish();
    }

    /// Pause the session: actuators must stop immediately
    pub fn stop(&mut self) -> EngineOutput {
        info!("Stopping gesture engine");
        self.on_face_lost()
    }

    /// Mark whether the device can deliver face tracking at all
    pub fn set_supported(&mut self, supported: bool) {
        if !supported {
            warn!("Face tracking is not supported on this device");
            self.has_face = false;
            self.output = EngineOutput {
                is_supported: false,
                ..EngineOutput::initial(self.scroll)
            };
        }
        self.is_supported = supported;
        self.publish();
    }

    fn calibrate(&mut self, events: &mut Vec<EngineEvent>) {
        self.smoother.calibrate_neutral();
        self.pointer.recenter();
        self.output.pitch_deg = 0.0;
        self.output.yaw_deg = 0.0;
        self.output.scroll_velocity = 0.0;
        self.output.gesture_progress = 0.0;
        self.output.gesture_label = GestureLabel::None;
        self.output.calibration_progress = 0.0;
        events.push(EngineEvent::Calibrated);
    }

    fn set_mode(&mut self, mode: Mode, events: &mut Vec<EngineEvent>) {
        if self.mode == mode {
            return;
        }
        info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.pointer.set_frozen(false);
        self.output.scroll_velocity = 0.0;
        self.output.gesture_progress = 0.0;
        self.output.gesture_label = GestureLabel::None;
        self.output.calibration_progress = 0.0;
        events.push(EngineEvent::ModeChanged { mode });
    }

    fn publish(&mut self) {
        self.output.pointer = self.pointer.position();
        self.output.pointer_frozen = self.pointer.is_frozen();
        self.output.mode = self.mode;
        self.output.selected_setting = self.settings.selected();
        self.output.has_face = self.has_face;
        self.output.is_supported = self.is_supported;
        self.output.scroll = self.scroll;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn frame(t: f64, pitch: f64, yaw: f64, eyes_closed: bool, mouth: f64) -> FrameSample {
        FrameSample {
            timestamp: t,
            pose: PoseSample {
                pitch_deg: pitch,
                yaw_deg: yaw,
            },
            face: FacialActionSample {
                left_eye_closed: eyes_closed,
                right_eye_closed: eyes_closed,
                mouth_open_intensity: mouth,
            },
        }
    }

    /// Run frames from `start` for `duration` seconds; returns the end time and events
    fn run(
        engine: &mut GestureEngine,
        start: f64,
        duration: f64,
        pitch: f64,
        yaw: f64,
        eyes_closed: bool,
        mouth: f64,
    ) -> (f64, Vec<EngineEvent>) {
        let mut events = Vec::new();
        let frames = (duration / DT).round() as u32;
        let mut t = start;
        for i in 0..=frames {
            t = start + f64::from(i) * DT;
            events.extend(engine.step(&frame(t, pitch, yaw, eyes_closed, mouth)).events);
        }
        (t, events)
    }

    #[test]
    fn test_scrolls_when_pitched_down() {
        let mut engine = GestureEngine::default();
        run(&mut engine, 0.0, 1.0, -20.0, 0.0, false, 0.0);
        let out = engine.output();
        assert_eq!(out.scroll_velocity, 1200.0);
        assert!(out.has_face);
        assert_eq!(out.mode, Mode::Scrolling);
    }

    #[test]
    fn test_enter_aim_then_tap() {
        let mut engine = GestureEngine::default();
        let (t, events) = run(&mut engine, 0.0, 1.5, 0.0, 0.0, true, 0.0);
        assert!(events.is_empty());
        let (t, events) = run(&mut engine, t + DT, 0.1, 0.0, 0.0, false, 0.0);
        assert_eq!(events, vec![EngineEvent::ModeChanged { mode: Mode::Aiming }]);
        assert!(engine.output().is_aiming());

        let (t, _) = run(&mut engine, t + DT, 1.2, 0.0, 0.0, true, 0.0);
        assert!(engine.output().pointer_frozen);
        assert_eq!(engine.output().gesture_label, GestureLabel::ConfirmingTap);
        let (_, events) = run(&mut engine, t + DT, 0.1, 0.0, 0.0, false, 0.0);
        assert!(matches!(events[0], EngineEvent::Tap { .. }));
        assert_eq!(events[1], EngineEvent::ModeChanged { mode: Mode::Scrolling });
        assert!(!engine.output().pointer_frozen);
    }

    #[test]
    fn test_velocity_zero_while_gesture_progress_shown() {
        let mut engine = GestureEngine::default();
        let (t, _) = run(&mut engine, 0.0, 1.0, -20.0, 0.0, false, 0.0);
        run(&mut engine, t + DT, 0.7, -20.0, 0.0, true, 0.0);
        let out = engine.output();
        assert!(out.gesture_progress > 0.0);
        assert_eq!(out.scroll_velocity, 0.0);
    }

    #[test]
    fn test_mouth_toggles_settings_and_ignores_eyes() {
        let mut engine = GestureEngine::default();
        let (t, _) = run(&mut engine, 0.0, 0.6, 0.0, 0.0, false, 0.8);
        let (t, events) = run(&mut engine, t + DT, 0.1, 0.0, 0.0, false, 0.0);
        assert_eq!(events, vec![EngineEvent::ModeChanged { mode: Mode::SettingsAdjusting }]);

        // A long closure neither calibrates nor enters aim mode
        let (t, events) = run(&mut engine, t + DT, 4.0, 0.0, 0.0, true, 0.0);
        assert!(!events.iter().any(|e| matches!(e, EngineEvent::Calibrated | EngineEvent::ModeChanged { .. })));
        assert_eq!(engine.output().calibration_progress, 0.0);

        let (t, _) = run(&mut engine, t + DT, 0.6, 0.0, 0.0, false, 0.8);
        let (_, events) = run(&mut engine, t + DT, 0.1, 0.0, 0.0, false, 0.0);
        assert_eq!(events, vec![EngineEvent::ModeChanged { mode: Mode::Scrolling }]);
    }

    #[test]
    fn test_entering_settings_abandons_eye_closure() {
        let mut engine = GestureEngine::default();
        let (t, _) = run(&mut engine, 0.0, 0.6, 0.0, 0.0, true, 0.8);
        let (t, events) = run(&mut engine, t + DT, 0.6, 0.0, 0.0, true, 0.0);
        assert_eq!(events, vec![EngineEvent::ModeChanged { mode: Mode::SettingsAdjusting }]);
        assert!(!engine.eyes.is_active());

        // Reopening the eyes after leaving settings must not count as an aim closure
        let (t, _) = run(&mut engine, t + DT, 0.6, 0.0, 0.0, true, 0.8);
        let (t, events) = run(&mut engine, t + DT, 0.1, 0.0, 0.0, true, 0.0);
        assert_eq!(events, vec![EngineEvent::ModeChanged { mode: Mode::Scrolling }]);
        let (_, events) = run(&mut engine, t + DT, 0.3, 0.0, 0.0, false, 0.0);
        assert!(events.is_empty());
        assert_eq!(engine.mode(), Mode::Scrolling);
    }

    #[test]
    fn test_face_lost_zeroes_outputs() {
        let mut engine = GestureEngine::default();
        run(&mut engine, 0.0, 1.0, -20.0, 0.0, false, 0.0);
        let out = engine.on_face_lost();
        assert!(!out.has_face);
        assert_eq!(out.scroll_velocity, 0.0);
        assert_eq!(out.pitch_deg, 0.0);
    }

    #[test]
    fn test_unsupported_device_ignores_frames() {
        let mut engine = GestureEngine::default();
        engine.set_supported(false);
        let step = engine.step(&frame(0.0, -30.0, 0.0, false, 0.0));
        assert!(step.events.is_empty());
        assert!(!step.output.is_supported);
        assert!(!step.output.has_face);
        assert_eq!(step.output.scroll_velocity, 0.0);
    }

    #[test]
    fn test_set_config_clamps_and_reports() {
        let mut engine = GestureEngine::default();
        let events = engine.set_config(Some(50.0), Some(10.0));
        let scroll = engine.scroll_config();
        assert_eq!(scroll.dead_zone_deg, 10.0);
        assert_eq!(scroll.max_speed, 200.0);
        assert_eq!(events, vec![EngineEvent::ConfigChanged { scroll }]);
        assert!(engine.set_config(Some(50.0), None).is_empty());
    }

    #[test]
    fn test_blend_shape_threshold() {
        let face = FacialActionSample::from_blend_shapes(0.6, 0.56, 0.2, 0.55);
        assert!(face.both_eyes_closed());
        let face = FacialActionSample::from_blend_shapes(0.6, 0.55, 0.2, 0.55);
        assert!(!face.both_eyes_closed());
    }
}
