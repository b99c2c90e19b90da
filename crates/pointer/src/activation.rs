//! Activation policy: when the gaze counts as a press or a submit.

use crate::buttons::{ButtonTracker, ControlButtons};
use crate::config::GazeConfig;
use crate::ring::GazeRing;
use gazecast_core::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How long a `Down` activation keeps `hold` asserted.
pub const HOLD_DURATION: f32 = 0.1;

/// Per-tick press signals consumed by the pointer state machine.
pub trait ActivationSource {
    /// A submit gesture happened this tick.
    fn submit(&mut self, now: f32) -> bool;
    /// A press started this tick.
    fn down(&mut self, now: f32) -> bool;
    /// The press is still held.
    fn hold(&mut self, now: f32) -> bool;
}

/// Fixed signals, for tests and scripted drivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationSignals {
    pub down: bool,
    pub hold: bool,
    pub submit: bool,
}

impl ActivationSource for ActivationSignals {
    fn submit(&mut self, _now: f32) -> bool {
        self.submit
    }

    fn down(&mut self, _now: f32) -> bool {
        self.down
    }

    fn hold(&mut self, _now: f32) -> bool {
        self.hold
    }
}

/// What a completed gaze produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeEvent {
    /// Press followed by a short hold.
    #[default]
    Down,
    /// Submit gesture.
    Submit,
}

/// Dwell-and-button activation for a gaze pointer.
#[derive(Debug, Clone)]
pub struct GazeActivation {
    input_event: GazeEvent,
    ring: GazeRing,
    buttons: ButtonTracker,
    down: bool,
    submit: bool,
    hold_until: Option<f32>,
    last_trigger: Option<f32>,
}

impl GazeActivation {
    pub fn new(config: &GazeConfig) -> Self {
        Self {
            input_event: config.input_event,
            ring: GazeRing::new(config.time_to_gaze),
            buttons: ButtonTracker::new(config.control_buttons),
            down: false,
            submit: false,
            hold_until: None,
            last_trigger: None,
        }
    }

    /// Apply new settings. The ring keeps its target; button history restarts
    /// when the tracked set changes.
    pub fn configure(&mut self, config: &GazeConfig) {
        self.input_event = config.input_event;
        self.ring.set_time_to_gaze(config.time_to_gaze);
        self.buttons.set_tracked(config.control_buttons);
    }

    /// Advance with this tick's target and pressed buttons.
    ///
    /// A trigger (full ring or a tracked button edge) restarts the ring and
    /// latches `down` or `submit` until the state machine reads it.
    pub fn update(&mut self, target: Option<ObjectId>, pressed: ControlButtons, now: f32) {
        self.down = false;
        self.submit = false;

        self.ring.update(target, now);
        let edge = self.buttons.update(pressed);
        if !(self.ring.is_full() || !edge.is_empty()) {
            return;
        }

        self.ring.restart(now);
        self.last_trigger = Some(now);
        match self.input_event {
            GazeEvent::Down => {
                self.down = true;
                self.hold_until = Some(now + HOLD_DURATION);
            }
            GazeEvent::Submit => self.submit = true,
        }
        debug!(
            event = ?self.input_event,
            button = !edge.is_empty(),
            now,
            "gaze activation"
        );
    }

    /// Ring progress in `[0, 100]`.
    pub fn ring_percent(&self) -> f32 {
        self.ring.percent()
    }

    /// Time of the last trigger.
    pub fn last_trigger(&self) -> Option<f32> {
        self.last_trigger
    }

    /// Drop latched signals, the hold pulse and the ring target.
    pub fn reset(&mut self) {
        self.down = false;
        self.submit = false;
        self.hold_until = None;
        self.ring.reset();
    }
}

impl ActivationSource for GazeActivation {
    fn submit(&mut self, _now: f32) -> bool {
        std::mem::take(&mut self.submit)
    }

    fn down(&mut self, _now: f32) -> bool {
        std::mem::take(&mut self.down)
    }

    fn hold(&mut self, now: f32) -> bool {
        match self.hold_until {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.hold_until = None;
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(input_event: GazeEvent) -> GazeConfig {
        GazeConfig {
            input_event,
            time_to_gaze: 1.0,
            ..GazeConfig::default()
        }
    }

    #[test]
    fn full_ring_fires_down_then_holds_briefly() {
        let mut activation = GazeActivation::new(&config(GazeEvent::Down));
        let target = Some(ObjectId(1));
        activation.update(target, ControlButtons::empty(), 0.0);
        assert!(!activation.down(0.0));

        activation.update(target, ControlButtons::empty(), 1.0);
        assert!(activation.down(1.0));
        assert!(activation.hold(1.0));
        assert!(!activation.submit(1.0));
        assert_eq!(activation.ring_percent(), 0.0);

        activation.update(target, ControlButtons::empty(), 1.05);
        assert!(!activation.down(1.05));
        assert!(activation.hold(1.05));

        activation.update(target, ControlButtons::empty(), 1.2);
        assert!(!activation.hold(1.2));
    }

    #[test]
    fn down_is_consumed_once_read() {
        let mut activation = GazeActivation::new(&config(GazeEvent::Down));
        activation.update(None, ControlButtons::TRIGGER_BUTTON, 0.0);
        assert!(activation.down(0.0));
        assert!(!activation.down(0.0));
    }

    #[test]
    fn button_edge_submits_without_target() {
        let mut activation = GazeActivation::new(&config(GazeEvent::Submit));
        activation.update(None, ControlButtons::TRIGGER_BUTTON, 0.5);
        assert!(activation.submit(0.5));
        assert!(!activation.hold(0.5));
        assert_eq!(activation.last_trigger(), Some(0.5));

        // Held button does not retrigger.
        activation.update(None, ControlButtons::TRIGGER_BUTTON, 0.6);
        assert!(!activation.submit(0.6));
    }

    #[test]
    fn untracked_button_does_nothing() {
        let mut activation = GazeActivation::new(&config(GazeEvent::Down));
        activation.update(None, ControlButtons::PRIMARY_2D_AXIS_CLICK, 0.0);
        assert!(!activation.down(0.0));
    }

    #[test]
    fn signals_report_fixed_values() {
        let mut signals = ActivationSignals {
            down: true,
            hold: true,
            submit: false,
        };
        assert!(signals.down(0.0));
        assert!(signals.hold(0.0));
        assert!(!signals.submit(0.0));
    }
}
