//! Auxiliary controller buttons that can trigger a gaze activation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Binary controller buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ControlButtons: u8 {
        /// Touchpad / thumbstick click.
        const PRIMARY_2D_AXIS_CLICK = 1 << 0;
        /// Trigger.
        const TRIGGER_BUTTON = 1 << 1;
    }
}

/// Pressed buttons of both hand controllers for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceButtons {
    /// Left controller.
    pub left: ControlButtons,
    /// Right controller.
    pub right: ControlButtons,
}

impl DeviceButtons {
    /// Nothing pressed on either hand.
    pub const RELEASED: Self = Self {
        left: ControlButtons::empty(),
        right: ControlButtons::empty(),
    };

    /// Buttons pressed on either hand.
    pub fn either(self) -> ControlButtons {
        self.left | self.right
    }
}

impl Default for DeviceButtons {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Edge detector over a configured set of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTracker {
    tracked: ControlButtons,
    state: ControlButtons,
    previous: ControlButtons,
}

impl ButtonTracker {
    /// Track `tracked`, all released.
    pub fn new(tracked: ControlButtons) -> Self {
        Self {
            tracked,
            state: ControlButtons::empty(),
            previous: ControlButtons::empty(),
        }
    }

    /// Change the tracked set; history restarts from released.
    pub fn set_tracked(&mut self, tracked: ControlButtons) {
        if tracked != self.tracked {
            *self = Self::new(tracked);
        }
    }

    /// Record this tick's pressed buttons and return the tracked ones that
    /// went from released to pressed.
    pub fn update(&mut self, pressed: ControlButtons) -> ControlButtons {
        self.previous = self.state;
        self.state = pressed & self.tracked;
        self.just_pressed()
    }

    /// Tracked buttons pressed this tick but not the previous one.
    pub fn just_pressed(&self) -> ControlButtons {
        self.state & !self.previous
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new(ControlButtons::TRIGGER_BUTTON)
    }
}
