//! Fixed-rate tick harness driving a [`GazePointer`] over a [`SceneFixture`].
//!
//! Time advances by `1 / ticks_per_second` per step, derived from the tick
//! counter so long runs do not accumulate rounding drift.

use crate::scene::{DeliveredEvent, SceneFixture};
use gazecast_camera::FORWARD;
use gazecast_core::{ModuleId, SimTick};
use gazecast_pointer::{DeviceButtons, GazeFrame, GazePointer, GazePointerConfig, InteractionSwitches};
use glam::{Quat, Vec3};

/// Default harness tick rate.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Head pose and controller state for one step.
#[derive(Debug, Clone, Copy)]
pub struct HeadInput {
    /// Head orientation.
    pub rotation: Quat,
    /// Controller buttons held this step.
    pub buttons: DeviceButtons,
    /// Interaction switches.
    pub switches: InteractionSwitches,
}

impl HeadInput {
    /// Looking along `rotation` with nothing pressed.
    pub fn looking(rotation: Quat) -> Self {
        Self {
            rotation,
            buttons: DeviceButtons::RELEASED,
            switches: InteractionSwitches::default(),
        }
    }

    /// Same pose with `buttons` held.
    pub fn with_buttons(mut self, buttons: DeviceButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Same pose with other switches.
    pub fn with_switches(mut self, switches: InteractionSwitches) -> Self {
        self.switches = switches;
        self
    }
}

/// Scene plus pointer, stepped at a fixed rate.
#[derive(Debug)]
pub struct GazeHarness {
    /// Host scene; inspect recorded events here.
    pub scene: SceneFixture,
    /// Pointer under test.
    pub pointer: GazePointer,
    head: Vec3,
    tick: SimTick,
    ticks_per_second: u32,
}

impl GazeHarness {
    /// Head at the origin, default tick rate.
    pub fn new(scene: SceneFixture, config: GazePointerConfig) -> Self {
        Self {
            scene,
            pointer: GazePointer::new(ModuleId(0), config),
            head: Vec3::ZERO,
            tick: SimTick::ZERO,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
        }
    }

    /// Step at `ticks_per_second`.
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second.max(1);
        self
    }

    /// Place the head at `head`.
    pub fn with_head(mut self, head: Vec3) -> Self {
        self.head = head;
        self
    }

    /// Ticks run so far.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Time of the next step, in seconds.
    pub fn now(&self) -> f32 {
        (self.tick.0 as f64 / self.ticks_per_second as f64) as f32
    }

    /// Seconds per tick.
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.ticks_per_second as f32
    }

    /// Rotation pointing the head at `point`.
    pub fn look_at(&self, point: Vec3) -> Quat {
        let direction = (point - self.head).normalize_or_zero();
        if direction == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(FORWARD, direction)
    }

    /// Run one tick and return the events it delivered.
    pub fn step(&mut self, input: HeadInput) -> Vec<DeliveredEvent> {
        let frame = GazeFrame {
            now: self.now(),
            position: self.head,
            rotation: input.rotation,
            buttons: input.buttons,
            switches: input.switches,
        };
        self.scene.set_tick(self.tick);
        self.pointer.tick(&mut self.scene, &frame);
        self.tick = self.tick.advance(1);
        self.scene.take_events()
    }

    /// Repeat `input` for `seconds` and return every delivered event.
    pub fn run_for(&mut self, seconds: f32, input: HeadInput) -> Vec<DeliveredEvent> {
        let ticks = (seconds * self.ticks_per_second as f32).round() as u64;
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.step(input));
        }
        events
    }

    /// Disable the pointer, returning the events this caused.
    pub fn disable(&mut self) -> Vec<DeliveredEvent> {
        self.scene.set_tick(self.tick);
        self.pointer.set_enabled(&mut self.scene, false);
        self.scene.take_events()
    }

    /// Re-enable the pointer.
    pub fn enable(&mut self) {
        self.pointer.set_enabled(&mut self.scene, true);
    }
}
