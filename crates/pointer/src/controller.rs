//! Gaze pointer controller: camera, resolver, activation and dispatch.

use crate::activation::GazeActivation;
use crate::buttons::DeviceButtons;
use crate::config::GazePointerConfig;
use crate::events::PointerHost;
use crate::state::PointerState;
use crate::state_machine::{PointerFrame, PointerStateMachine};
use gazecast_camera::Camera;
use gazecast_core::{ModuleId, ObjectId};
use gazecast_raycast::{HitResolver, RaycastCandidate, RaycastScene, RaycastView};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Host switches that gate interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSwitches {
    /// Gaze input is switched on.
    pub gaze_enabled: bool,
    /// The application has input focus.
    pub has_focus: bool,
}

impl Default for InteractionSwitches {
    fn default() -> Self {
        Self {
            gaze_enabled: true,
            has_focus: true,
        }
    }
}

/// Inputs for one controller tick.
#[derive(Debug, Clone, Copy)]
pub struct GazeFrame {
    pub now: f32,
    /// Head position.
    pub position: Vec3,
    /// Head orientation.
    pub rotation: Quat,
    pub buttons: DeviceButtons,
    pub switches: InteractionSwitches,
}

/// Whether the pointer processes input this tick.
pub fn is_interactable(always_enable: bool, switches: InteractionSwitches) -> bool {
    always_enable || (switches.gaze_enabled && switches.has_focus)
}

/// Head-locked gaze pointer.
#[derive(Debug)]
pub struct GazePointer {
    config: GazePointerConfig,
    camera: Camera,
    resolver: HitResolver,
    machine: PointerStateMachine,
    activation: GazeActivation,
    enabled: bool,
    interactable: bool,
}

impl GazePointer {
    pub fn new(module: ModuleId, config: GazePointerConfig) -> Self {
        let camera = config.camera.to_camera();
        let resolver = HitResolver::new(module, config.raycast.clone());
        let activation = GazeActivation::new(&config.gaze);
        Self {
            config,
            camera,
            resolver,
            machine: PointerStateMachine::new(),
            activation,
            enabled: true,
            interactable: true,
        }
    }

    pub fn config(&self) -> &GazePointerConfig {
        &self.config
    }

    /// Replace raycast and activation settings. Camera optics change, the pose is kept.
    pub fn apply_config(&mut self, config: GazePointerConfig) {
        let pose = (self.camera.position, self.camera.rotation);
        self.camera = config.camera.to_camera();
        self.camera.set_pose(pose.0, pose.1);
        *self.resolver.config_mut() = config.raycast.clone();
        self.activation.configure(&config.gaze);
        self.config = config;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pointer(&self) -> &PointerState {
        self.machine.state()
    }

    /// Hit chosen by the last tick.
    pub fn current_hit(&self) -> Option<&RaycastCandidate> {
        self.resolver.current()
    }

    pub fn target(&self) -> Option<ObjectId> {
        self.machine.target()
    }

    /// Gaze ring progress in `[0, 100]`.
    pub fn ring_percent(&self) -> f32 {
        self.activation.ring_percent()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Result of the interactability check of the last tick.
    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    /// Enable or disable. Disabling exits every entered object and leaves the
    /// pointer idle.
    pub fn set_enabled<H: PointerHost + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            info!(module = self.resolver.module().0, "gaze pointer enabled");
            return;
        }
        self.machine.disable(host);
        self.activation.reset();
        self.resolver.clear();
        info!(module = self.resolver.module().0, "gaze pointer disabled");
    }

    /// Run one tick: move the camera, resolve the hit, update activation and
    /// dispatch pointer events.
    pub fn tick<W>(&mut self, world: &mut W, frame: &GazeFrame)
    where
        W: RaycastScene + PointerHost + ?Sized,
    {
        self.camera.set_pose(frame.position, frame.rotation);
        if !self.enabled {
            return;
        }

        let interactable = is_interactable(self.config.gaze.always_enable, frame.switches);
        if interactable != self.interactable {
            debug!(
                interactable,
                gaze_enabled = frame.switches.gaze_enabled,
                has_focus = frame.switches.has_focus,
                "gaze interactability changed"
            );
            self.interactable = interactable;
            if !interactable {
                // Time spent unfocused must not count as dwell.
                self.activation.reset();
            }
        }
        if !interactable {
            return;
        }

        let view = RaycastView::from_camera(&self.camera);
        let hit = self.resolver.resolve(&*world, &view);
        self.activation
            .update(hit.map(|h| h.target), frame.buttons.either(), frame.now);

        let pointer_frame = PointerFrame {
            hit: hit.as_ref(),
            position: self.camera.pixel_center(),
            now: frame.now,
        };
        self.machine.process(world, pointer_frame, &mut self.activation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactability_predicate() {
        let on = InteractionSwitches::default();
        let unfocused = InteractionSwitches {
            has_focus: false,
            ..on
        };
        let gaze_off = InteractionSwitches {
            gaze_enabled: false,
            ..on
        };
        assert!(is_interactable(false, on));
        assert!(!is_interactable(false, unfocused));
        assert!(!is_interactable(false, gaze_off));
        assert!(is_interactable(true, unfocused));
        assert!(is_interactable(true, gaze_off));
    }

    #[test]
    fn apply_config_keeps_pose() {
        let mut pointer = GazePointer::new(ModuleId(1), GazePointerConfig::default());
        pointer.camera.set_pose(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY);

        let mut config = GazePointerConfig::default();
        config.camera.pixel_width = 800;
        config.raycast.physics_cast_distance = 5.0;
        pointer.apply_config(config);

        assert_eq!(pointer.camera().position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(pointer.camera().pixel_width, 800);
        assert_eq!(pointer.config().raycast.physics_cast_distance, 5.0);
    }
}
