//! Per-tick hit resolution over graphics and colliders.

use crate::candidate::{first_valid, sort_candidates, RaycastCandidate, RaycastSource};
use crate::graphic::{raycast_canvas, Canvas};
use gazecast_camera::Camera;
use gazecast_core::{LayerMask, ModuleId, Ray, SortingLayerId, SortingLayers};
use gazecast_physics::{ColliderHit, PhysicsQuery};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Collider hits kept per tick; extra hits are dropped.
pub const MAX_PHYSICS_HITS: usize = 255;

/// Everything the resolver reads from the host scene.
pub trait RaycastScene {
    /// Canvases with their registered graphics.
    fn canvases(&self) -> &[Canvas];
    /// Collider ray query.
    fn physics(&self) -> &dyn PhysicsQuery;
    /// Sorting layer registry.
    fn sorting_layers(&self) -> &SortingLayers;
}

/// Raycaster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycasterConfig {
    /// Skip graphics whose visible face points away from the viewer.
    pub ignore_reversed_graphics: bool,
    /// Maximum collider raycast distance.
    pub physics_cast_distance: f32,
    /// Collision layers the collider raycast considers.
    pub physics_event_mask: LayerMask,
    /// Source-level sort priority, compared against other sources.
    pub sort_order_priority: i32,
    /// Source-level render priority, compared against other sources.
    pub render_order_priority: i32,
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            ignore_reversed_graphics: false,
            physics_cast_distance: 100.0,
            physics_event_mask: LayerMask::EVERYTHING,
            sort_order_priority: i32::MIN,
            render_order_priority: i32::MIN,
        }
    }
}

/// Inputs for one resolution pass.
#[derive(Debug, Clone, Copy)]
pub struct RaycastView<'a> {
    /// Event camera, absent for camera-less displays.
    pub camera: Option<&'a Camera>,
    /// Ray used for the collider query.
    pub ray: Ray,
    /// Screen-space reference point for graphics, in pixels.
    pub pointer_position: Vec2,
}

impl<'a> RaycastView<'a> {
    /// View through the camera's centre along its forward axis.
    pub fn from_camera(camera: &'a Camera) -> Self {
        Self {
            camera: Some(camera),
            ray: camera.forward_ray(),
            pointer_position: camera.pixel_center(),
        }
    }
}

/// Collects candidates from every surface and picks the best one.
#[derive(Debug)]
pub struct HitResolver {
    module: ModuleId,
    config: RaycasterConfig,
    candidates: Vec<RaycastCandidate>,
    physics_hits: Vec<ColliderHit>,
    current: Option<RaycastCandidate>,
}

impl HitResolver {
    /// Create a resolver acting as source `module`.
    pub fn new(module: ModuleId, config: RaycasterConfig) -> Self {
        Self {
            module,
            config,
            candidates: Vec::new(),
            physics_hits: Vec::with_capacity(MAX_PHYSICS_HITS),
            current: None,
        }
    }

    /// Source identity.
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Current settings.
    pub fn config(&self) -> &RaycasterConfig {
        &self.config
    }

    /// Mutable settings; changes apply from the next pass.
    pub fn config_mut(&mut self) -> &mut RaycasterConfig {
        &mut self.config
    }

    /// Source data stamped on every candidate this resolver emits.
    pub fn source(&self, camera: Option<&Camera>) -> RaycastSource {
        RaycastSource {
            module: self.module,
            camera_depth: camera.map(|c| c.depth),
            sort_order_priority: self.config.sort_order_priority,
            render_order_priority: self.config.render_order_priority,
        }
    }

    /// Candidates of the last pass, in priority order.
    pub fn candidates(&self) -> &[RaycastCandidate] {
        &self.candidates
    }

    /// Hit chosen by the last pass.
    pub fn current(&self) -> Option<&RaycastCandidate> {
        self.current.as_ref()
    }

    /// Forget the last pass.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.physics_hits.clear();
        self.current = None;
    }

    /// Gather, sort and select this tick's hit.
    pub fn resolve<S: RaycastScene + ?Sized>(
        &mut self,
        scene: &S,
        view: &RaycastView<'_>,
    ) -> Option<RaycastCandidate> {
        self.candidates.clear();
        let source = self.source(view.camera);

        for canvas in scene.canvases() {
            raycast_canvas(
                canvas,
                &source,
                view.camera,
                view.pointer_position,
                self.config.ignore_reversed_graphics,
                &mut self.candidates,
            );
        }

        self.physics_raycast(scene.physics(), &source, view);

        sort_candidates(&mut self.candidates, scene.sorting_layers());
        self.current = first_valid(&self.candidates).copied();

        trace!(
            candidates = self.candidates.len(),
            target = ?self.current.map(|c| c.target),
            "resolved gaze hit"
        );
        self.current
    }

    fn physics_raycast(&mut self, physics: &dyn PhysicsQuery, source: &RaycastSource, view: &RaycastView<'_>) {
        self.physics_hits.clear();
        physics.raycast_all(
            &view.ray,
            self.config.physics_cast_distance,
            self.config.physics_event_mask,
            &mut self.physics_hits,
        );
        self.physics_hits.truncate(MAX_PHYSICS_HITS);

        for hit in &self.physics_hits {
            let screen_position = match view.camera {
                Some(camera) => camera.world_to_screen_point(hit.point).truncate(),
                None => view.pointer_position,
            };
            self.candidates.push(RaycastCandidate {
                target: hit.object,
                source: *source,
                distance: hit.distance,
                screen_position,
                world_position: hit.point,
                world_normal: hit.normal,
                display_index: view.camera.map_or(0, |c| c.target_display),
                sorting_layer: SortingLayerId::DEFAULT,
                sorting_order: 0,
                depth: 0,
                index: self.candidates.len(),
            });
        }
    }
}
