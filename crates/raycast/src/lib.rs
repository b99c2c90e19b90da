//! Gaze hit resolution.
//!
//! Every tick the [`HitResolver`] gathers candidate hits between the gaze and
//! the interactive surfaces of the scene:
//!
//! - **Graphics**: UI elements grouped into [`Canvas`]es, tested against a
//!   screen-space reference point through the event camera.
//! - **Colliders**: a masked, distance-bounded ray query through
//!   [`gazecast_physics::PhysicsQuery`], capped at [`MAX_PHYSICS_HITS`].
//!
//! Candidates are ordered by [`compare_candidates`] (camera depth, source
//! priority, sorting layer, sorting order, distance, graphic depth, emission
//! index) and the first valid one becomes the current target.
//!
//! # Example
//!
//! ```rust,no_run
//! use gazecast_camera::Camera;
//! use gazecast_core::ModuleId;
//! use gazecast_raycast::{HitResolver, RaycastScene, RaycastView, RaycasterConfig};
//!
//! fn look<S: RaycastScene>(scene: &S, camera: &Camera) {
//!     let mut resolver = HitResolver::new(ModuleId(0), RaycasterConfig::default());
//!     if let Some(hit) = resolver.resolve(scene, &RaycastView::from_camera(camera)) {
//!         println!("looking at {} from {:.2}m", hit.target, hit.distance);
//!     }
//! }
//! ```

pub mod candidate;
pub mod graphic;
pub mod resolver;

pub use candidate::{
    approximately, compare_candidates, first_valid, sort_candidates, RaycastCandidate,
    RaycastSource,
};
pub use graphic::{plane_distance, raycast_canvas, Canvas, Graphic, RectTransform, RenderMode};
pub use resolver::{HitResolver, RaycastScene, RaycastView, RaycasterConfig, MAX_PHYSICS_HITS};
