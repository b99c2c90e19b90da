#![warn(missing_docs)]
//! Physics primitives and the ray query the hit resolver consumes.
//!
//! [`PhysicsQuery`] is the seam to the host's physics engine. [`ColliderWorld`]
//! is a small reference implementation over layered axis-aligned boxes.

use gazecast_core::{LayerMask, ObjectId, Ray};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from center position and size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the entry distance and the outward normal of the
    /// entered face. Rays starting inside the box report nothing.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let (mut t0, mut t1) = ((lo - origin) * inv, (hi - origin) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_min {
                t_min = t0;
                normal = Vec3::ZERO;
                normal[axis] = -dir.signum();
            }
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_min < 0.0 {
            return None;
        }
        Some((t_min, normal))
    }
}

/// A collider attached to a scene object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    /// Object that owns the collider.
    pub object: ObjectId,
    /// World-space bounds.
    pub bounds: Aabb,
    /// Collision layer (0..32).
    #[serde(default)]
    pub layer: u8,
    /// Disabled colliders never report hits.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// One ray/collider intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColliderHit {
    /// Object owning the collider.
    pub object: ObjectId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Masked, distance-bounded ray query against colliders.
pub trait PhysicsQuery {
    /// Append every collider hit along `ray` within `max_distance` whose layer
    /// is in `mask`. Order is unspecified.
    fn raycast_all(&self, ray: &Ray, max_distance: f32, mask: LayerMask, hits: &mut Vec<ColliderHit>);
}

/// Flat list of box colliders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColliderWorld {
    colliders: Vec<Collider>,
}

impl FromIterator<Collider> for ColliderWorld {
    fn from_iter<T: IntoIterator<Item = Collider>>(iter: T) -> Self {
        Self {
            colliders: iter.into_iter().collect(),
        }
    }
}

impl PhysicsQuery for ColliderWorld {
    fn raycast_all(&self, ray: &Ray, max_distance: f32, mask: LayerMask, hits: &mut Vec<ColliderHit>) {
        for collider in &self.colliders {
            if !collider.enabled || !mask.contains(collider.layer) {
                continue;
            }
            let Some((distance, normal)) = collider.bounds.ray_intersection(ray) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            hits.push(ColliderHit {
                object: collider.object,
                distance,
                point: ray.at(distance),
                normal,
            });
        }
        tracing::trace!(hits = hits.len(), "collider raycast");
    }
}
