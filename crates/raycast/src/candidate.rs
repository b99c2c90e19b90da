//! Raycast candidates and their priority order.

use gazecast_core::{ModuleId, ObjectId, SortingLayerId, SortingLayers};
use glam::{Vec2, Vec3};
use serde::Serialize;
use std::cmp::Ordering;

/// Module-level data shared by every candidate a raycasting source emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaycastSource {
    /// Source identity.
    pub module: ModuleId,
    /// Depth of the source's event camera, if it has one.
    pub camera_depth: Option<f32>,
    /// Source-level priority, higher first.
    pub sort_order_priority: i32,
    /// Source-level render priority, higher first.
    pub render_order_priority: i32,
}

impl RaycastSource {
    /// Source with no camera and the lowest priorities.
    pub fn new(module: ModuleId) -> Self {
        Self {
            module,
            camera_depth: None,
            sort_order_priority: i32::MIN,
            render_order_priority: i32::MIN,
        }
    }
}

/// One object under the ray this tick, before selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaycastCandidate {
    /// Object that was hit.
    pub target: ObjectId,
    /// Source that produced the hit.
    pub source: RaycastSource,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Screen position of the hit, in pixels.
    pub screen_position: Vec2,
    /// World-space hit point.
    pub world_position: Vec3,
    /// World-space surface normal.
    pub world_normal: Vec3,
    /// Display the hit surface is shown on.
    pub display_index: i32,
    /// Canvas sorting layer (default layer for colliders).
    pub sorting_layer: SortingLayerId,
    /// Canvas sorting order (0 for colliders).
    pub sorting_order: i32,
    /// Graphic depth within its canvas (0 for colliders).
    pub depth: i32,
    /// Emission order within the tick.
    pub index: usize,
}

impl RaycastCandidate {
    /// Valid candidates lie at a finite, non-negative distance.
    pub fn is_valid(&self) -> bool {
        self.distance.is_finite() && self.distance >= 0.0
    }
}

/// Float equality within relative tolerance.
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < f32::max(1e-6 * f32::max(a.abs(), b.abs()), f32::MIN_POSITIVE * 8.0)
}

/// Priority order of two candidates; `Less` means `lhs` wins.
pub fn compare_candidates(
    lhs: &RaycastCandidate,
    rhs: &RaycastCandidate,
    layers: &SortingLayers,
) -> Ordering {
    if lhs.source.module != rhs.source.module {
        if let (Some(l), Some(r)) = (lhs.source.camera_depth, rhs.source.camera_depth) {
            if l != r {
                // front-most camera wins
                return r.total_cmp(&l);
            }
        }

        if lhs.source.sort_order_priority != rhs.source.sort_order_priority {
            return rhs
                .source
                .sort_order_priority
                .cmp(&lhs.source.sort_order_priority);
        }

        if lhs.source.render_order_priority != rhs.source.render_order_priority {
            return rhs
                .source
                .render_order_priority
                .cmp(&lhs.source.render_order_priority);
        }
    }

    if lhs.sorting_layer != rhs.sorting_layer {
        let l = layers.value_of(lhs.sorting_layer);
        let r = layers.value_of(rhs.sorting_layer);
        if l != r {
            return r.cmp(&l);
        }
    }

    if lhs.sorting_order != rhs.sorting_order {
        return rhs.sorting_order.cmp(&lhs.sorting_order);
    }

    if !approximately(lhs.distance, rhs.distance) {
        return lhs.distance.total_cmp(&rhs.distance);
    }

    if lhs.depth != rhs.depth {
        return rhs.depth.cmp(&lhs.depth);
    }

    lhs.index.cmp(&rhs.index)
}

/// Stable in-place sort by [`compare_candidates`].
///
/// Insertion sort: the comparator is not transitive when camera and
/// camera-less sources are mixed, which `slice::sort_by` may reject with a
/// panic. Candidate lists are bounded by the scene's graphics plus
/// [`crate::MAX_PHYSICS_HITS`].
pub fn sort_candidates(candidates: &mut [RaycastCandidate], layers: &SortingLayers) {
    for i in 1..candidates.len() {
        let mut j = i;
        while j > 0 && compare_candidates(&candidates[j - 1], &candidates[j], layers) == Ordering::Greater {
            candidates.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// First valid candidate of an already sorted list.
pub fn first_valid(sorted: &[RaycastCandidate]) -> Option<&RaycastCandidate> {
    sorted.iter().find(|c| c.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(target: u32, index: usize) -> RaycastCandidate {
        RaycastCandidate {
            target: ObjectId(target),
            source: RaycastSource::new(ModuleId(0)),
            distance: 1.0,
            screen_position: Vec2::ZERO,
            world_position: Vec3::ZERO,
            world_normal: Vec3::Z,
            display_index: 0,
            sorting_layer: SortingLayerId::DEFAULT,
            sorting_order: 0,
            depth: 0,
            index,
        }
    }

    fn winner(a: RaycastCandidate, b: RaycastCandidate, layers: &SortingLayers) -> ObjectId {
        let mut list = [b, a];
        sort_candidates(&mut list, layers);
        list[0].target
    }

    #[test]
    fn deeper_camera_wins_across_sources() {
        let mut near = candidate(1, 0);
        near.source = RaycastSource { camera_depth: Some(1.0), ..RaycastSource::new(ModuleId(1)) };
        near.distance = 50.0;
        let mut far = candidate(2, 1);
        far.source = RaycastSource { camera_depth: Some(-1.0), ..RaycastSource::new(ModuleId(2)) };
        far.distance = 1.0;
        far.sorting_order = 100;
        assert_eq!(winner(near, far, &SortingLayers::default()), ObjectId(1));
    }

    #[test]
    fn camera_depth_ignored_within_one_source() {
        let mut a = candidate(1, 0);
        a.source.camera_depth = Some(5.0);
        a.distance = 9.0;
        let mut b = candidate(2, 1);
        b.source.camera_depth = Some(5.0);
        b.distance = 2.0;
        assert_eq!(winner(a, b, &SortingLayers::default()), ObjectId(2));
    }

    #[test]
    fn source_priorities_break_ties_between_sources() {
        let mut a = candidate(1, 0);
        a.source = RaycastSource { sort_order_priority: 0, ..RaycastSource::new(ModuleId(1)) };
        let mut b = candidate(2, 1);
        b.source = RaycastSource { sort_order_priority: 3, ..RaycastSource::new(ModuleId(2)) };
        assert_eq!(winner(a, b, &SortingLayers::default()), ObjectId(2));

        b.source.sort_order_priority = 0;
        b.source.render_order_priority = -5;
        a.source.render_order_priority = 7;
        assert_eq!(winner(a, b, &SortingLayers::default()), ObjectId(1));
    }

    #[test]
    fn later_sorting_layer_wins_before_distance() {
        let layers = SortingLayers::from_order([SortingLayerId::DEFAULT, SortingLayerId(9)]);
        let mut front = candidate(1, 0);
        front.sorting_layer = SortingLayerId(9);
        front.distance = 30.0;
        let back = candidate(2, 1);
        assert_eq!(winner(front, back, &layers), ObjectId(1));
    }

    #[test]
    fn higher_sorting_order_wins() {
        let mut a = candidate(1, 0);
        a.sorting_order = 2;
        a.distance = 10.0;
        let b = candidate(2, 1);
        assert_eq!(winner(a, b, &SortingLayers::default()), ObjectId(1));
    }

    #[test]
    fn closer_wins_then_depth_then_index() {
        let layers = SortingLayers::default();
        let mut a = candidate(1, 0);
        a.distance = 3.0;
        let mut b = candidate(2, 1);
        b.distance = 2.0;
        assert_eq!(winner(a, b, &layers), ObjectId(2));

        b.distance = 3.0 + 1e-7;
        b.depth = 4;
        assert_eq!(winner(a, b, &layers), ObjectId(2));

        b.depth = 0;
        assert_eq!(winner(a, b, &layers), ObjectId(1));
    }

    #[test]
    fn first_valid_skips_invalid_candidates() {
        let mut bad = candidate(1, 0);
        bad.distance = -1.0;
        let good = candidate(2, 1);
        assert_eq!(first_valid(&[bad, good]).map(|c| c.target), Some(ObjectId(2)));
        assert!(first_valid(&[bad]).is_none());
    }

    #[test]
    fn approximately_uses_relative_tolerance() {
        assert!(approximately(1000.0, 1000.0001));
        assert!(!approximately(1.0, 1.001));
        assert!(approximately(0.0, 0.0));
    }
}
