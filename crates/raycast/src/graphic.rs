//! UI graphics grouped into canvases, and the graphic raycast.

use crate::candidate::{RaycastCandidate, RaycastSource};
use gazecast_camera::{Camera, FORWARD};
use gazecast_core::{ObjectId, Ray, SortingLayerId};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How a canvas is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Drawn on top of everything in screen pixels; rects are in pixels.
    ScreenSpaceOverlay,
    /// Drawn at a distance in front of a camera; rects are in world units.
    ScreenSpaceCamera,
    /// Placed in the world like any other object; rects are in world units.
    #[default]
    WorldSpace,
}

/// Rectangle placement of a graphic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectTransform {
    /// Pivot position (world units, or pixels on overlay canvases).
    pub position: Vec3,
    /// Orientation; the visible face looks against [`RectTransform::forward`].
    pub rotation: Quat,
    /// Width and height.
    pub size: Vec2,
    /// Pivot within the rect, (0,0) bottom-left to (1,1) top-right.
    pub pivot: Vec2,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: Vec2::ONE,
            pivot: Vec2::splat(0.5),
        }
    }
}

impl RectTransform {
    /// Forward axis of the rect, pointing away from its visible face.
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// Whether a point in the rect's local plane lies inside the rect.
    pub fn contains_local(&self, local: Vec2) -> bool {
        let min = -self.pivot * self.size;
        let max = (Vec2::ONE - self.pivot) * self.size;
        local.cmpge(min).all() && local.cmple(max).all()
    }

    /// Whether a screen point falls on the rect.
    ///
    /// Without a camera the rect is read in screen pixels. With one, the
    /// camera's ray through `screen` is intersected with the rect plane.
    pub fn contains_screen_point(&self, screen: Vec2, camera: Option<&Camera>) -> bool {
        let inverse = self.rotation.inverse();
        match camera {
            None => {
                let offset = inverse * (screen.extend(0.0) - self.position);
                self.contains_local(offset.truncate())
            }
            Some(camera) => {
                let ray = camera.screen_point_to_ray(screen);
                let Some(t) = plane_distance(self.forward(), self.position, &ray) else {
                    return false;
                };
                if t < 0.0 {
                    return false;
                }
                let offset = inverse * (ray.at(t) - self.position);
                self.contains_local(offset.truncate())
            }
        }
    }
}

/// A drawable, raycastable UI element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graphic {
    /// Object the graphic belongs to.
    pub object: ObjectId,
    /// Placement.
    #[serde(default)]
    pub rect: RectTransform,
    /// Draw depth within the canvas; -1 means it has not been drawn.
    #[serde(default)]
    pub depth: i32,
    /// Graphics that opt out of raycasts are skipped.
    #[serde(default = "default_true")]
    pub raycast_target: bool,
    /// Culled graphics are skipped.
    #[serde(default)]
    pub culled: bool,
}

fn default_true() -> bool {
    true
}

/// A group of graphics sharing render mode and sorting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    /// Presentation mode.
    pub render_mode: RenderMode,
    /// Sorting layer of the whole canvas.
    pub sorting_layer: SortingLayerId,
    /// Order within the sorting layer, higher on top.
    pub sorting_order: i32,
    /// Display used when the canvas is drawn without a camera.
    pub target_display: i32,
    /// Graphics registered to this canvas.
    pub graphics: Vec<Graphic>,
}

/// Distance along `ray` to the plane through `point` with normal `normal`.
/// `None` when the ray runs parallel to the plane.
pub fn plane_distance(normal: Vec3, point: Vec3, ray: &Ray) -> Option<f32> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    Some(normal.dot(point - ray.origin) / denom)
}

/// Append a candidate for every graphic of `canvas` under `pointer`.
///
/// Overlay canvases never use the event camera, even when one is given:
/// their rects are tested in pixels, the far-clip check is skipped, the
/// backface test uses the camera-less rule and the distance is 0.
pub fn raycast_canvas(
    canvas: &Canvas,
    source: &RaycastSource,
    camera: Option<&Camera>,
    pointer: Vec2,
    ignore_reversed_graphics: bool,
    candidates: &mut Vec<RaycastCandidate>,
) {
    if canvas.graphics.is_empty() {
        return;
    }

    // Overlay canvases live in screen pixels; the event camera does not apply.
    let camera = match canvas.render_mode {
        RenderMode::ScreenSpaceOverlay => None,
        _ => camera,
    };
    let display_index = camera.map_or(canvas.target_display, |c| c.target_display);
    let ray = camera.map(|c| c.screen_point_to_ray(pointer));

    for graphic in &canvas.graphics {
        if !graphic.raycast_target || graphic.culled || graphic.depth == -1 {
            continue;
        }

        let rect = &graphic.rect;
        if !rect.contains_screen_point(pointer, camera) {
            continue;
        }

        if let Some(camera) = camera {
            if camera.world_to_screen_point(rect.position).z > camera.far {
                continue;
            }
        }

        let forward = rect.forward();
        if ignore_reversed_graphics && !faces_viewer(forward, rect.position, camera) {
            continue;
        }

        let (distance, origin, direction) = match (camera, ray) {
            (Some(_), Some(ray)) => {
                let Some(distance) = plane_distance(forward, rect.position, &ray) else {
                    continue;
                };
                // behind the camera
                if distance < 0.0 {
                    continue;
                }
                (distance, ray.origin, ray.direction)
            }
            _ => (0.0, pointer.extend(0.0), FORWARD),
        };

        candidates.push(RaycastCandidate {
            target: graphic.object,
            source: *source,
            distance,
            screen_position: pointer,
            world_position: origin + direction * distance,
            world_normal: -forward,
            display_index,
            sorting_layer: canvas.sorting_layer,
            sorting_order: canvas.sorting_order,
            depth: graphic.depth,
            index: candidates.len(),
        });
    }
}

/// Backface test for `ignore_reversed_graphics`.
fn faces_viewer(forward: Vec3, position: Vec3, camera: Option<&Camera>) -> bool {
    match camera {
        None => FORWARD.dot(forward) > 0.0,
        Some(camera) => {
            let near_offset = camera.forward() * camera.near;
            (position - camera.position - near_offset).dot(forward) >= 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazecast_core::ModuleId;

    fn world_graphic(object: u32, position: Vec3) -> Graphic {
        Graphic {
            object: ObjectId(object),
            rect: RectTransform {
                position,
                size: Vec2::new(2.0, 1.0),
                ..Default::default()
            },
            depth: 0,
            raycast_target: true,
            culled: false,
        }
    }

    fn world_canvas(graphics: Vec<Graphic>) -> Canvas {
        Canvas {
            graphics,
            ..Default::default()
        }
    }

    fn cast(canvas: &Canvas, camera: Option<&Camera>, ignore_reversed: bool) -> Vec<RaycastCandidate> {
        let source = RaycastSource::new(ModuleId(0));
        let pointer = camera.map_or(Vec2::ZERO, |c| c.pixel_center());
        let mut out = Vec::new();
        raycast_canvas(canvas, &source, camera, pointer, ignore_reversed, &mut out);
        out
    }

    #[test]
    fn graphic_in_front_of_camera_is_hit_at_plane_distance() {
        let camera = Camera::default();
        let canvas = world_canvas(vec![world_graphic(1, Vec3::new(0.0, 0.0, -5.0))]);
        let hits = cast(&canvas, Some(&camera), false);
        assert_eq!(hits.len(), 1);
        let hit = hits[0];
        assert_eq!(hit.target, ObjectId(1));
        assert!((hit.distance - (5.0 - camera.near)).abs() < 1e-3);
        assert!((hit.world_position.z + 5.0).abs() < 1e-3);
        assert_eq!(hit.world_normal, Vec3::Z);
    }

    #[test]
    fn graphic_outside_rect_is_missed() {
        let camera = Camera::default();
        let canvas = world_canvas(vec![world_graphic(1, Vec3::new(3.0, 0.0, -5.0))]);
        assert!(cast(&canvas, Some(&camera), false).is_empty());
    }

    #[test]
    fn graphic_behind_camera_is_rejected() {
        let camera = Camera::default();
        let canvas = world_canvas(vec![world_graphic(1, Vec3::new(0.0, 0.0, 5.0))]);
        assert!(cast(&canvas, Some(&camera), false).is_empty());
    }

    #[test]
    fn graphic_beyond_far_plane_is_rejected() {
        let camera = Camera {
            far: 10.0,
            ..Default::default()
        };
        let canvas = world_canvas(vec![world_graphic(1, Vec3::new(0.0, 0.0, -20.0))]);
        assert!(cast(&canvas, Some(&camera), false).is_empty());
    }

    #[test]
    fn hidden_graphics_are_skipped() {
        let camera = Camera::default();
        let mut undrawn = world_graphic(1, Vec3::new(0.0, 0.0, -5.0));
        undrawn.depth = -1;
        let mut culled = world_graphic(2, Vec3::new(0.0, 0.0, -5.0));
        culled.culled = true;
        let mut opted_out = world_graphic(3, Vec3::new(0.0, 0.0, -5.0));
        opted_out.raycast_target = false;
        let canvas = world_canvas(vec![undrawn, culled, opted_out]);
        assert!(cast(&canvas, Some(&camera), false).is_empty());
    }

    #[test]
    fn reversed_graphic_filtered_only_when_policy_enabled() {
        let camera = Camera::default();
        let mut reversed = world_graphic(1, Vec3::new(0.0, 0.0, -5.0));
        reversed.rect.rotation = Quat::from_rotation_y(std::f32::consts::PI);
        let canvas = world_canvas(vec![reversed]);
        assert_eq!(cast(&canvas, Some(&camera), false).len(), 1);
        assert!(cast(&canvas, Some(&camera), true).is_empty());
    }

    #[test]
    fn overlay_canvas_hits_in_pixels_at_zero_distance() {
        let camera = Camera::default();
        let canvas = Canvas {
            render_mode: RenderMode::ScreenSpaceOverlay,
            target_display: 2,
            sorting_order: 4,
            graphics: vec![Graphic {
                object: ObjectId(7),
                rect: RectTransform {
                    position: Vec3::new(960.0, 540.0, 0.0),
                    size: Vec2::new(200.0, 100.0),
                    ..Default::default()
                },
                depth: 3,
                raycast_target: true,
                culled: false,
            }],
            ..Default::default()
        };
        let hits = cast(&canvas, Some(&camera), true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[0].display_index, 2);
        assert_eq!(hits[0].sorting_order, 4);
        assert_eq!(hits[0].depth, 3);
    }

    #[test]
    fn reversed_overlay_graphic_uses_camera_less_backface_rule() {
        let camera = Camera::default();
        let canvas = Canvas {
            render_mode: RenderMode::ScreenSpaceOverlay,
            graphics: vec![Graphic {
                object: ObjectId(7),
                rect: RectTransform {
                    position: Vec3::new(960.0, 540.0, 0.0),
                    rotation: Quat::from_rotation_y(std::f32::consts::PI),
                    size: Vec2::new(200.0, 100.0),
                    ..Default::default()
                },
                depth: 0,
                raycast_target: true,
                culled: false,
            }],
            ..Default::default()
        };
        assert_eq!(cast(&canvas, Some(&camera), false).len(), 1);
        assert!(cast(&canvas, Some(&camera), true).is_empty());
    }

    #[test]
    fn insertion_index_follows_emission_order() {
        let camera = Camera::default();
        let canvas = world_canvas(vec![
            world_graphic(1, Vec3::new(0.0, 0.0, -5.0)),
            world_graphic(2, Vec3::new(0.0, 0.0, -6.0)),
        ]);
        let hits = cast(&canvas, Some(&camera), false);
        let indices: Vec<_> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn pivot_shifts_rect_bounds() {
        let rect = RectTransform {
            size: Vec2::new(2.0, 2.0),
            pivot: Vec2::ZERO,
            ..Default::default()
        };
        assert!(rect.contains_local(Vec2::new(1.5, 1.5)));
        assert!(!rect.contains_local(Vec2::new(-0.5, 0.5)));
    }
}
