//! Pointer state carried between ticks and handed to event handlers.

use gazecast_core::ObjectId;
use gazecast_raycast::RaycastCandidate;
use glam::Vec2;
use serde::Serialize;

/// Press, drag and position state of one pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerState {
    /// Current screen position, in pixels.
    pub position: Vec2,
    /// Movement since the previous tick.
    pub delta: Vec2,
    /// Screen position at the last press.
    pub press_position: Vec2,
    /// Hit resolved this tick.
    pub current_raycast: Option<RaycastCandidate>,
    /// Hit resolved at the last press.
    pub press_raycast: Option<RaycastCandidate>,
    /// Object that took the press (down handler, or click handler fallback).
    pub pressed_object: Option<ObjectId>,
    /// Object under the pointer at the press, handled or not.
    pub raw_pressed_object: Option<ObjectId>,
    /// Drag handler found at the press.
    pub drag_object: Option<ObjectId>,
    /// A drag is in progress.
    pub dragging: bool,
    /// Drag start waits for a movement threshold.
    pub use_drag_threshold: bool,
    /// A release may still produce a click.
    pub eligible_for_click: bool,
    /// Clicks pending for the current press.
    pub click_count: u32,
    /// Time of the last press; 0 once the release is processed.
    pub press_time: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            delta: Vec2::ZERO,
            press_position: Vec2::ZERO,
            current_raycast: None,
            press_raycast: None,
            pressed_object: None,
            raw_pressed_object: None,
            drag_object: None,
            dragging: false,
            use_drag_threshold: true,
            eligible_for_click: false,
            click_count: 0,
            press_time: 0.0,
        }
    }
}

impl PointerState {
    /// No press, drag or pending click.
    pub fn is_idle(&self) -> bool {
        self.pressed_object.is_none()
            && self.raw_pressed_object.is_none()
            && self.drag_object.is_none()
            && !self.dragging
            && !self.eligible_for_click
            && self.click_count == 0
    }

    /// Clear the press once its release has been handled.
    pub fn clear_press(&mut self) {
        self.pressed_object = None;
        self.raw_pressed_object = None;
        self.eligible_for_click = false;
        self.click_count = 0;
        self.press_time = 0.0;
    }

    /// Drop the drag episode.
    pub fn clear_drag(&mut self) {
        self.drag_object = None;
        self.dragging = false;
    }

    /// Back to idle, keeping the position.
    pub fn reset(&mut self) {
        let position = self.position;
        *self = Self {
            position,
            ..Self::default()
        };
    }
}
