//! Per-tick pointer event dispatch.
//!
//! Each call to [`PointerStateMachine::process`] runs, in order:
//!
//! 1. Exit/Enter over the difference of the previous and current ancestor
//!    chains.
//! 2. Hover when the target did not change.
//! 3. Submit, which ends the tick.
//! 4. The press dispatch: drag continuation, debounce, press or release.

use crate::activation::ActivationSource;
use crate::ancestors::AncestorChain;
use crate::events::{execute, execute_hierarchy, find_handler, PointerEventKind, PointerHost};
use crate::state::PointerState;
use gazecast_core::ObjectId;
use gazecast_raycast::RaycastCandidate;
use glam::Vec2;
use tracing::debug;

/// Minimum time between a press and the next down/up processing.
pub const CLICK_INTERVAL: f32 = 0.2;
/// Hold time after a press before a drag starts.
pub const TIME_TO_DRAG: f32 = 0.2;

/// Inputs for one tick.
#[derive(Debug, Clone, Copy)]
pub struct PointerFrame<'a> {
    /// Resolved hit, if any.
    pub hit: Option<&'a RaycastCandidate>,
    /// Pointer screen position, in pixels.
    pub position: Vec2,
    /// Tick time.
    pub now: f32,
}

/// Turns resolved hits and activation signals into pointer events.
#[derive(Debug, Default)]
pub struct PointerStateMachine {
    state: PointerState,
    target: Option<ObjectId>,
    previous_target: Option<ObjectId>,
    chain: AncestorChain,
    previous_chain: AncestorChain,
}

impl PointerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    /// Current target.
    pub fn target(&self) -> Option<ObjectId> {
        self.target
    }

    /// Objects currently entered, target first.
    pub fn entered(&self) -> &[ObjectId] {
        self.previous_chain.as_slice()
    }

    /// Run one tick.
    pub fn process<H, A>(&mut self, host: &mut H, frame: PointerFrame<'_>, activation: &mut A)
    where
        H: PointerHost + ?Sized,
        A: ActivationSource + ?Sized,
    {
        let now = frame.now;
        self.state.delta = frame.position - self.state.position;
        self.state.position = frame.position;
        self.state.current_raycast = frame.hit.copied();
        self.previous_target = self.target;
        self.target = frame.hit.map(|hit| hit.target);

        self.exit_enter(host);
        self.hover(host);

        if activation.submit(now) {
            self.submit(host);
            return;
        }

        let down = activation.down(now);
        let hold = activation.hold(now);
        if hold && !down {
            self.drag(host, now);
        } else if now - self.state.press_time < CLICK_INTERVAL {
            // Debounce: UI transitions need time between down and up.
        } else if down && !self.state.eligible_for_click {
            self.press(host, now);
        } else if !hold {
            self.release(host);
        }
    }

    /// Send Exit to the entered chain and return to idle.
    pub fn disable<H: PointerHost + ?Sized>(&mut self, host: &mut H) {
        for object in self.previous_chain.as_slice() {
            execute(host, *object, PointerEventKind::Exit, &self.state);
        }
        self.state.reset();
        self.state.current_raycast = None;
        self.state.press_raycast = None;
        self.target = None;
        self.previous_target = None;
        self.chain.clear();
        self.previous_chain.clear();
    }

    fn exit_enter<H: PointerHost + ?Sized>(&mut self, host: &mut H) {
        self.chain.rebuild(host, self.target);
        for object in self.previous_chain.difference(&self.chain) {
            if execute(host, object, PointerEventKind::Exit, &self.state) {
                debug!(%object, "exit");
            }
        }
        for object in self.chain.difference(&self.previous_chain) {
            if execute(host, object, PointerEventKind::Enter, &self.state) {
                debug!(%object, "enter");
            }
        }
        self.previous_chain.copy_from(&self.chain);
    }

    fn hover<H: PointerHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(target) = self.target {
            if self.previous_target == Some(target) {
                execute_hierarchy(host, target, PointerEventKind::Hover, &self.state);
            }
        }
    }

    fn submit<H: PointerHost + ?Sized>(&mut self, host: &mut H) {
        let Some(target) = self.target else {
            return;
        };
        debug!(%target, "submit");
        execute_hierarchy(host, target, PointerEventKind::Submit, &self.state);
    }

    fn press<H: PointerHost + ?Sized>(&mut self, host: &mut H, now: f32) {
        let Some(target) = self.target else {
            return;
        };

        self.state.press_position = self.state.position;
        self.state.press_raycast = self.state.current_raycast;
        self.state.pressed_object =
            execute_hierarchy(host, target, PointerEventKind::Down, &self.state)
                .or_else(|| find_handler(host, target, PointerEventKind::Click));
        debug!(%target, pressed = ?self.state.pressed_object, "press");

        self.state.drag_object = find_handler(host, target, PointerEventKind::Drag);
        if let Some(drag) = self.state.drag_object {
            execute(host, drag, PointerEventKind::InitializePotentialDrag, &self.state);
        }

        self.state.raw_pressed_object = Some(target);
        self.state.eligible_for_click = true;
        self.state.delta = Vec2::ZERO;
        self.state.dragging = false;
        self.state.use_drag_threshold = true;
        self.state.click_count = 1;
        self.state.press_time = now;
    }

    fn drag<H: PointerHost + ?Sized>(&mut self, host: &mut H, now: f32) {
        if now - self.state.press_time < TIME_TO_DRAG {
            return;
        }
        let Some(drag) = self.state.drag_object else {
            return;
        };

        if self.state.dragging {
            execute(host, drag, PointerEventKind::Drag, &self.state);
        } else {
            debug!(object = %drag, "begin drag");
            execute(host, drag, PointerEventKind::BeginDrag, &self.state);
            self.state.dragging = true;
            self.state.eligible_for_click = false;
        }
    }

    fn release<H: PointerHost + ?Sized>(&mut self, host: &mut H) {
        if !self.state.eligible_for_click && !self.state.dragging {
            return;
        }

        if let Some(pressed) = self.state.pressed_object {
            execute(host, pressed, PointerEventKind::Up, &self.state);
        }

        if self.state.eligible_for_click {
            let clicked = self
                .target
                .and_then(|target| find_handler(host, target, PointerEventKind::Click));
            match (clicked, self.state.pressed_object) {
                (Some(clicked), Some(pressed)) if clicked == pressed => {
                    execute(host, pressed, PointerEventKind::Click, &self.state);
                }
                (Some(clicked), pressed) => {
                    debug!(%clicked, ?pressed, "click target differs from pressed object");
                }
                (None, _) => {}
            }
        } else if self.state.dragging {
            if let Some(drag) = self.state.drag_object {
                let drop = self
                    .target
                    .and_then(|target| find_handler(host, target, PointerEventKind::Drop));
                if drop == Some(drag) {
                    execute(host, drag, PointerEventKind::Drop, &self.state);
                }
                debug!(object = %drag, "end drag");
                execute(host, drag, PointerEventKind::EndDrag, &self.state);
            }
        }

        self.state.clear_drag();
        self.state.clear_press();
    }
}
