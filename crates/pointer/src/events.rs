//! Pointer events and their delivery through the host.

use crate::state::PointerState;
use gazecast_core::{ancestors, Hierarchy, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Semantic pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer entered the object or one of its children.
    Enter,
    /// Pointer left the object and all of its children.
    Exit,
    /// Pointer stayed on the object for another tick.
    Hover,
    /// Press started on the object.
    Down,
    /// Press ended.
    Up,
    /// Press and release on the same object.
    Click,
    /// A press landed on something draggable.
    InitializePotentialDrag,
    /// Drag started.
    BeginDrag,
    /// Drag continued.
    Drag,
    /// Drag released over the drop target.
    Drop,
    /// Drag ended.
    EndDrag,
    /// Submit gesture.
    Submit,
}

impl PointerEventKind {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Hover => "hover",
            Self::Down => "down",
            Self::Up => "up",
            Self::Click => "click",
            Self::InitializePotentialDrag => "initialize_potential_drag",
            Self::BeginDrag => "begin_drag",
            Self::Drag => "drag",
            Self::Drop => "drop",
            Self::EndDrag => "end_drag",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for PointerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-side event handling: which objects implement which handlers, and
/// delivery to them.
pub trait PointerHost: Hierarchy {
    /// Whether `object` itself implements a handler for `kind`.
    fn handles(&self, object: ObjectId, kind: PointerEventKind) -> bool;

    /// Deliver `kind` to `object`. Only called when `handles` is true.
    fn deliver(&mut self, object: ObjectId, kind: PointerEventKind, pointer: &PointerState);
}

/// Nearest object from `object` up through its ancestors handling `kind`.
pub fn find_handler<H: PointerHost + ?Sized>(
    host: &H,
    object: ObjectId,
    kind: PointerEventKind,
) -> Option<ObjectId> {
    ancestors(host, object).find(|candidate| host.handles(*candidate, kind))
}

/// Deliver `kind` to `object` if it handles it.
pub fn execute<H: PointerHost + ?Sized>(
    host: &mut H,
    object: ObjectId,
    kind: PointerEventKind,
    pointer: &PointerState,
) -> bool {
    if !host.handles(object, kind) {
        return false;
    }
    debug!(%object, event = %kind, "pointer event");
    host.deliver(object, kind, pointer);
    true
}

/// Deliver `kind` to the nearest handler in `object`'s hierarchy and return it.
pub fn execute_hierarchy<H: PointerHost + ?Sized>(
    host: &mut H,
    object: ObjectId,
    kind: PointerEventKind,
    pointer: &PointerState,
) -> Option<ObjectId> {
    let handler = find_handler(host, object, kind)?;
    debug!(%object, %handler, event = %kind, "pointer event (hierarchy)");
    host.deliver(handler, kind, pointer);
    Some(handler)
}
