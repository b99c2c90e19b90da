//! Parent links of the host scene graph.

use crate::ObjectId;

/// Upper bound on ancestor walks. A host whose parent links form a cycle
/// stops here instead of looping forever.
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// Read access to the host's object hierarchy.
pub trait Hierarchy {
    /// Parent of `object`, or `None` for a root (or an unknown object).
    fn parent(&self, object: ObjectId) -> Option<ObjectId>;
}

/// Iterator from an object up to its root, the object itself first.
pub struct Ancestors<'a, H: ?Sized> {
    hierarchy: &'a H,
    next: Option<ObjectId>,
    remaining: usize,
}

impl<H: Hierarchy + ?Sized> Iterator for Ancestors<'_, H> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

/// Walk `object` and its ancestors.
pub fn ancestors<H: Hierarchy + ?Sized>(hierarchy: &H, object: ObjectId) -> Ancestors<'_, H> {
    Ancestors {
        hierarchy,
        next: Some(object),
        remaining: MAX_HIERARCHY_DEPTH,
    }
}
