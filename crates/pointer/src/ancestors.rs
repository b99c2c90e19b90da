//! Reusable ancestor-chain buffers for enter/exit tracking.

use gazecast_core::{ancestors, Hierarchy, ObjectId};

/// Target and its ancestors, target first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorChain {
    objects: Vec<ObjectId>,
}

impl AncestorChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill with `target`'s ancestry, reusing the allocation.
    pub fn rebuild<H: Hierarchy + ?Sized>(&mut self, hierarchy: &H, target: Option<ObjectId>) {
        self.objects.clear();
        if let Some(target) = target {
            self.objects.extend(ancestors(hierarchy, target));
        }
    }

    /// Whether `object` is on the chain.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    /// Chain members, target first.
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.objects
    }

    /// No target.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Copy `other` into this chain, reusing the allocation.
    pub fn copy_from(&mut self, other: &AncestorChain) {
        self.objects.clear();
        self.objects.extend_from_slice(&other.objects);
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Members absent from `other`, in chain order.
    pub fn difference<'a>(&'a self, other: &'a AncestorChain) -> impl Iterator<Item = ObjectId> + 'a {
        self.objects
            .iter()
            .copied()
            .filter(move |object| !other.contains(*object))
    }
}
