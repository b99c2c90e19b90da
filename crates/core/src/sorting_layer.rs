//! Sorting layer registry.
//!
//! Layers are authored by id but ordered by their position in the registry:
//! a layer registered later renders on top of earlier ones. Unknown ids map to
//! value 0, the same as the implicit default layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Author-facing sorting layer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SortingLayerId(pub i32);

impl SortingLayerId {
    /// The implicit layer every canvas starts on.
    pub const DEFAULT: Self = Self(0);
}

/// Maps layer ids to their render-order value.
#[derive(Debug, Clone, Default)]
pub struct SortingLayers {
    values: HashMap<SortingLayerId, i32>,
}

impl SortingLayers {
    /// Build a registry from ids listed back-to-front.
    ///
    /// The default layer keeps value 0 wherever it appears; layers before it
    /// get negative values, layers after it positive ones. An order that does
    /// not list the default layer is read as if it came first.
    pub fn from_order(order: impl IntoIterator<Item = SortingLayerId>) -> Self {
        let order: Vec<SortingLayerId> = order.into_iter().collect();
        let anchor = order
            .iter()
            .position(|id| *id == SortingLayerId::DEFAULT)
            .map_or(-1, |index| index as i32);
        let values = order
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index as i32 - anchor))
            .collect();
        Self { values }
    }

    /// Render-order value of `layer`.
    pub fn value_of(&self, layer: SortingLayerId) -> i32 {
        self.values.get(&layer).copied().unwrap_or(0)
    }
}
