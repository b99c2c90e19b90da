//! Reference host scene: objects with parents and handlers, canvases,
//! colliders and sorting layers, recording every delivered pointer event.

use anyhow::{bail, Context, Result};
use gazecast_core::{Hierarchy, ObjectId, SimTick, SortingLayerId, SortingLayers};
use gazecast_physics::{Collider, ColliderWorld, PhysicsQuery};
use gazecast_pointer::{PointerEventKind, PointerHost, PointerState};
use gazecast_raycast::{Canvas, RaycastScene};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Scene object as authored in a scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object handle.
    pub id: ObjectId,
    /// Display name used in logs and event records.
    #[serde(default)]
    pub name: String,
    /// Parent object.
    #[serde(default)]
    pub parent: Option<ObjectId>,
    /// Event kinds this object handles.
    #[serde(default)]
    pub handles: BTreeSet<PointerEventKind>,
}

/// Serialized scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Sorting layer ids, back to front.
    pub sorting_layers: Vec<SortingLayerId>,
    /// Objects and their hierarchy.
    pub objects: Vec<SceneObject>,
    /// UI canvases.
    pub canvases: Vec<Canvas>,
    /// Box colliders.
    pub colliders: Vec<Collider>,
}

/// Pointer event as seen by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveredEvent {
    /// Tick during which the event was delivered.
    pub tick: SimTick,
    /// Receiving object.
    pub object: ObjectId,
    /// Event kind.
    pub kind: PointerEventKind,
    /// Pending clicks at delivery.
    pub click_count: u32,
    /// Drag in progress at delivery.
    pub dragging: bool,
}

/// In-memory host implementing [`RaycastScene`] and [`PointerHost`].
#[derive(Debug, Default)]
pub struct SceneFixture {
    objects: BTreeMap<ObjectId, SceneObject>,
    canvases: Vec<Canvas>,
    physics: ColliderWorld,
    layers: SortingLayers,
    tick: SimTick,
    events: Vec<DeliveredEvent>,
}

impl SceneFixture {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene, checking that every reference names a known object.
    pub fn from_description(description: SceneDescription) -> Result<Self> {
        let mut objects = BTreeMap::new();
        for object in description.objects {
            let id = object.id;
            if objects.insert(id, object).is_some() {
                bail!("duplicate object {id}");
            }
        }
        for object in objects.values() {
            if let Some(parent) = object.parent {
                if !objects.contains_key(&parent) {
                    bail!("object {} has unknown parent {parent}", object.id);
                }
            }
        }
        for graphic in description.canvases.iter().flat_map(|c| &c.graphics) {
            if !objects.contains_key(&graphic.object) {
                bail!("graphic references unknown object {}", graphic.object);
            }
        }
        for collider in &description.colliders {
            if !objects.contains_key(&collider.object) {
                bail!("collider references unknown object {}", collider.object);
            }
        }

        Ok(Self {
            objects,
            canvases: description.canvases,
            physics: description.colliders.into_iter().collect(),
            layers: SortingLayers::from_order(description.sorting_layers),
            tick: SimTick::ZERO,
            events: Vec::new(),
        })
    }

    /// Parse a TOML scene.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let description: SceneDescription =
            toml::from_str(contents).context("Failed to parse scene")?;
        Self::from_description(description)
    }

    /// Load a TOML scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid scene {}", path.display()))
    }

    /// Add or replace an object.
    pub fn insert_object(
        &mut self,
        id: u32,
        name: &str,
        parent: Option<u32>,
        handles: &[PointerEventKind],
    ) -> ObjectId {
        let id = ObjectId(id);
        self.objects.insert(
            id,
            SceneObject {
                id,
                name: name.to_string(),
                parent: parent.map(ObjectId),
                handles: handles.iter().copied().collect(),
            },
        );
        id
    }

    /// Mutable canvases.
    pub fn canvases_mut(&mut self) -> &mut Vec<Canvas> {
        &mut self.canvases
    }

    /// Stamp subsequent events with `tick`.
    pub fn set_tick(&mut self, tick: SimTick) {
        self.tick = tick;
    }

    /// Object name, or its handle when unnamed or unknown.
    pub fn name_of(&self, object: ObjectId) -> String {
        match self.objects.get(&object) {
            Some(entry) if !entry.name.is_empty() => entry.name.clone(),
            _ => object.to_string(),
        }
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<DeliveredEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Hierarchy for SceneFixture {
    fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.objects.get(&object).and_then(|o| o.parent)
    }
}

impl PointerHost for SceneFixture {
    fn handles(&self, object: ObjectId, kind: PointerEventKind) -> bool {
        self.objects
            .get(&object)
            .is_some_and(|o| o.handles.contains(&kind))
    }

    fn deliver(&mut self, object: ObjectId, kind: PointerEventKind, pointer: &PointerState) {
        debug!(tick = self.tick.0, %object, event = %kind, "delivered");
        self.events.push(DeliveredEvent {
            tick: self.tick,
            object,
            kind,
            click_count: pointer.click_count,
            dragging: pointer.dragging,
        });
    }
}

impl RaycastScene for SceneFixture {
    fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    fn physics(&self) -> &dyn PhysicsQuery {
        &self.physics
    }

    fn sorting_layers(&self) -> &SortingLayers {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
sorting_layers = [0, 7]

[[objects]]
id = 1
name = "panel"
handles = ["enter", "exit"]

[[objects]]
id = 2
name = "button"
parent = 1
handles = ["down", "up", "click"]

[[objects]]
id = 3
name = "crate"

[[canvases]]
render_mode = "world_space"
sorting_layer = 7

[[canvases.graphics]]
object = 2
rect = { position = [0.0, 0.0, -2.0], size = [1.0, 0.5] }

[[colliders]]
object = 3
bounds = { min = [-1.0, -1.0, -6.0], max = [1.0, 1.0, -4.0] }
"#;

    #[test]
    fn parses_scene_file() {
        let scene = SceneFixture::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.name_of(ObjectId(2)), "button");
        assert_eq!(scene.parent(ObjectId(2)), Some(ObjectId(1)));
        assert!(scene.handles(ObjectId(2), PointerEventKind::Click));
        assert!(!scene.handles(ObjectId(3), PointerEventKind::Click));
        assert_eq!(scene.canvases().len(), 1);
        assert_eq!(scene.sorting_layers().value_of(SortingLayerId(7)), 1);
        assert_eq!(scene.name_of(ObjectId(9)), "#9");
    }

    #[test]
    fn rejects_dangling_references() {
        let err = SceneFixture::from_toml_str("[[objects]]\nid = 1\nparent = 4\n").unwrap_err();
        assert!(err.to_string().contains("unknown parent"));

        let err = SceneFixture::from_toml_str(
            "[[colliders]]\nobject = 5\nbounds = { min = [0.0, 0.0, 0.0], max = [1.0, 1.0, 1.0] }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown object"));
    }

    #[test]
    fn records_delivered_events_with_tick() {
        let mut scene = SceneFixture::new();
        let button = scene.insert_object(1, "button", None, &[PointerEventKind::Click]);
        scene.set_tick(SimTick(4));
        let pointer = PointerState {
            click_count: 1,
            ..Default::default()
        };
        scene.deliver(button, PointerEventKind::Click, &pointer);
        let events = scene.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tick, SimTick(4));
        assert_eq!(events[0].click_count, 1);
        assert!(scene.take_events().is_empty());
    }
}
