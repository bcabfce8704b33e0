//! Entity arena standing in for the engine's scene graph.
//!
//! Entities are addressed by generational handles: a handle whose entity was
//! despawned simply resolves to `None`, so holders never dangle.
//! Transforms are stored in world space.

use bevy_math::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: &'static str,
    transform: Transform,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: &'static str, transform: Transform) -> EntityId {
        self.insert(Node { name, transform, parent: None, children: Vec::new() })
    }

    /// Spawn under `parent`. A stale parent yields a root entity.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: &'static str,
        transform: Transform,
    ) -> EntityId {
        let parent_live = self.contains(parent);
        let id = self.insert(Node {
            name,
            transform,
            parent: parent_live.then_some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Remove an entity and its whole subtree. Returns false for stale handles.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(node) = self.take(id) else {
            return false;
        };
        if let Some(parent) = node.parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.take(child) {
                stack.extend(n.children);
            }
        }
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.node(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn name(&self, id: EntityId) -> Option<&'static str> {
        self.node(id).map(|n| n.name)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.node(id).map(|n| &n.transform)
    }

    pub fn translation(&self, id: EntityId) -> Option<Vec3> {
        self.transform(id).map(|t| t.translation)
    }

    pub fn set_translation(&mut self, id: EntityId, translation: Vec3) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.transform.translation = translation;
                true
            }
            None => false,
        }
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: Quat) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.transform.rotation = rotation;
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, node: Node) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return EntityId { index, generation: slot.generation };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, node: Some(node) });
        EntityId { index, generation: 0 }
    }

    fn take(&mut self, id: EntityId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    fn node(&self, id: EntityId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handles_resolve_to_none_after_reuse() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Transform::IDENTITY);
        assert!(scene.despawn(a));
        let b = scene.spawn("b", Transform::from_translation(Vec3::X));
        assert!(!scene.contains(a), "old handle must not see the reused slot");
        assert_eq!(scene.name(b), Some("b"));
        assert!(!scene.despawn(a));
    }

    #[test]
    fn despawn_removes_subtree() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", Transform::IDENTITY);
        let child = scene.spawn_child(root, "child", Transform::IDENTITY);
        let grandchild = scene.spawn_child(child, "grandchild", Transform::IDENTITY);
        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.len(), 3);
        scene.despawn(root);
        assert!(!scene.contains(child) && !scene.contains(grandchild));
        assert!(scene.is_empty());
    }
}
