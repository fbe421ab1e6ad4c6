use slotmap::SlotMap;
use uuid::Uuid;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// An avatar armature: the bone nodes under one root.
///
/// `id` is stable for the lifetime of the skeleton and is what per-skeleton
/// caches (bind poses) key on. A rebuilt armature gets a new id.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    /// Armature root node (the bone hierarchy hangs below it).
    pub root: NodeHandle,
    /// Every bone node, in discovery order.
    pub bones: Vec<NodeHandle>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, root: NodeHandle, bones: Vec<NodeHandle>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            root,
            bones,
        }
    }

    /// Collects every node under (and including) `root` as bones, pre-order.
    #[must_use]
    pub fn from_hierarchy(name: &str, root: NodeHandle, nodes: &SlotMap<NodeHandle, Node>) -> Self {
        let mut bones = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = nodes.get(handle) else {
                continue;
            };
            bones.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        Self::new(name, root, bones)
    }

    /// Bone with the given node name.
    #[must_use]
    pub fn find_bone(&self, nodes: &SlotMap<NodeHandle, Node>, name: &str) -> Option<NodeHandle> {
        self.bones
            .iter()
            .copied()
            .find(|&h| nodes.get(h).is_some_and(|n| n.name == name))
    }
}
