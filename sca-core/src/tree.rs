use crate::{branch::BranchPointStore, types::NodeId};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A finished branch point.
///
/// `apex` is the first child created, `shoot` the second. A node never
/// has more than these two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub index: NodeId,
    pub pos: DVec3,
    pub parent: Option<NodeId>,
    pub generation: u32,
    pub apex: Option<NodeId>,
    pub shoot: Option<NodeId>,
    /// This node plus all of its descendants.
    pub subtree_size: u32,
}

/// The grown skeleton as an arena of nodes addressed by [`NodeId`].
///
/// Nodes are in creation order, so every parent precedes its children.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl TreeNode {
    fn new(index: NodeId, pos: DVec3, parent: Option<NodeId>, generation: u32) -> Self {
        Self {
            index,
            pos,
            parent,
            generation,
            apex: None,
            shoot: None,
            subtree_size: 1,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.apex.is_none()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.apex.into_iter().chain(self.shoot)
    }
}

impl Tree {
    /// Materializes the flat branch-point store.
    ///
    /// Children are labelled in ascending creation order: the first to
    /// register with a parent becomes its apex, the second its shoot.
    pub fn from_store(store: &BranchPointStore) -> Self {
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(store.len());

        for id in 0..store.len() {
            let parent = store.parent[id];
            nodes.push(TreeNode::new(id, store.pos[id], parent, store.generation[id]));
            if let Some(p) = parent {
                let parent = &mut nodes[p];
                if parent.apex.is_none() {
                    parent.apex = Some(id);
                } else {
                    debug_assert!(parent.shoot.is_none(), "node {p} has a third child");
                    parent.shoot = Some(id);
                }
            }
        }

        // Children come after their parents, so one reverse pass sums
        // every subtree.
        for id in (0..nodes.len()).rev() {
            if let Some(p) = nodes[id].parent {
                nodes[p].subtree_size += nodes[id].subtree_size;
            }
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Ids from `id` up to its root, `id` first.
    pub fn ancestry(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&i| self.nodes[i].parent)
    }
}
