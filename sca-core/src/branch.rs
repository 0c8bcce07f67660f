use glam::DVec3;

use crate::types::NodeId;

/// Children a branch point may have before it stops growing.
pub const MAX_CHILDREN: u8 = 2;

/// Growth state of every branch point, as parallel arrays indexed by
/// [`NodeId`].
///
/// Entries are only ever appended; an id stays valid for the whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchPointStore {
    pub pos: Vec<DVec3>,
    pub parent: Vec<Option<NodeId>>,
    /// Last generation that touched this point or one of its descendants.
    pub generation: Vec<u32>,
    pub child_count: Vec<u8>,
    /// Number of shoots already spawned from this point.
    pub apical_factor: Vec<u32>,
}

impl BranchPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// A branch point is growable while it has fewer than two children.
    #[inline]
    pub fn is_growable(&self, id: NodeId) -> bool {
        self.child_count[id] < MAX_CHILDREN
    }

    /// Appends a parentless branch point.
    pub fn push_root(&mut self, pos: DVec3, generation: u32) -> NodeId {
        let id = self.len();
        self.pos.push(pos);
        self.parent.push(None);
        self.generation.push(generation);
        self.child_count.push(0);
        self.apical_factor.push(0);
        id
    }

    /// Appends a child of `parent` and updates the lineage.
    ///
    /// Every ancestor gets its generation stamped to `generation`, and the
    /// parent's child count and apical factor go up by one.
    ///
    /// ### Panics
    /// Panics if `parent` is already full or out of bounds.
    pub fn push_child(&mut self, pos: DVec3, parent: NodeId, generation: u32) -> NodeId {
        assert!(
            self.is_growable(parent),
            "branch point {parent} already has {MAX_CHILDREN} children"
        );

        let id = self.len();
        self.pos.push(pos);
        self.parent.push(Some(parent));
        self.generation.push(generation);
        self.child_count.push(0);
        self.apical_factor.push(0);

        let mut cursor = Some(parent);
        while let Some(p) = cursor {
            self.generation[p] = generation;
            cursor = self.parent[p];
        }

        self.child_count[parent] += 1;
        self.apical_factor[parent] += 1;
        id
    }

    /// Ids of branch points that can still grow.
    pub fn growable_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.child_count
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| (c < MAX_CHILDREN).then_some(i))
    }
}
