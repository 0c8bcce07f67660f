use serde::{Deserialize, Serialize};

/// Identifier for a branch point.
///
/// This is an index into the branch-point store (and, after a run, into
/// [`crate::tree::Tree::nodes`]). It is assigned at append time and only
/// meaningful within a single growth run.
pub type NodeId = usize;

/// Random number generator shared by every stochastic part of a run.
pub type SimRng = rand::rngs::StdRng;

/// What an endpoint is currently attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Association {
    /// Nearest growable branch point, within the influence radius.
    Branch(NodeId),
    /// Consumed: some branch point came within kill distance. Permanent.
    Dead,
    /// Nearest growable branch point lies beyond the influence radius.
    OutOfRange,
}

impl Association {
    #[inline]
    pub fn branch(self) -> Option<NodeId> {
        match self {
            Association::Branch(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_dead(self) -> bool {
        self == Association::Dead
    }
}
