//! Nearest growable branch point lookup.
//!
//! [`NearestSearch`] is the single seam for nearest-neighbour queries.
//! [`LinearScan`] is the portable default; a spatial index may replace it
//! as long as full (two-child) branch points are never returned.

use glam::DVec3;

use crate::{branch::BranchPointStore, types::Association, types::NodeId};

/// Raw result of a nearest query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Closest {
    pub index: NodeId,
    pub d2: f64,
    /// From the branch point to the query point.
    pub offset: DVec3,
}

/// A nearest query turned into endpoint bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved {
    pub association: Association,
    /// Unit vector from the branch point toward the endpoint.
    pub direction: DVec3,
    pub distance: f64,
}

impl Closest {
    /// Converts to a unit direction and true distance. Beyond `influence`
    /// the association is [`Association::OutOfRange`], but direction and
    /// distance are still reported.
    pub fn resolve(self, influence: f64) -> Resolved {
        let distance = self.d2.sqrt();
        let direction = if distance > 0.0 {
            self.offset / distance
        } else {
            DVec3::ZERO
        };
        let association = if distance < influence {
            Association::Branch(self.index)
        } else {
            Association::OutOfRange
        };
        Resolved {
            association,
            direction,
            distance,
        }
    }
}

pub trait NearestSearch {
    /// Finds the growable branch point closest to `p`, or `None` if no
    /// branch point can grow.
    fn closest(&self, branches: &BranchPointStore, p: DVec3) -> Option<Closest>;
}

/// Linear scan over all branch points. Ties go to the lowest index.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearScan;

impl NearestSearch for LinearScan {
    fn closest(&self, branches: &BranchPointStore, p: DVec3) -> Option<Closest> {
        let mut best: Option<Closest> = None;
        for id in branches.growable_indices() {
            let offset = p - branches.pos[id];
            let d2 = offset.length_squared();
            if best.is_none_or(|b| d2 < b.d2) {
                best = Some(Closest {
                    index: id,
                    d2,
                    offset,
                });
            }
        }
        best
    }
}
