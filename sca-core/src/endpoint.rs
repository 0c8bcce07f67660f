use glam::DVec3;

use crate::{
    search::Resolved,
    types::{Association, NodeId},
};

/// Attraction points, as parallel arrays in insertion order.
///
/// Positions never change. Association, direction and distance track
/// the nearest growable branch point seen so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndPointStore {
    pub pos: Vec<DVec3>,
    pub association: Vec<Association>,
    /// Unit vector from the associated branch point toward the endpoint.
    pub direction: Vec<DVec3>,
    pub distance: Vec<f64>,
}

impl EndPointStore {
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

    pub fn push(&mut self, pos: DVec3, resolved: Resolved) -> usize {
        let id = self.len();
        self.pos.push(pos);
        self.association.push(resolved.association);
        self.direction.push(resolved.direction);
        self.distance.push(resolved.distance);
        id
    }

    /// Overwrites the bookkeeping of a live endpoint.
    ///
    /// Dead endpoints are left untouched.
    pub fn set(&mut self, id: usize, resolved: Resolved) {
        if self.association[id].is_dead() {
            return;
        }
        self.association[id] = resolved.association;
        self.direction[id] = resolved.direction;
        self.distance[id] = resolved.distance;
    }

    /// Lets every live endpoint see a newly added branch point.
    ///
    /// An endpoint only reacts when `branch` is strictly closer than its
    /// recorded distance: within `kill_distance` it dies, otherwise it
    /// records the new direction and distance and attaches to `id` when
    /// in range, or becomes [`Association::OutOfRange`].
    ///
    /// Returns the number of endpoints killed.
    pub fn observe_branch(
        &mut self,
        id: NodeId,
        branch: DVec3,
        kill_distance: f64,
        influence: f64,
    ) -> usize {
        let mut killed = 0;
        for i in 0..self.len() {
            if self.association[i].is_dead() {
                continue;
            }
            let v = self.pos[i] - branch;
            let d = v.length();
            if d >= self.distance[i] {
                continue;
            }
            if d <= kill_distance {
                self.association[i] = Association::Dead;
                killed += 1;
            } else {
                self.direction[i] = v / d;
                self.distance[i] = d;
                self.association[i] = if d < influence {
                    Association::Branch(id)
                } else {
                    Association::OutOfRange
                };
            }
        }
        killed
    }

    /// Endpoints currently attached to `branch`.
    pub fn associated_with(&self, branch: NodeId) -> Vec<usize> {
        self.association
            .iter()
            .enumerate()
            .filter_map(|(i, a)| (*a == Association::Branch(branch)).then_some(i))
            .collect()
    }

    pub fn dead_count(&self) -> usize {
        self.association.iter().filter(|a| a.is_dead()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(association: Association, distance: f64) -> Resolved {
        Resolved {
            association,
            direction: DVec3::X,
            distance,
        }
    }

    #[test]
    fn closer_branch_takes_over() {
        let mut eps = EndPointStore::new();
        eps.push(DVec3::new(10.0, 0.0, 0.0), resolved(Association::Branch(0), 10.0));

        let killed = eps.observe_branch(1, DVec3::new(10.0, 4.0, 0.0), 1.0, 100.0);

        assert_eq!(killed, 0);
        assert_eq!(eps.association[0], Association::Branch(1));
        assert_eq!(eps.distance[0], 4.0);
        assert_eq!(eps.direction[0], DVec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn farther_branch_is_ignored() {
        let mut eps = EndPointStore::new();
        eps.push(DVec3::new(1.0, 0.0, 0.0), resolved(Association::Branch(0), 1.0));

        eps.observe_branch(1, DVec3::new(5.0, 0.0, 0.0), 0.0, 100.0);
        assert_eq!(eps.association[0], Association::Branch(0));
        assert_eq!(eps.distance[0], 1.0);
    }

    #[test]
    fn within_kill_distance_dies_and_stays_dead() {
        let mut eps = EndPointStore::new();
        eps.push(DVec3::new(2.0, 0.0, 0.0), resolved(Association::Branch(0), 2.0));

        assert_eq!(eps.observe_branch(1, DVec3::new(1.5, 0.0, 0.0), 0.5, 100.0), 1);
        assert_eq!(eps.association[0], Association::Dead);

        // Even an exact hit later changes nothing.
        assert_eq!(eps.observe_branch(2, DVec3::new(2.0, 0.0, 0.0), 0.5, 100.0), 0);
        eps.set(0, resolved(Association::Branch(2), 0.0));
        assert_eq!(eps.association[0], Association::Dead);
        assert_eq!(eps.dead_count(), 1);
    }

    #[test]
    fn out_of_range_still_tracks_distance() {
        let mut eps = EndPointStore::new();
        eps.push(DVec3::new(0.0, 0.0, 20.0), resolved(Association::OutOfRange, 20.0));

        eps.observe_branch(3, DVec3::new(0.0, 0.0, 8.0), 1.0, 10.0);
        assert_eq!(eps.association[0], Association::OutOfRange);
        assert_eq!(eps.distance[0], 12.0);
        assert_eq!(eps.direction[0], DVec3::Z);

        eps.observe_branch(4, DVec3::new(0.0, 0.0, 11.0), 1.0, 10.0);
        assert_eq!(eps.association[0], Association::Branch(4));
    }

    #[test]
    fn associated_with_lists_matching_endpoints() {
        let mut eps = EndPointStore::new();
        eps.push(DVec3::X, resolved(Association::Branch(2), 1.0));
        eps.push(DVec3::Y, resolved(Association::Dead, 1.0));
        eps.push(DVec3::Z, resolved(Association::Branch(2), 1.0));
        eps.push(DVec3::ONE, resolved(Association::Branch(1), 1.0));

        assert_eq!(eps.associated_with(2), vec![0, 2]);
        assert_eq!(eps.associated_with(7), Vec::<usize>::new());
    }
}
