//! The observe half of a generation.
//!
//! A generation runs in two steps:
//! 1. [`attraction_phase`] — every endpoint attached to a branch point
//!    adds its unit direction to that point's slot in an
//!    [`InfluenceBuffer`].
//! 2. [`growth_phase`] — every influenced branch point that is not
//!    vetoed by apical control proposes one new branch point.
//!
//! Both only read the stores. The proposals are returned as a staged
//! list so that no proposal can see another one committed in the same
//! generation; committing is left to
//! [`GrowthEngine`](crate::engine::GrowthEngine).

use glam::DVec3;

use crate::{
    apical::ApicalControl, branch::BranchPointStore, endpoint::EndPointStore,
    influence_buffer::InfluenceBuffer, types::NodeId, types::SimRng,
};

/// A proposed branch point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub parent: NodeId,
    pub pos: DVec3,
}

/// Proposals for one generation, ordered by ascending parent id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrowthPlan {
    pub candidates: Vec<Candidate>,
    /// Branch points that were influenced but vetoed by apical control.
    pub suppressed: usize,
}

/// Accumulates the pull of attached endpoints onto branch points.
///
/// The buffer is resized (and cleared) to `branch_count` first. Dead and
/// out-of-range endpoints contribute nothing. Endpoints are visited in
/// store order, so each slot lists its pulls in store order.
pub fn attraction_phase(
    endpoints: &EndPointStore,
    branch_count: usize,
    acc: &mut InfluenceBuffer,
) {
    acc.ensure_len(branch_count);
    for (assoc, dir) in endpoints.association.iter().zip(&endpoints.direction) {
        if let Some(id) = assoc.branch() {
            acc.add(id, *dir);
        }
    }
}

/// Proposes one new branch point per influenced, unsuppressed branch
/// point.
///
/// The combined pull is rescaled to `step_len` and `tropism` is added to
/// the z component. Branch points are visited in ascending id, which
/// also fixes the order of apical-control draws from `rng`. A pull that
/// cancels out exactly yields no candidate.
pub fn growth_phase(
    branches: &BranchPointStore,
    acc: &InfluenceBuffer,
    step_len: f64,
    tropism: f64,
    apical: &ApicalControl,
    rng: &mut SimRng,
) -> GrowthPlan {
    let mut plan = GrowthPlan::default();

    for id in acc.influenced_indices() {
        if apical.shoot_suppressed(branches.apical_factor[id], rng) {
            plan.suppressed += 1;
            continue;
        }

        // Unit pulls, summed with equal weight.
        let (v, d2) = acc.combined(id);
        if d2 <= 0.0 {
            continue;
        }
        let scale = d2.sqrt() / step_len;
        let mut pos = branches.pos[id] + v / scale;
        pos.z += tropism;

        plan.candidates.push(Candidate { parent: id, pos });
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ApicalConfig, search::Resolved, types::Association};
    use rand::SeedableRng;

    fn endpoint(eps: &mut EndPointStore, pos: DVec3, association: Association, dir: DVec3) {
        eps.push(
            pos,
            Resolved {
                association,
                direction: dir,
                distance: 1.0,
            },
        );
    }

    fn no_apical() -> ApicalControl {
        ApicalControl::new(&ApicalConfig::default())
    }

    #[test]
    fn attraction_phase_skips_dead_and_out_of_range() {
        let mut eps = EndPointStore::new();
        endpoint(&mut eps, DVec3::X, Association::Branch(1), DVec3::X);
        endpoint(&mut eps, DVec3::Y, Association::Dead, DVec3::Y);
        endpoint(&mut eps, DVec3::Z, Association::OutOfRange, DVec3::Z);
        endpoint(&mut eps, DVec3::ONE, Association::Branch(1), DVec3::Y);

        let mut acc = InfluenceBuffer::with_len(0);
        attraction_phase(&eps, 3, &mut acc);

        let counts: Vec<usize> = (0..acc.len()).map(|i| acc.count(i)).collect();
        assert_eq!(counts, vec![0, 2, 0]);
        assert_eq!(acc.combined(1).0, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn growth_phase_steps_along_combined_pull() {
        let mut branches = BranchPointStore::new();
        branches.push_root(DVec3::ZERO, 0);
        let mut acc = InfluenceBuffer::with_len(1);
        acc.add(0, DVec3::X);
        acc.add(0, DVec3::Y);

        let mut rng = SimRng::seed_from_u64(0);
        let plan = growth_phase(&branches, &acc, 2.0, 0.0, &no_apical(), &mut rng);

        assert_eq!(plan.candidates.len(), 1);
        let c = plan.candidates[0];
        assert_eq!(c.parent, 0);
        assert!((c.pos.length() - 2.0).abs() < 1e-12);
        assert!((c.pos.x - c.pos.y).abs() < 1e-12);
        assert_eq!(c.pos.z, 0.0);
    }

    #[test]
    fn tropism_biases_vertical_axis_after_scaling() {
        let mut branches = BranchPointStore::new();
        branches.push_root(DVec3::new(1.0, 1.0, 1.0), 0);
        let mut acc = InfluenceBuffer::with_len(1);
        acc.add(0, DVec3::X);

        let mut rng = SimRng::seed_from_u64(0);
        let plan = growth_phase(&branches, &acc, 0.5, 0.25, &no_apical(), &mut rng);

        let pos = plan.candidates[0].pos;
        assert!((pos - DVec3::new(1.5, 1.0, 1.25)).length() < 1e-12);
    }

    #[test]
    fn cancelling_pull_yields_nothing() {
        let mut branches = BranchPointStore::new();
        branches.push_root(DVec3::ZERO, 0);
        let mut acc = InfluenceBuffer::with_len(1);
        acc.add(0, DVec3::X);
        acc.add(0, -DVec3::X);

        let mut rng = SimRng::seed_from_u64(0);
        let plan = growth_phase(&branches, &acc, 1.0, 0.0, &no_apical(), &mut rng);
        assert!(plan.candidates.is_empty());
    }

    #[test]
    fn candidates_are_ordered_by_parent() {
        let mut branches = BranchPointStore::new();
        for i in 0..4 {
            branches.push_root(DVec3::new(i as f64 * 10.0, 0.0, 0.0), 0);
        }
        let mut acc = InfluenceBuffer::with_len(4);
        acc.add(3, DVec3::Z);
        acc.add(1, DVec3::Z);
        acc.add(2, DVec3::Z);

        let mut rng = SimRng::seed_from_u64(0);
        let plan = growth_phase(&branches, &acc, 1.0, 0.0, &no_apical(), &mut rng);
        let parents: Vec<NodeId> = plan.candidates.iter().map(|c| c.parent).collect();
        assert_eq!(parents, vec![1, 2, 3]);
    }

    #[test]
    fn full_apical_control_suppresses_repeat_shoots() {
        let mut branches = BranchPointStore::new();
        let root = branches.push_root(DVec3::ZERO, 0);
        branches.push_child(DVec3::Z, root, 1);
        let mut acc = InfluenceBuffer::with_len(2);
        acc.add(0, DVec3::X);
        acc.add(1, DVec3::X);

        // Root has one prior shoot: p = 1 - 1.0 = 0, always vetoed.
        let apical = ApicalControl::new(&ApicalConfig {
            strength: 1.0,
            falloff: 1.0,
            timing: 0,
        });
        let mut rng = SimRng::seed_from_u64(0);
        let plan = growth_phase(&branches, &acc, 1.0, 0.0, &apical, &mut rng);

        assert_eq!(plan.suppressed, 1);
        assert_eq!(plan.candidates.len(), 1);
        assert_eq!(plan.candidates[0].parent, 1);
    }
}
