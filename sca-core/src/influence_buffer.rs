use crate::types::NodeId;
use glam::DVec3;

/// Sums a set of vectors.
///
/// Returns the elementwise sum and its squared magnitude. Callers pass
/// unit vectors so every endpoint pulls with equal weight.
pub fn direction(vectors: &[DVec3]) -> (DVec3, f64) {
    let sum = vectors.iter().fold(DVec3::ZERO, |acc, v| acc + *v);
    (sum, sum.length_squared())
}

/// A temporary buffer that collects endpoint pulls per branch point.
///
/// For each `NodeId`, this buffer stores the direction vectors added for
/// it, in the order they were added. [`InfluenceBuffer::combined`] feeds
/// them to [`direction`], so feeding the endpoints in store order sums
/// them in store order.
#[derive(Debug)]
pub struct InfluenceBuffer {
    pulls: Vec<Vec<DVec3>>,
}

impl InfluenceBuffer {
    /// Creates a new [`InfluenceBuffer`] with the given length and no
    /// pulls.
    pub fn with_len(len: usize) -> Self {
        Self {
            pulls: vec![Vec::new(); len],
        }
    }

    /// Resizes to `len` if needed and clears every entry.
    pub fn ensure_len(&mut self, len: usize) {
        if self.pulls.len() != len {
            self.pulls.resize_with(len, Vec::new);
        }
        self.clear();
    }

    /// Clears all collected pulls, keeping the length.
    pub fn clear(&mut self) {
        for p in &mut self.pulls {
            p.clear();
        }
    }

    /// Adds one directional pull for the given node.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: NodeId, dir: DVec3) {
        self.pulls[id].push(dir);
    }

    /// Combined pull on a node: the summed vector and its squared
    /// magnitude. Zero for nodes without pulls.
    #[inline]
    pub fn combined(&self, id: NodeId) -> (DVec3, f64) {
        direction(&self.pulls[id])
    }

    /// Number of pulls collected for a node.
    #[inline]
    pub fn count(&self, id: NodeId) -> usize {
        self.pulls[id].len()
    }

    pub fn len(&self) -> usize {
        self.pulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulls.is_empty()
    }

    /// Ids of all influenced nodes, ascending.
    pub fn influenced_indices<'a>(&'a self) -> impl Iterator<Item = NodeId> + 'a {
        self.pulls
            .iter()
            .enumerate()
            .filter_map(|(i, p)| if p.is_empty() { None } else { Some(i) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;
    use glam::DVec3;

    #[test]
    fn direction_is_exact_elementwise_sum() {
        let vs = [
            DVec3::new(0.25, -0.5, 1.0),
            DVec3::new(1.5, 2.0, -3.0),
            DVec3::new(-0.75, 0.5, 0.125),
        ];
        let (sum, d2) = direction(&vs);

        assert_eq!(sum.x, 0.25 + 1.5 + -0.75);
        assert_eq!(sum.y, -0.5 + 2.0 + 0.5);
        assert_eq!(sum.z, 1.0 + -3.0 + 0.125);
        assert_eq!(d2, sum.x * sum.x + sum.y * sum.y + sum.z * sum.z);
    }

    #[test]
    fn direction_of_unit_vectors_is_bounded_by_count() {
        let vs: Vec<DVec3> = (0..7)
            .map(|i| {
                let a = i as f64 * 0.9;
                DVec3::new(a.cos(), a.sin(), 0.3 * a).normalize()
            })
            .collect();
        let (_, d2) = direction(&vs);
        assert!(d2.sqrt() <= vs.len() as f64 + 1e-12);

        let same = vec![DVec3::Z; 4];
        let (sum, d2) = direction(&same);
        assert_eq!(sum, DVec3::new(0.0, 0.0, 4.0));
        assert_eq!(d2, 16.0);
    }

    #[test]
    fn direction_of_nothing_is_zero() {
        assert_eq!(direction(&[]), (DVec3::ZERO, 0.0));
    }

    #[test]
    fn with_len_initializes_empty_state() {
        let buf = InfluenceBuffer::with_len(5);

        assert_eq!(buf.len(), 5);
        assert!((0..5).all(|i| buf.count(i) == 0));
        assert_eq!(buf.influenced_indices().count(), 0);
    }

    #[test]
    fn ensure_len_resizes_and_clears() {
        let mut buf = InfluenceBuffer::with_len(2);
        let id: NodeId = 1;
        buf.add(id, DVec3::X);
        assert_eq!(buf.count(id), 1);

        buf.ensure_len(2);
        assert_eq!(buf.count(id), 0);

        buf.add(0, DVec3::X);
        buf.ensure_len(4);
        assert_eq!(buf.len(), 4);
        assert!((0..4).all(|i| buf.count(i) == 0));
    }

    #[test]
    fn combined_matches_direction() {
        let vs = [
            DVec3::new(0.6, 0.8, 0.0),
            DVec3::new(0.0, 0.6, 0.8),
            DVec3::new(-1.0, 0.0, 0.0),
        ];
        let mut buf = InfluenceBuffer::with_len(3);
        for v in vs {
            buf.add(2, v);
        }

        assert_eq!(buf.combined(2), direction(&vs));
        assert_eq!(buf.count(2), 3);
        assert_eq!(buf.combined(0), (DVec3::ZERO, 0.0));
    }

    #[test]
    fn influenced_indices_returns_only_nodes_with_pulls() {
        let mut buf = InfluenceBuffer::with_len(4);
        buf.add(2, DVec3::Y);
        buf.add(0, DVec3::X);

        let ids: Vec<NodeId> = buf.influenced_indices().collect();
        assert_eq!(ids, vec![0, 2]);

        buf.clear();
        assert_eq!(buf.influenced_indices().count(), 0);
    }
}
