//! Dijkstra-backed [`ShortestPathOracle`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::network::{NodeId, RoadNetwork};

use super::ShortestPathOracle;

/// Heap entry ordered so that `BinaryHeap` pops the smallest cost first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Settled distances and predecessors of one search.
struct SearchTree {
    dist: Vec<f64>,
    prev: Vec<Option<usize>>,
}

impl SearchTree {
    fn distance(&self, target: usize) -> Option<f64> {
        self.dist
            .get(target)
            .copied()
            .filter(|cost| cost.is_finite())
    }

    fn path(&self, source: usize, target: usize) -> Option<Vec<usize>> {
        self.distance(target)?;
        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = (*self.prev.get(current)?)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Single-source Dijkstra over edge lengths.
///
/// The oracle borrows the network, so every query sees the same immutable
/// snapshot. Each call runs its own search; no state is kept between calls.
#[derive(Debug, Clone, Copy)]
pub struct DijkstraOracle<'a> {
    network: &'a RoadNetwork,
}

impl<'a> DijkstraOracle<'a> {
    /// Create an oracle over `network`.
    #[must_use]
    pub const fn new(network: &'a RoadNetwork) -> Self {
        Self { network }
    }

    /// The network this oracle searches.
    #[must_use]
    pub const fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    /// Run Dijkstra from `source` until every node in `targets` is settled.
    #[expect(
        clippy::float_arithmetic,
        reason = "path costs are sums of floating-point edge lengths"
    )]
    fn search(&self, source: usize, targets: &[usize]) -> SearchTree {
        let n = self.network.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![None; n];
        let mut settled = vec![false; n];
        let mut remaining: Vec<usize> = targets.to_vec();
        let mut heap = BinaryHeap::new();

        if let Some(slot) = dist.get_mut(source) {
            *slot = 0.0;
            heap.push(Frontier {
                cost: 0.0,
                node: source,
            });
        }

        while let Some(Frontier { cost, node }) = heap.pop() {
            match settled.get_mut(node) {
                Some(flag) if !*flag => *flag = true,
                _ => continue,
            }
            remaining.retain(|&target| target != node);
            if remaining.is_empty() && !targets.is_empty() {
                break;
            }
            for (next, length) in self.network.outgoing_lengths(node) {
                let candidate = cost + length;
                if let Some(best) = dist.get_mut(next)
                    && candidate < *best
                {
                    *best = candidate;
                    if let Some(slot) = prev.get_mut(next) {
                        *slot = Some(node);
                    }
                    heap.push(Frontier {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        SearchTree { dist, prev }
    }

    fn indices(&self, from: NodeId, to: NodeId) -> Option<(usize, usize)> {
        Some((self.network.index_of(from)?, self.network.index_of(to)?))
    }
}

impl ShortestPathOracle for DijkstraOracle<'_> {
    fn distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let (source, target) = self.indices(from, to)?;
        self.search(source, &[target]).distance(target)
    }

    fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let (source, target) = self.indices(from, to)?;
        let tree = self.search(source, &[target]);
        tree.path(source, target)?
            .into_iter()
            .map(|idx| self.network.node_at(idx).map(|node| node.id))
            .collect()
    }

    fn distances_from(&self, from: NodeId, targets: &[NodeId]) -> Vec<Option<f64>> {
        let Some(source) = self.network.index_of(from) else {
            return vec![None; targets.len()];
        };
        let resolved: Vec<Option<usize>> = targets
            .iter()
            .map(|&id| self.network.index_of(id))
            .collect();
        let known: Vec<usize> = resolved.iter().flatten().copied().collect();
        let tree = self.search(source, &known);
        resolved
            .into_iter()
            .map(|target| target.and_then(|idx| tree.distance(idx)))
            .collect()
    }
}
