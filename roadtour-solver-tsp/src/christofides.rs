//! Christofides-style approximation on the undirected simplification.
//!
//! The reduced graph is made undirected by taking the cheaper direction of
//! each pair. A minimum spanning tree is built with Prim's algorithm, the
//! odd-degree vertices are paired by a greedy cheapest-first matching, and an
//! Euler circuit of the combined multigraph is shortcut into a Hamiltonian
//! cycle which is finally rotated so the start comes first.
//!
//! Odd vertices are matched greedily rather than by an exact minimum-weight
//! perfect matching, so the 3/2 bound does not hold. Any complete graph is
//! accepted, metric or not.

use rand::RngCore;
use roadtour_core::{ReducedGraph, SolverError, TourSolver, check_start};

/// Undirected multigraph stored as adjacency lists of `(neighbour, edge)`.
struct Multigraph {
    adjacency: Vec<Vec<(usize, usize)>>,
    edges: usize,
}

impl Multigraph {
    fn new(len: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); len],
            edges: 0,
        }
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        let id = self.edges;
        self.edges += 1;
        if let Some(list) = self.adjacency.get_mut(a) {
            list.push((b, id));
        }
        if let Some(list) = self.adjacency.get_mut(b) {
            list.push((a, id));
        }
    }

    fn degree(&self, vertex: usize) -> usize {
        self.adjacency.get(vertex).map_or(0, Vec::len)
    }

    /// Hierholzer's algorithm from `start`.
    fn euler_circuit(&self, start: usize) -> Vec<usize> {
        let mut used = vec![false; self.edges];
        let mut cursor = vec![0_usize; self.adjacency.len()];
        let mut stack = vec![start];
        let mut circuit = Vec::with_capacity(self.edges + 1);
        while let Some(&vertex) = stack.last() {
            let next = loop {
                let Some(pos) = cursor.get_mut(vertex) else {
                    break None;
                };
                let Some(&(neighbour, edge)) =
                    self.adjacency.get(vertex).and_then(|list| list.get(*pos))
                else {
                    break None;
                };
                *pos += 1;
                if let Some(flag) = used.get_mut(edge)
                    && !*flag
                {
                    *flag = true;
                    break Some(neighbour);
                }
            };
            match next {
                Some(neighbour) => stack.push(neighbour),
                None => {
                    stack.pop();
                    circuit.push(vertex);
                }
            }
        }
        circuit.reverse();
        circuit
    }
}

/// Minimum spanning tree edges by Prim's algorithm, rooted at `root`.
fn spanning_tree(graph: &ReducedGraph, root: usize) -> Vec<(usize, usize)> {
    let len = graph.len();
    let mut in_tree = vec![false; len];
    let mut best: Vec<(f64, Option<usize>)> = vec![(f64::INFINITY, None); len];
    let mut edges = Vec::with_capacity(len.saturating_sub(1));
    if let Some(slot) = best.get_mut(root) {
        *slot = (0.0, None);
    }
    for _ in 0..len {
        let next = (0..len)
            .filter(|&v| in_tree.get(v) == Some(&false))
            .min_by(|&a, &b| {
                let wa = best.get(a).map_or(f64::INFINITY, |entry| entry.0);
                let wb = best.get(b).map_or(f64::INFINITY, |entry| entry.0);
                wa.total_cmp(&wb)
            });
        let Some(vertex) = next else { break };
        if let Some(flag) = in_tree.get_mut(vertex) {
            *flag = true;
        }
        if let Some(&(_, Some(parent))) = best.get(vertex) {
            edges.push((parent, vertex));
        }
        for other in 0..len {
            if in_tree.get(other) != Some(&false) {
                continue;
            }
            let weight = graph.undirected_weight(vertex, other);
            if let Some(entry) = best.get_mut(other)
                && weight < entry.0
            {
                *entry = (weight, Some(vertex));
            }
        }
    }
    edges
}

/// Pair odd vertices cheapest-first.
fn greedy_matching(graph: &ReducedGraph, odd: &[usize]) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(f64, usize, usize)> = Vec::new();
    for (pos, &a) in odd.iter().enumerate() {
        for &b in odd.iter().skip(pos + 1) {
            pairs.push((graph.undirected_weight(a, b), a, b));
        }
    }
    pairs.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut matched = vec![false; graph.len()];
    let mut matching = Vec::new();
    for (_, a, b) in pairs {
        if matched.get(a) == Some(&false) && matched.get(b) == Some(&false) {
            if let Some(flag) = matched.get_mut(a) {
                *flag = true;
            }
            if let Some(flag) = matched.get_mut(b) {
                *flag = true;
            }
            matching.push((a, b));
        }
    }
    matching
}

/// Approximate metric TSP tour beginning at `start`.
#[must_use]
pub fn christofides_tour(graph: &ReducedGraph, start: usize) -> Vec<usize> {
    let len = graph.len();
    if len <= 2 {
        let mut tour = vec![start];
        tour.extend((0..len).filter(|&idx| idx != start));
        return tour;
    }
    let mut multigraph = Multigraph::new(len);
    for (a, b) in spanning_tree(graph, start) {
        multigraph.add_edge(a, b);
    }
    let odd: Vec<usize> = (0..len)
        .filter(|&v| !multigraph.degree(v).is_multiple_of(2))
        .collect();
    for (a, b) in greedy_matching(graph, &odd) {
        multigraph.add_edge(a, b);
    }

    let mut seen = vec![false; len];
    let mut tour = Vec::with_capacity(len);
    for vertex in multigraph.euler_circuit(start) {
        if let Some(flag) = seen.get_mut(vertex)
            && !*flag
        {
            *flag = true;
            tour.push(vertex);
        }
    }
    if let Some(pos) = tour.iter().position(|&v| v == start) {
        tour.rotate_left(pos);
    }
    tour
}

/// Christofides-style approximation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChristofidesSolver;

impl TourSolver for ChristofidesSolver {
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError> {
        check_start(graph, start)?;
        Ok(christofides_tour(graph, start))
    }
}
