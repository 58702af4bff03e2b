//! Graph algorithm capability consumed by the Steiner approximation.
//!
//! The planar graph only stores geometry and flags; shortest paths, spanning
//! trees and subgraph extraction come from a [`GraphAlgorithms`]
//! implementation. [`PetgraphNetwork`] is the default one.

mod petgraph_backend;

pub use petgraph_backend::PetgraphNetwork;

use std::collections::HashMap;

use petgraph::unionfind::UnionFind;

use crate::topology::{EdgeId, VertexId};

/// A path through the network, listed as vertices and the edges between them.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath {
    /// Vertices from source to target, both included.
    pub vertices: Vec<VertexId>,
    /// Edges in traversal order; one fewer than `vertices`.
    pub edges: Vec<EdgeId>,
    /// Sum of the edge weights.
    pub distance: f64,
}

impl WeightedPath {
    /// The zero-length path that stays at `vertex`.
    #[must_use]
    pub fn trivial(vertex: VertexId) -> Self {
        Self {
            vertices: vec![vertex],
            edges: Vec::new(),
            distance: 0.0,
        }
    }
}

/// Shortest-path, spanning-tree and subgraph primitives over a weighted,
/// undirected graph keyed by planar graph ids.
pub trait GraphAlgorithms {
    /// All vertices of the network, in a stable order.
    fn vertices(&self) -> Vec<VertexId>;

    /// The cheapest path from `source` to `target`, or `None` when `target`
    /// is unreachable or either vertex is unknown.
    fn shortest_path(&self, source: VertexId, target: VertexId) -> Option<WeightedPath>;

    /// Cheapest paths from `source` to every vertex reachable from it,
    /// `source` itself included.
    fn shortest_paths_from(&self, source: VertexId) -> HashMap<VertexId, WeightedPath>;

    /// Edges of a minimum spanning forest of the network.
    fn minimum_spanning_forest(&self) -> Vec<EdgeId>;

    /// The network restricted to `edges` and the vertices they touch.
    #[must_use]
    fn edge_subgraph(&self, edges: &[EdgeId]) -> Self
    where
        Self: Sized;
}

/// Kruskal's algorithm over `node_count` nodes.
///
/// `candidates` are `(a, b, weight)` triples over node indices. Returns the
/// indices of the chosen candidates in acceptance order; equal weights keep
/// their input order.
#[must_use]
pub fn kruskal(node_count: usize, candidates: &[(usize, usize, f64)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&i, &j| candidates[i].2.total_cmp(&candidates[j].2));

    let mut uf = UnionFind::<usize>::new(node_count);
    let mut chosen = Vec::with_capacity(node_count.saturating_sub(1));
    for i in order {
        let (a, b, _) = candidates[i];
        if uf.union(a, b) {
            chosen.push(i);
            if chosen.len() + 1 == node_count {
                break;
            }
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kruskal_picks_cheapest_spanning_edges() {
        // Square with one heavy diagonal.
        let candidates = [
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 3, 1.0),
            (3, 0, 4.0),
            (0, 2, 5.0),
        ];
        assert_eq!(kruskal(4, &candidates), vec![0, 1, 2]);
    }

    #[test]
    fn kruskal_keeps_input_order_on_ties() {
        let candidates = [(0, 1, 2.0), (1, 2, 2.0), (0, 2, 2.0)];
        assert_eq!(kruskal(3, &candidates), vec![0, 1]);
    }

    #[test]
    fn kruskal_returns_forest_for_disconnected_input() {
        let candidates = [(0, 1, 1.0), (2, 3, 1.0)];
        assert_eq!(kruskal(4, &candidates), vec![0, 1]);
    }

    #[test]
    fn kruskal_handles_empty_input() {
        assert!(kruskal(0, &[]).is_empty());
        assert!(kruskal(1, &[]).is_empty());
    }
}
