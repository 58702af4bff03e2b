use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::{OperationError, ReblockError, Result};
use crate::math::xy;
use crate::network::{kruskal, GraphAlgorithms, WeightedPath};
use crate::topology::{EdgeId, PlanarGraph, VertexId};

/// An edge of a metric closure: two vertices joined by their shortest path.
#[derive(Debug, Clone)]
pub struct ClosureEdge {
    pub source: VertexId,
    pub target: VertexId,
    /// Length of the shortest path.
    pub distance: f64,
    /// The underlying graph edges, from `source` to `target`.
    pub path: Vec<EdgeId>,
}

impl ClosureEdge {
    fn new(source: VertexId, target: VertexId, path: WeightedPath) -> Self {
        Self {
            source,
            target,
            distance: path.distance,
            path: path.edges,
        }
    }
}

/// The complete graph over a vertex set in which every edge is weighted by
/// the shortest-path distance in an underlying graph.
#[derive(Debug, Clone, Default)]
pub struct MetricClosure {
    nodes: Vec<VertexId>,
    edges: Vec<ClosureEdge>,
}

impl MetricClosure {
    /// Builds the closure over `terminals` with one shortest-path search per
    /// unordered pair.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::DisconnectedGraph` for the first pair with no
    /// connecting path.
    pub fn terminal_pairs<N: GraphAlgorithms>(
        graph: &PlanarGraph,
        network: &N,
        terminals: &[VertexId],
    ) -> Result<Self> {
        let mut edges = Vec::with_capacity(terminals.len() * terminals.len().saturating_sub(1) / 2);
        for (i, &u) in terminals.iter().enumerate() {
            for &v in &terminals[i + 1..] {
                let path = network
                    .shortest_path(u, v)
                    .ok_or_else(|| disconnected(graph, u, v))?;
                trace!(distance = path.distance, hops = path.edges.len(), "closure edge");
                edges.push(ClosureEdge::new(u, v, path));
            }
        }
        Ok(Self {
            nodes: terminals.to_vec(),
            edges,
        })
    }

    /// Builds the closure over every vertex in the component of `network`
    /// holding `terminals`, from one shortest-path sweep per vertex.
    ///
    /// Vertices that no terminal can reach are left out, so this closure
    /// fails on exactly the inputs [`MetricClosure::terminal_pairs`] fails
    /// on.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::DisconnectedGraph` for the first terminal the
    /// sweep from the first terminal does not reach.
    pub fn all_pairs<N: GraphAlgorithms>(
        graph: &PlanarGraph,
        network: &N,
        terminals: &[VertexId],
    ) -> Result<Self> {
        let Some(&root) = terminals.first() else {
            return Ok(Self::default());
        };
        let reached = network.shortest_paths_from(root);
        if let Some(&missing) = terminals.iter().find(|v| !reached.contains_key(*v)) {
            return Err(disconnected(graph, root, missing));
        }

        let nodes: Vec<VertexId> = network
            .vertices()
            .into_iter()
            .filter(|v| reached.contains_key(v))
            .collect();
        let mut edges = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);

        for (i, &u) in nodes.iter().enumerate() {
            let mut paths = network.shortest_paths_from(u);
            for &v in &nodes[i + 1..] {
                let path = paths.remove(&v).ok_or_else(|| disconnected(graph, u, v))?;
                edges.push(ClosureEdge::new(u, v, path));
            }
        }
        trace!(nodes = nodes.len(), edges = edges.len(), "all-pairs closure");

        Ok(Self { nodes, edges })
    }

    /// The closure restricted to the vertices in `subset`.
    ///
    /// Vertices of `subset` that are not in the closure are ignored.
    #[must_use]
    pub fn induced(&self, subset: &[VertexId]) -> Self {
        let keep: HashSet<VertexId> = subset.iter().copied().collect();
        Self {
            nodes: self
                .nodes
                .iter()
                .copied()
                .filter(|v| keep.contains(v))
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| keep.contains(&e.source) && keep.contains(&e.target))
                .cloned()
                .collect(),
        }
    }

    /// Vertices of the closure.
    #[must_use]
    pub fn nodes(&self) -> &[VertexId] {
        &self.nodes
    }

    /// Edges of the closure, one per unordered vertex pair.
    #[must_use]
    pub fn edges(&self) -> &[ClosureEdge] {
        &self.edges
    }

    /// Edges of a minimum spanning tree of the closure, by distance.
    #[must_use]
    pub fn minimum_spanning_tree(&self) -> Vec<&ClosureEdge> {
        let index: HashMap<VertexId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let candidates: Vec<(usize, usize, f64)> = self
            .edges
            .iter()
            .filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.target)?, e.distance)))
            .collect();

        kruskal(self.nodes.len(), &candidates)
            .into_iter()
            .map(|i| &self.edges[i])
            .collect()
    }
}

fn disconnected(graph: &PlanarGraph, from: VertexId, to: VertexId) -> ReblockError {
    let coords = |v| graph.vertex(v).map(|d| xy(&d.point)).unwrap_or([f64::NAN; 2]);
    OperationError::DisconnectedGraph {
        from: coords(from),
        to: coords(to),
    }
    .into()
}
