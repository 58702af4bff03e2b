use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, warn};

use super::closure::MetricClosure;
use crate::error::{Result, TopologyError};
use crate::network::{GraphAlgorithms, PetgraphNetwork};
use crate::topology::{EdgeId, PlanarGraph, VertexId};

/// How the metric closure over the terminals is computed.
///
/// Both strategies produce the same closure distances and fail on the same
/// inputs: a terminal that cannot reach the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosureStrategy {
    /// Picks `AllPairs` when there are more terminal pairs than vertices,
    /// `TerminalPairs` otherwise.
    #[default]
    Auto,
    /// One shortest-path search per pair of terminals. Only the terminals
    /// need to be mutually reachable.
    TerminalPairs,
    /// One sweep from every vertex the terminals can reach, then the closure
    /// is restricted to the terminals.
    AllPairs,
}

impl ClosureStrategy {
    /// Resolves `Auto` for a graph with the given sizes.
    #[must_use]
    pub fn resolve(self, terminals: usize, vertices: usize) -> Self {
        match self {
            Self::Auto => {
                let pairs = terminals * terminals.saturating_sub(1) / 2;
                if pairs > vertices {
                    Self::AllPairs
                } else {
                    Self::TerminalPairs
                }
            }
            other => other,
        }
    }
}

/// Result of a Steiner tree approximation.
#[derive(Debug, Clone)]
pub struct SteinerTreeResult {
    /// The terminal vertices the tree connects.
    pub terminals: Vec<VertexId>,
    /// Edges of the tree, sorted by id.
    pub edges: Vec<EdgeId>,
    /// Sum of the tree's edge weights.
    pub total_weight: f64,
    /// The strategy actually used; `Auto` only when there was nothing to do.
    pub strategy: ClosureStrategy,
}

/// Approximates a minimum Steiner tree over the terminal vertices of a
/// planar graph.
///
/// The metric closure over the terminals is built, its minimum spanning tree
/// is expanded back into the underlying shortest paths, and the union of
/// those paths is reduced to a tree whose leaves are all terminals. The
/// result weighs at most `2 - 2/t` times the optimum for `t` terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteinerTree {
    strategy: ClosureStrategy,
}

impl SteinerTree {
    /// Creates a new `SteinerTree` operation with automatic strategy choice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `SteinerTree` operation using `strategy`.
    #[must_use]
    pub fn with_strategy(strategy: ClosureStrategy) -> Self {
        Self { strategy }
    }

    /// Executes the approximation on a `petgraph` snapshot of `graph`.
    ///
    /// The graph is not modified; see
    /// [`PlanarGraph::steiner_tree_approximate`] for the flagging variant.
    ///
    /// # Errors
    ///
    /// See [`SteinerTree::execute_with`].
    pub fn execute(&self, graph: &PlanarGraph) -> Result<SteinerTreeResult> {
        let network = PetgraphNetwork::from_graph(graph);
        self.execute_with(graph, &network)
    }

    /// Executes the approximation using `network` for the graph algorithms.
    ///
    /// `network` must describe the same vertices and edges as `graph`.
    /// Fewer than two terminals yield an empty tree.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::DisconnectedGraph` when a terminal cannot be
    /// reached, before any tree is produced. Components without terminals
    /// are ignored by both strategies.
    pub fn execute_with<N: GraphAlgorithms>(
        &self,
        graph: &PlanarGraph,
        network: &N,
    ) -> Result<SteinerTreeResult> {
        let terminals = graph.terminals();
        if terminals.len() < 2 {
            warn!(
                terminals = terminals.len(),
                "fewer than two terminals, Steiner tree is empty"
            );
            return Ok(SteinerTreeResult {
                terminals,
                edges: Vec::new(),
                total_weight: 0.0,
                strategy: self.strategy,
            });
        }

        let strategy = self.strategy.resolve(terminals.len(), graph.vertex_count());
        debug!(
            terminals = terminals.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            ?strategy,
            "approximating Steiner tree"
        );

        let closure = match strategy {
            ClosureStrategy::TerminalPairs => {
                MetricClosure::terminal_pairs(graph, network, &terminals)?
            }
            ClosureStrategy::AllPairs | ClosureStrategy::Auto => {
                MetricClosure::all_pairs(graph, network, &terminals)?.induced(&terminals)
            }
        };

        let union: BTreeSet<EdgeId> = closure
            .minimum_spanning_tree()
            .into_iter()
            .flat_map(|e| e.path.iter().copied())
            .collect();
        let union: Vec<EdgeId> = union.into_iter().collect();

        let edges = reduce_to_tree(graph, network, &union, &terminals)?;
        let mut total_weight = 0.0;
        for &id in &edges {
            total_weight += graph.edge(id)?.weight;
        }

        debug!(
            selected = edges.len(),
            path_edges = union.len(),
            total_weight,
            "Steiner tree approximated"
        );
        Ok(SteinerTreeResult {
            terminals,
            edges,
            total_weight,
            strategy,
        })
    }
}

/// Keeps a spanning tree of the path union, then strips non-terminal leaves.
///
/// Neither step can increase the weight.
fn reduce_to_tree<N: GraphAlgorithms>(
    graph: &PlanarGraph,
    network: &N,
    union: &[EdgeId],
    terminals: &[VertexId],
) -> Result<Vec<EdgeId>> {
    let mut tree: BTreeSet<EdgeId> = network
        .edge_subgraph(union)
        .minimum_spanning_forest()
        .into_iter()
        .collect();

    let terminals: HashSet<VertexId> = terminals.iter().copied().collect();
    let mut incident: BTreeMap<VertexId, Vec<EdgeId>> = BTreeMap::new();
    for &id in &tree {
        let edge = graph.edge(id)?;
        incident.entry(edge.start).or_default().push(id);
        incident.entry(edge.end).or_default().push(id);
    }

    let mut degree: BTreeMap<VertexId, usize> =
        incident.iter().map(|(&v, es)| (v, es.len())).collect();
    let mut leaves: Vec<VertexId> = degree
        .iter()
        .filter(|&(v, &d)| d == 1 && !terminals.contains(v))
        .map(|(&v, _)| v)
        .collect();

    while let Some(leaf) = leaves.pop() {
        let Some(&id) = incident
            .get(&leaf)
            .and_then(|es| es.iter().find(|e| tree.contains(*e)))
        else {
            continue;
        };
        tree.remove(&id);

        let other = graph
            .edge(id)?
            .opposite(leaf)
            .ok_or_else(|| TopologyError::EntityNotFound("edge endpoint".into()))?;
        for v in [leaf, other] {
            if let Some(d) = degree.get_mut(&v) {
                *d = d.saturating_sub(1);
            }
        }
        if degree.get(&other) == Some(&1) && !terminals.contains(&other) {
            leaves.push(other);
        }
    }

    Ok(tree.into_iter().collect())
}
