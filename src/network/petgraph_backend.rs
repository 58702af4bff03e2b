use std::collections::HashMap;

use petgraph::algo::{astar, dijkstra};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::trace;

use super::{kruskal, GraphAlgorithms, WeightedPath};
use crate::topology::{EdgeId, PlanarGraph, VertexId};

#[derive(Debug, Clone, Copy)]
struct Link {
    edge: EdgeId,
    weight: f64,
}

/// [`GraphAlgorithms`] backed by a `petgraph` undirected graph.
///
/// Built as a snapshot of a [`PlanarGraph`]; later changes to the planar
/// graph are not reflected.
#[derive(Debug, Clone, Default)]
pub struct PetgraphNetwork {
    graph: UnGraph<VertexId, Link>,
    nodes: HashMap<VertexId, NodeIndex>,
    links: HashMap<EdgeId, EdgeIndex>,
}

impl PetgraphNetwork {
    /// Snapshots the vertices and edges of `graph`. Loop edges are skipped.
    #[must_use]
    pub fn from_graph(graph: &PlanarGraph) -> Self {
        let mut network = Self::default();
        for (id, _) in graph.vertices() {
            network.node(id);
        }
        for (id, edge) in graph.edges() {
            network.link(id, edge.start, edge.end, edge.weight);
        }
        network
    }

    fn node(&mut self, vertex: VertexId) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .nodes
            .entry(vertex)
            .or_insert_with(|| graph.add_node(vertex))
    }

    fn link(&mut self, edge: EdgeId, a: VertexId, b: VertexId, weight: f64) {
        if a == b || self.links.contains_key(&edge) {
            return;
        }
        let na = self.node(a);
        let nb = self.node(b);
        let index = self.graph.add_edge(na, nb, Link { edge, weight });
        self.links.insert(edge, index);
    }

    /// Number of edges in the snapshot.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Turns a node sequence into a path by looking up the connecting edges.
    fn path_through(&self, nodes: &[NodeIndex], distance: f64) -> Option<WeightedPath> {
        let edges = nodes
            .windows(2)
            .map(|w| {
                self.graph
                    .find_edge(w[0], w[1])
                    .map(|e| self.graph[e].edge)
            })
            .collect::<Option<Vec<_>>>()?;

        Some(WeightedPath {
            vertices: nodes.iter().map(|&n| self.graph[n]).collect(),
            edges,
            distance,
        })
    }

    /// Picks, for every reached node, the incident edge that realises its
    /// cost. Predecessors are always strictly cheaper, so following them
    /// terminates at the source.
    fn predecessors(
        &self,
        source: NodeIndex,
        costs: &HashMap<NodeIndex, f64>,
    ) -> HashMap<NodeIndex, (NodeIndex, EdgeIndex)> {
        let mut pred = HashMap::with_capacity(costs.len());
        for (&node, &cost) in costs {
            if node == source {
                continue;
            }
            let mut best: Option<(f64, NodeIndex, EdgeIndex)> = None;
            for e in self.graph.edges(node) {
                let other = if e.source() == node {
                    e.target()
                } else {
                    e.source()
                };
                let Some(&other_cost) = costs.get(&other) else {
                    continue;
                };
                if other_cost >= cost {
                    continue;
                }
                let slack = (other_cost + e.weight().weight - cost).abs();
                match best {
                    Some((best_slack, _, _)) if best_slack <= slack => {}
                    _ => best = Some((slack, other, e.id())),
                }
            }
            if let Some((_, other, edge)) = best {
                pred.insert(node, (other, edge));
            }
        }
        pred
    }
}

impl GraphAlgorithms for PetgraphNetwork {
    fn vertices(&self) -> Vec<VertexId> {
        self.graph.node_indices().map(|n| self.graph[n]).collect()
    }

    fn shortest_path(&self, source: VertexId, target: VertexId) -> Option<WeightedPath> {
        let s = *self.nodes.get(&source)?;
        let t = *self.nodes.get(&target)?;
        if s == t {
            return Some(WeightedPath::trivial(source));
        }

        let (distance, nodes) = astar(
            &self.graph,
            s,
            |n| n == t,
            |e| e.weight().weight,
            |_| 0.0,
        )?;
        self.path_through(&nodes, distance)
    }

    fn shortest_paths_from(&self, source: VertexId) -> HashMap<VertexId, WeightedPath> {
        let Some(&s) = self.nodes.get(&source) else {
            return HashMap::new();
        };

        let costs = dijkstra(&self.graph, s, None, |e| e.weight().weight);
        let pred = self.predecessors(s, &costs);

        let mut paths = HashMap::with_capacity(costs.len());
        for (&node, &distance) in &costs {
            let mut vertices = vec![self.graph[node]];
            let mut edges = Vec::new();
            let mut current = node;
            let mut complete = true;
            while current != s {
                let Some(&(prev, edge)) = pred.get(&current) else {
                    complete = false;
                    break;
                };
                vertices.push(self.graph[prev]);
                edges.push(self.graph[edge].edge);
                current = prev;
            }
            let target = self.graph[node];
            if complete {
                vertices.reverse();
                edges.reverse();
                paths.insert(
                    target,
                    WeightedPath {
                        vertices,
                        edges,
                        distance,
                    },
                );
            } else if let Some(path) = self.shortest_path(source, target) {
                // Weights absorbed by rounding leave no strictly cheaper
                // predecessor; search the target directly instead.
                trace!(distance, "sweep walk-back fell back to a pair search");
                paths.insert(target, path);
            }
        }
        paths
    }

    fn minimum_spanning_forest(&self) -> Vec<EdgeId> {
        let indices: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        let candidates: Vec<(usize, usize, f64)> = indices
            .iter()
            .filter_map(|&e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some((a.index(), b.index(), self.graph[e].weight))
            })
            .collect();

        kruskal(self.graph.node_count(), &candidates)
            .into_iter()
            .map(|i| self.graph[indices[i]].edge)
            .collect()
    }

    fn edge_subgraph(&self, edges: &[EdgeId]) -> Self {
        let mut sub = Self::default();
        for id in edges {
            let Some(&index) = self.links.get(id) else {
                continue;
            };
            let Some((a, b)) = self.graph.edge_endpoints(index) else {
                continue;
            };
            let link = self.graph[index];
            sub.link(link.edge, self.graph[a], self.graph[b], link.weight);
        }
        sub
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Unit square with one diagonal, plus a detached segment.
    fn square() -> PlanarGraph {
        PlanarGraph::from_edges([
            (p(0.0, 0.0), p(1.0, 0.0)),
            (p(1.0, 0.0), p(1.0, 1.0)),
            (p(1.0, 1.0), p(0.0, 1.0)),
            (p(0.0, 1.0), p(0.0, 0.0)),
            (p(0.0, 0.0), p(1.0, 1.0)),
            (p(5.0, 5.0), p(6.0, 5.0)),
        ])
        .unwrap()
    }

    fn v(g: &PlanarGraph, x: f64, y: f64) -> VertexId {
        g.find_vertex(&p(x, y)).unwrap()
    }

    #[test]
    fn snapshot_mirrors_planar_graph() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        assert_eq!(net.vertices().len(), g.vertex_count());
        assert_eq!(net.edge_count(), g.edge_count());
    }

    #[test]
    fn shortest_path_takes_diagonal() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let path = net.shortest_path(v(&g, 0.0, 0.0), v(&g, 1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(path.distance, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(path.edges.len(), 1);
        assert_eq!(path.vertices.len(), 2);
        assert_eq!(
            path.edges[0],
            g.find_edge(&p(0.0, 0.0), &p(1.0, 1.0)).unwrap()
        );
    }

    #[test]
    fn shortest_path_to_self_is_trivial() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let a = v(&g, 0.0, 0.0);
        assert_eq!(net.shortest_path(a, a).unwrap(), WeightedPath::trivial(a));
    }

    #[test]
    fn shortest_path_unreachable_is_none() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        assert!(net.shortest_path(v(&g, 0.0, 0.0), v(&g, 5.0, 5.0)).is_none());
    }

    #[test]
    fn shortest_paths_from_reaches_component_only() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let source = v(&g, 1.0, 0.0);
        let paths = net.shortest_paths_from(source);
        assert_eq!(paths.len(), 4);
        assert!(!paths.contains_key(&v(&g, 5.0, 5.0)));

        let to_corner = &paths[&v(&g, 0.0, 1.0)];
        assert_abs_diff_eq!(to_corner.distance, 2.0, epsilon = 1e-12);
        assert_eq!(to_corner.edges.len(), 2);
        assert_eq!(to_corner.vertices.first(), Some(&source));
        assert_eq!(to_corner.vertices.last(), Some(&v(&g, 0.0, 1.0)));

        assert!(paths[&source].edges.is_empty());
    }

    #[test]
    fn sweep_paths_agree_with_pairwise_search() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let source = v(&g, 0.0, 1.0);
        for (target, path) in net.shortest_paths_from(source) {
            let direct = net.shortest_path(source, target).unwrap();
            assert_abs_diff_eq!(path.distance, direct.distance, epsilon = 1e-12);
            let summed: f64 = path
                .edges
                .iter()
                .map(|&e| g.edge(e).unwrap().weight)
                .sum();
            assert_abs_diff_eq!(summed, path.distance, epsilon = 1e-12);
        }
    }

    #[test]
    fn sweep_keeps_targets_behind_absorbed_weights() {
        let mut g = PlanarGraph::new();
        g.add_edge(p(0.0, 0.0), p(1.0, 0.0), false, false, Some(1e16))
            .unwrap();
        g.add_edge(p(1.0, 0.0), p(2.0, 0.0), false, false, Some(1.0))
            .unwrap();
        let net = PetgraphNetwork::from_graph(&g);
        let paths = net.shortest_paths_from(v(&g, 0.0, 0.0));
        assert_eq!(paths.len(), 3);

        let far = &paths[&v(&g, 2.0, 0.0)];
        assert_eq!(far.edges.len(), 2);
        assert_eq!(far.vertices.last(), Some(&v(&g, 2.0, 0.0)));
    }

    #[test]
    fn spanning_forest_skips_heavy_edges() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let forest = net.minimum_spanning_forest();
        // Four square corners need three edges, the detached pair one.
        assert_eq!(forest.len(), 4);
        let diagonal = g.find_edge(&p(0.0, 0.0), &p(1.0, 1.0)).unwrap();
        assert!(!forest.contains(&diagonal));
    }

    #[test]
    fn edge_subgraph_restricts_network() {
        let g = square();
        let net = PetgraphNetwork::from_graph(&g);
        let keep = g.find_edge(&p(0.0, 0.0), &p(1.0, 0.0)).unwrap();
        let sub = net.edge_subgraph(&[keep]);
        assert_eq!(sub.vertices().len(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub
            .shortest_path(v(&g, 0.0, 0.0), v(&g, 1.0, 1.0))
            .is_none());
    }
}
