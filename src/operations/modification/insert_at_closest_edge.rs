use tracing::trace;

use super::SplitEdge;
use crate::error::Result;
use crate::math::Point2;
use crate::operations::query::ClosestEdge;
use crate::topology::{PlanarGraph, VertexId};

/// Attaches a point to a planar graph where it is closest to the network.
///
/// The nearest point on any edge is found with [`ClosestEdge`] and that edge
/// is split there with [`SplitEdge`]. The attachment point, not the input
/// point itself, becomes the new vertex.
pub struct InsertAtClosestEdge {
    point: Point2,
    terminal: bool,
    keep_endpoint_terminals: bool,
}

impl InsertAtClosestEdge {
    /// Creates a new `InsertAtClosestEdge` operation.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            terminal: false,
            keep_endpoint_terminals: false,
        }
    }

    /// Sets the terminal flag given to the attachment point.
    #[must_use]
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// See [`SplitEdge::keep_endpoint_terminals`].
    #[must_use]
    pub fn keep_endpoint_terminals(mut self, keep: bool) -> Self {
        self.keep_endpoint_terminals = keep;
        self
    }

    /// Executes the insertion, returning the vertex at the attachment point.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoEligibleEdge` on a graph without edges and
    /// propagates projection and split failures.
    pub fn execute(&self, graph: &mut PlanarGraph) -> Result<VertexId> {
        let hit = ClosestEdge::new(self.point).execute(graph)?;
        trace!(distance = hit.distance, "attaching point to closest edge");

        SplitEdge::new(hit.segment, hit.point)
            .terminal(self.terminal)
            .keep_endpoint_terminals(self.keep_endpoint_terminals)
            .execute(graph)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{OperationError, ReblockError};
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn inserts_projection_and_splits() {
        let mut g = PlanarGraph::from_edges([
            (p(0.0, 0.0), p(4.0, 0.0)),
            (p(4.0, 0.0), p(4.0, 4.0)),
        ])
        .unwrap();
        let v = InsertAtClosestEdge::new(p(1.0, 0.5))
            .terminal(true)
            .execute(&mut g)
            .unwrap();

        let vertex = g.vertex(v).unwrap();
        assert!(vertex.terminal);
        assert_abs_diff_eq!(vertex.point.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vertex.point.y, 0.0, epsilon = 1e-9);
        assert_eq!(g.edge_count(), 3);
        assert!(g.find_edge(&p(0.0, 0.0), &p(4.0, 0.0)).is_none());
    }

    #[test]
    fn beyond_the_end_flags_the_endpoint() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(1.0, 0.0))]).unwrap();
        let v = InsertAtClosestEdge::new(p(2.0, 1.0))
            .terminal(true)
            .execute(&mut g)
            .unwrap();
        assert_eq!(g.vertex(v).unwrap().point, p(1.0, 0.0));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.terminals(), vec![v]);
    }

    #[test]
    fn later_insertion_resets_neighbouring_terminal() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(4.0, 0.0))]).unwrap();
        let a = g.add_vertex_at_closest_edge(p(1.0, 1.0), true).unwrap();
        // (1, 0)-(4, 0) is split next, rewriting (1, 0) as a plain vertex.
        let b = g.add_vertex_at_closest_edge(p(3.0, -1.0), true).unwrap();
        assert_ne!(a, b);
        assert_eq!(g.terminals(), vec![b]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn repeated_insertions_can_keep_earlier_terminals() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(4.0, 0.0))]).unwrap();
        for point in [p(1.0, 1.0), p(3.0, -1.0)] {
            InsertAtClosestEdge::new(point)
                .terminal(true)
                .keep_endpoint_terminals(true)
                .execute(&mut g)
                .unwrap();
        }
        assert_eq!(g.terminals().len(), 2);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn no_edges_is_an_error() {
        let mut g = PlanarGraph::new();
        let err = InsertAtClosestEdge::new(p(0.0, 0.0))
            .execute(&mut g)
            .unwrap_err();
        assert!(matches!(
            err,
            ReblockError::Operation(OperationError::NoEligibleEdge)
        ));
    }
}
