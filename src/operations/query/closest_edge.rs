use crate::error::{OperationError, Result};
use crate::geometry::Segment;
use crate::math::distance_2d::distance;
use crate::math::Point2;
use crate::topology::{EdgeId, PlanarGraph};

/// Result of a closest edge query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestEdgeResult {
    /// The edge nearest to the query point.
    pub edge: EdgeId,
    /// The edge as a segment, endpoints in storage order.
    pub segment: Segment,
    /// The point of the edge closest to the query point.
    pub point: Point2,
    /// The distance from the query point to `point`.
    pub distance: f64,
}

/// Finds the edge of a planar graph closest to a given point.
pub struct ClosestEdge {
    point: Point2,
}

impl ClosestEdge {
    /// Creates a new `ClosestEdge` query.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    /// Executes the query.
    ///
    /// Loop edges are skipped. When several edges are equally close, the
    /// first one in storage order wins.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoEligibleEdge` if the graph has no usable
    /// edge, and propagates projection failures.
    pub fn execute(&self, graph: &PlanarGraph) -> Result<ClosestEdgeResult> {
        let mut best: Option<ClosestEdgeResult> = None;

        for (id, edge) in graph.edges() {
            if edge.is_loop() {
                continue;
            }
            let segment = graph.edge_segment(id)?;
            let point = segment.closest_point(&self.point)?;
            let d = distance(&point, &self.point);

            match best {
                Some(ref b) if b.distance <= d => {}
                _ => {
                    best = Some(ClosestEdgeResult {
                        edge: id,
                        segment,
                        point,
                        distance: d,
                    });
                }
            }
        }

        best.ok_or_else(|| OperationError::NoEligibleEdge.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ReblockError;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn picks_nearest_edge() {
        let g = PlanarGraph::from_edges([
            (p(0.0, 0.0), p(4.0, 0.0)),
            (p(0.0, 3.0), p(4.0, 3.0)),
        ])
        .unwrap();
        let hit = ClosestEdge::new(p(1.0, 2.0)).execute(&g).unwrap();
        assert_eq!(hit.edge, g.find_edge(&p(0.0, 3.0), &p(4.0, 3.0)).unwrap());
        assert_abs_diff_eq!(hit.point.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.point.y, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn endpoint_is_closest_beyond_the_span() {
        let g = PlanarGraph::from_edges([(p(0.0, 0.0), p(1.0, 0.0))]).unwrap();
        let hit = ClosestEdge::new(p(2.0, 1.0)).execute(&g).unwrap();
        assert_eq!(hit.point, p(1.0, 0.0));
        assert_abs_diff_eq!(hit.distance, 2.0_f64.sqrt());
    }

    #[test]
    fn ties_go_to_first_edge() {
        let g = PlanarGraph::from_edges([
            (p(0.0, 0.0), p(2.0, 0.0)),
            (p(0.0, 2.0), p(2.0, 2.0)),
        ])
        .unwrap();
        let first = g.edges().next().unwrap().0;
        let hit = ClosestEdge::new(p(1.0, 1.0)).execute(&g).unwrap();
        assert_eq!(hit.edge, first);
    }

    #[test]
    fn empty_graph_has_no_eligible_edge() {
        let mut g = PlanarGraph::new();
        g.add_vertex(p(0.0, 0.0), false).unwrap();
        let err = ClosestEdge::new(p(1.0, 1.0)).execute(&g).unwrap_err();
        assert!(matches!(
            err,
            ReblockError::Operation(OperationError::NoEligibleEdge)
        ));
    }
}
