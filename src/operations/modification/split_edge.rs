use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::geometry::Segment;
use crate::math::distance_2d::distance;
use crate::math::{CoordKey, Point2};
use crate::topology::{edge_not_found, validate_weight, PlanarGraph, VertexId};

/// Splits an existing edge in two at a given point.
///
/// The edge between the segment's endpoints is replaced by
/// `start`–`point` and `point`–`end`, both weighted by Euclidean length and
/// added through [`PlanarGraph::add_edge`]. Like any `add_edge` call this
/// overwrites the endpoints' terminal flags, with `false` unless
/// [`SplitEdge::keep_endpoint_terminals`] is set. When `point` coincides
/// with an endpoint nothing is split and only that endpoint's terminal flag
/// is set.
pub struct SplitEdge {
    segment: Segment,
    point: Point2,
    terminal: bool,
    keep_endpoint_terminals: bool,
}

impl SplitEdge {
    /// Creates a new `SplitEdge` operation for the edge under `segment`.
    #[must_use]
    pub fn new(segment: Segment, point: Point2) -> Self {
        Self {
            segment,
            point,
            terminal: false,
            keep_endpoint_terminals: false,
        }
    }

    /// Sets the terminal flag given to the split point.
    #[must_use]
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Re-applies the endpoints' current terminal flags to the new edges
    /// instead of resetting them.
    #[must_use]
    pub fn keep_endpoint_terminals(mut self, keep: bool) -> Self {
        self.keep_endpoint_terminals = keep;
        self
    }

    /// Executes the split, returning the vertex at the split point.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EdgeNotFound` if the endpoints are not
    /// connected, and `TopologyError::VertexNotFound` if `point` is an
    /// endpoint that is not in the graph.
    pub fn execute(&self, graph: &mut PlanarGraph) -> Result<VertexId> {
        let p0 = *self.segment.start();
        let p1 = *self.segment.end();
        let key = CoordKey::new(&self.point);

        if key == CoordKey::new(&p0) {
            return graph.set_terminal(&p0, self.terminal);
        }
        if key == CoordKey::new(&p1) {
            return graph.set_terminal(&p1, self.terminal);
        }

        let edge = graph
            .find_edge(&p0, &p1)
            .ok_or_else(|| edge_not_found(&p0, &p1))?;
        let w0 = validate_weight(distance(&p0, &self.point))?;
        let w1 = validate_weight(distance(&self.point, &p1))?;

        let (t0, t1) = if self.keep_endpoint_terminals {
            let removed = graph.edge(edge)?;
            let (a, b) = (removed.start, removed.end);
            let (ta, tb) = (graph.vertex(a)?.terminal, graph.vertex(b)?.terminal);
            if graph.vertex(a)?.point == p0 {
                (ta, tb)
            } else {
                (tb, ta)
            }
        } else {
            (false, false)
        };

        graph.remove_edge(edge)?;
        graph.add_edge(p0, self.point, t0, self.terminal, Some(w0))?;
        graph.add_edge(self.point, p1, self.terminal, t1, Some(w1))?;

        trace!(
            x = self.point.x,
            y = self.point.y,
            terminal = self.terminal,
            "split edge"
        );
        graph.find_vertex(&self.point).ok_or_else(|| {
            TopologyError::VertexNotFound {
                x: self.point.x,
                y: self.point.y,
            }
            .into()
        })
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

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(p(a.0, a.1), p(b.0, b.1)).unwrap()
    }

    #[test]
    fn split_replaces_edge_with_two() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(2.0, 0.0))]).unwrap();
        let mid = SplitEdge::new(seg((0.0, 0.0), (2.0, 0.0)), p(1.0, 0.0))
            .execute(&mut g)
            .unwrap();

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.vertex_count(), 3);
        assert!(g.find_edge(&p(0.0, 0.0), &p(2.0, 0.0)).is_none());
        let left = g.find_edge(&p(0.0, 0.0), &p(1.0, 0.0)).unwrap();
        let right = g.find_edge(&p(1.0, 0.0), &p(2.0, 0.0)).unwrap();
        assert_abs_diff_eq!(g.edge(left).unwrap().weight, 1.0);
        assert_abs_diff_eq!(g.edge(right).unwrap().weight, 1.0);
        assert_eq!(g.vertex(mid).unwrap().point, p(1.0, 0.0));
        assert!(!g.vertex(mid).unwrap().terminal);
    }

    #[test]
    fn split_with_reversed_segment() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(2.0, 0.0))]).unwrap();
        SplitEdge::new(seg((2.0, 0.0), (0.0, 0.0)), p(0.5, 0.0))
            .execute(&mut g)
            .unwrap();
        let short = g.find_edge(&p(0.0, 0.0), &p(0.5, 0.0)).unwrap();
        assert_abs_diff_eq!(g.edge(short).unwrap().weight, 0.5);
        assert!(g.find_edge(&p(0.5, 0.0), &p(2.0, 0.0)).is_some());
    }

    #[test]
    fn split_point_gets_terminal_flag() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(2.0, 0.0))]).unwrap();
        let mid = SplitEdge::new(seg((0.0, 0.0), (2.0, 0.0)), p(1.0, 0.0))
            .terminal(true)
            .execute(&mut g)
            .unwrap();
        assert_eq!(g.terminals(), vec![mid]);
    }

    #[test]
    fn split_resets_endpoint_terminals() {
        let mut g = PlanarGraph::new();
        g.add_edge(p(0.0, 0.0), p(2.0, 0.0), true, true, None).unwrap();
        let mid = SplitEdge::new(seg((0.0, 0.0), (2.0, 0.0)), p(1.0, 0.0))
            .terminal(true)
            .execute(&mut g)
            .unwrap();
        assert_eq!(g.terminals(), vec![mid]);
    }

    #[test]
    fn split_can_keep_endpoint_terminals() {
        let mut g = PlanarGraph::new();
        g.add_edge(p(0.0, 0.0), p(2.0, 0.0), true, false, None).unwrap();
        SplitEdge::new(seg((2.0, 0.0), (0.0, 0.0)), p(1.0, 0.0))
            .keep_endpoint_terminals(true)
            .execute(&mut g)
            .unwrap();
        let start = g.find_vertex(&p(0.0, 0.0)).unwrap();
        let end = g.find_vertex(&p(2.0, 0.0)).unwrap();
        assert!(g.vertex(start).unwrap().terminal);
        assert!(!g.vertex(end).unwrap().terminal);
        assert_eq!(g.terminals().len(), 1);
    }

    #[test]
    fn split_at_endpoint_only_updates_flag() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(2.0, 0.0))]).unwrap();
        let v = SplitEdge::new(seg((0.0, 0.0), (2.0, 0.0)), p(2.0, 0.0))
            .terminal(true)
            .execute(&mut g)
            .unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.vertex_count(), 2);
        assert!(g.vertex(v).unwrap().terminal);
    }

    #[test]
    fn split_missing_edge_fails() {
        let mut g = PlanarGraph::from_edges([(p(0.0, 0.0), p(2.0, 0.0))]).unwrap();
        let err = SplitEdge::new(seg((0.0, 0.0), (0.0, 2.0)), p(0.0, 1.0))
            .execute(&mut g)
            .unwrap_err();
        assert!(matches!(
            err,
            ReblockError::Topology(TopologyError::EdgeNotFound { .. })
        ));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn split_onto_existing_vertex_reuses_it() {
        // (1, 0) already hangs off the graph; splitting there joins it in.
        let mut g = PlanarGraph::from_edges([
            (p(0.0, 0.0), p(2.0, 0.0)),
            (p(1.0, 0.0), p(1.0, 1.0)),
        ])
        .unwrap();
        SplitEdge::new(seg((0.0, 0.0), (2.0, 0.0)), p(1.0, 0.0))
            .execute(&mut g)
            .unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 3);
    }
}
