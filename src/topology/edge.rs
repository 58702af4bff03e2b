use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a planar graph.
    pub struct EdgeId;
}

/// Data associated with a planar graph edge.
///
/// An edge connects two distinct vertices. Its weight is the Euclidean
/// length of the segment unless a weight was supplied when it was created.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// First endpoint.
    pub start: VertexId,
    /// Second endpoint.
    pub end: VertexId,
    /// Cost of traversing the edge.
    pub weight: f64,
    /// Set when the edge belongs to an approximated Steiner tree.
    pub steiner: bool,
}

impl EdgeData {
    /// Creates an unselected edge between `start` and `end`.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, weight: f64) -> Self {
        Self {
            start,
            end,
            weight,
            steiner: false,
        }
    }

    /// Returns `true` if both endpoints are the same vertex.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.start == self.end
    }

    /// Returns the endpoint opposite to `vertex`, or `None` if the edge is
    /// not incident to it.
    #[must_use]
    pub fn opposite(&self, vertex: VertexId) -> Option<VertexId> {
        if vertex == self.start {
            Some(self.end)
        } else if vertex == self.end {
            Some(self.start)
        } else {
            None
        }
    }
}
