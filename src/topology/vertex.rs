use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a planar graph.
    pub struct VertexId;
}

/// Data associated with a planar graph vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The position of the vertex, which is also its identity in the graph.
    pub point: Point2,
    /// Whether the Steiner tree must reach this vertex.
    pub terminal: bool,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point2, terminal: bool) -> Self {
        Self { point, terminal }
    }
}
