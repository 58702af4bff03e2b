mod closest_edge;

pub use closest_edge::{ClosestEdge, ClosestEdgeResult};
