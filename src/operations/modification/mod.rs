mod insert_at_closest_edge;
mod split_edge;

pub use insert_at_closest_edge::InsertAtClosestEdge;
pub use split_edge::SplitEdge;
