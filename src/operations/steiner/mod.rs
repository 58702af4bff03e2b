mod approximate;
mod closure;

pub use approximate::{ClosureStrategy, SteinerTree, SteinerTreeResult};
pub use closure::{ClosureEdge, MetricClosure};
