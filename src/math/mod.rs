pub mod distance_2d;

/// 2D point type. Coordinates double as vertex identity in a planar graph.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Absolute tolerance used by every projection and orthogonality check.
pub const TOLERANCE: f64 = 1e-4;

/// Hashable key for a coordinate pair, compared bit-exactly.
///
/// `-0.0` is folded into `0.0` so that the key agrees with `==` on every
/// finite coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    x_bits: u64,
    y_bits: u64,
}

impl CoordKey {
    /// Builds the key for `point`.
    #[must_use]
    pub fn new(point: &Point2) -> Self {
        Self {
            x_bits: (point.x + 0.0).to_bits(),
            y_bits: (point.y + 0.0).to_bits(),
        }
    }
}

impl From<&Point2> for CoordKey {
    fn from(point: &Point2) -> Self {
        Self::new(point)
    }
}

/// Returns the coordinates of `point` as a plain array, for error payloads
/// and snapshots.
#[must_use]
pub fn xy(point: &Point2) -> [f64; 2] {
    [point.x, point.y]
}
