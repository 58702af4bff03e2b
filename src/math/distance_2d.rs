use super::Point2;
use crate::error::Result;
use crate::geometry::Segment;

/// Returns the Euclidean distance between `a` and `b`.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    nalgebra::distance(a, b)
}

/// Returns the perpendicular distance from `point` to the infinite line
/// through `segment`.
///
/// The result is NaN when the segment endpoints coincide; a [`Segment`]
/// built through [`Segment::new`] never does.
#[must_use]
pub fn point_to_line_distance(point: &Point2, segment: &Segment) -> f64 {
    let (x0, y0) = (point.x, point.y);
    let (x1, y1) = (segment.start().x, segment.start().y);
    let (x2, y2) = (segment.end().x, segment.end().y);

    let num = ((y2 - y1) * x0 - (x2 - x1) * y0 + x2 * y1 - y2 * x1).abs();
    let den = ((y2 - y1).powi(2) + (x2 - x1).powi(2)).sqrt();
    num / den
}

/// Returns `true` if `point` lies within the span of `segment`.
///
/// See [`Segment::contains_projection`].
#[must_use]
pub fn is_on_segment(segment: &Segment, point: &Point2) -> bool {
    segment.contains_projection(point)
}

/// Orthogonal projection of `point` onto the infinite line through `segment`.
///
/// # Errors
///
/// See [`Segment::project`].
pub fn project_onto_line(segment: &Segment, point: &Point2) -> Result<Point2> {
    segment.project(point)
}

/// The point of `segment` closest to `point`.
///
/// # Errors
///
/// See [`Segment::closest_point`].
pub fn closest_point_on_segment(segment: &Segment, point: &Point2) -> Result<Point2> {
    segment.closest_point(point)
}
