use crate::error::{GeometryError, Result};
use crate::math::distance_2d::{distance, point_to_line_distance};
use crate::math::{xy, Point2, Vector2, TOLERANCE};

/// A bounded line segment between two distinct points.
///
/// Planar graph edges are treated as segments when reasoning about where a
/// new point attaches to the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: Point2,
    end: Point2,
}

impl Segment {
    /// Creates a segment from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if a coordinate is NaN or infinite,
    /// and `GeometryError::Degenerate` if the endpoints coincide.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        for p in [&start, &end] {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(GeometryError::NonFinite { x: p.x, y: p.y }.into());
            }
        }
        if start == end {
            return Err(GeometryError::Degenerate(format!(
                "segment endpoints coincide at ({}, {})",
                start.x, start.y
            ))
            .into());
        }
        Ok(Self { start, end })
    }

    /// Returns the first endpoint.
    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    /// Returns the second endpoint.
    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Returns the midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Returns the length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    /// Returns `true` if `point` is no farther from the midpoint than the
    /// endpoints are.
    ///
    /// For a point already on the segment's line this is exactly the test for
    /// lying between the endpoints.
    #[must_use]
    pub fn contains_projection(&self, point: &Point2) -> bool {
        let mid = self.midpoint();
        let max_distance = distance(&self.start, &mid);
        distance(point, &mid) <= max_distance
    }

    /// Orthogonal projection of `point` onto the infinite line through the
    /// segment.
    ///
    /// Both signs of the segment normal are tried and the candidate lying on
    /// the line (within [`TOLERANCE`]) wins.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ProjectionFailed` if neither candidate lies on
    /// the line.
    pub fn project(&self, point: &Point2) -> Result<Point2> {
        let b = self.start - self.end;
        let b_unit = b / b.norm();
        let normal = Vector2::new(-b_unit.y, b_unit.x);
        let offset = point_to_line_distance(point, self);

        for candidate in [*point + normal * offset, *point - normal * offset] {
            if point_to_line_distance(&candidate, self) < TOLERANCE {
                return Ok(candidate);
            }
        }

        Err(GeometryError::ProjectionFailed {
            point: xy(point),
            segment: [xy(&self.start), xy(&self.end)],
        }
        .into())
    }

    /// The point of the segment closest to `point`.
    ///
    /// Falls back to the nearer endpoint when the projection lies outside the
    /// segment; ties go to `start`.
    ///
    /// # Errors
    ///
    /// Propagates projection failures from [`Segment::project`].
    pub fn closest_point(&self, point: &Point2) -> Result<Point2> {
        let projected = self.project(point)?;
        if self.contains_projection(&projected) {
            return Ok(projected);
        }

        if distance(&self.start, point) <= distance(&self.end, point) {
            Ok(self.start)
        } else {
            Ok(self.end)
        }
    }
}
