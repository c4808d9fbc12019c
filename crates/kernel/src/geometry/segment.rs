use serde::{Deserialize, Serialize};

use super::line::Line3d;
use super::point::Point3d;
use super::vector::Vec3;
use super::GeometryError;
use crate::GeoEpsilon;

/// A bounded straight segment between two distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment3d {
    start: Point3d,
    end: Point3d,
}

impl Segment3d {
    pub fn new(start: Point3d, end: Point3d, eps: GeoEpsilon) -> Result<Self, GeometryError> {
        if start.is_equal(&end, eps) {
            return Err(GeometryError::DegenerateSegment);
        }
        Ok(Self { start, end })
    }

    /// Build from endpoints already known to be distinct (edges of a valid
    /// triangle, clip results that failed the point test).
    pub(crate) fn between(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point3d {
        self.start
    }

    pub fn end(&self) -> Point3d {
        self.end
    }

    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Supporting line, oriented from `start` to `end`.
    pub fn line(&self, eps: GeoEpsilon) -> Result<Line3d, GeometryError> {
        Line3d::from_points(self.start, self.end, eps)
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        self.start.lerp(&self.end, t)
    }

    /// Unclamped parameter of the foot of the perpendicular from `p`;
    /// `0` at `start`, `1` at `end`.
    pub fn parameter_of(&self, p: &Point3d) -> f64 {
        let d = self.direction();
        (*p - self.start).dot(&d) / d.length_squared()
    }

    /// Foot of the perpendicular clamped onto the segment. `None` when the
    /// foot lies outside the segment by more than `eps`.
    pub fn project(&self, p: &Point3d, eps: GeoEpsilon) -> Option<Point3d> {
        let t = self.parameter_of(p);
        let overshoot = if t < 0.0 {
            -t
        } else if t > 1.0 {
            t - 1.0
        } else {
            0.0
        };
        if eps.greater(overshoot * self.length(), 0.0) {
            return None;
        }
        Some(self.point_at(t.clamp(0.0, 1.0)))
    }

    pub fn contains(&self, p: &Point3d, eps: GeoEpsilon) -> bool {
        self.project(p, eps)
            .is_some_and(|foot| eps.is_zero(foot.distance_to(p)))
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Same endpoints in either orientation.
    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        (self.start.is_equal(&other.start, eps) && self.end.is_equal(&other.end, eps))
            || (self.start.is_equal(&other.end, eps) && self.end.is_equal(&other.start, eps))
    }
}
