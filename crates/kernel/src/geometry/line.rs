use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;
use super::GeometryError;
use crate::GeoEpsilon;

/// An infinite line through `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3d {
    origin: Point3d,
    direction: Vec3,
}

impl Line3d {
    /// Line through two points that must be distinct within tolerance.
    pub fn from_points(a: Point3d, b: Point3d, eps: GeoEpsilon) -> Result<Self, GeometryError> {
        if a.is_equal(&b, eps) {
            return Err(GeometryError::DegenerateLine);
        }
        let direction = (b - a).normalized().ok_or(GeometryError::DegenerateLine)?;
        Ok(Self {
            origin: a,
            direction,
        })
    }

    /// Line through `origin` along `direction`.
    pub fn from_direction(
        origin: Point3d,
        direction: Vec3,
        eps: GeoEpsilon,
    ) -> Result<Self, GeometryError> {
        if direction.is_zero(eps) {
            return Err(GeometryError::DegenerateVector);
        }
        let direction = direction.normalized().ok_or(GeometryError::DegenerateVector)?;
        Ok(Self { origin, direction })
    }

    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn evaluate(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }

    /// Foot of the perpendicular from `p` and its parameter along the line.
    pub fn closest_point(&self, p: &Point3d) -> (Point3d, f64) {
        let t = (*p - self.origin).dot(&self.direction);
        (self.evaluate(t), t)
    }

    pub fn distance_to_point(&self, p: &Point3d) -> f64 {
        let (closest, _) = self.closest_point(p);
        p.distance_to(&closest)
    }

    pub fn contains(&self, p: &Point3d, eps: GeoEpsilon) -> bool {
        eps.is_zero(self.distance_to_point(p))
    }

    /// Same infinite point set, irrespective of origin and orientation.
    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        self.direction.cross(&other.direction).is_zero(eps) && self.contains(&other.origin, eps)
    }
}
