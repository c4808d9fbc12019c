use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::Vec3;
use super::GeometryError;
use crate::GeoEpsilon;

/// An infinite plane with an orthonormal in-plane frame.
///
/// The `(u_axis, v_axis)` frame maps plane points to 2D, which is where
/// coplanar configurations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane3d {
    origin: Point3d,
    normal: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
}

impl Plane3d {
    /// Plane through three points that are neither coincident nor collinear.
    pub fn from_points(
        a: Point3d,
        b: Point3d,
        c: Point3d,
        eps: GeoEpsilon,
    ) -> Result<Self, GeometryError> {
        if !spans_plane(&a, &b, &c, eps) {
            return Err(GeometryError::DegeneratePlane);
        }
        let normal = (b - a).cross(&(c - a));
        Self::from_normal(a, normal, eps).map_err(|_| GeometryError::DegeneratePlane)
    }

    /// Plane through `origin` perpendicular to `normal`.
    pub fn from_normal(origin: Point3d, normal: Vec3, eps: GeoEpsilon) -> Result<Self, GeometryError> {
        if normal.is_zero(eps) {
            return Err(GeometryError::DegenerateVector);
        }
        let normal = normal.normalized().ok_or(GeometryError::DegenerateVector)?;
        let seed = if normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u_axis = seed
            .cross(&normal)
            .normalized()
            .ok_or(GeometryError::DegenerateVector)?;
        let v_axis = normal.cross(&u_axis);
        Ok(Self {
            origin,
            normal,
            u_axis,
            v_axis,
        })
    }

    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    pub fn project_point(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.signed_distance(p)
    }

    pub fn contains(&self, p: &Point3d, eps: GeoEpsilon) -> bool {
        eps.is_zero(self.signed_distance(p))
    }

    /// Coordinates of `p` (projected onto the plane) in the local 2D frame.
    pub fn to_local(&self, p: &Point3d) -> Point2d {
        let v = *p - self.origin;
        Point2d::new(v.dot(&self.u_axis), v.dot(&self.v_axis))
    }

    /// Lift local 2D coordinates back onto the plane.
    pub fn from_local(&self, p: &Point2d) -> Point3d {
        self.origin + self.u_axis * p.x + self.v_axis * p.y
    }

    /// Normals are parallel within tolerance.
    pub fn is_parallel(&self, other: &Self, eps: GeoEpsilon) -> bool {
        self.normal.cross(&other.normal).is_zero(eps)
    }

    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        self.is_parallel(other, eps) && self.contains(&other.origin, eps)
    }
}

/// Three points span a plane when no two coincide and the third stays
/// farther than `eps` from the line through the longest pair.
pub(crate) fn spans_plane(a: &Point3d, b: &Point3d, c: &Point3d, eps: GeoEpsilon) -> bool {
    if a.is_equal(b, eps) || b.is_equal(c, eps) || a.is_equal(c, eps) {
        return false;
    }
    let candidates = [(a, b, c), (b, c, a), (c, a, b)];
    let (p, q, r) = candidates
        .into_iter()
        .max_by(|x, y| {
            x.0.distance_squared_to(x.1)
                .total_cmp(&y.0.distance_squared_to(y.1))
        })
        .unwrap_or((a, b, c));
    let base = *q - *p;
    let height = base.cross(&(*r - *p)).length() / base.length();
    !eps.is_zero(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps() -> GeoEpsilon {
        GeoEpsilon::new(1e-4).unwrap()
    }

    fn sample_plane() -> Plane3d {
        Plane3d::from_points(
            Point3d::new(2.0, -1.0, 2.0),
            Point3d::new(1.0, -2.0, 1.0),
            Point3d::new(0.0, -1.0, 5.0),
            eps(),
        )
        .unwrap()
    }

    #[test]
    fn test_collinear_points_rejected() {
        let result = Plane3d::from_points(
            Point3d::ORIGIN,
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.00001),
            eps(),
        );
        assert_eq!(result, Err(GeometryError::DegeneratePlane));
    }

    #[test]
    fn test_contains_defining_points() {
        let plane = sample_plane();
        assert!(plane.contains(&Point3d::new(1.0, -2.0, 1.0), eps()));
        assert!(plane.contains(&Point3d::new(3.0, 0.0, 3.0), eps()));
        assert!(!plane.contains(&Point3d::new(0.0, 0.6, -1.9), eps()));
    }

    #[test]
    fn test_project_point() {
        let plane = Plane3d::from_points(
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(-2.24, -3.0, 1.0),
            Point3d::new(5.1, 2.78, 1.0),
            eps(),
        )
        .unwrap();
        let projected = plane.project_point(&Point3d::new(0.0, 0.6, -1.9));
        assert!(projected.is_equal(&Point3d::new(0.0, 0.6, 1.0), eps()));
    }

    #[test]
    fn test_local_frame_round_trip() {
        let plane = sample_plane();
        let p = Point3d::new(1.0, -2.0, 1.0);
        let back = plane.from_local(&plane.to_local(&p));
        assert!(back.is_equal(&p, eps()));
    }
}
