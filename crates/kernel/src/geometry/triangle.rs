use serde::{Deserialize, Serialize};

use super::plane::{spans_plane, Plane3d};
use super::point::{Point2d, Point3d};
use super::segment::Segment3d;
use super::GeometryError;
use crate::GeoEpsilon;

/// A non-degenerate triangle together with its supporting plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle3d {
    vertices: [Point3d; 3],
    plane: Plane3d,
}

impl Triangle3d {
    pub fn new(a: Point3d, b: Point3d, c: Point3d, eps: GeoEpsilon) -> Result<Self, GeometryError> {
        if !spans_plane(&a, &b, &c, eps) {
            return Err(GeometryError::DegenerateTriangle);
        }
        let plane = Plane3d::from_points(a, b, c, eps).map_err(|_| GeometryError::DegenerateTriangle)?;
        Ok(Self {
            vertices: [a, b, c],
            plane,
        })
    }

    pub fn vertices(&self) -> &[Point3d; 3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane3d {
        &self.plane
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)).length() * 0.5
    }

    pub fn edges(&self) -> [Segment3d; 3] {
        let [a, b, c] = self.vertices;
        [
            Segment3d::between(a, b),
            Segment3d::between(b, c),
            Segment3d::between(c, a),
        ]
    }

    /// Vertices in `plane`'s 2D frame, wound counter-clockwise.
    pub(crate) fn local_ccw(&self, plane: &Plane3d) -> [Point2d; 3] {
        let [a, b, c] = self.vertices.map(|v| plane.to_local(&v));
        if a.cross(&b, &c) < 0.0 { [a, c, b] } else { [a, b, c] }
    }

    /// Tolerant containment: points within `eps` of an edge count as inside.
    pub fn contains(&self, p: &Point3d, eps: GeoEpsilon) -> bool {
        if !self.plane.contains(p, eps) {
            return false;
        }
        let local = self.local_ccw(&self.plane);
        let q = self.plane.to_local(p);
        (0..3).all(|i| !eps.less(edge_distance(&local[i], &local[(i + 1) % 3], &q), 0.0))
    }

    /// Same vertex set, irrespective of order.
    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        self.vertices
            .iter()
            .all(|v| other.vertices.iter().any(|w| v.is_equal(w, eps)))
            && other
                .vertices
                .iter()
                .all(|w| self.vertices.iter().any(|v| v.is_equal(w, eps)))
    }
}

/// Signed distance of `q` from the directed edge `a -> b`; positive on the
/// left, which is the interior of a counter-clockwise polygon.
pub(crate) fn edge_distance(a: &Point2d, b: &Point2d, q: &Point2d) -> f64 {
    a.cross(b, q) / a.distance_to(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps() -> GeoEpsilon {
        GeoEpsilon::new(1e-4).unwrap()
    }

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle3d {
        Triangle3d::new(a.into(), b.into(), c.into(), eps()).unwrap()
    }

    #[test]
    fn test_collinear_triangle_rejected() {
        let result = Triangle3d::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(2.0, 0.00001, 0.0),
            eps(),
        );
        assert_eq!(result, Err(GeometryError::DegenerateTriangle));
    }

    #[test]
    fn test_area() {
        let t = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 3.0, 0.0]);
        assert!((t.area() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_contains_interior_edge_and_vertex() {
        let t = tri([2.0, 3.0, 0.0], [1.0, 4.0, 0.0], [3.0, 4.0, 0.0]);
        assert!(t.contains(&Point3d::new(2.0, 3.5, 0.0), eps()));
        assert!(t.contains(&Point3d::new(2.0, 4.0, 0.0), eps()));
        assert!(t.contains(&Point3d::new(2.0, 3.0, 0.0), eps()));
        assert!(t.contains(&Point3d::new(2.0, 4.00005, 0.0), eps()));
        assert!(!t.contains(&Point3d::new(2.0, 4.01, 0.0), eps()));
        assert!(!t.contains(&Point3d::new(2.0, 3.5, 0.01), eps()));
    }

    #[test]
    fn test_equality_ignores_vertex_order() {
        let a = tri([1.0, 1.0, 0.0], [3.0, 1.0, 0.0], [2.0, 3.0, 0.0]);
        let b = tri([2.0, 3.0, 0.0], [1.0, 1.0, 0.0], [3.0, 1.0, 0.0]);
        assert!(a.is_equal(&b, eps()));
    }
}
