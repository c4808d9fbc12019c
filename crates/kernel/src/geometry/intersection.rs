//! Intersection classification between pairs of primitives.
//!
//! Every pair answers with the smallest primitive describing the common
//! locus, or `None` when the operands are disjoint. Pairs are symmetric:
//! `a.intersection(&b)` and `b.intersection(&a)` describe the same locus.

use serde::{Deserialize, Serialize};

use super::clip::{clip_segment_to_triangle, coplanar_triangles, dedup_points, farthest_pair};
use super::line::Line3d;
use super::plane::Plane3d;
use super::point::Point3d;
use super::segment::Segment3d;
use super::triangle::Triangle3d;
use super::wireframe::Wireframe3d;
use crate::GeoEpsilon;

/// Locus shared by two primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometricResult {
    Point(Point3d),
    Line(Line3d),
    Plane(Plane3d),
    Segment(Segment3d),
    Triangle(Triangle3d),
    Wireframe(Wireframe3d),
}

impl GeometricResult {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Plane(_) => "plane",
            Self::Segment(_) => "segment",
            Self::Triangle(_) => "triangle",
            Self::Wireframe(_) => "wireframe",
        }
    }

    pub fn as_point(&self) -> Option<&Point3d> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment3d> {
        match self {
            Self::Segment(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_triangle(&self) -> Option<&Triangle3d> {
        match self {
            Self::Triangle(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_wireframe(&self) -> Option<&Wireframe3d> {
        match self {
            Self::Wireframe(w) => Some(w),
            _ => None,
        }
    }

    /// Same kind and tolerant-equal geometry.
    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a.is_equal(b, eps),
            (Self::Line(a), Self::Line(b)) => a.is_equal(b, eps),
            (Self::Plane(a), Self::Plane(b)) => a.is_equal(b, eps),
            (Self::Segment(a), Self::Segment(b)) => a.is_equal(b, eps),
            (Self::Triangle(a), Self::Triangle(b)) => a.is_equal(b, eps),
            (Self::Wireframe(a), Self::Wireframe(b)) => a.is_equal(b, eps),
            _ => false,
        }
    }
}

/// Tolerant intersection with another primitive.
pub trait Intersection<Rhs: ?Sized = Self> {
    fn intersection(&self, other: &Rhs, eps: GeoEpsilon) -> Option<GeometricResult>;

    fn intersects(&self, other: &Rhs, eps: GeoEpsilon) -> bool {
        self.intersection(other, eps).is_some()
    }
}

pub fn intersects<A, B>(a: &A, b: &B, eps: GeoEpsilon) -> bool
where
    A: Intersection<B>,
{
    a.intersects(b, eps)
}

pub fn intersection<A, B>(a: &A, b: &B, eps: GeoEpsilon) -> Option<GeometricResult>
where
    A: Intersection<B>,
{
    a.intersection(b, eps)
}

/// Implement `Intersection<$lhs> for $rhs` by delegating to the other order.
macro_rules! symmetric_intersection {
    ($lhs:ty, $rhs:ty) => {
        impl Intersection<$lhs> for $rhs {
            fn intersection(&self, other: &$lhs, eps: GeoEpsilon) -> Option<GeometricResult> {
                other.intersection(self, eps)
            }

            fn intersects(&self, other: &$lhs, eps: GeoEpsilon) -> bool {
                other.intersects(self, eps)
            }
        }
    };
}

// ─── Point pairs ─────────────────────────────────────────────────────────────

impl Intersection for Point3d {
    fn intersection(&self, other: &Point3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        self.is_equal(other, eps).then_some(GeometricResult::Point(*self))
    }
}

impl Intersection<Line3d> for Point3d {
    fn intersection(&self, line: &Line3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        line.contains(self, eps).then_some(GeometricResult::Point(*self))
    }
}

impl Intersection<Plane3d> for Point3d {
    fn intersection(&self, plane: &Plane3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        plane.contains(self, eps).then_some(GeometricResult::Point(*self))
    }
}

impl Intersection<Segment3d> for Point3d {
    fn intersection(&self, segment: &Segment3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        segment.contains(self, eps).then_some(GeometricResult::Point(*self))
    }
}

impl Intersection<Triangle3d> for Point3d {
    fn intersection(&self, triangle: &Triangle3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        triangle.contains(self, eps).then_some(GeometricResult::Point(*self))
    }
}

symmetric_intersection!(Point3d, Line3d);
symmetric_intersection!(Point3d, Plane3d);
symmetric_intersection!(Point3d, Segment3d);
symmetric_intersection!(Point3d, Triangle3d);

// ─── Lines and planes ────────────────────────────────────────────────────────

impl Intersection for Line3d {
    fn intersection(&self, other: &Line3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        if self.is_equal(other, eps) {
            return Some(GeometricResult::Line(*self));
        }
        let d1 = self.direction();
        let d2 = other.direction();
        let b = d1.dot(&d2);
        let denom = 1.0 - b * b;
        if eps.is_zero(d1.cross(&d2).length()) {
            return None; // parallel, distinct
        }
        let w = self.origin() - other.origin();
        let d = d1.dot(&w);
        let e = d2.dot(&w);
        let p1 = self.evaluate((b * e - d) / denom);
        let p2 = other.evaluate((e - b * d) / denom);
        p1.is_equal(&p2, eps)
            .then(|| GeometricResult::Point(p1.midpoint(&p2)))
    }
}

impl Intersection<Plane3d> for Line3d {
    fn intersection(&self, plane: &Plane3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        let along = self.direction().dot(&plane.normal());
        let height = plane.signed_distance(&self.origin());
        if eps.is_zero(along) {
            return plane
                .contains(&self.origin(), eps)
                .then_some(GeometricResult::Line(*self));
        }
        Some(GeometricResult::Point(self.evaluate(-height / along)))
    }
}

symmetric_intersection!(Line3d, Plane3d);

impl Intersection for Plane3d {
    fn intersection(&self, other: &Plane3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        if self.is_parallel(other, eps) {
            return self
                .contains(&other.origin(), eps)
                .then_some(GeometricResult::Plane(*self));
        }
        let (n1, n2) = (self.normal(), other.normal());
        let u = n1.cross(&n2);
        let h1 = n1.dot(&self.origin().to_vec3());
        let h2 = n2.dot(&other.origin().to_vec3());
        let through = (n2.cross(&u) * h1 + u.cross(&n1) * h2) / u.length_squared();
        let origin = Point3d::new(through.x, through.y, through.z);
        Line3d::from_direction(origin, u, eps)
            .ok()
            .map(GeometricResult::Line)
    }
}

// ─── Triangles ───────────────────────────────────────────────────────────────

impl Intersection<Segment3d> for Triangle3d {
    fn intersection(&self, segment: &Segment3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        let plane = self.plane();
        let (start, end) = (segment.start(), segment.end());
        let ds = plane.signed_distance(&start);
        let de = plane.signed_distance(&end);

        if eps.is_zero(ds) && eps.is_zero(de) {
            return clip_segment_to_triangle(self, start, end, eps);
        }
        if (eps.greater(ds, 0.0) && eps.greater(de, 0.0)) || (eps.less(ds, 0.0) && eps.less(de, 0.0)) {
            return None;
        }

        let crossing = if eps.is_zero(ds) {
            start
        } else if eps.is_zero(de) {
            end
        } else {
            start.lerp(&end, ds / (ds - de))
        };
        self.contains(&crossing, eps)
            .then_some(GeometricResult::Point(crossing))
    }
}

symmetric_intersection!(Triangle3d, Segment3d);

impl Intersection for Triangle3d {
    fn intersection(&self, other: &Triangle3d, eps: GeoEpsilon) -> Option<GeometricResult> {
        let on_plane = |tri: &Triangle3d, plane: &Plane3d| {
            tri.vertices().iter().all(|v| plane.contains(v, eps))
        };
        if on_plane(other, self.plane()) || on_plane(self, other.plane()) {
            return coplanar_triangles(self, other, eps);
        }

        let locus = plane_crossing(self, other.plane(), eps);
        match locus.len() {
            0 => None,
            1 => other
                .contains(&locus[0], eps)
                .then_some(GeometricResult::Point(locus[0])),
            _ => {
                let (i, j) = farthest_pair(&locus);
                clip_segment_to_triangle(other, locus[i], locus[j], eps)
            }
        }
    }
}

/// Points where `triangle` meets `plane`: vertices lying on it plus edge
/// crossings between vertices on opposite sides.
fn plane_crossing(triangle: &Triangle3d, plane: &Plane3d, eps: GeoEpsilon) -> Vec<Point3d> {
    let vertices = triangle.vertices();
    let heights = vertices.map(|v| plane.signed_distance(&v));
    let mut points = Vec::with_capacity(3);

    for i in 0..3 {
        if eps.is_zero(heights[i]) {
            points.push(vertices[i]);
        }
    }
    for i in 0..3 {
        let j = (i + 1) % 3;
        let (hi, hj) = (heights[i], heights[j]);
        let opposite = (eps.greater(hi, 0.0) && eps.less(hj, 0.0))
            || (eps.less(hi, 0.0) && eps.greater(hj, 0.0));
        if opposite {
            points.push(vertices[i].lerp(&vertices[j], hi / (hi - hj)));
        }
    }
    dedup_points(points, eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps() -> GeoEpsilon {
        GeoEpsilon::new(1e-4).unwrap()
    }

    fn p(x: f64, y: f64, z: f64) -> Point3d {
        Point3d::new(x, y, z)
    }

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle3d {
        Triangle3d::new(a.into(), b.into(), c.into(), eps()).unwrap()
    }

    #[test]
    fn test_point_point() {
        assert!(intersects(&p(1.0, 2.0, 3.0), &p(1.00005, 2.0, 3.0), eps()));
        assert!(!intersects(&p(1.0, 2.0, 3.0), &p(1.001, 2.0, 3.0), eps()));
    }

    #[test]
    fn test_point_plane_is_symmetric() {
        let plane = Plane3d::from_points(p(2.0, -1.0, 2.0), p(1.0, -2.0, 1.0), p(0.0, -1.0, 5.0), eps())
            .unwrap();
        let on = p(1.0, -2.0, 1.0);
        assert_eq!(
            intersection(&on, &plane, eps()),
            Some(GeometricResult::Point(on))
        );
        assert!(intersects(&plane, &on, eps()));
        assert!(intersection(&plane, &p(0.0, 0.6, -1.9), eps()).is_none());
    }

    #[test]
    fn test_point_segment() {
        let segment = Segment3d::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), eps()).unwrap();
        let on = p(1.0, 0.0, 0.0);
        assert_eq!(intersection(&on, &segment, eps()), Some(GeometricResult::Point(on)));
        assert_eq!(intersection(&segment, &on, eps()), Some(GeometricResult::Point(on)));
        assert!(intersects(&p(4.0, 0.0, 0.0), &segment, eps()));
        assert!(intersects(&p(2.0, 0.00005, 0.0), &segment, eps()));

        assert!(intersection(&p(2.0, 0.01, 0.0), &segment, eps()).is_none());
        assert!(!intersects(&segment, &p(4.01, 0.0, 0.0), eps()));
        assert!(!intersects(&segment, &p(-0.01, 0.0, 0.0), eps()));
    }

    #[test]
    fn test_point_triangle() {
        let triangle = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let inside = p(1.0, 1.0, 0.0);
        assert_eq!(intersection(&inside, &triangle, eps()), Some(GeometricResult::Point(inside)));
        assert_eq!(intersection(&triangle, &inside, eps()), Some(GeometricResult::Point(inside)));
        assert!(intersects(&p(2.0, 2.0, 0.0), &triangle, eps()));
        assert!(intersects(&p(1.0, -0.00005, 0.0), &triangle, eps()));

        assert!(!intersects(&p(1.0, -0.001, 0.0), &triangle, eps()));
        assert!(!intersects(&triangle, &p(1.0, 1.0, 0.01), eps()));
        assert!(intersection(&p(3.0, 3.0, 0.0), &triangle, eps()).is_none());
    }

    #[test]
    fn test_point_line() {
        let line = Line3d::from_points(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), eps()).unwrap();
        assert!(intersects(&p(3.0, 3.0, 3.0), &line, eps()));
        assert!(!intersects(&line, &p(3.0, 3.0, 3.1), eps()));
    }

    #[test]
    fn test_line_plane_crossing() {
        let plane = Plane3d::from_normal(p(0.0, 0.0, 2.0), crate::geometry::Vec3::Z, eps()).unwrap();
        let line = Line3d::from_points(p(1.0, 1.0, 0.0), p(1.0, 1.0, 1.0), eps()).unwrap();
        let hit = intersection(&line, &plane, eps()).unwrap();
        assert!(hit.as_point().unwrap().is_equal(&p(1.0, 1.0, 2.0), eps()));
    }

    #[test]
    fn test_line_in_plane_and_parallel_line() {
        let plane = Plane3d::from_normal(p(0.0, 0.0, 2.0), crate::geometry::Vec3::Z, eps()).unwrap();
        let inside = Line3d::from_points(p(0.0, 0.0, 2.0), p(1.0, 0.0, 2.0), eps()).unwrap();
        let above = Line3d::from_points(p(0.0, 0.0, 3.0), p(1.0, 0.0, 3.0), eps()).unwrap();
        assert_eq!(intersection(&plane, &inside, eps()).unwrap().kind(), "line");
        assert!(intersection(&plane, &above, eps()).is_none());
    }

    #[test]
    fn test_line_line() {
        let a = Line3d::from_points(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), eps()).unwrap();
        let b = Line3d::from_points(p(2.0, -1.0, 0.0), p(2.0, 1.0, 0.0), eps()).unwrap();
        let skew = Line3d::from_points(p(2.0, -1.0, 1.0), p(2.0, 1.0, 1.0), eps()).unwrap();
        let hit = intersection(&a, &b, eps()).unwrap();
        assert!(hit.as_point().unwrap().is_equal(&p(2.0, 0.0, 0.0), eps()));
        assert!(intersection(&a, &skew, eps()).is_none());
        assert_eq!(intersection(&a, &a, eps()).unwrap().kind(), "line");
    }

    #[test]
    fn test_plane_plane_line() {
        let xy = Plane3d::from_normal(p(0.0, 0.0, 1.0), crate::geometry::Vec3::Z, eps()).unwrap();
        let xz = Plane3d::from_normal(p(0.0, 2.0, 0.0), crate::geometry::Vec3::Y, eps()).unwrap();
        let line = match intersection(&xy, &xz, eps()) {
            Some(GeometricResult::Line(line)) => line,
            other => panic!("expected line, got {other:?}"),
        };
        assert!(line.contains(&p(5.0, 2.0, 1.0), eps()));
        assert!(line.contains(&p(-3.0, 2.0, 1.0), eps()));
    }

    #[test]
    fn test_plane_plane_parallel() {
        let a = Plane3d::from_normal(p(0.0, 0.0, 1.0), crate::geometry::Vec3::Z, eps()).unwrap();
        let b = Plane3d::from_normal(p(0.0, 0.0, 2.0), crate::geometry::Vec3::Z, eps()).unwrap();
        assert!(intersection(&a, &b, eps()).is_none());
        assert_eq!(intersection(&a, &a, eps()).unwrap().kind(), "plane");
    }

    #[test]
    fn test_triangle_segment_piercing() {
        let t = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let pierce = Segment3d::new(p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), eps()).unwrap();
        let miss = Segment3d::new(p(5.0, 5.0, -1.0), p(5.0, 5.0, 1.0), eps()).unwrap();
        let short = Segment3d::new(p(1.0, 1.0, 0.5), p(1.0, 1.0, 1.0), eps()).unwrap();
        let hit = intersection(&t, &pierce, eps()).unwrap();
        assert!(hit.as_point().unwrap().is_equal(&p(1.0, 1.0, 0.0), eps()));
        assert!(intersection(&t, &miss, eps()).is_none());
        assert!(intersection(&short, &t, eps()).is_none());
    }

    #[test]
    fn test_triangle_segment_touching_vertex() {
        let t = tri([2.0, 3.0, 0.0], [1.0, 4.0, 0.0], [3.0, 4.0, 0.0]);
        let s = Segment3d::new(p(1.0, 3.0, 0.0), p(3.0, 3.0, 0.0), eps()).unwrap();
        let hit = intersection(&t, &s, eps()).unwrap();
        assert!(hit.as_point().unwrap().is_equal(&p(2.0, 3.0, 0.0), eps()));
    }

    #[test]
    fn test_triangle_triangle_crossing_planes() {
        let flat = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let upright = tri([1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [3.0, -1.0, 0.0]);
        let hit = intersection(&flat, &upright, eps()).unwrap();
        let seg = hit.as_segment().unwrap();
        let expected = Segment3d::new(p(1.0, 1.0, 0.0), p(2.0, 0.0, 0.0), eps()).unwrap();
        assert!(seg.is_equal(&expected, eps()), "{seg:?}");
    }

    #[test]
    fn test_triangle_triangle_separated_planes() {
        let a = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let b = tri([0.0, 0.0, 1.0], [4.0, 0.0, 2.0], [0.0, 4.0, 3.0]);
        assert!(intersection(&a, &b, eps()).is_none());
    }

    #[test]
    fn test_result_equality_requires_same_kind() {
        let point = GeometricResult::Point(p(0.0, 0.0, 0.0));
        let seg = GeometricResult::Segment(Segment3d::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), eps()).unwrap());
        assert!(!point.is_equal(&seg, eps()));
        assert!(seg.is_equal(&seg.clone(), eps()));
    }
}
