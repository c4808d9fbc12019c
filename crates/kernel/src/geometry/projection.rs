//! Orthogonal projection of points onto primitives, and point distances.

use super::line::Line3d;
use super::plane::Plane3d;
use super::point::Point3d;
use super::segment::Segment3d;
use crate::GeoEpsilon;

/// Foot of the perpendicular from a point onto `Self`.
///
/// Infinite targets always have a foot; bounded ones return `None` when the
/// foot falls outside them by more than `eps`.
pub trait Projection {
    fn project_point(&self, p: &Point3d, eps: GeoEpsilon) -> Option<Point3d>;
}

impl Projection for Line3d {
    fn project_point(&self, p: &Point3d, _eps: GeoEpsilon) -> Option<Point3d> {
        Some(self.closest_point(p).0)
    }
}

impl Projection for Plane3d {
    fn project_point(&self, p: &Point3d, _eps: GeoEpsilon) -> Option<Point3d> {
        Some(Plane3d::project_point(self, p))
    }
}

impl Projection for Segment3d {
    fn project_point(&self, p: &Point3d, eps: GeoEpsilon) -> Option<Point3d> {
        self.project(p, eps)
    }
}

pub fn project<T: Projection>(point: &Point3d, target: &T, eps: GeoEpsilon) -> Option<Point3d> {
    target.project_point(point, eps)
}

/// Exact squared Euclidean distance; no tolerance applied.
pub fn distance_squared(a: &Point3d, b: &Point3d) -> f64 {
    a.distance_squared_to(b)
}

pub fn distance(a: &Point3d, b: &Point3d) -> f64 {
    distance_squared(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;

    fn eps() -> GeoEpsilon {
        GeoEpsilon::new(1e-4).unwrap()
    }

    #[test]
    fn test_distance_between_origin_and_diagonal() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(2.0, 2.0, 2.0);
        assert_eq!(distance_squared(&a, &b), 12.0);
        assert_eq!(distance(&a, &b), 3.4641016151377544);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_project_onto_line_is_total() {
        let line = Line3d::from_points(Point3d::new(-1.0, -1.0, -1.0), Point3d::new(2.0, 2.0, 2.0), eps())
            .unwrap();
        let far = Point3d::new(-14.3, 5.0, 1.0);
        let foot = project(&far, &line, eps()).unwrap();
        assert!(line.contains(&foot, eps()));
        assert!(foot.is_equal(&Point3d::new(-2.7666666666666666, -2.7666666666666666, -2.7666666666666666), eps()));
    }

    #[test]
    fn test_project_onto_plane() {
        let plane = Plane3d::from_normal(Point3d::new(0.0, 0.0, 1.0), Vec3::Z, eps()).unwrap();
        let foot = project(&Point3d::new(0.0, 0.6, -1.9), &plane, eps()).unwrap();
        assert!(foot.is_equal(&Point3d::new(0.0, 0.6, 1.0), eps()));
    }

    #[test]
    fn test_project_onto_segment_is_partial() {
        let seg = Segment3d::new(Point3d::new(-1.0, -1.0, -1.0), Point3d::new(2.0, 2.0, 2.0), eps())
            .unwrap();
        assert!(project(&Point3d::new(-14.3, 5.0, 1.0), &seg, eps()).is_none());
        assert!(project(&Point3d::new(0.0, 0.6, -1.9), &seg, eps()).is_some());
    }
}
