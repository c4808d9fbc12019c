//! Convex clipping in a plane's 2D frame and classification of the clipped
//! locus into the smallest fitting primitive.

use super::intersection::GeometricResult;
use super::line::Line3d;
use super::plane::Plane3d;
use super::point::{Point2d, Point3d};
use super::segment::Segment3d;
use super::triangle::{edge_distance, Triangle3d};
use super::wireframe::Wireframe3d;
use crate::GeoEpsilon;

/// Parameter where `f` crosses zero between `fa` (at 0) and `fb` (at 1).
fn zero_crossing(fa: f64, fb: f64) -> f64 {
    (fa / (fa - fb)).clamp(0.0, 1.0)
}

/// Clip the segment `start..end`, lying in `triangle`'s plane, to the
/// triangle. Points within `eps` outside an edge are kept.
pub(crate) fn clip_segment_to_triangle(
    triangle: &Triangle3d,
    start: Point3d,
    end: Point3d,
    eps: GeoEpsilon,
) -> Option<GeometricResult> {
    let plane = triangle.plane();
    let corners = triangle.local_ccw(plane);
    let (a, b) = (plane.to_local(&start), plane.to_local(&end));
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for i in 0..3 {
        let (p, q) = (&corners[i], &corners[(i + 1) % 3]);
        let fa = edge_distance(p, q, &a);
        let fb = edge_distance(p, q, &b);
        let a_out = eps.less(fa, 0.0);
        let b_out = eps.less(fb, 0.0);
        match (a_out, b_out) {
            (true, true) => return None,
            (false, false) => {}
            (true, false) => t0 = t0.max(zero_crossing(fa, fb)),
            (false, true) => t1 = t1.min(zero_crossing(fa, fb)),
        }
    }

    let first = start.lerp(&end, t0);
    let last = start.lerp(&end, t1);
    if first.is_equal(&last, eps) {
        return Some(GeometricResult::Point(first.midpoint(&last)));
    }
    if t0 > t1 {
        return None;
    }
    Some(GeometricResult::Segment(Segment3d::between(first, last)))
}

/// Sutherland–Hodgman: clip the convex CCW polygon `subject` by every edge of
/// the convex CCW polygon `clip`.
pub(crate) fn clip_polygon(subject: &[Point2d], clip: &[Point2d], eps: GeoEpsilon) -> Vec<Point2d> {
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let (p, q) = (&clip[i], &clip[(i + 1) % clip.len()]);
        let input = std::mem::take(&mut output);
        for (j, current) in input.iter().enumerate() {
            let previous = &input[(j + input.len() - 1) % input.len()];
            let f_prev = edge_distance(p, q, previous);
            let f_cur = edge_distance(p, q, current);
            let prev_in = !eps.less(f_prev, 0.0);
            let cur_in = !eps.less(f_cur, 0.0);
            if cur_in {
                if !prev_in {
                    output.push(previous.lerp(current, zero_crossing(f_prev, f_cur)));
                }
                output.push(*current);
            } else if prev_in {
                output.push(previous.lerp(current, zero_crossing(f_prev, f_cur)));
            }
        }
    }
    output
}

/// Intersection of two coplanar triangles, resolved in `a`'s plane frame.
pub(crate) fn coplanar_triangles(
    a: &Triangle3d,
    b: &Triangle3d,
    eps: GeoEpsilon,
) -> Option<GeometricResult> {
    let plane: &Plane3d = a.plane();
    let clipped = clip_polygon(&a.local_ccw(plane), &b.local_ccw(plane), eps);
    let corners: Vec<Point3d> = clipped.iter().map(|p| plane.from_local(p)).collect();
    classify_polygon(corners, eps)
}

/// Drop points that repeat an earlier point within tolerance.
pub(crate) fn dedup_points(points: impl IntoIterator<Item = Point3d>, eps: GeoEpsilon) -> Vec<Point3d> {
    let mut unique: Vec<Point3d> = Vec::new();
    for p in points {
        if !unique.iter().any(|u| u.is_equal(&p, eps)) {
            unique.push(p);
        }
    }
    unique
}

/// Indices of the two points farthest apart.
pub(crate) fn farthest_pair(points: &[Point3d]) -> (usize, usize) {
    let mut best = (0, 0, -1.0);
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance_squared_to(&points[j]);
            if d > best.2 {
                best = (i, j, d);
            }
        }
    }
    (best.0, best.1)
}

/// Classify an ordered polygon boundary (possibly with repeated or collinear
/// corners) as none, point, segment, triangle or wireframe.
pub(crate) fn classify_polygon(corners: Vec<Point3d>, eps: GeoEpsilon) -> Option<GeometricResult> {
    let mut corners = dedup_points(corners, eps);
    match corners.len() {
        0 => return None,
        1 => return Some(GeometricResult::Point(corners[0])),
        _ => {}
    }

    let (i, j) = farthest_pair(&corners);
    let line = Line3d::from_points(corners[i], corners[j], eps).ok()?;
    if corners.iter().all(|p| line.contains(p, eps)) {
        return Some(GeometricResult::Segment(Segment3d::between(corners[i], corners[j])));
    }

    // Remove corners lying on the chord between their neighbours.
    let mut k = 0;
    while corners.len() > 3 && k < corners.len() {
        let n = corners.len();
        let prev = corners[(k + n - 1) % n];
        let next = corners[(k + 1) % n];
        let redundant = Segment3d::between(prev, next).contains(&corners[k], eps);
        if redundant {
            corners.remove(k);
            k = k.saturating_sub(1);
        } else {
            k += 1;
        }
    }

    if corners.len() == 3 {
        if let Ok(triangle) = Triangle3d::new(corners[0], corners[1], corners[2], eps) {
            return Some(GeometricResult::Triangle(triangle));
        }
    }
    Some(GeometricResult::Wireframe(Wireframe3d::from_polygon(corners)))
}
