//! Point-in-time lookups over a tube store.

use std::collections::BTreeMap;

use super::ids::VertexId;
use super::point_tube::PointTubeStore;
use super::time::Timestamp;
use crate::geometry::Point3d;

/// Where a query timestamp falls among the recorded timesteps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepLookup {
    /// Matches a recorded step. With a repeated timestamp this is the first
    /// of the repeats.
    Exact(usize),
    /// Strictly between two consecutive steps.
    Between { start: usize, end: usize, factor: f64 },
}

/// Resolve `at` against the sorted `timesteps`. `None` outside
/// `[first, last]`.
pub fn locate(timesteps: &[Timestamp], at: Timestamp) -> Option<StepLookup> {
    let idx = timesteps.partition_point(|&step| step < at);
    if timesteps.get(idx) == Some(&at) {
        return Some(StepLookup::Exact(idx));
    }
    if idx == 0 || idx == timesteps.len() {
        return None;
    }
    let (start, end) = (idx - 1, idx);
    Some(StepLookup::Between {
        start,
        end,
        factor: at.fraction_between(timesteps[start], timesteps[end]),
    })
}

/// Componentwise `start + (end - start) * factor`.
pub fn interpolate(start: &Point3d, end: &Point3d, factor: f64) -> Point3d {
    start.lerp(end, factor)
}

/// Vertex positions at `at`, exact or interpolated.
///
/// Between two steps only vertices present at both are returned.
pub fn positions_at_instant(
    store: &PointTubeStore,
    at: Timestamp,
) -> Option<BTreeMap<VertexId, Point3d>> {
    match locate(store.timesteps(), at)? {
        StepLookup::Exact(step) => Some(store.positions_at_step(step)),
        StepLookup::Between { start, end, factor } => {
            let before = store.positions_at_step(start);
            let positions = before
                .into_iter()
                .filter_map(|(id, from)| {
                    let to = store.position(id, end)?;
                    Some((id, interpolate(&from, &to, factor)))
                })
                .collect();
            Some(positions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoEpsilon;

    fn ts(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_locate() {
        let steps = [ts(0), ts(10), ts(10), ts(30)];
        assert_eq!(locate(&steps, ts(-1)), None);
        assert_eq!(locate(&steps, ts(31)), None);
        assert_eq!(locate(&steps, ts(0)), Some(StepLookup::Exact(0)));
        assert_eq!(locate(&steps, ts(10)), Some(StepLookup::Exact(1)));
        assert_eq!(locate(&steps, ts(30)), Some(StepLookup::Exact(3)));
        assert_eq!(
            locate(&steps, ts(15)),
            Some(StepLookup::Between { start: 2, end: 3, factor: 0.25 })
        );
        assert_eq!(
            locate(&steps, ts(5)),
            Some(StepLookup::Between { start: 0, end: 1, factor: 0.5 })
        );
        assert_eq!(locate(&[], ts(0)), None);
    }

    #[test]
    fn test_interpolation_skips_vertices_missing_at_one_end() {
        let mut store = PointTubeStore::new(GeoEpsilon::default(), true);
        let first: BTreeMap<_, _> = [
            (VertexId(0), Point3d::new(0.0, 0.0, 0.0)),
            (VertexId(1), Point3d::new(1.0, 1.0, 1.0)),
        ]
        .into();
        let second: BTreeMap<_, _> = [
            (VertexId(0), Point3d::new(4.0, 0.0, 0.0)),
            (VertexId(2), Point3d::new(9.0, 9.0, 9.0)),
        ]
        .into();
        store.add_topology_step(&first, ts(0)).unwrap();
        store.add_topology_step(&second, ts(100)).unwrap();

        let mid = positions_at_instant(&store, ts(25)).unwrap();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[&VertexId(0)], Point3d::new(1.0, 0.0, 0.0));
        assert_eq!(positions_at_instant(&store, ts(100)).unwrap(), second);
        assert!(positions_at_instant(&store, ts(101)).is_none());
    }

    #[test]
    fn test_interpolation_across_full_timestamp_range() {
        let mut store = PointTubeStore::new(GeoEpsilon::default(), true);
        let from: BTreeMap<_, _> = [(VertexId(0), Point3d::new(0.0, 0.0, 0.0))].into();
        let to: BTreeMap<_, _> = [(VertexId(0), Point3d::new(2.0, 0.0, 0.0))].into();
        store.add_topology_step(&from, ts(i64::MIN + 1)).unwrap();
        store.add_time_step(&to, ts(i64::MAX - 1)).unwrap();

        let mid = positions_at_instant(&store, ts(0)).unwrap();
        assert!(mid[&VertexId(0)].is_equal(&Point3d::new(1.0, 0.0, 0.0), GeoEpsilon::default()));
    }
}
