//! The triangle net aggregate: tube store, component intervals and topology
//! epochs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::component::Component;
use super::element::{Segment4d, Triangle4d};
use super::ids::{ComponentId, ElementId, VertexId};
use super::point_tube::PointTubeStore;
use super::query;
use super::time::{TimeInterval, Timestamp};
use super::TemporalError;
use crate::config::NetConfig;
use crate::geometry::{Point3d, Triangle3d};
use crate::traits::{Element4d, Net4d};

/// A net interval and the components registered to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct IntervalEntry {
    pub(crate) interval: TimeInterval,
    pub(crate) components: Vec<ComponentId>,
}

/// Connectivity fixed between two topology changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    pub changed_at: Option<Timestamp>,
    pub elements: BTreeMap<ElementId, Triangle4d>,
    pub boundary: BTreeMap<ElementId, Segment4d>,
}

/// A triangulated surface whose geometry and topology change over time.
///
/// Writers take `&mut self`; wrap the net in a
/// [`SharedNet`](super::shared::SharedNet) to share it between threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleNet4d {
    config: NetConfig,
    start: Timestamp,
    end: Option<Timestamp>,
    store: PointTubeStore,
    pub(crate) intervals: Vec<IntervalEntry>,
    components: BTreeMap<ComponentId, Component>,
    change_timestamps: Vec<Timestamp>,
    pub(crate) epochs: Vec<Epoch>,
    /// A topology change is waiting for its seeding step.
    awaiting_seed: bool,
}

impl TriangleNet4d {
    pub fn new(start: Timestamp, config: NetConfig) -> Self {
        Self {
            config,
            start,
            end: None,
            store: PointTubeStore::new(config.epsilon, config.delta_compression),
            intervals: vec![IntervalEntry {
                interval: TimeInterval::open(start),
                components: Vec::new(),
            }],
            components: BTreeMap::new(),
            change_timestamps: Vec::new(),
            epochs: Vec::new(),
            awaiting_seed: false,
        }
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn store(&self) -> &PointTubeStore {
        &self.store
    }

    pub fn timesteps(&self) -> &[Timestamp] {
        self.store.timesteps()
    }

    pub fn change_timestamps(&self) -> &[Timestamp] {
        &self.change_timestamps
    }

    pub fn topology_change_count(&self) -> usize {
        self.change_timestamps.len()
    }

    pub fn epoch_count(&self) -> usize {
        self.epochs.len()
    }

    pub fn intervals(&self) -> impl Iterator<Item = &TimeInterval> + '_ {
        self.intervals.iter().map(|entry| &entry.interval)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.components.values()
    }

    fn ensure_open(&self) -> Result<(), TemporalError> {
        match self.end {
            Some(end) => Err(TemporalError::NetClosed { end }),
            None => Ok(()),
        }
    }

    fn current_interval(&self) -> &IntervalEntry {
        // `intervals` is never empty: `new` seeds it and nothing removes.
        &self.intervals[self.intervals.len() - 1]
    }

    /// Close the open interval and every component registered to it.
    fn close_current_interval(&mut self, at: Timestamp) {
        let Some(entry) = self.intervals.last_mut() else {
            return;
        };
        entry.interval.close(at);
        for id in &entry.components {
            if let Some(component) = self.components.get_mut(id) {
                if component.interval.is_open() {
                    component.interval.close(at);
                    debug!(component = %id, %at, "component closed");
                }
            }
        }
    }

    #[instrument(skip(self, component), fields(id = %component.id))]
    pub fn add_component(&mut self, component: Component) -> Result<(), TemporalError> {
        self.ensure_open()?;
        if self.components.contains_key(&component.id) {
            return Err(TemporalError::DuplicateComponent { id: component.id });
        }
        if component.interval.start < self.current_interval().interval.start {
            return Err(TemporalError::ComponentBeforeInterval { id: component.id });
        }
        let id = component.id;
        self.components.insert(id, component);
        if let Some(entry) = self.intervals.last_mut() {
            entry.components.push(id);
        }
        debug!("component added");
        Ok(())
    }

    /// Insert into the latest epoch.
    pub fn add_element(&mut self, element: Triangle4d) -> Result<(), TemporalError> {
        self.ensure_open()?;
        let epoch = self.epochs.last_mut().ok_or(TemporalError::NoEpoch)?;
        if epoch.elements.contains_key(&element.id()) {
            return Err(TemporalError::DuplicateElement { id: element.id() });
        }
        epoch.elements.insert(element.id(), element);
        Ok(())
    }

    pub fn add_boundary_element(&mut self, segment: Segment4d) -> Result<(), TemporalError> {
        self.ensure_open()?;
        let epoch = self.epochs.last_mut().ok_or(TemporalError::NoEpoch)?;
        if epoch.boundary.contains_key(&segment.id()) {
            return Err(TemporalError::DuplicateBoundaryElement { id: segment.id() });
        }
        epoch.boundary.insert(segment.id(), segment);
        Ok(())
    }

    /// Close the current interval and epoch at `at` and open fresh ones.
    ///
    /// A change at the open interval's own start reuses that interval.
    #[instrument(skip(self))]
    pub fn begin_topology_change(&mut self, at: Timestamp) -> Result<(), TemporalError> {
        self.ensure_open()?;
        if let Some(&last) = self.change_timestamps.last() {
            if at <= last {
                return Err(TemporalError::NonMonotonicTimestamp { last, given: at });
            }
        }
        let floor = self.store.last_timestamp().map_or(self.start, |step| step.max(self.start));
        if at < floor {
            return Err(TemporalError::NonMonotonicTimestamp { last: floor, given: at });
        }

        if self.current_interval().interval.start != at {
            self.close_current_interval(at);
            self.intervals.push(IntervalEntry {
                interval: TimeInterval::open(at),
                components: Vec::new(),
            });
        }
        self.change_timestamps.push(at);
        self.epochs.push(Epoch {
            changed_at: Some(at),
            ..Epoch::default()
        });
        self.awaiting_seed = true;
        debug!(epoch = self.epochs.len() - 1, "epoch opened");
        Ok(())
    }

    /// Seed the step at the pending topology change.
    pub fn add_topology_step(
        &mut self,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        self.ensure_open()?;
        let pending = self.change_timestamps.last().copied().ok_or(TemporalError::NoEpoch)?;
        if !self.awaiting_seed || pending != at {
            return Err(TemporalError::NoTopologyChangeAt { at });
        }
        let step = self.store.add_topology_step(positions, at)?;
        self.awaiting_seed = false;
        Ok(step)
    }

    /// Append new positions for an unchanged vertex set.
    pub fn add_time_step(
        &mut self,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        self.ensure_open()?;
        if self.awaiting_seed {
            warn!(%at, "time step before the pending topology change was seeded");
            return Err(TemporalError::InvalidTopology {
                reason: "pending topology change has no seeding step".to_string(),
            });
        }
        self.store.add_time_step(positions, at)
    }

    /// Close the net at `at`. Later writes fail with `NetClosed`.
    #[instrument(skip(self))]
    pub fn set_end(&mut self, at: Timestamp) -> Result<(), TemporalError> {
        self.ensure_open()?;
        let mut floor = self.current_interval().interval.start;
        if let Some(step) = self.store.last_timestamp() {
            floor = floor.max(step);
        }
        if at < floor {
            return Err(TemporalError::NonMonotonicTimestamp { last: floor, given: at });
        }
        self.close_current_interval(at);
        self.end = Some(at);
        debug!("net closed");
        Ok(())
    }

    fn epoch_at(&self, at: Timestamp) -> Option<&Epoch> {
        let count = self.change_timestamps.partition_point(|&change| change <= at);
        self.epochs.get(count.checked_sub(1)?)
    }

    pub fn boundary_elements_at(&self, at: Timestamp) -> Option<&BTreeMap<ElementId, Segment4d>> {
        self.epoch_at(at).map(|epoch| &epoch.boundary)
    }

    /// Resolve element geometry at `at`. Elements whose vertices are
    /// missing or collapse to a degenerate triangle are skipped.
    pub fn triangles_at(&self, at: Timestamp) -> Option<Vec<(ElementId, Triangle3d)>> {
        let positions = self.positions_at_instant(at)?;
        let elements = self.elements_at(at)?;
        let eps = self.config.epsilon;

        let triangles = elements
            .values()
            .filter_map(|element| {
                let corners: Option<Vec<Point3d>> = element
                    .vertex_ids()
                    .iter()
                    .map(|id| positions.get(id).copied())
                    .collect();
                let Some(corners) = corners else {
                    warn!(element = %element.id(), %at, "element vertex has no position");
                    return None;
                };
                match Triangle3d::new(corners[0], corners[1], corners[2], eps) {
                    Ok(triangle) => Some((element.id(), triangle)),
                    Err(err) => {
                        warn!(element = %element.id(), %at, %err, "element collapsed");
                        None
                    }
                }
            })
            .collect();
        Some(triangles)
    }
}

impl Net4d for TriangleNet4d {
    type Element = Triangle4d;

    fn net_type(&self) -> &'static str {
        "triangle"
    }

    fn begin_topology_change(&mut self, at: Timestamp) -> Result<(), TemporalError> {
        TriangleNet4d::begin_topology_change(self, at)
    }

    /// Later interval wins at a shared boundary.
    fn valid_components_at(&self, at: Timestamp) -> Option<Vec<&Component>> {
        let entry = self
            .intervals
            .iter()
            .rev()
            .find(|entry| entry.interval.contains(at))?;
        Some(
            entry
                .components
                .iter()
                .filter_map(|id| self.components.get(id))
                .collect(),
        )
    }

    fn elements_at(&self, at: Timestamp) -> Option<&BTreeMap<ElementId, Triangle4d>> {
        self.epoch_at(at).map(|epoch| &epoch.elements)
    }

    fn positions_at_instant(&self, at: Timestamp) -> Option<BTreeMap<VertexId, Point3d>> {
        query::positions_at_instant(&self.store, at)
    }
}
