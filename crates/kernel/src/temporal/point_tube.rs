//! Per-vertex trajectories over the recorded timesteps.
//!
//! Positions live in an append-only arena; a tube maps timestep indices to
//! arena slots. With delta compression on, a vertex that has not moved
//! since the previous step points at the previous step's slot instead of
//! storing a copy. Callers only ever receive positions by value.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::ids::VertexId;
use super::time::Timestamp;
use super::TemporalError;
use crate::geometry::Point3d;
use crate::GeoEpsilon;

/// One vertex's trajectory: arena slots indexed from `first_step`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointTube {
    first_step: usize,
    slots: Vec<Option<usize>>,
}

impl PointTube {
    fn starting_at(step: usize) -> Self {
        Self {
            first_step: step,
            slots: Vec::new(),
        }
    }

    pub fn first_step(&self) -> usize {
        self.first_step
    }

    /// Last step with a recorded position.
    pub fn last_step(&self) -> Option<usize> {
        self.slots
            .iter()
            .rposition(Option::is_some)
            .map(|i| self.first_step + i)
    }

    /// Steps with a recorded position, in order.
    pub fn steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| self.first_step + i)
    }

    /// No gaps between the first and last recorded step.
    pub fn is_contiguous(&self) -> bool {
        let recorded = self.slots.iter().filter(|slot| slot.is_some()).count();
        match self.last_step() {
            Some(last) => recorded == last - self.first_step + 1,
            None => true,
        }
    }

    fn slot(&self, step: usize) -> Option<usize> {
        let offset = step.checked_sub(self.first_step)?;
        self.slots.get(offset).copied().flatten()
    }

    fn set(&mut self, step: usize, slot: usize) {
        if step < self.first_step {
            let gap = self.first_step - step;
            self.slots.splice(0..0, std::iter::repeat_n(None, gap));
            self.first_step = step;
        }
        let offset = step - self.first_step;
        if offset >= self.slots.len() {
            self.slots.resize(offset + 1, None);
        }
        self.slots[offset] = Some(slot);
    }
}

/// Trajectories of every vertex a net has ever held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTubeStore {
    epsilon: GeoEpsilon,
    delta_compression: bool,
    timesteps: Vec<Timestamp>,
    positions: Vec<Point3d>,
    tubes: BTreeMap<VertexId, PointTube>,
}

impl PointTubeStore {
    pub fn new(epsilon: GeoEpsilon, delta_compression: bool) -> Self {
        Self {
            epsilon,
            delta_compression,
            timesteps: Vec::new(),
            positions: Vec::new(),
            tubes: BTreeMap::new(),
        }
    }

    pub fn timesteps(&self) -> &[Timestamp] {
        &self.timesteps
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.timesteps.last().copied()
    }

    pub fn tube(&self, vertex: VertexId) -> Option<&PointTube> {
        self.tubes.get(&vertex)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.tubes.keys().copied()
    }

    /// Number of distinct positions held in the arena.
    pub fn stored_position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, vertex: VertexId, step: usize) -> Option<Point3d> {
        let slot = self.tubes.get(&vertex)?.slot(step)?;
        self.positions.get(slot).copied()
    }

    pub fn vertex_ids_present_at(&self, step: usize) -> BTreeSet<VertexId> {
        self.tubes
            .iter()
            .filter(|(_, tube)| tube.slot(step).is_some())
            .map(|(&id, _)| id)
            .collect()
    }

    /// All positions recorded at `step`.
    pub fn positions_at_step(&self, step: usize) -> BTreeMap<VertexId, Point3d> {
        self.tubes
            .iter()
            .filter_map(|(&id, tube)| {
                let slot = tube.slot(step)?;
                Some((id, self.positions[slot]))
            })
            .collect()
    }

    /// Record `point` for `vertex` at an already recorded step.
    pub fn put_position(
        &mut self,
        vertex: VertexId,
        step: usize,
        point: Point3d,
    ) -> Result<(), TemporalError> {
        if step >= self.timesteps.len() {
            return Err(TemporalError::UnknownTimestep { step });
        }
        self.store_at(vertex, step, point);
        Ok(())
    }

    /// Append a step with unchanged topology.
    ///
    /// The vertex set must equal the set present at the previous step. On
    /// failure nothing is recorded.
    #[instrument(skip(self, positions), fields(vertices = positions.len()))]
    pub fn add_time_step(
        &mut self,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        let Some(previous) = self.timesteps.len().checked_sub(1) else {
            return Err(TemporalError::InvalidTopology {
                reason: "no preceding timestep to extend".to_string(),
            });
        };
        let last = self.timesteps[previous];
        if at <= last {
            return Err(TemporalError::NonMonotonicTimestamp { last, given: at });
        }

        let present = self.vertex_ids_present_at(previous);
        if let Some(stray) = positions.keys().find(|id| !present.contains(id)) {
            warn!(vertex = %stray, step = previous, "vertex absent at preceding step");
            return Err(TemporalError::InvalidTopology {
                reason: format!("vertex {stray} was not present at step {previous}"),
            });
        }
        if present.len() != positions.len() {
            warn!(
                expected = present.len(),
                given = positions.len(),
                "vertex count differs from preceding step"
            );
            return Err(TemporalError::InvalidTopology {
                reason: format!(
                    "expected {} vertices as at step {previous}, got {}",
                    present.len(),
                    positions.len()
                ),
            });
        }

        Ok(self.append_step(positions, at))
    }

    /// Append the first step of a new epoch. Vertices not seen before get a
    /// new tube; no vertex-set check is made.
    #[instrument(skip(self, positions), fields(vertices = positions.len()))]
    pub fn add_topology_step(
        &mut self,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        if let Some(last) = self.last_timestamp() {
            if at < last {
                return Err(TemporalError::NonMonotonicTimestamp { last, given: at });
            }
        }
        Ok(self.append_step(positions, at))
    }

    fn append_step(&mut self, positions: &BTreeMap<VertexId, Point3d>, at: Timestamp) -> usize {
        self.timesteps.push(at);
        let step = self.timesteps.len() - 1;
        for (&vertex, &point) in positions {
            self.store_at(vertex, step, point);
        }
        debug!(step, %at, arena = self.positions.len(), "timestep appended");
        step
    }

    fn store_at(&mut self, vertex: VertexId, step: usize, point: Point3d) {
        let tube = self
            .tubes
            .entry(vertex)
            .or_insert_with(|| PointTube::starting_at(step));

        let reused = if self.delta_compression {
            step.checked_sub(1)
                .and_then(|prev| tube.slot(prev))
                .filter(|&slot| self.positions[slot].is_equal(&point, self.epsilon))
        } else {
            None
        };
        let slot = match reused {
            Some(slot) => slot,
            None => {
                self.positions.push(point);
                self.positions.len() - 1
            }
        };
        tube.set(step, slot);
    }
}
