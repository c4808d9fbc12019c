//! Seams between the temporal model and its callers.
//!
//! Element kinds and net kinds are abstracted here so that the shared lock
//! wrapper and the audit can work over any of them.

use std::collections::BTreeMap;

use crate::geometry::Point3d;
use crate::temporal::{Component, ElementId, TemporalError, Timestamp, VertexId};

/// An element that references vertices by id, never by coordinates.
pub trait Element4d {
    fn id(&self) -> ElementId;

    fn vertex_ids(&self) -> &[VertexId];
}

/// Epoch-manager and query operations shared by every net kind.
pub trait Net4d {
    type Element: Element4d;

    /// Short name of the element kind stored in this net.
    fn net_type(&self) -> &'static str;

    fn begin_topology_change(&mut self, at: Timestamp) -> Result<(), TemporalError>;

    /// Components registered to the interval containing `at`.
    fn valid_components_at(&self, at: Timestamp) -> Option<Vec<&Component>>;

    /// Element map of the epoch in effect at `at`.
    fn elements_at(&self, at: Timestamp) -> Option<&BTreeMap<ElementId, Self::Element>>;

    fn positions_at_instant(&self, at: Timestamp) -> Option<BTreeMap<VertexId, Point3d>>;
}
