//! Handle-based entry points for callers that do not hold nets directly.

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};
use tracing::info;

use super::component::Component;
use super::element::{Segment4d, Triangle4d};
use super::ids::{ElementId, VertexId};
use super::net::TriangleNet4d;
use super::shared::SharedNet;
use super::time::Timestamp;
use super::TemporalError;
use crate::config::NetConfig;
use crate::geometry::Point3d;
use crate::traits::Net4d;

new_key_type! {
    pub struct NetHandle;
}

/// Owns every live net; stale handles yield [`TemporalError::UnknownNet`].
#[derive(Debug, Default)]
pub struct NetRegistry {
    nets: SlotMap<NetHandle, SharedNet>,
    config: NetConfig,
}

impl NetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose nets are created with `config`.
    pub fn with_config(config: NetConfig) -> Self {
        Self {
            nets: SlotMap::with_key(),
            config,
        }
    }

    pub fn create_net(&mut self, start: Timestamp) -> NetHandle {
        self.create_net_with(start, self.config)
    }

    pub fn create_net_with(&mut self, start: Timestamp, config: NetConfig) -> NetHandle {
        let handle = self.nets.insert(SharedNet::new(TriangleNet4d::new(start, config)));
        info!(?handle, %start, "net created");
        handle
    }

    pub fn get(&self, handle: NetHandle) -> Result<SharedNet, TemporalError> {
        self.nets.get(handle).cloned().ok_or(TemporalError::UnknownNet)
    }

    pub fn remove(&mut self, handle: NetHandle) -> Option<SharedNet> {
        self.nets.remove(handle)
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn add_component(&self, handle: NetHandle, component: Component) -> Result<(), TemporalError> {
        self.get(handle)?.update(|net| net.add_component(component))
    }

    pub fn add_element(&self, handle: NetHandle, element: Triangle4d) -> Result<(), TemporalError> {
        self.get(handle)?.update(|net| net.add_element(element))
    }

    pub fn add_boundary_element(&self, handle: NetHandle, segment: Segment4d) -> Result<(), TemporalError> {
        self.get(handle)?.update(|net| net.add_boundary_element(segment))
    }

    pub fn add_time_step(
        &self,
        handle: NetHandle,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        self.get(handle)?.update(|net| net.add_time_step(positions, at))
    }

    pub fn add_topology_step(
        &self,
        handle: NetHandle,
        positions: &BTreeMap<VertexId, Point3d>,
        at: Timestamp,
    ) -> Result<usize, TemporalError> {
        self.get(handle)?.update(|net| net.add_topology_step(positions, at))
    }

    pub fn begin_topology_change(&self, handle: NetHandle, at: Timestamp) -> Result<(), TemporalError> {
        self.get(handle)?.update(|net| net.begin_topology_change(at))
    }

    pub fn set_end(&self, handle: NetHandle, at: Timestamp) -> Result<(), TemporalError> {
        self.get(handle)?.update(|net| net.set_end(at))
    }

    pub fn positions_at_instant(
        &self,
        handle: NetHandle,
        at: Timestamp,
    ) -> Result<Option<BTreeMap<VertexId, Point3d>>, TemporalError> {
        Ok(self.get(handle)?.read().positions_at_instant(at))
    }

    pub fn valid_components_at(
        &self,
        handle: NetHandle,
        at: Timestamp,
    ) -> Result<Option<Vec<Component>>, TemporalError> {
        let net = self.get(handle)?;
        let guard = net.read();
        Ok(guard
            .valid_components_at(at)
            .map(|found| found.into_iter().cloned().collect()))
    }

    pub fn elements_at(
        &self,
        handle: NetHandle,
        at: Timestamp,
    ) -> Result<Option<BTreeMap<ElementId, Triangle4d>>, TemporalError> {
        let net = self.get(handle)?;
        let guard = net.read();
        Ok(guard.elements_at(at).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::ComponentId;

    fn ts(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_create_and_remove() {
        let mut registry = NetRegistry::new();
        let handle = registry.create_net(ts(0));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(handle).is_ok());
        assert!(registry.remove(handle).is_some());
        assert!(registry.is_empty());
        assert!(matches!(registry.get(handle), Err(TemporalError::UnknownNet)));
        assert_eq!(
            registry.begin_topology_change(handle, ts(0)),
            Err(TemporalError::UnknownNet)
        );
    }

    #[test]
    fn test_handle_api_round_trip() {
        let mut registry = NetRegistry::with_config(NetConfig::loose());
        let handle = registry.create_net(ts(0));
        registry.begin_topology_change(handle, ts(0)).unwrap();
        registry
            .add_component(handle, Component::new(ComponentId(4), "shell", ts(0)))
            .unwrap();
        registry
            .add_element(
                handle,
                Triangle4d::new(ElementId(0), [VertexId(0), VertexId(1), VertexId(2)]).unwrap(),
            )
            .unwrap();
        let frame: BTreeMap<_, _> = [
            (VertexId(0), Point3d::new(0.0, 0.0, 0.0)),
            (VertexId(1), Point3d::new(1.0, 0.0, 0.0)),
            (VertexId(2), Point3d::new(0.0, 1.0, 0.0)),
        ]
        .into();
        registry.add_topology_step(handle, &frame, ts(0)).unwrap();

        assert_eq!(registry.positions_at_instant(handle, ts(0)).unwrap(), Some(frame));
        assert_eq!(registry.elements_at(handle, ts(3)).unwrap().map(|e| e.len()), Some(1));
        let components = registry.valid_components_at(handle, ts(3)).unwrap().unwrap();
        assert_eq!(components[0].name, "shell");
        assert_eq!(registry.get(handle).unwrap().read().config().epsilon.value(), 1e-2);
    }

    #[test]
    fn test_boundary_element_on_default_registry() {
        let mut registry = NetRegistry::new();
        let handle = registry.create_net(ts(0));
        registry.begin_topology_change(handle, ts(0)).unwrap();
        let edge = Segment4d::new(ElementId(3), VertexId(0), VertexId(1)).unwrap();
        registry.add_boundary_element(handle, edge).unwrap();

        let net = registry.get(handle).unwrap();
        let boundary = net.read().boundary_elements_at(ts(0)).cloned().unwrap();
        assert_eq!(boundary.len(), 1);
        assert!(boundary.contains_key(&ElementId(3)));
    }
}
