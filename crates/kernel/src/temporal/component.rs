use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::{ComponentId, ElementId};
use super::time::{TimeInterval, Timestamp};

/// A named subset of a net with its own temporal footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub interval: TimeInterval,
    pub elements: BTreeSet<ElementId>,
}

impl Component {
    /// Component that exists from `start` until the net closes it.
    pub fn new(id: ComponentId, name: impl Into<String>, start: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            interval: TimeInterval::open(start),
            elements: BTreeSet::new(),
        }
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementId>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        self.interval.contains(at)
    }
}
