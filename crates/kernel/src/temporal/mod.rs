//! Meshes whose vertex positions and connectivity evolve over time.
//!
//! A [`TriangleNet4d`](net::TriangleNet4d) owns a [`PointTubeStore`] holding
//! each vertex's trajectory across recorded timesteps, and a sequence of
//! topology epochs, each with its own element map. Queries resolve a
//! timestamp against epoch boundaries and then fetch or interpolate
//! positions.

pub mod audit;
pub mod component;
pub mod element;
pub mod ids;
pub mod net;
pub mod point_tube;
pub mod query;
pub mod registry;
pub mod shared;
pub mod time;

use thiserror::Error;

pub use component::Component;
pub use element::{Segment4d, Triangle4d};
pub use ids::{ComponentId, ElementId, VertexId};
pub use point_tube::{PointTube, PointTubeStore};
pub use time::{TimeInterval, Timestamp};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemporalError {
    #[error("Invalid topology: {reason}")]
    InvalidTopology { reason: String },

    #[error("Component {id} already exists in this net")]
    DuplicateComponent { id: ComponentId },

    #[error("Element {id} already exists in the current epoch")]
    DuplicateElement { id: ElementId },

    #[error("Boundary element {id} already exists in the current epoch")]
    DuplicateBoundaryElement { id: ElementId },

    #[error("No topology epoch has been opened yet")]
    NoEpoch,

    #[error("Timestamp {given} does not advance past {last}")]
    NonMonotonicTimestamp { last: Timestamp, given: Timestamp },

    #[error("No pending topology change at {at}")]
    NoTopologyChangeAt { at: Timestamp },

    #[error("Element {id} references the same vertex more than once")]
    DegenerateElement { id: ElementId },

    #[error("Component {id} starts before the current interval")]
    ComponentBeforeInterval { id: ComponentId },

    #[error("Net was closed at {end}")]
    NetClosed { end: Timestamp },

    #[error("Timestep {step} has not been recorded")]
    UnknownTimestep { step: usize },

    #[error("Another writer or reader holds the net")]
    WriterBusy,

    #[error("Net handle does not refer to a live net")]
    UnknownNet,
}
