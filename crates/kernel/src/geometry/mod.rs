pub mod point;
pub mod vector;
pub mod line;
pub mod plane;
pub mod segment;
pub mod triangle;
pub mod wireframe;
pub mod intersection;
pub mod projection;
mod clip;

use thiserror::Error;

pub use line::Line3d;
pub use plane::Plane3d;
pub use point::{Point2d, Point3d};
pub use segment::Segment3d;
pub use triangle::Triangle3d;
pub use vector::Vec3;
pub use wireframe::Wireframe3d;

/// Construction failures for geometric primitives.
///
/// Degenerate input is rejected up front so that later predicates never see
/// NaN directions or zero-area frames.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Tolerance must be positive and finite, got {value}")]
    InvalidEpsilon { value: f64 },

    #[error("Line endpoints coincide within tolerance")]
    DegenerateLine,

    #[error("Segment endpoints coincide within tolerance")]
    DegenerateSegment,

    #[error("Plane points are coincident or collinear within tolerance")]
    DegeneratePlane,

    #[error("Triangle vertices are coincident or collinear within tolerance")]
    DegenerateTriangle,

    #[error("Direction vector has zero length within tolerance")]
    DegenerateVector,

    #[error("Wireframe edge ({a}, {b}) refers past the last of {nodes} nodes")]
    WireframeEdgeOutOfRange { a: usize, b: usize, nodes: usize },
}
