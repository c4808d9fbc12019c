use serde::{Deserialize, Serialize};

use super::ids::{ElementId, VertexId};
use super::TemporalError;
use crate::traits::Element4d;

/// Triangle element referencing three distinct vertices by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle4d {
    id: ElementId,
    vertices: [VertexId; 3],
}

impl Triangle4d {
    pub fn new(id: ElementId, vertices: [VertexId; 3]) -> Result<Self, TemporalError> {
        let [a, b, c] = vertices;
        if a == b || b == c || a == c {
            return Err(TemporalError::DegenerateElement { id });
        }
        Ok(Self { id, vertices })
    }

    pub fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }
}

impl Element4d for Triangle4d {
    fn id(&self) -> ElementId {
        self.id
    }

    fn vertex_ids(&self) -> &[VertexId] {
        &self.vertices
    }
}

/// Boundary segment between two distinct vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment4d {
    id: ElementId,
    vertices: [VertexId; 2],
}

impl Segment4d {
    pub fn new(id: ElementId, start: VertexId, end: VertexId) -> Result<Self, TemporalError> {
        if start == end {
            return Err(TemporalError::DegenerateElement { id });
        }
        Ok(Self {
            id,
            vertices: [start, end],
        })
    }

    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }
}

impl Element4d for Segment4d {
    fn id(&self) -> ElementId {
        self.id
    }

    fn vertex_ids(&self) -> &[VertexId] {
        &self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_vertex_rejected() {
        let err = Triangle4d::new(ElementId(1), [VertexId(0), VertexId(1), VertexId(0)]).unwrap_err();
        assert_eq!(err, TemporalError::DegenerateElement { id: ElementId(1) });
        assert!(Segment4d::new(ElementId(2), VertexId(5), VertexId(5)).is_err());
    }

    #[test]
    fn test_vertex_ids() {
        let tri = Triangle4d::new(ElementId(1), [VertexId(0), VertexId(1), VertexId(2)]).unwrap();
        assert_eq!(tri.vertex_ids(), &[VertexId(0), VertexId(1), VertexId(2)]);
        assert_eq!(tri.id(), ElementId(1));
    }
}
