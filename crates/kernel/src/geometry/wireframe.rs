use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::segment::Segment3d;
use super::GeometryError;
use crate::GeoEpsilon;

/// A graph of points joined by straight edges.
///
/// Used for intersection loci that are neither a single point, segment nor
/// triangle: a polygon with four or more corners, or several disjoint
/// segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireframeParts")]
pub struct Wireframe3d {
    nodes: Vec<Point3d>,
    edges: Vec<(usize, usize)>,
}

/// Unchecked serialized form; every edge index must name a node.
#[derive(Deserialize)]
struct WireframeParts {
    nodes: Vec<Point3d>,
    edges: Vec<(usize, usize)>,
}

impl TryFrom<WireframeParts> for Wireframe3d {
    type Error = GeometryError;

    fn try_from(parts: WireframeParts) -> Result<Self, Self::Error> {
        let WireframeParts { nodes, edges } = parts;
        if let Some(&(a, b)) = edges.iter().find(|&&(a, b)| a.max(b) >= nodes.len()) {
            return Err(GeometryError::WireframeEdgeOutOfRange {
                a,
                b,
                nodes: nodes.len(),
            });
        }
        Ok(Self { nodes, edges })
    }
}

impl Wireframe3d {
    /// Closed loop through `corners` in the given order.
    pub fn from_polygon(corners: Vec<Point3d>) -> Self {
        let n = corners.len();
        let edges = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Self {
            nodes: corners,
            edges,
        }
    }

    pub fn nodes(&self) -> &[Point3d] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segments(&self) -> Vec<Segment3d> {
        self.edges
            .iter()
            .map(|&(a, b)| Segment3d::between(self.nodes[a], self.nodes[b]))
            .collect()
    }

    /// Every node has exactly two incident edges.
    pub fn is_closed(&self) -> bool {
        let mut degree = vec![0usize; self.nodes.len()];
        for &(a, b) in &self.edges {
            degree[a] += 1;
            degree[b] += 1;
        }
        !degree.is_empty() && degree.iter().all(|&d| d == 2)
    }

    pub fn contains_node(&self, p: &Point3d, eps: GeoEpsilon) -> bool {
        self.nodes.iter().any(|n| n.is_equal(p, eps))
    }

    /// Same node set (tolerant) and same number of edges.
    pub fn is_equal(&self, other: &Self, eps: GeoEpsilon) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.edges.len() == other.edges.len()
            && self.nodes.iter().all(|n| other.contains_node(n, eps))
    }
}
