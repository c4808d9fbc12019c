pub mod config;
pub mod geometry;
pub mod temporal;
pub mod traits;

use serde::{Deserialize, Serialize};

use geometry::GeometryError;

// Re-export the entry points callers reach for most often.
pub use config::{ConfigError, NetConfig};
pub use geometry::intersection::{intersection, intersects, GeometricResult, Intersection};
pub use geometry::projection::{distance, distance_squared, project, Projection};
pub use temporal::net::TriangleNet4d;
pub use temporal::registry::{NetHandle, NetRegistry};
pub use temporal::shared::SharedNet;
pub use temporal::{TemporalError, Timestamp};
pub use traits::{Element4d, Net4d};

/// Tolerance used for every floating-point comparison in the kernel.
///
/// There is no global tolerance: each predicate takes one of these
/// explicitly. The wrapped value is always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GeoEpsilon {
    value: f64,
}

impl GeoEpsilon {
    pub const DEFAULT_VALUE: f64 = 1e-4;

    pub fn new(value: f64) -> Result<Self, GeometryError> {
        if value > 0.0 && value.is_finite() {
            Ok(Self { value })
        } else {
            Err(GeometryError::InvalidEpsilon { value })
        }
    }

    /// Constructor for compile-time constants known to be positive.
    pub(crate) const fn from_positive(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// `a` and `b` differ by no more than the tolerance.
    pub fn equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.value
    }

    pub fn is_zero(&self, x: f64) -> bool {
        x.abs() <= self.value
    }

    /// `a` exceeds `b` by more than the tolerance.
    pub fn greater(&self, a: f64, b: f64) -> bool {
        a - b > self.value
    }

    /// `a` falls below `b` by more than the tolerance.
    pub fn less(&self, a: f64, b: f64) -> bool {
        b - a > self.value
    }
}

impl Default for GeoEpsilon {
    fn default() -> Self {
        Self::from_positive(Self::DEFAULT_VALUE)
    }
}

impl TryFrom<f64> for GeoEpsilon {
    type Error = GeometryError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GeoEpsilon> for f64 {
    fn from(eps: GeoEpsilon) -> Self {
        eps.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_rejects_non_positive() {
        assert!(GeoEpsilon::new(0.0).is_err());
        assert!(GeoEpsilon::new(-1e-3).is_err());
        assert!(GeoEpsilon::new(f64::NAN).is_err());
        assert!(GeoEpsilon::new(f64::INFINITY).is_err());
        assert!(GeoEpsilon::new(1e-9).is_ok());
    }

    #[test]
    fn test_epsilon_comparisons() {
        let eps = GeoEpsilon::new(1e-3).unwrap();
        assert!(eps.equal(1.0, 1.0005));
        assert!(!eps.equal(1.0, 1.002));
        assert!(eps.is_zero(-0.0009));
        assert!(eps.greater(1.01, 1.0));
        assert!(!eps.greater(1.0005, 1.0));
        assert!(eps.less(0.99, 1.0));
    }

    #[test]
    fn test_epsilon_serde_validates() {
        let eps: GeoEpsilon = serde_json::from_str("0.5").unwrap();
        assert_eq!(eps.value(), 0.5);
        assert!(serde_json::from_str::<GeoEpsilon>("0.0").is_err());
        assert_eq!(serde_json::to_string(&eps).unwrap(), "0.5");
    }
}
