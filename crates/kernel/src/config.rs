//! Per-net configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GeometryError;
use crate::GeoEpsilon;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed net configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Settings fixed when a net is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Tolerance for position comparisons and element geometry.
    pub epsilon: GeoEpsilon,
    /// Share the stored position when a vertex does not move between steps.
    pub delta_compression: bool,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            epsilon: GeoEpsilon::default(),
            delta_compression: true,
        }
    }
}

impl NetConfig {
    /// Sub-micron tolerance for survey-grade meshes.
    pub fn tight() -> Self {
        Self {
            epsilon: GeoEpsilon::from_positive(1e-7),
            ..Self::default()
        }
    }

    /// Coarse tolerance for noisy sensor meshes.
    pub fn loose() -> Self {
        Self {
            epsilon: GeoEpsilon::from_positive(1e-2),
            ..Self::default()
        }
    }

    pub fn with_epsilon(self, value: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            epsilon: GeoEpsilon::new(value)?,
            ..self
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
