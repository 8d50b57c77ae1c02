use crate::physics::point_mass::{GRAVITATIONAL_CONSTANT, MICROGAL_PER_SI};
use serde::{Deserialize, Serialize};

/// Numerical settings of the gravity kernel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// m³/(kg·s²).
    pub gravitational_constant: f64,
    /// Multiplier from m/s² to the output unit (µGal by default).
    pub unit_scale: f64,
    /// Cells closer than this to the station are left out of the sum.
    pub min_distance: f64,
    /// Cells per parallel work item.
    pub chunk_size: usize,
    /// Grids with at most this many cells are summed on the calling thread.
    pub serial_threshold: usize,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            unit_scale: MICROGAL_PER_SI,
            min_distance: 1e-6,
            chunk_size: 4096,
            serial_threshold: 8192,
        }
    }
}

impl GravityConfig {
    /// Force every evaluation through the parallel path with `chunk_size`.
    pub fn parallel(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            serial_threshold: 0,
            ..Self::default()
        }
    }

    /// Keep every evaluation on the calling thread.
    pub fn serial() -> Self {
        Self {
            serial_threshold: usize::MAX,
            ..Self::default()
        }
    }
}
