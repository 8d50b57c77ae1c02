//! Per-cell property data consumed by the engine.
//!
//! File parsing lives outside this crate. Readers hand the engine already
//! materialised arrays through [`PropertySource`] (initial-state data) and
//! [`SimulationSnapshot`] (one restart step). The in-memory implementations
//! here back the tests, benches and the demo binary.

pub mod keywords;
pub mod memory;

use chrono::NaiveDate;
use nalgebra::DVector;
use thiserror::Error;

pub use memory::{PropertyMap, RestartView};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("property `{name}` has {found} entries, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Static (initial-state) properties, one value per active cell.
pub trait PropertySource: Send + Sync {
    fn get(&self, name: &str) -> Result<DVector<f64>, PropertyError>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }
}

/// Dynamic properties at a single simulated instant.
pub trait SimulationSnapshot: Send + Sync {
    fn get(&self, name: &str) -> Result<DVector<f64>, PropertyError>;

    fn sim_date(&self) -> NaiveDate;

    fn report_step(&self) -> usize;
}

/// Reject arrays whose length differs from the expected cell count.
pub(crate) fn expect_len(
    name: &str,
    values: DVector<f64>,
    expected: usize,
) -> Result<DVector<f64>, PropertyError> {
    if values.len() != expected {
        return Err(PropertyError::DimensionMismatch {
            name: name.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}
