//! Time-lapse (4D) gravimetry for reservoir models.
//!
//! Surveys are per-cell mass-equivalent snapshots taken from restart steps.
//! [`GravityEngine::eval`] sums the point-mass attraction of the per-cell
//! change between two surveys at an observation point.

pub mod discretization;
pub mod engine;
pub mod error;
pub mod physics;
pub mod processing;
pub mod sources;
pub mod survey;

pub use engine::GravityEngine;
pub use engine::config::GravityConfig;
pub use engine::request::EvalRequest;
pub use error::{GravError, GravResult};
pub use physics::density::StdDensityTable;
pub use physics::{Phase, PhaseMask};
pub use processing::GravityReport;
pub use survey::{ExtractionMethod, Survey};
