use super::Phase;
use crate::error::{GravError, GravResult};
use std::collections::HashMap;

/// Reference (standard condition) densities used to turn fluid-in-place
/// volumes into mass.
///
/// Each phase has an optional global value and any number of per-region
/// overrides. A lookup that neither covers is an error: a silent zero would
/// erase that phase from every gravity result.
#[derive(Clone, Debug, Default)]
pub struct StdDensityTable {
    global: HashMap<Phase, f64>,
    regional: HashMap<(Phase, u32), f64>,
}

impl StdDensityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_global_density(&mut self, phase: Phase, value: f64) -> GravResult<()> {
        validate(phase, value)?;
        self.global.insert(phase, value);
        Ok(())
    }

    pub fn set_region_density(&mut self, phase: Phase, region: u32, value: f64) -> GravResult<()> {
        validate(phase, value)?;
        self.regional.insert((phase, region), value);
        Ok(())
    }

    /// Region override first, then the phase-global value.
    pub fn lookup(&self, phase: Phase, region: u32) -> GravResult<f64> {
        self.regional
            .get(&(phase, region))
            .or_else(|| self.global.get(&phase))
            .copied()
            .ok_or(GravError::MissingDensityModel { phase, region })
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.regional.is_empty()
    }
}

fn validate(phase: Phase, value: f64) -> GravResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GravError::InvalidDensity { phase, value })
    }
}
