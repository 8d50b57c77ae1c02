use super::{PropertyError, PropertySource, SimulationSnapshot, expect_len};
use crate::discretization::Grid;
use chrono::NaiveDate;
use nalgebra::DVector;
use std::collections::HashMap;

/// Named per-cell arrays held in memory.
///
/// Arrays are stored as given; their length is checked against the cell
/// count when they are read, so a short or long array is reported on first
/// use instead of being padded or truncated.
#[derive(Clone, Debug)]
pub struct PropertyMap {
    cell_count: usize,
    arrays: HashMap<String, DVector<f64>>,
}

impl PropertyMap {
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            arrays: HashMap::new(),
        }
    }

    pub fn for_grid(grid: &dyn Grid) -> Self {
        Self::new(grid.cell_count())
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Store an array indexed by active cell.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.arrays.insert(name.into(), DVector::from_vec(values));
    }

    pub fn insert_uniform(&mut self, name: impl Into<String>, value: f64) {
        self.arrays
            .insert(name.into(), DVector::from_element(self.cell_count, value));
    }

    /// Store an array indexed by global cell, keeping the active entries.
    pub fn insert_global(
        &mut self,
        grid: &dyn Grid,
        name: impl Into<String>,
        values: &[f64],
    ) -> Result<(), PropertyError> {
        let name = name.into();
        if values.len() != grid.global_size() {
            return Err(PropertyError::DimensionMismatch {
                name,
                expected: grid.global_size(),
                found: values.len(),
            });
        }
        let active: Vec<f64> = values
            .iter()
            .enumerate()
            .filter(|(g, _)| grid.active_index(*g).is_some())
            .map(|(_, v)| *v)
            .collect();
        self.arrays.insert(name, DVector::from_vec(active));
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    fn fetch(&self, name: &str) -> Result<DVector<f64>, PropertyError> {
        let values = self
            .arrays
            .get(name)
            .cloned()
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        expect_len(name, values, self.cell_count)
    }
}

impl PropertySource for PropertyMap {
    fn get(&self, name: &str) -> Result<DVector<f64>, PropertyError> {
        self.fetch(name)
    }

    fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }
}

/// One restart step of a simulation: dynamic arrays plus the simulated date.
#[derive(Clone, Debug)]
pub struct RestartView {
    properties: PropertyMap,
    sim_date: NaiveDate,
    report_step: usize,
}

impl RestartView {
    pub fn new(cell_count: usize, sim_date: NaiveDate, report_step: usize) -> Self {
        Self {
            properties: PropertyMap::new(cell_count),
            sim_date,
            report_step,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.properties.insert(name, values);
    }

    pub fn insert_uniform(&mut self, name: impl Into<String>, value: f64) {
        self.properties.insert_uniform(name, value);
    }

    pub fn insert_global(
        &mut self,
        grid: &dyn Grid,
        name: impl Into<String>,
        values: &[f64],
    ) -> Result<(), PropertyError> {
        self.properties.insert_global(grid, name, values)
    }
}

impl SimulationSnapshot for RestartView {
    fn get(&self, name: &str) -> Result<DVector<f64>, PropertyError> {
        self.properties.fetch(name)
    }

    fn sim_date(&self) -> NaiveDate {
        self.sim_date
    }

    fn report_step(&self) -> usize {
        self.report_step
    }
}
