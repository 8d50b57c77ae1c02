pub mod extract;
pub mod registry;

use crate::physics::Phase;
use chrono::NaiveDate;
use nalgebra::DVector;
use std::collections::BTreeMap;
use std::fmt;

pub use extract::{ExtractionContext, extract};
pub use registry::{SurveyKey, SurveyRegistry};

/// How a survey's per-cell values were derived from a restart step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtractionMethod {
    /// Reservoir pore volume (`RPORV`), used as is.
    Rporv,
    /// Pore volume modification from compaction (`PORV_MOD`), used as is.
    Pormod,
    /// Fluid in place (`FIP<PHASE>`) times standard density.
    Fip,
    /// Remaining fluid in place (`RFIP<PHASE>`) times standard density.
    Rfip,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 4] = [
        ExtractionMethod::Rporv,
        ExtractionMethod::Pormod,
        ExtractionMethod::Fip,
        ExtractionMethod::Rfip,
    ];

    /// FIP and RFIP keep one mass column per phase.
    pub fn is_phase_resolved(self) -> bool {
        matches!(self, ExtractionMethod::Fip | ExtractionMethod::Rfip)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ExtractionMethod::Rporv => "RPORV",
            ExtractionMethod::Pormod => "PORMOD",
            ExtractionMethod::Fip => "FIP",
            ExtractionMethod::Rfip => "RFIP",
        };
        f.write_str(tag)
    }
}

/// Per-cell payload of a survey.
#[derive(Clone, Debug, PartialEq)]
pub enum SurveyValues {
    /// A single mass-equivalent column (RPORV, PORMOD).
    Aggregate(DVector<f64>),
    /// One mass column per phase present in the restart step (FIP, RFIP).
    PerPhase(BTreeMap<Phase, DVector<f64>>),
}

/// An immutable snapshot of per-cell mass-equivalent values.
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    name: String,
    method: ExtractionMethod,
    sim_date: NaiveDate,
    report_step: usize,
    cell_count: usize,
    values: SurveyValues,
}

impl Survey {
    pub(crate) fn new(
        name: &str,
        method: ExtractionMethod,
        sim_date: NaiveDate,
        report_step: usize,
        cell_count: usize,
        values: SurveyValues,
    ) -> Self {
        Self {
            name: name.to_string(),
            method,
            sim_date,
            report_step,
            cell_count,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> ExtractionMethod {
        self.method
    }

    pub fn sim_date(&self) -> NaiveDate {
        self.sim_date
    }

    pub fn report_step(&self) -> usize {
        self.report_step
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn values(&self) -> &SurveyValues {
        &self.values
    }

    pub fn phases(&self) -> Vec<Phase> {
        match &self.values {
            SurveyValues::Aggregate(_) => Vec::new(),
            SurveyValues::PerPhase(columns) => columns.keys().copied().collect(),
        }
    }

    pub fn phase_values(&self, phase: Phase) -> Option<&DVector<f64>> {
        match &self.values {
            SurveyValues::Aggregate(_) => None,
            SurveyValues::PerPhase(columns) => columns.get(&phase),
        }
    }

    /// Sum over every stored column, per cell.
    pub fn total_values(&self) -> DVector<f64> {
        match &self.values {
            SurveyValues::Aggregate(values) => values.clone(),
            SurveyValues::PerPhase(columns) => columns
                .values()
                .fold(DVector::zeros(self.cell_count), |acc, col| acc + col),
        }
    }
}
