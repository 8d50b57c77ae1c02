pub mod config;
pub mod kernel;
pub mod request;

use crate::discretization::Grid;
use crate::error::{GravError, GravResult};
use crate::physics::density::StdDensityTable;
use crate::physics::{Phase, PhaseMask};
use crate::processing::{GravityReport, SurveyStamp};
use crate::sources::{PropertySource, SimulationSnapshot};
use crate::survey::{
    ExtractionContext, ExtractionMethod, Survey, SurveyKey, SurveyRegistry, SurveyValues, extract,
};
use config::GravityConfig;
use glam::DVec3;
use kernel::{Column, integrate};
use parking_lot::RwLock;
use request::EvalRequest;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

#[derive(Default)]
struct EngineState {
    densities: StdDensityTable,
    surveys: SurveyRegistry,
}

/// Time-lapse gravity evaluator for one reservoir model.
///
/// The engine borrows the grid and the initial-state properties and owns the
/// density table and the survey registry. All methods take `&self`: writes
/// (density entries, survey registration) take an exclusive lock, while
/// evaluations only hold a shared lock long enough to clone the two surveys
/// they need.
pub struct GravityEngine<'a> {
    grid: &'a dyn Grid,
    init: &'a dyn PropertySource,
    centers: Vec<DVec3>,
    config: GravityConfig,
    state: RwLock<EngineState>,
}

impl<'a> GravityEngine<'a> {
    pub fn new(grid: &'a dyn Grid, init: &'a dyn PropertySource) -> Self {
        let centers = (0..grid.cell_count()).map(|c| grid.cell_center(c)).collect();
        Self {
            grid,
            init,
            centers,
            config: GravityConfig::default(),
            state: RwLock::new(EngineState::default()),
        }
    }

    /// Replace the numerical settings.
    pub fn with_config(mut self, config: GravityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    pub fn cell_count(&self) -> usize {
        self.centers.len()
    }


    pub fn set_global_density(&self, phase: Phase, value: f64) -> GravResult<()> {
        self.state.write().densities.set_global_density(phase, value)
    }

    pub fn set_region_density(&self, phase: Phase, region: u32, value: f64) -> GravResult<()> {
        self.state
            .write()
            .densities
            .set_region_density(phase, region, value)
    }

    pub fn density(&self, phase: Phase, region: u32) -> GravResult<f64> {
        self.state.read().densities.lookup(phase, region)
    }


    /// Build a survey from `snapshot` and store it under `(name, method)`,
    /// replacing any previous entry with that key. On error the registry is
    /// left untouched.
    #[instrument(skip(self, snapshot), fields(method = %method, step = snapshot.report_step()))]
    pub fn register_survey(
        &self,
        name: &str,
        method: ExtractionMethod,
        snapshot: &dyn SimulationSnapshot,
    ) -> GravResult<Arc<Survey>> {
        // No lock is held while the per-cell arrays are built.
        let densities = self.state.read().densities.clone();
        let ctx = ExtractionContext {
            grid: self.grid,
            init: self.init,
            densities: &densities,
        };
        let survey = extract(method, name, snapshot, &ctx)?;

        let stored = self.state.write().surveys.insert(survey);
        debug!(survey = name, "survey registered");
        Ok(stored)
    }

    pub fn register_survey_rporv(
        &self,
        name: &str,
        snapshot: &dyn SimulationSnapshot,
    ) -> GravResult<Arc<Survey>> {
        self.register_survey(name, ExtractionMethod::Rporv, snapshot)
    }

    pub fn register_survey_pormod(
        &self,
        name: &str,
        snapshot: &dyn SimulationSnapshot,
    ) -> GravResult<Arc<Survey>> {
        self.register_survey(name, ExtractionMethod::Pormod, snapshot)
    }

    pub fn register_survey_fip(
        &self,
        name: &str,
        snapshot: &dyn SimulationSnapshot,
    ) -> GravResult<Arc<Survey>> {
        self.register_survey(name, ExtractionMethod::Fip, snapshot)
    }

    pub fn register_survey_rfip(
        &self,
        name: &str,
        snapshot: &dyn SimulationSnapshot,
    ) -> GravResult<Arc<Survey>> {
        self.register_survey(name, ExtractionMethod::Rfip, snapshot)
    }

    pub fn survey(&self, name: &str, method: ExtractionMethod) -> Option<Arc<Survey>> {
        self.state.read().surveys.get(name, method)
    }

    pub fn surveys(&self) -> Vec<SurveyKey> {
        self.state.read().surveys.keys()
    }

    pub fn remove_survey(&self, name: &str, method: ExtractionMethod) -> Option<Arc<Survey>> {
        self.state.write().surveys.remove(name, method)
    }


    /// Change in vertical gravity at `station` from `base` to `monitor`, in
    /// the configured unit (µGal by default).
    pub fn eval(
        &self,
        base: &str,
        monitor: &str,
        station: DVec3,
        phase_mask: PhaseMask,
    ) -> GravResult<f64> {
        let request = EvalRequest::new(base, monitor, station).phase_mask(phase_mask);
        self.eval_with(&request).map(|report| report.total)
    }

    /// Full evaluation with per-phase breakdown and cell counts.
    #[instrument(skip_all, fields(base = request.base, monitor = request.monitor))]
    pub fn eval_with(&self, request: &EvalRequest<'_>) -> GravResult<GravityReport> {
        let (base, monitor) =
            self.state
                .read()
                .surveys
                .resolve_pair(request.base, request.monitor, request.method)?;

        if let Some(selection) = request.selection {
            if selection.len() != self.cell_count() {
                return Err(GravError::InvalidSelection {
                    expected: self.cell_count(),
                    found: selection.len(),
                });
            }
        }

        let columns = select_columns(&base, &monitor, request.phase_mask)?;

        let start = Instant::now();
        let out = integrate(
            &self.centers,
            &columns,
            request.station,
            request.selection,
            &self.config,
        );
        debug!(
            cells = out.summed,
            elapsed_ns = start.elapsed().as_nanos() as u64,
            "gravity kernel complete"
        );
        if out.excluded > 0 {
            info!(
                excluded = out.excluded,
                station = ?request.station,
                "cells coincident with the station left out of the sum"
            );
        }

        let mut contributions: Vec<(Option<Phase>, f64)> = columns
            .iter()
            .zip(&out.column_sums)
            .map(|(col, sum)| (col.phase, *sum))
            .collect();
        if base.method().is_phase_resolved() {
            // Selected phases neither survey carries add no mass change.
            for phase in request.phase_mask.phases() {
                if !contributions.iter().any(|(p, _)| *p == Some(phase)) {
                    contributions.push((Some(phase), 0.0));
                }
            }
            contributions.sort_by_key(|(p, _)| *p);
        }
        let total: f64 = contributions.iter().map(|(_, v)| v).sum();

        Ok(GravityReport {
            base: SurveyStamp::from(&*base),
            monitor: SurveyStamp::from(&*monitor),
            method: base.method(),
            station: request.station,
            phase_mask: request.phase_mask,
            total,
            contributions,
            cells_summed: out.summed,
            cells_excluded: out.excluded,
        })
    }
}

/// Pair up the columns of two surveys that the mask selects.
fn select_columns<'s>(
    base: &'s Survey,
    monitor: &'s Survey,
    mask: PhaseMask,
) -> GravResult<Vec<Column<'s>>> {
    match (base.values(), monitor.values()) {
        (SurveyValues::Aggregate(b), SurveyValues::Aggregate(m)) => Ok(vec![Column {
            phase: None,
            base: b,
            monitor: m,
        }]),
        (SurveyValues::PerPhase(b), SurveyValues::PerPhase(m)) => {
            let mut columns = Vec::new();
            for phase in mask.phases() {
                match (b.get(&phase), m.get(&phase)) {
                    (Some(b), Some(m)) => columns.push(Column {
                        phase: Some(phase),
                        base: b,
                        monitor: m,
                    }),
                    (None, None) => {}
                    (Some(_), None) => {
                        return Err(GravError::PhaseMismatch {
                            phase,
                            present_in: base.name().to_string(),
                            missing_in: monitor.name().to_string(),
                        });
                    }
                    (None, Some(_)) => {
                        return Err(GravError::PhaseMismatch {
                            phase,
                            present_in: monitor.name().to_string(),
                            missing_in: base.name().to_string(),
                        });
                    }
                }
            }
            Ok(columns)
        }
        // Both surveys come from one method, so their layouts always match.
        _ => Err(GravError::UnknownSurvey {
            name: monitor.name().to_string(),
            method: Some(base.method()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::generator::create_rectangular;
    use crate::sources::{PropertyMap, RestartView};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn view(n: usize, year: i32, step: usize) -> RestartView {
        RestartView::new(n, NaiveDate::from_ymd_opt(year, 1, 1).unwrap(), step)
    }

    #[test]
    fn failed_registration_leaves_registry_unchanged() {
        let grid = create_rectangular([2, 2, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let engine = GravityEngine::new(&grid, &init);

        let mut v = view(4, 2000, 1);
        v.insert_uniform("FIPOIL", 1.0);
        assert!(engine.register_survey_fip("f", &v).is_err());
        assert!(engine.surveys().is_empty());

        engine.set_global_density(Phase::Oil, 700.0).unwrap();
        engine.register_survey_fip("f", &v).unwrap();
        assert_eq!(engine.surveys().len(), 1);
        assert_eq!(engine.density(Phase::Oil, 42).unwrap(), 700.0);
    }

    #[test]
    fn single_cell_mass_change_below_station() {
        let grid = create_rectangular([1, 1, 1], [10.0, 10.0, 10.0]);
        let init = PropertyMap::for_grid(&grid);
        let engine = GravityEngine::new(&grid, &init);

        let mut base = view(1, 2000, 1);
        base.insert("RPORV", vec![0.0]);
        let mut monitor = view(1, 2005, 2);
        monitor.insert("RPORV", vec![1.0e6]);
        engine.register_survey_rporv("base", &base).unwrap();
        engine.register_survey_rporv("monitor", &monitor).unwrap();

        // cell centre at depth 5; station 95 m above it
        let station = DVec3::new(5.0, 5.0, -90.0);
        let dg = engine.eval("base", "monitor", station, PhaseMask::ALL).unwrap();
        let expected = engine.config().gravitational_constant * 1.0e6 / (95.0 * 95.0) * 1e8;
        assert_relative_eq!(dg, expected, max_relative = 1e-12);
    }

    #[test]
    fn phase_mask_picks_columns() {
        let grid = create_rectangular([2, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let engine = GravityEngine::new(&grid, &init);
        engine.set_global_density(Phase::Oil, 1.0).unwrap();
        engine.set_global_density(Phase::Water, 1.0).unwrap();

        let mut base = view(2, 2000, 1);
        base.insert("FIPOIL", vec![1.0, 1.0]);
        base.insert("FIPWAT", vec![1.0, 1.0]);
        let mut monitor = view(2, 2001, 2);
        monitor.insert("FIPOIL", vec![2.0, 2.0]);
        monitor.insert("FIPWAT", vec![4.0, 4.0]);
        engine.register_survey_fip("b", &base).unwrap();
        engine.register_survey_fip("m", &monitor).unwrap();

        let station = DVec3::new(1.0, 0.5, -100.0);
        let oil = engine.eval("b", "m", station, Phase::Oil.into()).unwrap();
        let water = engine.eval("b", "m", station, Phase::Water.into()).unwrap();
        let both = engine.eval("b", "m", station, PhaseMask::ALL).unwrap();

        assert_relative_eq!(water, 3.0 * oil, max_relative = 1e-12);
        assert_relative_eq!(both, oil + water, max_relative = 1e-12);
        let gas = engine
            .eval_with(&EvalRequest::new("b", "m", station).phase_mask(Phase::Gas.into()))
            .unwrap();
        assert_eq!(gas.total, 0.0);
        assert_eq!(gas.contribution(Phase::Gas), Some(0.0));
        assert_eq!(gas.cells_summed, 2);
    }

    #[test]
    fn phase_present_on_one_side_only() {
        let grid = create_rectangular([1, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let engine = GravityEngine::new(&grid, &init);
        engine.set_global_density(Phase::Oil, 1.0).unwrap();
        engine.set_global_density(Phase::Gas, 1.0).unwrap();

        let mut base = view(1, 2000, 1);
        base.insert_uniform("FIPOIL", 1.0);
        let mut monitor = view(1, 2001, 2);
        monitor.insert_uniform("FIPOIL", 1.0);
        monitor.insert_uniform("FIPGAS", 1.0);
        engine.register_survey_fip("b", &base).unwrap();
        engine.register_survey_fip("m", &monitor).unwrap();

        let station = DVec3::new(0.5, 0.5, -10.0);
        assert!(matches!(
            engine.eval("b", "m", station, PhaseMask::ALL),
            Err(GravError::PhaseMismatch { phase: Phase::Gas, .. })
        ));
        assert!(engine.eval("b", "m", station, Phase::Oil.into()).is_ok());
    }

    #[test]
    fn selection_length_is_checked() {
        let grid = create_rectangular([2, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let engine = GravityEngine::new(&grid, &init);
        let mut v = view(2, 2000, 1);
        v.insert_uniform("RPORV", 1.0);
        engine.register_survey_rporv("a", &v).unwrap();

        let sel = [true];
        let request = EvalRequest::new("a", "a", DVec3::ZERO).selection(&sel);
        assert_eq!(
            engine.eval_with(&request),
            Err(GravError::InvalidSelection { expected: 2, found: 1 })
        );
    }
}
