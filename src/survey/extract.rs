use super::{ExtractionMethod, Survey, SurveyValues};
use crate::discretization::Grid;
use crate::error::{GravError, GravResult};
use crate::physics::Phase;
use crate::physics::density::StdDensityTable;
use crate::sources::{PropertyError, PropertySource, SimulationSnapshot, expect_len, keywords};
use nalgebra::DVector;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Read-only inputs shared by the four extraction policies.
pub struct ExtractionContext<'a> {
    pub grid: &'a dyn Grid,
    pub init: &'a dyn PropertySource,
    pub densities: &'a StdDensityTable,
}

/// Build a survey from one restart step with the given policy.
///
/// Nothing is stored here; a failure leaves no trace.
pub fn extract(
    method: ExtractionMethod,
    name: &str,
    snapshot: &dyn SimulationSnapshot,
    ctx: &ExtractionContext<'_>,
) -> GravResult<Survey> {
    let n = ctx.grid.cell_count();
    let values = match method {
        ExtractionMethod::Rporv => SurveyValues::Aggregate(read(snapshot, keywords::RPORV, n)?),
        ExtractionMethod::Pormod => {
            SurveyValues::Aggregate(read(snapshot, keywords::PORV_MOD, n)?)
        }
        ExtractionMethod::Fip => fluid_in_place(snapshot, ctx, keywords::fip)?,
        ExtractionMethod::Rfip => fluid_in_place(snapshot, ctx, keywords::rfip)?,
    };

    debug!(
        survey = name,
        method = %method,
        cells = n,
        step = snapshot.report_step(),
        "survey extracted"
    );

    Ok(Survey::new(
        name,
        method,
        snapshot.sim_date(),
        snapshot.report_step(),
        n,
        values,
    ))
}

fn read(snapshot: &dyn SimulationSnapshot, keyword: &str, n: usize) -> GravResult<DVector<f64>> {
    let values = snapshot.get(keyword)?;
    Ok(expect_len(keyword, values, n)?)
}

/// Convert per-phase fluid volumes to mass with the standard density of
/// each cell's region. Every (phase, region) pair the data touches is
/// resolved before any mass is computed.
fn fluid_in_place(
    snapshot: &dyn SimulationSnapshot,
    ctx: &ExtractionContext<'_>,
    keyword: fn(Phase) -> String,
) -> GravResult<SurveyValues> {
    let n = ctx.grid.cell_count();

    let mut volumes = Vec::new();
    for phase in Phase::ALL {
        let kw = keyword(phase);
        match snapshot.get(&kw) {
            Ok(values) => volumes.push((phase, expect_len(&kw, values, n)?)),
            Err(PropertyError::UnknownProperty(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    if volumes.is_empty() {
        return Err(GravError::UnknownProperty(keyword(Phase::Oil)));
    }

    let regions = cell_regions(ctx)?;
    let distinct: BTreeSet<u32> = regions.iter().copied().collect();

    let mut densities: BTreeMap<(Phase, u32), f64> = BTreeMap::new();
    for (phase, _) in &volumes {
        for &region in &distinct {
            densities.insert((*phase, region), ctx.densities.lookup(*phase, region)?);
        }
    }

    let columns = volumes
        .into_iter()
        .map(|(phase, volume)| {
            let mass = DVector::from_fn(n, |c, _| volume[c] * densities[&(phase, regions[c])]);
            (phase, mass)
        })
        .collect();

    Ok(SurveyValues::PerPhase(columns))
}

/// Region id per active cell: `PVTNUM` from the initial-state data when it is
/// there, the grid's own region ids otherwise.
fn cell_regions(ctx: &ExtractionContext<'_>) -> GravResult<Vec<u32>> {
    let n = ctx.grid.cell_count();
    if !ctx.init.contains(keywords::PVTNUM) {
        return Ok((0..n).map(|c| ctx.grid.region_id(c)).collect());
    }

    let pvtnum = expect_len(keywords::PVTNUM, ctx.init.get(keywords::PVTNUM)?, n)?;
    pvtnum
        .iter()
        .enumerate()
        .map(|(cell, &value)| {
            if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
                Ok(value as u32)
            } else {
                Err(GravError::InvalidRegionId { cell, value })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::generator::create_rectangular;
    use crate::sources::{PropertyMap, RestartView};
    use chrono::NaiveDate;

    fn restart(n: usize) -> RestartView {
        RestartView::new(n, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 10)
    }

    #[test]
    fn rporv_and_pormod_copy_their_keyword() {
        let grid = create_rectangular([2, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let densities = StdDensityTable::new();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };
        let mut view = restart(2);
        view.insert("RPORV", vec![1.0, 2.0]);
        view.insert("PORV_MOD", vec![0.9, 1.1]);

        let rporv = extract(ExtractionMethod::Rporv, "a", &view, &ctx).unwrap();
        let pormod = extract(ExtractionMethod::Pormod, "a", &view, &ctx).unwrap();

        assert_eq!(rporv.values(), &SurveyValues::Aggregate(DVector::from_vec(vec![1.0, 2.0])));
        assert_eq!(pormod.total_values().as_slice(), &[0.9, 1.1]);
        assert_eq!(rporv.report_step(), 10);
        assert!(rporv.phases().is_empty());
    }

    #[test]
    fn fip_uses_pvtnum_regions_and_overrides() {
        let grid = create_rectangular([3, 1, 1], [1.0; 3]);
        let mut init = PropertyMap::for_grid(&grid);
        init.insert("PVTNUM", vec![1.0, 2.0, 1.0]);
        let mut densities = StdDensityTable::new();
        densities.set_global_density(Phase::Oil, 800.0).unwrap();
        densities.set_region_density(Phase::Oil, 2, 900.0).unwrap();
        densities.set_global_density(Phase::Water, 1000.0).unwrap();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };

        let mut view = restart(3);
        view.insert("FIPOIL", vec![1.0, 1.0, 2.0]);
        view.insert("FIPWAT", vec![0.5, 0.0, 0.0]);

        let survey = extract(ExtractionMethod::Fip, "fip", &view, &ctx).unwrap();
        assert_eq!(survey.phases(), vec![Phase::Oil, Phase::Water]);
        assert_eq!(
            survey.phase_values(Phase::Oil).unwrap().as_slice(),
            &[800.0, 900.0, 1600.0]
        );
        assert_eq!(survey.phase_values(Phase::Water).unwrap().as_slice(), &[500.0, 0.0, 0.0]);
        assert_eq!(survey.total_values().as_slice(), &[1300.0, 900.0, 1600.0]);
    }

    #[test]
    fn missing_density_for_any_region_fails() {
        let mut grid = create_rectangular([2, 1, 1], [1.0; 3]);
        grid.assign_regions(|cell| cell.id as u32);
        let init = PropertyMap::for_grid(&grid);
        let mut densities = StdDensityTable::new();
        densities.set_region_density(Phase::Oil, 0, 800.0).unwrap();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };
        let mut view = restart(2);
        view.insert("RFIPOIL", vec![0.0, 0.0]);

        assert_eq!(
            extract(ExtractionMethod::Rfip, "r", &view, &ctx),
            Err(GravError::MissingDensityModel {
                phase: Phase::Oil,
                region: 1
            })
        );
    }

    #[test]
    fn fip_without_phase_keywords_is_unknown_property() {
        let grid = create_rectangular([1, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let densities = StdDensityTable::new();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };
        let mut view = restart(1);
        view.insert_uniform("RPORV", 1.0);

        assert_eq!(
            extract(ExtractionMethod::Fip, "f", &view, &ctx),
            Err(GravError::UnknownProperty("FIPOIL".to_string()))
        );
    }

    #[test]
    fn bad_pvtnum_is_rejected() {
        let grid = create_rectangular([2, 1, 1], [1.0; 3]);
        let mut init = PropertyMap::for_grid(&grid);
        init.insert("PVTNUM", vec![1.0, 1.5]);
        let mut densities = StdDensityTable::new();
        densities.set_global_density(Phase::Gas, 1.0).unwrap();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };
        let mut view = restart(2);
        view.insert_uniform("FIPGAS", 1.0);

        assert_eq!(
            extract(ExtractionMethod::Fip, "f", &view, &ctx),
            Err(GravError::InvalidRegionId { cell: 1, value: 1.5 })
        );
    }

    #[test]
    fn short_phase_array_is_a_dimension_mismatch() {
        let grid = create_rectangular([3, 1, 1], [1.0; 3]);
        let init = PropertyMap::for_grid(&grid);
        let mut densities = StdDensityTable::new();
        densities.set_global_density(Phase::Oil, 1.0).unwrap();
        let ctx = ExtractionContext {
            grid: &grid,
            init: &init,
            densities: &densities,
        };
        let mut view = restart(3);
        view.insert("FIPOIL", vec![1.0, 1.0]);

        assert!(matches!(
            extract(ExtractionMethod::Fip, "f", &view, &ctx),
            Err(GravError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }
}
