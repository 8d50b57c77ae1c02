//! Point-mass summation over active cells.
//!
//! Each cell contributes `G · Δm · Δz / r³` at the station. The cell range is
//! cut into fixed chunks that rayon sums independently; the partial sums are
//! then folded in chunk order, so for a fixed configuration the result does
//! not depend on thread scheduling. Swapping base and monitor negates every
//! term exactly, which keeps `eval(a, b) == -eval(b, a)` bit for bit.

use super::config::GravityConfig;
use crate::physics::Phase;
use crate::physics::point_mass::vertical_attraction;
use glam::DVec3;
use nalgebra::DVector;
use rayon::prelude::*;
use std::ops::Range;

/// One pair of base/monitor columns entering the sum.
pub(crate) struct Column<'s> {
    pub phase: Option<Phase>,
    pub base: &'s DVector<f64>,
    pub monitor: &'s DVector<f64>,
}

#[derive(Clone, Debug)]
pub(crate) struct KernelOutput {
    /// Contribution per column, already scaled to the output unit.
    pub column_sums: Vec<f64>,
    pub summed: usize,
    pub excluded: usize,
}

#[derive(Clone)]
struct Partial {
    sums: Vec<f64>,
    summed: usize,
    excluded: usize,
}

impl Partial {
    fn new(columns: usize) -> Self {
        Self {
            sums: vec![0.0; columns],
            summed: 0,
            excluded: 0,
        }
    }

    fn merge(mut self, other: Partial) -> Self {
        for (acc, s) in self.sums.iter_mut().zip(other.sums) {
            *acc += s;
        }
        self.summed += other.summed;
        self.excluded += other.excluded;
        self
    }
}

pub(crate) fn integrate(
    centers: &[DVec3],
    columns: &[Column<'_>],
    station: DVec3,
    selection: Option<&[bool]>,
    config: &GravityConfig,
) -> KernelOutput {
    let n = centers.len();
    let sum_range = |range: Range<usize>| {
        let mut partial = Partial::new(columns.len());
        for c in range {
            if selection.is_some_and(|sel| !sel[c]) {
                continue;
            }
            // Geometric factor Δz / r³; the mass and G are applied separately.
            let Some(w) = vertical_attraction(1.0, 1.0, centers[c], station, config.min_distance)
            else {
                partial.excluded += 1;
                continue;
            };
            partial.summed += 1;
            for (acc, col) in partial.sums.iter_mut().zip(columns) {
                *acc += (col.monitor[c] - col.base[c]) * w;
            }
        }
        partial
    };

    let total = if n <= config.serial_threshold {
        sum_range(0..n)
    } else {
        let chunk = config.chunk_size.max(1);
        let ranges: Vec<Range<usize>> = (0..n)
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(n))
            .collect();
        let partials: Vec<Partial> = ranges.into_par_iter().map(sum_range).collect();
        partials
            .into_iter()
            .fold(Partial::new(columns.len()), Partial::merge)
    };

    let factor = config.gravitational_constant * config.unit_scale;
    KernelOutput {
        column_sums: total.sums.into_iter().map(|s| s * factor).collect(),
        summed: total.summed,
        excluded: total.excluded,
    }
}
