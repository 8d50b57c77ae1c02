use chrono::NaiveDate;
use glam::DVec3;
use grav4d_rs::discretization::Grid;
use grav4d_rs::discretization::generator::create_rectangular_with_actnum;
use grav4d_rs::discretization::mesh::Mesh;
use grav4d_rs::sources::{PropertyMap, PropertySource, RestartView, keywords};
use grav4d_rs::{EvalRequest, ExtractionMethod, GravityEngine, Phase, PhaseMask};
use tracing_subscriber::EnvFilter;

const DIMS: [usize; 3] = [20, 20, 5];
const CELL: [f64; 3] = [50.0, 50.0, 10.0];
const TOP_DEPTH: f64 = 1500.0;
const POROSITY: f64 = 0.25;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let grid = build_grid();
    let init = initial_properties(&grid);

    let engine = GravityEngine::new(&grid, &init);
    engine
        .set_global_density(Phase::Oil, 850.0)
        .expect("valid oil density");
    engine
        .set_region_density(Phase::Oil, 2, 870.0)
        .expect("valid oil density");
    engine
        .set_global_density(Phase::Water, 1020.0)
        .expect("valid water density");

    let base = restart_step(&grid, &init, 2000, 10, 0.2, 1.0);
    let monitor = restart_step(&grid, &init, 2010, 20, 0.7, 0.98);

    for method in ExtractionMethod::ALL {
        for (name, view) in [("base", &base), ("monitor", &monitor)] {
            engine
                .register_survey(name, method, view)
                .expect("survey registration");
        }
    }

    println!("{} active cells, {} surveys\n", grid.cell_count(), engine.surveys().len());
    print_profile(&engine);

    let centre = DVec3::new(500.0, 500.0, 0.0);
    for method in [ExtractionMethod::Fip, ExtractionMethod::Rporv] {
        let request = EvalRequest::new("base", "monitor", centre).method(method);
        match engine.eval_with(&request) {
            Ok(report) => report.print_to_console(),
            Err(e) => eprintln!("Evaluation failed: {}", e),
        }
        println!();
    }
}

/// A box-shaped reservoir with one inactive corner column.
fn build_grid() -> Mesh {
    let [nx, ny, nz] = DIMS;
    let actnum: Vec<bool> = (0..nx * ny * nz)
        .map(|g| {
            let i = g % nx;
            let j = (g / nx) % ny;
            !(i == 0 && j == 0)
        })
        .collect();
    create_rectangular_with_actnum(DIMS, CELL, DVec3::new(0.0, 0.0, TOP_DEPTH), &actnum)
        .expect("actnum matches grid dimensions")
}

fn initial_properties(grid: &Mesh) -> PropertyMap {
    let mut init = PropertyMap::for_grid(grid);
    let porv: Vec<f64> = grid.cells.iter().map(|c| c.volume * POROSITY).collect();
    let pvtnum: Vec<f64> = grid
        .cells
        .iter()
        .map(|c| if c.centroid[2] < TOP_DEPTH + 30.0 { 1.0 } else { 2.0 })
        .collect();
    init.insert_uniform("PORO", POROSITY);
    init.insert(keywords::PORV, porv);
    init.insert(keywords::PVTNUM, pvtnum);
    init
}

/// Water sweeps the cells within 300 m of the reservoir centre, which also
/// compact by `compaction`.
fn restart_step(
    grid: &Mesh,
    init: &PropertyMap,
    year: i32,
    step: usize,
    swept_swat: f64,
    compaction: f64,
) -> RestartView {
    let date = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
    let porv = init.get(keywords::PORV).expect("PORV present");
    let centre = DVec3::new(500.0, 500.0, 0.0);

    let mut swat = Vec::with_capacity(grid.cell_count());
    let mut pormod = Vec::with_capacity(grid.cell_count());
    for c in 0..grid.cell_count() {
        let mut x = grid.cell_center(c);
        x.z = 0.0;
        let swept = x.distance(centre) < 300.0;
        swat.push(if swept { swept_swat } else { 0.2 });
        pormod.push(if swept { compaction } else { 1.0 });
    }

    let rporv: Vec<f64> = porv.iter().zip(&pormod).map(|(v, m)| v * m).collect();
    let fipwat: Vec<f64> = rporv.iter().zip(&swat).map(|(v, s)| v * s).collect();
    let fipoil: Vec<f64> = rporv.iter().zip(&swat).map(|(v, s)| v * (1.0 - s)).collect();

    let mut view = RestartView::new(grid.cell_count(), date, step);
    view.insert("SWAT", swat);
    view.insert("PORV_MOD", pormod);
    view.insert("RPORV", rporv);
    view.insert("FIPOIL", fipoil.clone());
    view.insert("FIPWAT", fipwat.clone());
    view.insert("RFIPOIL", fipoil);
    view.insert("RFIPWAT", fipwat);
    view
}

fn print_profile(engine: &GravityEngine<'_>) {
    println!("{:>8} | {:>14} | {:>14} | {:>14}", "x [m]", "oil [µGal]", "water [µGal]", "FIP [µGal]");
    for k in 0..=10 {
        let station = DVec3::new(100.0 * k as f64, 500.0, 0.0);
        let request = EvalRequest::new("base", "monitor", station).method(ExtractionMethod::Fip);
        let oil = engine.eval_with(&request.clone().phase_mask(Phase::Oil.into()));
        let water = engine.eval_with(&request.clone().phase_mask(Phase::Water.into()));
        let both = engine.eval_with(&request.phase_mask(PhaseMask::ALL));
        match (oil, water, both) {
            (Ok(o), Ok(w), Ok(b)) => println!(
                "{:>8.1} | {:>14.4} | {:>14.4} | {:>14.4}",
                station.x, o.total, w.total, b.total
            ),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                eprintln!("Profile evaluation failed: {}", e);
                return;
            }
        }
    }
    println!();
}
