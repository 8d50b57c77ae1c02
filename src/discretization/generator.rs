use super::mesh::{Cell, Mesh};
use crate::error::{GravError, GravResult};
use glam::DVec3;

/// Create a fully active rectangular grid with `dims` cells of `cell_size`,
/// whose top corner sits at the origin. Global ordering is i fastest, then
/// j, then k; k increases with depth.
pub fn create_rectangular(dims: [usize; 3], cell_size: [f64; 3]) -> Mesh {
    build_rectangular(dims, cell_size, DVec3::ZERO, |_| true)
}

/// Same as [`create_rectangular`], shifted to `origin` (top corner, depth
/// positive down) and restricted to the cells flagged in `actnum`.
pub fn create_rectangular_with_actnum(
    dims: [usize; 3],
    cell_size: [f64; 3],
    origin: DVec3,
    actnum: &[bool],
) -> GravResult<Mesh> {
    let global_size = dims.iter().product::<usize>();
    if actnum.len() != global_size {
        return Err(GravError::DimensionMismatch {
            name: "ACTNUM".to_string(),
            expected: global_size,
            found: actnum.len(),
        });
    }
    Ok(build_rectangular(dims, cell_size, origin, |g| actnum[g]))
}

fn build_rectangular<F>(dims: [usize; 3], cell_size: [f64; 3], origin: DVec3, is_active: F) -> Mesh
where
    F: Fn(usize) -> bool,
{
    let [nx, ny, nz] = dims;
    let [dx, dy, dz] = cell_size;
    let volume = dx * dy * dz;

    let mut cells = Vec::new();
    let mut global_to_active = Vec::with_capacity(nx * ny * nz);

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let global_index = global_to_active.len();
                if !is_active(global_index) {
                    global_to_active.push(None);
                    continue;
                }

                let id = cells.len();
                let centroid = origin
                    + DVec3::new(
                        (i as f64 + 0.5) * dx,
                        (j as f64 + 0.5) * dy,
                        (k as f64 + 0.5) * dz,
                    );
                cells.push(Cell {
                    id,
                    global_index,
                    volume,
                    centroid: centroid.to_array(),
                    region: 0,
                });
                global_to_active.push(Some(id));
            }
        }
    }

    Mesh {
        dims,
        cells,
        global_to_active,
    }
}
