use super::Grid;
use glam::DVec3;

/// A corner-aligned reservoir grid restricted to its active cells.
pub struct Mesh {
    pub dims: [usize; 3],
    pub cells: Vec<Cell>,
    /// `global_to_active[g]` is `None` for inactive cells.
    pub global_to_active: Vec<Option<usize>>,
}

/// A single active cell.
pub struct Cell {
    /// Active index.
    pub id: usize,
    pub global_index: usize,
    pub volume: f64,
    pub centroid: [f64; 3],
    pub region: u32,
}

impl Mesh {
    /// Overwrite every cell's region id.
    pub fn assign_regions<F>(&mut self, region_of: F)
    where
        F: Fn(&Cell) -> u32,
    {
        for cell in &mut self.cells {
            cell.region = region_of(cell);
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }

    /// Active index of the cell containing (i, j, k), if that cell is active.
    pub fn active_at(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let [nx, ny, nz] = self.dims;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.global_to_active[i + nx * (j + ny * k)]
    }
}

impl Grid for Mesh {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_center(&self, active: usize) -> DVec3 {
        DVec3::from_array(self.cells[active].centroid)
    }

    fn region_id(&self, active: usize) -> u32 {
        self.cells[active].region
    }

    fn cell_volume(&self, active: usize) -> f64 {
        self.cells[active].volume
    }

    fn global_size(&self) -> usize {
        self.global_to_active.len()
    }

    fn active_index(&self, global: usize) -> Option<usize> {
        self.global_to_active.get(global).copied().flatten()
    }
}
