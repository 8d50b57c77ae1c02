pub mod generator;
pub mod mesh;

use glam::DVec3;

/// Read-only cell geometry consumed by the gravity engine.
///
/// Cells are addressed by their dense active index `0..cell_count()`.
/// Implementations must not change shape while an engine borrows them.
pub trait Grid: Send + Sync {
    /// Number of active cells, `N`.
    fn cell_count(&self) -> usize;

    /// Cell centre, with z as depth (positive downward).
    fn cell_center(&self, active: usize) -> DVec3;

    /// Rock/PVT region of the cell. Used when the property source carries no
    /// `PVTNUM` array.
    fn region_id(&self, active: usize) -> u32;

    fn cell_volume(&self, active: usize) -> f64;

    /// Number of cells including inactive ones.
    fn global_size(&self) -> usize;

    fn active_index(&self, global: usize) -> Option<usize>;
}
