use crate::physics::PhaseMask;
use crate::survey::ExtractionMethod;
use glam::DVec3;

/// Parameters of one gravity-change evaluation.
#[derive(Clone, Debug)]
pub struct EvalRequest<'r> {
    pub base: &'r str,
    pub monitor: &'r str,
    pub station: DVec3,
    pub phase_mask: PhaseMask,
    /// Pin the extraction method when both names exist under several.
    pub method: Option<ExtractionMethod>,
    /// One flag per active cell; unflagged cells are left out of the sum.
    pub selection: Option<&'r [bool]>,
}

impl<'r> EvalRequest<'r> {
    pub fn new(base: &'r str, monitor: &'r str, station: DVec3) -> Self {
        Self {
            base,
            monitor,
            station,
            phase_mask: PhaseMask::default(),
            method: None,
            selection: None,
        }
    }

    pub fn phase_mask(mut self, mask: PhaseMask) -> Self {
        self.phase_mask = mask;
        self
    }

    pub fn method(mut self, method: ExtractionMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn selection(mut self, cells: &'r [bool]) -> Self {
        self.selection = Some(cells);
        self
    }
}
