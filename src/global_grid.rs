use crate::{ModelParameters, WorkingPrecision};

/// Immutable description of the whole computational grid, shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalGrid {
    pub im: usize,
    pub jm: usize,

    pub dx: WorkingPrecision,
    pub dy: WorkingPrecision,

    pub g: WorkingPrecision,
    pub dt: WorkingPrecision,
}

impl GlobalGrid {
    pub fn new(model_params: &ModelParameters) -> Self {
        GlobalGrid {
            im: model_params.im,
            jm: model_params.jm,
            dx: model_params.dx,
            dy: model_params.dy,
            g: model_params.g,
            dt: model_params.dt,
        }
    }
}
