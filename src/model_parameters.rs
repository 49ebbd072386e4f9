use std::path::PathBuf;

use serde_derive::Deserialize;

use crate::error::{Result, SweError};
use crate::WorkingPrecision;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Number of cells in x direction
    pub im: usize,

    // Number of cells in y direction
    pub jm: usize,

    /// Number of time steps to integrate
    pub num_steps: u32,

    /// Size of time step (in seconds)
    pub dt: WorkingPrecision,

    // Grid size in x direction (in meters)
    pub dx: WorkingPrecision,

    // Grid size in y direction (in meters)
    pub dy: WorkingPrecision,

    /// Gravitational acceleration
    pub g: WorkingPrecision,

    /// Cell index of the initial bump centre in x
    pub ipos: usize,

    /// Cell index of the initial bump centre in y
    pub jpos: usize,

    /// Decay rate of the initial Gaussian bump
    pub decay: WorkingPrecision,

    /// Mean water depth (in meters)
    pub hmean: WorkingPrecision,

    /// Number of workers, normally supplied through SWE2D_NUM_WORKERS
    pub num_workers: usize,

    /// Wrap the tile grid around in both directions
    pub periodic: bool,

    /// Interval to record output, 0 disables it
    pub output_interval: u32,

    pub output_dir: PathBuf,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            im: 101,
            jm: 101,
            num_steps: 100,
            dt: 0.02,
            dx: 1.0,
            dy: 1.0,
            g: 9.8,
            ipos: 51,
            jpos: 51,
            decay: 0.02,
            hmean: 10.0,
            num_workers: 1,
            periodic: false,
            output_interval: 0,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ModelParameters {
    pub fn new(config_fname: &str) -> Result<Self> {
        let mut settings = config::Config::default();

        settings
            .merge(config::File::with_name(config_fname).required(false))?
            .merge(config::Environment::with_prefix("SWE2D"))?;

        let model_params: ModelParameters = settings.try_into()?;
        model_params.validate()?;

        Ok(model_params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.im == 0 || self.jm == 0 {
            return Err(SweError::InvalidParameter(format!(
                "grid must have at least one cell, got {}x{}",
                self.im, self.jm
            )));
        }

        for (name, value) in &[("dt", self.dt), ("dx", self.dx), ("dy", self.dy)] {
            if value.is_nan() || *value <= 0.0 {
                return Err(SweError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.num_workers == 0 {
            return Err(SweError::InvalidParameter(
                "num_workers must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }
}
