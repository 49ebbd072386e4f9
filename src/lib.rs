#![warn(clippy::all)]

mod app_timers;
mod boundary_conditions;
mod communicator;
mod diagnostics;
mod error;
mod global_grid;
mod halo_array_2d;
mod halo_exchange;
mod index_partition;
mod integrator;
mod kernels;
mod model_parameters;
mod output;
mod spmd;
mod stencil;
mod tile_state;
mod tile_topology;
mod timer;

use tracing::{debug, info};

use app_timers::AppTimers;
use boundary_conditions::boundary_conditions_kernel;
use communicator::Communicator;
use diagnostics::field_checksum;
use integrator::step_simulation;

pub use diagnostics::StepReport;
pub use error::{Result, SweError};
pub use global_grid::GlobalGrid;
pub use halo_array_2d::HaloArray2D;
pub use index_partition::{tile_range, IndexRange};
pub use model_parameters::ModelParameters;
pub use output::{CsvFieldSink, FieldSink, FieldSnapshot, MemorySink, NullSink};
pub use tile_state::{Field, TileState};
pub use tile_topology::{Side, TileDescriptor, TileTopology};

type WorkingPrecision = f64;

/// What a finished run hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub topology: TileTopology,
    pub reports: Vec<StepReport>,
    pub u_checksum: WorkingPrecision,
    pub v_checksum: WorkingPrecision,
}

/// Runs the whole model on `model_params.num_workers` workers.
pub fn run_simulation(
    model_params: &ModelParameters,
    sink: &dyn FieldSink,
) -> Result<SimulationSummary> {
    model_params.validate()?;

    let grid = GlobalGrid::new(model_params);
    let topology = TileTopology::new(model_params.num_workers, model_params.periodic)?;

    info!(
        "Decomposing {}x{} grid over {} workers as {} x {} tiles.",
        grid.im, grid.jm, topology.num_workers, topology.rows, topology.cols
    );

    let mut outcomes = spmd::launch(&topology, &grid, |ctx| {
        run_worker(model_params, &grid, ctx.comm, ctx.tile, sink)
    })?;

    // Every rank holds the same reduced values; keep the primary's.
    let primary = outcomes.swap_remove(0);

    Ok(SimulationSummary {
        topology,
        reports: primary.reports,
        u_checksum: primary.u_checksum,
        v_checksum: primary.v_checksum,
    })
}

struct WorkerOutcome {
    reports: Vec<StepReport>,
    u_checksum: WorkingPrecision,
    v_checksum: WorkingPrecision,
}

fn run_worker(
    model_params: &ModelParameters,
    grid: &GlobalGrid,
    comm: Communicator,
    tile: TileDescriptor,
    sink: &dyn FieldSink,
) -> Result<WorkerOutcome> {
    let num_steps = model_params.num_steps;

    let mut tile_state = TileState::new(model_params, tile);
    boundary_conditions_kernel(&mut tile_state);

    debug!(
        rank = comm.rank(),
        workers = comm.num_workers(),
        "Initialised {}x{} tile state.",
        tile_state.h.ni(),
        tile_state.h.nj()
    );

    comm.barrier()?;
    output_values(model_params, &tile_state, sink, 0)?;

    let mut app_timers = AppTimers::new(num_steps as usize);
    let mut reports = Vec::with_capacity(num_steps as usize);

    for step_idx in 1..=num_steps {
        step_simulation(grid, &comm, &mut tile_state, &mut app_timers)?;

        app_timers.diagnostics.start();
        let report = diagnostics::step_report(
            &comm,
            step_idx,
            &tile_state.h,
            &tile_state.u,
            &tile_state.v,
        );
        app_timers.diagnostics.stop();
        let report = report?;

        if comm.is_primary() {
            info!(
                "step {:>6}, mean h = {:.8E}, mean ke = {:.8E}",
                report.step, report.mean_h, report.mean_ke
            );
        }
        reports.push(report);

        output_values(model_params, &tile_state, sink, step_idx)?;
    }

    let u_checksum = field_checksum(&comm, &tile_state.u)?;
    let v_checksum = field_checksum(&comm, &tile_state.v)?;

    if comm.is_primary() {
        info!("u checksum = {:.8E}", u_checksum);
        info!("v checksum = {:.8E}", v_checksum);
        info!("Kernel timing report (rank 0):{}", app_timers.generate_report());
        sink.write_timings(&app_timers.generate_timings_csv())?;
    }

    Ok(WorkerOutcome {
        reports,
        u_checksum,
        v_checksum,
    })
}

fn output_values(
    model_params: &ModelParameters,
    tile_state: &TileState,
    sink: &dyn FieldSink,
    step_idx: u32,
) -> Result<()> {
    let interval = model_params.output_interval;
    if interval == 0 || step_idx % interval != 0 {
        return Ok(());
    }

    for &kind in &Field::ALL {
        sink.write_field(FieldSnapshot {
            field: kind,
            step: step_idx,
            rank: tile_state.tile.rank,
            i_range: tile_state.tile.i_range,
            j_range: tile_state.tile.j_range,
            values: tile_state.field(kind).interior(),
        })?;
    }

    Ok(())
}
