use crate::app_timers::AppTimers;
use crate::boundary_conditions::{boundary_conditions_kernel, reflective_boundary};
use crate::communicator::Communicator;
use crate::error::Result;
use crate::global_grid::GlobalGrid;
use crate::halo_exchange::exchange_halos;
use crate::kernels::{continuity_kernel, momentum_kernel};
use crate::tile_state::{Field, TileState};

/// Brings every halo line of `kind` up to date: neighbour strips first, then
/// the wall on global edges.
pub fn refresh_halos(comm: &Communicator, tile_state: &mut TileState, kind: Field) -> Result<()> {
    let tile = tile_state.tile.clone();
    let field = tile_state.field_mut(kind);

    exchange_halos(comm, &tile, kind, field)?;
    reflective_boundary(&tile, kind, field);

    Ok(())
}

/// One forward Euler step: velocities from the old height, then height from
/// the new velocities.
pub fn step_simulation(
    grid: &GlobalGrid,
    comm: &Communicator,
    tile_state: &mut TileState,
    app_timers: &mut AppTimers,
) -> Result<()> {
    app_timers.step.start();

    app_timers.halo_exchange.start();
    let refreshed = Field::ALL
        .iter()
        .try_for_each(|&kind| refresh_halos(comm, tile_state, kind));
    app_timers.halo_exchange.stop();
    refreshed?;

    app_timers
        .momentum
        .time(|| momentum_kernel(grid, tile_state));

    app_timers.halo_exchange.start();
    let refreshed = [Field::U, Field::V]
        .iter()
        .try_for_each(|&kind| refresh_halos(comm, tile_state, kind));
    app_timers.halo_exchange.stop();
    refreshed?;

    app_timers
        .continuity
        .time(|| continuity_kernel(grid, tile_state));

    app_timers
        .boundary_conditions
        .time(|| boundary_conditions_kernel(tile_state));

    app_timers.step.stop();

    Ok(())
}
