use crate::communicator::{Communicator, HaloStrip};
use crate::error::Result;
use crate::halo_array_2d::HaloArray2D;
use crate::tile_state::Field;
use crate::tile_topology::{Side, TileDescriptor};

/// Fills the halo of `field` from the neighbouring tiles.
///
/// Every boundary strip is sent before anything is received, and a halo line
/// is only written once the neighbour's strip for this exchange has arrived.
/// Sides on the global edge are left alone for the boundary condition.
pub fn exchange_halos(
    comm: &Communicator,
    tile: &TileDescriptor,
    kind: Field,
    field: &mut HaloArray2D,
) -> Result<()> {
    let ni = field.ni();
    let nj = field.nj();

    for &side in &Side::ALL {
        if tile.is_global_edge(side) {
            continue;
        }

        let values = match side {
            Side::Up => field.row(1),
            Side::Down => field.row(nj),
            Side::Left => field.column(1),
            Side::Right => field.column(ni),
        };
        comm.send_halo(side, HaloStrip { field: kind, values })?;
    }

    for &side in &Side::ALL {
        if tile.is_global_edge(side) {
            continue;
        }

        let strip = comm.recv_halo(side, kind)?;
        match side {
            Side::Up => field.set_row(0, &strip),
            Side::Down => field.set_row(nj + 1, &strip),
            Side::Left => field.set_column(0, &strip),
            Side::Right => field.set_column(ni + 1, &strip),
        }
    }

    Ok(())
}
