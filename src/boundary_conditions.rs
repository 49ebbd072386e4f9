use crate::halo_array_2d::HaloArray2D;
use crate::tile_state::{Field, TileState};
use crate::tile_topology::{Side, TileDescriptor};

/// Reflective wall on the sides of `tile` that lie on the global domain edge.
///
/// The velocity component normal to the wall is mirrored with its sign
/// flipped, so it averages to zero on the wall face and the centred flux
/// through the wall cancels. Height and the tangential component mirror the
/// adjacent interior cell unchanged. Halo lines facing a neighbour tile and
/// all interior cells are left untouched.
pub fn reflective_boundary(tile: &TileDescriptor, kind: Field, field: &mut HaloArray2D) {
    let ni = field.ni();
    let nj = field.nj();

    for &side in &Side::ALL {
        if !tile.is_global_edge(side) {
            continue;
        }

        let sign = match kind {
            Field::U if side.is_x_face() => -1.0,
            Field::V if !side.is_x_face() => -1.0,
            _ => 1.0,
        };

        match side {
            Side::Left | Side::Right => {
                let (halo, inner) = if side == Side::Left { (0, 1) } else { (ni + 1, ni) };
                for j in 1..=nj {
                    field.set(halo, j, sign * field.get(inner, j));
                }
            }
            Side::Up | Side::Down => {
                let (halo, inner) = if side == Side::Up { (0, 1) } else { (nj + 1, nj) };
                for i in 1..=ni {
                    field.set(i, halo, sign * field.get(i, inner));
                }
            }
        }
    }
}

pub fn boundary_conditions_kernel(tile_state: &mut TileState) {
    for &kind in &Field::ALL {
        let tile = &tile_state.tile;
        let field = match kind {
            Field::H => &mut tile_state.h,
            Field::U => &mut tile_state.u,
            Field::V => &mut tile_state.v,
        };
        reflective_boundary(tile, kind, field);
    }
}
