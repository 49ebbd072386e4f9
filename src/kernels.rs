use crate::global_grid::GlobalGrid;
use crate::halo_array_2d::HaloArray2D;
use crate::stencil::{diffx, diffy};
use crate::tile_state::TileState;

/// Advances `u` and then `v` from the current height field.
///
/// Requires current halos on `h`, `u` and `v`. Each field is rebuilt from a
/// snapshot, so no cell sees a neighbour that was already updated this step.
/// The `v` update runs after `u` and picks up the new `u` values.
pub fn momentum_kernel(grid: &GlobalGrid, tile_state: &mut TileState) {
    let GlobalGrid { dx, dy, g, dt, .. } = *grid;

    let dhdx = diffx(&tile_state.h);
    let dhdy = diffy(&tile_state.h);

    let dudx = diffx(&tile_state.u);
    let dudy = diffy(&tile_state.u);
    let dvdx = diffx(&tile_state.v);
    let dvdy = diffy(&tile_state.v);

    let u_old = tile_state.u.clone();
    let v_old = tile_state.v.clone();

    let ni = u_old.ni();
    let nj = u_old.nj();

    for j in 1..=nj {
        for i in 1..=ni {
            let u = u_old.get(i, j);
            let v = v_old.get(i, j);

            let tendency = u * dudx.get(i, j) / dx + v * dudy.get(i, j) / dy + g * dhdx.get(i, j) / dx;
            tile_state.u.set(i, j, u - dt * tendency);
        }
    }

    for j in 1..=nj {
        for i in 1..=ni {
            let u = tile_state.u.get(i, j);
            let v = v_old.get(i, j);

            let tendency = u * dvdx.get(i, j) / dx + v * dvdy.get(i, j) / dy + g * dhdy.get(i, j) / dy;
            tile_state.v.set(i, j, v - dt * tendency);
        }
    }
}

/// Advances `h` with the flux form of continuity.
///
/// Requires current halos on `h`, `u` and `v`, with `u` and `v` already at
/// the new time level.
pub fn continuity_kernel(grid: &GlobalGrid, tile_state: &mut TileState) {
    let GlobalGrid { dx, dy, dt, .. } = *grid;

    let depth = tile_state.hmean.zip_map(&tile_state.h, |hmean, h| hmean + h);
    let flux_x = flux(&tile_state.u, &depth);
    let flux_y = flux(&tile_state.v, &depth);

    let dfdx = diffx(&flux_x);
    let dfdy = diffy(&flux_y);

    let ni = tile_state.h.ni();
    let nj = tile_state.h.nj();

    for j in 1..=nj {
        for i in 1..=ni {
            let divergence = dfdx.get(i, j) / dx + dfdy.get(i, j) / dy;
            let h = tile_state.h.get(i, j);
            tile_state.h.set(i, j, h - dt * divergence);
        }
    }
}

// Volume flux, halo included
fn flux(velocity: &HaloArray2D, depth: &HaloArray2D) -> HaloArray2D {
    velocity.zip_map(depth, |vel, dep| vel * dep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary_conditions::boundary_conditions_kernel;
    use crate::tile_topology::TileTopology;
    use crate::{ModelParameters, WorkingPrecision};
    use approx::assert_abs_diff_eq;

    fn setup(im: usize, jm: usize, periodic: bool) -> (GlobalGrid, TileState) {
        let model_params = ModelParameters {
            im,
            jm,
            ipos: 2,
            jpos: 2,
            ..ModelParameters::default()
        };
        let grid = GlobalGrid::new(&model_params);
        let topology = TileTopology::new(1, periodic).unwrap();
        let tile_state = TileState::new(&model_params, topology.tile(0, &grid).unwrap());
        (grid, tile_state)
    }

    #[test]
    fn flat_water_at_rest_stays_at_rest() {
        let (grid, mut tile_state) = setup(5, 5, false);
        tile_state.h.set_all(0.3);

        momentum_kernel(&grid, &mut tile_state);
        continuity_kernel(&grid, &mut tile_state);

        assert!(tile_state.u.interior_iter().all(|x| x == 0.0));
        assert!(tile_state.v.interior_iter().all(|x| x == 0.0));
        assert!(tile_state.h.interior_iter().all(|x| x == 0.3));
    }

    #[test]
    fn pressure_gradient_drives_velocity_from_rest() {
        let (grid, mut tile_state) = setup(4, 4, false);
        boundary_conditions_kernel(&mut tile_state);

        let h = tile_state.h.clone();
        momentum_kernel(&grid, &mut tile_state);

        for j in 1..=4 {
            for i in 1..=4 {
                let expected_u = -grid.dt * grid.g * (h.get(i + 1, j) - h.get(i - 1, j)) / grid.dx;
                let expected_v = -grid.dt * grid.g * (h.get(i, j + 1) - h.get(i, j - 1)) / grid.dy;
                assert_abs_diff_eq!(tile_state.u.get(i, j), expected_u, epsilon = 1e-15);
                assert_abs_diff_eq!(tile_state.v.get(i, j), expected_v, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn no_volume_leaves_through_the_walls() {
        let (grid, mut tile_state) = setup(5, 4, false);
        for j in 1..=4 {
            for i in 1..=5 {
                tile_state.u.set(i, j, 0.1 * i as WorkingPrecision - 0.05 * j as WorkingPrecision);
                tile_state.v.set(i, j, 0.02 * (i * j) as WorkingPrecision - 0.1);
            }
        }
        boundary_conditions_kernel(&mut tile_state);
        let volume_before: WorkingPrecision = tile_state.h.interior_iter().sum();

        continuity_kernel(&grid, &mut tile_state);

        let volume_after: WorkingPrecision = tile_state.h.interior_iter().sum();
        assert_abs_diff_eq!(volume_after, volume_before, epsilon = 1e-12);
    }

    #[test]
    fn uniform_flow_does_not_change_height_on_periodic_domain() {
        let (grid, mut tile_state) = setup(6, 6, true);
        tile_state.h.set_all(0.0);
        tile_state.u.set_all(0.5);
        tile_state.v.set_all(-0.25);

        continuity_kernel(&grid, &mut tile_state);

        for h in tile_state.h.interior_iter() {
            assert_abs_diff_eq!(h, 0.0, epsilon = 1e-15 as WorkingPrecision);
        }
    }
}
