use crate::communicator::Communicator;
use crate::error::Result;
use crate::halo_array_2d::HaloArray2D;
use crate::WorkingPrecision;

/// Global diagnostics for one completed step, identical on every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub step: u32,
    pub mean_h: WorkingPrecision,
    pub mean_ke: WorkingPrecision,
}

/// Mean over the interior cells of every tile.
pub fn mean(comm: &Communicator, field: &HaloArray2D) -> Result<WorkingPrecision> {
    let local_sum: WorkingPrecision = field.interior_iter().sum();
    let local_count = (field.ni() * field.nj()) as WorkingPrecision;

    let totals = comm.all_reduce_sum(&[local_sum, local_count])?;

    Ok(totals[0] / totals[1])
}

/// Pointwise kinetic energy `0.5 * (u^2 + v^2)`; the halo is left at zero.
pub fn ke(u: &HaloArray2D, v: &HaloArray2D) -> HaloArray2D {
    let mut energy = HaloArray2D::new(u.ni(), u.nj());

    for j in 1..=u.nj() {
        for i in 1..=u.ni() {
            let (uu, vv) = (u.get(i, j), v.get(i, j));
            energy.set(i, j, 0.5 * (uu * uu + vv * vv));
        }
    }

    energy
}

/// Sum of absolute values over the interior of every tile.
pub fn field_checksum(comm: &Communicator, field: &HaloArray2D) -> Result<WorkingPrecision> {
    let local: WorkingPrecision = field.interior_iter().map(|value| value.abs()).sum();

    Ok(comm.all_reduce_sum(&[local])?[0])
}

pub fn step_report(
    comm: &Communicator,
    step: u32,
    h: &HaloArray2D,
    u: &HaloArray2D,
    v: &HaloArray2D,
) -> Result<StepReport> {
    Ok(StepReport {
        step,
        mean_h: mean(comm, h)?,
        mean_ke: mean(comm, &ke(u, v))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_grid::GlobalGrid;
    use crate::spmd::launch;
    use crate::tile_topology::TileTopology;
    use approx::assert_relative_eq;

    fn grid() -> GlobalGrid {
        GlobalGrid {
            im: 7,
            jm: 5,
            dx: 1.0,
            dy: 1.0,
            g: 9.8,
            dt: 0.1,
        }
    }

    fn constant_mean(num_workers: usize, value: WorkingPrecision) -> Vec<WorkingPrecision> {
        let topology = TileTopology::new(num_workers, false).unwrap();
        launch(&topology, &grid(), |ctx| {
            let mut field = HaloArray2D::new(ctx.tile.local_im(), ctx.tile.local_jm());
            field.set_all(value);
            // halo must not count
            field.set(0, 1, 1.0e6);
            mean(&ctx.comm, &field)
        })
        .unwrap()
    }

    #[test]
    fn mean_of_constant_field_is_partition_invariant() {
        for &num_workers in &[1, 2, 3, 4, 5] {
            for mean_value in constant_mean(num_workers, 2.5) {
                assert_eq!(mean_value, 2.5);
            }
            for mean_value in constant_mean(num_workers, 0.1) {
                assert_relative_eq!(mean_value, 0.1, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn mean_weights_tiles_by_cell_count() {
        // 1 x 2 layout over 7 columns: 4 + 3 columns
        let topology = TileTopology::new(2, false).unwrap();
        let means = launch(&topology, &grid(), |ctx| {
            let mut field = HaloArray2D::new(ctx.tile.local_im(), ctx.tile.local_jm());
            field.set_all(ctx.tile.rank as WorkingPrecision);
            mean(&ctx.comm, &field)
        })
        .unwrap();

        assert_relative_eq!(means[0], 3.0 / 7.0, max_relative = 1e-15);
        assert_eq!(means[0], means[1]);
    }

    #[test]
    fn kinetic_energy_is_pointwise() {
        let mut u = HaloArray2D::new(2, 1);
        let mut v = HaloArray2D::new(2, 1);
        u.set(1, 1, 3.0);
        v.set(1, 1, 4.0);
        u.set(2, 1, -1.0);
        u.set(0, 1, 100.0);

        let energy = ke(&u, &v);
        assert_eq!(energy.interior(), vec![12.5, 0.5]);
        assert_eq!(energy.get(0, 1), 0.0);
    }

    #[test]
    fn checksum_sums_absolute_values_across_tiles() {
        let topology = TileTopology::new(3, false).unwrap();
        let sums = launch(&topology, &grid(), |ctx| {
            let mut field = HaloArray2D::new(ctx.tile.local_im(), ctx.tile.local_jm());
            field.set_all(-1.0);
            field_checksum(&ctx.comm, &field)
        })
        .unwrap();

        assert!(sums.iter().all(|&sum| sum == 35.0));
    }
}
