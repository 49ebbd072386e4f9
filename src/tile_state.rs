use crate::halo_array_2d::HaloArray2D;
use crate::tile_topology::TileDescriptor;
use crate::{ModelParameters, WorkingPrecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    H,
    U,
    V,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::H, Field::U, Field::V];

    pub fn name(self) -> &'static str {
        match self {
            Field::H => "h",
            Field::U => "u",
            Field::V => "v",
        }
    }
}

/// The prognostic fields of one tile. Only the owning worker touches the interior.
pub struct TileState {
    pub tile: TileDescriptor,

    // Height perturbation
    pub h: HaloArray2D,

    // Velocities
    pub u: HaloArray2D,
    pub v: HaloArray2D,

    // Mean depth, constant over the run
    pub hmean: HaloArray2D,
}

impl TileState {
    pub fn new(model_params: &ModelParameters, tile: TileDescriptor) -> Self {
        let ni = tile.local_im();
        let nj = tile.local_jm();

        let mut tile_state = TileState {
            tile,
            h: HaloArray2D::new(ni, nj),
            u: HaloArray2D::new(ni, nj),
            v: HaloArray2D::new(ni, nj),
            hmean: HaloArray2D::new(ni, nj),
        };

        tile_state.initialise(model_params);
        tile_state
    }

    fn initialise(&mut self, model_params: &ModelParameters) {
        let ipos = model_params.ipos as WorkingPrecision;
        let jpos = model_params.jpos as WorkingPrecision;
        let decay = model_params.decay;

        let i_range = self.tile.i_range;
        let j_range = self.tile.j_range;

        for gj in j_range.iter() {
            for gi in i_range.iter() {
                let di = gi as WorkingPrecision - ipos;
                let dj = gj as WorkingPrecision - jpos;
                self.h.set(
                    i_range.to_local(gi),
                    j_range.to_local(gj),
                    (-decay * (di * di + dj * dj)).exp(),
                );
            }
        }

        self.hmean.set_all(model_params.hmean);
    }

    pub fn field(&self, field: Field) -> &HaloArray2D {
        match field {
            Field::H => &self.h,
            Field::U => &self.u,
            Field::V => &self.v,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut HaloArray2D {
        match field {
            Field::H => &mut self.h,
            Field::U => &mut self.u,
            Field::V => &mut self.v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_grid::GlobalGrid;
    use crate::tile_topology::TileTopology;

    #[test]
    fn gaussian_bump_uses_global_indices() {
        let model_params = ModelParameters {
            im: 8,
            jm: 4,
            ipos: 6,
            jpos: 2,
            decay: 0.5,
            hmean: 7.0,
            ..ModelParameters::default()
        };
        let grid = GlobalGrid::new(&model_params);
        // 1 x 2 layout, second tile covers i = 5..=8
        let topology = TileTopology::new(2, false).unwrap();
        let tile_state = TileState::new(&model_params, topology.tile(1, &grid).unwrap());

        assert_eq!(tile_state.h.ni(), 4);
        assert_eq!(tile_state.h.nj(), 4);
        // global (6, 2) is local (2, 2)
        assert_eq!(tile_state.h.get(2, 2), 1.0);
        assert_eq!(tile_state.h.get(1, 2), (-0.5 as WorkingPrecision).exp());
        assert!(tile_state.u.interior_iter().all(|x| x == 0.0));
        assert!(tile_state.v.interior_iter().all(|x| x == 0.0));
        assert_eq!(tile_state.hmean.get(0, 0), 7.0);
        assert_eq!(tile_state.hmean.get(3, 4), 7.0);
    }
}
