//! Centred two-point differences.
//!
//! Only the numerator `f(i + 1) - f(i - 1)` is returned; callers scale it.
//! The halo of the input must be current, the halo of the output is zero.

use crate::halo_array_2d::HaloArray2D;

pub fn diffx(field: &HaloArray2D) -> HaloArray2D {
    let mut dfdx = HaloArray2D::new(field.ni(), field.nj());

    for j in 1..=field.nj() {
        for i in 1..=field.ni() {
            dfdx.set(i, j, field.get(i + 1, j) - field.get(i - 1, j));
        }
    }

    dfdx
}

pub fn diffy(field: &HaloArray2D) -> HaloArray2D {
    let mut dfdy = HaloArray2D::new(field.ni(), field.nj());

    for j in 1..=field.nj() {
        for i in 1..=field.ni() {
            dfdy.set(i, j, field.get(i, j + 1) - field.get(i, j - 1));
        }
    }

    dfdy
}
