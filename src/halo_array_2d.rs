use crate::WorkingPrecision;

/// Tile-local field with a one-cell halo ring.
///
/// Logical indices run `0..=ni + 1` and `0..=nj + 1`; `0` and `n + 1` are the
/// halo. Storage is zero-based and column-major (`i` varies fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct HaloArray2D {
    values: Vec<WorkingPrecision>,

    ni: usize,
    nj: usize,
}

impl HaloArray2D {
    pub fn new(ni: usize, nj: usize) -> Self {
        HaloArray2D {
            ni,
            nj,
            values: vec![0.0; (ni + 2) * (nj + 2)],
        }
    }

    /// Interior extent in x.
    pub fn ni(&self) -> usize {
        self.ni
    }

    /// Interior extent in y.
    pub fn nj(&self) -> usize {
        self.nj
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> WorkingPrecision {
        self.values[self.index(i, j)]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: WorkingPrecision) {
        let idx = self.index(i, j);
        self.values[idx] = value
    }

    /// Sets every cell, halo included.
    pub fn set_all(&mut self, value: WorkingPrecision) {
        self.values.iter_mut().for_each(|x| *x = value);
    }

    /// Padded cells combined pointwise, halo included.
    pub fn zip_map<F>(&self, other: &HaloArray2D, f: F) -> HaloArray2D
    where
        F: Fn(WorkingPrecision, WorkingPrecision) -> WorkingPrecision,
    {
        debug_assert_eq!((self.ni, self.nj), (other.ni, other.nj));

        HaloArray2D {
            ni: self.ni,
            nj: self.nj,
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    pub fn interior_iter(&self) -> impl Iterator<Item = WorkingPrecision> + '_ {
        (1..=self.nj).flat_map(move |j| (1..=self.ni).map(move |i| self.get(i, j)))
    }

    /// Interior values, `i` fastest.
    pub fn interior(&self) -> Vec<WorkingPrecision> {
        self.interior_iter().collect()
    }

    /// Cells `1..=nj` of column `i`. Corners are never part of a strip.
    pub fn column(&self, i: usize) -> Vec<WorkingPrecision> {
        (1..=self.nj).map(|j| self.get(i, j)).collect()
    }

    pub fn row(&self, j: usize) -> Vec<WorkingPrecision> {
        (1..=self.ni).map(|i| self.get(i, j)).collect()
    }

    pub fn set_column(&mut self, i: usize, strip: &[WorkingPrecision]) {
        debug_assert_eq!(strip.len(), self.nj);
        for (j, &value) in (1..=self.nj).zip(strip) {
            self.set(i, j, value);
        }
    }

    pub fn set_row(&mut self, j: usize, strip: &[WorkingPrecision]) {
        debug_assert_eq!(strip.len(), self.ni);
        for (i, &value) in (1..=self.ni).zip(strip) {
            self.set(i, j, value);
        }
    }

    #[inline(always)]
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= self.ni + 1 && j <= self.nj + 1);
        i + j * (self.ni + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halo_cells_are_addressable() {
        let mut field = HaloArray2D::new(3, 2);
        field.set(0, 0, 1.0);
        field.set(4, 3, 2.0);
        field.set(2, 1, 3.0);

        assert_eq!(field.get(0, 0), 1.0);
        assert_eq!(field.get(4, 3), 2.0);
        assert_eq!(field.get(2, 1), 3.0);
        assert_eq!(field.interior(), vec![0.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn strips_run_along_faces() {
        let mut field = HaloArray2D::new(3, 2);
        for j in 0..=3 {
            for i in 0..=4 {
                field.set(i, j, (10 * i + j) as WorkingPrecision);
            }
        }

        assert_eq!(field.column(1), vec![11.0, 12.0]);
        assert_eq!(field.row(2), vec![12.0, 22.0, 32.0]);

        field.set_column(0, &[-1.0, -2.0]);
        assert_eq!(field.get(0, 1), -1.0);
        assert_eq!(field.get(0, 2), -2.0);
        // corners untouched
        assert_eq!(field.get(0, 0), 0.0);
        assert_eq!(field.get(0, 3), 3.0);

        field.set_row(3, &[7.0, 8.0, 9.0]);
        assert_eq!(field.row(3), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn zip_map_covers_halo() {
        let mut a = HaloArray2D::new(2, 2);
        let mut b = HaloArray2D::new(2, 2);
        a.set_all(2.0);
        b.set_all(3.0);
        b.set(0, 0, 5.0);

        let product = a.zip_map(&b, |x, y| x * y);
        assert_eq!(product.get(0, 0), 10.0);
        assert_eq!(product.get(3, 3), 6.0);
    }
}
