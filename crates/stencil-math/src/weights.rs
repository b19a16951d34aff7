//! Cross-shaped stencil coefficient table.
//!
//! Nonzero only on the horizontal and vertical arms through the origin:
//! `w(i, 0) = 1 / (2 i r)` for i != 0, and likewise `w(0, j)`. The signed
//! offsets make the arm coefficients telescope: applied to a linear ramp
//! `c_x x + c_y y`, one stencil application adds exactly `c_x + c_y`.

use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct WeightTable {
    radius: usize,
    table: Array2<f64>,
}

impl WeightTable {
    /// Build the table for the given radius. Immutable afterwards; one
    /// instance is shared read-only by every compute invocation.
    pub fn new(radius: usize) -> Self {
        debug_assert!(radius >= 1);
        let size = 2 * radius + 1;
        let mut table = Array2::zeros((size, size));
        let r = radius as isize;
        for off in -r..=r {
            if off == 0 {
                continue;
            }
            let value = 1.0 / (2.0 * off as f64 * radius as f64);
            table[[(off + r) as usize, r as usize]] = value;
            table[[r as usize, (off + r) as usize]] = value;
        }
        WeightTable { radius, table }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Coefficient at offset (dx, dy) from the stencil origin.
    #[inline(always)]
    pub fn at(&self, dx: isize, dy: isize) -> f64 {
        let r = self.radius as isize;
        self.table[[(dx + r) as usize, (dy + r) as usize]]
    }
}
