// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cost accumulator.
//!
//! Bottom-up dynamic programming over an energy field: `M[y][x]` is
//! the energy of `(x, y)` plus the cheapest of the (at most three)
//! adjacent cells one row down, so the first row ends up holding the
//! cost of the cheapest connected path from each of its pixels to the
//! bottom edge.  One pass per row, constant work per cell: O(W×H)
//! time and space instead of the O(3^H) of enumerating paths.
//!
//! Rows depend on the row below them and are filled strictly in
//! order.

use crate::cq;
use crate::error::Result;
use crate::twodmap::{BackPointerMap, CostMap, EnergyMap, TwoDimensionalMap};

/// The accumulated cost table and the choice made at every cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    pub cost: CostMap,
    pub backpointers: BackPointerMap,
}

/// The column adjacent to `x` (x-1, x, x+1, clipped to the row) whose
/// value in `below` is least.  Ties go to the leftmost candidate.
/// Both the accumulator and the extractor go through here, so the
/// seam always agrees with the table.
#[inline]
pub(crate) fn cheapest_neighbour(below: &[f64], x: usize) -> usize {
    let mw = below.len() - 1;
    let (lo, hi) = (cq!(x == 0, 0, x - 1), cq!(x >= mw, mw, x + 1));
    let mut best = lo;
    for k in (lo + 1)..=hi {
        if below[k] < below[best] {
            best = k;
        }
    }
    best
}

/// Given an energy field, build the cost table and backpointers.
///
/// The last row of the cost table is the last row of the energy field,
/// exactly.  Every backpointer is the column offset (-1, 0 or +1) of
/// the neighbour below that achieved the minimum; the last row's are
/// zero.  For a finite non-negative field every entry of the result is
/// finite and non-negative.
pub fn accumulate_cost(energy: &EnergyMap) -> Result<CostTable> {
    let (width, height) = energy.dimensions();
    let mut cost = energy.clone();
    let mut backpointers: BackPointerMap = TwoDimensionalMap::new(width, height)?;

    for y in (0..height - 1).rev() {
        let (upper, lower) = cost.data.split_at_mut((y + 1) * width);
        let below = &lower[..width];
        let row = &mut upper[y * width..];
        let parents = backpointers.row_mut(y);
        for x in 0..width {
            let k = cheapest_neighbour(below, x);
            row[x] += below[k];
            parents[x] = (k as isize - x as isize) as i8;
        }
    }

    tracing::trace!(width, height, "accumulated cost table");
    Ok(CostTable { cost, backpointers })
}
