// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams, and tracing them out of a cost table.

use crate::cost::{accumulate_cost, cheapest_neighbour};
use crate::error::{Result, SeamError};
use crate::twodmap::{BackPointerMap, CostMap, EnergyMap};

/// Which way a seam runs.  A vertical seam runs top to bottom, has
/// one column index per row, and narrows the image; a horizontal seam
/// runs left to right, has one row index per column, and shortens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn turn(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

/// A connected one-pixel-wide path across an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    orientation: Orientation,
    indices: Vec<usize>,
}

impl Seam {
    /// One column index per row, top to bottom.
    pub fn vertical(indices: Vec<usize>) -> Self {
        Seam {
            orientation: Orientation::Vertical,
            indices,
        }
    }

    /// One row index per column, left to right.
    pub fn horizontal(indices: Vec<usize>) -> Self {
        Seam {
            orientation: Orientation::Horizontal,
            indices,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when no two consecutive entries are more than one apart.
    pub fn is_connected(&self) -> bool {
        self.indices.windows(2).all(|w| w[0].abs_diff(w[1]) <= 1)
    }

    /// The same path, relabelled as running the other way.  Used when
    /// a horizontal seam is found on a transposed field.
    pub(crate) fn transposed(self) -> Self {
        Seam {
            orientation: self.orientation.turn(),
            indices: self.indices,
        }
    }

    /// Sum of the energy under the seam.
    pub fn total_cost(&self, energy: &EnergyMap) -> Result<f64> {
        let (width, height) = energy.dimensions();
        let (along, across) = match self.orientation {
            Orientation::Vertical => (height, width),
            Orientation::Horizontal => (width, height),
        };
        if self.len() != along {
            return Err(SeamError::seam(format!(
                "seam has {} entries, field needs {}",
                self.len(),
                along
            )));
        }
        self.indices
            .iter()
            .enumerate()
            .map(|(i, &j)| {
                if j >= across {
                    return Err(SeamError::seam(format!("index {} at step {} is out of range", j, i)));
                }
                Ok(match self.orientation {
                    Orientation::Vertical => energy[(j, i)],
                    Orientation::Horizontal => energy[(i, j)],
                })
            })
            .sum()
    }
}

/// Trace the cheapest vertical seam out of a cost table.
///
/// The seam starts at the leftmost column minimising the first row of
/// `cost`.  Each next column is read from `backpointers` when they are
/// given, otherwise it is recomputed as the cheapest neighbour in the
/// next row of `cost`, with the same left-first tie-break the
/// accumulator uses.  Either way the energy under the seam sums to
/// `min(cost[0])`.
pub fn extract_seam(cost: &CostMap, backpointers: Option<&BackPointerMap>) -> Result<Seam> {
    let (width, height) = cost.dimensions();
    if let Some(bp) = backpointers {
        if bp.dimensions() != cost.dimensions() {
            return Err(SeamError::InconsistentTable {
                cost: cost.dimensions(),
                backpointers: bp.dimensions(),
            });
        }
    }

    let mut col = cheapest_start(cost.row(0));
    let mut seam = Vec::with_capacity(height);
    seam.push(col);
    for y in 1..height {
        col = match backpointers {
            Some(bp) => {
                let next = col as isize + bp[(col, y - 1)] as isize;
                if next < 0 || next as usize >= width || bp[(col, y - 1)].unsigned_abs() > 1 {
                    return Err(SeamError::seam(format!(
                        "backpointer at ({}, {}) leads to column {}",
                        col,
                        y - 1,
                        next
                    )));
                }
                next as usize
            }
            None => cheapest_neighbour(cost.row(y), col),
        };
        seam.push(col);
    }
    Ok(Seam::vertical(seam))
}

// Leftmost minimum of a row.
fn cheapest_start(row: &[f64]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, row[0]), |(bi, bv), (i, &v)| if v < bv { (i, v) } else { (bi, bv) })
        .0
}

/// Energy field to seam in one call: accumulate the cost table and
/// follow the backpointers.  Horizontal seams are the vertical seams
/// of the transposed field.
pub fn find_seam(energy: &EnergyMap, orientation: Orientation) -> Result<Seam> {
    match orientation {
        Orientation::Vertical => {
            let table = accumulate_cost(energy)?;
            extract_seam(&table.cost, Some(&table.backpointers))
        }
        Orientation::Horizontal => {
            let table = accumulate_cost(&energy.transpose())?;
            Ok(extract_seam(&table.cost, Some(&table.backpointers))?.transposed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twodmap::TwoDimensionalMap;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn field(rows: &[&[f64]]) -> EnergyMap {
        TwoDimensionalMap::from_rows(rows).unwrap()
    }

    // Cheapest connected path starting at column `x` of row `y`, by
    // trying every one of them.
    fn brute_force(energy: &EnergyMap, x: usize, y: usize) -> f64 {
        let (width, height) = energy.dimensions();
        let here = energy[(x, y)];
        if y + 1 == height {
            return here;
        }
        let lo = x.saturating_sub(1);
        let hi = (x + 1).min(width - 1);
        here + (lo..=hi)
            .map(|k| brute_force(energy, k, y + 1))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn uniform_field_gives_the_leftmost_straight_seam() {
        let row = [1.0; 4];
        let energy = field(&[&row, &row, &row, &row]);
        let seam = find_seam(&energy, Orientation::Vertical).unwrap();
        assert_eq!(seam.indices(), &[0, 0, 0, 0]);
        assert_eq!(seam.total_cost(&energy).unwrap(), 4.0);
    }

    #[test]
    fn valley_in_the_middle() {
        let energy = field(&[&[9.0, 1.0, 9.0], &[9.0, 1.0, 9.0], &[9.0, 1.0, 9.0]]);
        let table = accumulate_cost(&energy).unwrap();
        let seam = extract_seam(&table.cost, Some(&table.backpointers)).unwrap();
        assert_eq!(seam.indices(), &[1, 1, 1]);
        assert_eq!(seam.total_cost(&energy).unwrap(), 3.0);
        assert_eq!(extract_seam(&table.cost, None).unwrap(), seam);
    }

    #[test]
    fn diagonal_seam_is_followed() {
        let energy = field(&[
            &[9.0, 9.0, 0.0, 9.0, 9.0],
            &[9.0, 1.0, 9.0, 8.0, 9.0],
            &[9.0, 9.0, 9.0, 9.0, 0.0],
            &[9.0, 9.0, 9.0, 0.0, 9.0],
        ]);
        let seam = find_seam(&energy, Orientation::Vertical).unwrap();
        assert_eq!(seam.indices(), &[2, 3, 4, 3]);
        assert!(seam.is_connected());
    }

    #[test]
    fn horizontal_seam_runs_across_columns() {
        let energy = field(&[&[9.0, 9.0, 9.0], &[1.0, 1.0, 9.0], &[9.0, 9.0, 1.0]]);
        let seam = find_seam(&energy, Orientation::Horizontal).unwrap();
        assert_eq!(seam.orientation(), Orientation::Horizontal);
        assert_eq!(seam.indices(), &[1, 1, 2]);
        assert_eq!(seam.total_cost(&energy).unwrap(), 3.0);
    }

    #[test]
    fn brute_force_agrees_with_the_dynamic_program() {
        let mut rng = StdRng::seed_from_u64(0x5ea4_ca4e);
        for _ in 0..20 {
            let data: Vec<f64> = (0..36).map(|_| rng.gen_range(0.0..10.0)).collect();
            let energy = TwoDimensionalMap::from_vec(6, 6, data).unwrap();
            let table = accumulate_cost(&energy).unwrap();

            for x in 0..6 {
                let exhaustive = brute_force(&energy, x, 0);
                assert!((table.cost[(x, 0)] - exhaustive).abs() < 1e-9);
            }

            let best = table.cost.row(0).iter().cloned().fold(f64::INFINITY, f64::min);
            for seam in [
                extract_seam(&table.cost, Some(&table.backpointers)).unwrap(),
                extract_seam(&table.cost, None).unwrap(),
            ] {
                assert_eq!(seam.len(), 6);
                assert!(seam.is_connected());
                assert!((seam.total_cost(&energy).unwrap() - best).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn all_zero_field_is_not_an_error() {
        let energy = TwoDimensionalMap::<f64>::new(5, 3).unwrap();
        let seam = find_seam(&energy, Orientation::Vertical).unwrap();
        assert_eq!(seam.indices(), &[0, 0, 0]);
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let energy = field(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let table = accumulate_cost(&energy).unwrap();
        let other = TwoDimensionalMap::<i8>::new(3, 2).unwrap();
        assert_eq!(
            extract_seam(&table.cost, Some(&other)),
            Err(SeamError::InconsistentTable {
                cost: (2, 3),
                backpointers: (3, 2)
            })
        );
    }

    #[test]
    fn corrupt_backpointers_are_rejected() {
        let energy = field(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let table = accumulate_cost(&energy).unwrap();
        let mut bp = table.backpointers.clone();
        bp[(0, 0)] = -1;
        assert!(matches!(
            extract_seam(&table.cost, Some(&bp)),
            Err(SeamError::InvalidSeam(_))
        ));
    }

    #[test]
    fn connectivity_check() {
        assert!(Seam::vertical(vec![3, 2, 2, 3]).is_connected());
        assert!(!Seam::vertical(vec![0, 2]).is_connected());
    }
}
