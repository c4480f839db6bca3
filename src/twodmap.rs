// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Single-channel two-dimensional fields.
//!
//! One container serves every intermediate product of the carver: the
//! energy field, the cost table, and the backpointer table.  They all
//! share the shape of the image they were derived from and have no
//! channel axis.

use crate::error::{Result, SeamError};
use std::ops::{Index, IndexMut};

/// An addressable, rectangular, row-major field of `P`.  Addressing is
/// `(x, y)`, the same as the `image` crate: column first, then row.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: usize,
    height: usize,
    pub(crate) data: Vec<P>,
}

/// Per-pixel energy, non-negative and finite.
pub type EnergyMap = TwoDimensionalMap<f64>;

/// `M[y][x]`: the cheapest cost of any connected path from `(x, y)`
/// to the last row.
pub type CostMap = TwoDimensionalMap<f64>;

/// Column offset in {-1, 0, +1} of the neighbour one row down that
/// achieved the minimum in the cost recurrence.  The last row is all
/// zeros and never consulted.
pub type BackPointerMap = TwoDimensionalMap<i8>;

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// A field of the given size, filled with `P::default()`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SeamError::shape(format!(
                "map must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width * height],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SeamError::shape(format!(
                "map must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(SeamError::shape(format!(
                "{}x{} map needs {} values, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Build a field from nested rows, rejecting ragged input.
    pub fn from_rows<R: AsRef<[P]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if let Some((y, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.as_ref().len() != width)
        {
            return Err(SeamError::shape(format!(
                "row {} has {} columns, row 0 has {}",
                y,
                row.as_ref().len(),
                width
            )));
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_vec(width, rows.len(), data)
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    #[inline]
    fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`, in that order.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [P] {
        let start = self.get_index(0, y);
        let width = self.width;
        &mut self.data[start..start + width]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, P> {
        self.data.chunks(self.width)
    }

    /// Swap the axes: column `x` of `self` becomes row `x` of the
    /// result.  Horizontal seams are vertical seams of the transpose.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self[(x, y)]);
            }
        }
        TwoDimensionalMap {
            width: self.height,
            height: self.width,
            data,
        }
    }
}

impl<P: Default + Copy> Index<(usize, usize)> for TwoDimensionalMap<P> {
    type Output = P;

    fn index(&self, (x, y): (usize, usize)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(usize, usize)> for TwoDimensionalMap<P> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addressing_is_column_then_row() {
        let map = TwoDimensionalMap::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(map.dimensions(), (3, 2));
        assert_eq!(map[(2, 0)], 3);
        assert_eq!(map[(0, 1)], 4);
        assert_eq!(map.row(1), &[4, 5, 6]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![4, 5]];
        assert!(matches!(
            TwoDimensionalMap::from_rows(&rows),
            Err(SeamError::InvalidShape(_))
        ));
    }

    #[test]
    fn empty_maps_are_rejected() {
        let rows: Vec<Vec<f64>> = vec![];
        assert!(TwoDimensionalMap::from_rows(&rows).is_err());
        assert!(TwoDimensionalMap::<f64>::new(0, 4).is_err());
        assert!(TwoDimensionalMap::<f64>::from_vec(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn transpose_swaps_axes() {
        let map = TwoDimensionalMap::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let t = map.transpose();
        assert_eq!(t.dimensions(), (2, 3));
        assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(t.transpose(), map);
    }
}
