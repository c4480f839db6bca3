// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Naive ways to narrow an image.
//!
//! None of these are seam carving; they are what seam carving is
//! measured against.  Cropping throws content away at the edges,
//! removing whole columns tears straight lines, and removing the
//! cheapest pixels row by row shreds anything that crosses rows.

use crate::carve::apply_seam;
use crate::energy::{compute_energy_with, EnergyConfig};
use crate::error::{Result, SeamError};
use crate::raster::Image;
use crate::seam::Seam;
use itertools::Itertools;
use num_traits::ToPrimitive;

/// Which edge a crop takes columns from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropSide {
    Left,
    #[default]
    Right,
    /// `count / 2` from the left, the rest from the right.
    Center,
}

fn check_narrowing(count: usize, width: usize) -> Result<()> {
    if count >= width {
        return Err(SeamError::shape(format!(
            "cannot remove {} columns from an image {} wide",
            count, width
        )));
    }
    Ok(())
}

/// Cut `count` columns off one or both sides.
pub fn crop<S: Copy>(image: &Image<S>, count: usize, side: CropSide) -> Result<Image<S>> {
    let (width, height) = image.dimensions();
    check_narrowing(count, width)?;
    let left = match side {
        CropSide::Left => count,
        CropSide::Right => 0,
        CropSide::Center => count / 2,
    };
    let keep = width - count;
    let channels = image.channels();
    let data = (0..height)
        .flat_map(|y| image.row(y)[left * channels..(left + keep) * channels].iter().copied())
        .collect();
    Image::from_vec(keep, height, channels, data)
}

/// Remove, `count` times, the straight column whose energy sums to the
/// least.  Energy is recomputed after every removal.  Ties go to the
/// leftmost column.
pub fn remove_min_energy_columns<S>(image: &Image<S>, count: usize, config: &EnergyConfig) -> Result<Image<S>>
where
    S: Copy + ToPrimitive,
{
    check_narrowing(count, image.width())?;
    (0..count).try_fold(image.clone(), |current, _| {
        let energy = compute_energy_with(&current, config)?;
        let column = (0..energy.width())
            .map(|x| energy.rows().map(|row| row[x]).sum::<f64>())
            .position_min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0);
        apply_seam(&current, &Seam::vertical(vec![column; current.height()]))
    })
}

/// Remove the `count` lowest-energy pixels from every row
/// independently, keeping the survivors in order.  Energy is computed
/// once, on the original image.  Ties go to the leftmost pixel.
pub fn remove_min_energy_pixels_per_row<S>(image: &Image<S>, count: usize, config: &EnergyConfig) -> Result<Image<S>>
where
    S: Copy + ToPrimitive,
{
    let (width, height) = image.dimensions();
    check_narrowing(count, width)?;
    let energy = compute_energy_with(image, config)?;
    let channels = image.channels();

    let mut data = Vec::with_capacity((width - count) * height * channels);
    for (y, row) in energy.rows().enumerate() {
        let doomed: Vec<usize> = (0..width)
            .sorted_by(|&a, &b| row[a].total_cmp(&row[b]))
            .take(count)
            .collect();
        for x in (0..width).filter(|x| !doomed.contains(x)) {
            data.extend_from_slice(image.pixel(x, y));
        }
    }
    Image::from_vec(width - count, height, channels, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(width: usize, height: usize) -> Image<u8> {
        Image::from_vec(width, height, 1, (0..(width * height) as u8).collect()).unwrap()
    }

    #[test]
    fn crops_from_either_side() {
        let img = labels(5, 2);
        assert_eq!(crop(&img, 2, CropSide::Right).unwrap().row(1), &[5, 6, 7]);
        assert_eq!(crop(&img, 2, CropSide::Left).unwrap().row(1), &[7, 8, 9]);
        assert_eq!(crop(&img, 3, CropSide::Center).unwrap().row(0), &[1, 2]);
        assert!(crop(&img, 5, CropSide::Right).is_err());
    }

    #[test]
    fn flat_columns_go_first() {
        // Columns 2..6 are flat; the leftmost of them goes.
        let img = Image::from_rows(&[[0u8, 100, 100, 100, 100, 100]; 4]).unwrap();
        let out = remove_min_energy_columns(&img, 1, &EnergyConfig::default()).unwrap();
        assert_eq!(out.dimensions(), (5, 4));
        assert_eq!(out.row(0), &[0, 100, 100, 100, 100]);
    }

    #[test]
    fn min_energy_columns_from_rgb() {
        let img = Image::from_pixel_rows(&[[[1u8, 2, 3]; 4]; 3]).unwrap();
        let out = remove_min_energy_columns(&img, 3, &EnergyConfig::default()).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (1, 3, 3));
    }

    #[test]
    fn per_row_removal_is_independent() {
        let img = Image::from_rows(&[[0u8, 0, 0, 90], [90, 0, 0, 0]]).unwrap();
        let out = remove_min_energy_pixels_per_row(&img, 1, &EnergyConfig::default()).unwrap();
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.row(0), &[0, 0, 90]);
        assert_eq!(out.row(1), &[90, 0, 0]);
    }

    #[test]
    fn nothing_to_remove_is_a_copy() {
        let img = labels(3, 3);
        let cfg = EnergyConfig::default();
        assert_eq!(remove_min_energy_columns(&img, 0, &cfg).unwrap(), img);
        assert_eq!(remove_min_energy_pixels_per_row(&img, 0, &cfg).unwrap(), img);
        assert!(remove_min_energy_pixels_per_row(&img, 3, &cfg).is_err());
    }
}
