// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given an image, project it onto a single brightness plane, run the
//! classic 3x3 Sobel pair over that plane, and combine the two
//! directional responses into one non-negative value per pixel.  High
//! energy marks pixels whose removal would be visually damaging.
//!
//! Borders are handled by reflection (`d c b a | a b c d | d c b a`).
//! For a 3x3 window that is the same as repeating the edge pixel, so
//! energies along the borders are finite and deterministic.

use crate::cq;
use crate::error::{Result, SeamError};
use crate::raster::Image;
use crate::twodmap::{EnergyMap, TwoDimensionalMap};
use image::{GrayImage, Luma};
use itertools::iproduct;
use num_traits::ToPrimitive;

/// Weights used to collapse colour channels into brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LumaWeights {
    /// ITU-R BT.709: 0.2126 R + 0.7152 G + 0.0722 B
    #[default]
    Bt709,
    /// NTSC: 0.3 R + 0.59 G + 0.11 B
    Ntsc,
}

impl LumaWeights {
    pub fn weights(self) -> [f64; 3] {
        match self {
            LumaWeights::Bt709 => [0.2126, 0.7152, 0.0722],
            LumaWeights::Ntsc => [0.3, 0.59, 0.11],
        }
    }
}

/// How the horizontal and vertical gradients are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientNorm {
    /// `|gx| + |gy|`.  Cheaper, and picks slightly different seams.
    L1,
    /// `sqrt(gx² + gy²)`
    #[default]
    L2,
}

/// Everything that determines an energy field, besides the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnergyConfig {
    pub luma: LumaWeights,
    pub norm: GradientNorm,
}

impl EnergyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_luma(mut self, luma: LumaWeights) -> Self {
        self.luma = luma;
        self
    }

    pub fn with_norm(mut self, norm: GradientNorm) -> Self {
        self.norm = norm;
        self
    }
}

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

#[inline]
fn sample<S: ToPrimitive>(s: &S) -> Result<f64> {
    s.to_f64()
        .ok_or_else(|| SeamError::shape("image sample is not representable as f64"))
}

/// Project an image onto a brightness plane.  One channel is its own
/// brightness; a second channel (grey + alpha) is ignored.  Three or
/// four channels are weighted as RGB, and the fourth (alpha) is
/// ignored.
pub fn luminance<S>(image: &Image<S>, weights: LumaWeights) -> Result<TwoDimensionalMap<f64>>
where
    S: Copy + ToPrimitive,
{
    let (width, height) = image.dimensions();
    let [wr, wg, wb] = weights.weights();
    let data = match image.channels() {
        1 | 2 => iproduct!(0..height, 0..width)
            .map(|(y, x)| sample(&image.pixel(x, y)[0]))
            .collect::<Result<Vec<f64>>>()?,
        3 | 4 => iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let px = image.pixel(x, y);
                Ok(wr * sample(&px[0])? + wg * sample(&px[1])? + wb * sample(&px[2])?)
            })
            .collect::<Result<Vec<f64>>>()?,
        n => {
            return Err(SeamError::shape(format!(
                "cannot derive brightness from {} channels",
                n
            )))
        }
    };
    TwoDimensionalMap::from_vec(width, height, data)
}

// Sobel response at one pixel, border by reflection.
#[inline]
fn sobel_at(luma: &TwoDimensionalMap<f64>, x: usize, y: usize, norm: GradientNorm) -> f64 {
    let (width, height) = luma.dimensions();
    let (mw, mh) = (width - 1, height - 1);
    let cols = [cq!(x == 0, 0, x - 1), x, cq!(x >= mw, mw, x + 1)];
    let rows = [cq!(y == 0, 0, y - 1), y, cq!(y >= mh, mh, y + 1)];

    let (mut gx, mut gy) = (0.0, 0.0);
    for (ky, &sy) in rows.iter().enumerate() {
        for (kx, &sx) in cols.iter().enumerate() {
            let v = luma[(sx, sy)];
            gx += SOBEL_X[ky][kx] * v;
            gy += SOBEL_Y[ky][kx] * v;
        }
    }
    match norm {
        GradientNorm::L1 => gx.abs() + gy.abs(),
        GradientNorm::L2 => gx.hypot(gy),
    }
}

fn fill_rows(luma: &TwoDimensionalMap<f64>, first_row: usize, band: &mut [f64], norm: GradientNorm) {
    let width = luma.width();
    for (dy, row) in band.chunks_mut(width).enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = sobel_at(luma, x, first_row + dy, norm);
        }
    }
}

#[cfg(not(feature = "threaded"))]
fn sobel_energy(luma: &TwoDimensionalMap<f64>, norm: GradientNorm) -> Vec<f64> {
    let mut out = vec![0.0; luma.width() * luma.height()];
    fill_rows(luma, 0, &mut out, norm);
    out
}

// Every output pixel is independent, so the field is carved into
// horizontal bands of whole rows, one band per worker.
#[cfg(feature = "threaded")]
fn sobel_energy(luma: &TwoDimensionalMap<f64>, norm: GradientNorm) -> Vec<f64> {
    let (width, height) = luma.dimensions();
    let mut out = vec![0.0; width * height];
    let band_rows = (height + num_cpus::get() - 1) / num_cpus::get();
    crossbeam::thread::scope(|s| {
        for (i, band) in out.chunks_mut(band_rows * width).enumerate() {
            s.spawn(move |_| fill_rows(luma, i * band_rows, band, norm));
        }
    })
    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
    out
}

/// Compute the energy of every pixel with the default configuration
/// (BT.709 brightness, L2 gradient magnitude).
pub fn compute_energy<S>(image: &Image<S>) -> Result<EnergyMap>
where
    S: Copy + ToPrimitive,
{
    compute_energy_with(image, &EnergyConfig::default())
}

/// Compute the energy of every pixel.  The result has the image's
/// width and height and no channel axis.
pub fn compute_energy_with<S>(image: &Image<S>, config: &EnergyConfig) -> Result<EnergyMap>
where
    S: Copy + ToPrimitive,
{
    let luma = luminance(image, config.luma)?;
    let (width, height) = luma.dimensions();
    tracing::trace!(width, height, ?config, "computing energy");
    TwoDimensionalMap::from_vec(width, height, sobel_energy(&luma, config.norm))
}

impl TwoDimensionalMap<f64> {
    /// Scale a non-negative field onto 0..=255 for display: the maximum
    /// maps to white.  An all-zero field is black.
    pub fn to_gray_image(&self) -> GrayImage {
        let max = self.data.iter().cloned().fold(0.0f64, f64::max);
        let scale = cq!(max > 0.0, 255.0 / max, 0.0);
        let (width, height) = self.dimensions();
        GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let v = self[(x as usize, y as usize)] * scale;
            Luma([v.round().clamp(0.0, 255.0) as u8])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn flat_image_has_no_energy() {
        let img = Image::from_rows(&[[7u8; 5]; 4]).unwrap();
        let energy = compute_energy(&img).unwrap();
        assert_eq!(energy.dimensions(), (5, 4));
        assert!(energy.as_slice().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn vertical_edge_lights_up_both_sides() {
        let img = Image::from_rows(&[[0u8, 0, 10, 10]; 3]).unwrap();
        let energy = compute_energy(&img).unwrap();
        for y in 0..3 {
            assert_eq!(energy.row(y), &[0.0, 40.0, 40.0, 0.0]);
        }
    }

    #[test]
    fn l1_and_l2_differ_on_diagonals() {
        let img = Image::from_rows(&[[0.0f64, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let l2 = compute_energy(&img).unwrap();
        let l1 = compute_energy_with(&img, &EnergyConfig::new().with_norm(GradientNorm::L1)).unwrap();
        assert!((l2[(0, 0)] - 2f64.sqrt()).abs() < EPS);
        assert!((l1[(0, 0)] - 2.0).abs() < EPS);
        assert_eq!(l2[(1, 1)], 0.0);
    }

    #[test]
    fn single_pixel_image_is_valid() {
        let img = Image::from_rows(&[[200u8]]).unwrap();
        let energy = compute_energy(&img).unwrap();
        assert_eq!(energy.as_slice(), &[0.0]);
    }

    #[test]
    fn luma_weights_sum_to_one() {
        for weights in [LumaWeights::Bt709, LumaWeights::Ntsc] {
            let sum: f64 = weights.weights().iter().sum();
            assert!((sum - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn luminance_uses_the_chosen_weights() {
        let img = Image::from_pixel_rows(&[[[100u8, 0, 0], [0, 0, 100]]]).unwrap();
        let bt709 = luminance(&img, LumaWeights::Bt709).unwrap();
        let ntsc = luminance(&img, LumaWeights::Ntsc).unwrap();
        assert!((bt709[(0, 0)] - 21.26).abs() < EPS);
        assert!((ntsc[(0, 0)] - 30.0).abs() < EPS);
        assert!((ntsc[(1, 0)] - 11.0).abs() < EPS);
    }

    #[test]
    fn alpha_is_ignored_and_odd_channel_counts_rejected() {
        let rgba = Image::from_pixel_rows(&[[[10u8, 10, 10, 0], [10, 10, 10, 255]]]).unwrap();
        let energy = compute_energy(&rgba).unwrap();
        assert!(energy.as_slice().iter().all(|&e| e.abs() < EPS));

        let five = Image::from_vec(1, 1, 5, vec![0u8; 5]).unwrap();
        assert!(matches!(compute_energy(&five), Err(SeamError::InvalidShape(_))));
    }

    #[test]
    fn energy_renders_to_greyscale() {
        let map = TwoDimensionalMap::from_rows(&[[0.0, 2.0], [4.0, 1.0]]).unwrap();
        let grey = map.to_gray_image();
        assert_eq!(grey.get_pixel(0, 1).0, [255]);
        assert_eq!(grey.get_pixel(1, 0).0, [128]);
        assert_eq!(grey.get_pixel(0, 0).0, [0]);

        let black = TwoDimensionalMap::from_rows(&[[0.0, 0.0]]).unwrap().to_gray_image();
        assert!(black.pixels().all(|p| p.0 == [0]));
    }
}
