// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image being carved.
//!
//! `Image` is a dense row-major grid of samples with an explicit
//! channel count, so a greyscale plane and an RGB picture go through
//! the same code with no guessing about array shapes.  Conversion to
//! and from the `image` crate lives here as well; the carver itself
//! never touches files.

use crate::error::{Result, SeamError};
use image::{GenericImageView, ImageBuffer, Pixel};

/// A rectangular image of `width * height` pixels, each of `channels`
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<S> {
    width: usize,
    height: usize,
    channels: usize,
    pub(crate) data: Vec<S>,
}

impl<S: Copy> Image<S> {
    /// Wrap an interleaved row-major buffer.
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<S>) -> Result<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(SeamError::shape(format!(
                "image must be at least 1x1x1, got {}x{}x{}",
                width, height, channels
            )));
        }
        if data.len() != width * height * channels {
            return Err(SeamError::shape(format!(
                "{}x{}x{} image needs {} samples, got {}",
                width,
                height,
                channels,
                width * height * channels,
                data.len()
            )));
        }
        Ok(Image {
            width,
            height,
            channels,
            data,
        })
    }

    /// A single-channel image from nested rows.
    pub fn from_rows<R: AsRef<[S]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        check_rectangular(rows.iter().map(|r| r.as_ref().len()), width)?;
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_vec(width, rows.len(), 1, data)
    }

    /// A `C`-channel image from nested rows of pixels.
    pub fn from_pixel_rows<const C: usize, R: AsRef<[[S; C]]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        check_rectangular(rows.iter().map(|r| r.as_ref().len()), width)?;
        let data = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().flat_map(|px| px.iter().copied()))
            .collect();
        Self::from_vec(width, rows.len(), C, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(width, height)`, in that order.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// The samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[S] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Every sample of row `y`, interleaved.
    pub fn row(&self, y: usize) -> &[S] {
        let stride = self.width * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Swap the axes, keeping each pixel's channels together.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.extend_from_slice(self.pixel(x, y));
            }
        }
        Image {
            width: self.height,
            height: self.width,
            channels: self.channels,
            data,
        }
    }
}

fn check_rectangular(lengths: impl Iterator<Item = usize>, width: usize) -> Result<()> {
    for (y, len) in lengths.enumerate() {
        if len != width {
            return Err(SeamError::shape(format!(
                "row {} has {} pixels, row 0 has {}",
                y, len, width
            )));
        }
    }
    Ok(())
}

impl<S: image::Primitive> Image<S> {
    /// Copy any `image` view into a carveable buffer.
    pub fn from_view<I, P>(view: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S>,
    {
        let (width, height) = view.dimensions();
        let channels = P::CHANNEL_COUNT as usize;
        let mut data = Vec::with_capacity(width as usize * height as usize * channels);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(view.get_pixel(x, y).channels());
            }
        }
        Self::from_vec(width as usize, height as usize, channels, data)
    }

    /// Copy back into an `ImageBuffer` of pixel type `P`, whose channel
    /// count must match.
    pub fn to_buffer<P>(&self) -> Result<ImageBuffer<P, Vec<S>>>
    where
        P: Pixel<Subpixel = S>,
    {
        if P::CHANNEL_COUNT as usize != self.channels {
            return Err(SeamError::shape(format!(
                "pixel type has {} channels, image has {}",
                P::CHANNEL_COUNT,
                self.channels
            )));
        }
        ImageBuffer::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| SeamError::shape("buffer does not match image dimensions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn pixel_rows_keep_channels_together() {
        let img = Image::from_pixel_rows(&[[[1u8, 2, 3], [4, 5, 6]]]).unwrap();
        assert_eq!((img.width(), img.height(), img.channels()), (2, 1, 3));
        assert_eq!(img.pixel(1, 0), &[4, 5, 6]);
        let t = img.transpose();
        assert_eq!(t.dimensions(), (1, 2));
        assert_eq!(t.pixel(0, 1), &[4, 5, 6]);
    }

    #[test]
    fn rejects_ragged_and_empty_input() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 2], vec![3]];
        assert!(matches!(Image::from_rows(&rows), Err(SeamError::InvalidShape(_))));
        let empty: Vec<Vec<u8>> = vec![];
        assert!(Image::from_rows(&empty).is_err());
        assert!(Image::<u8>::from_vec(2, 2, 0, vec![]).is_err());
    }

    #[test]
    fn round_trips_through_image_buffers() {
        let mut buf = RgbImage::new(3, 2);
        buf.put_pixel(2, 1, Rgb([10, 20, 30]));
        let img = Image::from_view(&buf).unwrap();
        assert_eq!(img.channels(), 3);
        assert_eq!(img.pixel(2, 1), &[10, 20, 30]);
        let back: RgbImage = img.to_buffer().unwrap();
        assert_eq!(back, buf);
        assert!(img.to_buffer::<Luma<u8>>().is_err());
    }
}
