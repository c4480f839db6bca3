// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam removal.
//!
//! Removing a vertical seam deletes one pixel from every row and shifts
//! the rest of the row left; the order of what remains is untouched.
//! Horizontal seams go through the transpose.  Images and
//! single-channel maps (an energy field that is being carried along
//! instead of recomputed) have separate entry points but share the
//! row surgery, so a map shrunk with a seam stays aligned with the
//! image shrunk with the same seam.

use crate::error::{Result, SeamError};
use crate::raster::Image;
use crate::seam::{Orientation, Seam};
use crate::twodmap::TwoDimensionalMap;

// Delete `path[y]` from each row of a row-major buffer of `stride`
// samples per pixel.  Checks everything before touching anything.
fn remove_path<S: Copy>(
    data: &[S],
    (width, height): (usize, usize),
    stride: usize,
    path: &[usize],
) -> Result<Vec<S>> {
    if width <= 1 {
        return Err(SeamError::shape(format!(
            "cannot remove a seam from {} pixel(s) across",
            width
        )));
    }
    if path.len() != height {
        return Err(SeamError::seam(format!(
            "seam has {} entries, image has {}",
            path.len(),
            height
        )));
    }
    if let Some((y, x)) = path.iter().enumerate().find(|&(_, &x)| x >= width) {
        return Err(SeamError::seam(format!(
            "index {} at step {} is outside 0..{}",
            x, y, width
        )));
    }

    let mut out = Vec::with_capacity((width - 1) * height * stride);
    for (row, &x) in data.chunks(width * stride).zip(path) {
        out.extend_from_slice(&row[..x * stride]);
        out.extend_from_slice(&row[(x + 1) * stride..]);
    }
    Ok(out)
}

/// Remove a seam from an image.  A vertical seam on a `W×H` image gives
/// `(W-1)×H`; a horizontal one gives `W×(H-1)`.  Channels stay with
/// their pixel.
pub fn apply_seam<S: Copy>(image: &Image<S>, seam: &Seam) -> Result<Image<S>> {
    match seam.orientation() {
        Orientation::Vertical => {
            let (width, height) = image.dimensions();
            let data = remove_path(image.as_slice(), (width, height), image.channels(), seam.indices())?;
            Image::from_vec(width - 1, height, image.channels(), data)
        }
        Orientation::Horizontal => {
            let flipped = image.transpose();
            let (width, height) = flipped.dimensions();
            let data = remove_path(flipped.as_slice(), (width, height), flipped.channels(), seam.indices())?;
            Ok(Image::from_vec(width - 1, height, flipped.channels(), data)?.transpose())
        }
    }
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Remove a seam from a single-channel field, exactly as
    /// [`apply_seam`] would from an image of the same size.
    pub fn remove_seam(&self, seam: &Seam) -> Result<Self> {
        match seam.orientation() {
            Orientation::Vertical => {
                let (width, height) = self.dimensions();
                let data = remove_path(self.as_slice(), (width, height), 1, seam.indices())?;
                TwoDimensionalMap::from_vec(width - 1, height, data)
            }
            Orientation::Horizontal => {
                let flipped = self.transpose();
                let (width, height) = flipped.dimensions();
                let data = remove_path(flipped.as_slice(), (width, height), 1, seam.indices())?;
                Ok(TwoDimensionalMap::from_vec(width - 1, height, data)?.transpose())
            }
        }
    }
}
