// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - the multi-seam driver
//!
//! Repeats find-seam, remove-seam until the image reaches the size
//! asked for.  Every step is a fold: it takes the previous image by
//! reference and hands back a new one, and the seam finder is told
//! about the removal only after the new image exists, so the image and
//! whatever the finder carries along never drift apart.

use crate::carve::apply_seam;
use crate::energy::EnergyConfig;
use crate::error::{Result, SeamError};
use crate::raster::Image;
use crate::seam::{find_seam, Orientation, Seam};
use crate::seamfinder::{BackwardEnergy, FixedSeams, SeamFinder};
use crate::twodmap::EnergyMap;
use num_traits::ToPrimitive;
use tracing::debug;

/// The order in which width and height are reduced when both change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarveOrder {
    /// All the columns, then all the rows.
    #[default]
    WidthFirst,
    /// All the rows, then all the columns.
    HeightFirst,
    /// One column, one row, and so on while both still need to shrink.
    Alternate,
}

// How many pixels a seam of this orientation crosses out of: the width
// for vertical seams, the height for horizontal ones.
fn extent<S: Copy>(image: &Image<S>, orientation: Orientation) -> usize {
    match orientation {
        Orientation::Vertical => image.width(),
        Orientation::Horizontal => image.height(),
    }
}

fn check_count(count: usize, across: usize) -> Result<()> {
    if count >= across {
        return Err(SeamError::shape(format!(
            "cannot remove {} seams from {} pixels",
            count, across
        )));
    }
    Ok(())
}

/// Repeatedly carves seams out of an image.
#[derive(Debug, Clone)]
pub struct SeamCarver<F: SeamFinder = BackwardEnergy> {
    finder: F,
}

impl SeamCarver<BackwardEnergy> {
    /// A carver that recomputes the energy before every seam.
    pub fn new(config: EnergyConfig) -> Self {
        SeamCarver {
            finder: BackwardEnergy::new(config),
        }
    }
}

impl Default for SeamCarver<BackwardEnergy> {
    fn default() -> Self {
        Self::new(EnergyConfig::default())
    }
}

impl<F: SeamFinder> SeamCarver<F> {
    pub fn with_finder(finder: F) -> Self {
        SeamCarver { finder }
    }

    pub fn finder(&self) -> &F {
        &self.finder
    }

    pub fn into_finder(self) -> F {
        self.finder
    }

    /// Find and remove one seam.
    pub fn carve_once<S>(&mut self, image: &Image<S>, orientation: Orientation) -> Result<(Image<S>, Seam)>
    where
        S: Copy + ToPrimitive,
    {
        let seam = self.finder.next_seam(image, orientation)?;
        let carved = apply_seam(image, &seam)?;
        self.finder.seam_removed(&seam)?;
        Ok((carved, seam))
    }

    /// Remove `count` seams running `orientation`.  Vertical seams narrow
    /// the image by exactly `count` columns, horizontal seams shorten it
    /// by `count` rows.  Asking for everything (or more) fails up front
    /// rather than leaving an empty image.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn remove_seams<S>(&mut self, image: &Image<S>, count: usize, orientation: Orientation) -> Result<Image<S>>
    where
        S: Copy + ToPrimitive,
    {
        check_count(count, extent(image, orientation))?;
        (0..count).try_fold(image.clone(), |current, i| {
            let (carved, _) = self.carve_once(&current, orientation)?;
            debug!(seam = i, width = carved.width(), height = carved.height(), "removed seam");
            Ok(carved)
        })
    }

    /// Carve down to `new_width` by `new_height`.  Neither may be zero
    /// or larger than the image; seam carving cannot upscale.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn resize<S>(
        &mut self,
        image: &Image<S>,
        new_width: usize,
        new_height: usize,
        order: CarveOrder,
    ) -> Result<Image<S>>
    where
        S: Copy + ToPrimitive,
    {
        let (width, height) = image.dimensions();
        if new_width == 0 || new_height == 0 {
            return Err(SeamError::shape(format!(
                "cannot carve down to {}x{}",
                new_width, new_height
            )));
        }
        if width < new_width || height < new_height {
            return Err(SeamError::shape(format!(
                "seamcarve cannot upscale {}x{} to {}x{}",
                width, height, new_width, new_height
            )));
        }
        let (columns, rows) = (width - new_width, height - new_height);

        match order {
            CarveOrder::WidthFirst => {
                let narrowed = self.remove_seams(image, columns, Orientation::Vertical)?;
                self.remove_seams(&narrowed, rows, Orientation::Horizontal)
            }
            CarveOrder::HeightFirst => {
                let shortened = self.remove_seams(image, rows, Orientation::Horizontal)?;
                self.remove_seams(&shortened, columns, Orientation::Vertical)
            }
            CarveOrder::Alternate => {
                let mut scratch = image.clone();
                let mut direction = Orientation::Vertical;
                let paired = columns.min(rows);
                for _ in 0..paired * 2 {
                    scratch = self.carve_once(&scratch, direction)?.0;
                    direction = direction.turn();
                    debug!(width = scratch.width(), height = scratch.height(), "alternating");
                }
                let narrowed = self.remove_seams(&scratch, columns - paired, Orientation::Vertical)?;
                self.remove_seams(&narrowed, rows - paired, Orientation::Horizontal)
            }
        }
    }
}

/// Choose `count` seams from `reference` alone and remove each of them
/// from every image in `images`.  The reference field is shrunk along
/// with the images and never recomputed, so every image loses exactly
/// the same pixels.  Returns the carved images and the seams, in the
/// order they were removed.
#[tracing::instrument(skip(reference, images), fields(image_count = images.len()))]
pub fn carve_aligned<S>(
    reference: EnergyMap,
    images: &[Image<S>],
    count: usize,
    orientation: Orientation,
) -> Result<(Vec<Image<S>>, Vec<Seam>)>
where
    S: Copy,
{
    if let Some(img) = images.iter().find(|img| img.dimensions() != reference.dimensions()) {
        return Err(SeamError::shape(format!(
            "image is {:?} but the reference energy is {:?}",
            img.dimensions(),
            reference.dimensions()
        )));
    }
    let (width, height) = reference.dimensions();
    let across = match orientation {
        Orientation::Vertical => width,
        Orientation::Horizontal => height,
    };
    check_count(count, across)?;

    let mut finder = FixedSeams::new(reference);
    let mut current = images.to_vec();
    let mut seams = Vec::with_capacity(count);
    for i in 0..count {
        let seam = find_seam(finder.energy(), orientation)?;
        current = current
            .iter()
            .map(|img| apply_seam(img, &seam))
            .collect::<Result<Vec<_>>>()?;
        finder.seam_removed(&seam)?;
        debug!(seam = i, dimensions = ?finder.energy().dimensions(), "removed shared seam");
        seams.push(seam);
    }
    Ok((current, seams))
}
