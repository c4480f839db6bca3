// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where the next seam comes from.
//!
//! The driver doesn't care how a seam was chosen, only that one is
//! offered for the current image and that the finder hears about it
//! once it has been removed.  Two finders ship with the crate:
//! `BackwardEnergy` recomputes the energy of the current image every
//! time, and `FixedSeams` keeps shrinking one reference energy field
//! and never looks at the image's content at all.

use crate::energy::{compute_energy_with, EnergyConfig};
use crate::error::{Result, SeamError};
use crate::raster::Image;
use crate::seam::{find_seam, Orientation, Seam};
use crate::twodmap::EnergyMap;
use num_traits::ToPrimitive;

/// A source of seams for a multi-seam carve.
pub trait SeamFinder {
    /// The next seam to remove from `image`, running `orientation`.
    fn next_seam<S>(&mut self, image: &Image<S>, orientation: Orientation) -> Result<Seam>
    where
        S: Copy + ToPrimitive;

    /// Called once the seam returned by `next_seam` has been removed
    /// from the image.
    fn seam_removed(&mut self, _seam: &Seam) -> Result<()> {
        Ok(())
    }
}

/// Recompute the energy from scratch before every seam.  Slow, but each
/// seam is the true minimum for the image it is removed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardEnergy {
    pub config: EnergyConfig,
}

impl BackwardEnergy {
    pub fn new(config: EnergyConfig) -> Self {
        BackwardEnergy { config }
    }
}

impl SeamFinder for BackwardEnergy {
    fn next_seam<S>(&mut self, image: &Image<S>, orientation: Orientation) -> Result<Seam>
    where
        S: Copy + ToPrimitive,
    {
        find_seam(&compute_energy_with(image, &self.config)?, orientation)
    }
}

/// Choose every seam from one reference energy field, shrinking the
/// field along with the image instead of recomputing it.  The same
/// sequence of seams can then be replayed over several aligned images.
#[derive(Debug, Clone)]
pub struct FixedSeams {
    energy: EnergyMap,
}

impl FixedSeams {
    pub fn new(reference: EnergyMap) -> Self {
        FixedSeams { energy: reference }
    }

    /// What is left of the reference field.
    pub fn energy(&self) -> &EnergyMap {
        &self.energy
    }
}

impl SeamFinder for FixedSeams {
    fn next_seam<S>(&mut self, image: &Image<S>, orientation: Orientation) -> Result<Seam>
    where
        S: Copy + ToPrimitive,
    {
        if image.dimensions() != self.energy.dimensions() {
            return Err(SeamError::shape(format!(
                "image is {:?} but the reference energy is {:?}",
                image.dimensions(),
                self.energy.dimensions()
            )));
        }
        find_seam(&self.energy, orientation)
    }

    fn seam_removed(&mut self, seam: &Seam) -> Result<()> {
        self.energy = self.energy.remove_seam(seam)?;
        Ok(())
    }
}
