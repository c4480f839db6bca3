// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image narrowing by seam carving.
//!
//! Four stages, each a pure function over in-memory arrays:
//!
//! 1. [`compute_energy`]: image to per-pixel energy (Sobel over brightness)
//! 2. [`accumulate_cost`]: energy to cost table + backpointers (bottom-up DP)
//! 3. [`extract_seam`]: cost table to the cheapest connected seam
//! 4. [`apply_seam`]: image minus that seam
//!
//! [`SeamCarver`] repeats them to reach a target size.

mod ternary;

pub mod carve;
pub mod cost;
pub mod energy;
pub mod error;
pub mod raster;
pub mod seam;
pub mod seamcarver;
pub mod seamfinder;
pub mod strategies;
pub mod twodmap;

pub use carve::apply_seam;
pub use cost::{accumulate_cost, CostTable};
pub use energy::{compute_energy, compute_energy_with, EnergyConfig, GradientNorm, LumaWeights};
pub use error::{Result, SeamError};
pub use raster::Image;
pub use seam::{extract_seam, find_seam, Orientation, Seam};
pub use seamcarver::{carve_aligned, CarveOrder, SeamCarver};
pub use seamfinder::{BackwardEnergy, FixedSeams, SeamFinder};
pub use twodmap::{BackPointerMap, CostMap, EnergyMap, TwoDimensionalMap};
