// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Pixel data is single precision, but
coordinate and Fourier-weight calculations are done in double precision before
converting.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// The number of axes every [`crate::ImageCube`] has after ingest (two
/// celestial axes, a spectral axis and a Stokes axis).
pub const NUM_IMAGE_AXES: usize = 4;

/// Relative tolerance used when comparing two image grids (reference values,
/// increments and reference pixels).
pub const GRID_REL_TOLERANCE: f64 = 1e-6;

/// Relative tolerance used when deciding whether two rest frequencies are the
/// same.
pub const REST_FREQ_REL_TOLERANCE: f64 = 1e-9;

/// Primary-beam values less than or equal to this are excluded (set to NaN)
/// when primary-beam correcting, unless the user specifies otherwise.
pub const DEFAULT_PB_CUTOFF: f64 = 0.0;

/// The default scale factor applied to the low-resolution image when
/// feathering.
pub const DEFAULT_SD_FACTOR: f64 = 1.0;

/// Converts a Gaussian FWHM into its standard deviation: sigma = FWHM *
/// FWHM_TO_SIGMA.
pub const FWHM_TO_SIGMA: f64 = 0.42466090014400953; // 1 / sqrt(8 ln 2)

/// The file extension given to every image artifact written.
pub const IMAGE_EXTENSION: &str = "fits";
