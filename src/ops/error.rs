// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from image operations.

use thiserror::Error;

use crate::image::{AxisOrderError, BoundingBoxError, ImageError};

#[derive(Error, Debug)]
pub enum ReframeError {
    #[error("Cannot set the rest frequency to {0} Hz; it must be positive and finite")]
    BadRestFreq(f64),

    #[error("The image has no spectral axis, so its rest frequency can't be changed. This requires manual correction")]
    NoSpectralAxis,

    #[error("The spectral axis ('{ctype}', unit '{unit}') isn't in frequency units (Hz); the rest frequency requires manual correction")]
    NotFrequency { ctype: String, unit: String },
}

#[derive(Error, Debug)]
pub enum RegridError {
    #[error("The image to be regridded: {0}")]
    Source(ImageError),

    #[error("The template image: {0}")]
    Template(ImageError),

    #[error("The template has Stokes {stokes}, but the image to be regridded has none")]
    MissingStokes { stokes: f64 },

    #[error("The spectral axes can't be matched: the image to be regridded is '{source_ctype}', but the template is '{template_ctype}'")]
    SpectralMismatch {
        source_ctype: String,
        template_ctype: String,
    },

    #[error("None of the template's pixels overlap with the image to be regridded")]
    NoOverlap,
}

#[derive(Error, Debug)]
pub enum SubimageError {
    #[error(transparent)]
    BoundingBox(#[from] BoundingBoxError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Error, Debug)]
pub enum TransposeError {
    #[error(transparent)]
    AxisOrder(#[from] AxisOrderError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Error, Debug)]
pub enum MathError {
    #[error(transparent)]
    Grid(#[from] ImageError),

    #[error("The primary-beam cutoff ({0}) must be finite and non-negative")]
    BadCutoff(f64),

    #[error("Unknown image expression '{0}'; expected one of 'IM0*IM1', 'IM0/IM1', 'IM0+IM1' or 'IM0-IM1'")]
    UnknownExpression(String),
}

#[derive(Error, Debug)]
pub enum FeatherAlgError {
    #[error(transparent)]
    Grid(#[from] ImageError),

    #[error("The {which} image has no restoring beam (BMAJ/BMIN); one must be supplied")]
    MissingBeam { which: &'static str },

    #[error("The single-dish scale factor must be positive and finite, but got {0}")]
    BadSdFactor(f64),
}
