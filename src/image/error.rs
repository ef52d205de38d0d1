// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with image cubes and their coordinate metadata.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("An image needs at least two axes, but this one has {0}")]
    TooFewAxes(usize),

    #[error("Images may have at most 4 non-degenerate axes, but axis {axis} ({ctype}) has {naxis} pixels")]
    TooManyAxes {
        axis: usize,
        ctype: String,
        naxis: usize,
    },

    #[error("The image data has shape {data:?}, but the header describes {header:?}")]
    ShapeMismatch {
        data: Vec<usize>,
        header: Vec<usize>,
    },

    #[error("Images are not on the same grid; axis {axis}: {reason}")]
    GridMismatch { axis: usize, reason: String },

    #[error("The image has no {0} axis")]
    MissingAxis(&'static str),

    #[error("Expected the celestial axes to be axes 1 and 2, but they are ctypes '{ctype1}' and '{ctype2}'")]
    CelestialAxesNotFirst { ctype1: String, ctype2: String },
}

#[derive(Error, Debug)]
pub enum BoundingBoxError {
    #[error("Couldn't parse '{0}' as a box; expected 'xmin,ymin,xmax,ymax' with non-negative integers")]
    Parse(String),

    #[error("The box's lower-left corner ({xmin}, {ymin}) is above or right of its upper-right corner ({xmax}, {ymax})")]
    Inverted {
        xmin: usize,
        ymin: usize,
        xmax: usize,
        ymax: usize,
    },

    #[error("The box ({xmin}, {ymin}, {xmax}, {ymax}) doesn't fit inside the image, which is {nx}x{ny} pixels")]
    OutOfBounds {
        xmin: usize,
        ymin: usize,
        xmax: usize,
        ymax: usize,
        nx: usize,
        ny: usize,
    },
}

#[derive(Error, Debug)]
pub enum AxisOrderError {
    #[error("Couldn't parse '{0}' as an axis order; expected a permutation of 0, 1, 2 and 3, e.g. '0132'")]
    Parse(String),

    #[error("Couldn't find axis types {missing:?} in the image, which has axis types {have:?}")]
    NoPermutation {
        missing: Vec<String>,
        have: Vec<String>,
    },
}
