// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pixel-wise arithmetic between images on the same grid.

use std::str::FromStr;

use log::debug;
use ndarray::Zip;
use strum_macros::{Display, EnumIter};

use super::MathError;
use crate::image::ImageCube;

/// The expressions that can be evaluated between two images. `IM0` is the
/// first image and `IM1` is the second.
#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum ImageExpression {
    #[strum(serialize = "IM0*IM1")]
    Multiply,

    #[strum(serialize = "IM0/IM1")]
    Divide,

    #[strum(serialize = "IM0+IM1")]
    Add,

    #[strum(serialize = "IM0-IM1")]
    Subtract,
}

impl FromStr for ImageExpression {
    type Err = MathError;

    // Whitespace is ignored, so "IM0 * IM1" works too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match squashed.to_uppercase().as_str() {
            "IM0*IM1" => Ok(ImageExpression::Multiply),
            "IM0/IM1" => Ok(ImageExpression::Divide),
            "IM0+IM1" => Ok(ImageExpression::Add),
            "IM0-IM1" => Ok(ImageExpression::Subtract),
            _ => Err(MathError::UnknownExpression(s.to_string())),
        }
    }
}

/// Evaluate `expr` between two images. Metadata of the output follows `im0`.
pub fn evaluate_expression(
    expr: ImageExpression,
    im0: &ImageCube,
    im1: &ImageCube,
) -> Result<ImageCube, MathError> {
    match expr {
        ImageExpression::Multiply => multiply(im0, im1),
        ImageExpression::Divide => divide(im0, im1),
        ImageExpression::Add => pixelwise(im0, im1, |a, b| a + b),
        ImageExpression::Subtract => pixelwise(im0, im1, |a, b| a - b),
    }
}

/// `a * b`, pixel by pixel.
pub fn multiply(a: &ImageCube, b: &ImageCube) -> Result<ImageCube, MathError> {
    pixelwise(a, b, |a, b| a * b)
}

/// `a / b`, pixel by pixel. Division by zero gives NaN rather than infinity.
pub fn divide(a: &ImageCube, b: &ImageCube) -> Result<ImageCube, MathError> {
    pixelwise(a, b, |a, b| if b == 0.0 { f32::NAN } else { a / b })
}

/// Primary-beam correct an image: divide by the primary-beam map, except
/// where the beam is non-finite or no greater than `cutoff`; those pixels are
/// NaN.
pub fn pb_correct(image: &ImageCube, pb: &ImageCube, cutoff: f64) -> Result<ImageCube, MathError> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(MathError::BadCutoff(cutoff));
    }
    let cutoff = cutoff as f32;
    let corrected = pixelwise(image, pb, |v, p| {
        if !p.is_finite() || p <= cutoff {
            f32::NAN
        } else {
            v / p
        }
    })?;
    debug!(
        "{} of {} pixels are beyond the primary-beam cutoff",
        pb.data.iter().filter(|p| !p.is_finite() || **p <= cutoff).count(),
        pb.data.len()
    );
    Ok(corrected)
}

fn pixelwise<F>(a: &ImageCube, b: &ImageCube, f: F) -> Result<ImageCube, MathError>
where
    F: Fn(f32, f32) -> f32 + Sync + Send,
{
    a.same_grid(b)?;
    let data = Zip::from(&a.data).and(&b.data).par_map_collect(|&a, &b| f(a, b));
    Ok(a.with_data(data))
}
