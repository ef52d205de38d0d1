// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image cubes and their coordinate metadata.
//!
//! Every image handled by `feather` is an [`ImageCube`] with exactly four
//! axes. The axes are kept in FITS order (i.e. `axes[0]` describes `NAXIS1`),
//! whereas the pixel data is kept in FITS memory order, so the data array is
//! indexed `[axis4, axis3, axis2, axis1]`.

mod error;
#[cfg(test)]
mod tests;

pub use error::{AxisOrderError, BoundingBoxError, ImageError};

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use ndarray::prelude::*;
use strum_macros::Display;

use crate::constants::{FWHM_TO_SIGMA, GRID_REL_TOLERANCE, NUM_IMAGE_AXES, PI};

/// What an image axis represents, as determined by its `CTYPE`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    #[strum(serialize = "longitude")]
    Longitude,

    #[strum(serialize = "latitude")]
    Latitude,

    #[strum(serialize = "spectral")]
    Spectral,

    #[strum(serialize = "Stokes")]
    Stokes,

    #[strum(serialize = "linear")]
    Linear,
}

impl AxisKind {
    pub fn from_ctype(ctype: &str) -> AxisKind {
        let ctype = ctype.trim().to_uppercase();
        // The coordinate type is everything before the projection code (e.g.
        // "RA" in "RA---SIN").
        let coord_type = ctype.split('-').next().unwrap_or("");
        match coord_type {
            "RA" | "GLON" | "ELON" | "SLON" => AxisKind::Longitude,
            "DEC" | "GLAT" | "ELAT" | "SLAT" => AxisKind::Latitude,
            "FREQ" | "VRAD" | "VOPT" | "VELO" | "FELO" | "WAVE" | "ZOPT" => AxisKind::Spectral,
            "STOKES" => AxisKind::Stokes,
            _ => AxisKind::Linear,
        }
    }
}

/// A single image axis. Pixel coordinates used in this crate are 0-indexed,
/// even though `CRPIX` (as written in FITS headers) is 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub ctype: String,
    pub naxis: usize,
    pub crval: f64,
    pub cdelt: f64,
    pub crpix: f64,
    pub cunit: Option<String>,
}

impl Axis {
    pub fn new(ctype: &str, naxis: usize, crval: f64, cdelt: f64, crpix: f64) -> Axis {
        Axis {
            ctype: ctype.to_string(),
            naxis,
            crval,
            cdelt,
            crpix,
            cunit: None,
        }
    }

    pub fn with_unit(mut self, cunit: &str) -> Axis {
        self.cunit = Some(cunit.to_string());
        self
    }

    pub fn kind(&self) -> AxisKind {
        AxisKind::from_ctype(&self.ctype)
    }

    /// The linear world coordinate of a 0-indexed pixel.
    pub fn pixel_to_world(&self, pixel: f64) -> f64 {
        self.crval + self.cdelt * (pixel + 1.0 - self.crpix)
    }

    /// The 0-indexed (fractional) pixel of a linear world coordinate.
    pub fn world_to_pixel(&self, world: f64) -> f64 {
        (world - self.crval) / self.cdelt + self.crpix - 1.0
    }

    /// Is this axis the "same" as another, i.e. do both describe the same
    /// world coordinates at the same pixels?
    pub(crate) fn same_as(&self, other: &Axis) -> Result<(), String> {
        if self.kind() != other.kind()
            || !self.ctype.trim().eq_ignore_ascii_case(other.ctype.trim())
        {
            return Err(format!(
                "axis types differ ('{}' vs. '{}')",
                self.ctype, other.ctype
            ));
        }
        if self.naxis != other.naxis {
            return Err(format!(
                "different number of pixels ({} vs. {})",
                self.naxis, other.naxis
            ));
        }
        // The reference pixel and value can trade off against one another, so
        // compare the world coordinates of the first and last pixels instead
        // of CRVAL and CRPIX directly. Tolerances are a fraction of a pixel.
        let tolerance = GRID_REL_TOLERANCE * self.cdelt.abs().max(other.cdelt.abs());
        for (name, a, b) in [
            ("pixel increment", self.cdelt, other.cdelt),
            ("first pixel", self.pixel_to_world(0.0), other.pixel_to_world(0.0)),
            (
                "last pixel",
                self.pixel_to_world((self.naxis - 1) as f64),
                other.pixel_to_world((other.naxis - 1) as f64),
            ),
        ] {
            let tolerance = tolerance.max(1e-12 * a.abs().max(b.abs()));
            if (a - b).abs() > tolerance {
                return Err(format!("{name} differs ({a} vs. {b})"));
            }
        }
        Ok(())
    }
}

/// An elliptical Gaussian restoring beam. All angles are in degrees; the
/// position angle is measured from north through east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub major_deg: f64,
    pub minor_deg: f64,
    pub pa_deg: f64,
}

impl Beam {
    pub fn from_fwhm(major_deg: f64, minor_deg: f64, pa_deg: f64) -> Beam {
        Beam {
            major_deg,
            minor_deg,
            pa_deg,
        }
    }

    /// A circular beam.
    pub fn circular(fwhm_deg: f64) -> Beam {
        Beam::from_fwhm(fwhm_deg, fwhm_deg, 0.0)
    }

    /// The area of the beam [square degrees].
    pub fn area_deg2(&self) -> f64 {
        PI * self.major_deg * self.minor_deg / (4.0 * std::f64::consts::LN_2)
    }

    /// The area of the beam [steradians].
    pub fn area_sr(&self) -> f64 {
        self.area_deg2() * (PI / 180.0).powi(2)
    }

    /// The Fourier transform of this beam, normalised to 1 at the origin, at
    /// the spatial frequency (`u_east`, `u_north`) [cycles per degree].
    pub fn fourier_weight(&self, u_east: f64, u_north: f64) -> f64 {
        let (s, c) = self.pa_deg.to_radians().sin_cos();
        // The major axis points along (sin PA, cos PA) in (east, north).
        let u_major = u_east * s + u_north * c;
        let u_minor = u_east * c - u_north * s;
        let sigma_major = self.major_deg * FWHM_TO_SIGMA;
        let sigma_minor = self.minor_deg * FWHM_TO_SIGMA;
        (-2.0
            * PI
            * PI
            * (sigma_major * sigma_major * u_major * u_major
                + sigma_minor * sigma_minor * u_minor * u_minor))
            .exp()
    }
}

impl Display for Beam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.3}\" x {:.3}\" (PA {:.1}°)",
            self.major_deg * 3600.0,
            self.minor_deg * 3600.0,
            self.pa_deg
        )
    }
}

/// Header information that isn't specific to an axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMeta {
    /// The rest frequency [Hz].
    pub rest_freq: Option<f64>,
    pub beam: Option<Beam>,
    pub bunit: Option<String>,
    pub object: Option<String>,
    pub equinox: Option<f64>,
    pub specsys: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageCube {
    /// The axes of the image, in FITS order.
    pub axes: Vec<Axis>,

    /// The pixel values, indexed `[axis4, axis3, axis2, axis1]`.
    pub data: Array4<f32>,

    pub meta: ImageMeta,
}

impl ImageCube {
    /// Create a new image cube from any number of axes. Images with fewer than
    /// four axes are padded with degenerate spectral and/or Stokes axes, and
    /// degenerate axes beyond the fourth are dropped.
    ///
    /// The shape of `data` must be the reverse of the axis lengths (i.e. FITS
    /// memory order).
    pub fn new(mut axes: Vec<Axis>, data: ArrayD<f32>, meta: ImageMeta) -> Result<ImageCube, ImageError> {
        let header_shape: Vec<usize> = axes.iter().rev().map(|a| a.naxis).collect();
        if data.shape() != header_shape.as_slice() {
            return Err(ImageError::ShapeMismatch {
                data: data.shape().to_vec(),
                header: header_shape,
            });
        }
        if axes.len() < 2 {
            return Err(ImageError::TooFewAxes(axes.len()));
        }

        let mut data = data;
        // Drop extra degenerate axes; the slowest-varying axis is first in
        // the data.
        while axes.len() > NUM_IMAGE_AXES {
            let last = &axes[axes.len() - 1];
            if last.naxis != 1 {
                return Err(ImageError::TooManyAxes {
                    axis: axes.len(),
                    ctype: last.ctype.clone(),
                    naxis: last.naxis,
                });
            }
            axes.pop();
            data = data.index_axis_move(ndarray::Axis(0), 0);
        }

        while axes.len() < NUM_IMAGE_AXES {
            let have_spectral = axes.iter().any(|a| a.kind() == AxisKind::Spectral);
            let new_axis = if have_spectral {
                Axis::new("STOKES", 1, 1.0, 1.0, 1.0)
            } else {
                Axis::new("FREQ", 1, meta.rest_freq.unwrap_or(0.0), 1.0, 1.0).with_unit("Hz")
            };
            axes.push(new_axis);
            data.insert_axis_inplace(ndarray::Axis(0));
        }

        let data = data
            .into_dimensionality::<Ix4>()
            .expect("data has been padded to four dimensions");
        Ok(ImageCube { axes, data, meta })
    }

    /// Create a new image cube from four axes and matching data.
    pub fn from_array4(axes: Vec<Axis>, data: Array4<f32>, meta: ImageMeta) -> Result<ImageCube, ImageError> {
        ImageCube::new(axes, data.into_dyn(), meta)
    }

    /// The number of pixels along each axis, in FITS order.
    pub fn dims(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.naxis).collect()
    }

    pub fn axis_kinds(&self) -> Vec<AxisKind> {
        self.axes.iter().map(|a| a.kind()).collect()
    }

    /// The FITS index (0-based) of the first axis with the given kind.
    pub fn find_axis(&self, kind: AxisKind) -> Option<usize> {
        self.axes.iter().position(|a| a.kind() == kind)
    }

    pub fn spectral_axis(&self) -> Option<usize> {
        self.find_axis(AxisKind::Spectral)
    }

    pub fn stokes_axis(&self) -> Option<usize> {
        self.find_axis(AxisKind::Stokes)
    }

    /// Ensure that the first two axes are celestial longitude and latitude.
    pub fn check_celestial_axes(&self) -> Result<(), ImageError> {
        if self.axes[0].kind() == AxisKind::Longitude && self.axes[1].kind() == AxisKind::Latitude
        {
            Ok(())
        } else {
            Err(ImageError::CelestialAxesNotFirst {
                ctype1: self.axes[0].ctype.clone(),
                ctype2: self.axes[1].ctype.clone(),
            })
        }
    }

    /// Check that this image and another are on identical grids. This must be
    /// true before any pixel-wise arithmetic is done.
    pub fn same_grid(&self, other: &ImageCube) -> Result<(), ImageError> {
        for (i, (a, b)) in self.axes.iter().zip(other.axes.iter()).enumerate() {
            a.same_as(b)
                .map_err(|reason| ImageError::GridMismatch { axis: i + 1, reason })?;
        }
        Ok(())
    }

    /// Get a new image with the same metadata as this one, but with different
    /// pixel values.
    pub(crate) fn with_data(&self, data: Array4<f32>) -> ImageCube {
        debug_assert_eq!(data.dim(), self.data.dim());
        ImageCube {
            axes: self.axes.clone(),
            data,
            meta: self.meta.clone(),
        }
    }
}

/// A pixel region on the first two (celestial) axes. Corners are 0-indexed
/// and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: usize,
    pub ymin: usize,
    pub xmax: usize,
    pub ymax: usize,
}

impl BoundingBox {
    pub fn new(xmin: usize, ymin: usize, xmax: usize, ymax: usize) -> Result<BoundingBox, BoundingBoxError> {
        if xmin > xmax || ymin > ymax {
            return Err(BoundingBoxError::Inverted {
                xmin,
                ymin,
                xmax,
                ymax,
            });
        }
        Ok(BoundingBox {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// A box covering an entire `nx` by `ny` image.
    pub fn full(nx: usize, ny: usize) -> BoundingBox {
        BoundingBox {
            xmin: 0,
            ymin: 0,
            xmax: nx.saturating_sub(1),
            ymax: ny.saturating_sub(1),
        }
    }

    pub fn width(&self) -> usize {
        self.xmax - self.xmin + 1
    }

    pub fn height(&self) -> usize {
        self.ymax - self.ymin + 1
    }

    /// Check that the box fits inside an `nx` by `ny` image.
    pub fn validate(&self, nx: usize, ny: usize) -> Result<(), BoundingBoxError> {
        if self.xmax >= nx || self.ymax >= ny {
            return Err(BoundingBoxError::OutOfBounds {
                xmin: self.xmin,
                ymin: self.ymin,
                xmax: self.xmax,
                ymax: self.ymax,
                nx,
                ny,
            });
        }
        Ok(())
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let corners: Vec<usize> = s
            .split(',')
            .map(|c| c.trim().parse())
            .collect::<Result<_, _>>()
            .map_err(|_| BoundingBoxError::Parse(s.to_string()))?;
        match corners.as_slice() {
            &[xmin, ymin, xmax, ymax] => BoundingBox::new(xmin, ymin, xmax, ymax),
            _ => Err(BoundingBoxError::Parse(s.to_string())),
        }
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// A permutation of the four image axes. Output axis `i` is input axis
/// `order[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOrder(pub [usize; NUM_IMAGE_AXES]);

impl AxisOrder {
    pub fn identity() -> AxisOrder {
        AxisOrder([0, 1, 2, 3])
    }

    pub fn is_identity(&self) -> bool {
        *self == AxisOrder::identity()
    }

    pub fn inverse(&self) -> AxisOrder {
        let mut inverse = [0; NUM_IMAGE_AXES];
        for (i, &o) in self.0.iter().enumerate() {
            inverse[o] = i;
        }
        AxisOrder(inverse)
    }

    /// Find the permutation that reorders axes of kinds `from` into the kinds
    /// `to`.
    pub fn between(from: &[AxisKind], to: &[AxisKind]) -> Result<AxisOrder, AxisOrderError> {
        let have = || from.iter().map(|k| k.to_string()).collect();
        if from.len() != NUM_IMAGE_AXES || to.len() != NUM_IMAGE_AXES {
            return Err(AxisOrderError::NoPermutation {
                missing: vec![],
                have: have(),
            });
        }

        let mut used = [false; NUM_IMAGE_AXES];
        let mut order = [0; NUM_IMAGE_AXES];
        let mut missing = vec![];
        for (i, kind) in to.iter().enumerate() {
            match (0..NUM_IMAGE_AXES).find(|&j| from[j] == *kind && !used[j]) {
                Some(j) => {
                    used[j] = true;
                    order[i] = j;
                }
                None => missing.push(kind.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(AxisOrder(order))
        } else {
            Err(AxisOrderError::NoPermutation {
                missing,
                have: have(),
            })
        }
    }
}

impl FromStr for AxisOrder {
    type Err = AxisOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<usize> = s
            .chars()
            .filter(|c| !matches!(c, ',' | ' '))
            .map(|c| c.to_digit(10).map(|d| d as usize))
            .collect::<Option<_>>()
            .ok_or_else(|| AxisOrderError::Parse(s.to_string()))?;
        if digits.len() != NUM_IMAGE_AXES || !digits.iter().copied().sorted().eq(0..NUM_IMAGE_AXES) {
            return Err(AxisOrderError::Parse(s.to_string()));
        }
        let mut order = [0; NUM_IMAGE_AXES];
        order.copy_from_slice(&digits);
        Ok(AxisOrder(order))
    }
}

impl Display for AxisOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}
