// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read image cubes from FITS files.

pub(crate) mod fits;

pub use fits::FitsError;

use std::path::Path;

use fitsio::{hdu::FitsHdu, FitsFile};
use log::{debug, trace, warn};
use ndarray::{ArrayD, IxDyn};
use thiserror::Error;

use crate::image::{Axis, Beam, ImageCube, ImageError, ImageMeta};
use fits::*;

#[derive(Error, Debug)]
pub enum ImageReadError {
    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error("{file}: {err}")]
    Image { file: String, err: ImageError },

    #[error("{file}: The header says there are {expected} pixels, but {got} were read")]
    PixelCount {
        file: String,
        expected: usize,
        got: usize,
    },
}

/// Read an image cube from a FITS file. The first HDU with image data is used.
pub fn read_image_cube<P: AsRef<Path>>(file: P) -> Result<ImageCube, ImageReadError> {
    let file = file.as_ref();
    debug!("Reading image {}", file.display());
    let mut fptr = fits_open(file)?;
    let hdu = fits_find_image_hdu(&mut fptr)?;

    let naxis: usize = fits_get_required_key(&mut fptr, &hdu, "NAXIS")?;
    let axes = (1..=naxis)
        .map(|i| read_axis(&mut fptr, &hdu, i))
        .collect::<Result<Vec<_>, _>>()?;
    let meta = read_meta(&mut fptr, &hdu)?;
    let rotation = rotation_keys(&mut fptr, &hdu, naxis)?;
    if !rotation.is_empty() {
        warn!(
            "{}: Rotated coordinates aren't supported; ignoring {}",
            file.display(),
            rotation.join(", ")
        );
    }

    let shape: Vec<usize> = axes.iter().rev().map(|a| a.naxis).collect();
    let expected = shape.iter().product();
    let pixels: Vec<f32> = fits_get_image(&mut fptr, &hdu)?;
    if pixels.len() != expected {
        return Err(ImageReadError::PixelCount {
            file: file.display().to_string(),
            expected,
            got: pixels.len(),
        });
    }
    // Unwrap is safe; the number of pixels was checked above.
    let data = ArrayD::from_shape_vec(IxDyn(&shape), pixels).unwrap();

    let image = ImageCube::new(axes, data, meta).map_err(|err| ImageReadError::Image {
        file: file.display().to_string(),
        err,
    })?;
    trace!("{} axes: {:?}", file.display(), image.axes);
    Ok(image)
}

fn read_axis(fptr: &mut FitsFile, hdu: &FitsHdu, i: usize) -> Result<Axis, FitsError> {
    let naxis: usize = fits_get_required_key(fptr, hdu, &format!("NAXIS{i}"))?;
    // Defaults follow the FITS standard.
    let ctype: String = fits_get_optional_key(fptr, hdu, &format!("CTYPE{i}"))?.unwrap_or_default();
    let crval: f64 = fits_get_optional_key(fptr, hdu, &format!("CRVAL{i}"))?.unwrap_or(0.0);
    let crpix: f64 = fits_get_optional_key(fptr, hdu, &format!("CRPIX{i}"))?.unwrap_or(0.0);
    let cdelt: f64 = match fits_get_optional_key(fptr, hdu, &format!("CDELT{i}"))? {
        Some(c) => c,
        // Only the diagonal of a CD matrix is used.
        None => fits_get_optional_key(fptr, hdu, &format!("CD{i}_{i}"))?.unwrap_or(1.0),
    };
    let cunit: Option<String> = fits_get_optional_key(fptr, hdu, &format!("CUNIT{i}"))?;

    Ok(Axis {
        ctype: ctype.trim().to_string(),
        naxis,
        crval,
        cdelt,
        crpix,
        cunit: cunit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
    })
}

/// The keys describing a rotated pixel grid (non-zero `CROTAi`, or
/// off-diagonal `CDi_j`/`PCi_j` elements). Only the diagonal of the
/// coordinate matrix is used when reading axes, so these are ignored.
pub(super) fn rotation_keys(fptr: &mut FitsFile, hdu: &FitsHdu, naxis: usize) -> Result<Vec<String>, FitsError> {
    let mut keys = vec![];
    for i in 1..=naxis {
        let key = format!("CROTA{i}");
        if let Some(v) = fits_get_optional_key::<f64>(fptr, hdu, &key)? {
            if v != 0.0 {
                keys.push(key);
            }
        }
        for j in (1..=naxis).filter(|&j| j != i) {
            for prefix in ["CD", "PC"] {
                let key = format!("{prefix}{i}_{j}");
                if let Some(v) = fits_get_optional_key::<f64>(fptr, hdu, &key)? {
                    if v != 0.0 {
                        keys.push(key);
                    }
                }
            }
        }
    }
    Ok(keys)
}

fn read_meta(fptr: &mut FitsFile, hdu: &FitsHdu) -> Result<ImageMeta, FitsError> {
    let rest_freq: Option<f64> = match fits_get_optional_key(fptr, hdu, "RESTFRQ")? {
        Some(f) => Some(f),
        None => fits_get_optional_key(fptr, hdu, "RESTFREQ")?,
    };

    let bmaj: Option<f64> = fits_get_optional_key(fptr, hdu, "BMAJ")?;
    let bmin: Option<f64> = fits_get_optional_key(fptr, hdu, "BMIN")?;
    let bpa: Option<f64> = fits_get_optional_key(fptr, hdu, "BPA")?;
    let beam = match (bmaj, bmin) {
        (Some(major), Some(minor)) if major > 0.0 && minor > 0.0 => {
            Some(Beam::from_fwhm(major, minor, bpa.unwrap_or(0.0)))
        }
        _ => None,
    };

    // EQUINOX is sometimes written as a string (e.g. 'J2000'); don't fail on
    // those.
    let equinox = fits_get_optional_key::<String>(fptr, hdu, "EQUINOX")?.and_then(|e| {
        e.trim()
            .trim_start_matches(|c| c == 'J' || c == 'B')
            .parse()
            .ok()
    });

    let string_key = |fptr: &mut FitsFile, key: &str| -> Result<Option<String>, FitsError> {
        Ok(fits_get_optional_key::<String>(fptr, hdu, key)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    };

    Ok(ImageMeta {
        rest_freq,
        beam,
        bunit: string_key(fptr, "BUNIT")?,
        object: string_key(fptr, "OBJECT")?,
        equinox,
        specsys: string_key(fptr, "SPECSYS")?,
    })
}
