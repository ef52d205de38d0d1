// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests: small synthetic image cubes that look like
//! what comes out of an interferometer or a single dish.

use ndarray::prelude::*;

use crate::image::{Axis, Beam, ImageCube, ImageMeta};

/// The rest frequency of CO(2-1) [Hz].
pub(crate) const CO_2_1: f64 = 230.538e9;

/// Celestial axes with `cdelt_arcsec` pixels, centred near Orion KL, followed
/// by a spectral and a Stokes axis.
pub(crate) fn cube_axes(nx: usize, ny: usize, nchan: usize, cdelt_arcsec: f64) -> Vec<Axis> {
    vec![
        Axis::new(
            "RA---SIN",
            nx,
            83.8221,
            -cdelt_arcsec / 3600.0,
            (nx / 2 + 1) as f64,
        )
        .with_unit("deg"),
        Axis::new(
            "DEC--SIN",
            ny,
            -5.3911,
            cdelt_arcsec / 3600.0,
            (ny / 2 + 1) as f64,
        )
        .with_unit("deg"),
        Axis::new("FREQ", nchan, 230.5e9, 1.0e6, 1.0).with_unit("Hz"),
        Axis::new("STOKES", 1, 1.0, 1.0, 1.0),
    ]
}

pub(crate) fn test_meta(beam: Option<Beam>) -> ImageMeta {
    ImageMeta {
        rest_freq: Some(CO_2_1),
        beam,
        bunit: Some("Jy/beam".to_string()),
        object: Some("Orion".to_string()),
        equinox: Some(2000.0),
        specsys: Some("LSRK".to_string()),
    }
}

/// Make an image cube, with pixel values given by `f(x, y, chan)`.
pub(crate) fn make_cube<F>(axes: Vec<Axis>, beam: Option<Beam>, f: F) -> ImageCube
where
    F: Fn(usize, usize, usize) -> f32,
{
    let shape = (axes[3].naxis, axes[2].naxis, axes[1].naxis, axes[0].naxis);
    let data = Array4::from_shape_fn(shape, |(_, c, y, x)| f(x, y, c));
    ImageCube::from_array4(axes, data, test_meta(beam)).unwrap()
}

/// A circular Gaussian source with peak `amp` and FWHM `fwhm_pix` [pixels]
/// centred at (`x0`, `y0`).
pub(crate) fn gaussian(x: usize, y: usize, x0: f64, y0: f64, fwhm_pix: f64, amp: f64) -> f32 {
    let sigma = fwhm_pix * crate::constants::FWHM_TO_SIGMA;
    let dx = x as f64 - x0;
    let dy = y as f64 - y0;
    (amp * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()) as f32
}

/// A primary-beam-like map: 1 at the centre, falling off as a Gaussian and
/// set to exactly zero beyond `radius_pix` of the centre.
pub(crate) fn pb_map(axes: Vec<Axis>, radius_pix: f64) -> ImageCube {
    let (nx, ny) = (axes[0].naxis, axes[1].naxis);
    let (x0, y0) = ((nx / 2) as f64, (ny / 2) as f64);
    let mut pb = make_cube(axes, None, |x, y, _| {
        let r = (x as f64 - x0).hypot(y as f64 - y0);
        if r > radius_pix {
            0.0
        } else {
            gaussian(x, y, x0, y0, 2.0 * radius_pix, 1.0)
        }
    });
    pb.meta.bunit = None;
    pb
}
