// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod no_stderr;
mod run;
mod stages;

use std::{path::Path, process::Output, str::from_utf8};

use assert_cmd::{output::OutputError, Command};
use ndarray::prelude::*;

use feather::{write_image_cube, Axis, Beam, ImageCube, ImageMeta};

/// The rest frequency of CO(2-1) [Hz].
const CO_2_1: f64 = 230.538e9;

fn feather() -> Command {
    Command::cargo_bin("feather").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// An image of a Gaussian blob on a `n` x `n` grid of `cdelt_arcsec` pixels
/// with `nchan` channels. If `freq_first` is false, the Stokes axis comes
/// before the spectral axis, like some single-dish images.
fn make_image(n: usize, nchan: usize, cdelt_arcsec: f64, beam_arcsec: f64, freq_first: bool) -> ImageCube {
    let ra = Axis::new("RA---SIN", n, 83.8221, -cdelt_arcsec / 3600.0, (n / 2 + 1) as f64)
        .with_unit("deg");
    let dec = Axis::new("DEC--SIN", n, -5.3911, cdelt_arcsec / 3600.0, (n / 2 + 1) as f64)
        .with_unit("deg");
    let freq = Axis::new("FREQ", nchan, 230.5e9, 1.0e6, 1.0).with_unit("Hz");
    let stokes = Axis::new("STOKES", 1, 1.0, 1.0, 1.0);

    let sigma = (beam_arcsec / cdelt_arcsec) / 2.3548;
    let c = n as f64 / 2.0;
    let blob = |y: usize, x: usize| {
        let (dx, dy) = (x as f64 - c, y as f64 - c);
        (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp() as f32
    };
    let (axes, data) = if freq_first {
        (
            vec![ra, dec, freq, stokes],
            Array4::from_shape_fn((1, nchan, n, n), |(_, _, y, x)| blob(y, x)),
        )
    } else {
        (
            vec![ra, dec, stokes, freq],
            Array4::from_shape_fn((nchan, 1, n, n), |(_, _, y, x)| blob(y, x)),
        )
    };
    let meta = ImageMeta {
        rest_freq: Some(CO_2_1),
        beam: Some(Beam::circular(beam_arcsec / 3600.0)),
        bunit: Some("Jy/beam".to_string()),
        object: Some("Orion".to_string()),
        equinox: Some(2000.0),
        specsys: Some("LSRK".to_string()),
    };
    ImageCube::from_array4(axes, data, meta).unwrap()
}

/// A primary-beam map on the same grid as [`make_image`] with
/// `freq_first = true`.
fn make_pb(n: usize, nchan: usize, cdelt_arcsec: f64) -> ImageCube {
    let mut pb = make_image(n, nchan, cdelt_arcsec, n as f64 * cdelt_arcsec / 2.0, true);
    pb.meta.beam = None;
    pb.meta.bunit = None;
    pb
}

struct Files {
    lowres: String,
    highres: String,
    pb: String,
}

/// Write a set of inputs for feathering into `dir`. The single-dish image has
/// swapped spectral and Stokes axes.
fn write_inputs(dir: &Path) -> Files {
    let lowres = dir.join("Orion.TP.fits");
    let highres = dir.join("Orion.7m.image.fits");
    let pb = dir.join("Orion.7m.pb.fits");
    write_image_cube(&make_image(16, 3, 3.0, 28.0, false), &lowres).unwrap();
    write_image_cube(&make_image(32, 3, 1.0, 6.0, true), &highres).unwrap();
    write_image_cube(&make_pb(32, 3, 1.0), &pb).unwrap();
    Files {
        lowres: lowres.display().to_string(),
        highres: highres.display().to_string(),
        pb: pb.display().to_string(),
    }
}
