// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Combining a high-resolution (interferometric) image with a low-resolution
//! (single-dish) image in the Fourier domain.
//!
//! Each plane of both images is Fourier transformed. With `W(u, v)` being the
//! Fourier transform of the low-resolution beam (normalised to 1 at the
//! origin), the feathered transform is
//!
//! `F = (1 - W) F_high + W s (Ω_high / Ω_low) F_low`
//!
//! where `s` is the single-dish scale factor and `Ω` are the beam areas. The
//! low-resolution image dominates the short spacings and the high-resolution
//! image the long spacings; the `Ω` ratio converts Jy/(low-res beam) into
//! Jy/(high-res beam).


use log::{debug, trace};
use ndarray::{prelude::*, Zip};
use rayon::prelude::*;

use super::{plane_progress_bar, FeatherAlgError};
use crate::{
    cli::Warn,
    constants::DEFAULT_SD_FACTOR,
    image::{Beam, ImageCube},
    math::{fft_freqs, Fft2d},
};

/// Knobs for [`feather`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatherOptions {
    /// The scale factor applied to the low-resolution image.
    pub sd_factor: f64,

    /// If set, used instead of the low-resolution image's restoring beam.
    pub lowres_beam: Option<Beam>,
}

impl Default for FeatherOptions {
    fn default() -> Self {
        FeatherOptions {
            sd_factor: DEFAULT_SD_FACTOR,
            lowres_beam: None,
        }
    }
}

/// Feather two images on the same grid. The output takes its metadata
/// (including the restoring beam) from the high-resolution image. Pixels that
/// are NaN in the high-resolution image are NaN in the output; NaN pixels
/// elsewhere are treated as zero.
pub fn feather(
    highres: &ImageCube,
    lowres: &ImageCube,
    options: &FeatherOptions,
) -> Result<ImageCube, FeatherAlgError> {
    highres.same_grid(lowres)?;
    highres.check_celestial_axes()?;
    if !options.sd_factor.is_finite() || options.sd_factor <= 0.0 {
        return Err(FeatherAlgError::BadSdFactor(options.sd_factor));
    }

    let high_beam = highres.meta.beam.ok_or(FeatherAlgError::MissingBeam {
        which: "high-resolution",
    })?;
    let low_beam = options
        .lowres_beam
        .or(lowres.meta.beam)
        .ok_or(FeatherAlgError::MissingBeam {
            which: "low-resolution",
        })?;
    if high_beam.area_sr() > low_beam.area_sr() {
        format!(
            "The high-resolution beam ({high_beam}) is bigger than the low-resolution beam ({low_beam})"
        )
        .warn();
    }
    if highres.meta.bunit != lowres.meta.bunit {
        format!(
            "The high- and low-resolution images have different units ({} vs. {})",
            highres.meta.bunit.as_deref().unwrap_or("<none>"),
            lowres.meta.bunit.as_deref().unwrap_or("<none>")
        )
        .warn();
    }

    let scale = options.sd_factor * high_beam.area_sr() / low_beam.area_sr();
    debug!("Feathering with low-resolution beam {low_beam}, high-resolution beam {high_beam}");
    debug!("Low-resolution scale factor: {scale}");

    let weights = lowres_weights(
        &low_beam,
        highres.axes[0].naxis,
        highres.axes[1].naxis,
        highres.axes[0].cdelt,
        highres.axes[1].cdelt,
    );
    trace!(
        "Low-resolution weight at the highest spatial frequency: {}",
        weights[(highres.axes[1].naxis / 2, highres.axes[0].naxis / 2)]
    );
    let fft = Fft2d::new(highres.axes[0].naxis, highres.axes[1].naxis);

    let (n4, n3, ny, nx) = highres.data.dim();
    let progress = plane_progress_bar(n4 * n3, "Feathering");
    let planes: Vec<Array2<f32>> = (0..n4 * n3)
        .into_par_iter()
        .map(|p| {
            let (i4, i3) = (p / n3, p % n3);
            let high = highres.data.slice(s![i4, i3, .., ..]);
            let low = lowres.data.slice(s![i4, i3, .., ..]);
            let plane = feather_plane(high, low, &weights, scale, &fft);
            progress.inc(1);
            plane
        })
        .collect();
    progress.finish();

    let mut data = Array4::zeros((n4, n3, ny, nx));
    for (p, plane) in planes.into_iter().enumerate() {
        data.slice_mut(s![p / n3, p % n3, .., ..]).assign(&plane);
    }
    Ok(highres.with_data(data))
}

/// The low-resolution weights `W` for every FFT sample of an `nx` by `ny`
/// plane. `cdelt_x` and `cdelt_y` are the pixel sizes [degrees].
fn lowres_weights(beam: &Beam, nx: usize, ny: usize, cdelt_x: f64, cdelt_y: f64) -> Array2<f64> {
    // FFT frequencies are in cycles per pixel; convert to cycles per degree.
    // A negative increment (e.g. RA) flips the direction of east.
    let u_east: Vec<f64> = fft_freqs(nx).into_iter().map(|f| f / cdelt_x).collect();
    let u_north: Vec<f64> = fft_freqs(ny).into_iter().map(|f| f / cdelt_y).collect();
    Array2::from_shape_fn((ny, nx), |(y, x)| beam.fourier_weight(u_east[x], u_north[y]))
}

fn feather_plane(
    high: ArrayView2<f32>,
    low: ArrayView2<f32>,
    weights: &Array2<f64>,
    scale: f64,
    fft: &Fft2d,
) -> Array2<f32> {
    let zero_nan = |v: &f32| if v.is_nan() { 0.0 } else { *v as f64 };
    let f_high = fft.forward(high.map(zero_nan).view());
    let f_low = fft.forward(low.map(zero_nan).view());

    let mut combined = f_high;
    Zip::from(&mut combined)
        .and(&f_low)
        .and(weights)
        .for_each(|h, &l, &w| *h = *h * (1.0 - w) + l * (w * scale));

    let mut out = fft.inverse_real(combined).mapv(|v| v as f32);
    Zip::from(&mut out).and(&high).for_each(|o, &h| {
        if h.is_nan() {
            *o = f32::NAN;
        }
    });
    out
}
