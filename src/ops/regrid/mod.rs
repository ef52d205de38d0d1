// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Resampling an image onto another image's grid.
//!
//! The celestial axes are bilinearly interpolated; each output pixel centre is
//! converted to a celestial coordinate with the template's WCS, and then to a
//! (fractional) source pixel with the source's WCS. The spectral axis is
//! linearly interpolated, and Stokes planes are matched exactly.


use itertools::Itertools;
use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;

use super::{plane_progress_bar, RegridError};
use crate::{
    image::{Axis, AxisKind, ImageCube},
    wcs::CelestialWcs,
};

/// Fractional pixel coordinates within this distance of an integer are
/// snapped to it.
const SNAP: f64 = 1e-6;

/// For each output pixel along a non-celestial axis, the source pixels that
/// contribute to it and their weights. An empty list means the output pixel
/// is blank.
type AxisWeights = Vec<Vec<(usize, f64)>>;

/// Regrid `source` onto the grid of `template`. The output has the template's
/// celestial grid (and its spectral grid when both images have more than one
/// channel), but the axis order and metadata (units, beam, rest frequency)
/// of `source`. Output pixels that don't land on the source are NaN.
pub fn regrid(source: &ImageCube, template: &ImageCube) -> Result<ImageCube, RegridError> {
    source.check_celestial_axes().map_err(RegridError::Source)?;
    template
        .check_celestial_axes()
        .map_err(RegridError::Template)?;

    let mut out_axes = source.axes.clone();
    out_axes[0] = template.axes[0].clone();
    out_axes[1] = template.axes[1].clone();

    // Work out the non-celestial axes (FITS axes 3 and 4) independently.
    let mut weights: Vec<AxisWeights> = Vec::with_capacity(2);
    for i in 2..4 {
        let src_axis = &source.axes[i];
        let (out_axis, w) = match src_axis.kind() {
            AxisKind::Spectral => match template.spectral_axis().map(|t| &template.axes[t]) {
                Some(t) => spectral_weights(src_axis, t)?,
                None => identity_weights(src_axis),
            },
            AxisKind::Stokes => match template.stokes_axis().map(|t| &template.axes[t]) {
                Some(t) => stokes_weights(src_axis, t)?,
                None => identity_weights(src_axis),
            },
            _ => identity_weights(src_axis),
        };
        out_axes[i] = out_axis;
        weights.push(w);
    }
    let (weights3, weights4) = (&weights[0], &weights[1]);

    let pixel_map = celestial_pixel_map(source, template)?;

    let (n4, n3) = (out_axes[3].naxis, out_axes[2].naxis);
    let (ny, nx) = pixel_map.dim();
    debug!(
        "Regridding {:?} onto {nx}x{ny} celestial pixels, {n3}x{n4} planes",
        source.dims()
    );

    let progress = plane_progress_bar(n4 * n3, "Regridding");
    let planes: Vec<Array2<f32>> = (0..n4 * n3)
        .into_par_iter()
        .map(|p| {
            let (i4, i3) = (p / n3, p % n3);
            let mut contributions = vec![];
            for &(j4, w4) in &weights4[i4] {
                for &(j3, w3) in &weights3[i3] {
                    contributions.push((source.data.slice(s![j4, j3, .., ..]), w4 * w3));
                }
            }
            let plane = pixel_map.map(|m| match m {
                Some(m) if !contributions.is_empty() => {
                    let mut sum = 0.0;
                    for (src_plane, w) in &contributions {
                        sum += w * bilinear(*src_plane, m);
                    }
                    sum as f32
                }
                _ => f32::NAN,
            });
            progress.inc(1);
            plane
        })
        .collect();
    progress.finish();

    let mut data = Array4::from_elem((n4, n3, ny, nx), f32::NAN);
    for (p, plane) in planes.into_iter().enumerate() {
        data.slice_mut(s![p / n3, p % n3, .., ..]).assign(&plane);
    }

    Ok(ImageCube {
        axes: out_axes,
        data,
        meta: source.meta.clone(),
    })
}

/// A source pixel position for bilinear interpolation: the lower-left pixel
/// and the fractional offsets from it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelPosition {
    x0: usize,
    y0: usize,
    tx: f64,
    ty: f64,
}

impl PixelPosition {
    /// `None` if the (fractional) pixel lies outside a grid with `n` pixels.
    fn new(sx: f64, sy: f64, nx: usize, ny: usize) -> Option<PixelPosition> {
        let (x0, tx) = split_pixel(sx, nx)?;
        let (y0, ty) = split_pixel(sy, ny)?;
        Some(PixelPosition { x0, y0, tx, ty })
    }
}

/// Split a fractional pixel into an integer pixel and a fraction in [0, 1).
/// When the fraction is non-zero, the next pixel is guaranteed to exist.
fn split_pixel(p: f64, n: usize) -> Option<(usize, f64)> {
    if !p.is_finite() {
        return None;
    }
    let rounded = p.round();
    let p = if (p - rounded).abs() < SNAP { rounded } else { p };
    if p < 0.0 || p > (n - 1) as f64 {
        return None;
    }
    let i = p.floor();
    Some((i as usize, p - i))
}

/// Bilinearly interpolate a plane (indexed `[y, x]`). If any pixel with a
/// non-zero weight is NaN, then so is the result.
fn bilinear(plane: ArrayView2<f32>, pos: &PixelPosition) -> f64 {
    let mut sum = 0.0;
    for (dy, wy) in [(0, 1.0 - pos.ty), (1, pos.ty)] {
        if wy == 0.0 {
            continue;
        }
        for (dx, wx) in [(0, 1.0 - pos.tx), (1, pos.tx)] {
            if wx == 0.0 {
                continue;
            }
            sum += wy * wx * plane[(pos.y0 + dy, pos.x0 + dx)] as f64;
        }
    }
    sum
}

/// For every celestial pixel of the template, find where it lands on the
/// source.
fn celestial_pixel_map(
    source: &ImageCube,
    template: &ImageCube,
) -> Result<Array2<Option<PixelPosition>>, RegridError> {
    let src_wcs = CelestialWcs::new(&source.axes[0], &source.axes[1]);
    let tmpl_wcs = CelestialWcs::new(&template.axes[0], &template.axes[1]);
    let (src_nx, src_ny) = (source.axes[0].naxis, source.axes[1].naxis);
    let (nx, ny) = (template.axes[0].naxis, template.axes[1].naxis);

    let mut map = Array2::from_elem((ny, nx), None);
    map.axis_iter_mut(ndarray::Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for (x, m) in row.iter_mut().enumerate() {
                *m = tmpl_wcs
                    .pixel_to_world(x as f64, y as f64)
                    .and_then(|(lon, lat)| src_wcs.world_to_pixel(lon, lat))
                    .and_then(|(sx, sy)| PixelPosition::new(sx, sy, src_nx, src_ny));
            }
        });

    let num_mapped = map.iter().filter(|m| m.is_some()).count();
    trace!("{num_mapped} of {} template pixels land on the source", nx * ny);
    if num_mapped == 0 {
        return Err(RegridError::NoOverlap);
    }
    Ok(map)
}

/// Don't regrid this axis; output pixel `i` is source pixel `i`.
fn identity_weights(axis: &Axis) -> (Axis, AxisWeights) {
    (axis.clone(), (0..axis.naxis).map(|i| vec![(i, 1.0)]).collect())
}

/// Linearly interpolate a spectral axis onto the template's, if both have
/// more than one channel.
fn spectral_weights(src: &Axis, template: &Axis) -> Result<(Axis, AxisWeights), RegridError> {
    match (src.naxis, template.naxis) {
        // A single plane is copied into a single channel.
        (1, 1) => Ok((template.clone(), vec![vec![(0, 1.0)]])),
        // Nothing sensible can be interpolated; keep the source's channels.
        (1, _) | (_, 1) => Ok(identity_weights(src)),
        _ => {
            if !src
                .ctype
                .trim()
                .eq_ignore_ascii_case(template.ctype.trim())
            {
                return Err(RegridError::SpectralMismatch {
                    source_ctype: src.ctype.clone(),
                    template_ctype: template.ctype.clone(),
                });
            }
            let weights = (0..template.naxis)
                .map(|k| {
                    let p = src.world_to_pixel(template.pixel_to_world(k as f64));
                    match split_pixel(p, src.naxis) {
                        Some((i, t)) if t == 0.0 => vec![(i, 1.0)],
                        Some((i, t)) => vec![(i, 1.0 - t), (i + 1, t)],
                        None => vec![],
                    }
                })
                .collect();
            Ok((template.clone(), weights))
        }
    }
}

/// Pick out the template's Stokes parameters from the source. Every Stokes
/// value in the template must be present in the source.
fn stokes_weights(src: &Axis, template: &Axis) -> Result<(Axis, AxisWeights), RegridError> {
    let weights = (0..template.naxis)
        .map(|k| {
            let stokes = template.pixel_to_world(k as f64).round();
            (0..src.naxis)
                .find(|&j| src.pixel_to_world(j as f64).round() == stokes)
                .map(|j| vec![(j, 1.0)])
                .ok_or(RegridError::MissingStokes { stokes })
        })
        .collect::<Result<Vec<_>, _>>()?;
    trace!(
        "Stokes mapping: {}",
        weights.iter().map(|w| format!("{w:?}")).join(", ")
    );
    Ok((template.clone(), weights))
}
