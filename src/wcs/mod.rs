// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Celestial world coordinate systems.
//!
//! Only what is needed to move between pixel grids is implemented: the
//! zenithal `SIN` and `TAN` projections (with the native pole at LONPOLE =
//! 180°, as is the default for zenithal projections) and a linear fallback.
//! `PCi_j`/`CDi_j` rotation matrices are not supported.
//!
//! See Calabretta & Greisen (2002), "Representations of celestial coordinates
//! in FITS", A&A 395, 1077.


use log::warn;

use crate::image::{Axis, AxisKind, ImageCube, ImageError};

/// The projection of a celestial axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Slant orthographic; what radio interferometric images use.
    Sin,

    /// Gnomonic.
    Tan,

    /// Intermediate world coordinates are used directly as longitude and
    /// latitude.
    Linear,
}

impl Projection {
    /// Determine the projection from a celestial `CTYPE`, e.g. "RA---SIN".
    /// Unknown projection codes fall back to [`Projection::Linear`].
    pub fn from_ctype(ctype: &str) -> Projection {
        let code = ctype
            .trim()
            .rsplit('-')
            .next()
            .unwrap_or("")
            .to_uppercase();
        match code.as_str() {
            "SIN" => Projection::Sin,
            "TAN" => Projection::Tan,
            // No projection code at all, or an explicit plate carrée.
            "CAR" => Projection::Linear,
            c if !ctype.contains('-') || c.is_empty() => Projection::Linear,
            c => {
                warn!("Projection '{c}' (from '{ctype}') isn't supported; treating it as linear");
                Projection::Linear
            }
        }
    }
}

/// Maps 0-indexed pixel coordinates on the two celestial axes of an image to
/// celestial coordinates [degrees], and back.
#[derive(Debug, Clone)]
pub struct CelestialWcs {
    lon: Axis,
    lat: Axis,
    projection: Projection,
}

impl CelestialWcs {
    pub fn new(lon: &Axis, lat: &Axis) -> CelestialWcs {
        debug_assert_eq!(lon.kind(), AxisKind::Longitude);
        debug_assert_eq!(lat.kind(), AxisKind::Latitude);
        CelestialWcs {
            lon: lon.clone(),
            lat: lat.clone(),
            projection: Projection::from_ctype(&lon.ctype),
        }
    }

    /// Get the celestial WCS of an image. The first two axes must be
    /// longitude and latitude.
    pub fn from_image(image: &ImageCube) -> Result<CelestialWcs, ImageError> {
        image.check_celestial_axes()?;
        Ok(CelestialWcs::new(&image.axes[0], &image.axes[1]))
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Convert pixel coordinates into (longitude, latitude) [degrees]. `None`
    /// is returned if the pixel is outside the projection's domain.
    pub fn pixel_to_world(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        // Intermediate world coordinates [degrees].
        let ix = self.lon.cdelt * (x + 1.0 - self.lon.crpix);
        let iy = self.lat.cdelt * (y + 1.0 - self.lat.crpix);

        // Direction cosines in the native frame, where the reference point is
        // (0, 0, 1).
        let (l, m) = (ix.to_radians(), iy.to_radians());
        let (l, m, n) = match self.projection {
            Projection::Linear => {
                return Some((normalise_lon(self.lon.crval + ix), self.lat.crval + iy))
            }
            Projection::Sin => {
                let r2 = l * l + m * m;
                if r2 > 1.0 {
                    return None;
                }
                (l, m, (1.0 - r2).sqrt())
            }
            Projection::Tan => {
                let norm = (1.0 + l * l + m * m).sqrt();
                (l / norm, m / norm, 1.0 / norm)
            }
        };

        let (sin_d0, cos_d0) = self.lat.crval.to_radians().sin_cos();
        let sin_d = m * cos_d0 + n * sin_d0;
        // cos(dec) * cos(lon - lon0)
        let cos_d_cos_da = n * cos_d0 - m * sin_d0;
        let lat = sin_d.atan2(l.hypot(cos_d_cos_da));
        let lon = self.lon.crval.to_radians() + l.atan2(cos_d_cos_da);
        Some((normalise_lon(lon.to_degrees()), lat.to_degrees()))
    }

    /// Convert (longitude, latitude) [degrees] into pixel coordinates. `None`
    /// is returned if the coordinate can't be projected (e.g. it's on the far
    /// side of the sky for a `SIN` projection).
    pub fn world_to_pixel(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (ix, iy) = match self.projection {
            Projection::Linear => {
                let mut dlon = lon - self.lon.crval;
                // Take the short way around.
                dlon = (dlon + 180.0).rem_euclid(360.0) - 180.0;
                (dlon, lat - self.lat.crval)
            }
            Projection::Sin | Projection::Tan => {
                let (l, m, n) = native_direction_cosines(
                    lon.to_radians(),
                    lat.to_radians(),
                    self.lon.crval.to_radians(),
                    self.lat.crval.to_radians(),
                );
                let (l, m) = match self.projection {
                    Projection::Sin => {
                        if n < 0.0 {
                            return None;
                        }
                        (l, m)
                    }
                    _ => {
                        if n <= 0.0 {
                            return None;
                        }
                        (l / n, m / n)
                    }
                };
                (l.to_degrees(), m.to_degrees())
            }
        };

        Some((
            ix / self.lon.cdelt + self.lon.crpix - 1.0,
            iy / self.lat.cdelt + self.lat.crpix - 1.0,
        ))
    }
}

/// Direction cosines (l, m, n) of a celestial coordinate in the native frame
/// of a zenithal projection with the reference point at (lon0, lat0) and
/// LONPOLE = 180°. l points east, m north and n at the reference point. All
/// angles in radians.
fn native_direction_cosines(lon: f64, lat: f64, lon0: f64, lat0: f64) -> (f64, f64, f64) {
    let (sin_d, cos_d) = lat.sin_cos();
    let (sin_d0, cos_d0) = lat0.sin_cos();
    let (sin_da, cos_da) = (lon - lon0).sin_cos();

    let l = cos_d * sin_da;
    let m = sin_d * cos_d0 - cos_d * sin_d0 * cos_da;
    let n = sin_d * sin_d0 + cos_d * cos_d0 * cos_da;
    (l, m, n)
}

/// Wrap a longitude into [0, 360).
fn normalise_lon(lon: f64) -> f64 {
    lon.rem_euclid(360.0)
}
