// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Changing the rest frequency of an image.

use log::debug;

use super::ReframeError;
use crate::image::ImageCube;

/// Do two (optional) rest frequencies agree to within `rel_tol`? A missing
/// rest frequency never matches anything.
pub fn rest_frequencies_match(a: Option<f64>, b: Option<f64>, rel_tol: f64) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() <= rel_tol * a.abs().max(b.abs()),
        _ => false,
    }
}

/// Set the rest frequency [Hz] of an image. The spectral axis must be in
/// frequency units; the channel frequencies are not changed, only the
/// frequency that velocities would be measured against.
pub fn reframe(mut image: ImageCube, rest_freq_hz: f64) -> Result<ImageCube, ReframeError> {
    if !rest_freq_hz.is_finite() || rest_freq_hz <= 0.0 {
        return Err(ReframeError::BadRestFreq(rest_freq_hz));
    }

    let spectral = image
        .spectral_axis()
        .map(|i| &image.axes[i])
        .ok_or(ReframeError::NoSpectralAxis)?;
    let is_freq = spectral.ctype.trim().to_uppercase().starts_with("FREQ");
    // A missing unit is taken to be Hz.
    let unit_is_hz = spectral
        .cunit
        .as_deref()
        .map(|u| u.trim().eq_ignore_ascii_case("Hz"))
        .unwrap_or(true);
    if !is_freq || !unit_is_hz {
        return Err(ReframeError::NotFrequency {
            ctype: spectral.ctype.clone(),
            unit: spectral.cunit.clone().unwrap_or_default(),
        });
    }

    debug!(
        "Changing rest frequency from {:?} Hz to {rest_freq_hz} Hz",
        image.meta.rest_freq
    );
    image.meta.rest_freq = Some(rest_freq_hz);
    Ok(image)
}
