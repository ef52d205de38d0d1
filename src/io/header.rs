// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Human-readable views of an image's header.

use std::fmt::Write;

use itertools::Itertools;

use crate::image::ImageCube;

/// A multi-line summary of an image's header, in the spirit of `imhead`.
pub fn image_header_summary(image: &ImageCube) -> String {
    let meta = &image.meta;
    let mut s = String::new();
    // Writing to a String can't fail.
    let _ = writeln!(
        s,
        "Object:         {}",
        meta.object.as_deref().unwrap_or("<none>")
    );
    let _ = writeln!(s, "Shape:          [{}]", image.dims().iter().join(", "));
    let _ = writeln!(
        s,
        "Brightness:     {}",
        meta.bunit.as_deref().unwrap_or("<none>")
    );
    match meta.rest_freq {
        Some(f) => {
            let _ = writeln!(s, "Rest frequency: {} Hz ({:.6} GHz)", f, f / 1e9);
        }
        None => {
            let _ = writeln!(s, "Rest frequency: <none>");
        }
    }
    match meta.beam {
        Some(b) => {
            let _ = writeln!(s, "Restoring beam: {b}");
        }
        None => {
            let _ = writeln!(s, "Restoring beam: <none>");
        }
    }
    if let Some(specsys) = meta.specsys.as_deref() {
        let _ = writeln!(s, "Spectral frame: {specsys}");
    }
    if let Some(equinox) = meta.equinox {
        let _ = writeln!(s, "Equinox:        {equinox}");
    }

    let _ = writeln!(
        s,
        "{:<5} {:<10} {:>7} {:>22} {:>12} {:>22}  Unit",
        "Axis", "Type", "Pixels", "Reference value", "Ref. pixel", "Increment"
    );
    for (i, axis) in image.axes.iter().enumerate() {
        let _ = writeln!(
            s,
            "{:<5} {:<10} {:>7} {:>22.12e} {:>12.3} {:>22.12e}  {}",
            i + 1,
            axis.ctype,
            axis.naxis,
            axis.crval,
            axis.crpix,
            axis.cdelt,
            axis.cunit.as_deref().unwrap_or("")
        );
    }
    s
}

/// Look up a single header keyword of an image. Keys are case insensitive.
/// `None` is returned if the image doesn't have the key.
pub fn header_value(image: &ImageCube, key: &str) -> Option<String> {
    let key = key.trim().to_uppercase();
    let meta = &image.meta;
    let beam = meta.beam;

    // Axis keywords end in the (1-indexed) axis number.
    if let Some(split) = key.find(|c: char| c.is_ascii_digit()) {
        let (name, num) = key.split_at(split);
        let axis = num
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| image.axes.get(i))?;
        return match name {
            "NAXIS" => Some(axis.naxis.to_string()),
            "CTYPE" => Some(axis.ctype.clone()),
            "CRVAL" => Some(axis.crval.to_string()),
            "CDELT" => Some(axis.cdelt.to_string()),
            "CRPIX" => Some(axis.crpix.to_string()),
            "CUNIT" => axis.cunit.clone(),
            _ => None,
        };
    }

    match key.as_str() {
        "NAXIS" => Some(image.axes.len().to_string()),
        "SHAPE" => Some(format!("[{}]", image.dims().iter().join(", "))),
        "RESTFRQ" | "RESTFREQ" => meta.rest_freq.map(|f| f.to_string()),
        "BMAJ" => beam.map(|b| b.major_deg.to_string()),
        "BMIN" => beam.map(|b| b.minor_deg.to_string()),
        "BPA" => beam.map(|b| b.pa_deg.to_string()),
        "BUNIT" => meta.bunit.clone(),
        "OBJECT" => meta.object.clone(),
        "EQUINOX" => meta.equinox.map(|e| e.to_string()),
        "SPECSYS" => meta.specsys.clone(),
        _ => None,
    }
}
