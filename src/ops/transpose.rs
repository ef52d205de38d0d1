// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reordering image axes.

use log::debug;

use super::TransposeError;
use crate::image::{AxisOrder, ImageCube};

/// Reorder the axes of an image; output axis `i` is input axis `order[i]`.
/// The pixel data and the axis descriptions are permuted together.
pub fn transpose(image: &ImageCube, order: AxisOrder) -> Result<ImageCube, TransposeError> {
    if order.is_identity() {
        return Ok(image.clone());
    }
    debug!("Transposing axes with order {order}");

    let axes = order.0.iter().map(|&i| image.axes[i].clone()).collect();
    // Data axes run backwards relative to FITS axes.
    let n = order.0.len();
    let mut data_order = [0; 4];
    for (i, d) in data_order.iter_mut().enumerate() {
        *d = n - 1 - order.0[n - 1 - i];
    }
    let data = image
        .data
        .view()
        .permuted_axes(data_order)
        .as_standard_layout()
        .into_owned();

    Ok(ImageCube {
        axes,
        data,
        meta: image.meta.clone(),
    })
}

/// Work out how `image`'s axes need to be reordered to match the axis kinds
/// of `template` (e.g. the frequency and Stokes axes are often switched
/// between single-dish and interferometric images).
pub fn detect_axis_order(image: &ImageCube, template: &ImageCube) -> Result<AxisOrder, TransposeError> {
    let order = AxisOrder::between(&image.axis_kinds(), &template.axis_kinds())?;
    Ok(order)
}
