// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cropping images to a box on the celestial axes.

use log::debug;
use ndarray::s;

use super::SubimageError;
use crate::image::{BoundingBox, ImageCube};

/// Cut out the pixels inside `bbox` (inclusive) on the first two axes. All
/// other axes are kept as they are. The reference pixels of the first two
/// axes are shifted so that the world coordinates of the kept pixels don't
/// change.
pub fn subimage(image: &ImageCube, bbox: BoundingBox) -> Result<ImageCube, SubimageError> {
    image.check_celestial_axes()?;
    bbox.validate(image.axes[0].naxis, image.axes[1].naxis)?;
    debug!("Cutting out box {bbox} from an image with dims {:?}", image.dims());

    let data = image
        .data
        .slice(s![.., .., bbox.ymin..=bbox.ymax, bbox.xmin..=bbox.xmax])
        .to_owned();

    let mut axes = image.axes.clone();
    axes[0].naxis = bbox.width();
    axes[0].crpix -= bbox.xmin as f64;
    axes[1].naxis = bbox.height();
    axes[1].crpix -= bbox.ymin as f64;

    Ok(ImageCube {
        axes,
        data,
        meta: image.meta.clone(),
    })
}
