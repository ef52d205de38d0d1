// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Combine a single-dish (low-resolution) radio image with an interferometric
(high-resolution) image of the same field by feathering.
 */

mod cli;
pub mod constants;
pub mod image;
pub mod io;
pub(crate) mod math;
pub mod ops;
mod params;
pub mod unit_parsing;
pub mod wcs;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

/// Are progress bars being drawn? This should only ever be enabled by CLI
/// code.
static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);

// Re-exports.
pub use cli::{Feather, FeatherError};
pub use image::{Axis, AxisKind, AxisOrder, Beam, BoundingBox, ImageCube, ImageMeta};
pub use io::{header_value, image_header_summary, read_image_cube, write_image_cube};
pub use ops::FeatherOptions;
