// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! File stuff (input/output, reading/writing) for image cubes.

mod header;
pub(crate) mod read;
pub(crate) mod write;

pub use header::{header_value, image_header_summary};
pub use read::{read_image_cube, FitsError, ImageReadError};
pub use write::{write_image_cube, FileWriteError, ImageWriteError};
