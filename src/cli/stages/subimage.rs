// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{finish, read};
use crate::{image::BoundingBox, ops::subimage, FeatherError};

/// Cut a spatial box out of an image. All channels and Stokes parameters are
/// kept.
#[derive(Parser, Debug, Clone)]
pub struct SubimageArgs {
    /// Path to the image.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// The box to keep, as "xmin,ymin,xmax,ymax" in 0-indexed pixels. Both
    /// corners are included.
    #[clap(short, long = "box")]
    bbox: String,

    /// Where to write the subimage.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl SubimageArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let bbox: BoundingBox = self.bbox.parse()?;
        let image = read(&self.image, "image")?;
        info!("Cutting out box {bbox}");
        let sub = subimage(&image, bbox)?;
        finish(&sub, &self.output, dry_run)
    }
}
