// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use super::{finish, read};
use crate::{ops::regrid, FeatherError};

/// Resample an image onto the grid of a template image.
#[derive(Parser, Debug, Clone)]
pub struct RegridArgs {
    /// Path to the image to be regridded.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// The image whose grid is used.
    #[clap(short, long, parse(from_os_str))]
    template: PathBuf,

    /// Where to write the regridded image.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl RegridArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let image = read(&self.image, "image")?;
        let template = read(&self.template, "template")?;
        let regridded = regrid(&image, &template)?;
        finish(&regridded, &self.output, dry_run)
    }
}
