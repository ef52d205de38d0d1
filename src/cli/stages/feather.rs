// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{finish, read};
use crate::{cli::common::FeatherArgs, ops::feather, FeatherError};

/// Feather a high-resolution image with a low-resolution image. Both images
/// must already be on the same grid, with the same axis order.
#[derive(Parser, Debug, Clone)]
pub struct FeatherImagesArgs {
    /// The high-resolution (interferometric) image.
    #[clap(short = 'i', long, parse(from_os_str))]
    highres: PathBuf,

    /// The low-resolution (single-dish) image, regridded onto the
    /// high-resolution grid and multiplied by the high-resolution primary
    /// beam (e.g. `immath <regridded> <pb> --expr IM0*IM1`).
    #[clap(short = 'l', long, parse(from_os_str))]
    lowres: PathBuf,

    /// Where to write the feathered image.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,

    #[clap(flatten)]
    feather_args: FeatherArgs,
}

impl FeatherImagesArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let options = self.feather_args.clone().parse()?;
        let highres = read(&self.highres, "high-resolution image")?;
        let lowres = read(&self.lowres, "low-resolution image")?;
        info!("Feathering with a single-dish scale factor of {}", options.sd_factor);
        let feathered = feather(&highres, &lowres, &options)?;
        finish(&feathered, &self.output, dry_run)
    }
}
