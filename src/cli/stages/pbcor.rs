// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{finish, read};
use crate::{
    cli::common::{parse_pb_cutoff, PB_CUTOFF_HELP},
    ops::pb_correct,
    FeatherError,
};

/// Divide an image by a primary-beam map.
#[derive(Parser, Debug, Clone)]
pub struct PbcorArgs {
    /// Path to the image.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// The primary-beam map, on the same grid as the image.
    #[clap(short, long, parse(from_os_str))]
    pb: PathBuf,

    #[clap(long, help = PB_CUTOFF_HELP.as_str())]
    pb_cutoff: Option<f64>,

    /// Where to write the primary-beam-corrected image.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl PbcorArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let cutoff = parse_pb_cutoff(self.pb_cutoff)?;
        let image = read(&self.image, "image")?;
        let pb = read(&self.pb, "primary beam")?;
        info!("Primary-beam correcting with a cutoff of {cutoff}");
        let corrected = pb_correct(&image, &pb, cutoff)?;
        finish(&corrected, &self.output, dry_run)
    }
}
