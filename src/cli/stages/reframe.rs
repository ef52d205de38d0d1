// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{finish, read, StageArgsError};
use crate::{
    cli::Warn,
    constants::REST_FREQ_REL_TOLERANCE,
    ops::{reframe, rest_frequencies_match},
    unit_parsing::parse_freq_hz,
    FeatherError,
};

/// Change the rest frequency of an image.
#[derive(Parser, Debug, Clone)]
pub struct ReframeArgs {
    /// Path to the image.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// Where to write the reframed image.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,

    /// The new rest frequency (e.g. 230.538GHz; no unit means Hz).
    #[clap(short, long)]
    rest_freq: Option<String>,

    /// Take the rest frequency from this image if --rest-freq isn't given.
    #[clap(short, long, parse(from_os_str))]
    template: Option<PathBuf>,
}

impl ReframeArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let rest_freq = match (self.rest_freq.as_deref(), self.template.as_deref()) {
            (Some(f), _) => parse_freq_hz(f)?,
            (None, Some(template)) => read(template, "template")?
                .meta
                .rest_freq
                .ok_or(StageArgsError::NoRestFreq)?,
            (None, None) => return Err(StageArgsError::NoRestFreq.into()),
        };

        let image = read(&self.image, "image")?;
        if rest_frequencies_match(image.meta.rest_freq, Some(rest_freq), REST_FREQ_REL_TOLERANCE) {
            format!(
                "{} already has a rest frequency of {rest_freq} Hz",
                self.image.display()
            )
            .warn();
        }
        info!("Setting the rest frequency to {rest_freq} Hz");
        let image = reframe(image, rest_freq)?;
        finish(&image, &self.output, dry_run)
    }
}
