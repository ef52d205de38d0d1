// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::info;

use super::{finish, read, StageArgsError};
use crate::{
    cli::Warn,
    image::AxisOrder,
    ops::{detect_axis_order, transpose},
    FeatherError,
};

/// Reorder the axes of an image.
#[derive(Parser, Debug, Clone)]
pub struct TransposeArgs {
    /// Path to the image.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// The new axis order as four 0-indexed input axes, e.g. "0132" swaps the
    /// last two axes.
    #[clap(long)]
    order: Option<String>,

    /// If --order isn't given, reorder the axes to match this image's axes.
    #[clap(short, long, parse(from_os_str))]
    template: Option<PathBuf>,

    /// Where to write the transposed image.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl TransposeArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let image = read(&self.image, "image")?;
        let order: AxisOrder = match (self.order.as_deref(), self.template.as_deref()) {
            (Some(order), _) => order.parse()?,
            (None, Some(template)) => detect_axis_order(&image, &read(template, "template")?)?,
            (None, None) => return Err(StageArgsError::NoAxisOrder.into()),
        };
        if order.is_identity() {
            "The axis order is the identity; the image is unchanged".warn();
        }
        info!("Axis order: {}", order.0.iter().join(""));
        let transposed = transpose(&image, order)?;
        finish(&transposed, &self.output, dry_run)
    }
}
