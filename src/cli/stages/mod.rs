// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Subcommands for running the stages of the feathering procedure one at a
//! time, so that each intermediate image can be inspected.

mod feather;
mod imhead;
mod immath;
mod pbcor;
mod reframe;
mod regrid;
mod subimage;
mod transpose;

pub(super) use feather::FeatherImagesArgs;
pub(super) use imhead::ImheadArgs;
pub(super) use immath::ImmathArgs;
pub(super) use pbcor::PbcorArgs;
pub(super) use reframe::ReframeArgs;
pub(super) use regrid::RegridArgs;
pub(super) use subimage::SubimageArgs;
pub(super) use transpose::TransposeArgs;

use std::path::Path;

use log::info;
use thiserror::Error;

use super::common::display_warnings;
use crate::{
    image::ImageCube,
    io::{read_image_cube, write_image_cube},
    FeatherError,
};

/// Read an image, logging what's being read.
fn read(file: &Path, what: &str) -> Result<ImageCube, FeatherError> {
    info!("Reading {what} {}", file.display());
    let image = read_image_cube(file)?;
    info!("  dims {:?}", image.dims());
    Ok(image)
}

/// Write the result of a stage, unless this is a dry run.
fn finish(image: &ImageCube, output: &Path, dry_run: bool) -> Result<(), FeatherError> {
    display_warnings();
    if dry_run {
        info!("Dry run -- not writing {}", output.display());
        return Ok(());
    }
    write_image_cube(image, output)?;
    info!("Wrote {} (dims {:?})", output.display(), image.dims());
    Ok(())
}

#[derive(Error, Debug)]
pub(super) enum StageArgsError {
    #[error("The header of '{file}' doesn't have the key '{key}'")]
    UnknownKey { file: String, key: String },

    #[error("Unknown imhead mode '{0}'; expected 'list' or 'get'")]
    BadMode(String),

    #[error("imhead mode 'get' needs a key")]
    NoKey,

    #[error("No rest frequency was given, and the template image doesn't have one")]
    NoRestFreq,

    #[error("Either an axis order or a template image must be given")]
    NoAxisOrder,
}
