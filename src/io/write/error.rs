// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with writing out images.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::read::FitsError;

#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error(transparent)]
    FileWrite(#[from] FileWriteError),

    #[error(transparent)]
    Fits(#[from] FitsError),
}

#[derive(Error, Debug)]
pub enum FileWriteError {
    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error(
        "Couldn't create directory '{0}' for output files. Do you have write permissions set?"
    )]
    NewDirectory(PathBuf),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
