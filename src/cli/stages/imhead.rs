// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to print image headers.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{read, StageArgsError};
use crate::{
    io::{header_value, image_header_summary},
    FeatherError,
};

/// Print the header of an image, or a single value from it.
#[derive(Parser, Debug, Clone)]
pub struct ImheadArgs {
    /// Path to the image.
    #[clap(name = "IMAGE", parse(from_os_str))]
    image: PathBuf,

    /// "list" prints a summary of the whole header; "get" prints the value of
    /// a single key.
    #[clap(short, long, default_value = "list")]
    mode: String,

    /// The header key to get (e.g. RESTFRQ, BMAJ, CTYPE3). Implies "get".
    #[clap(short, long)]
    key: Option<String>,
}

impl ImheadArgs {
    pub fn run(&self) -> Result<(), FeatherError> {
        let image = read(&self.image, "image")?;
        match (self.mode.trim().to_lowercase().as_str(), self.key.as_deref()) {
            ("list", None) => {
                for line in image_header_summary(&image).lines() {
                    info!("{line}");
                }
            }
            ("get" | "list", Some(key)) => {
                let value =
                    header_value(&image, key).ok_or_else(|| StageArgsError::UnknownKey {
                        file: self.image.display().to_string(),
                        key: key.to_string(),
                    })?;
                // The value alone goes to stdout so that it can be used by
                // scripts.
                println!("{value}");
            }
            ("get", None) => return Err(StageArgsError::NoKey.into()),
            (mode, _) => return Err(StageArgsError::BadMode(mode.to_string()).into()),
        }
        Ok(())
    }
}
