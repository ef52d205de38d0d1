// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{finish, read};
use crate::{
    cli::common::EXPRESSION_HELP,
    ops::{evaluate_expression, ImageExpression},
    FeatherError,
};

/// Evaluate a pixel-wise expression between two images on the same grid.
#[derive(Parser, Debug, Clone)]
pub struct ImmathArgs {
    /// The first image (IM0).
    #[clap(name = "IM0", parse(from_os_str))]
    im0: PathBuf,

    /// The second image (IM1).
    #[clap(name = "IM1", parse(from_os_str))]
    im1: PathBuf,

    #[clap(short, long, help = EXPRESSION_HELP.as_str())]
    expr: String,

    /// Where to write the result.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl ImmathArgs {
    pub fn run(&self, dry_run: bool) -> Result<(), FeatherError> {
        let expr: ImageExpression = self.expr.parse()?;
        let im0 = read(&self.im0, "IM0")?;
        let im1 = read(&self.im1, "IM1")?;
        info!("Evaluating {expr}");
        let result = evaluate_expression(expr, &im0, &im1)?;
        finish(&result, &self.output, dry_run)
    }
}
