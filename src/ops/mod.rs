// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Operations on image cubes. None of these touch the disk; each takes image
//! cubes and returns a new one.

mod error;
mod feather;
mod math;
mod reframe;
mod regrid;
mod subimage;
mod transpose;

pub use error::*;
pub use feather::{feather, FeatherOptions};
pub use math::{divide, evaluate_expression, multiply, pb_correct, ImageExpression};
pub use reframe::{reframe, rest_frequencies_match};
pub use regrid::regrid;
pub use subimage::subimage;
pub use transpose::{detect_axis_order, transpose};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::PROGRESS_BARS;

/// A progress bar counting image planes. It's hidden if progress bars are
/// disabled.
fn plane_progress_bar(num_planes: usize, message: &'static str) -> ProgressBar {
    ProgressBar::with_draw_target(
        Some(num_planes as u64),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:18}: [{wide_bar:.blue}] {pos:3}/{len:3} planes ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message(message)
}
