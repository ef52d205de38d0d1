// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The whole feathering procedure in one subcommand.


use std::{borrow::Cow, path::PathBuf};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    display_warnings, header_block, parse_pb_cutoff, FeatherArgs, InfoPrinter, Warn,
    ARG_FILE_HELP, PB_CUTOFF_HELP,
};
use crate::{
    constants::REST_FREQ_REL_TOLERANCE,
    image::{AxisOrder, BoundingBox, ImageCube, ImageError},
    io::read_image_cube,
    ops::rest_frequencies_match,
    params::{FeatherNames, FeatherPipelineParams},
    unit_parsing::{parse_freq_hz, UnitParseError},
    FeatherError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct RunArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The name of the source, used in output file names (e.g. Orion_KL).
    #[clap(short = 's', long, help_heading = "NAMING")]
    pub(super) source_name: Option<String>,

    /// The name of the band, used in output file names (e.g. Band6).
    #[clap(short = 'b', long, help_heading = "NAMING")]
    pub(super) band_name: Option<String>,

    /// A label for the low-resolution (single-dish) data, used in output file
    /// names (e.g. spw17_TP).
    #[clap(long, help_heading = "NAMING")]
    pub(super) lowres_label: Option<String>,

    /// A label for the high-resolution (interferometric) data, used in output
    /// file names (e.g. spw16_7m).
    #[clap(long, help_heading = "NAMING")]
    pub(super) highres_label: Option<String>,

    /// Path to the low-resolution (single-dish) FITS image.
    #[clap(short = 'l', long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) lowres: Option<PathBuf>,

    /// Path to the high-resolution (interferometric) FITS image.
    #[clap(short = 'i', long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) highres: Option<PathBuf>,

    /// Path to the primary-beam map of the high-resolution image, as a FITS
    /// image.
    #[clap(short = 'p', long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) pb: Option<PathBuf>,

    /// The directory that all images are written into. Default: the current
    /// directory.
    #[clap(short = 'o', long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    /// The rest frequency that the low-resolution image should have, e.g.
    /// 241843649999.99997Hz or 241.84365GHz (no unit means Hz). If not given
    /// and the rest frequencies of the two images differ, the high-resolution
    /// image's rest frequency is used.
    #[clap(long, help_heading = "ALIGNMENT")]
    pub(super) rest_freq: Option<String>,

    /// The pixel box that all images are cut down to, as
    /// "xmin,ymin,xmax,ymax" (0-indexed, inclusive) on the high-resolution
    /// grid, e.g. "30,30,315,330". Default: the whole image.
    #[clap(long = "box", help_heading = "ALIGNMENT")]
    #[serde(rename = "box")]
    pub(super) bbox: Option<String>,

    /// How to reorder the axes of the regridded low-resolution image, e.g.
    /// "0132" swaps the third and fourth axes. Default: the order is worked
    /// out from the axis types.
    #[clap(long, help_heading = "ALIGNMENT")]
    pub(super) axis_order: Option<String>,

    #[clap(flatten)]
    #[serde(rename = "feather")]
    #[serde(default)]
    pub(super) feather_args: FeatherArgs,

    #[clap(long, help = PB_CUTOFF_HELP.as_str(), help_heading = "PRIMARY-BEAM CORRECTION")]
    pub(super) pb_cutoff: Option<f64>,
}

impl RunArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<RunArgs, FeatherError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let RunArgs {
                args_file: _,
                source_name,
                band_name,
                lowres_label,
                highres_label,
                lowres,
                highres,
                pb,
                output_dir,
                rest_freq,
                bbox,
                axis_order,
                feather_args,
                pb_cutoff,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(RunArgs {
                args_file: None,
                source_name: cli_args.source_name.or(source_name),
                band_name: cli_args.band_name.or(band_name),
                lowres_label: cli_args.lowres_label.or(lowres_label),
                highres_label: cli_args.highres_label.or(highres_label),
                lowres: cli_args.lowres.or(lowres),
                highres: cli_args.highres.or(highres),
                pb: cli_args.pb.or(pb),
                output_dir: cli_args.output_dir.or(output_dir),
                rest_freq: cli_args.rest_freq.or(rest_freq),
                bbox: cli_args.bbox.or(bbox),
                axis_order: cli_args.axis_order.or(axis_order),
                feather_args: cli_args.feather_args.merge(feather_args),
                pb_cutoff: cli_args.pb_cutoff.or(pb_cutoff),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<FeatherPipelineParams, FeatherError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            source_name,
            band_name,
            lowres_label,
            highres_label,
            lowres,
            highres,
            pb,
            output_dir,
            rest_freq,
            bbox,
            axis_order,
            feather_args,
            pb_cutoff,
        } = self;

        let source_name = non_empty(source_name, "source name")?;
        let band_name = non_empty(band_name, "band name")?;
        let lowres_label = non_empty(lowres_label, "low-resolution label")?;
        let highres_label = non_empty(highres_label, "high-resolution label")?;
        let lowres_file = lowres.ok_or(RunArgsError::Missing("low-resolution image"))?;
        let highres_file = highres.ok_or(RunArgsError::Missing("high-resolution image"))?;
        let pb_file = pb.ok_or(RunArgsError::Missing("primary-beam image"))?;
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));

        // Ingest.
        let lowres = read_image_cube(&lowres_file)?;
        let highres = read_image_cube(&highres_file)?;
        let pb = read_image_cube(&pb_file)?;
        for (image, what) in [
            (&lowres, "low-resolution image"),
            (&highres, "high-resolution image"),
            (&pb, "primary-beam image"),
        ] {
            image
                .check_celestial_axes()
                .map_err(|err| RunArgsError::Image { what, err })?;
        }
        highres.same_grid(&pb).map_err(RunArgsError::PbGrid)?;

        let mut printer = InfoPrinter::new("Feathering inputs".into());
        printer.push_block(header_block(
            format!("Low-resolution image: {}", lowres_file.display()),
            &lowres,
        ));
        printer.push_block(header_block(
            format!("High-resolution image: {}", highres_file.display()),
            &highres,
        ));
        printer.push_block(header_block(
            format!("Primary beam: {}", pb_file.display()),
            &pb,
        ));
        printer.display();

        let explicit_rest_freq = rest_freq
            .as_deref()
            .map(parse_freq_hz)
            .transpose()
            .map_err(RunArgsError::RestFreq)?;
        let reframe_to = choose_rest_freq(&lowres, &highres, explicit_rest_freq);

        let bbox = match bbox {
            Some(b) => {
                let bbox: BoundingBox = b.parse()?;
                bbox.validate(highres.axes[0].naxis, highres.axes[1].naxis)?;
                bbox
            }
            None => {
                let bbox = BoundingBox::full(highres.axes[0].naxis, highres.axes[1].naxis);
                format!("No box was specified; using the whole high-resolution image ({bbox})")
                    .warn();
                bbox
            }
        };
        let axis_order = axis_order
            .as_deref()
            .map(|o| o.parse::<AxisOrder>())
            .transpose()?;
        let feather_options = feather_args.parse()?;
        let pb_cutoff = parse_pb_cutoff(pb_cutoff)?;

        let names = FeatherNames::new(
            &source_name,
            &band_name,
            &highres_label,
            &lowres_label,
            &output_dir,
        );

        let mut printer = InfoPrinter::new("Feathering plan".into());
        printer.push_line(
            match reframe_to {
                Some(f) => format!("Set the low-resolution rest frequency to {f} Hz"),
                None => "Keep the low-resolution rest frequency".to_string(),
            }
            .into(),
        );
        printer.push_line(format!("Regrid onto the primary beam, then cut out box {bbox}").into());
        printer.push_line(
            match axis_order {
                Some(o) => format!("Reorder the low-resolution axes with order {o}"),
                None => "Reorder the low-resolution axes to match the primary beam".to_string(),
            }
            .into(),
        );
        printer.push_line(
            format!(
                "Feather with single-dish scale factor {}{}",
                feather_options.sd_factor,
                match feather_options.lowres_beam {
                    Some(b) => format!(" and low-resolution beam {b}"),
                    None => String::new(),
                }
            )
            .into(),
        );
        printer.push_line(format!("Primary-beam correct with cutoff {pb_cutoff}").into());
        printer.push_block(
            std::iter::once(Cow::from("Outputs:"))
                .chain(
                    names
                        .all()
                        .iter()
                        .map(|p| format!("  {}", p.display()).into()),
                )
                .collect(),
        );
        printer.display();

        display_warnings();

        Ok(FeatherPipelineParams {
            names,
            lowres,
            highres,
            pb,
            reframe_to,
            bbox,
            axis_order,
            feather_options,
            pb_cutoff,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), FeatherError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let feathered = params.names.feathered_pbcor();
        params.run()?;
        display_warnings();
        info!("Primary-beam-corrected feathered image: {}", feathered.display());
        Ok(())
    }
}

fn non_empty(s: Option<String>, what: &'static str) -> Result<String, RunArgsError> {
    match s {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(RunArgsError::Missing(what)),
    }
}

/// Work out what (if anything) the low-resolution image's rest frequency
/// needs to be changed to. A user-specified frequency always wins; otherwise
/// the high-resolution image's rest frequency is used.
fn choose_rest_freq(
    lowres: &ImageCube,
    highres: &ImageCube,
    explicit_rest_freq: Option<f64>,
) -> Option<f64> {
    let target = explicit_rest_freq.or(highres.meta.rest_freq);
    match target {
        Some(target)
            if !rest_frequencies_match(
                Some(target),
                lowres.meta.rest_freq,
                REST_FREQ_REL_TOLERANCE,
            ) =>
        {
            if explicit_rest_freq.is_none() {
                format!(
                    "The rest frequencies differ (low-resolution: {}, high-resolution: {target} Hz); using the high-resolution rest frequency",
                    lowres
                        .meta
                        .rest_freq
                        .map(|f| format!("{f} Hz"))
                        .unwrap_or_else(|| "<none>".to_string())
                )
                .warn();
            }
            Some(target)
        }

        Some(_) => None,

        None => {
            if lowres.meta.rest_freq.is_none() {
                "Neither image has a rest frequency".warn();
            } else {
                "The high-resolution image has no rest frequency; the rest frequencies can't be checked".warn();
            }
            None
        }
    }
}

#[derive(Error, Debug)]
pub(super) enum RunArgsError {
    #[error("No {0} was specified")]
    Missing(&'static str),

    #[error("Couldn't parse the rest frequency: {0}")]
    RestFreq(UnitParseError),

    #[error("The {what} can't be feathered: {err}")]
    Image {
        what: &'static str,
        err: ImageError,
    },

    #[error("The primary beam isn't on the high-resolution image's grid: {0}")]
    PbGrid(ImageError),
}
