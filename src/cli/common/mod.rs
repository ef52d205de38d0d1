// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. e.g. the `run` and `feather`
//! subcommands both feather images, so the same feathering arguments are
//! shared between them.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::borrow::Cow;

use clap::Parser;
use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_PB_CUTOFF, DEFAULT_SD_FACTOR},
    image::{Beam, ImageCube},
    io::image_header_summary,
    ops::{FeatherOptions, ImageExpression},
    unit_parsing::{parse_angle, parse_angle_deg, AngleFormat, UnitParseError},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref SD_FACTOR_HELP: String =
        format!("The scale factor applied to the low-resolution (single-dish) image before it is feathered. Default: {DEFAULT_SD_FACTOR}");

    pub(super) static ref PB_CUTOFF_HELP: String =
        format!("Primary-beam values less than or equal to this are excluded (set to NaN) when primary-beam correcting. Default: {DEFAULT_PB_CUTOFF}");

    pub(super) static ref EXPRESSION_HELP: String =
        format!("The expression to evaluate, where IM0 is the first image and IM1 the second. Supported expressions: {}", ImageExpression::iter().join(", "));
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FeatherError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FeatherError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(FeatherError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Arguments that control feathering.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FeatherArgs {
    #[clap(long, help = SD_FACTOR_HELP.as_str(), help_heading = "FEATHERING")]
    pub(super) sd_factor: Option<f64>,

    /// Use this restoring beam for the low-resolution image rather than the
    /// one in its header. Given as "MAJOR[,MINOR[,PA]]"; the axes may have
    /// units (e.g. 28.5arcsec, 0.5arcmin; no unit means arcseconds) and the
    /// position angle is in degrees unless a unit is given. If the minor axis
    /// isn't given, the beam is circular.
    #[clap(long, help_heading = "FEATHERING")]
    pub(super) lowres_beam: Option<String>,
}

impl FeatherArgs {
    /// Merge two sets of arguments, preferring `self` where both are
    /// available.
    pub(super) fn merge(self, other: FeatherArgs) -> FeatherArgs {
        FeatherArgs {
            sd_factor: self.sd_factor.or(other.sd_factor),
            lowres_beam: self.lowres_beam.or(other.lowres_beam),
        }
    }

    pub(super) fn parse(self) -> Result<FeatherOptions, FeatherArgsError> {
        let FeatherArgs {
            sd_factor,
            lowres_beam,
        } = self;

        let sd_factor = sd_factor.unwrap_or(DEFAULT_SD_FACTOR);
        if !sd_factor.is_finite() || sd_factor <= 0.0 {
            return Err(FeatherArgsError::BadSdFactor(sd_factor));
        }
        let lowres_beam = lowres_beam.as_deref().map(parse_beam).transpose()?;
        if let Some(beam) = lowres_beam {
            format!("Using user-specified low-resolution beam {beam}").warn();
        }
        trace!("sd_factor: {sd_factor}, lowres_beam: {lowres_beam:?}");

        Ok(FeatherOptions {
            sd_factor,
            lowres_beam,
        })
    }
}

/// Parse a beam given as "MAJOR[,MINOR[,PA]]".
pub(super) fn parse_beam(s: &str) -> Result<Beam, FeatherArgsError> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    let bad = |e: UnitParseError| FeatherArgsError::Beam {
        input: s.to_string(),
        err: e.to_string(),
    };
    let (major, minor, pa) = match parts.as_slice() {
        [major] => {
            let major = parse_angle_deg(major).map_err(bad)?;
            (major, major, 0.0)
        }
        [major, minor] => (
            parse_angle_deg(major).map_err(bad)?,
            parse_angle_deg(minor).map_err(bad)?,
            0.0,
        ),
        [major, minor, pa] => {
            let pa = match parse_angle(pa).map_err(bad)? {
                (pa, AngleFormat::NoUnit) => pa,
                (pa, format) => format.to_degrees(pa),
            };
            (
                parse_angle_deg(major).map_err(bad)?,
                parse_angle_deg(minor).map_err(bad)?,
                pa,
            )
        }
        _ => {
            return Err(FeatherArgsError::Beam {
                input: s.to_string(),
                err: "expected one to three comma-separated values".to_string(),
            })
        }
    };
    if !(major > 0.0 && minor > 0.0) || minor > major || !pa.is_finite() {
        return Err(FeatherArgsError::Beam {
            input: s.to_string(),
            err: "the axes must be positive, with the minor axis no bigger than the major axis"
                .to_string(),
        });
    }
    Ok(Beam::from_fwhm(major, minor, pa))
}

/// Check a primary-beam cutoff from the user.
pub(super) fn parse_pb_cutoff(pb_cutoff: Option<f64>) -> Result<f64, FeatherArgsError> {
    match pb_cutoff {
        None => Ok(DEFAULT_PB_CUTOFF),
        Some(c) if c.is_finite() && c >= 0.0 => Ok(c),
        Some(c) => Err(FeatherArgsError::BadPbCutoff(c)),
    }
}

/// The header summary of an image as a block of lines suitable for an
/// [`InfoPrinter`].
pub(super) fn header_block(title: String, image: &ImageCube) -> Vec<Cow<'static, str>> {
    std::iter::once(Cow::from(title))
        .chain(
            image_header_summary(image)
                .lines()
                .map(|l| format!("  {l}").into()),
        )
        .collect()
}

#[derive(Error, Debug)]
pub(super) enum FeatherArgsError {
    #[error("The single-dish scale factor must be positive and finite, but got {0}")]
    BadSdFactor(f64),

    #[error("The primary-beam cutoff must be non-negative and finite, but got {0}")]
    BadPbCutoff(f64),

    #[error("Couldn't parse '{input}' as a beam: {err}")]
    Beam { input: String, err: String },
}
