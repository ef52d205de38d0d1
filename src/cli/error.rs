// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all feather-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{common::FeatherArgsError, run::RunArgsError, stages::StageArgsError};
use crate::{
    image::{AxisOrderError, BoundingBoxError, ImageError},
    io::{FileWriteError, FitsError, ImageReadError, ImageWriteError},
    ops::{FeatherAlgError, MathError, ReframeError, RegridError, SubimageError, TransposeError},
    params::PipelineError,
    unit_parsing::UnitParseError,
};

const GRID_HINT: &str = "All images that are combined must be on the same grid; the regrid, subimage and transpose subcommands can fix this.";

/// The *only* publicly visible error from feather. Each error message should
/// include a hint, unless it's "generic".
#[derive(Error, Debug)]
pub enum FeatherError {
    /// An error related to the feathering pipeline's arguments.
    #[error("{0}\n\nSee 'feather run --help' for the available arguments.")]
    Run(String),

    /// Images aren't compatible with each other or with an operation.
    #[error("{0}\n\n{GRID_HINT}")]
    Grid(String),

    /// An error related to the rest frequency.
    #[error("{0}\n\nThe rest frequency can be set explicitly (e.g. --rest-freq 230.538GHz); otherwise the image headers need manual correction.")]
    RestFreq(String),

    /// An error related to regridding.
    #[error("{0}\n\nCheck that the image and the template cover the same part of the sky with matching spectral and Stokes axes.")]
    Regrid(String),

    /// An error related to a bounding box.
    #[error("{0}\n\nBoxes are given as 'xmin,ymin,xmax,ymax' in 0-indexed pixels of the high-resolution image; use 'feather imhead' to see the image dimensions.")]
    BoundingBox(String),

    /// An error related to axis orders.
    #[error("{0}\n\nUse 'feather imhead' to see the axis types of each image.")]
    AxisOrder(String),

    /// An error related to feathering parameters.
    #[error("{0}\n\nBeams are read from the BMAJ, BMIN and BPA header keys; a low-resolution beam can be given with --lowres-beam.")]
    Feather(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json; their keys are the long argument names with underscores.")]
    ArgFile(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    Cfitsio(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<RunArgsError> for FeatherError {
    fn from(e: RunArgsError) -> Self {
        let s = e.to_string();
        match e {
            RunArgsError::Missing(_) => Self::Run(s),
            RunArgsError::RestFreq(_) => Self::RestFreq(s),
            RunArgsError::PbGrid(_) | RunArgsError::Image { .. } => Self::Grid(s),
        }
    }
}

impl From<StageArgsError> for FeatherError {
    fn from(e: StageArgsError) -> Self {
        let s = e.to_string();
        match e {
            StageArgsError::NoRestFreq => Self::RestFreq(s),
            StageArgsError::NoAxisOrder => Self::AxisOrder(s),
            StageArgsError::UnknownKey { .. } | StageArgsError::BadMode(_) | StageArgsError::NoKey => {
                Self::Generic(s)
            }
        }
    }
}

impl From<FeatherArgsError> for FeatherError {
    fn from(e: FeatherArgsError) -> Self {
        Self::Feather(e.to_string())
    }
}

impl From<PipelineError> for FeatherError {
    fn from(e: PipelineError) -> Self {
        let s = e.to_string();
        match e {
            PipelineError::Write { err, .. } => match err {
                ImageWriteError::Fits(_) => Self::Cfitsio(s),
                ImageWriteError::FileWrite(_) => Self::Generic(s),
            },
            PipelineError::Reframe(_) => Self::RestFreq(s),
            PipelineError::Regrid(_) => Self::Regrid(s),
            PipelineError::Subimage(SubimageError::BoundingBox(_)) => Self::BoundingBox(s),
            PipelineError::Subimage(SubimageError::Image(_)) => Self::Grid(s),
            PipelineError::Transpose(TransposeError::AxisOrder(_)) => Self::AxisOrder(s),
            PipelineError::Transpose(TransposeError::Image(_)) => Self::Grid(s),
            PipelineError::Math { err, .. } => match err {
                MathError::Grid(_) => Self::Grid(s),
                MathError::BadCutoff(_) | MathError::UnknownExpression(_) => Self::Generic(s),
            },
            PipelineError::Feather(FeatherAlgError::Grid(_)) => Self::Grid(s),
            PipelineError::Feather(_) => Self::Feather(s),
        }
    }
}

// Library code errors.

impl From<ImageReadError> for FeatherError {
    fn from(e: ImageReadError) -> Self {
        let s = e.to_string();
        match e {
            ImageReadError::Fits(_) | ImageReadError::PixelCount { .. } => Self::Cfitsio(s),
            ImageReadError::Image { .. } => Self::Grid(s),
        }
    }
}

impl From<ImageWriteError> for FeatherError {
    fn from(e: ImageWriteError) -> Self {
        match e {
            ImageWriteError::FileWrite(e) => Self::from(e),
            ImageWriteError::Fits(e) => Self::from(e),
        }
    }
}

impl From<FileWriteError> for FeatherError {
    fn from(e: FileWriteError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<FitsError> for FeatherError {
    fn from(e: FitsError) -> Self {
        Self::Cfitsio(e.to_string())
    }
}

impl From<ImageError> for FeatherError {
    fn from(e: ImageError) -> Self {
        Self::Grid(e.to_string())
    }
}

impl From<BoundingBoxError> for FeatherError {
    fn from(e: BoundingBoxError) -> Self {
        Self::BoundingBox(e.to_string())
    }
}

impl From<AxisOrderError> for FeatherError {
    fn from(e: AxisOrderError) -> Self {
        Self::AxisOrder(e.to_string())
    }
}

impl From<ReframeError> for FeatherError {
    fn from(e: ReframeError) -> Self {
        Self::RestFreq(e.to_string())
    }
}

impl From<RegridError> for FeatherError {
    fn from(e: RegridError) -> Self {
        Self::Regrid(e.to_string())
    }
}

impl From<SubimageError> for FeatherError {
    fn from(e: SubimageError) -> Self {
        match e {
            SubimageError::BoundingBox(e) => Self::from(e),
            SubimageError::Image(e) => Self::from(e),
        }
    }
}

impl From<TransposeError> for FeatherError {
    fn from(e: TransposeError) -> Self {
        match e {
            TransposeError::AxisOrder(e) => Self::from(e),
            TransposeError::Image(e) => Self::from(e),
        }
    }
}

impl From<MathError> for FeatherError {
    fn from(e: MathError) -> Self {
        let s = e.to_string();
        match e {
            MathError::Grid(_) => Self::Grid(s),
            MathError::BadCutoff(_) | MathError::UnknownExpression(_) => Self::Generic(s),
        }
    }
}

impl From<FeatherAlgError> for FeatherError {
    fn from(e: FeatherAlgError) -> Self {
        let s = e.to_string();
        match e {
            FeatherAlgError::Grid(_) => Self::Grid(s),
            FeatherAlgError::MissingBeam { .. } | FeatherAlgError::BadSdFactor(_) => {
                Self::Feather(s)
            }
        }
    }
}

impl From<UnitParseError> for FeatherError {
    fn from(e: UnitParseError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for FeatherError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
