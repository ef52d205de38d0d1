// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The whole feathering procedure, from ingested images to a primary-beam
//! corrected feathered image.

use std::path::{Path, PathBuf};

use log::{debug, info};
use strum_macros::Display;
use thiserror::Error;

use super::FeatherNames;
use crate::{
    image::{AxisOrder, BoundingBox, ImageCube},
    io::{write_image_cube, ImageWriteError},
    ops::{
        detect_axis_order, feather, multiply, pb_correct, reframe, regrid, subimage, transpose,
        FeatherAlgError, FeatherOptions, MathError, ReframeError, RegridError, SubimageError,
        TransposeError,
    },
};

/// The stages of the pipeline, in the order they're run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PipelineStage {
    #[strum(serialize = "ingest")]
    Ingest,

    #[strum(serialize = "reframe")]
    Reframe,

    #[strum(serialize = "regrid")]
    Regrid,

    #[strum(serialize = "subimage")]
    Subimage,

    #[strum(serialize = "transpose")]
    Transpose,

    #[strum(serialize = "de-primary-beam")]
    DePrimaryBeam,

    #[strum(serialize = "feather")]
    Feather,

    #[strum(serialize = "primary-beam correction")]
    PbCorrect,
}

pub(crate) struct FeatherPipelineParams {
    pub(crate) names: FeatherNames,

    /// The low-resolution (single-dish) image.
    pub(crate) lowres: ImageCube,

    /// The high-resolution (interferometric) image.
    pub(crate) highres: ImageCube,

    /// The primary-beam map of the high-resolution image. This is also the
    /// template that the low-resolution image is regridded onto.
    pub(crate) pb: ImageCube,

    /// If set, the low-resolution image's rest frequency is rewritten to this
    /// value [Hz].
    pub(crate) reframe_to: Option<f64>,

    pub(crate) bbox: BoundingBox,

    /// If not set, the order is detected from the axis types of the
    /// regridded image and the primary beam.
    pub(crate) axis_order: Option<AxisOrder>,

    pub(crate) feather_options: FeatherOptions,

    pub(crate) pb_cutoff: f64,
}

impl FeatherPipelineParams {
    /// Run every stage of the pipeline, writing each stage's artifact. The
    /// first failure stops the pipeline.
    pub(crate) fn run(self) -> Result<(), PipelineError> {
        let FeatherPipelineParams {
            names,
            lowres,
            highres,
            pb,
            reframe_to,
            bbox,
            axis_order,
            feather_options,
            pb_cutoff,
        } = self;

        // Ingest.
        write_artifact(&highres, &names.highres_image(), PipelineStage::Ingest)?;
        write_artifact(&pb, &names.highres_pb(), PipelineStage::Ingest)?;

        // Frequency alignment.
        let lowres = match reframe_to {
            Some(rest_freq_hz) => {
                info!("Setting the low-resolution rest frequency to {rest_freq_hz} Hz");
                reframe(lowres, rest_freq_hz)?
            }
            None => lowres,
        };
        write_artifact(&lowres, &names.lowres_image(), PipelineStage::Reframe)?;

        // Spatial regridding and cropping.
        info!("Regridding the low-resolution image onto the primary beam's grid");
        let regridded = regrid(&lowres, &pb)?;
        drop(lowres);
        write_artifact(&regridded, &names.lowres_regrid(), PipelineStage::Regrid)?;

        info!("Cutting out box {bbox} from all images");
        let lowres_sub = subimage(&regridded, bbox)?;
        drop(regridded);
        write_artifact(
            &lowres_sub,
            &names.lowres_regrid_subimage(),
            PipelineStage::Subimage,
        )?;
        let highres_sub = subimage(&highres, bbox)?;
        drop(highres);
        write_artifact(
            &highres_sub,
            &names.highres_image_subimage(),
            PipelineStage::Subimage,
        )?;
        let pb_sub = subimage(&pb, bbox)?;
        drop(pb);
        write_artifact(&pb_sub, &names.highres_pb_subimage(), PipelineStage::Subimage)?;

        // Axis order. The artifact is written even if nothing changes, so
        // the names of later artifacts don't depend on the data.
        let order = match axis_order {
            Some(order) => order,
            None => detect_axis_order(&lowres_sub, &pb_sub)?,
        };
        let reordered = if order.is_identity() {
            info!("The low-resolution axes are already in the template's order");
            lowres_sub
        } else {
            info!("Reordering the low-resolution axes with order {order}");
            transpose(&lowres_sub, order)?
        };
        write_artifact(
            &reordered,
            &names.lowres_reordered(),
            PipelineStage::Transpose,
        )?;

        // De-primary-beam weighting.
        info!("Multiplying the low-resolution image by the primary beam");
        let depb = multiply(&reordered, &pb_sub).map_err(|err| PipelineError::Math {
            stage: PipelineStage::DePrimaryBeam,
            err,
        })?;
        drop(reordered);
        write_artifact(&depb, &names.lowres_depb(), PipelineStage::DePrimaryBeam)?;

        // Feather and correct.
        info!("Feathering");
        let feathered = feather(&highres_sub, &depb, &feather_options)?;
        write_artifact(&feathered, &names.feathered(), PipelineStage::Feather)?;

        info!("Correcting for the primary beam (cutoff {pb_cutoff})");
        let pbcor = pb_correct(&feathered, &pb_sub, pb_cutoff).map_err(|err| {
            PipelineError::Math {
                stage: PipelineStage::PbCorrect,
                err,
            }
        })?;
        write_artifact(&pbcor, &names.feathered_pbcor(), PipelineStage::PbCorrect)?;

        Ok(())
    }
}

fn write_artifact(
    image: &ImageCube,
    file: &Path,
    stage: PipelineStage,
) -> Result<(), PipelineError> {
    debug!("Writing {} (dims {:?})", file.display(), image.dims());
    write_image_cube(image, file).map_err(|err| PipelineError::Write {
        stage,
        file: file.to_path_buf(),
        err,
    })?;
    info!("Wrote {}", file.display());
    Ok(())
}

/// An error from one of the pipeline's stages. The message always names the
/// stage.
#[derive(Error, Debug)]
pub(crate) enum PipelineError {
    #[error("Stage '{stage}': couldn't write '{file}': {err}")]
    Write {
        stage: PipelineStage,
        file: PathBuf,
        err: ImageWriteError,
    },

    #[error("Stage 'reframe': {0}")]
    Reframe(#[from] ReframeError),

    #[error("Stage 'regrid': {0}")]
    Regrid(#[from] RegridError),

    #[error("Stage 'subimage': {0}")]
    Subimage(#[from] SubimageError),

    #[error("Stage 'transpose': {0}")]
    Transpose(#[from] TransposeError),

    #[error("Stage '{stage}': {err}")]
    Math { stage: PipelineStage, err: MathError },

    #[error("Stage 'feather': {0}")]
    Feather(#[from] FeatherAlgError),
}
