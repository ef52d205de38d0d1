// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The names of the artifacts written by the feathering pipeline.
//!
//! Every artifact of a dataset is named `<Source>_<Band>.<spw>.<suffix>.fits`
//! (e.g. `Orion_Band6.spw17_TP.regrid.subimage.fits`), and the feathered
//! images are named
//! `<Source>_<Band>.feather_<spw high-res>_and_<spw low-res>.image.fits` (and
//! `.image.pbcor.fits`).

use std::path::{Path, PathBuf};

use crate::constants::IMAGE_EXTENSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeatherNames {
    /// `<Source>_<Band>`.
    source_band: String,

    /// The label of the low-resolution (single-dish) data, e.g. "spw17_TP".
    spw_lowres: String,

    /// The label of the high-resolution (interferometric) data, e.g.
    /// "spw16_7m".
    spw_highres: String,

    /// All artifacts are written into this directory.
    output_dir: PathBuf,
}

impl FeatherNames {
    pub(crate) fn new(
        source: &str,
        band: &str,
        spw_highres: &str,
        spw_lowres: &str,
        output_dir: &Path,
    ) -> FeatherNames {
        FeatherNames {
            source_band: format!("{source}_{band}"),
            spw_lowres: spw_lowres.to_string(),
            spw_highres: spw_highres.to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    fn lowres(&self, suffix: &str) -> PathBuf {
        self.artifact(&self.spw_lowres, suffix)
    }

    fn highres(&self, suffix: &str) -> PathBuf {
        self.artifact(&self.spw_highres, suffix)
    }

    fn artifact(&self, spw: &str, suffix: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{spw}.{suffix}.{IMAGE_EXTENSION}",
            self.source_band
        ))
    }

    /// The ingested (and possibly reframed) low-resolution image.
    pub(crate) fn lowres_image(&self) -> PathBuf {
        self.lowres("image")
    }

    pub(crate) fn lowres_regrid(&self) -> PathBuf {
        self.lowres("regrid")
    }

    pub(crate) fn lowres_regrid_subimage(&self) -> PathBuf {
        self.lowres("regrid.subimage")
    }

    /// The regridded, cropped low-resolution image with its axes reordered
    /// ("ro") to match the template.
    pub(crate) fn lowres_reordered(&self) -> PathBuf {
        self.lowres("regrid.subimage.ro")
    }

    /// The reordered low-resolution image multiplied by the high-resolution
    /// primary beam ("depb").
    pub(crate) fn lowres_depb(&self) -> PathBuf {
        self.lowres("regrid.subimage.ro.depb")
    }

    pub(crate) fn highres_image(&self) -> PathBuf {
        self.highres("image")
    }

    pub(crate) fn highres_pb(&self) -> PathBuf {
        self.highres("pb")
    }

    pub(crate) fn highres_image_subimage(&self) -> PathBuf {
        self.highres("image.subimage")
    }

    pub(crate) fn highres_pb_subimage(&self) -> PathBuf {
        self.highres("pb.subimage")
    }

    fn feathered_stem(&self) -> String {
        format!(
            "{}.feather_{}_and_{}.image",
            self.source_band, self.spw_highres, self.spw_lowres
        )
    }

    pub(crate) fn feathered(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{IMAGE_EXTENSION}", self.feathered_stem()))
    }

    pub(crate) fn feathered_pbcor(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.pbcor.{IMAGE_EXTENSION}", self.feathered_stem()))
    }

    /// Every artifact, in the order they're written.
    pub(crate) fn all(&self) -> [PathBuf; 11] {
        [
            self.highres_image(),
            self.highres_pb(),
            self.lowres_image(),
            self.lowres_regrid(),
            self.lowres_regrid_subimage(),
            self.highres_image_subimage(),
            self.highres_pb_subimage(),
            self.lowres_reordered(),
            self.lowres_depb(),
            self.feathered(),
            self.feathered_pbcor(),
        ]
    }
}
