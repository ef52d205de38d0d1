// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use super::{pipeline::PipelineStage, *};
use crate::{
    image::{AxisOrder, Beam, BoundingBox, ImageCube},
    io::read_image_cube,
    ops::FeatherOptions,
    tests::*,
};

fn beam_arcsec(fwhm: f64) -> Beam {
    Beam::circular(fwhm / 3600.0)
}

fn names(dir: &Path) -> FeatherNames {
    FeatherNames::new("Orion", "Band6", "spw16_7m", "spw17_TP", dir)
}

/// High-res image and primary beam on a 1" grid, and a low-res image on a 2"
/// grid covering the same area.
fn inputs(nchan: usize) -> (ImageCube, ImageCube, ImageCube) {
    let highres = make_cube(cube_axes(32, 32, nchan, 1.0), Some(beam_arcsec(3.0)), |x, y, c| {
        gaussian(x, y, 15.0, 16.0, 3.0, 1.0 + c as f64)
    });
    let pb = pb_map(cube_axes(32, 32, nchan, 1.0), 14.0);
    let lowres = make_cube(cube_axes(16, 16, nchan, 2.0), Some(beam_arcsec(12.0)), |x, y, _| {
        gaussian(x, y, 7.5, 8.0, 6.0, 4.0)
    });
    (lowres, highres, pb)
}

#[test]
fn test_names() {
    let names = names(Path::new("out"));
    assert_eq!(
        names.lowres_depb(),
        Path::new("out/Orion_Band6.spw17_TP.regrid.subimage.ro.depb.fits")
    );
    assert_eq!(
        names.highres_pb_subimage(),
        Path::new("out/Orion_Band6.spw16_7m.pb.subimage.fits")
    );
    assert_eq!(
        names.feathered(),
        Path::new("out/Orion_Band6.feather_spw16_7m_and_spw17_TP.image.fits")
    );
    assert_eq!(
        names.feathered_pbcor(),
        Path::new("out/Orion_Band6.feather_spw16_7m_and_spw17_TP.image.pbcor.fits")
    );
    let all = names.all();
    assert!(all.iter().all(|p| p.starts_with("out")));
    // No two artifacts share a name.
    for (i, a) in all.iter().enumerate() {
        assert!(all[i + 1..].iter().all(|b| a != b));
    }
}

#[test]
fn test_pipeline_writes_every_artifact() {
    let tmp_dir = TempDir::new().unwrap();
    let (mut lowres, highres, pb) = inputs(2);
    lowres.meta.rest_freq = Some(CO_2_1 + 5e6);
    let bbox = BoundingBox::new(2, 3, 29, 28).unwrap();
    let params = FeatherPipelineParams {
        names: names(tmp_dir.path()),
        lowres,
        highres,
        pb,
        reframe_to: Some(CO_2_1),
        bbox,
        axis_order: None,
        feather_options: FeatherOptions::default(),
        pb_cutoff: 0.0,
    };
    params.run().unwrap();

    let names = names(tmp_dir.path());
    for artifact in names.all() {
        assert!(artifact.exists(), "{} is missing", artifact.display());
    }

    let reframed = read_image_cube(names.lowres_image()).unwrap();
    assert_abs_diff_eq!(reframed.meta.rest_freq.unwrap(), CO_2_1, epsilon = 1.0);

    let feathered = read_image_cube(names.feathered()).unwrap();
    assert_eq!(feathered.dims(), vec![bbox.width(), bbox.height(), 2, 1]);
    assert_eq!(feathered.meta.beam.map(|b| b.major_deg > 0.0), Some(true));

    let pb_sub = read_image_cube(names.highres_pb_subimage()).unwrap();
    let pbcor = read_image_cube(names.feathered_pbcor()).unwrap();
    for ((c, f), p) in pbcor
        .data
        .iter()
        .zip(feathered.data.iter())
        .zip(pb_sub.data.iter())
    {
        if *p <= 0.0 {
            assert!(c.is_nan());
        } else {
            assert_abs_diff_eq!(*c, f / p, epsilon = 1e-4 * (f / p).abs().max(1.0));
        }
    }
}

#[test]
fn test_pipeline_reorders_swapped_axes() {
    let tmp_dir = TempDir::new().unwrap();
    let (_, highres, pb) = inputs(1);
    let mut axes = cube_axes(16, 16, 1, 2.0);
    axes.swap(2, 3);
    let lowres = make_cube(axes, Some(beam_arcsec(12.0)), |x, y, _| {
        gaussian(x, y, 7.5, 8.0, 6.0, 4.0)
    });
    let params = FeatherPipelineParams {
        names: names(tmp_dir.path()),
        lowres,
        highres,
        pb,
        reframe_to: None,
        bbox: BoundingBox::new(4, 4, 27, 27).unwrap(),
        axis_order: None,
        feather_options: FeatherOptions::default(),
        pb_cutoff: 0.1,
    };
    params.run().unwrap();

    let names = names(tmp_dir.path());
    let regrid_sub = read_image_cube(names.lowres_regrid_subimage()).unwrap();
    assert_eq!(regrid_sub.stokes_axis(), Some(2));
    let reordered = read_image_cube(names.lowres_reordered()).unwrap();
    assert_eq!(reordered.spectral_axis(), Some(2));
    assert_eq!(reordered.stokes_axis(), Some(3));
    assert!(names.feathered_pbcor().exists());
}

#[test]
fn test_pipeline_stops_at_failing_stage() {
    let tmp_dir = TempDir::new().unwrap();
    let (lowres, highres, pb) = inputs(1);
    let params = FeatherPipelineParams {
        names: names(tmp_dir.path()),
        lowres,
        highres,
        pb,
        reframe_to: None,
        bbox: BoundingBox::new(0, 0, 31, 31).unwrap(),
        // This swaps the celestial axes with the others.
        axis_order: Some("2301".parse::<AxisOrder>().unwrap()),
        feather_options: FeatherOptions::default(),
        pb_cutoff: 0.0,
    };
    let result = params.run();
    assert!(matches!(result, Err(PipelineError::Math { stage: PipelineStage::DePrimaryBeam, .. })));
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("de-primary-beam"), "{msg}");

    // Everything up to the failure has been written, and nothing after.
    let names = names(tmp_dir.path());
    assert!(names.lowres_reordered().exists());
    assert!(!names.lowres_depb().exists());
    assert!(!names.feathered().exists());
}
