// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the whole feathering procedure.

use std::fs;

use indoc::formatdoc;
use tempfile::TempDir;

use crate::{feather, get_cmd_output, write_inputs, Files};
use feather::read_image_cube;

#[test]
fn test_run_writes_all_artifacts() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let out_dir = tmp_dir.path().join("out");
    let Files {
        lowres,
        highres,
        pb,
    } = write_inputs(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = feather()
        .args([
            "run",
            "--source-name", "Orion",
            "--band-name", "Band6",
            "--lowres-label", "spw17_TP",
            "--highres-label", "spw16_7m",
            "--lowres", &lowres,
            "--highres", &highres,
            "--pb", &pb,
            "--output-dir", &out_dir.display().to_string(),
            "--box", "4,4,27,27",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    for suffix in [
        "spw16_7m.image",
        "spw16_7m.pb",
        "spw17_TP.image",
        "spw17_TP.regrid",
        "spw17_TP.regrid.subimage",
        "spw16_7m.image.subimage",
        "spw16_7m.pb.subimage",
        "spw17_TP.regrid.subimage.ro",
        "spw17_TP.regrid.subimage.ro.depb",
        "feather_spw16_7m_and_spw17_TP.image",
        "feather_spw16_7m_and_spw17_TP.image.pbcor",
    ] {
        let file = out_dir.join(format!("Orion_Band6.{suffix}.fits"));
        assert!(file.exists(), "{} wasn't written", file.display());
    }

    let pbcor = read_image_cube(out_dir.join(
        "Orion_Band6.feather_spw16_7m_and_spw17_TP.image.pbcor.fits",
    ))
    .unwrap();
    assert_eq!(pbcor.dims(), vec![24, 24, 3, 1]);
    let reordered =
        read_image_cube(out_dir.join("Orion_Band6.spw17_TP.regrid.subimage.ro.fits")).unwrap();
    assert_eq!(reordered.axes[2].ctype, "FREQ");
    assert_eq!(reordered.axes[3].ctype, "STOKES");
}

#[test]
fn test_run_from_args_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let out_dir = tmp_dir.path().join("out");
    let Files {
        lowres,
        highres,
        pb,
    } = write_inputs(tmp_dir.path());
    let args_file = tmp_dir.path().join("feather.toml");
    fs::write(
        &args_file,
        formatdoc! {r#"
            source_name = "Orion"
            band_name = "Band6"
            lowres_label = "TP"
            highres_label = "7m"
            lowres = "{lowres}"
            highres = "{highres}"
            pb = "{pb}"
            output_dir = "{}"
            pb_cutoff = 0.2

            [feather]
            sd_factor = 1.1
        "#, out_dir.display()},
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = feather()
        .args([
            "run", &args_file.display().to_string(),
            "--save-toml", &saved.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(out_dir
        .join("Orion_Band6.feather_7m_and_TP.image.pbcor.fits")
        .exists());

    let saved = fs::read_to_string(saved).unwrap();
    assert!(saved.contains("sd_factor = 1.1"), "{saved}");
    assert!(saved.contains("pb_cutoff = 0.2"), "{saved}");
}

#[test]
fn test_run_dry_run_and_missing_args() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let out_dir = tmp_dir.path().join("out");
    let Files {
        lowres,
        highres,
        pb,
    } = write_inputs(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = feather()
        .args([
            "run",
            "-s", "Orion",
            "-b", "Band6",
            "--lowres-label", "TP",
            "--highres-label", "7m",
            "-l", &lowres,
            "-i", &highres,
            "-p", &pb,
            "-o", &out_dir.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!out_dir.exists());

    #[rustfmt::skip]
    let cmd = feather()
        .args([
            "run",
            "-s", "Orion",
            "-l", &lowres,
            "-i", &highres,
            "-p", &pb,
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("band name"), "{stderr}");
}
