// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against running the feathering stages one at a time.

use tempfile::TempDir;

use crate::{feather, get_cmd_output, write_inputs, Files};
use feather::read_image_cube;

#[test]
fn test_stages_by_hand() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files {
        lowres,
        highres,
        pb,
    } = write_inputs(tmp_dir.path());
    let path = |name: &str| tmp_dir.path().join(name).display().to_string();
    let regridded = path("tp.regrid.fits");
    let reordered = path("tp.ro.fits");
    let depb = path("tp.depb.fits");
    let feathered = path("feathered.fits");
    let pbcor = path("feathered.pbcor.fits");

    #[rustfmt::skip]
    let steps: [Vec<&str>; 5] = [
        vec!["regrid", &lowres, "--template", &pb, "-o", &regridded],
        vec!["transpose", &regridded, "--template", &pb, "-o", &reordered],
        vec!["immath", &reordered, &pb, "--expr", "IM0*IM1", "-o", &depb],
        vec!["feather", "-i", &highres, "-l", &depb, "-o", &feathered],
        vec!["pbcor", &feathered, "--pb", &pb, "--pb-cutoff", "0.1", "-o", &pbcor],
    ];
    for step in steps {
        let cmd = feather().args(&step).arg("--no-progress-bars").ok();
        assert!(cmd.is_ok(), "{step:?} failed: {:?}", get_cmd_output(cmd));
    }

    let pbcor = read_image_cube(&pbcor).unwrap();
    assert_eq!(pbcor.dims(), vec![32, 32, 3, 1]);
    // The corners of the primary beam are below the cutoff.
    assert!(pbcor.data[(0, 0, 0, 0)].is_nan());
    assert!(pbcor.data[(0, 0, 16, 16)].is_finite());
}

#[test]
fn test_imhead_get() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files { highres, .. } = write_inputs(tmp_dir.path());

    let cmd = feather()
        .args(["imhead", &highres, "--key", "CTYPE3"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.lines().any(|l| l.trim() == "FREQ"), "{stdout}");

    let cmd = feather().args(["imhead", &highres, "--key", "NOPE"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("NOPE"), "{stderr}");
}
