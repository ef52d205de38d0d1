// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{feather, get_cmd_output, write_inputs, Files};

#[test]
fn test_run_no_stderr() {
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
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "run failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_imhead_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let Files { lowres, .. } = write_inputs(tmp_dir.path());

    let cmd = feather().args(["imhead", &lowres]).ok();
    assert!(
        cmd.is_ok(),
        "imhead failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
