// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against command-line arguments shared between subcommands.

use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn test_parse_beam() {
    let beam = parse_beam("30").unwrap();
    assert_abs_diff_eq!(beam.major_deg, 30.0 / 3600.0);
    assert_abs_diff_eq!(beam.minor_deg, 30.0 / 3600.0);
    assert_abs_diff_eq!(beam.pa_deg, 0.0);

    let beam = parse_beam("0.5arcmin, 20arcsec").unwrap();
    assert_abs_diff_eq!(beam.major_deg, 30.0 / 3600.0);
    assert_abs_diff_eq!(beam.minor_deg, 20.0 / 3600.0);

    // A unitless position angle is in degrees.
    let beam = parse_beam("30,20,45").unwrap();
    assert_abs_diff_eq!(beam.pa_deg, 45.0);
    let beam = parse_beam("30,20,1rad").unwrap();
    assert_abs_diff_eq!(beam.pa_deg, 1.0_f64.to_degrees());
}

#[test]
fn test_parse_bad_beams() {
    for s in ["", "abc", "20,30", "-5", "30,20,45,1", "30deg,0"] {
        assert!(
            matches!(parse_beam(s), Err(FeatherArgsError::Beam { .. })),
            "'{s}' shouldn't parse"
        );
    }
}

#[test]
fn test_feather_args() {
    let options = FeatherArgs::default().parse().unwrap();
    assert_eq!(options, FeatherOptions::default());

    let options = FeatherArgs {
        sd_factor: Some(1.5),
        lowres_beam: Some("28.5".to_string()),
    }
    .parse()
    .unwrap();
    assert_abs_diff_eq!(options.sd_factor, 1.5);
    assert_eq!(options.lowres_beam, Some(Beam::circular(28.5 / 3600.0)));

    assert!(matches!(
        FeatherArgs {
            sd_factor: Some(0.0),
            ..Default::default()
        }
        .parse(),
        Err(FeatherArgsError::BadSdFactor(_))
    ));
}

#[test]
fn test_feather_args_merge_prefers_self() {
    let cli = FeatherArgs {
        sd_factor: Some(2.0),
        lowres_beam: None,
    };
    let file = FeatherArgs {
        sd_factor: Some(3.0),
        lowres_beam: Some("10".to_string()),
    };
    let merged = cli.merge(file);
    assert_eq!(merged.sd_factor, Some(2.0));
    assert_eq!(merged.lowres_beam.as_deref(), Some("10"));
}

#[test]
fn test_pb_cutoff() {
    assert_abs_diff_eq!(parse_pb_cutoff(None).unwrap(), DEFAULT_PB_CUTOFF);
    assert_abs_diff_eq!(parse_pb_cutoff(Some(0.2)).unwrap(), 0.2);
    assert!(parse_pb_cutoff(Some(-0.2)).is_err());
    assert!(parse_pb_cutoff(Some(f64::INFINITY)).is_err());
}
