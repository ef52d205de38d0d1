// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;
use crate::tests::*;

#[test]
fn test_axis_kind_from_ctype() {
    assert_eq!(AxisKind::from_ctype("RA---SIN"), AxisKind::Longitude);
    assert_eq!(AxisKind::from_ctype("dec--tan"), AxisKind::Latitude);
    assert_eq!(AxisKind::from_ctype("GLON-CAR"), AxisKind::Longitude);
    assert_eq!(AxisKind::from_ctype("FREQ"), AxisKind::Spectral);
    assert_eq!(AxisKind::from_ctype("VRAD"), AxisKind::Spectral);
    assert_eq!(AxisKind::from_ctype("STOKES"), AxisKind::Stokes);
    assert_eq!(AxisKind::from_ctype("PIXEL"), AxisKind::Linear);
    assert_eq!(AxisKind::from_ctype(""), AxisKind::Linear);
}

#[test]
fn test_axis_pixel_world() {
    let axis = Axis::new("FREQ", 10, 230.0e9, 1.0e6, 1.0);
    assert_abs_diff_eq!(axis.pixel_to_world(0.0), 230.0e9);
    assert_abs_diff_eq!(axis.pixel_to_world(9.0), 230.009e9);
    assert_abs_diff_eq!(axis.world_to_pixel(230.0045e9), 4.5, epsilon = 1e-9);
}

#[test]
fn test_axes_with_shifted_reference_are_the_same() {
    let a = Axis::new("FREQ", 10, 230.0e9, 1.0e6, 1.0);
    // The same grid, just described with a different reference pixel.
    let b = Axis::new("FREQ", 10, 230.005e9, 1.0e6, 6.0);
    assert!(a.same_as(&b).is_ok());

    let c = Axis::new("FREQ", 10, 230.0e9, 1.0e6, 1.5);
    assert!(a.same_as(&c).is_err());
    let d = Axis::new("FREQ", 11, 230.0e9, 1.0e6, 1.0);
    assert!(a.same_as(&d).is_err());
    let e = Axis::new("VRAD", 10, 230.0e9, 1.0e6, 1.0);
    assert!(a.same_as(&e).is_err());
}

#[test]
fn test_tiny_grid_differences_are_tolerated() {
    let a = cube_axes(32, 32, 1, 1.0);
    let mut b = a.clone();
    b[0].crval += 1e-9 * b[0].cdelt.abs();
    b[1].cdelt *= 1.0 + 1e-12;
    for (a, b) in a.iter().zip(b.iter()) {
        assert!(a.same_as(b).is_ok());
    }
}

#[test]
fn test_same_grid_reports_axis() {
    let a = make_cube(cube_axes(8, 8, 2, 1.0), None, |_, _, _| 1.0);
    let mut axes = cube_axes(8, 8, 2, 1.0);
    axes[2].cdelt *= 2.0;
    let b = make_cube(axes, None, |_, _, _| 1.0);
    match a.same_grid(&b) {
        Err(ImageError::GridMismatch { axis, .. }) => assert_eq!(axis, 3),
        other => panic!("Expected a grid mismatch, got {other:?}"),
    }
    assert!(a.same_grid(&a.clone()).is_ok());
}

#[test]
fn test_new_pads_2d_image() {
    let axes = cube_axes(5, 3, 1, 1.0)[..2].to_vec();
    let data = ArrayD::from_shape_fn(IxDyn(&[3, 5]), |i| (i[0] * 5 + i[1]) as f32);
    let meta = test_meta(None);
    let image = ImageCube::new(axes, data, meta).unwrap();
    assert_eq!(image.dims(), vec![5, 3, 1, 1]);
    assert_eq!(image.spectral_axis(), Some(2));
    assert_eq!(image.stokes_axis(), Some(3));
    assert_abs_diff_eq!(image.axes[2].crval, CO_2_1);
    assert_eq!(image.data[(0, 0, 2, 4)], 14.0);
}

#[test]
fn test_new_pads_3d_stokes_image_with_freq() {
    let mut axes = cube_axes(5, 3, 1, 1.0);
    axes.remove(2);
    let data = ArrayD::zeros(IxDyn(&[1, 3, 5]));
    let image = ImageCube::new(axes, data, ImageMeta::default()).unwrap();
    assert_eq!(
        image.axis_kinds(),
        vec![
            AxisKind::Longitude,
            AxisKind::Latitude,
            AxisKind::Stokes,
            AxisKind::Spectral
        ]
    );
    assert_abs_diff_eq!(image.axes[3].crval, 0.0);
}

#[test]
fn test_new_drops_degenerate_fifth_axis() {
    let mut axes = cube_axes(4, 4, 2, 1.0);
    axes.push(Axis::new("TIME", 1, 0.0, 1.0, 1.0));
    let data = ArrayD::ones(IxDyn(&[1, 1, 2, 4, 4]));
    let image = ImageCube::new(axes.clone(), data, ImageMeta::default()).unwrap();
    assert_eq!(image.dims(), vec![4, 4, 2, 1]);

    axes[4].naxis = 2;
    let data = ArrayD::ones(IxDyn(&[2, 1, 2, 4, 4]));
    assert!(matches!(
        ImageCube::new(axes, data, ImageMeta::default()),
        Err(ImageError::TooManyAxes { axis: 5, .. })
    ));
}

#[test]
fn test_new_rejects_bad_shape() {
    let axes = cube_axes(4, 4, 2, 1.0);
    let data = ArrayD::ones(IxDyn(&[1, 2, 4, 5]));
    assert!(matches!(
        ImageCube::new(axes, data, ImageMeta::default()),
        Err(ImageError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_check_celestial_axes() {
    let image = make_cube(cube_axes(4, 4, 2, 1.0), None, |_, _, _| 0.0);
    assert!(image.check_celestial_axes().is_ok());

    let mut axes = cube_axes(4, 4, 1, 1.0);
    axes.swap(0, 2);
    let image = make_cube(axes, None, |_, _, _| 0.0);
    assert!(matches!(
        image.check_celestial_axes(),
        Err(ImageError::CelestialAxesNotFirst { .. })
    ));
}

#[test]
fn test_beam_area() {
    // A 1 arcsec circular beam.
    let beam = Beam::circular(1.0 / 3600.0);
    let expected = PI / (4.0 * std::f64::consts::LN_2) * (1.0 / 3600.0_f64).to_radians().powi(2);
    assert_abs_diff_eq!(beam.area_sr(), expected, epsilon = 1e-20);
    assert_abs_diff_eq!(beam.area_sr() / expected, 1.0, epsilon = 1e-12);
}

#[test]
fn test_beam_fourier_weight() {
    let beam = Beam::from_fwhm(10.0 / 3600.0, 5.0 / 3600.0, 0.0);
    assert_abs_diff_eq!(beam.fourier_weight(0.0, 0.0), 1.0);

    // The weight falls off faster along the major axis (north for PA 0).
    let u = 360.0;
    assert!(beam.fourier_weight(0.0, u) < beam.fourier_weight(u, 0.0));

    // Rotating the beam by 90° swaps the axes.
    let rotated = Beam::from_fwhm(10.0 / 3600.0, 5.0 / 3600.0, 90.0);
    assert_abs_diff_eq!(
        rotated.fourier_weight(u, 0.0),
        beam.fourier_weight(0.0, u),
        epsilon = 1e-12
    );

    // The FT of a Gaussian with FWHM θ is 1/2 at u = 2 ln 2 / (π θ).
    let circ = Beam::circular(1.0 / 3600.0);
    let u_half = 2.0 * std::f64::consts::LN_2 / (PI * circ.major_deg);
    assert_abs_diff_eq!(circ.fourier_weight(u_half, 0.0), 0.5, epsilon = 1e-12);
}

#[test]
fn test_bounding_box_parse() {
    let b: BoundingBox = "10,20,30,40".parse().unwrap();
    assert_eq!(b, BoundingBox::new(10, 20, 30, 40).unwrap());
    assert_eq!(b.width(), 21);
    assert_eq!(b.height(), 21);
    assert_eq!(b.to_string(), "10,20,30,40");

    let b: BoundingBox = " 0, 0, 0, 0 ".parse().unwrap();
    assert_eq!((b.width(), b.height()), (1, 1));

    assert!(matches!(
        "10,20,30".parse::<BoundingBox>(),
        Err(BoundingBoxError::Parse(_))
    ));
    assert!(matches!(
        "-1,20,30,40".parse::<BoundingBox>(),
        Err(BoundingBoxError::Parse(_))
    ));
    assert!(matches!(
        "30,20,10,40".parse::<BoundingBox>(),
        Err(BoundingBoxError::Inverted { .. })
    ));
}

#[test]
fn test_bounding_box_validate() {
    let b = BoundingBox::new(0, 0, 63, 31).unwrap();
    assert!(b.validate(64, 32).is_ok());
    assert!(matches!(
        b.validate(64, 31),
        Err(BoundingBoxError::OutOfBounds { nx: 64, ny: 31, .. })
    ));
    assert_eq!(BoundingBox::full(64, 32), b);
}

#[test]
fn test_axis_order_parse() {
    let o: AxisOrder = "0132".parse().unwrap();
    assert_eq!(o.0, [0, 1, 3, 2]);
    assert_eq!(o.to_string(), "0132");
    assert!(!o.is_identity());
    assert_eq!("0, 1, 2, 3".parse::<AxisOrder>().unwrap(), AxisOrder::identity());

    for bad in ["012", "01234", "0112", "01a3", "0124"] {
        assert!(bad.parse::<AxisOrder>().is_err(), "{bad}");
    }
}

#[test]
fn test_axis_order_inverse() {
    let o = AxisOrder([2, 0, 3, 1]);
    let inv = o.inverse();
    for i in 0..4 {
        assert_eq!(inv.0[o.0[i]], i);
    }
    assert_eq!(inv.inverse(), o);
}

#[test]
fn test_axis_order_between() {
    use AxisKind::*;
    let template = [Longitude, Latitude, Spectral, Stokes];
    let swapped = [Longitude, Latitude, Stokes, Spectral];
    assert_eq!(
        AxisOrder::between(&swapped, &template).unwrap(),
        AxisOrder([0, 1, 3, 2])
    );
    assert!(AxisOrder::between(&template, &template)
        .unwrap()
        .is_identity());

    let no_stokes = [Longitude, Latitude, Spectral, Linear];
    match AxisOrder::between(&no_stokes, &template) {
        Err(AxisOrderError::NoPermutation { missing, .. }) => {
            assert_eq!(missing, vec!["Stokes".to_string()])
        }
        other => panic!("Expected an error, got {other:?}"),
    }
}
