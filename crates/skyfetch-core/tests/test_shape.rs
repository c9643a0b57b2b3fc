use approx::assert_relative_eq;
use ndarray::{Array, ArrayD, IxDyn};
use skyfetch_core::fits::HduData;
use skyfetch_core::render::Origin;
use skyfetch_core::shape::{classify, extract_display_plane, is_degenerate, Classification, SkipReason};

fn image(shape: &[usize]) -> ArrayD<f64> {
    let n: usize = shape.iter().product();
    Array::from_shape_vec(IxDyn(shape), (1..=n).map(|v| v as f64).collect()).unwrap()
}

#[test]
fn test_two_and_three_dims_render() {
    assert_eq!(classify(&HduData::Image(image(&[100, 100]))), Classification::Render);
    assert_eq!(classify(&HduData::Image(image(&[4, 10, 10]))), Classification::Render);
}

#[test]
fn test_more_than_three_dims_skipped() {
    let data = HduData::Image(image(&[2, 2, 3, 3]));
    assert_eq!(
        classify(&data),
        Classification::Skip(SkipReason::TooManyDims(4))
    );
}

#[test]
fn test_too_many_dims_wins_over_degenerate_content() {
    let data = HduData::Image(ArrayD::zeros(IxDyn(&[1, 1, 2, 2, 2])));
    assert_eq!(
        classify(&data),
        Classification::Skip(SkipReason::TooManyDims(5))
    );
}

#[test]
fn test_one_dimension_skipped() {
    assert_eq!(
        classify(&HduData::Image(image(&[5]))),
        Classification::Skip(SkipReason::OneDimensional)
    );
    assert_eq!(
        classify(&HduData::Table {
            rows: 12,
            row_bytes: 8
        }),
        Classification::Skip(SkipReason::OneDimensional)
    );
}

#[test]
fn test_all_zero_or_all_nan_skipped() {
    let zeros = HduData::Image(ArrayD::zeros(IxDyn(&[8, 8])));
    let nans = HduData::Image(ArrayD::from_elem(IxDyn(&[3, 8, 8]), f64::NAN));
    assert_eq!(classify(&zeros), Classification::Skip(SkipReason::NanOrZero));
    assert_eq!(classify(&nans), Classification::Skip(SkipReason::NanOrZero));
}

#[test]
fn test_mixed_nan_and_zero_is_not_degenerate() {
    let mut data = ArrayD::zeros(IxDyn(&[4, 4]));
    data[[0, 0]] = f64::NAN;
    assert!(!is_degenerate(&data));
    assert_eq!(classify(&HduData::Image(data)), Classification::Render);
}

#[test]
fn test_single_finite_pixel_renders() {
    let mut data = ArrayD::from_elem(IxDyn(&[4, 4]), f64::NAN);
    data[[2, 3]] = 7.0;
    assert_eq!(classify(&HduData::Image(data)), Classification::Render);
}

#[test]
fn test_skip_messages() {
    assert_eq!(
        SkipReason::TooManyDims(4).to_string(),
        "Data has over 3 dimensions (4)."
    );
    assert_eq!(
        SkipReason::OneDimensional.to_string(),
        "Data has only 1 dimension."
    );
    assert_eq!(
        SkipReason::NanOrZero.to_string(),
        "Data contains only NaNs or zeros."
    );
    assert_eq!(
        SkipReason::NoImageData.to_string(),
        "No image data found in extension 1."
    );
}

#[test]
fn test_two_dim_plane_is_shown_as_stored() {
    let data = image(&[3, 4]);
    let shown = extract_display_plane(&data, "a.fits").unwrap();
    assert_eq!(shown.title, "a.fits");
    assert_eq!(shown.origin, Origin::UpperLeft);
    assert_eq!(shown.data.dim(), (3, 4));
    assert_relative_eq!(shown.data[[0, 0]], 1.0);
    assert_relative_eq!(shown.data[[2, 3]], 12.0);
}

#[test]
fn test_three_dim_shows_first_plane_lower_left() {
    let data = image(&[4, 2, 3]);
    let shown = extract_display_plane(&data, "cube.fits").unwrap();
    assert_eq!(shown.origin, Origin::LowerLeft);
    assert_eq!(shown.data.dim(), (2, 3));
    // Plane 0 holds the first 6 values.
    assert_relative_eq!(shown.data[[0, 0]], 1.0);
    assert_relative_eq!(shown.data[[1, 2]], 6.0);
}

#[test]
fn test_other_dims_cannot_be_displayed() {
    assert!(extract_display_plane(&image(&[5]), "x").is_err());
    assert!(extract_display_plane(&image(&[1, 1, 2, 2]), "x").is_err());
}
