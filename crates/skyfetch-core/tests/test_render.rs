use approx::assert_relative_eq;
use ndarray::{array, Array2};
use skyfetch_core::render::stretch::{finite_range, normalize};
use skyfetch_core::render::{DisplayImage, Origin, PngRenderer, Renderer, Stretch};

fn display(data: Array2<f64>, origin: Origin) -> DisplayImage {
    DisplayImage {
        title: "jw02738-o001_t001_nircam_clear-f200w_i2d.fits".to_string(),
        data,
        origin,
    }
}

#[test]
fn test_minmax_maps_to_unit_range() {
    let data = array![[10.0, 20.0], [30.0, 50.0]];
    let out = normalize(data.view(), &Stretch::MinMax);
    assert_relative_eq!(out[[0, 0]], 0.0);
    assert_relative_eq!(out[[0, 1]], 0.25);
    assert_relative_eq!(out[[1, 0]], 0.5);
    assert_relative_eq!(out[[1, 1]], 1.0);
}

#[test]
fn test_non_finite_values_are_black_and_ignored_for_range() {
    let data = array![[f64::NAN, 2.0], [f64::INFINITY, 4.0]];
    assert_eq!(finite_range(&data.view()), Some((2.0, 4.0)));

    let out = normalize(data.view(), &Stretch::MinMax);
    assert_relative_eq!(out[[0, 0]], 0.0);
    assert_relative_eq!(out[[1, 0]], 0.0);
    assert_relative_eq!(out[[0, 1]], 0.0);
    assert_relative_eq!(out[[1, 1]], 1.0);
}

#[test]
fn test_constant_image_is_black() {
    let data = Array2::from_elem((3, 3), 42.0);
    let out = normalize(data.view(), &Stretch::MinMax);
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn test_all_nan_has_no_range() {
    let data = Array2::from_elem((2, 2), f64::NAN);
    assert_eq!(finite_range(&data.view()), None);
    assert!(normalize(data.view(), &Stretch::MinMax)
        .iter()
        .all(|&v| v == 0.0));
}

#[test]
fn test_percentile_clips_outliers() {
    let mut values: Vec<f64> = (0..100).map(f64::from).collect();
    values[99] = 1.0e9;
    let data = Array2::from_shape_vec((10, 10), values).unwrap();
    let out = normalize(
        data.view(),
        &Stretch::Percentile {
            low: 0.0,
            high: 0.98,
        },
    );
    // The 98th percentile is pixel value 97; the outlier saturates.
    assert_relative_eq!(out[[9, 7]], 1.0);
    assert_relative_eq!(out[[9, 9]], 1.0);
    assert!(out[[5, 0]] > 0.4 && out[[5, 0]] < 0.6);
}

#[test]
fn test_large_image_takes_parallel_path() {
    let data = Array2::from_shape_fn((300, 300), |(r, c)| (r * 300 + c) as f64);
    let out = normalize(data.view(), &Stretch::MinMax);
    assert_relative_eq!(out[[0, 0]], 0.0);
    assert_relative_eq!(out[[299, 299]], 1.0);
    assert_eq!(out.dim(), (300, 300));
}

#[test]
fn test_large_image_percentile_sorts_in_parallel() {
    let mut data = Array2::from_shape_fn((300, 300), |(r, c)| (r * 300 + c) as f64);
    data[[0, 0]] = -1.0e9;
    data[[299, 299]] = 1.0e9;
    let out = normalize(data.view(), &Stretch::Percentile { low: 0.01, high: 0.99 });
    assert_relative_eq!(out[[0, 0]], 0.0);
    assert_relative_eq!(out[[299, 299]], 1.0);
    assert!(out[[150, 150]] > 0.4 && out[[150, 150]] < 0.6);
}

#[test]
fn test_upper_left_keeps_row_order() {
    let frame = display(array![[0.0, 0.0], [1.0, 1.0]], Origin::UpperLeft).to_frame(&Stretch::MinMax);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.width(), 2);
    assert_relative_eq!(frame.data[[0, 0]], 0.0);
    assert_relative_eq!(frame.data[[1, 0]], 1.0);
}

#[test]
fn test_lower_left_flips_rows() {
    let frame = display(array![[0.0, 0.0], [1.0, 1.0]], Origin::LowerLeft).to_frame(&Stretch::MinMax);
    assert_relative_eq!(frame.data[[0, 0]], 1.0);
    assert_relative_eq!(frame.data[[1, 1]], 0.0);
}

#[test]
fn test_stretch_display() {
    assert_eq!(Stretch::MinMax.to_string(), "Min/Max");
    assert_eq!(
        Stretch::percentile_default().to_string(),
        "Percentile 0.5%-99.5%"
    );
}

#[test]
fn test_png_renderer_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("renders");
    let mut renderer = PngRenderer::new(&out_dir, Stretch::MinMax);

    let image = display(array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]], Origin::UpperLeft);
    renderer.render(&image).unwrap();

    let expected = out_dir.join("jw02738-o001_t001_nircam_clear-f200w_i2d.png");
    assert_eq!(renderer.written, vec![expected.clone()]);

    let png = image::open(&expected).unwrap().to_luma8();
    assert_eq!(png.dimensions(), (3, 2));
    assert_eq!(png.get_pixel(0, 0).0[0], 0);
    assert_eq!(png.get_pixel(2, 1).0[0], 255);
    assert_eq!(png.get_pixel(1, 0).0[0], 51);
}

#[test]
fn test_png_path_sanitizes_title() {
    let renderer = PngRenderer::new("out", Stretch::MinMax);
    assert_eq!(
        renderer.path_for("hst_cube.FITS"),
        std::path::Path::new("out").join("hst_cube.png")
    );
    assert_eq!(
        renderer.path_for("x.fits?RUNID=abc"),
        std::path::Path::new("out").join("x.fits_RUNID_abc.png")
    );
    assert_eq!(
        renderer.path_for(".fits"),
        std::path::Path::new("out").join("image.png")
    );
}
