use fourier_image_explorer::{
    FilterConfig, FilterError, FilterKind, FilterOperation, FilterSettings, FrequencyFilter,
    LaplacianOutput, PassMode, SampleGrid, SpectralTransform, SpectrumVisualizer, TransferFunction,
};
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;

fn scene(width: usize, height: usize, seed: usize) -> SampleGrid {
    SampleGrid::from_fn(width, height, |x, y| {
        let background = 40 + (x * 3 + y * 2) % 60;
        let object = if x > width / 4 && x < width / 2 && y > height / 3 { 120 } else { 0 };
        ((background + object + seed * 7) % 256) as u8
    })
}

#[test]
fn test_constant_grid_has_only_a_dc_term() {
    let transform = SpectralTransform::new();
    let spectrum = transform.forward(&SampleGrid::filled(4, 4, 128)).unwrap();
    for v in 0..4 {
        for u in 0..4 {
            let expected = if (u, v) == (2, 2) { 2048.0 } else { 0.0 };
            assert!((spectrum.get(u, v).re - expected).abs() < 1e-9);
            assert!(spectrum.get(u, v).im.abs() < 1e-9);
        }
    }
    let restored = transform.inverse(spectrum).unwrap();
    assert!(restored.as_array().iter().all(|&v| v == 128));
}

#[test]
fn test_round_trip_for_odd_and_even_sizes() {
    let transform = SpectralTransform::new();
    for (width, height) in [(8, 8), (9, 7), (13, 6), (1, 5)] {
        let image = scene(width, height, 1);
        let restored = transform.inverse(transform.forward(&image).unwrap()).unwrap();
        for (p, q) in image.as_array().iter().zip(restored.as_array().iter()) {
            assert!((*p as i32 - *q as i32).abs() <= 1, "{width}x{height}");
        }
    }
}

#[test]
fn test_butterworth_with_large_cutoff_is_identity_on_gray_image() {
    let gray = GrayImage::from(&scene(8, 8, 3));
    let function = TransferFunction::butterworth(1.0, 1000.0).unwrap();
    let config = FilterConfig::new(function, PassMode::LowPass).unwrap();
    let filtered = FrequencyFilter::new().apply_distance_filter(&gray, &config).unwrap();
    for (p, q) in gray.pixels().zip(filtered.pixels()) {
        assert!((p.0[0] as i32 - q.0[0] as i32).abs() <= 1);
    }
}

#[test]
fn test_settings_drive_every_filter() {
    let image = scene(16, 12, 2);
    let filter = FrequencyFilter::new();
    for kind in [
        FilterKind::Ideal,
        FilterKind::Butterworth,
        FilterKind::Gaussian,
        FilterKind::CoefficientGaussian,
        FilterKind::HighBoost,
        FilterKind::Homomorphic,
        FilterKind::Laplacian,
    ] {
        let settings = FilterSettings {
            kind,
            cutoff: 4.0,
            ..Default::default()
        };
        let operation = settings.build().unwrap();
        let output = operation.apply(&filter, &image).unwrap();
        assert_eq!(output.dimensions(), (16, 12), "{kind}");
        assert_eq!(operation.mask(16, 12).unwrap().dimensions(), (16, 12));
    }
}

#[test]
fn test_parallel_runs_match_sequential_runs() {
    let images: Vec<SampleGrid> = (0..8).map(|seed| scene(24, 18, seed)).collect();
    let operations = [
        FilterOperation::from(
            FilterConfig::new(TransferFunction::gaussian(5.0).unwrap(), PassMode::HighPass)
                .unwrap(),
        ),
        FilterOperation::Laplacian(LaplacianOutput::Sharpen),
    ];
    let filter = FrequencyFilter::new();
    for operation in &operations {
        let sequential: Vec<SampleGrid> = images
            .iter()
            .map(|image| operation.apply(&filter, image).unwrap())
            .collect();
        let parallel: Vec<SampleGrid> = images
            .par_iter()
            .map(|image| operation.apply(&filter, image).unwrap())
            .collect();
        assert_eq!(sequential, parallel);
    }
}

#[test]
fn test_spectrum_image_of_filtered_scene() {
    let image = scene(16, 16, 0);
    let config = FilterConfig::new(TransferFunction::ideal(3.0).unwrap(), PassMode::LowPass)
        .unwrap();
    let filter = FrequencyFilter::new();
    let filtered = filter.apply_distance_filter(&image, &config).unwrap();
    let spectrum = filter.transform().forward(&filtered).unwrap();
    let display = SpectrumVisualizer::new().magnitude_image(&spectrum);
    assert_eq!(display.get(8, 8), 255);
    // everything outside the cutoff was removed up to rounding of the filtered image
    assert!(display.get(0, 0) < display.get(8, 8));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
    assert!(matches!(SampleGrid::try_from(&rgb), Err(FilterError::UnsupportedInput(_))));

    let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 3));
    assert!(matches!(SampleGrid::try_from(&empty), Err(FilterError::UnsupportedInput(_))));

    let err = TransferFunction::butterworth(0.0, 10.0).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, FilterError::ParameterOutOfRange { .. }));
}
