use nalgebra::DMatrix;

use sift::{Float, float, SiftError};
use sift::image::{Image, image_encoding::ImageEncoding};
use sift::filter::{gaussian_2_d_convolution, gauss_kernel::GaussKernel1D};
use sift::pyramid::sift::{detect_features, sift_runtime_params::SiftRuntimeParams};
use sift::matching::sift_descriptor::feature_vector::FeatureVector;

fn blurred_disk(size: usize, radius: Float) -> Image {
    let center = (size/2) as Float;
    let buffer = DMatrix::<Float>::from_fn(size, size, |r,c| {
        let distance = ((r as Float - center).powi(2) + (c as Float - center).powi(2)).sqrt();
        match distance <= radius {
            true => 1.0,
            false => 0.0
        }
    });
    let disk = Image::from_matrix(&buffer, ImageEncoding::F64, false);
    gaussian_2_d_convolution(&disk, &GaussKernel1D::for_sigma(1.0, 4.0))
}

fn closest_to(features: &Vec<FeatureVector>, x: Float, y: Float) -> Option<(Float,&FeatureVector)> {
    features.iter()
        .map(|f| (((f.x - x).powi(2) + (f.y - y).powi(2)).sqrt(), f))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

#[test]
fn disk_center_is_detected() {
    let image = blurred_disk(64, 8.0);
    let (features, statistics) = detect_features(&image, &SiftRuntimeParams::default()).unwrap();

    assert_eq!(statistics.octaves, 4);
    assert_eq!(statistics.descriptors, features.len());
    let (distance, _) = closest_to(&features, 32.0, 32.0).unwrap();
    assert!(distance < 2.0, "closest keypoint is {} px away from the disk center", distance);
}

#[test]
fn scale_grows_with_disk_radius() {
    let params = SiftRuntimeParams::default();
    let (small_features, _) = detect_features(&blurred_disk(64, 4.0), &params).unwrap();
    let (large_features, _) = detect_features(&blurred_disk(64, 8.0), &params).unwrap();

    let (small_distance, small) = closest_to(&small_features, 32.0, 32.0).unwrap();
    let (large_distance, large) = closest_to(&large_features, 32.0, 32.0).unwrap();
    assert!(small_distance < 2.0 && large_distance < 2.0);

    let ratio = large.scale/small.scale;
    assert!(ratio > 1.5 && ratio < 2.5, "scale ratio {}", ratio);
}

#[test]
fn features_are_normalized_oriented_and_sorted() {
    let (features, _) = detect_features(&blurred_disk(64, 8.0), &SiftRuntimeParams::default()).unwrap();
    assert!(!features.is_empty());

    for feature in features.iter() {
        let norm = feature.data.norm();
        assert!((norm - 1.0).abs() < 1e-9 || norm == 0.0);
        assert!(feature.orientation >= -float::consts::PI && feature.orientation < float::consts::PI);
        assert!(feature.x >= 0.0 && feature.x <= 64.0);
        assert!(feature.y >= 0.0 && feature.y <= 64.0);
    }
    for pair in features.windows(2) {
        assert!(pair[0].scale >= pair[1].scale);
    }
}

#[test]
fn uniform_image_has_no_features() {
    let image = Image::from_matrix(&DMatrix::<Float>::from_element(48, 40, 0.5), ImageEncoding::F64, false);
    let (features, statistics) = detect_features(&image, &SiftRuntimeParams::default()).unwrap();
    assert!(features.is_empty());
    assert_eq!(statistics.extrema, 0);
}

#[test]
fn zero_sized_image_is_rejected() {
    let image = Image::empty(0, 10, ImageEncoding::U8);
    let result = detect_features(&image, &SiftRuntimeParams::default());
    assert!(matches!(result, Err(SiftError::InvalidImage{width: 0, height: 10})));
}

#[test]
fn invalid_parameters_are_rejected() {
    let params = SiftRuntimeParams { sigma_initial: -1.0, ..Default::default() };
    let result = detect_features(&blurred_disk(32, 4.0), &params);
    assert!(matches!(result, Err(SiftError::InvalidParameter(_))));
}
