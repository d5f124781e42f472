use rayon::prelude::*;
use log::{info,debug};

use crate::{Float, SiftError};
use crate::image::Image;
use crate::filter::{gauss_kernel::GaussKernel1D,gaussian_2_d_convolution};
use crate::pyramid::{Pyramid,sift::{sift_octave::SiftOctave,sift_runtime_params::SiftRuntimeParams}};
use crate::features::sift_feature::{self, SiftFeature};
use crate::matching::sift_descriptor::{
    feature_vector::FeatureVector,
    orientation_histogram::generate_keypoint_from_feature,
    local_image_descriptor::LocalImageDescriptor,
    keypoint::KeyPoint
};

pub mod sift_runtime_params;
pub mod sift_octave;

pub type SiftPyramid = Pyramid<SiftOctave>;

/// Number of features surviving each stage of the detector
#[derive(Debug,Clone,Copy,Default,PartialEq)]
pub struct SiftStatistics {
    pub octaves: usize,
    pub extrema: usize,
    pub refined: usize,
    pub filtered: usize,
    pub descriptors: usize
}

/// Largest k for which the shorter edge of the source, halved k times, is not below `min_image_dimension`. At least 1.
pub fn octave_count(width: usize, height: usize, min_image_dimension: usize) -> usize {
    let mut short_edge = std::cmp::min(width, height);
    let mut count = 0;
    while short_edge / 2 >= min_image_dimension {
        short_edge /= 2;
        count += 1;
    }
    std::cmp::max(count, 1)
}

pub fn build_sift_pyramid(base_image: &Image, runtime_params: &SiftRuntimeParams) -> Result<SiftPyramid, SiftError> {
    base_image.validate()?;
    runtime_params.validate()?;

    let octave_count = octave_count(base_image.width(), base_image.height(), runtime_params.min_image_dimension);
    let sigma_count = runtime_params.sigma_count;
    let mut octaves: Vec<SiftOctave> = Vec::with_capacity(octave_count);

    let upsample = Image::upsample_double(base_image);
    // The upsampled source already carries a blur of 2*sigma_in
    let initial_blur_sigma = (runtime_params.sigma_initial.powi(2) - (2.0*runtime_params.sigma_in).powi(2)).sqrt();
    let mut octave_image = match initial_blur_sigma {
        sigma if sigma > 0.0 => gaussian_2_d_convolution(&upsample, &GaussKernel1D::for_sigma(sigma, runtime_params.blur_half_factor)),
        _ => upsample
    };

    for i in 0..octave_count {
        if i > 0 {
            octave_image = Image::downsample_half(&octaves[i-1].images[sigma_count]);
        }

        let new_octave = SiftOctave::build_octave(&octave_image, sigma_count, runtime_params.sigma_initial, runtime_params);
        debug!("octave {} built with size {}x{}", i, new_octave.width(), new_octave.height());
        octaves.push(new_octave);
    }

    Ok(Pyramid{octaves})
}

/// Raw extrema of all DoG levels 1..=S of all octaves
pub fn extrema_from_pyramid(pyramid: &SiftPyramid, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    let mut all_extrema = Vec::<Vec<SiftFeature>>::new();

    for (octave_level, octave) in pyramid.octaves.iter().enumerate() {
        for sigma_level in 1..octave.s()+1 {
            all_extrema.push(sift_feature::detect_sift_feature(octave, octave_level, sigma_level, runtime_params.extrema_border));
        }
    }

    all_extrema.into_iter().flatten().collect()
}

pub fn refine_extrema(pyramid: &SiftPyramid, extrema: &Vec<SiftFeature>, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    let frame_width = pyramid.octaves[0].width() as Float;
    let frame_height = pyramid.octaves[0].height() as Float;

    (0..pyramid.octaves.len()).map(|octave_level| {
        let octave_extrema = extrema.iter().filter(|x| x.octave_level == octave_level).cloned().collect::<Vec<SiftFeature>>();
        sift_feature::sift_feature_refinement(&octave_extrema, &pyramid.octaves[octave_level], frame_width, frame_height, runtime_params)
    }).flatten().collect()
}

/// Extrema that survive refinement and filtering, with scale and orientation assigned
pub fn keypoints_from_pyramid(pyramid: &SiftPyramid, runtime_params: &SiftRuntimeParams) -> Vec<KeyPoint> {
    let (keypoints, _) = keypoints_with_statistics(pyramid, runtime_params);
    keypoints
}

fn keypoints_with_statistics(pyramid: &SiftPyramid, runtime_params: &SiftRuntimeParams) -> (Vec<KeyPoint>, SiftStatistics) {
    let extrema = extrema_from_pyramid(pyramid, runtime_params);
    let refined = refine_extrema(pyramid, &extrema, runtime_params);
    let refined_count = refined.len();
    let filtered = sift_feature::filter_features(pyramid, refined, runtime_params);

    let keypoints = filtered.par_iter()
        .map(|x| generate_keypoint_from_feature(&pyramid.octaves[x.octave_level], x, runtime_params))
        .collect::<Vec<KeyPoint>>();

    let statistics = SiftStatistics {
        octaves: pyramid.octaves.len(),
        extrema: extrema.len(),
        refined: refined_count,
        filtered: filtered.len(),
        descriptors: 0
    };
    debug!("{:?}", statistics);

    (keypoints, statistics)
}

pub fn feature_vectors_from_keypoints(pyramid: &SiftPyramid, keypoints: &Vec<KeyPoint>, runtime_params: &SiftRuntimeParams) -> Vec<FeatureVector> {
    let mut feature_vectors = keypoints.par_iter().map(|keypoint| {
        let octave = &pyramid.octaves[keypoint.octave_level];
        let descriptor = LocalImageDescriptor::new(octave, keypoint, runtime_params);
        FeatureVector::new(&descriptor, keypoint)
    }).collect::<Vec<FeatureVector>>();

    sort_by_descending_scale(&mut feature_vectors);
    feature_vectors
}

pub fn feature_vectors_from_pyramid(pyramid: &SiftPyramid, runtime_params: &SiftRuntimeParams) -> Vec<FeatureVector> {
    let keypoints = keypoints_from_pyramid(pyramid, runtime_params);
    feature_vectors_from_keypoints(pyramid, &keypoints, runtime_params)
}

/// Stable sort, largest scale first
pub fn sort_by_descending_scale(feature_vectors: &mut Vec<FeatureVector>) -> () {
    feature_vectors.sort_by(|a, b| b.scale.total_cmp(&a.scale));
}

/// Runs the whole detector on a single channel image
pub fn detect_features(image: &Image, runtime_params: &SiftRuntimeParams) -> Result<(Vec<FeatureVector>, SiftStatistics), SiftError> {
    let pyramid = build_sift_pyramid(image, runtime_params)?;
    info!("pyramid with {} octaves built for {}x{} image", pyramid.octave_count(), image.width(), image.height());

    let (keypoints, mut statistics) = keypoints_with_statistics(&pyramid, runtime_params);
    info!("{} extrema, {} refined, {} after filtering", statistics.extrema, statistics.refined, statistics.filtered);

    let feature_vectors = feature_vectors_from_keypoints(&pyramid, &keypoints, runtime_params);
    statistics.descriptors = feature_vectors.len();
    info!("{} descriptors", statistics.descriptors);

    Ok((feature_vectors, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;
    use nalgebra::DMatrix;

    #[test]
    fn octave_count_follows_short_edge() {
        assert_eq!(octave_count(64, 64, 4), 4);
        assert_eq!(octave_count(640, 480, 4), 6);
        assert_eq!(octave_count(5, 100, 4), 1);
        assert_eq!(octave_count(2, 2, 4), 1);
    }

    #[test]
    fn pyramid_octaves_halve() {
        let buffer = DMatrix::<Float>::from_fn(32, 48, |r,c| ((r*7 + c*3) % 11) as Float / 10.0);
        let image = Image::from_matrix(&buffer, ImageEncoding::F64, false);
        let params = SiftRuntimeParams::default();
        let pyramid = build_sift_pyramid(&image, &params).unwrap();
        assert_eq!(pyramid.octave_count(), 3);
        assert_eq!((pyramid.octaves[0].width(), pyramid.octaves[0].height()), (96, 64));
        assert_eq!((pyramid.octaves[1].width(), pyramid.octaves[1].height()), (48, 32));
        assert_eq!((pyramid.octaves[2].width(), pyramid.octaves[2].height()), (24, 16));
        for octave in pyramid.octaves.iter() {
            assert_eq!(octave.images.len(), params.sigma_count + 3);
            assert_eq!(octave.difference_of_gaussians.len(), params.sigma_count + 2);
        }
    }

    #[test]
    fn empty_image_is_an_error() {
        let image = Image::empty(0, 0, ImageEncoding::U8);
        let result = detect_features(&image, &SiftRuntimeParams::default());
        assert!(matches!(result, Err(SiftError::InvalidImage{..})));
    }

    #[test]
    fn sorting_puts_large_scales_first() {
        let data = crate::matching::sift_descriptor::feature_vector::DescriptorData::zeros();
        let mut features = vec![1.0, 4.0, 2.5].into_iter().map(|s| FeatureVector::from_parts(0.0, 0.0, s, 0.0, data)).collect::<Vec<_>>();
        sort_by_descending_scale(&mut features);
        assert_eq!(features.iter().map(|f| f.scale).collect::<Vec<_>>(), vec![4.0, 2.5, 1.0]);
    }
}
