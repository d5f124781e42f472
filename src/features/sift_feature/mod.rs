extern crate nalgebra as na;

use na::{DMatrix,Vector3};
use rayon::prelude::*;
use log::debug;
use std::fmt;

use crate::{Float, reconstruct_original_coordinates};
use crate::features::Feature;
use crate::pyramid::{Pyramid, sift::{sift_octave::SiftOctave, sift_runtime_params::SiftRuntimeParams}};

pub mod processing;

/// Scale space extremum. Location and sigma level refer to the sample grid of its octave.
#[derive(Debug,Clone,PartialEq)]
pub struct SiftFeature {
    pub x: usize,
    pub y: usize,
    pub octave_level: usize,
    pub sigma_level: usize,
    /// Sub sample offset (dx,dy,ds) found by refinement
    pub offset: Vector3<Float>,
    /// Location in the upsampled base frame
    pub img_x: Float,
    pub img_y: Float,
    /// Peak gradient magnitude around the feature
    pub gradient: Float
}

impl fmt::Display for SiftFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}, o: {}, s: {}", self.x, self.y, self.octave_level, self.sigma_level)
    }
}

impl Feature for SiftFeature {
    fn get_x_image(&self) -> usize {
        self.x
    }

    fn get_y_image(&self) -> usize {
        self.y
    }

    fn get_closest_sigma_level(&self) -> usize {
        self.sigma_level
    }
}

impl SiftFeature {
    pub fn new(x: usize, y: usize, octave_level: usize, sigma_level: usize) -> SiftFeature {
        let (img_x, img_y) = reconstruct_original_coordinates(x as Float, y as Float, octave_level);
        SiftFeature {
            x,
            y,
            octave_level,
            sigma_level,
            offset: Vector3::zeros(),
            img_x,
            img_y,
            gradient: 0.0
        }
    }

    /// Blur of the feature relative to its octave: sigma_0*2^((s+ds)/S)
    pub fn octave_scale(&self, runtime_params: &SiftRuntimeParams) -> Float {
        let s = runtime_params.sigma_count as Float;
        runtime_params.sigma_initial*((self.sigma_level as Float + self.offset[2])/s).exp2()
    }

    /// Blur in the upsampled base frame: sigma_0*2^(o+(s+ds)/S)
    pub fn scale(&self, runtime_params: &SiftRuntimeParams) -> Float {
        (self.octave_level as Float).exp2()*self.octave_scale(runtime_params)
    }
}

/// Samples of DoG level `sigma_level` which are strictly larger or strictly smaller than all 26 neighbours.
/// The neighbours are tested on the same level first, then the level above, then the level below.
pub fn detect_sift_feature(source_octave: &SiftOctave, octave_level: usize, sigma_level: usize, border: usize) -> Vec<SiftFeature> {

    assert!(sigma_level+1 < source_octave.difference_of_gaussians.len());
    assert!(sigma_level > 0);

    let image_buffer = &source_octave.difference_of_gaussians[sigma_level].buffer;
    let next_buffer = &source_octave.difference_of_gaussians[sigma_level+1].buffer;
    let prev_buffer = &source_octave.difference_of_gaussians[sigma_level-1].buffer;

    let border = border.max(1);
    let y_range = border..image_buffer.nrows().saturating_sub(border);
    let x_range = border..image_buffer.ncols().saturating_sub(border);

    y_range.into_par_iter().flat_map_iter(|y| {
        x_range.clone().filter(move |&x| {
            let sample_value = image_buffer[(y,x)];

            let (is_smallest_curr, is_largest_curr) = is_sample_extrema_in_neighbourhood(sample_value,x,y,image_buffer,true);
            if !(is_smallest_curr || is_largest_curr) {
                return false;
            }
            let (is_smallest_next, is_largest_next) = is_sample_extrema_in_neighbourhood(sample_value,x,y,next_buffer,false);
            let is_smallest = is_smallest_curr && is_smallest_next;
            let is_largest = is_largest_curr && is_largest_next;
            if !(is_smallest || is_largest) {
                return false;
            }
            let (is_smallest_prev, is_largest_prev) = is_sample_extrema_in_neighbourhood(sample_value,x,y,prev_buffer,false);
            (is_smallest && is_smallest_prev) || (is_largest && is_largest_prev)
        }).map(move |x| SiftFeature::new(x, y, octave_level, sigma_level))
    }).collect()
}

pub fn is_sample_extrema_in_neighbourhood(sample: Float, x_sample: usize, y_sample: usize, neighbourhood_buffer: &DMatrix<Float>, skip_center: bool) -> (bool,bool) {

    let mut is_smallest = true;
    let mut is_largest = true;

    for y in y_sample-1..y_sample+2 {
        for x in x_sample-1..x_sample+2 {

            if x == x_sample && y == y_sample && skip_center {
                continue;
            }

            let value = neighbourhood_buffer[(y,x)];
            is_smallest &= sample < value;
            is_largest &= sample > value;

            if !(is_smallest || is_largest) {
                return (false,false);
            }
        }
    }

    (is_smallest,is_largest)
}

/// Refines every extremum of one octave. `frame_width`/`frame_height` bound the upsampled base frame.
pub fn sift_feature_refinement(extrema: &Vec<SiftFeature>, source_octave: &SiftOctave, frame_width: Float, frame_height: Float, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    extrema.par_iter().filter_map(|x| processing::subpixel_refinement(source_octave, x, frame_width, frame_height, runtime_params)).collect()
}

/// Rejects edge responses and features whose peak gradient is small relative to the strongest one of the set.
pub fn filter_features(pyramid: &Pyramid<SiftOctave>, features: Vec<SiftFeature>, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    let with_gradient = features.into_par_iter().map(|mut feature| {
        let octave = &pyramid.octaves[feature.octave_level];
        let radius = (runtime_params.gradient_window_factor*feature.octave_scale(runtime_params)).ceil() as usize;
        feature.gradient = processing::peak_gradient(octave, &feature, radius);
        feature
    }).collect::<Vec<SiftFeature>>();

    let max_gradient = with_gradient.iter().map(|f| f.gradient).fold(0.0, Float::max);
    let gradient_cutoff = runtime_params.gradient_threshold*max_gradient;
    let edge_threshold = runtime_params.edge_threshold();
    debug!("filtering {} features, max gradient {}", with_gradient.len(), max_gradient);

    with_gradient.into_par_iter().filter(|feature| {
        let octave = &pyramid.octaves[feature.octave_level];
        let hessian = processing::harris_corner_matrix(octave, feature);
        !processing::reject_edge(&hessian, edge_threshold) && feature.gradient >= gradient_cutoff
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Image,image_encoding::ImageEncoding};
    use rand::{Rng,SeedableRng,rngs::SmallRng};

    fn random_octave(size: usize, seed: u64) -> SiftOctave {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dog = (0..5).map(|_| {
            let buffer = DMatrix::<Float>::from_fn(size, size, |_,_| rng.gen::<Float>());
            Image::from_matrix(&buffer, ImageEncoding::F64, false)
        }).collect::<Vec<Image>>();
        let images = (0..6).map(|_| Image::empty(size, size, ImageEncoding::F64)).collect::<Vec<Image>>();
        SiftOctave {
            x_gradient: images.clone(),
            y_gradient: images.clone(),
            images,
            difference_of_gaussians: dog,
            sigmas: vec![1.0;6]
        }
    }

    fn brute_force_extrema(octave: &SiftOctave, sigma_level: usize, border: usize) -> Vec<(usize,usize)> {
        let dog = &octave.difference_of_gaussians;
        let size = dog[0].width();
        let mut result = Vec::new();
        for y in border..size-border {
            for x in border..size-border {
                let v = dog[sigma_level].buffer[(y,x)];
                let mut neighbours = Vec::new();
                for s in sigma_level-1..sigma_level+2 {
                    for j in y-1..y+2 {
                        for i in x-1..x+2 {
                            if !(s == sigma_level && j == y && i == x) {
                                neighbours.push(dog[s].buffer[(j,i)]);
                            }
                        }
                    }
                }
                assert_eq!(neighbours.len(), 26);
                if neighbours.iter().all(|&n| v > n) || neighbours.iter().all(|&n| v < n) {
                    result.push((x,y));
                }
            }
        }
        result
    }

    #[test]
    fn candidates_match_brute_force_search() {
        let octave = random_octave(40, 7);
        for sigma_level in 1..4 {
            let mut detected = detect_sift_feature(&octave, 0, sigma_level, 4).iter().map(|f| (f.x,f.y)).collect::<Vec<_>>();
            let mut expected = brute_force_extrema(&octave, sigma_level, 4);
            detected.sort();
            expected.sort();
            assert!(!expected.is_empty());
            assert_eq!(detected, expected);
        }
    }

    #[test]
    fn plateau_is_not_an_extremum() {
        let mut octave = random_octave(16, 3);
        for dog in octave.difference_of_gaussians.iter_mut() {
            dog.buffer.fill(0.0);
        }
        octave.difference_of_gaussians[2].buffer[(8,8)] = 1.0;
        octave.difference_of_gaussians[2].buffer[(8,9)] = 1.0;
        assert!(detect_sift_feature(&octave, 0, 2, 4).is_empty());

        octave.difference_of_gaussians[2].buffer[(8,9)] = 0.5;
        let detected = detect_sift_feature(&octave, 1, 2, 4);
        assert_eq!(detected.len(), 1);
        assert_eq!((detected[0].x, detected[0].y), (8,8));
        assert_eq!((detected[0].img_x, detected[0].img_y), (16.0,16.0));
    }

    #[test]
    fn scales_follow_octave_and_level() {
        let params = SiftRuntimeParams::default();
        let mut feature = SiftFeature::new(5, 5, 2, 3);
        assert!((feature.octave_scale(&params) - 3.2).abs() < 1e-12);
        assert!((feature.scale(&params) - 12.8).abs() < 1e-12);
        feature.offset[2] = -0.5;
        assert!(feature.octave_scale(&params) < 3.2);
    }
}
