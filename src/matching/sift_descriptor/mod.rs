use rayon::prelude::*;
use log::info;

use crate::Float;
use crate::pyramid::sift::sift_runtime_params::MatchRuntimeParams;
use self::feature_vector::FeatureVector;

pub mod orientation_histogram;
pub mod local_image_descriptor;
pub mod feature_vector;
pub mod keypoint;

/// Spatial cells of the descriptor grid
pub const DESCRIPTOR_BINS: usize = 16;
pub const DESCRIPTOR_WIDTH: usize = 4;
pub const ORIENTATION_BINS: usize = 8;
pub const DESCRIPTOR_LENGTH: usize = DESCRIPTOR_BINS*ORIENTATION_BINS;
pub const DESCRIPTOR_CLIP: Float = 0.2;
pub const ORIENTATION_HISTOGRAM_BINS: usize = 36;

/// Index of the nearest feature in `bs` if it is distinctly closer than the second nearest.
/// Requires at least two candidates.
pub fn match_feature(a: &FeatureVector, bs: &Vec<FeatureVector>, match_params: &MatchRuntimeParams) -> Option<usize> {
    if bs.len() < 2 {
        return None;
    }

    let mut nearest = (0, Float::INFINITY);
    let mut second_nearest_distance = Float::INFINITY;
    for (idx, b) in bs.iter().enumerate() {
        let distance = a.distance_between(b);
        if distance < nearest.1 {
            second_nearest_distance = nearest.1;
            nearest = (idx, distance);
        } else if distance < second_nearest_distance {
            second_nearest_distance = distance;
        }
    }

    // Distances are squared
    match nearest.1 < match_params.ratio_threshold.powi(2)*second_nearest_distance {
        true => Some(nearest.0),
        false => None
    }
}

/// Correspondences (index in a, index in b), ordered by the index in a
pub fn generate_match_pairs(feature_list_a: &Vec<FeatureVector>, feature_list_b: &Vec<FeatureVector>, match_params: &MatchRuntimeParams) -> Vec<(usize,usize)> {
    let pairs = feature_list_a.par_iter().enumerate()
        .filter_map(|(idx, a)| match_feature(a, feature_list_b, match_params).map(|b_idx| (idx, b_idx)))
        .collect::<Vec<(usize,usize)>>();
    info!("matched {} of {} features against {}", pairs.len(), feature_list_a.len(), feature_list_b.len());
    pairs
}
