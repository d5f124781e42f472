use crate::Float;
use crate::features::{Feature, sift_feature::SiftFeature};
use crate::pyramid::sift::sift_runtime_params::SiftRuntimeParams;

/// Refined feature with its scale and dominant orientation
#[derive(Debug,Clone,PartialEq)]
pub struct KeyPoint {
    pub x: usize,
    pub y: usize,
    pub sigma_level: usize,
    pub octave_level: usize,
    /// Location in the upsampled base frame
    pub img_x: Float,
    pub img_y: Float,
    pub scale: Float,
    pub octave_scale: Float,
    /// Radians in [-pi,pi)
    pub orientation: Float
}

impl KeyPoint {
    pub fn new(feature: &SiftFeature, orientation: Float, runtime_params: &SiftRuntimeParams) -> KeyPoint {
        KeyPoint {
            x: feature.x,
            y: feature.y,
            sigma_level: feature.sigma_level,
            octave_level: feature.octave_level,
            img_x: feature.img_x,
            img_y: feature.img_y,
            scale: feature.scale(runtime_params),
            octave_scale: feature.octave_scale(runtime_params),
            orientation
        }
    }
}

impl Feature for KeyPoint {
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
