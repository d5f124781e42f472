use serde::{Deserialize, Serialize};

use crate::{Float, SiftError};

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SiftRuntimeParams {
    /// Gaussian kernel half width as a multiple of sigma
    pub blur_half_factor: Float,
    pub orientation_histogram_window_factor: Float,
    pub orientation_sigma_factor: Float,
    /// Half width of the peak gradient window as a multiple of the octave scale
    pub gradient_window_factor: Float,
    pub descriptor_scale_factor: Float,
    /// Maximum principal curvature ratio r for the edge test
    pub edge_r: Float,
    /// Contrast threshold before division by the scales per octave
    pub contrast_r: Float,
    /// Fraction of the largest keypoint gradient a keypoint has to reach
    pub gradient_threshold: Float,
    /// Base blur sigma_0 of every octave
    pub sigma_initial: Float,
    /// Assumed blur of the source image
    pub sigma_in: Float,
    /// Scales per octave S
    pub sigma_count: usize,
    /// Shortest image edge at which octave generation stops
    pub min_image_dimension: usize,
    pub extrema_border: usize,
    pub max_refinement_iterations: usize
}

impl Default for SiftRuntimeParams {
    fn default() -> SiftRuntimeParams {
        SiftRuntimeParams {
            blur_half_factor: 4.0,
            orientation_histogram_window_factor: 3.0,
            orientation_sigma_factor: 1.5,
            gradient_window_factor: 1.5,
            descriptor_scale_factor: 3.0,
            edge_r: 10.0,
            contrast_r: 0.05,
            gradient_threshold: 0.1,
            sigma_initial: 1.6,
            sigma_in: 0.5,
            sigma_count: 3,
            min_image_dimension: 4,
            extrema_border: 4,
            max_refinement_iterations: 5
        }
    }
}

impl SiftRuntimeParams {
    pub fn validate(&self) -> Result<(), SiftError> {
        let invalid = |msg: &str| Err(SiftError::InvalidParameter(msg.to_string()));
        match self {
            p if p.sigma_count == 0 => invalid("sigma_count has to be at least 1"),
            p if p.sigma_initial <= 0.0 => invalid("sigma_initial has to be positive"),
            p if p.sigma_in < 0.0 => invalid("sigma_in can not be negative"),
            p if p.blur_half_factor <= 0.0 => invalid("blur_half_factor has to be positive"),
            p if p.edge_r <= 0.0 => invalid("edge_r has to be positive"),
            p if p.contrast_r < 0.0 => invalid("contrast_r can not be negative"),
            p if !(0.0..=1.0).contains(&p.gradient_threshold) => invalid("gradient_threshold has to lie in [0,1]"),
            p if p.orientation_sigma_factor <= 0.0 || p.orientation_histogram_window_factor <= 0.0 => invalid("orientation factors have to be positive"),
            p if p.gradient_window_factor < 0.0 => invalid("gradient_window_factor can not be negative"),
            p if p.descriptor_scale_factor <= 0.0 => invalid("descriptor_scale_factor has to be positive"),
            p if p.min_image_dimension == 0 => invalid("min_image_dimension has to be at least 1"),
            p if p.extrema_border == 0 => invalid("extrema_border has to be at least 1"),
            _ => Ok(())
        }
    }

    /// (r+1)^2/r
    pub fn edge_threshold(&self) -> Float {
        (self.edge_r+1.0).powi(2)/self.edge_r
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct MatchRuntimeParams {
    /// A match is accepted if nearest < ratio_threshold*second nearest
    pub ratio_threshold: Float
}

impl Default for MatchRuntimeParams {
    fn default() -> MatchRuntimeParams {
        MatchRuntimeParams {
            ratio_threshold: 0.6
        }
    }
}

impl MatchRuntimeParams {
    pub fn validate(&self) -> Result<(), SiftError> {
        match self.ratio_threshold {
            r if r > 0.0 && r <= 1.0 => Ok(()),
            r => Err(SiftError::InvalidParameter(format!("ratio_threshold {} has to lie in (0,1]", r)))
        }
    }
}
