use crate::{float,Float};
use crate::features::sift_feature::SiftFeature;
use crate::numerics::{gauss_2d_weight, gradient_and_orientation, parabolic_peak_offset, wrap_angle};
use crate::pyramid::sift::{sift_octave::SiftOctave, sift_runtime_params::SiftRuntimeParams};
use crate::matching::sift_descriptor::{ORIENTATION_HISTOGRAM_BINS, keypoint::KeyPoint};

use float::consts::PI;

/// Circular histogram over [-pi,pi). Bin i covers [-pi + i*bin_range, -pi + (i+1)*bin_range).
#[derive(Debug,Clone,PartialEq)]
pub struct OrientationHistogram {
    pub bin_range: Float,
    pub bins: Vec<Float>
}

impl OrientationHistogram {

    pub fn new(bin_len: usize) -> OrientationHistogram {
        OrientationHistogram {
            bin_range: 2.0*PI/(bin_len as Float),
            bins: vec![0.0;bin_len]
        }
    }

    pub fn add_measurement(&mut self, grad_orientation: (Float,Float), weight: Float) -> () {
        let (grad, orientation) = grad_orientation;
        let index = radian_to_index(self, orientation);
        self.bins[index] += grad*weight;
    }

    pub fn get_value_circular(&self, i: isize) -> Float {
        let len = self.bins.len() as isize;
        self.bins[i.rem_euclid(len) as usize]
    }

    /// One pass of the circular [0.25,0.5,0.25] filter
    pub fn smooth(&mut self) -> () {
        let smoothed = (0..self.bins.len() as isize).map(|idx|
            0.25*self.get_value_circular(idx-1) + 0.5*self.get_value_circular(idx) + 0.25*self.get_value_circular(idx+1)
        ).collect();
        self.bins = smoothed;
    }

    /// Index of the largest bin. Ties resolve to the lowest index.
    pub fn max_bin(&self) -> usize {
        self.bins.iter().enumerate().fold((0, Float::NEG_INFINITY), |(best_idx, best), (idx, &v)| {
            match v > best {
                true => (idx, v),
                false => (best_idx, best)
            }
        }).0
    }

    /// Orientation of the parabola fitted through the largest bin and its circular neighbours
    pub fn peak_orientation(&self) -> Float {
        let max_idx = self.max_bin();
        let idx = max_idx as isize;
        let offset = parabolic_peak_offset(self.get_value_circular(idx-1), self.get_value_circular(idx), self.get_value_circular(idx+1));
        index_to_radian(self, max_idx as Float + offset)
    }
}

/// Converts a fractional bin index back to radians using the bin centre, wrapped into [-pi,pi)
pub fn index_to_radian(histogram: &OrientationHistogram, index: Float) -> Float {
    wrap_angle((index + 0.5)*histogram.bin_range - PI)
}

pub fn radian_to_index(histogram: &OrientationHistogram, orientation: Float) -> usize {
    let len = histogram.bins.len();
    let index = ((orientation + PI)/histogram.bin_range).floor().max(0.0) as usize;
    index.min(len-1)
}

/// Dominant gradient orientation around a refined feature
pub fn generate_keypoint_from_feature(octave: &SiftOctave, feature: &SiftFeature, runtime_params: &SiftRuntimeParams) -> KeyPoint {
    let octave_scale = feature.octave_scale(runtime_params);
    let sigma = runtime_params.orientation_sigma_factor*octave_scale;
    let w = (runtime_params.orientation_histogram_window_factor*sigma).round() as isize;
    let x_grad = &octave.x_gradient[feature.sigma_level];
    let y_grad = &octave.y_gradient[feature.sigma_level];
    let x = feature.x as isize;
    let y = feature.y as isize;

    let mut histogram = OrientationHistogram::new(ORIENTATION_HISTOGRAM_BINS);
    for y_off in -w..w+1 {
        for x_off in -w..w+1 {
            let weight = gauss_2d_weight(x_off as Float, y_off as Float, sigma);
            let grad_orientation = gradient_and_orientation(x_grad, y_grad, x + x_off, y + y_off);
            histogram.add_measurement(grad_orientation, weight);
        }
    }

    histogram.smooth();
    histogram.smooth();

    KeyPoint::new(feature, histogram.peak_orientation(), runtime_params)
}
