extern crate nalgebra as na;

use na::SVector;
use crate::Float;
use crate::matching::sift_descriptor::{ORIENTATION_BINS, DESCRIPTOR_BINS, DESCRIPTOR_LENGTH, DESCRIPTOR_CLIP, local_image_descriptor::LocalImageDescriptor, keypoint::KeyPoint};

pub type DescriptorData = SVector<Float,DESCRIPTOR_LENGTH>;

/// Final feature: location in the original image frame, scale, orientation and the 128 element signature
#[derive(Debug,Clone,PartialEq)]
pub struct FeatureVector {
    pub x: Float,
    pub y: Float,
    pub scale: Float,
    pub orientation: Float,
    pub octave_level: usize,
    pub data: DescriptorData
}

impl FeatureVector {
    pub fn new(descriptor: &LocalImageDescriptor, keypoint: &KeyPoint) -> FeatureVector {
        let mut data = DescriptorData::zeros();
        for i in 0..DESCRIPTOR_BINS {
            for j in 0..ORIENTATION_BINS {
                data[i*ORIENTATION_BINS + j] = descriptor.descriptor_vector[i].bins[j];
            }
        }

        l2_normalize(&mut data);
        clip_components(&mut data, DESCRIPTOR_CLIP);
        l2_normalize(&mut data);

        FeatureVector {
            x: keypoint.img_x/2.0,
            y: keypoint.img_y/2.0,
            scale: keypoint.scale,
            orientation: keypoint.orientation,
            octave_level: keypoint.octave_level,
            data
        }
    }

    pub fn from_parts(x: Float, y: Float, scale: Float, orientation: Float, data: DescriptorData) -> FeatureVector {
        FeatureVector {x, y, scale, orientation, octave_level: 0, data}
    }

    /// Squared euclidean distance between the signatures
    pub fn distance_between(&self, other_feature_vector: &FeatureVector) -> Float {
        (self.data - other_feature_vector.data).norm_squared()
    }
}

/// Scales to unit length. A zero vector is left untouched.
pub fn l2_normalize(data: &mut DescriptorData) -> () {
    let norm = data.norm();
    if norm > 0.0 {
        *data /= norm;
    }
}

pub fn clip_components(data: &mut DescriptorData, max_value: Float) -> () {
    data.apply(|v| *v = v.min(max_value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::sift_descriptor::orientation_histogram::OrientationHistogram;

    fn keypoint() -> KeyPoint {
        KeyPoint {
            x: 10, y: 12, sigma_level: 1, octave_level: 1,
            img_x: 21.0, img_y: 24.5, scale: 4.0, octave_scale: 2.0, orientation: 0.3
        }
    }

    #[test]
    fn dominant_bin_is_clipped() {
        let mut histograms = vec![OrientationHistogram::new(ORIENTATION_BINS);DESCRIPTOR_BINS];
        histograms[5].bins[3] = 100.0;
        histograms[0].bins[0] = 1.0;
        histograms[15].bins[7] = 2.0;
        let descriptor = LocalImageDescriptor{x: 10, y: 12, descriptor_vector: histograms};

        let mut clipped = DescriptorData::zeros();
        clipped[5*8+3] = 100.0;
        clipped[0] = 1.0;
        clipped[127] = 2.0;
        l2_normalize(&mut clipped);
        clip_components(&mut clipped, DESCRIPTOR_CLIP);
        assert!(clipped.iter().all(|&v| v <= DESCRIPTOR_CLIP));

        let feature = FeatureVector::new(&descriptor, &keypoint());
        assert!((feature.data.norm() - 1.0).abs() < 1e-12);
        assert_eq!(feature.data.imax(), 5*8+3);
        assert!(feature.data[5*8+3] < 1.0);
        assert_eq!((feature.x, feature.y), (10.5, 12.25));
    }

    #[test]
    fn zero_descriptor_stays_zero() {
        let descriptor = LocalImageDescriptor{x: 0, y: 0, descriptor_vector: vec![OrientationHistogram::new(ORIENTATION_BINS);DESCRIPTOR_BINS]};
        let feature = FeatureVector::new(&descriptor, &keypoint());
        assert!(feature.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn distance_is_squared() {
        let mut a = DescriptorData::zeros();
        let mut b = DescriptorData::zeros();
        a[0] = 3.0;
        b[1] = 4.0;
        let fa = FeatureVector::from_parts(0.0, 0.0, 1.0, 0.0, a);
        let fb = FeatureVector::from_parts(0.0, 0.0, 1.0, 0.0, b);
        assert!((fa.distance_between(&fb) - 25.0).abs() < 1e-12);
    }
}
