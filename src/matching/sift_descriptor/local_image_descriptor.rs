extern crate nalgebra as na;

use na::Vector2;
use crate::{Float,float};
use crate::numerics::{rotation_matrix_2d_from_orientation, gradient_and_orientation, gauss_2d_weight, wrap_angle};
use crate::pyramid::sift::{sift_octave::SiftOctave, sift_runtime_params::SiftRuntimeParams};
use crate::matching::sift_descriptor::{ORIENTATION_BINS, DESCRIPTOR_BINS, DESCRIPTOR_WIDTH, orientation_histogram::OrientationHistogram, keypoint::KeyPoint};

use float::consts::PI;

/// 4x4 grid of 8 bin gradient histograms, stored row major
#[derive(Debug,Clone)]
pub struct LocalImageDescriptor {
    pub x: usize,
    pub y: usize,
    pub descriptor_vector: Vec<OrientationHistogram>
}

impl LocalImageDescriptor {
    pub fn new(octave: &SiftOctave, keypoint: &KeyPoint, runtime_params: &SiftRuntimeParams) -> LocalImageDescriptor {
        let mut descriptor_vector = vec![OrientationHistogram::new(ORIENTATION_BINS);DESCRIPTOR_BINS];

        let width = DESCRIPTOR_WIDTH as Float;
        let cell_width = runtime_params.descriptor_scale_factor*keypoint.octave_scale;
        let half_extent = (cell_width*width/2.0*(2.0 as Float).sqrt() + 0.5).trunc();
        let radius = half_extent as isize;

        let x_gradient = &octave.x_gradient[keypoint.sigma_level];
        let y_gradient = &octave.y_gradient[keypoint.sigma_level];
        let rot_mat = rotation_matrix_2d_from_orientation(-keypoint.orientation);
        let key_x = keypoint.x as isize;
        let key_y = keypoint.y as isize;

        for y_off in -radius..radius+1 {
            for x_off in -radius..radius+1 {
                let rotated = rot_mat*Vector2::new(x_off as Float, y_off as Float);
                let row_bin = rotated[1]/cell_width + width/2.0 - 0.5;
                let column_bin = rotated[0]/cell_width + width/2.0 - 0.5;

                if row_bin <= -1.0 || row_bin >= width || column_bin <= -1.0 || column_bin >= width {
                    continue;
                }

                let (magnitude, orientation) = gradient_and_orientation(x_gradient, y_gradient, key_x + x_off, key_y + y_off);
                let relative_orientation = wrap_angle(orientation - keypoint.orientation);
                let orientation_bin = (relative_orientation + PI)/(2.0*PI)*(ORIENTATION_BINS as Float);
                let weight = gauss_2d_weight(x_off as Float, y_off as Float, half_extent)*magnitude;

                add_trilinear(&mut descriptor_vector, row_bin, column_bin, orientation_bin, weight);
            }
        }

        LocalImageDescriptor{x: keypoint.x, y: keypoint.y, descriptor_vector}
    }
}

/// Distributes `value` over the up to 8 histogram cells surrounding (row_bin, column_bin, orientation_bin).
/// The orientation axis is circular, the spatial axes drop contributions outside the grid.
pub fn add_trilinear(descriptor_vector: &mut Vec<OrientationHistogram>, row_bin: Float, column_bin: Float, orientation_bin: Float, value: Float) -> () {
    let r0 = row_bin.floor();
    let c0 = column_bin.floor();
    let o0 = orientation_bin.floor();
    let dr = row_bin - r0;
    let dc = column_bin - c0;
    let d_o = orientation_bin - o0;

    let orientation_bins = ORIENTATION_BINS as isize;
    let grid_width = DESCRIPTOR_WIDTH as isize;

    for (r, w_r) in [(r0 as isize, 1.0 - dr), (r0 as isize + 1, dr)] {
        if r < 0 || r >= grid_width {
            continue;
        }
        for (c, w_c) in [(c0 as isize, 1.0 - dc), (c0 as isize + 1, dc)] {
            if c < 0 || c >= grid_width {
                continue;
            }
            let histogram = &mut descriptor_vector[(r*grid_width + c) as usize];
            for (o, w_o) in [(o0 as isize, 1.0 - d_o), (o0 as isize + 1, d_o)] {
                histogram.bins[o.rem_euclid(orientation_bins) as usize] += value*w_r*w_c*w_o;
            }
        }
    }
}
