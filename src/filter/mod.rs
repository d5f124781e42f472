extern crate nalgebra as na;

use na::DMatrix;
use rayon::prelude::*;

use crate::image::Image;
use crate::GradientDirection;
use self::{kernel::Kernel,gauss_kernel::GaussKernel1D};

pub mod gauss_kernel;
pub mod prewitt_kernel;
pub mod kernel;


/// Convolves along one image axis. Samples outside the image wrap around.
pub fn filter_1d_convolution(source: &Image, filter_direction: GradientDirection, filter_kernel: &dyn Kernel) -> Image {
    let kernel = filter_kernel.kernel();
    let step = filter_kernel.step();
    let kernel_radius_signed = filter_kernel.half_width() as isize;
    let normalizing_constant = filter_kernel.normalizing_constant();

    let width = source.width();
    let height = source.height();

    let rows = (0..height).into_par_iter().map(|y| {
        (0..width).map(|x| {
            let mut acc = 0.0;
            for kenel_idx in (-kernel_radius_signed..kernel_radius_signed+1).step_by(step) {
                let sample_value = match filter_direction {
                    GradientDirection::HORIZONTAL => source.get_wrapped(x as isize + kenel_idx, y as isize),
                    GradientDirection::VERTICAL => source.get_wrapped(x as isize, y as isize + kenel_idx)
                };
                let kenel_value = kernel[(kenel_idx + kernel_radius_signed) as usize];
                acc += sample_value*kenel_value;
            }
            acc/normalizing_constant
        }).collect::<Vec<_>>()
    }).collect::<Vec<_>>();

    let row_major = rows.concat();
    Image {
        buffer: DMatrix::from_row_slice(height, width, &row_major),
        original_encoding: source.original_encoding
    }
}

/// Separable gaussian blur: rows first, then columns.
pub fn gaussian_2_d_convolution(image: &Image, filter_kernel: &GaussKernel1D) -> Image {
    let blur_hor = filter_1d_convolution(image,GradientDirection::HORIZONTAL, filter_kernel);
    filter_1d_convolution(&blur_hor,GradientDirection::VERTICAL, filter_kernel)
}
