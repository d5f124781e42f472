use crate::image::Image;
use crate::filter::{gauss_kernel::GaussKernel1D, prewitt_kernel::PrewittKernel, gaussian_2_d_convolution, filter_1d_convolution};
use crate::{Float,GradientDirection};
use crate::pyramid::sift::sift_runtime_params::SiftRuntimeParams;

/// One octave of the scale space: S+3 Gaussian levels, their gradients and S+2 DoG levels.
#[derive(Debug,Clone)]
pub struct SiftOctave {
    pub images: Vec<Image>,
    pub x_gradient: Vec<Image>,
    pub y_gradient: Vec<Image>,
    pub difference_of_gaussians: Vec<Image>,
    /// Blur of each Gaussian level relative to the octave's sampling grid
    pub sigmas: Vec<Float>
}

impl SiftOctave {

    /// `base_image` is expected to carry a blur of `sigma_initial` already.
    pub fn build_octave(base_image: &Image, s: usize, sigma_initial: Float, runtime_params: &SiftRuntimeParams) -> SiftOctave {
        let image_count = s + 3;
        let prewitt_kernel = PrewittKernel::new();

        let sigmas: Vec<Float> = (0..image_count).map(|i| sigma_initial*SiftOctave::generate_k(i as Float, s as Float)).collect();

        let mut images: Vec<Image> = Vec::with_capacity(image_count);
        images.push(base_image.clone());
        for i in 1..image_count {
            let sigma_increment = (sigmas[i].powi(2) - sigmas[i-1].powi(2)).sqrt();
            let kernel = GaussKernel1D::for_sigma(sigma_increment, runtime_params.blur_half_factor);
            let blurred = gaussian_2_d_convolution(&images[i-1], &kernel);
            images.push(blurred);
        }

        let x_gradient = images.iter().map(|image| filter_1d_convolution(image, GradientDirection::HORIZONTAL, &prewitt_kernel)).collect();
        let y_gradient = images.iter().map(|image| filter_1d_convolution(image, GradientDirection::VERTICAL, &prewitt_kernel)).collect();

        let difference_of_gaussians = images.windows(2).map(|pair| Image::difference(&pair[1], &pair[0])).collect();

        SiftOctave {images,x_gradient,y_gradient,difference_of_gaussians,sigmas}
    }

    /// k^n with k = 2^(1/s)
    pub fn generate_k(n: Float, s: Float) -> Float {
        assert!(n >= 0.0);
        let exp = n/s;
        exp.exp2()
    }

    pub fn s(&self) -> usize {
        self.sigmas.len() - 3
    }

    pub fn width(&self) -> usize {
        self.images[0].width()
    }

    pub fn height(&self) -> usize {
        self.images[0].height()
    }

    /// True if (x,y) keeps a distance of at least `border` to every image edge.
    pub fn within_range(&self, x: usize, y: usize, border: usize) -> bool {
        let height = self.height();
        let width = self.width();
        y >= border && y + border < height &&
        x >= border && x + border < width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;
    use nalgebra::DMatrix;

    fn checkerboard(size: usize) -> Image {
        let buffer = DMatrix::<Float>::from_fn(size, size, |r,c| ((r/4 + c/4) % 2) as Float);
        Image::from_matrix(&buffer, ImageEncoding::F64, false)
    }

    #[test]
    fn octave_has_expected_level_counts() {
        let params = SiftRuntimeParams::default();
        let octave = SiftOctave::build_octave(&checkerboard(32), params.sigma_count, params.sigma_initial, &params);
        assert_eq!(octave.images.len(), 6);
        assert_eq!(octave.x_gradient.len(), 6);
        assert_eq!(octave.y_gradient.len(), 6);
        assert_eq!(octave.difference_of_gaussians.len(), 5);
        assert_eq!(octave.s(), 3);
        assert!((octave.sigmas[3] - 3.2).abs() < 1e-12);
    }

    #[test]
    fn difference_of_gaussians_is_adjacent_level_difference() {
        let params = SiftRuntimeParams::default();
        let octave = SiftOctave::build_octave(&checkerboard(24), params.sigma_count, params.sigma_initial, &params);
        let expected = &octave.images[2].buffer - &octave.images[1].buffer;
        assert!((&octave.difference_of_gaussians[1].buffer - expected).amax() < 1e-12);
    }

    #[test]
    fn blur_reduces_variance_per_level() {
        let params = SiftRuntimeParams::default();
        let octave = SiftOctave::build_octave(&checkerboard(32), params.sigma_count, params.sigma_initial, &params);
        let variance = |image: &Image| {
            let mean = image.buffer.mean();
            image.buffer.iter().map(|v| (v - mean).powi(2)).sum::<Float>()
        };
        for i in 1..octave.images.len() {
            assert!(variance(&octave.images[i]) < variance(&octave.images[i-1]));
        }
    }
}
