use crate::{Float,float};
use float::consts::PI;
use super::kernel::Kernel;

/// Sampled 1D gaussian whose taps sum to one.
pub struct GaussKernel1D {
    kernel: Vec<Float>,
    step: usize,
}

impl GaussKernel1D {
    fn sample(mean: Float, std: Float, x:Float) -> Float {
        let exponent = (-0.5*((x-mean)/std).powi(2)).exp();
        let factor = 1.0/(std*(2.0*PI).sqrt());
        factor*exponent
    }

    pub fn new(mean: Float, std: Float, step: usize , half_width: Float ) -> GaussKernel1D {
        assert!(std > 0.0);
        let half_width_usize = half_width.trunc() as usize;
        assert_eq!(half_width_usize%step,0);

        let start = -(half_width_usize as isize);
        let end_exclusive = (half_width_usize as isize) + 1;
        let range = (start..end_exclusive).step_by(step);
        let mut kernel: Vec<Float> = range.map(|x| GaussKernel1D::sample(mean,std,x as Float)).collect();
        let l1_norm: Float = kernel.iter().sum();
        for v in kernel.iter_mut() {
            *v /= l1_norm;
        }

        GaussKernel1D {
            kernel,
            step
        }
    }

    /// Kernel for `sigma` with a half width of ceil(blur_half_factor*sigma)
    pub fn for_sigma(sigma: Float, blur_half_factor: Float) -> GaussKernel1D {
        GaussKernel1D::new(0.0, sigma, 1, GaussKernel1D::generate_blur_half_width(blur_half_factor, sigma))
    }

    pub fn generate_blur_half_width(blur_half_factor: Float, sigma: Float) -> Float {
        (blur_half_factor*sigma).ceil()
    }
}

impl Kernel for GaussKernel1D {
    fn kernel(&self) -> &Vec<Float> {
        &self.kernel
    }

    fn step(&self) -> usize {
        self.step
    }

    fn normalizing_constant(&self) -> Float{
        1.0
    }
}
