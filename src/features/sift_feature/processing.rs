extern crate nalgebra as na;

use na::{Matrix2,Matrix3,Vector3};
use crate::pyramid::sift::{sift_octave::SiftOctave, sift_runtime_params::SiftRuntimeParams};
use crate::{Float, reconstruct_original_coordinates};
use crate::features::{Feature,sift_feature::SiftFeature};
use crate::numerics::gradient_and_orientation;

fn dog_sample(source_octave: &SiftOctave, x: usize, y: usize, sigma_level: usize) -> Float {
    source_octave.difference_of_gaussians[sigma_level].buffer[(y,x)]
}

/// Central difference gradient (dx,dy,ds) of the DoG stack
pub fn dog_gradient(source_octave: &SiftOctave, feature: &dyn Feature) -> Vector3<Float> {
    let x = feature.get_x_image();
    let y = feature.get_y_image();
    let s = feature.get_closest_sigma_level();

    let dx = (dog_sample(source_octave, x+1, y, s) - dog_sample(source_octave, x-1, y, s))/2.0;
    let dy = (dog_sample(source_octave, x, y+1, s) - dog_sample(source_octave, x, y-1, s))/2.0;
    let ds = (dog_sample(source_octave, x, y, s+1) - dog_sample(source_octave, x, y, s-1))/2.0;

    Vector3::new(dx,dy,ds)
}

/// Hessian of the DoG stack in (x,y,s)
pub fn dog_hessian(source_octave: &SiftOctave, feature: &dyn Feature) -> Matrix3<Float> {
    let x = feature.get_x_image();
    let y = feature.get_y_image();
    let s = feature.get_closest_sigma_level();
    let d = |x: usize, y: usize, s: usize| dog_sample(source_octave, x, y, s);

    let center = d(x,y,s);
    let dxx = d(x+1,y,s) - 2.0*center + d(x-1,y,s);
    let dyy = d(x,y+1,s) - 2.0*center + d(x,y-1,s);
    let dss = d(x,y,s+1) - 2.0*center + d(x,y,s-1);
    let dxy = (d(x+1,y+1,s) - d(x-1,y+1,s) - d(x+1,y-1,s) + d(x-1,y-1,s))/4.0;
    let dxs = (d(x+1,y,s+1) - d(x-1,y,s+1) - d(x+1,y,s-1) + d(x-1,y,s-1))/4.0;
    let dys = (d(x,y+1,s+1) - d(x,y-1,s+1) - d(x,y+1,s-1) + d(x,y-1,s-1))/4.0;

    Matrix3::new(dxx,dxy,dxs,
                 dxy,dyy,dys,
                 dxs,dys,dss)
}

/// Spatial 2x2 Hessian of the DoG level the feature lives on
pub fn harris_corner_matrix(source_octave: &SiftOctave, feature: &dyn Feature) -> Matrix2<Float> {
    let hessian = dog_hessian(source_octave, feature);
    Matrix2::new(hessian[(0,0)],hessian[(0,1)],
                 hessian[(1,0)],hessian[(1,1)])
}

/// True if the principal curvature ratio indicates an edge response.
/// `edge_threshold` is (r+1)^2/r.
pub fn reject_edge(hessian: &Matrix2<Float>, edge_threshold: Float) -> bool {
    let trace = hessian.trace();
    let determinant = hessian.determinant();
    if determinant <= 0.0 {
        return true;
    }
    trace.powi(2)/determinant > edge_threshold
}

/// Iterated Newton localisation of an extremum in (x,y,s).
/// Returns `None` if the candidate does not converge, drifts out of the valid sample range,
/// has a singular Hessian or falls below the contrast threshold.
pub fn subpixel_refinement(source_octave: &SiftOctave, feature: &SiftFeature, frame_width: Float, frame_height: Float, runtime_params: &SiftRuntimeParams) -> Option<SiftFeature> {
    let s = source_octave.s();
    let border = runtime_params.extrema_border;
    let mut refined = feature.clone();
    let mut solution: Option<(Vector3<Float>,Vector3<Float>)> = None;

    for _ in 0..runtime_params.max_refinement_iterations {
        let gradient = dog_gradient(source_octave, &refined);
        let hessian = dog_hessian(source_octave, &refined);
        let offset = -(hessian.try_inverse()?*gradient);

        if offset.iter().all(|v| v.abs() < 0.5) {
            solution = Some((gradient,offset));
            break;
        }

        let new_x = refined.x as Float + offset[0].round();
        let new_y = refined.y as Float + offset[1].round();
        let new_s = refined.sigma_level as Float + offset[2].round();

        if new_s < 1.0 || new_s > s as Float || new_x < 0.0 || new_y < 0.0 {
            return None;
        }

        refined.x = new_x as usize;
        refined.y = new_y as usize;
        refined.sigma_level = new_s as usize;

        if !source_octave.within_range(refined.x, refined.y, border) {
            return None;
        }
    }

    let (gradient, offset) = solution?;

    let contrast = dog_sample(source_octave, refined.x, refined.y, refined.sigma_level) + 0.5*gradient.dot(&offset);
    if contrast.abs() < runtime_params.contrast_r/(s as Float) {
        return None;
    }

    let (img_x, img_y) = reconstruct_original_coordinates(refined.x as Float + offset[0], refined.y as Float + offset[1], refined.octave_level);
    if img_x < 0.0 || img_x > frame_width || img_y < 0.0 || img_y > frame_height {
        return None;
    }

    refined.offset = offset;
    refined.img_x = img_x;
    refined.img_y = img_y;
    Some(refined)
}

/// Largest gradient magnitude of the feature's Gaussian level inside a square window of `radius`
pub fn peak_gradient(source_octave: &SiftOctave, feature: &dyn Feature, radius: usize) -> Float {
    let x = feature.get_x_image() as isize;
    let y = feature.get_y_image() as isize;
    let s = feature.get_closest_sigma_level();
    let r = radius as isize;

    let x_gradient = &source_octave.x_gradient[s];
    let y_gradient = &source_octave.y_gradient[s];

    let mut peak: Float = 0.0;
    for j in -r..r+1 {
        for i in -r..r+1 {
            let (magnitude, _) = gradient_and_orientation(x_gradient, y_gradient, x+i, y+j);
            peak = peak.max(magnitude);
        }
    }
    peak
}
