extern crate nalgebra as na;

use na::Matrix2;
use crate::image::Image;
use crate::{Float,float};
use float::consts::PI;

pub fn rotation_matrix_2d_from_orientation(orientation: Float) -> Matrix2<Float> {

    Matrix2::new(orientation.cos(), -orientation.sin(),
                orientation.sin(), orientation.cos())

}

/// Unnormalized isotropic gaussian weight of the offset (x,y)
pub fn gauss_2d_weight(x: Float, y: Float, sigma: Float) -> Float {
    (-(x.powi(2) + y.powi(2))/(2.0*sigma.powi(2))).exp()
}

/// Maps an angle into [-pi,pi)
pub fn wrap_angle(angle: Float) -> Float {
    let wrapped = (angle + PI).rem_euclid(2.0*PI) - PI;
    match wrapped {
        w if w >= PI => w - 2.0*PI,
        w => w
    }
}

/// Offset of the vertex of the parabola through (-1,left),(0,center),(1,right).
/// A flat neighbourhood yields 0.
pub fn parabolic_peak_offset(left: Float, center: Float, right: Float) -> Float {
    let denominator = left - 2.0*center + right;
    match denominator {
        d if d.abs() < Float::EPSILON => 0.0,
        d => 0.5*(left - right)/d
    }
}

/// Gradient magnitude and orientation in [-pi,pi] at (x,y). Coordinates wrap around the image borders.
pub fn gradient_and_orientation(x_gradient: &Image, y_gradient: &Image, x: isize, y: isize) -> (Float,Float) {
    let x_diff = x_gradient.get_wrapped(x, y);
    let y_diff = y_gradient.get_wrapped(x, y);

    let gradient = (x_diff.powi(2) + y_diff.powi(2)).sqrt();
    let orientation = y_diff.atan2(x_diff);

    (gradient,orientation)
}
