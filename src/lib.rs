//! Scale invariant feature detection, description and matching.
//!
//! The pipeline follows Lowe's SIFT: an upsampled base image is turned into a Gaussian and
//! Difference of Gaussian pyramid, scale space extrema are refined to sub pixel accuracy,
//! filtered, oriented and finally described by a 128 element gradient histogram.
//! Feature sets of two images can then be matched with a nearest neighbour ratio test.

pub mod error;
pub mod image;
pub mod filter;
pub mod pyramid;
pub mod features;
pub mod matching;
pub mod numerics;
pub mod io;

pub use error::SiftError;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum GradientDirection {
    HORIZONTAL,
    VERTICAL
}

pub fn reconstruct_original_coordinates(x: Float, y: Float, octave_level: usize) -> (Float,Float) {
    let factor = (octave_level as Float).exp2();
    (x*factor,y*factor)
}
