pub mod sift_feature;

/// Integer sample location of a feature inside its octave.
pub trait Feature {
    fn get_x_image(&self) -> usize;
    fn get_y_image(&self) -> usize;
    fn get_closest_sigma_level(&self) -> usize;
}
