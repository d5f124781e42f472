extern crate image as image_rs;

use std::fs;
use std::path::Path;
use log::debug;

use crate::SiftError;
use crate::image::Image;
use crate::pyramid::sift::{SiftPyramid, sift_runtime_params::{SiftRuntimeParams, MatchRuntimeParams}};

pub mod key_file;

/// Decodes an image file to 8bit luma. With `normalize` samples are mapped to [0,1].
pub fn load_image_as_gray(file_path: &Path, normalize: bool) -> Result<Image, SiftError> {
    let gray_image = image_rs::open(file_path)?.to_luma8();
    let image = Image::from_gray_image(&gray_image, normalize);
    image.validate()?;
    Ok(image)
}

pub fn load_runtime_params(file_path: &Path) -> Result<SiftRuntimeParams, SiftError> {
    let content = fs::read_to_string(file_path)?;
    let runtime_params: SiftRuntimeParams = serde_yaml::from_str(&content)?;
    runtime_params.validate()?;
    Ok(runtime_params)
}

pub fn load_match_runtime_params(file_path: &Path) -> Result<MatchRuntimeParams, SiftError> {
    let content = fs::read_to_string(file_path)?;
    let match_params: MatchRuntimeParams = serde_yaml::from_str(&content)?;
    match_params.validate()?;
    Ok(match_params)
}

/// Writes every Gaussian level as `<stem>_gs_l<octave>_s<level>.png` and every DoG level as
/// `<stem>_dog_l<octave>_s<level>.png` into `out_dir`. Levels are min/max stretched.
pub fn save_pyramid(pyramid: &SiftPyramid, out_dir: &Path, stem: &str) -> Result<(), SiftError> {
    fs::create_dir_all(out_dir)?;
    for (octave_level, octave) in pyramid.octaves.iter().enumerate() {
        for (sigma_level, image) in octave.images.iter().enumerate() {
            let path = out_dir.join(format!("{}_gs_l{}_s{}.png", stem, octave_level, sigma_level));
            image.to_image().save(&path)?;
        }
        for (sigma_level, image) in octave.difference_of_gaussians.iter().enumerate() {
            let path = out_dir.join(format!("{}_dog_l{}_s{}.png", stem, octave_level, sigma_level));
            image.to_image().save(&path)?;
        }
        debug!("saved octave {} to {}", octave_level, out_dir.display());
    }
    Ok(())
}
