extern crate sift;

use color_eyre::eyre::{eyre, Result};
use std::path::{Path, PathBuf};

use sift::io::{load_image_as_gray, load_runtime_params, save_pyramid, key_file::{key_file_path, write_key_file}};
use sift::pyramid::sift::{build_sift_pyramid, detect_features, sift_runtime_params::SiftRuntimeParams};

/// sift_keys <image> [params.yaml] [pyramid_out_dir]
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let image_path = args.get(1).map(PathBuf::from).ok_or_else(|| eyre!("usage: sift_keys <image> [params.yaml] [pyramid_out_dir]"))?;
    let runtime_params = match args.get(2) {
        Some(path) => load_runtime_params(Path::new(path))?,
        None => SiftRuntimeParams::default()
    };

    let image = load_image_as_gray(&image_path, true)?;
    let (features, statistics) = detect_features(&image, &runtime_params)?;

    if let Some(out_dir) = args.get(3) {
        let stem = image_path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        let pyramid = build_sift_pyramid(&image, &runtime_params)?;
        save_pyramid(&pyramid, Path::new(out_dir), stem)?;
    }

    let key_path = key_file_path(&image_path);
    write_key_file(&key_path, &features)?;

    println!("octaves: {}", statistics.octaves);
    println!("extrema: {}", statistics.extrema);
    println!("after refinement: {}", statistics.refined);
    println!("after filtering: {}", statistics.filtered);
    println!("{} keypoints written to {}", statistics.descriptors, key_path.display());

    Ok(())
}
