extern crate sift;

use color_eyre::eyre::{eyre, Result};
use std::path::Path;

use sift::io::{load_match_runtime_params, key_file::read_key_file};
use sift::matching::sift_descriptor::generate_match_pairs;
use sift::pyramid::sift::sift_runtime_params::MatchRuntimeParams;

/// match_keys <a.key> <b.key> [match_params.yaml]
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return Err(eyre!("usage: match_keys <a.key> <b.key> [match_params.yaml]"));
    }
    let match_params = match args.get(3) {
        Some(path) => load_match_runtime_params(Path::new(path))?,
        None => MatchRuntimeParams::default()
    };

    let features_a = read_key_file(Path::new(&args[1]))?;
    let features_b = read_key_file(Path::new(&args[2]))?;

    let match_pairs = generate_match_pairs(&features_a, &features_b, &match_params);
    for (a, b) in match_pairs.iter() {
        let fa = &features_a[*a];
        let fb = &features_b[*b];
        println!("{} {} ({:.2},{:.2}) -> ({:.2},{:.2})", a, b, fa.x, fa.y, fb.x, fb.y);
    }
    println!("number of matched pairs: {}", match_pairs.len());

    Ok(())
}
