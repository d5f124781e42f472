use rand::{Rng, SeedableRng, rngs::SmallRng};

use sift::Float;
use sift::matching::sift_descriptor::{generate_match_pairs, feature_vector::{FeatureVector, DescriptorData, l2_normalize}};
use sift::pyramid::sift::sift_runtime_params::MatchRuntimeParams;

fn random_features(count: usize, seed: u64) -> Vec<FeatureVector> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count).map(|i| {
        let mut data = DescriptorData::from_fn(|_,_| rng.gen::<Float>());
        l2_normalize(&mut data);
        FeatureVector::from_parts(i as Float, 0.0, 1.0, 0.0, data)
    }).collect()
}

#[test]
fn set_matches_itself() {
    let features = random_features(40, 5);
    let pairs = generate_match_pairs(&features, &features, &MatchRuntimeParams::default());
    assert_eq!(pairs, (0..40).map(|i| (i,i)).collect::<Vec<(usize,usize)>>());
}

#[test]
fn perturbed_set_matches_in_order_of_a() {
    let mut rng = SmallRng::seed_from_u64(17);
    let features_b = random_features(30, 9);
    // a is a shuffled, slightly perturbed subset of b
    let permutation = vec![7, 3, 22, 0, 15, 29];
    let features_a = permutation.iter().map(|&j| {
        let b: &FeatureVector = &features_b[j];
        let mut data = b.data + DescriptorData::from_fn(|_,_| rng.gen_range(-0.005..0.005));
        l2_normalize(&mut data);
        FeatureVector::from_parts(b.x, b.y, b.scale, b.orientation, data)
    }).collect::<Vec<FeatureVector>>();

    let pairs = generate_match_pairs(&features_a, &features_b, &MatchRuntimeParams::default());
    let expected = permutation.iter().enumerate().map(|(i,&j)| (i,j)).collect::<Vec<(usize,usize)>>();
    assert_eq!(pairs, expected);
}

#[test]
fn duplicate_descriptors_do_not_match() {
    let mut features = random_features(5, 2);
    let duplicate = features[1].clone();
    features.push(duplicate);
    let query = vec![features[1].clone()];
    let pairs = generate_match_pairs(&query, &features, &MatchRuntimeParams::default());
    assert!(pairs.is_empty());
}
