//! Distribution validation
//!
//! Statistical checks that choices and primitive draws follow their
//! advertised distributions.

use propel::*;
use std::collections::HashMap;

/// Frequency selection is proportional to the weights
pub fn test_frequency_weights() {
    let gen = Gen::frequency(vec![
        WeightedChoice::new(3, Gen::constant("common")),
        WeightedChoice::new(1, Gen::constant("rare")),
        WeightedChoice::new(0, Gen::constant("never")),
    ])
    .expect("weights are valid");

    let mut rng = Rng::new(42);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in gen.samples(&mut rng).take(4000) {
        *counts.entry(value).or_insert(0) += 1;
    }

    assert!(!counts.contains_key("never"));
    let ratio = counts["common"] as f64 / counts["rare"] as f64;
    assert!((2.5..=3.6).contains(&ratio), "common/rare = {ratio}");
    println!("✓ Frequency weights validated: {counts:?}");
}

/// Booleans are roughly balanced
pub fn test_bool_balance() {
    let mut rng = Rng::new(7);
    let trues = Gen::bool().samples(&mut rng).take(10_000).filter(|&b| b).count();
    assert!((4500..=5500).contains(&trues), "trues = {trues}");
}

/// Every value of a small range shows up
pub fn test_small_range_coverage() {
    let mut rng = Rng::new(8);
    let mut seen = [false; 10];
    for value in Gen::<usize>::range(0, 9).samples(&mut rng).take(1000) {
        seen[value] = true;
    }
    assert!(seen.iter().all(|&s| s));
}
