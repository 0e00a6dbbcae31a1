//! Shrinking correctness properties
//!
//! These properties ensure that shrinking behaves correctly - that it always
//! produces smaller candidates and that the runner reports a minimal failure.

use crate::{arbitrary_seed, meta_params};
use propel::*;

/// Property: integer candidates are strictly closer to zero
pub fn test_integer_candidates_move_towards_origin() {
    let prop = for_all_named(Gen::<i64>::range(-100_000, 100_000), "value", |&value| {
        let gen = Gen::<i64>::range(-100_000, 100_000);
        gen.candidates(&value).all(|c| c.abs() < value.abs())
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Integer shrinking property passed"),
        result => panic!("Integer shrinking property failed: {result:?}"),
    }
}

/// Property: always taking the first candidate reaches the origin
pub fn test_first_candidate_chain_converges() {
    let prop = for_all_named(Gen::<u16>::range(0, 500), "value", |&value| {
        let gen = Gen::<u16>::range(0, 500);
        let mut current = value;
        let mut steps = 0;
        while let Some(next) = gen.candidates(&current).next() {
            current = next;
            steps += 1;
            if steps > 500 {
                return false;
            }
        }
        current == 0
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Shrinking convergence property passed"),
        result => panic!("Shrinking convergence property failed: {result:?}"),
    }
}

/// Property: sequence candidates are strictly shorter prefixes
pub fn test_sequence_candidates_are_prefixes() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let gen = Gen::seq_of(Gen::<u8>::any(), 2, 30);
        let items = gen.generate(&mut Rng::new(seed));
        gen.candidates(&items)
            .all(|c| c.len() < items.len() && c.len() >= 2 && items.starts_with(&c))
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Sequence shrinking property passed"),
        result => panic!("Sequence shrinking property failed: {result:?}"),
    }
}

/// Property: the reported counterexample still fails and is no larger
/// than the original failure
pub fn test_runner_reports_failing_neighbour() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let inner = for_all(Gen::<u32>::range(0, 1000), |&x| x < 500)
            .with_params(PropertyParams::default().with_seed(seed));
        match inner.check_blocking() {
            TestResult::Fail {
                counterexample,
                shrink_steps,
                ..
            } => {
                let reported: u32 = counterexample.parse().unwrap_or(0);
                let original: u32 = shrink_steps[0].counterexample.parse().unwrap_or(0);
                reported >= 500 && reported <= original
            }
            _ => false,
        }
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Runner minimisation property passed"),
        result => panic!("Runner minimisation property failed: {result:?}"),
    }
}
