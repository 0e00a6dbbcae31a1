//! Combinator laws

use crate::{arbitrary_seed, meta_params};
use propel::*;

/// Property: mapping twice equals mapping the composition
pub fn test_map_composition() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let base = Gen::<i32>::range(-1000, 1000);
        let twice = base.clone().map(|x| x * 2).map(|x| x + 1);
        let composed = base.map(|x| x * 2 + 1);
        let a: Vec<_> = twice.samples(&mut Rng::new(seed)).take(20).collect();
        let b: Vec<_> = composed.samples(&mut Rng::new(seed)).take(20).collect();
        a == b
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Map composition property passed"),
        result => panic!("Map composition property failed: {result:?}"),
    }
}

/// Property: filtered values and their candidates satisfy the predicate
pub fn test_filter_respects_predicate() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let gen = Gen::<u32>::range(0, 1000).filter(|x| x % 3 == 0);
        let mut rng = Rng::new(seed);
        gen.samples(&mut rng)
            .take(20)
            .all(|x| x % 3 == 0 && gen.candidates(&x).all(|c| c % 3 == 0))
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Filter property passed"),
        result => panic!("Filter property failed: {result:?}"),
    }
}

/// Property: bind feeds the first value into the second generator
pub fn test_bind_dependency() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let gen = Gen::<usize>::range(0, 8).bind(|n| {
            Gen::fixed_seq_of(Gen::constant(n), n)
        });
        let mut rng = Rng::new(seed);
        gen.samples(&mut rng)
            .take(20)
            .all(|items| items.iter().all(|&n| n == items.len()))
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Bind property passed"),
        result => panic!("Bind property failed: {result:?}"),
    }
}

/// Property: every pair candidate changes exactly one side
pub fn test_zip_shrinks_one_side() {
    let prop = for_all_named(
        Gen::<u8>::any().zip(Gen::<i16>::any()),
        "(a, b)",
        |pair| {
            let gen = Gen::<u8>::any().zip(Gen::<i16>::any());
            gen.candidates(pair)
                .all(|(a, b)| (a == pair.0) != (b == pair.1))
        },
    );

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Zip shrinking property passed"),
        result => panic!("Zip shrinking property failed: {result:?}"),
    }
}
