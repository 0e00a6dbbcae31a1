//! Generator invariant properties
//!
//! Every generated value must respect the bounds its generator was built
//! with, and identical seeds must give identical draws.

use crate::{arbitrary_seed, meta_params};
use propel::*;

/// Property: integer ranges never leave `[lo, hi]`
pub fn test_range_bounds() {
    let prop = for_all_named(
        arbitrary_seed().zip3(Gen::<i32>::range(-1000, 1000), Gen::<i32>::range(-1000, 1000)),
        "(seed, a, b)",
        |&(seed, a, b)| {
            let (lo, hi) = (a.min(b), a.max(b));
            let gen = Gen::<i32>::range(lo, hi);
            let mut rng = Rng::new(seed);
            gen.samples(&mut rng).take(50).all(|x| lo <= x && x <= hi)
        },
    );

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Range bounds property passed"),
        result => panic!("Range bounds property failed: {result:?}"),
    }
}

/// Property: the same seed reproduces the same samples
pub fn test_same_seed_same_values() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let gen = Gen::seq_of(Gen::<u64>::any(), 0, 20);
        let first: Vec<_> = gen.samples(&mut Rng::new(seed)).take(10).collect();
        let second: Vec<_> = gen.samples(&mut Rng::new(seed)).take(10).collect();
        first == second
    });

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Determinism property passed"),
        result => panic!("Determinism property failed: {result:?}"),
    }
}

/// Property: collections stay within their size bounds
pub fn test_collection_sizes() {
    let prop = for_all_named(
        arbitrary_seed().zip3(Gen::<usize>::range(0, 10), Gen::<usize>::range(0, 10)),
        "(seed, a, b)",
        |&(seed, a, b)| {
            let (min, max) = (a.min(b), a.max(b));
            let mut rng = Rng::new(seed);
            let vecs = Gen::seq_of(Gen::bool(), min, max);
            let sets = Gen::set_of(Gen::<u32>::any(), min, max);
            let maps = Gen::map_of(Gen::<u8>::any().zip(Gen::unit()), min, max);
            let vecs_ok = vecs
                .samples(&mut rng)
                .take(20)
                .all(|v| (min..=max).contains(&v.len()));
            let sets_ok = sets.samples(&mut rng).take(20).all(|s| s.len() <= max);
            let maps_ok = maps.samples(&mut rng).take(20).all(|m| m.len() <= max);
            vecs_ok && sets_ok && maps_ok
        },
    );

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Collection size property passed"),
        result => panic!("Collection size property failed: {result:?}"),
    }
}
