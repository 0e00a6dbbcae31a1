//! Character and string generator properties

use crate::{arbitrary_seed, meta_params};
use propel::*;

const CLASSES: [CharClass; 8] = [
    CharClass::Ascii,
    CharClass::AsciiPrintable,
    CharClass::AsciiNumeric,
    CharClass::AsciiLetters,
    CharClass::AsciiUpper,
    CharClass::AsciiLower,
    CharClass::Unicode,
    CharClass::UnicodeBmp,
];

/// Property: strings only contain characters of their class
pub fn test_character_classes() {
    let prop = for_all_named(
        arbitrary_seed().zip(Gen::<usize>::range(0, CLASSES.len() - 1)),
        "(seed, class)",
        |&(seed, index)| {
            let class = CLASSES[index];
            let gen = Gen::string(class, 0, 32);
            let mut rng = Rng::new(seed);
            gen.samples(&mut rng)
                .take(10)
                .all(|s| s.chars().count() <= 32 && s.chars().all(|c| class.contains(c)))
        },
    );

    match prop.with_params(meta_params()).check_blocking() {
        TestResult::Pass { .. } => println!("✓ Character class property passed"),
        result => panic!("Character class property failed: {result:?}"),
    }
}

/// A failing string property shrinks to a short counterexample
pub fn test_string_shrinks_to_prefixes() {
    let prop = for_all(Gen::string(CharClass::AsciiLower, 5, 20), |s| s.len() < 5)
        .with_params(PropertyParams::default().with_seed(3));
    match prop.check_blocking() {
        TestResult::Fail { counterexample, .. } => {
            // Debug rendering adds the surrounding quotes
            assert_eq!(counterexample.len(), 5 + 2, "{counterexample}");
        }
        result => panic!("Expected the string property to fail: {result:?}"),
    }
}
