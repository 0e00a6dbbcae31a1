//! End-to-end workflows through the property runner

use pretty_assertions::assert_eq;
use propel::*;
use std::collections::HashMap;

/// A bounded property fails with a counterexample in the failing region,
/// and the same seed reproduces it exactly
pub fn test_simple_failing_property_workflow() {
    let params = PropertyParams::default().with_seed(1234);
    let prop = for_all_named(Gen::<u8>::range(0, 10), "x", |&x| x <= 5).with_params(params);

    let first = prop.check_blocking();
    match &first {
        TestResult::Fail {
            counterexample,
            samples_run,
            ..
        } => {
            let value: u8 = counterexample.parse().expect("u8 counterexample");
            assert!((6..=10).contains(&value), "counterexample {value}");
            assert!(*samples_run >= 1);
        }
        result => panic!("Expected failure, got: {result:?}"),
    }
    assert_eq!(prop.check_blocking(), first);
}

/// A property that always holds passes without shrinking
pub fn test_constant_property_passes() {
    let prop = for_all(Gen::constant(0u8), |&x| x == 0)
        .with_params(PropertyParams::default().with_seed(1));
    let result = prop.check_blocking();
    assert!(result.is_pass());
    assert_eq!(result.shrink_rounds(), 0);
    assert_eq!(result.seed(), 1);
}

/// A body that returns an error yields an error verdict, not a failure
pub fn test_erroring_body() {
    let prop = property(Gen::<u8>::range(0, 1), |&x, h| {
        h.log(&format!("x = {x}"));
        anyhow::ensure!(x >= 2, "x must be at least 2");
        Ok(())
    })
    .named("at_least_two")
    .with_params(PropertyParams::default().with_seed(5));

    match prop.check_blocking() {
        TestResult::Error { sample, message, .. } => {
            assert_eq!(message, "x must be at least 2");
            assert!(sample == "0" || sample == "1");
        }
        result => panic!("Expected error, got: {result:?}"),
    }
}

/// Parameters come from `PROPEL_*` variables, with bad values rejected
pub fn test_params_from_environment_vars() {
    let vars: HashMap<&str, &str> = [
        (ENV_SEED, "77"),
        (ENV_SAMPLES, "12"),
        (ENV_SHRINK_ROUNDS, "3"),
    ]
    .into_iter()
    .collect();
    let params = PropertyParams::from_vars(|key| vars.get(key).map(|v| v.to_string()))
        .expect("valid variables");
    assert_eq!(params.seed, 77);
    assert_eq!(params.num_samples, 12);
    assert_eq!(params.max_shrink_rounds, 3);

    let prop = for_all(Gen::<u8>::any(), |_| true).with_params(params);
    match prop.check_blocking() {
        TestResult::Pass { samples_run, seed, .. } => {
            assert_eq!(samples_run, 12);
            assert_eq!(seed, 77);
        }
        result => panic!("Expected pass, got: {result:?}"),
    }

    let bad = PropertyParams::from_vars(|key| (key == ENV_SAMPLES).then(|| "many".to_string()));
    assert!(matches!(bad, Err(PropelError::InvalidConfig { .. })));
}

/// Failures render for humans and serialize for machines
pub fn test_result_reporting() {
    let prop = for_all_named(Gen::<u32>::range(100, 200), "tiny", |&x| x < 100)
        .with_params(PropertyParams::default().with_seed(9));
    let result = prop.check_blocking();

    let rendered = result.to_string();
    assert!(rendered.contains("tiny failed"), "{rendered}");
    assert!(rendered.contains("Failing sample: 100"), "{rendered}");

    let json: serde_json::Value =
        serde_json::from_str(&result.to_json().expect("serializable")).expect("valid json");
    assert_eq!(json["outcome"], "fail");
    assert_eq!(json["counterexample"], "100");
    assert_eq!(json["seed"], 9);
}
