//! Harness behaviour across many properties

use propel::*;
use std::time::Duration;

/// Every registered property gets exactly one report, in order
pub async fn test_harness_runs_everything() {
    let params = PropertyParams::default().with_seed(21);
    let harness = Harness::new()
        .add(
            for_all_named(Gen::seq_of(Gen::<u8>::any(), 0, 8), "bounded_len", |v| v.len() <= 8)
                .with_params(params.clone()),
        )
        .add(for_all_named(Gen::<i64>::any(), "never", |_| false).with_params(params.clone()))
        .add(
            property(Gen::bool(), |_b, _h| anyhow::bail!("unsupported"))
                .named("broken")
                .with_params(params.with_timeout(Duration::from_secs(5))),
        );

    let summary = harness.run().await;
    let names: Vec<_> = summary.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bounded_len", "never", "broken"]);
    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.errored(), 1);
    assert_eq!(summary.timed_out(), 0);

    for report in &summary.reports {
        let verdicts = report.events.iter().filter(|e| e.is_verdict()).count();
        assert_eq!(verdicts, 1, "{}", report.name);
    }
}

/// The async runner agrees with the blocking one
pub async fn test_async_run_matches_blocking() {
    let prop = for_all(Gen::<u16>::range(0, 5000), |&x| x % 97 != 0)
        .with_params(PropertyParams::default().with_seed(8).with_samples(500));
    assert_eq!(prop.check().await, prop.check_blocking());
}
