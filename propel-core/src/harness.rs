//! Concurrent execution of many properties under a time limit.

use crate::property::Property;
use crate::report::{CollectingReporter, ReportEvent, Reporter};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// A named, time-limited test a [`Harness`] can run.
#[async_trait]
pub trait UnitTest: Send + Sync {
    fn name(&self) -> String;

    fn timeout(&self) -> Duration;

    /// Run the test, reporting exactly one verdict.
    async fn run(&self, reporter: &mut dyn Reporter);
}

#[async_trait]
impl<T> UnitTest for Property<T>
where
    T: Debug + Send + Sync + 'static,
{
    fn name(&self) -> String {
        Property::name(self).unwrap_or("property").to_string()
    }

    fn timeout(&self) -> Duration {
        self.params().timeout()
    }

    async fn run(&self, reporter: &mut dyn Reporter) {
        Property::run(self, reporter).await
    }
}

/// Run `test` and report an error in its place if it outlives its timeout.
///
/// Returns `true` if the test was cut off.
pub async fn run_with_timeout(test: &dyn UnitTest, reporter: &mut dyn Reporter) -> bool {
    let limit = test.timeout();
    if tokio::time::timeout(limit, test.run(reporter)).await.is_err() {
        warn!(test = %test.name(), ?limit, "test timed out");
        reporter.record_error(&format!("timed out after {limit:?}"));
        return true;
    }
    false
}

/// Final classification of one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed(String),
    Errored(String),
    TimedOut(Duration),
    /// The test task died without reporting a verdict.
    Missing,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// Everything one test reported.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub name: String,
    pub verdict: Verdict,
    pub events: Vec<ReportEvent>,
}

impl TestReport {
    fn from_events(name: String, timed_out: Option<Duration>, events: Vec<ReportEvent>) -> Self {
        let verdict = match (timed_out, events.iter().rev().find(|e| e.is_verdict())) {
            (Some(limit), _) => Verdict::TimedOut(limit),
            (None, Some(ReportEvent::Success)) => Verdict::Passed,
            (None, Some(ReportEvent::AssertionFailure(text))) => Verdict::Failed(text.clone()),
            (None, Some(ReportEvent::Error(text))) => Verdict::Errored(text.clone()),
            _ => Verdict::Missing,
        };
        TestReport {
            name,
            verdict,
            events,
        }
    }
}

/// Reports for every test of a harness run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct HarnessSummary {
    pub reports: Vec<TestReport>,
}

impl HarnessSummary {
    pub fn passed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Failed(_)))
    }

    pub fn errored(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Errored(_) | Verdict::Missing))
    }

    pub fn timed_out(&self) -> usize {
        self.count(|v| matches!(v, Verdict::TimedOut(_)))
    }

    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.verdict.is_pass())
    }

    /// Look up a report by test name.
    pub fn report(&self, name: &str) -> Option<&TestReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    fn count(&self, predicate: impl Fn(&Verdict) -> bool) -> usize {
        self.reports.iter().filter(|r| predicate(&r.verdict)).count()
    }
}

/// Collection of tests run concurrently on the tokio runtime.
#[derive(Default)]
pub struct Harness {
    tests: Vec<Arc<dyn UnitTest>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test.
    pub fn add<U: UnitTest + 'static>(mut self, test: U) -> Self {
        self.tests.push(Arc::new(test));
        self
    }

    /// Register a shared test.
    pub fn add_arc(mut self, test: Arc<dyn UnitTest>) -> Self {
        self.tests.push(test);
        self
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Spawn every test as its own task and wait for all of them.
    pub async fn run(&self) -> HarnessSummary {
        info!(tests = self.tests.len(), "starting harness run");
        let handles: Vec<_> = self
            .tests
            .iter()
            .map(|test| {
                let test = Arc::clone(test);
                tokio::spawn(async move {
                    let mut reporter = CollectingReporter::new();
                    let timed_out = run_with_timeout(test.as_ref(), &mut reporter).await;
                    (timed_out, reporter.into_events())
                })
            })
            .collect();

        let mut summary = HarnessSummary::default();
        for (test, handle) in self.tests.iter().zip(handles) {
            let (timed_out, events) = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(test = %test.name(), "test task failed: {e}");
                    (false, Vec::new())
                }
            };
            let limit = timed_out.then(|| test.timeout());
            summary
                .reports
                .push(TestReport::from_events(test.name(), limit, events));
        }
        info!(
            passed = summary.passed(),
            failed = summary.failed(),
            errored = summary.errored(),
            timed_out = summary.timed_out(),
            "harness run finished"
        );
        summary
    }
}
