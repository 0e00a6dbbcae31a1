//! Property definitions and the sample-and-shrink runner.

use crate::data::PropertyParams;
use crate::error::{FailureKind, Result, ShrinkStep, TestResult};
use crate::gen::Gen;
use crate::report::{Reporter, TracingReporter};
use crate::rng::Rng;
use crate::shrink::Shrinks;
use std::any::Any;
use std::fmt::Debug;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info};

/// Assertion and logging context handed to a property body.
///
/// Failed assertions do not abort the body; they are collected and the
/// sample counts as failing once the body returns.
#[derive(Debug, Default)]
pub struct PropertyHelper {
    failures: Vec<String>,
    logs: Vec<String>,
}

impl PropertyHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless `predicate` holds.
    pub fn assert_true(&mut self, predicate: bool, message: &str) -> bool {
        if !predicate {
            self.failures.push(format!("assert_true failed: {message}"));
        }
        predicate
    }

    /// Record a failure if `predicate` holds.
    pub fn assert_false(&mut self, predicate: bool, message: &str) -> bool {
        if predicate {
            self.failures.push(format!("assert_false failed: {message}"));
        }
        !predicate
    }

    /// Record a failure unless `expected == actual`.
    pub fn assert_eq<A: PartialEq + Debug>(&mut self, expected: A, actual: A) -> bool {
        let equal = expected == actual;
        if !equal {
            self.failures.push(format!(
                "assert_eq failed: expected {expected:?}, got {actual:?}"
            ));
        }
        equal
    }

    /// Record a failure if `not_expected == actual`.
    pub fn assert_ne<A: PartialEq + Debug>(&mut self, not_expected: A, actual: A) -> bool {
        let different = not_expected != actual;
        if !different {
            self.failures
                .push(format!("assert_ne failed: got {actual:?} twice"));
        }
        different
    }

    /// Record an unconditional failure.
    pub fn fail(&mut self, message: &str) {
        self.failures.push(format!("fail: {message}"));
    }

    /// Attach a message to the run's log.
    pub fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    /// Whether any assertion has failed so far.
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

type PropertyFn<T> = dyn Fn(&T, &mut PropertyHelper) -> anyhow::Result<()> + Send + Sync;

/// A property that can be tested with generated inputs.
pub struct Property<T> {
    generator: Gen<T>,
    test_function: Arc<PropertyFn<T>>,
    params: PropertyParams,
    name: Option<String>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Property {
            generator: self.generator.clone(),
            test_function: Arc::clone(&self.test_function),
            params: self.params.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T> Property<T>
where
    T: Debug + Send + Sync + 'static,
{
    /// Create a new property from a generator and a test body.
    ///
    /// The body fails a sample through the helper's assertions and errors on
    /// it by returning `Err` or panicking.
    pub fn new<F>(generator: Gen<T>, test_function: F) -> Self
    where
        F: Fn(&T, &mut PropertyHelper) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Property {
            generator,
            test_function: Arc::new(test_function),
            params: PropertyParams::default(),
            name: None,
        }
    }

    /// Create a property that checks a boolean condition.
    pub fn for_all<F>(generator: Gen<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Property::new(generator, move |input, h| {
            h.assert_true(condition(input), "condition does not hold");
            Ok(())
        })
    }

    /// Name used in reports.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Replace the run parameters.
    ///
    /// `params` is taken as is. A zero timeout makes a [`Harness`] cut the
    /// property off at its first yield; use [`Property::try_with_params`]
    /// to reject such parameters up front.
    ///
    /// [`Harness`]: crate::harness::Harness
    pub fn with_params(mut self, params: PropertyParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the run parameters after checking them with
    /// [`PropertyParams::validate`].
    pub fn try_with_params(self, params: PropertyParams) -> Result<Self> {
        params.validate()?;
        Ok(self.with_params(params))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn params(&self) -> &PropertyParams {
        &self.params
    }

    /// Run to completion, yielding to the scheduler after every step, and
    /// report the verdict to `reporter`.
    pub async fn run(&self, reporter: &mut dyn Reporter) {
        let outcome = self.check_with(reporter).await;
        report_outcome(&outcome, reporter);
    }

    /// Run to completion and return the verdict, logging through `tracing`.
    pub async fn check(&self) -> TestResult {
        let mut reporter = TracingReporter::new(self.display_name());
        self.check_with(&mut reporter).await
    }

    /// Run to completion, forwarding property logs to `reporter` but leaving
    /// the verdict to the caller.
    pub async fn check_with(&self, reporter: &mut dyn Reporter) -> TestResult {
        let mut run = PropertyRun::new(self);
        loop {
            if let Some(outcome) = run.step(reporter) {
                return outcome.clone();
            }
            tokio::task::yield_now().await;
        }
    }

    /// Run to completion on the calling thread.
    pub fn check_blocking(&self) -> TestResult {
        let mut reporter = TracingReporter::new(self.display_name());
        let mut run = PropertyRun::new(self);
        loop {
            if let Some(outcome) = run.step(&mut reporter) {
                return outcome.clone();
            }
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("property")
    }

    /// Evaluate the body on one value.
    fn evaluate(&self, sample: &T, reporter: &mut dyn Reporter) -> Option<Failure> {
        let mut helper = PropertyHelper::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            (self.test_function)(sample, &mut helper)
        }));
        for message in helper.logs.drain(..) {
            reporter.log(&message);
        }
        match outcome {
            Ok(Ok(())) if helper.failures.is_empty() => None,
            Ok(Ok(())) => Some(Failure::Assertion(helper.failures)),
            Ok(Err(e)) => Some(Failure::Error(format!("{e:#}"))),
            Err(payload) => Some(Failure::Error(format!(
                "panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

/// Why a sample failed.
#[derive(Debug, Clone)]
enum Failure {
    Assertion(Vec<String>),
    Error(String),
}

impl Failure {
    fn kind(&self) -> FailureKind {
        match self {
            Failure::Assertion(_) => FailureKind::Assertion,
            Failure::Error(_) => FailureKind::Error,
        }
    }
}

/// The most recent failing value during a shrink search.
struct Failing<T> {
    sample: T,
    failure: Failure,
}

enum RunState<T> {
    /// Drawing sample `index`.
    Sampling { index: usize },
    /// Minimising the failure found at sample `sample_index`.
    Shrinking {
        sample_index: usize,
        round: usize,
        failing: Failing<T>,
        candidates: Shrinks<T>,
    },
    Completed(TestResult),
}

/// One execution of a property as an explicit state machine.
///
/// Each call to [`PropertyRun::step`] performs one unit of work: drawing and
/// checking one sample, or checking one shrink candidate. A sample, including
/// its shrink search, fully resolves before the next sample is drawn.
pub struct PropertyRun<'p, T> {
    property: &'p Property<T>,
    rng: Rng,
    state: RunState<T>,
    shrink_steps: Vec<ShrinkStep>,
}

impl<'p, T> PropertyRun<'p, T>
where
    T: Debug + Send + Sync + 'static,
{
    pub fn new(property: &'p Property<T>) -> Self {
        PropertyRun {
            property,
            rng: Rng::new(property.params.seed),
            state: RunState::Sampling { index: 0 },
            shrink_steps: Vec::new(),
        }
    }

    /// The verdict, once the run has completed.
    pub fn outcome(&self) -> Option<&TestResult> {
        match &self.state {
            RunState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<TestResult> {
        match self.state {
            RunState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Advance by one unit of work. Returns the verdict once completed;
    /// further calls are no-ops.
    pub fn step(&mut self, reporter: &mut dyn Reporter) -> Option<&TestResult> {
        let state = mem::replace(&mut self.state, RunState::Sampling { index: 0 });
        self.state = match state {
            RunState::Completed(outcome) => RunState::Completed(outcome),
            RunState::Sampling { index } => self.sample(index, reporter),
            RunState::Shrinking {
                sample_index,
                round,
                failing,
                candidates,
            } => self.shrink(sample_index, round, failing, candidates, reporter),
        };
        self.outcome()
    }

    fn sample(&mut self, index: usize, reporter: &mut dyn Reporter) -> RunState<T> {
        let params = &self.property.params;
        if index == params.num_samples {
            info!(samples = index, seed = params.seed, "property passed");
            return RunState::Completed(TestResult::Pass {
                samples_run: index,
                seed: params.seed,
                property_name: self.property.name.clone(),
            });
        }

        let generator = &self.property.generator;
        let rng = &mut self.rng;
        let sample = match panic::catch_unwind(AssertUnwindSafe(|| generator.generate(rng))) {
            Ok(sample) => sample,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                info!(sample = index, %reason, "generator failed");
                return RunState::Completed(TestResult::GeneratorFailed {
                    reason,
                    samples_run: index,
                    seed: params.seed,
                    property_name: self.property.name.clone(),
                });
            }
        };

        match self.property.evaluate(&sample, reporter) {
            None => {
                debug!(sample = index, "sample passed");
                RunState::Sampling { index: index + 1 }
            }
            Some(failure) => {
                debug!(sample = index, value = ?sample, "sample failed, shrinking");
                self.shrink_steps.push(ShrinkStep {
                    counterexample: format!("{sample:?}"),
                    step: 0,
                    kind: failure.kind(),
                });
                let (sample, candidates) = self.property.generator.shrink(sample);
                RunState::Shrinking {
                    sample_index: index,
                    round: 0,
                    failing: Failing { sample, failure },
                    candidates,
                }
            }
        }
    }

    fn shrink(
        &mut self,
        sample_index: usize,
        round: usize,
        failing: Failing<T>,
        mut candidates: Shrinks<T>,
        reporter: &mut dyn Reporter,
    ) -> RunState<T> {
        if round == self.property.params.max_shrink_rounds {
            debug!(round, "shrink round limit reached");
            return RunState::Completed(self.failed(sample_index, round, failing));
        }
        let Some(candidate) = candidates.next() else {
            debug!(round, "shrink candidates exhausted");
            return RunState::Completed(self.failed(sample_index, round, failing));
        };

        match self.property.evaluate(&candidate, reporter) {
            None => {
                debug!(round = round + 1, value = ?candidate, "shrink candidate passed");
                RunState::Completed(self.failed(sample_index, round + 1, failing))
            }
            Some(failure) => {
                debug!(round = round + 1, value = ?candidate, "shrink candidate still fails");
                self.shrink_steps.push(ShrinkStep {
                    counterexample: format!("{candidate:?}"),
                    step: self.shrink_steps.len(),
                    kind: failure.kind(),
                });
                RunState::Shrinking {
                    sample_index,
                    round: round + 1,
                    failing: Failing {
                        sample: candidate,
                        failure,
                    },
                    candidates,
                }
            }
        }
    }

    fn failed(&mut self, sample_index: usize, shrink_rounds: usize, failing: Failing<T>) -> TestResult {
        let params = &self.property.params;
        let shrink_steps = mem::take(&mut self.shrink_steps);
        let sample = format!("{:?}", failing.sample);
        info!(
            samples = sample_index + 1,
            shrink_rounds,
            seed = params.seed,
            %sample,
            "property falsified"
        );
        match failing.failure {
            Failure::Assertion(messages) => TestResult::Fail {
                counterexample: sample,
                messages,
                samples_run: sample_index + 1,
                shrink_rounds,
                seed: params.seed,
                property_name: self.property.name.clone(),
                shrink_steps,
            },
            Failure::Error(message) => TestResult::Error {
                sample,
                message,
                samples_run: sample_index + 1,
                shrink_rounds,
                seed: params.seed,
                property_name: self.property.name.clone(),
                shrink_steps,
            },
        }
    }
}

/// Send the single final verdict for `outcome` to `reporter`.
pub fn report_outcome(outcome: &TestResult, reporter: &mut dyn Reporter) {
    let description = outcome.to_string();
    match outcome {
        TestResult::Pass { .. } => reporter.record_success(),
        TestResult::Fail { .. } => reporter.record_assertion_failure(&description),
        TestResult::Error { .. } | TestResult::GeneratorFailed { .. } => {
            reporter.record_error(&description)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Create a property for a generator and test body.
pub fn property<T, F>(generator: Gen<T>, test_function: F) -> Property<T>
where
    T: Debug + Send + Sync + 'static,
    F: Fn(&T, &mut PropertyHelper) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Property::new(generator, test_function)
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property<T>
where
    T: Debug + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Property::for_all(generator, condition)
}

/// Create a named property that checks a boolean condition.
pub fn for_all_named<T, F>(generator: Gen<T>, name: &str, condition: F) -> Property<T>
where
    T: Debug + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Property::for_all(generator, condition).named(name)
}
