//! Error and outcome types for propel property testing.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main error type for propel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropelError {
    /// A choice generator was built from no selectable alternatives.
    #[error("Empty generator set: no alternatives with non-zero weight")]
    EmptyGenerator,

    /// Invalid generator construction.
    #[error("Invalid generator: {message}")]
    InvalidGenerator { message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Generator failed to produce a value.
    #[error("Generator failed: {reason}")]
    GeneratorFailed { reason: String },
}

/// Result type for propel operations.
pub type Result<T> = std::result::Result<T, PropelError>;

/// How a sample failed the property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One or more assertions did not hold.
    Assertion,
    /// The property body returned an error or panicked.
    Error,
}

/// A step in the failure progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShrinkStep {
    /// The failing value at this step.
    pub counterexample: String,
    /// The step number (0 = original sample, 1+ = failing shrink candidates).
    pub step: usize,
    /// How the value failed.
    pub kind: FailureKind,
}

/// Outcome of a property run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestResult {
    /// Every sample passed.
    Pass {
        samples_run: usize,
        seed: u64,
        property_name: Option<String>,
    },

    /// An assertion failed; `counterexample` is the smallest failing sample found.
    Fail {
        counterexample: String,
        messages: Vec<String>,
        samples_run: usize,
        shrink_rounds: usize,
        seed: u64,
        property_name: Option<String>,
        shrink_steps: Vec<ShrinkStep>,
    },

    /// The property body raised an error on `sample`.
    Error {
        sample: String,
        message: String,
        samples_run: usize,
        shrink_rounds: usize,
        seed: u64,
        property_name: Option<String>,
        shrink_steps: Vec<ShrinkStep>,
    },

    /// The generator itself could not produce a sample.
    GeneratorFailed {
        reason: String,
        samples_run: usize,
        seed: u64,
        property_name: Option<String>,
    },
}

impl TestResult {
    /// Whether the run passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    /// Number of shrink candidates evaluated.
    pub fn shrink_rounds(&self) -> usize {
        match self {
            TestResult::Fail { shrink_rounds, .. } | TestResult::Error { shrink_rounds, .. } => {
                *shrink_rounds
            }
            _ => 0,
        }
    }

    /// Seed the run was started from.
    pub fn seed(&self) -> u64 {
        match self {
            TestResult::Pass { seed, .. }
            | TestResult::Fail { seed, .. }
            | TestResult::Error { seed, .. }
            | TestResult::GeneratorFailed { seed, .. } => *seed,
        }
    }

    /// Render as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn write_progression(f: &mut fmt::Formatter<'_>, shrink_steps: &[ShrinkStep]) -> fmt::Result {
    if shrink_steps.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "    Shrinking progression:")?;
    for step in shrink_steps {
        if step.step == 0 {
            writeln!(f, "      │ Original: {}", step.counterexample)?;
        } else {
            writeln!(f, "      │ Step {}: {}", step.step, step.counterexample)?;
        }
    }
    writeln!(f)
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                samples_run,
                property_name,
                ..
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} samples.", name, samples_run)
            }
            TestResult::Fail {
                counterexample,
                messages,
                samples_run,
                shrink_rounds,
                seed,
                property_name,
                shrink_steps,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ✗ {} failed after {} samples and {} shrink rounds (seed {}).",
                    name, samples_run, shrink_rounds, seed
                )?;
                write_progression(f, shrink_steps)?;
                for message in messages {
                    writeln!(f, "    === {} ===", message)?;
                }
                write!(f, "    Failing sample: {}", counterexample)
            }
            TestResult::Error {
                sample,
                message,
                samples_run,
                shrink_rounds,
                seed,
                property_name,
                shrink_steps,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ✗ {} errored after {} samples and {} shrink rounds (seed {}).",
                    name, samples_run, shrink_rounds, seed
                )?;
                write_progression(f, shrink_steps)?;
                writeln!(f, "    === {} ===", message)?;
                write!(f, "    Erroring sample: {}", sample)
            }
            TestResult::GeneratorFailed {
                reason,
                samples_run,
                seed,
                property_name,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                write!(
                    f,
                    "  ⚐ {} could not generate sample {} (seed {}): {}",
                    name,
                    samples_run + 1,
                    seed,
                    reason
                )
            }
        }
    }
}
