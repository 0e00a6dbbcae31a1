//! Core functionality for propel property-based testing.
//!
//! This crate provides the building blocks for property-based testing:
//! a seeded random source, composable generators with lazy shrinking,
//! a property runner that minimises counterexamples, and an async
//! harness that runs many properties under a time limit.

pub mod choice;
pub mod collection;
pub mod data;
pub mod error;
pub mod gen;
pub mod harness;
pub mod property;
pub mod report;
pub mod rng;
pub mod shrink;
pub mod text;

// Re-export the main types
pub use choice::WeightedChoice;
pub use data::*;
pub use error::{FailureKind, PropelError, ShrinkStep, TestResult};
pub use gen::*;
pub use harness::*;
pub use property::*;
pub use report::*;
pub use rng::{Rng, Uniform};
pub use shrink::{towards, Shrinks};
pub use text::CharClass;
