//! Propel property-based testing library.
//!
//! This is the main entry point for propel, re-exporting generators,
//! properties, reporters and the test harness from `propel-core`.

pub use propel_core::*;
