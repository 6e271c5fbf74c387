//! Scripted capability adapters.
//!
//! In-process `Detector` and `Resolver` implementations that replay queued
//! answers and record every call. They back the test suites and let the
//! binaries run without model servers.

mod detector;
mod resolver;

pub use detector::ScriptedDetector;
pub use resolver::{ResolverCall, ScriptedResolver};
