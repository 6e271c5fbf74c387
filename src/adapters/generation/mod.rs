//! Generation adapters - `Detector` and `Resolver` backed by chat models.
//!
//! Both build prompts, ask the server for schema-constrained JSON where the
//! answer is structured, and validate the output before it reaches the
//! resolution machine.

mod llm_detector;
mod llm_resolver;
pub mod prompts;
pub mod schemas;

pub use llm_detector::LlmDetector;
pub use llm_resolver::LlmResolver;
