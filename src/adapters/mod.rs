//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI-compatible chat completion client (and a mock)
//! - `generation` - `Detector`/`Resolver` built on an `AIProvider`
//! - `scripted` - in-process `Detector`/`Resolver` doubles
//! - `http` - axum REST surface

pub mod ai;
pub mod generation;
pub mod http;
pub mod scripted;

pub use ai::{MockAIProvider, OpenAICompatConfig, OpenAICompatProvider};
pub use generation::{LlmDetector, LlmResolver};
pub use scripted::{ScriptedDetector, ScriptedResolver};
