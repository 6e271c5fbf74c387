//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAICompatProvider` - vLLM and other OpenAI-compatible servers

mod mock_provider;
mod openai_compat_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_compat_provider::{OpenAICompatConfig, OpenAICompatProvider};
