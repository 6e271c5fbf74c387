//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Capability Ports
//!
//! - `Detector` - binary ambiguous/clear classification (cheap tier)
//! - `Resolver` - classify, ask, validate and reformulate (capable tier)
//!
//! ## Infrastructure Ports
//!
//! - `AIProvider` - chat completions against a model server

mod ai_provider;
mod detector;
mod errors;
mod resolver;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, GenerationTask,
    Message, MessageRole, RequestMetadata, TokenUsage,
};
pub use detector::{Detection, Detector};
pub use errors::PortError;
pub use resolver::{
    ClarificationDraft, ClarificationExchange, Resolver, ValidationVerdict,
};
