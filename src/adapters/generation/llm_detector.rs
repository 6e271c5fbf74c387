//! LLM-backed Detector using the small model tier.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{
    AIProvider, CompletionRequest, Detection, Detector, GenerationTask, MessageRole, PortError,
    RequestMetadata,
};

use super::prompts;
use super::schemas::{self, DetectionResponse};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 64;

/// Binary ambiguity detector over an [`AIProvider`].
pub struct LlmDetector {
    provider: Arc<dyn AIProvider>,
}

impl LlmDetector {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Detector for LlmDetector {
    async fn classify(&self, query: &str) -> Result<Detection, PortError> {
        let request = CompletionRequest::new(RequestMetadata::new(GenerationTask::Detect))
            .with_system_prompt(prompts::DETECTION_SYSTEM)
            .with_message(MessageRole::User, prompts::detection_user(query))
            .with_temperature(TEMPERATURE)
            .with_max_tokens(MAX_TOKENS)
            .with_response_schema(schemas::detection_schema());

        let response = self.provider.complete(request).await?;
        let parsed: DetectionResponse = schemas::decode(&response.content)?;
        Ok(Detection {
            is_ambiguous: parsed.is_ambiguous,
        })
    }

    async fn check_connection(&self) -> Result<(), PortError> {
        Ok(self.provider.check_connection().await?)
    }
}
