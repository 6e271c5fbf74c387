//! LLM-backed Resolver using the large model tier.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::clarification::ClarificationStrategy;
use crate::ports::{
    AIProvider, ClarificationDraft, ClarificationExchange, CompletionRequest, GenerationTask,
    MessageRole, PortError, RequestMetadata, Resolver, ValidationVerdict,
};

use super::prompts;
use super::schemas::{
    self, ClarificationResponse, ValidationResponse, VanillaClarificationResponse,
};

const CLARIFY_TEMPERATURE: f32 = 0.7;
const VALIDATE_TEMPERATURE: f32 = 0.3;
const REFORMULATE_TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 512;

/// Clarification, validation and reformulation over an [`AIProvider`].
pub struct LlmResolver {
    provider: Arc<dyn AIProvider>,
    strategy: ClarificationStrategy,
}

impl LlmResolver {
    pub fn new(provider: Arc<dyn AIProvider>, strategy: ClarificationStrategy) -> Self {
        Self { provider, strategy }
    }

    pub fn strategy(&self) -> ClarificationStrategy {
        self.strategy
    }

    fn request(
        &self,
        task: GenerationTask,
        system: impl Into<String>,
        user: String,
    ) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(task))
            .with_system_prompt(system)
            .with_message(MessageRole::User, user)
            .with_max_tokens(MAX_TOKENS)
    }
}

#[async_trait]
impl Resolver for LlmResolver {
    async fn generate_clarification(&self, query: &str) -> Result<ClarificationDraft, PortError> {
        let schema = if self.strategy.classifies() {
            schemas::clarification_schema()
        } else {
            schemas::vanilla_clarification_schema()
        };
        let request = self
            .request(
                GenerationTask::Clarify,
                prompts::clarification_system(self.strategy),
                prompts::clarification_user(query),
            )
            .with_temperature(CLARIFY_TEMPERATURE)
            .with_response_schema(schema);

        let response = self.provider.complete(request).await?;

        if self.strategy.classifies() {
            let parsed: ClarificationResponse = schemas::decode(&response.content)?;
            let reasoning = Some(parsed.reasoning).filter(|r| !r.trim().is_empty());
            Ok(ClarificationDraft {
                kinds: Some(parsed.ambiguity_types),
                reasoning,
                question: parsed.clarifying_question,
            })
        } else {
            let parsed: VanillaClarificationResponse = schemas::decode(&response.content)?;
            Ok(ClarificationDraft {
                kinds: None,
                reasoning: None,
                question: parsed.clarifying_question,
            })
        }
    }

    async fn validate(
        &self,
        exchange: &ClarificationExchange,
    ) -> Result<ValidationVerdict, PortError> {
        let request = self
            .request(
                GenerationTask::Validate,
                prompts::VALIDATION_SYSTEM,
                prompts::exchange_user(exchange, prompts::VALIDATION_INSTRUCTION),
            )
            .with_temperature(VALIDATE_TEMPERATURE)
            .with_response_schema(schemas::validation_schema());

        let response = self.provider.complete(request).await?;
        let parsed: ValidationResponse = schemas::decode(&response.content)?;
        Ok(ValidationVerdict {
            is_valid: parsed.is_valid,
            feedback: parsed.explanation,
        })
    }

    async fn reformulate(&self, exchange: &ClarificationExchange) -> Result<String, PortError> {
        let request = self
            .request(
                GenerationTask::Reformulate,
                prompts::REFORMULATION_SYSTEM,
                prompts::exchange_user(exchange, prompts::REFORMULATION_INSTRUCTION),
            )
            .with_temperature(REFORMULATE_TEMPERATURE);

        let response = self.provider.complete(request).await?;
        Ok(schemas::clean_reformulation(&response.content))
    }

    async fn check_connection(&self) -> Result<(), PortError> {
        Ok(self.provider.check_connection().await?)
    }
}
