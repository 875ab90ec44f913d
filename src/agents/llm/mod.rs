//! LLM provider abstraction
//!
//! Agents talk to the model through [`LlmProvider`]. The only bundled
//! implementation speaks the OpenAI chat completions protocol, which also
//! covers compatible gateways through `base_url`.

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agents::config::{LlmProviderConfig, LlmProviderType};
use crate::agents::domain::{Message, TokenUsage, ToolDefinition};
use crate::agents::error::LlmResult;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Complete a request
    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse>;
}

/// Request for LLM completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Tools available for calling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated message
    pub message: Message,
    /// Reason the completion stopped
    pub finish_reason: FinishReason,
    /// Token usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Reason completion stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Hit max tokens
    Length,
    /// Tool call requested
    ToolCalls,
    /// Content filtered
    ContentFilter,
}

impl FinishReason {
    pub(crate) fn from_openai(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => FinishReason::Length,
            Some("tool_calls") | Some("function_call") => FinishReason::ToolCalls,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        }
    }
}

/// Create an LLM provider from configuration
pub fn create_provider(config: &LlmProviderConfig) -> LlmResult<Arc<dyn LlmProvider>> {
    match config.provider {
        LlmProviderType::OpenAI => {
            let provider = OpenAiProvider::new(config)?;
            Ok(Arc::new(provider))
        }
    }
}
